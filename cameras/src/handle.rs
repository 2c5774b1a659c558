//! Camera Handle

use super::params::*;
use super::perspective_camera::*;
use arc_swap::ArcSwap;
use camera_core::error::*;
use std::sync::Arc;

/// Shares the current camera between render threads. Readers take a snapshot
/// with `load()` and keep it for as long as they need a consistent camera;
/// `update()` publishes a complete new camera without disturbing them.
pub struct CameraHandle {
    /// The live camera.
    camera: ArcSwap<PerspectiveCamera>,
}

impl CameraHandle {
    /// Creates a handle for a camera built from parameters.
    ///
    /// * `params` - Camera parameters.
    pub fn new(params: &CameraParams) -> Result<Self, CameraError> {
        Ok(Self::from(PerspectiveCamera::new(params)?))
    }

    /// Returns the current camera.
    pub fn load(&self) -> Arc<PerspectiveCamera> {
        self.camera.load_full()
    }

    /// Builds a camera from new parameters and makes it current. On error the
    /// current camera is kept.
    ///
    /// * `params` - Camera parameters.
    pub fn update(&self, params: &CameraParams) -> Result<(), CameraError> {
        let camera = PerspectiveCamera::new(params)?;
        self.camera.store(Arc::new(camera));
        Ok(())
    }
}

impl From<PerspectiveCamera> for CameraHandle {
    /// Creates a handle for an existing camera.
    ///
    /// * `camera` - The camera.
    fn from(camera: PerspectiveCamera) -> Self {
        Self {
            camera: ArcSwap::from_pointee(camera),
        }
    }
}
