//! Camera

use crate::error::*;
use crate::geometry::*;
use crate::pbrt::*;
use std::fmt;
use std::sync::Arc;

/// Vectors shorter than this are treated as having no direction.
const DEGENERATE_LENGTH: Float = 1e-6;

/// Screen space shift used to estimate ray differentials.
const DIFFERENTIAL_SHIFT: Float = 0.05;

/// Camera trait provides common behavior.
pub trait Camera {
    /// Returns the camera placement at a given scene time. Times outside the
    /// motion window are clamped to it.
    ///
    /// * `time` - Scene time.
    fn pose_at(&self, time: Float) -> CameraPose;

    /// Returns a world space ray corresponding to a given sample.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> Ray;

    /// Returns a main ray and auxiliary rays for a unit shift in screen space
    /// x and y, estimated by finite differences. The lens and time samples are
    /// shared with the main ray.
    ///
    /// * `sample` - The sample.
    fn generate_ray_differential(&self, sample: &CameraSample) -> Ray {
        let mut ray = self.generate_ray(sample);

        // Find camera ray after shifting a fraction of a unit in the x-direction.
        let mut sshift = *sample;
        sshift.p_film.x += DIFFERENTIAL_SHIFT;
        let rx = self.generate_ray(&sshift);

        // Find camera ray after shifting a fraction of a unit in the y-direction.
        let mut sshift = *sample;
        sshift.p_film.y += DIFFERENTIAL_SHIFT;
        let ry = self.generate_ray(&sshift);

        ray.differentials = Some(RayDifferential::new(
            ray.o + (rx.o - ray.o) / DIFFERENTIAL_SHIFT,
            ray.o + (ry.o - ray.o) / DIFFERENTIAL_SHIFT,
            ray.d + (rx.d - ray.d) / DIFFERENTIAL_SHIFT,
            ray.d + (ry.d - ray.d) / DIFFERENTIAL_SHIFT,
        ));

        ray
    }
}

/// Stores all of the sample values needed to specify a camera ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CameraSample {
    /// Point on the film in screen space, normally inside the camera's
    /// screen window.
    pub p_film: Point2f,

    /// Uniform sample in [0, 1)^2 selecting the point on the lens the ray
    /// passes through.
    pub p_lens: Point2f,

    /// Uniform sample in [0, 1] mapped through the shutter to scene time.
    pub time: Float,
}

impl CameraSample {
    /// Create a new `CameraSample`.
    ///
    /// * `p_film` - Point on the film in screen space.
    /// * `p_lens` - Lens sample in [0, 1)^2.
    /// * `time`   - Time sample in [0, 1].
    pub fn new(p_film: Point2f, p_lens: Point2f, time: Float) -> Self {
        Self {
            p_film,
            p_lens,
            time,
        }
    }
}

impl fmt::Display for CameraSample {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraSample<p_film: {:}, p_lens: {:}, time: {}>",
            self.p_film, self.p_lens, self.time
        )
    }
}

/// Handedness of the camera's screen axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Handedness {
    /// `right = forward x up`.
    Right,

    /// `right = up x forward`; the image is mirrored horizontally.
    Left,
}

impl Handedness {
    /// Returns the handedness for its parameter name, `"right"` or `"left"`.
    ///
    /// * `name` - Parameter value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "right" => Some(Self::Right),
            "left" => Some(Self::Left),
            _ => None,
        }
    }

    /// Returns `1` for right-handed and `-1` for left-handed.
    fn sign(&self) -> Float {
        match self {
            Self::Right => 1.0,
            Self::Left => -1.0,
        }
    }
}

impl Default for Handedness {
    fn default() -> Self {
        Self::Right
    }
}

/// Placement of a camera in world space: a position and an orthonormal
/// viewing basis.
///
/// In camera space the camera sits at the origin looking down `-z` with `+x`
/// to the right and `+y` up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraPose {
    /// World space position.
    pub position: Point3f,

    /// Unit viewing direction.
    pub forward: Vector3f,

    /// Unit screen right direction.
    pub right: Vector3f,

    /// Unit screen up direction.
    pub up: Vector3f,
}

impl CameraPose {
    /// Builds a pose looking from `position` towards `look_at`. Returns
    /// `DegenerateBasis` if the two points coincide or `up` is parallel to
    /// the viewing direction.
    ///
    /// * `position`   - Camera position.
    /// * `look_at`    - Point the camera looks at.
    /// * `up`         - Approximate up direction.
    /// * `handedness` - Handedness of the screen axes.
    pub fn look_at(
        position: &Point3f,
        look_at: &Point3f,
        up: &Vector3f,
        handedness: Handedness,
    ) -> Result<Self, CameraError> {
        let dir = *look_at - *position;
        if dir.length() < DEGENERATE_LENGTH {
            return Err(CameraError::DegenerateBasis(format!(
                "position and look_at coincide at {}",
                position
            )));
        }
        let forward = dir.normalize();

        let right = forward.cross(up);
        if right.length() < DEGENERATE_LENGTH {
            return Err(CameraError::DegenerateBasis(format!(
                "up vector {} is parallel to view direction {}",
                up, forward
            )));
        }
        let right = right.normalize();
        let up = right.cross(&forward);

        Ok(Self {
            position: *position,
            forward,
            right: right * handedness.sign(),
            up,
        })
    }

    /// Extracts a pose from a camera-to-world matrix whose columns are the
    /// camera's `+x`, `+y`, `+z` axes and position. Scale is removed and the
    /// basis is re-orthogonalized about the viewing direction.
    ///
    /// * `m`          - Camera-to-world matrix.
    /// * `handedness` - Handedness of the screen axes.
    pub fn from_matrix(m: &Matrix4x4, handedness: Handedness) -> Self {
        let x = Vector3f::new(m[0][0], m[1][0], m[2][0]);
        let z = Vector3f::new(m[0][2], m[1][2], m[2][2]);

        let forward = -z.normalize();
        let right = (x - forward * x.dot(&forward)).normalize();
        let up = right.cross(&forward);

        Self {
            position: Point3f::new(m[0][3], m[1][3], m[2][3]),
            forward,
            right: right * handedness.sign(),
            up,
        }
    }

    /// Returns the right-handed camera-to-world matrix. Handedness is not
    /// part of the matrix so that it stays a proper rotation.
    pub fn to_matrix(&self) -> Matrix4x4 {
        let right = self.forward.cross(&self.up);
        Matrix4x4::from_columns(&right, &self.up, &-self.forward, &self.position)
    }

    /// Transforms a camera space vector to world space.
    ///
    /// * `v` - Camera space vector.
    #[inline]
    pub fn camera_to_world_vector(&self, v: &Vector3f) -> Vector3f {
        self.right * v.x + self.up * v.y - self.forward * v.z
    }

    /// Transforms a camera space point to world space.
    ///
    /// * `p` - Camera space point.
    #[inline]
    pub fn camera_to_world_point(&self, p: &Point3f) -> Point3f {
        self.position + self.camera_to_world_vector(&Vector3f::from(*p))
    }
}

impl Default for CameraPose {
    /// Camera at the origin looking down `-z` with `+y` up.
    fn default() -> Self {
        Self {
            position: Point3f::zero(),
            forward: Vector3f::new(0.0, 0.0, -1.0),
            right: Vector3f::new(1.0, 0.0, 0.0),
            up: Vector3f::new(0.0, 1.0, 0.0),
        }
    }
}

impl fmt::Display for CameraPose {
    /// Formats the value using the given formatter.
    ///
    /// * `f` - Formatter.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraPose<position: {}, forward: {}, right: {}, up: {}>",
            self.position, self.forward, self.right, self.up
        )
    }
}

/// Per-pixel weighting supplied by the renderer. Cameras never evaluate it;
/// it is carried alongside so the renderer can weight each sample's
/// contribution.
pub trait FilterMap: Send + Sync {
    /// Returns the weight for a film position.
    ///
    /// * `p_film` - Point on the film in screen space.
    fn weight(&self, p_film: &Point2f) -> Float;
}

impl<F> FilterMap for F
where
    F: Fn(&Point2f) -> Float + Send + Sync,
{
    fn weight(&self, p_film: &Point2f) -> Float {
        self(p_film)
    }
}

/// A filter map with the same weight everywhere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ConstantFilterMap(pub Float);

impl FilterMap for ConstantFilterMap {
    fn weight(&self, _p_film: &Point2f) -> Float {
        self.0
    }
}

/// Atomic reference counted `FilterMap`.
pub type ArcFilterMap = Arc<dyn FilterMap>;
