//! Projection Mapper

use camera_core::error::*;
use camera_core::geometry::*;
use camera_core::pbrt::*;

/// Maps screen space positions to camera space viewing directions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ProjectionMapper {
    /// Visible region of screen space.
    pub screen_window: Bounds2f,

    /// Half extent of the image plane at unit distance along `x`.
    pub half_extent: Float,

    /// Width divided by height of the frame.
    pub frame_aspect_ratio: Float,

    /// Distance to the near clipping plane.
    pub near_clip: Float,

    /// Distance to the far clipping plane.
    pub far_clip: Float,
}

impl ProjectionMapper {
    /// Creates a projection mapper. Fails with `InvalidProjection` if `fov`
    /// is outside (0, 180), the screen window is empty, the frame aspect ratio
    /// is not positive or the clipping range is empty or negative.
    ///
    /// * `fov`                - Horizontal field of view in degrees.
    /// * `screen_window`      - Visible region of screen space.
    /// * `frame_aspect_ratio` - Width divided by height of the frame.
    /// * `plane_distance`     - Measure the field of view at the focus
    ///                          distance instead of unit distance.
    /// * `focus_distance`     - Distance to the plane of focus.
    /// * `near_clip`          - Distance to the near clipping plane.
    /// * `far_clip`           - Distance to the far clipping plane.
    pub fn new(
        fov: Float,
        screen_window: Bounds2f,
        frame_aspect_ratio: Float,
        plane_distance: bool,
        focus_distance: Float,
        near_clip: Float,
        far_clip: Float,
    ) -> Result<Self, CameraError> {
        if !(fov > 0.0 && fov < 180.0) {
            return Err(CameraError::InvalidProjection(format!(
                "fov {} outside (0, 180)",
                fov
            )));
        }
        if screen_window.is_degenerate() {
            return Err(CameraError::InvalidProjection(format!(
                "empty screen window [{} - {}]",
                screen_window.p_min, screen_window.p_max
            )));
        }
        if !(frame_aspect_ratio > 0.0) {
            return Err(CameraError::InvalidProjection(format!(
                "frame aspect ratio {} is not positive",
                frame_aspect_ratio
            )));
        }
        if !(near_clip >= 0.0 && near_clip < far_clip) {
            return Err(CameraError::InvalidProjection(format!(
                "clipping range [{}, {}] is empty",
                near_clip, far_clip
            )));
        }

        let mut half_extent = (0.5 * radians(fov)).tan();
        if plane_distance {
            half_extent *= focus_distance;
        }

        Ok(Self {
            screen_window,
            half_extent,
            frame_aspect_ratio,
            near_clip,
            far_clip,
        })
    }

    /// Returns the position of a screen space point relative to the screen
    /// window, in [0, 1]^2 for points inside it.
    ///
    /// * `s` - Screen space point.
    pub fn window_offset(&self, s: &Point2f) -> Point2f {
        self.screen_window.offset(s)
    }

    /// Returns the unit camera space direction through a screen space point.
    /// The camera looks down `-z`.
    ///
    /// * `s` - Screen space point.
    pub fn screen_to_camera_dir(&self, s: &Point2f) -> Vector3f {
        let o = self.window_offset(s);
        let h = self.half_extent;
        let sx = lerp(o.x, -h, h);
        let sy = lerp(o.y, -h, h) / self.frame_aspect_ratio;
        Vector3f::new(sx, sy, -1.0).normalize()
    }

    /// Returns the ray parameter range between the flat near and far clipping
    /// planes for a ray leaving the camera plane.
    ///
    /// * `d` - Camera space direction; must point into the scene.
    pub fn ray_extent(&self, d: &Vector3f) -> (Float, Float) {
        let cos_theta = -d.z / d.length();
        if cos_theta > 0.0 {
            (self.near_clip / cos_theta, self.far_clip / cos_theta)
        } else {
            (self.near_clip, self.far_clip)
        }
    }

    /// Maps a raster position to screen space. Raster space spans
    /// `[0, resolution]` with `y` pointing down.
    ///
    /// * `p_raster`   - Raster position.
    /// * `resolution` - Image resolution in pixels.
    pub fn raster_to_screen(&self, p_raster: &Point2f, resolution: &Point2u) -> Point2f {
        let t = Point2f::new(
            p_raster.x / resolution.x as Float,
            1.0 - p_raster.y / resolution.y as Float,
        );
        self.screen_window.lerp(&t)
    }
}
