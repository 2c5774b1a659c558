//! Lens Distortion

use camera_core::geometry::*;
use camera_core::pbrt::*;

/// Applies the quadratic radial distortion model to a normalized screen
/// coordinate: `s' = s (1 + k |s|^2)`. Positive `k` gives pincushion
/// distortion, negative `k` barrel distortion.
///
/// * `s` - Screen coordinate normalized to [-1, 1]^2.
/// * `k` - Radial distortion coefficient.
#[inline]
pub fn distort_radial(s: &Point2f, k: Float) -> Point2f {
    *s * (1.0 + k * s.length_squared())
}

/// Remaps a film coordinate in [0, 1]^2 into the sub-rectangle
/// `[u_min, v_min, u_max, v_max]`. The zero rectangle is the identity.
///
/// * `uv`    - Film coordinate in [0, 1]^2.
/// * `remap` - Target rectangle.
#[inline]
pub fn remap_uv(uv: &Point2f, remap: &[Float; 4]) -> Point2f {
    if remap.iter().all(|v| *v == 0.0) {
        return *uv;
    }
    Point2f::new(
        lerp(uv.x, remap[0], remap[2]),
        lerp(uv.y, remap[1], remap[3]),
    )
}

/// Screen space distortion applied before projection.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LensDistortion {
    /// Radial distortion coefficient.
    pub radial_distortion: Float,

    /// Film sub-rectangle `[u_min, v_min, u_max, v_max]`.
    pub uv_remap: [Float; 4],
}

impl LensDistortion {
    /// Creates a lens distortion.
    ///
    /// * `radial_distortion` - Radial distortion coefficient.
    /// * `uv_remap`          - Film sub-rectangle; zero for none.
    pub fn new(radial_distortion: Float, uv_remap: [Float; 4]) -> Self {
        Self {
            radial_distortion,
            uv_remap,
        }
    }

    /// Returns true if the distortion leaves all coordinates unchanged.
    pub fn is_identity(&self) -> bool {
        self.radial_distortion == 0.0 && self.uv_remap.iter().all(|v| *v == 0.0)
    }

    /// Distorts a screen space point. The point is expressed relative to the
    /// screen window, remapped, distorted radially about the window center and
    /// mapped back.
    ///
    /// * `s`             - Screen space point.
    /// * `screen_window` - Visible region of screen space.
    pub fn apply(&self, s: &Point2f, screen_window: &Bounds2f) -> Point2f {
        if self.is_identity() {
            return *s;
        }

        let uv = remap_uv(&screen_window.offset(s), &self.uv_remap);
        let n = 2.0 * uv - Point2f::new(1.0, 1.0);
        let d = distort_radial(&n, self.radial_distortion);
        screen_window.lerp(&(0.5 * (d + Point2f::new(1.0, 1.0))))
    }
}
