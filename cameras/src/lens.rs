//! Lens Sampler

use camera_core::error::*;
use camera_core::geometry::*;
use camera_core::pbrt::*;
use camera_core::sampling::*;

/// Number of angular steps per blade used to tabulate the bowed outline.
const STEPS_PER_BLADE: u32 = 64;

/// Shape of the camera aperture. Samples lie within radius `size` of the
/// optical axis only for `aspect_ratio` 1; other ratios stretch the vertical
/// extent to `size * aspect_ratio`.
#[derive(Clone, Debug, PartialEq)]
pub struct Aperture {
    /// Radius of the aperture; 0 for a pinhole.
    pub size: Float,

    /// Number of blades; 0 for a circular aperture.
    pub blades: u32,

    /// Rotation of the blades in radians.
    pub rotation: Float,

    /// Bowing of the blade edges towards a circle in [0, 1].
    pub blade_curvature: Float,

    /// Vertical stretch of the aperture.
    pub aspect_ratio: Float,

    /// Angular distribution proportional to the squared outline radius of
    /// a bowed polygon, over a full turn starting at `rotation`.
    outline: Option<Distribution1D>,
}

impl Aperture {
    /// Creates an aperture. Fails with `InvalidAperture` if `size` is
    /// negative, `blades` is negative, 1 or 2, `blade_curvature` is outside
    /// [0, 1] or `aspect_ratio` is not positive.
    ///
    /// * `size`            - Radius of the aperture.
    /// * `blades`          - Number of blades.
    /// * `rotation`        - Rotation of the blades in degrees.
    /// * `blade_curvature` - Bowing of the blade edges in [0, 1].
    /// * `aspect_ratio`    - Vertical stretch of the aperture.
    pub fn new(
        size: Float,
        blades: Int,
        rotation: Float,
        blade_curvature: Float,
        aspect_ratio: Float,
    ) -> Result<Self, CameraError> {
        if !(size >= 0.0) {
            return Err(CameraError::InvalidAperture(format!(
                "aperture_size {} is negative",
                size
            )));
        }
        if blades < 0 || blades == 1 || blades == 2 {
            return Err(CameraError::InvalidAperture(format!(
                "aperture_blades {} must be 0 or at least 3",
                blades
            )));
        }
        if !(0.0..=1.0).contains(&blade_curvature) {
            return Err(CameraError::InvalidAperture(format!(
                "aperture_blade_curvature {} outside [0, 1]",
                blade_curvature
            )));
        }
        if !(aspect_ratio > 0.0) {
            return Err(CameraError::InvalidAperture(format!(
                "aperture_aspect_ratio {} is not positive",
                aspect_ratio
            )));
        }

        let blades = blades as u32;
        let rotation = radians(rotation);

        // Area in a thin sector grows with the square of the outline radius.
        let outline = if blades >= 3 && blade_curvature > 0.0 {
            let n = blades * STEPS_PER_BLADE;
            let f: Vec<Float> = (0..n)
                .map(|i| {
                    let theta = rotation + TWO_PI * (i as Float + 0.5) / n as Float;
                    let r = bowed_radius(theta, blades, rotation, blade_curvature);
                    r * r
                })
                .collect();
            Some(Distribution1D::new(f))
        } else {
            None
        };

        Ok(Self {
            size,
            blades,
            rotation,
            blade_curvature,
            aspect_ratio,
            outline,
        })
    }

    /// Returns a pinhole aperture.
    pub fn pinhole() -> Self {
        Self {
            size: 0.0,
            blades: 0,
            rotation: 0.0,
            blade_curvature: 0.0,
            aspect_ratio: 1.0,
            outline: None,
        }
    }

    /// Returns true if the aperture is a pinhole.
    pub fn is_pinhole(&self) -> bool {
        self.size == 0.0
    }

    /// Samples a point uniformly over the aperture in the lens plane.
    ///
    /// * `u` - Uniform sample in [0, 1)^2.
    pub fn sample(&self, u: &Point2f) -> Point2f {
        let p = match &self.outline {
            Some(outline) => {
                // Pick a direction by sector area, then a radius uniform in
                // area below the outline.
                let (x, _) = outline.sample_continuous(u.x);
                let theta = self.rotation + TWO_PI * x;
                let r = bowed_radius(theta, self.blades, self.rotation, self.blade_curvature)
                    * u.y.sqrt();
                Point2f::new(r * theta.cos(), r * theta.sin())
            }
            None if self.blades == 0 => concentric_sample_disk(u),
            None => uniform_sample_polygon(u, self.blades, self.rotation),
        };
        self.size * stretch(&p, self.aspect_ratio)
    }
}

impl Default for Aperture {
    fn default() -> Self {
        Self::pinhole()
    }
}

/// Returns the distance from the centre to the outline of a regular polygon
/// inscribed in the unit circle whose edges are bowed towards the circle,
/// measured along direction `theta`.
///
/// * `theta`     - Direction in radians.
/// * `sides`     - Number of polygon sides; at least 3.
/// * `rotation`  - Rotation of the polygon in radians; a vertex lies there.
/// * `curvature` - 0 keeps straight edges, 1 yields the circle.
pub fn bowed_radius(theta: Float, sides: u32, rotation: Float, curvature: Float) -> Float {
    let wedge = TWO_PI / sides as Float;
    let t = theta - rotation;
    let phi = t - wedge * (t / wedge).floor() - 0.5 * wedge;
    let r_edge = (0.5 * wedge).cos() / phi.cos();
    lerp(curvature, r_edge, 1.0)
}

/// Stretches a lens point vertically.
///
/// * `p`            - Lens point.
/// * `aspect_ratio` - Vertical stretch.
#[inline]
pub fn stretch(p: &Point2f, aspect_ratio: Float) -> Point2f {
    Point2f::new(p.x, p.y * aspect_ratio)
}

/// Perturbs pinhole rays for depth of field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LensSampler {
    /// Shape of the aperture.
    pub aperture: Aperture,

    /// Focus on a plane instead of a sphere around the camera.
    pub flat_field_focus: bool,
}

impl LensSampler {
    /// Creates a lens sampler.
    ///
    /// * `aperture`         - Shape of the aperture.
    /// * `flat_field_focus` - Focus on a plane instead of a sphere.
    pub fn new(aperture: Aperture, flat_field_focus: bool) -> Self {
        Self {
            aperture,
            flat_field_focus,
        }
    }

    /// Returns the camera space origin offset and direction of a ray through
    /// a lens sample. The ray leaves the lens plane and passes through the
    /// point where the pinhole ray `dir` meets the focal surface.
    ///
    /// * `dir`            - Unit camera space pinhole direction.
    /// * `focus_distance` - Distance to the focal surface.
    /// * `u`              - Lens sample in [0, 1)^2.
    pub fn perturb(&self, dir: &Vector3f, focus_distance: Float, u: &Point2f) -> (Vector3f, Vector3f) {
        if self.aperture.is_pinhole() {
            return (Vector3f::zero(), *dir);
        }

        // Compute point on the focal surface; the camera looks down -z.
        let ft = if self.flat_field_focus {
            focus_distance / -dir.z
        } else {
            focus_distance
        };
        let p_focus = *dir * ft;

        let l = self.aperture.sample(u);
        let offset = Vector3f::new(l.x, l.y, 0.0);

        let d = p_focus - offset;
        let d = if d.length_squared() > 0.0 {
            d.normalize()
        } else {
            Vector3f::new(0.0, 0.0, -1.0)
        };

        (offset, d)
    }
}
