//! Rays

use super::{Float, Point3f, Vector3f, INFINITY};

/// A ray with a valid parametric interval and a time stamp.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    /// Origin.
    pub o: Point3f,

    /// Direction.
    pub d: Vector3f,

    /// Minimum extent of the ray.
    pub t_min: Float,

    /// Maximum extent of the ray.
    pub t_max: Float,

    /// Time value.
    pub time: Float,

    /// Auxilliary rays offset by one sample in x and y direction.
    pub differentials: Option<RayDifferential>,
}

impl Ray {
    /// Returns a ray with no differentials.
    ///
    /// * `o`     - Origin.
    /// * `d`     - Direction.
    /// * `t_min` - Minimum extent of the ray.
    /// * `t_max` - Maximum extent of the ray.
    /// * `time`  - Time value.
    pub fn new(o: Point3f, d: Vector3f, t_min: Float, t_max: Float, time: Float) -> Self {
        Self {
            o,
            d,
            t_min,
            t_max,
            time,
            differentials: None,
        }
    }

    /// Returns true if either coordinate is NaN.
    pub fn has_nans(&self) -> bool {
        self.o.has_nans() || self.d.has_nans() || self.t_min.is_nan() || self.t_max.is_nan()
    }

    /// Get position along the ray at given parameter.
    ///
    /// * `t` - Parameter to evaluate.
    pub fn at(&self, t: Float) -> Point3f {
        self.o + self.d * t
    }
}

impl Default for Ray {
    /// Returns a default value for `Ray`.
    fn default() -> Self {
        Self {
            o: Point3f::default(),
            d: Vector3f::new(0.0, 0.0, -1.0),
            t_min: 0.0,
            t_max: INFINITY,
            time: 0.0,
            differentials: None,
        }
    }
}

/// A ray differential is offset by one sample in the x and y direction of a ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RayDifferential {
    /// Origin of ray offset in x-direction.
    pub rx_origin: Point3f,

    /// Origin of ray offset in y-direction.
    pub ry_origin: Point3f,

    /// Direction of ray offset in x-direction.
    pub rx_direction: Vector3f,

    /// Direction of ray offset in y-direction.
    pub ry_direction: Vector3f,
}

impl RayDifferential {
    /// Returns a ray differential.
    ///
    /// * `xo` - Origin for x-direction differential.
    /// * `yo` - Origin for y-direction differential.
    /// * `xd` - Direction for x-direction differential.
    /// * `yd` - Direction for y-direction differential.
    pub fn new(xo: Point3f, yo: Point3f, xd: Vector3f, yd: Vector3f) -> Self {
        Self {
            rx_origin: xo,
            ry_origin: yo,
            rx_direction: xd,
            ry_direction: yd,
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::super::{Point3, Vector3};
    use super::*;

    #[test]
    fn has_nans() {
        let nan_point = Point3::new(f32::NAN, f32::NAN, f32::NAN);
        let nan_vector = Vector3::new(f32::NAN, f32::NAN, f32::NAN);
        let point = Point3::new(0.0, 0.0, 0.0);
        let vector = Vector3::new(1.0, 0.0, 0.0);

        assert!(Ray::new(nan_point, vector, 0.0, 1.0, 0.0).has_nans());
        assert!(Ray::new(point, nan_vector, 0.0, 1.0, 0.0).has_nans());
        assert!(Ray::new(point, vector, f32::NAN, 1.0, 0.0).has_nans());
        assert!(Ray::new(point, vector, 0.0, f32::NAN, 0.0).has_nans());
        assert!(!Ray::new(point, vector, 0.0, 1.0, 0.0).has_nans());
    }

    #[test]
    fn at() {
        let o = Point3::new(0.0, 0.0, 0.0);
        let d = Vector3::new(1.0, 1.0, 1.0);
        let r = Ray::new(o, d, 0.0, INFINITY, 0.0);
        assert!(r.at(0.0) == o);
        assert!(r.at(1.0) == Point3::from(d));
    }
}
