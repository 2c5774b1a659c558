//! Common sampling functions.

use super::*;

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. The concentric mapping takes points in [-1, 1]^2 to unit disk by
/// uniformly mapping concentric squares to concentric circles.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1,1]^2.
    let u_offset = 2.0 * *u - Point2f::new(1.0, 1.0);

    // Handle degeneracy at the origin.
    if u_offset.x == 0.0 && u_offset.y == 0.0 {
        return Point2f::zero();
    }

    // Apply concentric mapping to point
    let (r, theta) = if abs(u_offset.x) > abs(u_offset.y) {
        (u_offset.x, PI_OVER_FOUR * (u_offset.y / u_offset.x))
    } else {
        (
            u_offset.y,
            PI_OVER_TWO - PI_OVER_FOUR * (u_offset.x / u_offset.y),
        )
    };

    r * Point2f::new(theta.cos(), theta.sin())
}

/// Uniformly sample a triangle, returning barycentric coordinates.
///
/// * `u` - The random sample point.
#[inline]
pub fn uniform_sample_triangle(u: &Point2f) -> Point2f {
    let su0 = u[0].sqrt();
    Point2f::new(1.0 - su0, u[1] * su0)
}

/// Uniformly sample a regular polygon inscribed in the unit circle. The first
/// vertex lies on the +x axis rotated by `rotation`. The polygon is split into
/// `sides` triangles fanned around the origin; `u.x` selects a triangle and is
/// then reused within it.
///
/// * `u`        - The random sample point.
/// * `sides`    - Number of polygon sides; at least 3.
/// * `rotation` - Rotation of the polygon in radians.
pub fn uniform_sample_polygon(u: &Point2f, sides: u32, rotation: Float) -> Point2f {
    debug_assert!(sides >= 3);

    let n = sides as Float;
    let scaled = u.x * n;
    let i = min(scaled.floor(), n - 1.0);
    let u_remapped = Point2f::new(min(scaled - i, ONE_MINUS_EPSILON), u.y);

    let wedge = TWO_PI / n;
    let theta0 = rotation + i * wedge;
    let theta1 = theta0 + wedge;
    let v0 = Point2f::new(theta0.cos(), theta0.sin());
    let v1 = Point2f::new(theta1.cos(), theta1.sin());

    // Third triangle vertex is the origin.
    let b = uniform_sample_triangle(&u_remapped);
    b[0] * v0 + b[1] * v1
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn concentric_sample_disk_center() {
        assert_eq!(
            concentric_sample_disk(&Point2f::new(0.5, 0.5)),
            Point2f::zero()
        );
    }

    #[test]
    fn concentric_sample_disk_edges() {
        let p = concentric_sample_disk(&Point2f::new(1.0, 0.5));
        assert!(approx_eq!(f32, p.x, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, 0.0, epsilon = 1e-6));

        let p = concentric_sample_disk(&Point2f::new(0.5, 0.0));
        assert!(approx_eq!(f32, p.x, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn uniform_sample_polygon_corner() {
        // u = (0, 0) lands on the first vertex.
        let p = uniform_sample_polygon(&Point2f::new(0.0, 0.0), 6, 0.0);
        assert!(approx_eq!(f32, p.x, 1.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, 0.0, epsilon = 1e-6));

        let p = uniform_sample_polygon(&Point2f::new(0.0, 0.0), 6, PI_OVER_TWO);
        assert!(approx_eq!(f32, p.x, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, p.y, 1.0, epsilon = 1e-6));
    }

    proptest! {
        #[test]
        fn concentric_sample_disk_inside_unit_disk(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let p = concentric_sample_disk(&Point2f::new(x, y));
            prop_assert!(p.length_squared() <= 1.0 + 1e-5);
        }

        #[test]
        fn uniform_sample_triangle_barycentric(x in 0.0..1.0f32, y in 0.0..1.0f32) {
            let b = uniform_sample_triangle(&Point2f::new(x, y));
            prop_assert!(b.x >= 0.0 && b.y >= 0.0);
            prop_assert!(b.x + b.y <= 1.0 + 1e-6);
        }

        #[test]
        fn uniform_sample_polygon_inside_polygon(
            x in 0.0..1.0f32,
            y in 0.0..1.0f32,
            sides in 3u32..12,
            rotation in 0.0..TWO_PI,
        ) {
            let p = uniform_sample_polygon(&Point2f::new(x, y), sides, rotation);

            // Inside the polygon means within the apothem along every edge normal.
            let wedge = TWO_PI / sides as Float;
            let apothem = (wedge * 0.5).cos();
            for i in 0..sides {
                let phi = rotation + (i as Float + 0.5) * wedge;
                let d = p.x * phi.cos() + p.y * phi.sin();
                prop_assert!(d <= apothem + 1e-5);
            }
        }
    }
}
