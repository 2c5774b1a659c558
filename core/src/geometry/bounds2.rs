//! 2-D Axis Aligned Bounding Boxes.

use super::{lerp, max, min, Float, Point2, Point2f};
use num_traits::Num;

/// 2-D Axis Aligned Bounding Box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bounds2<T: Num> {
    /// Minimum bounds.
    pub p_min: Point2<T>,

    /// Maximum bounds.
    pub p_max: Point2<T>,
}

/// 2-D bounds containing `Float` points.
pub type Bounds2f = Bounds2<Float>;

impl<T: Num + PartialOrd + Copy> Bounds2<T> {
    /// Creates a new 2-D bounds from 2 points. The minimum and maximum of
    /// each coordinate are used so the corners may be given in any order.
    ///
    /// * `p1` - First point.
    /// * `p2` - Second point.
    pub fn new(p1: Point2<T>, p2: Point2<T>) -> Self {
        Self {
            p_min: Point2::new(min(p1.x, p2.x), min(p1.y, p2.y)),
            p_max: Point2::new(max(p1.x, p2.x), max(p1.y, p2.y)),
        }
    }

    /// Returns true if the bounds enclose no area.
    pub fn is_degenerate(&self) -> bool {
        !(self.p_max.x > self.p_min.x && self.p_max.y > self.p_min.y)
    }
}

impl Bounds2<Float> {
    /// Linearly interpolates between the corners of the bounds.
    ///
    /// * `t` - Interpolation parameter per axis.
    pub fn lerp(&self, t: &Point2f) -> Point2f {
        Point2f::new(
            lerp(t.x, self.p_min.x, self.p_max.x),
            lerp(t.y, self.p_min.y, self.p_max.y),
        )
    }

    /// Returns the position of a point relative to the corners of the box;
    /// `p_min` maps to (0, 0) and `p_max` to (1, 1).
    ///
    /// * `p` - The point.
    pub fn offset(&self, p: &Point2f) -> Point2f {
        let mut o = *p - self.p_min;
        if self.p_max.x > self.p_min.x {
            o.x /= self.p_max.x - self.p_min.x;
        }
        if self.p_max.y > self.p_min.y {
            o.y /= self.p_max.y - self.p_min.y;
        }
        o
    }
}
