//! Clamp

use super::Float;
use num_traits::Num;

/// Clamps a value x to [min, max].
///
/// * `x`   - The number to clamp.
/// * `min` - Minimum value.
/// * `max` - Maximum value.
pub fn clamp<T>(x: T, min: T, max: T) -> T
where
    T: Num + PartialOrd + Copy,
{
    if x < min {
        min
    } else if x > max {
        max
    } else {
        x
    }
}

/// Interface for clamping values.
pub trait Clamp {
    /// Clamps the value to [0, 1].
    fn saturate(&self) -> Self;
}

impl Clamp for Float {
    fn saturate(&self) -> Self {
        clamp(*self, 0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_inside_and_outside() {
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp(-2, 0, 10), 0);
        assert_eq!(clamp(12, 0, 10), 10);
    }

    #[test]
    fn saturate_float() {
        assert_eq!((1.5 as Float).saturate(), 1.0);
        assert_eq!((-0.25 as Float).saturate(), 0.0);
        assert_eq!((0.25 as Float).saturate(), 0.25);
    }
}
