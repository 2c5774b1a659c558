//! 1D Distribution.

use super::*;

/// A piecewise-constant 1D function's PDF and CDF, used to draw samples
/// proportional to the function.
#[derive(Clone, Debug, PartialEq)]
pub struct Distribution1D {
    /// Piecewise-constant function.
    pub func: Vec<Float>,

    /// CDF for `func`.
    pub cdf: Vec<Float>,

    /// Integral of `func`.
    pub func_int: Float,
}

impl Distribution1D {
    /// Returns a new `Distribution1D` for given piecewise-constant function.
    /// A function that is zero everywhere is sampled uniformly.
    ///
    /// * `f` - Piecewise-constant 1D function; at least one value.
    pub fn new(f: Vec<Float>) -> Self {
        let n = f.len();

        // Compute integral of step function at `x_i`.
        let mut cdf: Vec<Float> = Vec::with_capacity(n + 1);
        cdf.push(0.0);
        for i in 1..n + 1 {
            cdf.push(cdf[i - 1] + f[i - 1] / n as Float);
        }

        // Transform step function integral into CDF.
        let func_int = cdf[n];
        if func_int == 0.0 {
            for (i, v) in cdf.iter_mut().enumerate().skip(1).take(n) {
                *v = i as Float / n as Float;
            }
        } else {
            for v in cdf.iter_mut().skip(1).take(n) {
                *v /= func_int;
            }
        }

        Self {
            func: f,
            cdf,
            func_int,
        }
    }

    /// Returns the number of steps of the piecewise-constant function.
    pub fn count(&self) -> usize {
        self.func.len()
    }

    /// Returns a sample in [0, 1) and its PDF for a uniform sample.
    ///
    /// * `u` - The uniform sample in [0, 1).
    pub fn sample_continuous(&self, u: Float) -> (Float, Float) {
        // Find surrounding CDF segment.
        let offset = find_interval(self.cdf.len(), |index| self.cdf[index] <= u);

        // Compute offset along CDF segment.
        let mut du = u - self.cdf[offset];
        let width = self.cdf[offset + 1] - self.cdf[offset];
        if width > 0.0 {
            du /= width;
        }

        let pdf = if self.func_int > 0.0 {
            self.func[offset] / self.func_int
        } else {
            0.0
        };

        (
            min((offset as Float + du) / self.count() as Float, ONE_MINUS_EPSILON),
            pdf,
        )
    }
}
