//! 4x4 Matrix

use super::{abs, Float, Point3f, Vector3f};
use std::ops::{Index, Mul};

/// A 4x4 row-major matrix containing `Float` values. Points and vectors are
/// treated as column vectors, so translation lives in the last column.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4x4 {
    /// Stores a 2-D array of Float
    pub m: [[Float; 4]; 4],
}

/// Identity matrix.
pub const IDENTITY_MATRIX: Matrix4x4 = Matrix4x4 {
    m: [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ],
};

impl Matrix4x4 {
    /// Create a matrix from its rows.
    ///
    /// * `m` - Rows of the matrix.
    pub fn new(m: [[Float; 4]; 4]) -> Self {
        Self { m }
    }

    /// Create a matrix from 16 values in row-major order. Returns `None` if
    /// the slice does not hold exactly 16 values.
    ///
    /// * `values` - The values.
    pub fn from_slice(values: &[Float]) -> Option<Self> {
        if values.len() != 16 {
            return None;
        }
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row.copy_from_slice(&values[i * 4..i * 4 + 4]);
        }
        Some(Self { m })
    }

    /// Create a matrix whose upper 3x3 block holds the given columns and whose
    /// last column holds a translation.
    ///
    /// * `x` - First column.
    /// * `y` - Second column.
    /// * `z` - Third column.
    /// * `t` - Translation.
    #[rustfmt::skip]
    pub fn from_columns(x: &Vector3f, y: &Vector3f, z: &Vector3f, t: &Point3f) -> Self {
        Self::new([
            [x.x, y.x, z.x, t.x],
            [x.y, y.y, z.y, t.y],
            [x.z, y.z, z.z, t.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Returns true if this is the identity matrix.
    pub fn is_identity(&self) -> bool {
        *self == IDENTITY_MATRIX
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Self {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = self.m[j][i];
            }
        }
        Self::new(r)
    }

    /// Returns the determinant of the upper 3x3 block. A negative value means
    /// the matrix mirrors space.
    pub fn determinant3x3(&self) -> Float {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Returns the inverse using Gauss-Jordan elimination with full pivoting,
    /// or `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        let mut indxc = [0_usize; 4];
        let mut indxr = [0_usize; 4];
        let mut ipiv = [0_usize; 4];
        let mut minv = self.m;

        for i in 0..4 {
            let mut irow = 0;
            let mut icol = 0;
            let mut big: Float = 0.0;

            // Choose pivot.
            for j in 0..4 {
                if ipiv[j] != 1 {
                    for k in 0..4 {
                        if ipiv[k] == 0 {
                            if abs(minv[j][k]) >= big {
                                big = abs(minv[j][k]);
                                irow = j;
                                icol = k;
                            }
                        } else if ipiv[k] > 1 {
                            return None;
                        }
                    }
                }
            }
            ipiv[icol] += 1;

            // Swap rows `irow` and `icol` for pivot.
            if irow != icol {
                minv.swap(irow, icol);
            }
            indxr[i] = irow;
            indxc[i] = icol;
            if minv[icol][icol] == 0.0 {
                return None;
            }

            // Set m[icol][icol] to one by scaling row `icol` appropriately.
            let pivinv = 1.0 / minv[icol][icol];
            minv[icol][icol] = 1.0;
            for v in minv[icol].iter_mut() {
                *v *= pivinv;
            }

            // Subtract this row from others to zero out their columns.
            for j in 0..4 {
                if j != icol {
                    let save = minv[j][icol];
                    minv[j][icol] = 0.0;
                    for k in 0..4 {
                        minv[j][k] -= minv[icol][k] * save;
                    }
                }
            }
        }

        // Swap columns to reflect permutation.
        for j in (0..4).rev() {
            if indxr[j] != indxc[j] {
                for row in minv.iter_mut() {
                    row.swap(indxr[j], indxc[j]);
                }
            }
        }

        Some(Self::new(minv))
    }
}

impl Default for Matrix4x4 {
    /// Returns the identity matrix.
    fn default() -> Self {
        IDENTITY_MATRIX
    }
}

impl Mul<Matrix4x4> for Matrix4x4 {
    type Output = Matrix4x4;

    fn mul(self, other: Matrix4x4) -> Self::Output {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, v) in row.iter_mut().enumerate() {
                *v = (0..4).map(|k| self.m[i][k] * other.m[k][j]).sum();
            }
        }
        Matrix4x4::new(r)
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = [Float; 4];

    /// Returns a row of the matrix.
    ///
    /// * `row` - The row index.
    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn inverse_of_zero_matrix_is_none() {
        assert!(Matrix4x4::new([[0.0; 4]; 4]).inverse().is_none());
    }

    #[test]
    fn inverse_of_identity_is_identity() {
        assert_eq!(IDENTITY_MATRIX.inverse(), Some(IDENTITY_MATRIX));
    }

    #[test]
    fn from_slice_requires_sixteen_values() {
        assert!(Matrix4x4::from_slice(&[1.0; 15]).is_none());
        let m = Matrix4x4::from_slice(&[
            1.0, 0.0, 0.0, 5.0, //
            0.0, 1.0, 0.0, 6.0, //
            0.0, 0.0, 1.0, 7.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
        .unwrap();
        assert_eq!(m[0][3], 5.0);
        assert_eq!(m[2][3], 7.0);
    }

    #[test]
    fn mirrored_matrix_has_negative_determinant() {
        let mut m = IDENTITY_MATRIX;
        m.m[0][0] = -1.0;
        assert_eq!(m.determinant3x3(), -1.0);
    }

    proptest! {
        #[test]
        fn inverse_times_matrix_is_identity(
            a in 0.5..2.0f32, b in -1.0..1.0f32, c in -1.0..1.0f32,
            d in 0.5..2.0f32, e in -3.0..3.0f32
        ) {
            // Diagonally dominant so the matrix is never singular.
            let m = Matrix4x4::new([
                [a + 2.0, b, c, e],
                [b, d + 2.0, c, -e],
                [c, b, a + d + 2.0, 0.5 * e],
                [0.0, 0.0, 0.0, 1.0],
            ]);
            let p = m * m.inverse().unwrap();
            for i in 0..4 {
                for j in 0..4 {
                    let expected = if i == j { 1.0 } else { 0.0 };
                    prop_assert!(approx_eq!(f32, p[i][j], expected, epsilon = 0.0001));
                }
            }
        }
    }
}
