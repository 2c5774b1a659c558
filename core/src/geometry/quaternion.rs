//! Quaternions

use super::common::*;
use super::{clamp, Float, Matrix4x4, Vector3f, IDENTITY_MATRIX};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A unit quaternion representing a rotation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion {
    /// The `x`, `y`, `z` components represented as a vector.
    pub v: Vector3f,

    /// The real component `w`.
    pub w: Float,
}

impl Quaternion {
    /// Create a new quaternion.
    ///
    /// * `v` - The `x`, `y`, `z` components represented as a vector.
    /// * `w` - The real component `w`.
    pub fn new(v: Vector3f, w: Float) -> Self {
        Self { v, w }
    }

    /// Returns the quaternion scaled to unit length.
    pub fn normalize(&self) -> Self {
        *self / self.dot(self).sqrt()
    }

    /// Interpolate between this and another quaternion using spherical linear
    /// interpolation.
    ///
    /// * `t` - The interpolation parameter.
    /// * `q` - The other quaternion.
    pub fn slerp(&self, t: Float, q: Self) -> Self {
        let cos_theta = self.dot(&q);
        if cos_theta > 0.9995 {
            // Nearly parallel; the orthogonal quaternion is ill-defined.
            ((1.0 - t) * *self + t * q).normalize()
        } else {
            let theta = clamp(cos_theta, -1.0, 1.0).acos();
            let thetap = theta * t;
            let qperp = (q - *self * cos_theta).normalize();
            *self * thetap.cos() + qperp * thetap.sin()
        }
    }

    /// Returns the rotation matrix for this quaternion.
    pub fn to_matrix(&self) -> Matrix4x4 {
        let (x, y, z, w) = (self.v.x, self.v.y, self.v.z, self.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (x * w, y * w, z * w);

        let mut m = IDENTITY_MATRIX;
        m.m[0][0] = 1.0 - 2.0 * (yy + zz);
        m.m[0][1] = 2.0 * (xy - wz);
        m.m[0][2] = 2.0 * (xz + wy);
        m.m[1][0] = 2.0 * (xy + wz);
        m.m[1][1] = 1.0 - 2.0 * (xx + zz);
        m.m[1][2] = 2.0 * (yz - wx);
        m.m[2][0] = 2.0 * (xz - wy);
        m.m[2][1] = 2.0 * (yz + wx);
        m.m[2][2] = 1.0 - 2.0 * (xx + yy);
        m
    }
}

impl Default for Quaternion {
    /// Returns the identity rotation [0, 0, 0, 1].
    fn default() -> Self {
        Self {
            v: Vector3f::zero(),
            w: 1.0,
        }
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.v.x, self.v.y, self.v.z, self.w)
    }
}

impl From<&Matrix4x4> for Quaternion {
    /// Returns the quaternion for the rotation held in the upper 3x3 block of
    /// a matrix. The block must be a proper rotation.
    ///
    /// * `m` - The matrix.
    fn from(m: &Matrix4x4) -> Self {
        let trace = m[0][0] + m[1][1] + m[2][2];
        if trace > 0.0 {
            let s = (trace + 1.0).sqrt();
            let w = s / 2.0;
            let s = 0.5 / s;
            Self::new(
                Vector3f::new(
                    (m[2][1] - m[1][2]) * s,
                    (m[0][2] - m[2][0]) * s,
                    (m[1][0] - m[0][1]) * s,
                ),
                w,
            )
        } else {
            // Compute largest of x, y, or z, then the remaining components.
            let nxt = [1, 2, 0];
            let mut q = [0.0; 3];

            let mut i = 0;
            if m[1][1] > m[0][0] {
                i = 1;
            }
            if m[2][2] > m[i][i] {
                i = 2;
            }
            let j = nxt[i];
            let k = nxt[j];

            let mut s = ((m[i][i] - (m[j][j] + m[k][k])) + 1.0).sqrt();
            q[i] = s * 0.5;
            if s != 0.0 {
                s = 0.5 / s;
            }
            let w = (m[k][j] - m[j][k]) * s;
            q[j] = (m[j][i] + m[i][j]) * s;
            q[k] = (m[k][i] + m[i][k]) * s;

            Self::new(Vector3f::new(q[0], q[1], q[2]), w)
        }
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.v + other.v, self.w + other.w)
    }
}

impl Sub for Quaternion {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.v - other.v, self.w - other.w)
    }
}

impl Mul<Float> for Quaternion {
    type Output = Self;

    fn mul(self, f: Float) -> Self::Output {
        Self::new(self.v * f, self.w * f)
    }
}

impl Mul<Quaternion> for Float {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Self::Output {
        q * self
    }
}

impl Div<Float> for Quaternion {
    type Output = Self;

    fn div(self, f: Float) -> Self::Output {
        Self::new(self.v / f, self.w / f)
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.v, -self.w)
    }
}

impl Dot<Quaternion> for Quaternion {
    type Output = Float;

    /// Returns the inner product with another quaternion.
    ///
    /// * `other` - The other quaternion.
    fn dot(&self, other: &Quaternion) -> Float {
        self.v.dot(&other.v) + self.w * other.w
    }
}
