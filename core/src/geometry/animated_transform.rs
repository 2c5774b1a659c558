//! Animated Transformations

use super::common::*;
use super::{abs, lerp, max, Float, Matrix4x4, Quaternion, Transform, Vector3f};
use crate::error::CameraError;

/// A keyframed transformation. Keys are spaced uniformly over
/// `[start_time, end_time]` and each pair of neighbouring keys is blended by
/// interpolating the translation, rotation and scale of their decompositions
/// separately, which keeps rigid motion rigid. Times outside the window are
/// clamped to the first or last key.
#[derive(Clone, Debug)]
pub struct AnimatedTransform {
    /// Keyframe matrices.
    keys: Vec<Matrix4x4>,

    /// Decomposed keyframes; rotations are sign-adjusted so that neighbours
    /// take the shortest arc.
    components: Vec<Components>,

    /// Time of the first key.
    pub start_time: Float,

    /// Time of the last key.
    pub end_time: Float,

    /// Indicates if any two keys differ.
    actually_animated: bool,
}

/// Translation, rotation and scale making up a keyframe as `M = T·R·S`.
#[derive(Copy, Clone, Debug)]
struct Components {
    t: Vector3f,
    r: Quaternion,
    s: Matrix4x4,
}

impl AnimatedTransform {
    /// Create an animated transformation. Fails with `InvalidTransform` for
    /// no keys, a singular key or a window ending before it starts.
    ///
    /// * `keys`       - Keyframe matrices; at least one.
    /// * `start_time` - Time of the first key.
    /// * `end_time`   - Time of the last key.
    pub fn new(
        keys: Vec<Matrix4x4>,
        start_time: Float,
        end_time: Float,
    ) -> Result<Self, CameraError> {
        if keys.is_empty() {
            return Err(CameraError::InvalidTransform(String::from(
                "at least one transformation key is required",
            )));
        }
        if end_time < start_time {
            return Err(CameraError::InvalidTransform(format!(
                "motion window [{}, {}] is reversed",
                start_time, end_time
            )));
        }

        let actually_animated = keys.windows(2).any(|w| w[0] != w[1]);

        let mut components: Vec<Components> = Vec::with_capacity(keys.len());
        if actually_animated {
            for (i, m) in keys.iter().enumerate() {
                let mut c = decompose(m).ok_or_else(|| {
                    CameraError::InvalidTransform(format!("transformation key {} is singular", i))
                })?;

                // Flip the rotation if needed to select the shortest path.
                if let Some(prev) = components.last() {
                    if c.r.dot(&prev.r) < 0.0 {
                        c.r = -c.r;
                    }
                }
                components.push(c);
            }
        }

        Ok(Self {
            keys,
            components,
            start_time,
            end_time,
            actually_animated,
        })
    }

    /// Returns true if the transformation changes over time.
    pub fn is_animated(&self) -> bool {
        self.actually_animated
    }

    /// Returns the interpolated transformation matrix at the given time.
    ///
    /// * `time` - Time.
    pub fn interpolate(&self, time: Float) -> Matrix4x4 {
        let n = self.keys.len();

        // Handle boundary conditions for matrix interpolation.
        if !self.actually_animated || time <= self.start_time {
            return self.keys[0];
        }
        if time >= self.end_time {
            return self.keys[n - 1];
        }

        // Locate the segment containing `time` and map to [0, 1] within it.
        let f = (time - self.start_time) / (self.end_time - self.start_time) * (n - 1) as Float;
        let i = (f.floor() as usize).min(n - 2);
        let dt = f - i as Float;
        let (c0, c1) = (&self.components[i], &self.components[i + 1]);

        let trans = lerp(dt, c0.t, c1.t);
        let rotate = c0.r.slerp(dt, c1.r);
        let mut scale = Matrix4x4::default();
        for r in 0..3 {
            for c in 0..3 {
                scale.m[r][c] = lerp(dt, c0.s.m[r][c], c1.s.m[r][c]);
            }
        }

        Transform::translate(&trans).m * rotate.to_matrix() * scale
    }
}

/// Decomposes a transformation matrix into translation, rotation and scale
/// with `M = T·R·S`. The rotation is extracted by polar decomposition.
/// Returns `None` if the matrix is singular.
///
/// * `m` - The matrix to decompose.
fn decompose(m: &Matrix4x4) -> Option<Components> {
    // Extract translation.
    let t = Vector3f::new(m[0][3], m[1][3], m[2][3]);

    // Compute new transformation matrix M without translation.
    let mut m1 = *m;
    for i in 0..3 {
        m1.m[i][3] = 0.0;
        m1.m[3][i] = 0.0;
    }
    m1.m[3][3] = 1.0;

    // Extract rotation by averaging with the inverse transpose until the
    // series converges.
    let mut r = m1;
    for _ in 0..100 {
        let r_it = r.transpose().inverse()?;
        let mut r_next = Matrix4x4::default();
        let mut norm: Float = 0.0;
        for i in 0..4 {
            for j in 0..4 {
                r_next.m[i][j] = 0.5 * (r[i][j] + r_it[i][j]);
            }
        }
        for i in 0..3 {
            let n = abs(r[i][0] - r_next[i][0])
                + abs(r[i][1] - r_next[i][1])
                + abs(r[i][2] - r_next[i][2]);
            norm = max(norm, n);
        }
        r = r_next;
        if norm <= 0.0001 {
            break;
        }
    }

    // Compute scale using rotation and original matrix.
    let s = r.inverse()? * m1;

    Some(Components {
        t,
        r: Quaternion::from(&r),
        s,
    })
}
