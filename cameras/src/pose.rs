//! Transform Resolver

use camera_core::camera::*;
use camera_core::error::*;
use camera_core::geometry::*;
use camera_core::pbrt::*;

/// Resolves the camera pose at a scene time from keyframed camera-to-world
/// transformations spread over the motion window.
#[derive(Clone, Debug)]
pub struct TransformResolver {
    /// Right-handed camera-to-world keys over the motion window.
    camera_to_world: AnimatedTransform,

    /// Pose used when the camera does not move.
    static_pose: Option<CameraPose>,

    /// Handedness of the screen axes.
    handedness: Handedness,
}

impl TransformResolver {
    /// Creates a resolver from `position`, `look_at` and `up` keys. Lists of
    /// different lengths are padded by repeating their last entry; an empty
    /// list uses the default camera placement. Degenerate keys fall back to
    /// an arbitrary perpendicular up vector.
    ///
    /// * `positions`    - Camera position keys.
    /// * `look_ats`     - Look-at point keys.
    /// * `ups`          - Up vector keys.
    /// * `handedness`   - Handedness of the screen axes.
    /// * `motion_start` - Time of the first key.
    /// * `motion_end`   - Time of the last key.
    pub fn from_vectors(
        positions: &[Point3f],
        look_ats: &[Point3f],
        ups: &[Vector3f],
        handedness: Handedness,
        motion_start: Float,
        motion_end: Float,
    ) -> Result<Self, CameraError> {
        let default = CameraPose::default();
        let n = positions.len().max(look_ats.len()).max(ups.len()).max(1);
        let key = |values: &[Point3f], i: usize, fallback: Point3f| {
            values.get(i).or(values.last()).copied().unwrap_or(fallback)
        };

        let poses: Vec<CameraPose> = (0..n)
            .map(|i| {
                let position = key(positions, i, default.position);
                let look_at = key(look_ats, i, default.position + default.forward);
                let up = ups.get(i).or(ups.last()).copied().unwrap_or(default.up);
                Self::resolve_look_at(&position, &look_at, &up, handedness)
            })
            .collect();

        let static_pose = if poses.windows(2).all(|w| w[0] == w[1]) {
            Some(poses[0])
        } else {
            None
        };

        let keys = poses.iter().map(|pose| pose.to_matrix()).collect();
        let (motion_start, motion_end) = motion_window(motion_start, motion_end);
        Ok(Self {
            camera_to_world: AnimatedTransform::new(keys, motion_start, motion_end)?,
            static_pose,
            handedness,
        })
    }

    /// Creates a resolver from camera-to-world matrix keys whose columns are
    /// the camera's `+x`, `+y`, `+z` axes and position. Fails with
    /// `InvalidTransform` when there are no keys or a key is singular or
    /// mirrored; use `handedness` to mirror the image instead.
    ///
    /// * `keys`         - Camera-to-world matrix keys.
    /// * `handedness`   - Handedness of the screen axes.
    /// * `motion_start` - Time of the first key.
    /// * `motion_end`   - Time of the last key.
    pub fn from_matrices(
        keys: &[Matrix4x4],
        handedness: Handedness,
        motion_start: Float,
        motion_end: Float,
    ) -> Result<Self, CameraError> {
        for (i, m) in keys.iter().enumerate() {
            let det = m.determinant3x3();
            if det.is_nan() || det.abs() < 1e-12 {
                return Err(CameraError::InvalidTransform(format!(
                    "matrix key {} is singular",
                    i
                )));
            }
            if det < 0.0 {
                return Err(CameraError::InvalidTransform(format!(
                    "matrix key {} is mirrored",
                    i
                )));
            }
        }

        let (motion_start, motion_end) = motion_window(motion_start, motion_end);
        let camera_to_world = AnimatedTransform::new(keys.to_vec(), motion_start, motion_end)?;
        let static_pose = if camera_to_world.is_animated() {
            None
        } else {
            Some(CameraPose::from_matrix(&keys[0], handedness))
        };

        Ok(Self {
            camera_to_world,
            static_pose,
            handedness,
        })
    }

    /// Builds a pose with `CameraPose::look_at()`, recovering from a
    /// degenerate basis. Coincident points look down `-z`; an up vector
    /// parallel to the view direction is replaced by the coordinate axis
    /// least aligned with it.
    ///
    /// * `position`   - Camera position.
    /// * `look_at`    - Point the camera looks at.
    /// * `up`         - Approximate up direction.
    /// * `handedness` - Handedness of the screen axes.
    pub fn resolve_look_at(
        position: &Point3f,
        look_at: &Point3f,
        up: &Vector3f,
        handedness: Handedness,
    ) -> CameraPose {
        CameraPose::look_at(position, look_at, up, handedness).unwrap_or_else(|err| {
            warn!("{}. Using a fallback basis.", err);

            let dir = *look_at - *position;
            let forward = if dir.length_squared() > 0.0 {
                dir.normalize()
            } else {
                CameraPose::default().forward
            };
            let target = *position + forward;

            CameraPose::look_at(position, &target, up, handedness)
                .or_else(|_| {
                    CameraPose::look_at(position, &target, &perpendicular(&forward), handedness)
                })
                .unwrap_or(CameraPose {
                    position: *position,
                    ..CameraPose::default()
                })
        })
    }

    /// Returns the camera pose at a scene time. Times outside the motion
    /// window are clamped to it.
    ///
    /// * `time` - Scene time.
    pub fn pose_at(&self, time: Float) -> CameraPose {
        match self.static_pose {
            Some(pose) => pose,
            None => CameraPose::from_matrix(
                &self.camera_to_world.interpolate(self.clamp_time(time)),
                self.handedness,
            ),
        }
    }

    /// Clamps a scene time into the motion window.
    ///
    /// * `time` - Scene time.
    pub fn clamp_time(&self, time: Float) -> Float {
        clamp(
            time,
            self.camera_to_world.start_time,
            self.camera_to_world.end_time,
        )
    }

    /// Returns true if the pose changes over the motion window.
    pub fn is_animated(&self) -> bool {
        self.static_pose.is_none()
    }
}

/// Returns the motion window in increasing order, swapping reversed times.
///
/// * `start` - Time of the first key.
/// * `end`   - Time of the last key.
fn motion_window(start: Float, end: Float) -> (Float, Float) {
    if end < start {
        warn!(
            "Motion end [{}] < motion start [{}]. Swapping them.",
            end, start
        );
        (end, start)
    } else {
        (start, end)
    }
}

/// Returns the unit coordinate axis least aligned with `v`.
///
/// * `v` - The vector.
fn perpendicular(v: &Vector3f) -> Vector3f {
    match v.min_abs_dimension() {
        0 => Vector3f::new(1.0, 0.0, 0.0),
        1 => Vector3f::new(0.0, 1.0, 0.0),
        _ => Vector3f::new(0.0, 0.0, 1.0),
    }
}
