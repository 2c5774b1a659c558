//! Camera Parameters

use super::shutter::*;
use camera_core::camera::*;
use camera_core::geometry::*;
use camera_core::paramset::*;
use camera_core::pbrt::*;
use std::mem::swap;

/// Immutable snapshot of every perspective camera parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraParams {
    /// Camera position keys.
    pub position: Vec<Point3f>,

    /// Look-at point keys.
    pub look_at: Vec<Point3f>,

    /// Up vector keys.
    pub up: Vec<Vector3f>,

    /// Handedness of the screen axes.
    pub handedness: Handedness,

    /// Camera-to-world matrix keys. Any non-identity key overrides the
    /// position, look-at and up keys.
    pub matrix: Vec<Matrix4x4>,

    /// Distance to the near clipping plane.
    pub near_clip: Float,

    /// Distance to the far clipping plane.
    pub far_clip: Float,

    /// Lower corner of the visible screen region.
    pub screen_window_min: Point2f,

    /// Upper corner of the visible screen region.
    pub screen_window_max: Point2f,

    /// Width divided by height of the frame.
    pub frame_aspect_ratio: Float,

    /// Horizontal field of view in degrees.
    pub fov: Float,

    /// Measure the field of view at the focus distance.
    pub plane_distance: bool,

    /// Distance to the plane of focus.
    pub focus_distance: Float,

    /// Focus on a plane instead of a sphere around the camera.
    pub flat_field_focus: bool,

    /// Radius of the aperture; 0 for a pinhole.
    pub aperture_size: Float,

    /// Number of aperture blades; 0 for a circular aperture.
    pub aperture_blades: Int,

    /// Rotation of the aperture blades in degrees.
    pub aperture_rotation: Float,

    /// Bowing of the blade edges in [0, 1].
    pub aperture_blade_curvature: Float,

    /// Vertical stretch of the aperture.
    pub aperture_aspect_ratio: Float,

    /// Radial distortion coefficient.
    pub radial_distortion: Float,

    /// Film sub-rectangle `[u_min, v_min, u_max, v_max]`; zero for none.
    pub uv_remap: [Float; 4],

    /// Time the shutter opens.
    pub shutter_start: Float,

    /// Time the shutter closes.
    pub shutter_end: Float,

    /// Distribution of samples over the shutter interval.
    pub shutter_type: ShutterType,

    /// Control points of the shutter density.
    pub shutter_curve: Vec<Point2f>,

    /// Rolling shutter direction.
    pub rolling_shutter: RollingShutter,

    /// Exposure fraction per scanline.
    pub rolling_shutter_duration: Float,

    /// Time of the first transformation key.
    pub motion_start: Float,

    /// Time of the last transformation key.
    pub motion_end: Float,
}

impl CameraParams {
    /// Returns the screen window bounds.
    pub fn screen_window(&self) -> Bounds2f {
        Bounds2f {
            p_min: self.screen_window_min,
            p_max: self.screen_window_max,
        }
    }

    /// Returns true if the matrix keys override the position, look-at and up
    /// keys.
    pub fn uses_matrix(&self) -> bool {
        self.matrix.iter().any(|m| !m.is_identity())
    }
}

impl Default for CameraParams {
    /// Returns the node defaults.
    fn default() -> Self {
        Self {
            position: vec![Point3f::new(0.0, 0.0, 0.0)],
            look_at: vec![Point3f::new(0.0, 0.0, -1.0)],
            up: vec![Vector3f::new(0.0, 1.0, 0.0)],
            handedness: Handedness::Right,
            matrix: vec![IDENTITY_MATRIX],
            near_clip: 1e-4,
            far_clip: 1e30,
            screen_window_min: Point2f::new(-1.0, -1.0),
            screen_window_max: Point2f::new(1.0, 1.0),
            frame_aspect_ratio: 1.0,
            fov: 90.0,
            plane_distance: true,
            focus_distance: 1.0,
            flat_field_focus: true,
            aperture_size: 0.0,
            aperture_blades: 0,
            aperture_rotation: 0.0,
            aperture_blade_curvature: 0.0,
            aperture_aspect_ratio: 1.0,
            radial_distortion: 0.0,
            uv_remap: [0.0; 4],
            shutter_start: 0.0,
            shutter_end: 0.0,
            shutter_type: ShutterType::Box,
            shutter_curve: vec![],
            rolling_shutter: RollingShutter::Off,
            rolling_shutter_duration: 0.0,
            motion_start: 0.0,
            motion_end: 1.0,
        }
    }
}

/// Returns a float parameter, trying each name in turn.
///
/// * `params`  - Parameter set.
/// * `names`   - Parameter names in order of preference.
/// * `default` - Value used when no name is present.
fn find_one_float(params: &ParamSet, names: &[&str], default: Float) -> Float {
    names
        .iter()
        .find(|name| params.floats.contains_key(**name))
        .map_or(default, |name| params.find_one_float(name, default))
}

/// Returns an enumerated string parameter parsed with `parse`, falling back
/// to `default` for unknown values.
///
/// * `params`  - Parameter set.
/// * `name`    - Parameter name.
/// * `default` - Value used when the parameter is absent or unknown.
/// * `parse`   - Parses a parameter value.
fn find_one_enum<T: Copy>(
    params: &ParamSet,
    name: &str,
    default: T,
    parse: fn(&str) -> Option<T>,
) -> T {
    let value = params.find_one_string(name, String::new());
    if value.is_empty() {
        return default;
    }
    parse(&value).unwrap_or_else(|| {
        error!("Unknown '{}' value '{}'. Using default.", name, value);
        default
    })
}

impl From<&ParamSet> for CameraParams {
    /// Create `CameraParams` from a parameter set. Missing parameters take
    /// the node defaults; parameters that were never read are reported.
    ///
    /// * `params` - Parameter set.
    fn from(params: &ParamSet) -> Self {
        let defaults = Self::default();

        let or_default = |values: Vec<Point3f>, default: &Vec<Point3f>| {
            if values.is_empty() {
                default.clone()
            } else {
                values
            }
        };
        let position = or_default(params.find_point3f("position"), &defaults.position);
        let look_at = or_default(params.find_point3f("look_at"), &defaults.look_at);
        let mut up = params.find_vector3f("up");
        if up.is_empty() {
            up = defaults.up.clone();
        }

        let handedness =
            find_one_enum(params, "handedness", defaults.handedness, Handedness::from_name);

        let mut matrix = defaults.matrix.clone();
        let m = params.find_float("matrix");
        if !m.is_empty() {
            if m.len() % 16 == 0 {
                matrix = m.chunks(16).filter_map(Matrix4x4::from_slice).collect();
            } else {
                error!("'matrix' should have a multiple of 16 values");
            }
        }

        let near_clip = params.find_one_float("near_clip", defaults.near_clip);
        let far_clip = params.find_one_float("far_clip", defaults.far_clip);

        let mut screen_window_min =
            params.find_one_point2f("screen_window_min", defaults.screen_window_min);
        let mut screen_window_max =
            params.find_one_point2f("screen_window_max", defaults.screen_window_max);
        let sw = if params.floats.contains_key("screen_window") {
            params.find_float("screen_window")
        } else {
            params.find_float("screenwindow")
        };
        if !sw.is_empty() {
            if sw.len() == 4 {
                screen_window_min = Point2f::new(sw[0], sw[2]);
                screen_window_max = Point2f::new(sw[1], sw[3]);
            } else {
                error!("'screen_window' should have four values");
            }
        }

        let frame_aspect_ratio = find_one_float(
            params,
            &["frame_aspect_ratio", "frameaspectratio"],
            defaults.frame_aspect_ratio,
        );

        let mut fov = params.find_one_float("fov", defaults.fov);
        let half_fov = params.find_one_float("halffov", -1.0);
        if half_fov > 0.0 {
            // Some exporters write half of the full fov.
            fov = 2.0 * half_fov;
        }

        let mut shutter_start = find_one_float(
            params,
            &["shutter_start", "shutteropen"],
            defaults.shutter_start,
        );
        let mut shutter_end =
            find_one_float(params, &["shutter_end", "shutterclose"], defaults.shutter_end);
        if shutter_end < shutter_start {
            warn!(
                "Shutter end [{}] < shutter start [{}]. Swapping them.",
                shutter_end, shutter_start
            );
            swap(&mut shutter_start, &mut shutter_end);
        }

        let mut motion_start = params.find_one_float("motion_start", defaults.motion_start);
        let mut motion_end = params.find_one_float("motion_end", defaults.motion_end);
        if motion_end < motion_start {
            warn!(
                "Motion end [{}] < motion start [{}]. Swapping them.",
                motion_end, motion_start
            );
            swap(&mut motion_start, &mut motion_end);
        }

        let mut uv_remap = defaults.uv_remap;
        let uv = params.find_float("uv_remap");
        if !uv.is_empty() {
            if uv.len() == 4 {
                uv_remap.copy_from_slice(&uv);
            } else {
                error!("'uv_remap' should have four values");
            }
        }

        let camera_params = Self {
            position,
            look_at,
            up,
            handedness,
            matrix,
            near_clip,
            far_clip,
            screen_window_min,
            screen_window_max,
            frame_aspect_ratio,
            fov,
            plane_distance: params.find_one_bool("plane_distance", defaults.plane_distance),
            focus_distance: find_one_float(
                params,
                &["focus_distance", "focaldistance"],
                defaults.focus_distance,
            ),
            flat_field_focus: params.find_one_bool("flat_field_focus", defaults.flat_field_focus),
            aperture_size: find_one_float(
                params,
                &["aperture_size", "lensradius"],
                defaults.aperture_size,
            ),
            aperture_blades: params.find_one_int("aperture_blades", defaults.aperture_blades),
            aperture_rotation: params
                .find_one_float("aperture_rotation", defaults.aperture_rotation),
            aperture_blade_curvature: params.find_one_float(
                "aperture_blade_curvature",
                defaults.aperture_blade_curvature,
            ),
            aperture_aspect_ratio: params
                .find_one_float("aperture_aspect_ratio", defaults.aperture_aspect_ratio),
            radial_distortion: params
                .find_one_float("radial_distortion", defaults.radial_distortion),
            uv_remap,
            shutter_start,
            shutter_end,
            shutter_type: find_one_enum(
                params,
                "shutter_type",
                defaults.shutter_type,
                ShutterType::from_name,
            ),
            shutter_curve: params.find_point2f("shutter_curve"),
            rolling_shutter: find_one_enum(
                params,
                "rolling_shutter",
                defaults.rolling_shutter,
                RollingShutter::from_name,
            ),
            rolling_shutter_duration: params
                .find_one_float("rolling_shutter_duration", defaults.rolling_shutter_duration),
            motion_start,
            motion_end,
        };

        params.report_unused();
        camera_params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_paramset_gives_defaults() {
        assert_eq!(CameraParams::from(&ParamSet::new()), CameraParams::default());
        assert!(!CameraParams::default().uses_matrix());
    }

    #[test]
    fn node_parameters_are_read() {
        let mut ps = ParamSet::new();
        ps.add_point3f("position", &[Point3f::new(1.0, 2.0, 3.0)]);
        ps.add_string("handedness", &[String::from("left")]);
        ps.add_float("fov", &[45.0]);
        ps.add_int("aperture_blades", &[6]);
        ps.add_bool("flat_field_focus", &[false]);
        ps.add_string("shutter_type", &[String::from("curve")]);
        ps.add_point2f(
            "shutter_curve",
            &[Point2f::new(0.0, 0.0), Point2f::new(1.0, 1.0)],
        );
        ps.add_string("rolling_shutter", &[String::from("bottom")]);
        ps.add_float("uv_remap", &[0.0, 0.0, 0.5, 0.5]);

        let p = CameraParams::from(&ps);
        assert_eq!(p.position, vec![Point3f::new(1.0, 2.0, 3.0)]);
        assert_eq!(p.handedness, Handedness::Left);
        assert_eq!(p.fov, 45.0);
        assert_eq!(p.aperture_blades, 6);
        assert!(!p.flat_field_focus);
        assert_eq!(p.shutter_type, ShutterType::Curve);
        assert_eq!(p.shutter_curve.len(), 2);
        assert_eq!(p.rolling_shutter, RollingShutter::Bottom);
        assert_eq!(p.uv_remap, [0.0, 0.0, 0.5, 0.5]);
        assert!(ps.unused().is_empty());
    }

    #[test]
    fn pbrt_aliases_are_read() {
        let mut ps = ParamSet::new();
        ps.add_float("shutteropen", &[0.25]);
        ps.add_float("shutterclose", &[0.75]);
        ps.add_float("lensradius", &[0.1]);
        ps.add_float("focaldistance", &[7.0]);
        ps.add_float("frameaspectratio", &[1.5]);
        ps.add_float("halffov", &[30.0]);
        ps.add_float("screenwindow", &[-2.0, 2.0, -1.0, 1.0]);

        let p = CameraParams::from(&ps);
        assert_eq!(p.shutter_start, 0.25);
        assert_eq!(p.shutter_end, 0.75);
        assert_eq!(p.aperture_size, 0.1);
        assert_eq!(p.focus_distance, 7.0);
        assert_eq!(p.frame_aspect_ratio, 1.5);
        assert_eq!(p.fov, 60.0);
        assert_eq!(p.screen_window_min, Point2f::new(-2.0, -1.0));
        assert_eq!(p.screen_window_max, Point2f::new(2.0, 1.0));
    }

    #[test]
    fn reversed_shutter_is_swapped() {
        let mut ps = ParamSet::new();
        ps.add_float("shutter_start", &[1.0]);
        ps.add_float("shutter_end", &[0.5]);
        let p = CameraParams::from(&ps);
        assert_eq!(p.shutter_start, 0.5);
        assert_eq!(p.shutter_end, 1.0);
    }

    #[test]
    fn reversed_motion_window_is_swapped() {
        let mut ps = ParamSet::new();
        ps.add_float("motion_start", &[1.0]);
        ps.add_float("motion_end", &[0.0]);
        let p = CameraParams::from(&ps);
        assert_eq!(p.motion_start, 0.0);
        assert_eq!(p.motion_end, 1.0);
    }

    #[test]
    fn matrix_keys() {
        let mut ps = ParamSet::new();
        let mut values = vec![];
        let t = Transform::translate(&Vector3f::new(1.0, 0.0, 0.0)).m;
        for m in [IDENTITY_MATRIX, t] {
            for row in m.m.iter() {
                values.extend_from_slice(row);
            }
        }
        ps.add_float("matrix", &values);

        let p = CameraParams::from(&ps);
        assert_eq!(p.matrix, vec![IDENTITY_MATRIX, t]);
        assert!(p.uses_matrix());
    }

    #[test]
    fn malformed_lists_are_ignored() {
        let mut ps = ParamSet::new();
        ps.add_float("matrix", &[1.0; 15]);
        ps.add_float("uv_remap", &[0.5; 3]);
        ps.add_float("screen_window", &[0.0; 2]);
        ps.add_string("shutter_type", &[String::from("gaussian")]);

        let p = CameraParams::from(&ps);
        let d = CameraParams::default();
        assert_eq!(p.matrix, d.matrix);
        assert_eq!(p.uv_remap, d.uv_remap);
        assert_eq!(p.screen_window(), d.screen_window());
        assert_eq!(p.shutter_type, ShutterType::Box);
    }
}
