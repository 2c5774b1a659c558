//! Perspective Camera

use super::distortion::*;
use super::lens::*;
use super::params::*;
use super::pose::*;
use super::projection::*;
use super::shutter::*;
use camera_core::camera::*;
use camera_core::error::*;
use camera_core::geometry::*;
use camera_core::pbrt::*;

/// Perspective camera with depth of field, motion blur, rolling shutter and
/// lens distortion. Immutable once built; share it between threads freely.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    /// Parameters the camera was built from.
    pub params: CameraParams,

    /// Camera placement over the motion window.
    transform: TransformResolver,

    /// Maps time samples to scene time.
    shutter: ShutterSampler,

    /// Maps screen space to camera space directions.
    projection: ProjectionMapper,

    /// Screen space distortion.
    distortion: LensDistortion,

    /// Depth of field.
    lens: LensSampler,

    /// Distance to the focal surface, at least the near clipping distance.
    focus_distance: Float,
}

impl PerspectiveCamera {
    /// Create a new perspective camera.
    ///
    /// * `params` - Camera parameters.
    pub fn new(params: &CameraParams) -> Result<Self, CameraError> {
        let mut focus_distance = params.focus_distance;
        if !(focus_distance >= params.near_clip) {
            warn!(
                "Focus distance {} is closer than the near clip {}. Using {}.",
                focus_distance, params.near_clip, params.near_clip
            );
            focus_distance = params.near_clip;
        }

        let shutter = ShutterSampler::new(
            params.shutter_start,
            params.shutter_end,
            params.shutter_type,
            &params.shutter_curve,
            params.rolling_shutter,
            params.rolling_shutter_duration,
        )?;

        let transform = if params.uses_matrix() {
            TransformResolver::from_matrices(
                &params.matrix,
                params.handedness,
                params.motion_start,
                params.motion_end,
            )?
        } else {
            TransformResolver::from_vectors(
                &params.position,
                &params.look_at,
                &params.up,
                params.handedness,
                params.motion_start,
                params.motion_end,
            )?
        };

        let projection = ProjectionMapper::new(
            params.fov,
            params.screen_window(),
            params.frame_aspect_ratio,
            params.plane_distance,
            focus_distance,
            params.near_clip,
            params.far_clip,
        )?;

        let aperture = Aperture::new(
            params.aperture_size,
            params.aperture_blades,
            params.aperture_rotation,
            params.aperture_blade_curvature,
            params.aperture_aspect_ratio,
        )?;

        debug!(
            "Perspective camera: fov {}, half extent {}, aperture {}, focus {}, shutter [{}, {}], animated {}",
            params.fov,
            projection.half_extent,
            aperture.size,
            focus_distance,
            shutter.shutter_start,
            shutter.shutter_end,
            transform.is_animated(),
        );

        Ok(Self {
            params: params.clone(),
            transform,
            shutter,
            projection,
            distortion: LensDistortion::new(params.radial_distortion, params.uv_remap),
            lens: LensSampler::new(aperture, params.flat_field_focus),
            focus_distance,
        })
    }

    /// Returns the distance to the focal surface actually used.
    pub fn focus_distance(&self) -> Float {
        self.focus_distance
    }

    /// Returns the visible region of screen space.
    pub fn screen_window(&self) -> Bounds2f {
        self.projection.screen_window
    }

    /// Returns the shutter sampler.
    pub fn shutter(&self) -> &ShutterSampler {
        &self.shutter
    }

    /// Maps a raster position to screen space. Raster space spans
    /// `[0, resolution]` with `y` pointing down.
    ///
    /// * `p_raster`   - Raster position.
    /// * `resolution` - Image resolution in pixels.
    pub fn raster_to_screen(&self, p_raster: &Point2f, resolution: &Point2u) -> Point2f {
        self.projection.raster_to_screen(p_raster, resolution)
    }

    /// Returns the scene time for a film position and time sample, including
    /// the rolling shutter offset of the film position's scanline.
    ///
    /// * `p_film` - Point on the film in screen space.
    /// * `u`      - Time sample in [0, 1].
    pub fn sample_time(&self, p_film: &Point2f, u: Float) -> Float {
        let offset = self.projection.window_offset(p_film);
        match self.shutter.rolling_shutter.line_position(&offset) {
            Some(line) => self.shutter.sample_time_at_line(u, line),
            None => self.shutter.sample_time(u),
        }
    }
}

impl Camera for PerspectiveCamera {
    /// Returns the camera placement at a given scene time.
    ///
    /// * `time` - Scene time.
    fn pose_at(&self, time: Float) -> CameraPose {
        self.transform.pose_at(time)
    }

    /// Returns a world space ray corresponding to a given sample.
    ///
    /// * `sample` - The sample.
    fn generate_ray(&self, sample: &CameraSample) -> Ray {
        let time = self.sample_time(&sample.p_film, sample.time);
        let pose = self.transform.pose_at(time);

        // Compute the pinhole direction through the distorted film position.
        let s = self
            .distortion
            .apply(&sample.p_film, &self.projection.screen_window);
        let dir = self.projection.screen_to_camera_dir(&s);

        // Modify ray for depth of field.
        let (offset, d) = self.lens.perturb(&dir, self.focus_distance, &sample.p_lens);
        let (t_min, t_max) = self.projection.ray_extent(&d);

        Ray::new(
            pose.camera_to_world_point(&Point3f::from(offset)),
            pose.camera_to_world_vector(&d),
            t_min,
            t_max,
            time,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;
    use std::sync::Arc;
    use std::thread;

    fn camera(params: CameraParams) -> PerspectiveCamera {
        PerspectiveCamera::new(&params).unwrap()
    }

    fn sample(x: Float, y: Float) -> CameraSample {
        CameraSample::new(Point2f::new(x, y), Point2f::new(0.3, 0.8), 0.5)
    }

    #[test]
    fn default_camera_looks_down_negative_z() {
        let c = camera(CameraParams::default());
        let r = c.generate_ray(&sample(0.0, 0.0));
        assert_eq!(r.o, Point3f::zero());
        assert_eq!(r.d, Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(r.time, 0.0);
        assert!(approx_eq!(f32, r.t_min, 1e-4, epsilon = 1e-9));
        assert!(approx_eq!(f32, r.t_max, 1e30, ulps = 4));
    }

    #[test]
    fn pose_round_trip() {
        let pose = camera(CameraParams::default()).pose_at(0.0);
        assert_eq!(pose.forward, Vector3f::new(0.0, 0.0, -1.0));
        assert_eq!(pose.right, Vector3f::new(1.0, 0.0, 0.0));
        assert_eq!(pose.up, Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn configuration_errors_surface() {
        let mut p = CameraParams::default();
        p.aperture_blades = 2;
        assert!(matches!(
            PerspectiveCamera::new(&p),
            Err(CameraError::InvalidAperture(_))
        ));

        let mut p = CameraParams::default();
        p.shutter_type = ShutterType::Curve;
        assert!(matches!(
            PerspectiveCamera::new(&p),
            Err(CameraError::InvalidCurve(_))
        ));

        let mut p = CameraParams::default();
        p.fov = 200.0;
        assert!(matches!(
            PerspectiveCamera::new(&p),
            Err(CameraError::InvalidProjection(_))
        ));

        let mut p = CameraParams::default();
        p.matrix = vec![Transform::scale(1.0, 1.0, -1.0).m];
        assert!(matches!(
            PerspectiveCamera::new(&p),
            Err(CameraError::InvalidTransform(_))
        ));
    }

    #[test]
    fn degenerate_basis_is_recovered() {
        let mut p = CameraParams::default();
        p.look_at = vec![Point3f::new(0.0, 5.0, 0.0)];
        let c = camera(p);
        let r = c.generate_ray(&sample(0.0, 0.0));
        assert!(!r.has_nans());
        assert!(approx_eq!(f32, r.d.y, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn focus_distance_is_clamped_to_near_clip() {
        let mut p = CameraParams::default();
        p.near_clip = 0.5;
        p.focus_distance = 0.1;
        assert_eq!(camera(p).focus_distance(), 0.5);
    }

    #[test]
    fn camera_placement_is_applied() {
        let mut p = CameraParams::default();
        p.position = vec![Point3f::new(1.0, 2.0, 3.0)];
        p.look_at = vec![Point3f::new(1.0, 2.0, 13.0)];
        let c = camera(p);
        let r = c.generate_ray(&sample(0.0, 0.0));
        assert_eq!(r.o, Point3f::new(1.0, 2.0, 3.0));
        assert!(approx_eq!(f32, r.d.z, 1.0, epsilon = 1e-6));

        // Looking down +z with +y up puts screen right at -x.
        let r = c.generate_ray(&sample(1.0, 0.0));
        assert!(r.d.x < 0.0);
    }

    #[test]
    fn motion_blur_uses_shutter_time() {
        let mut p = CameraParams::default();
        p.position = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(10.0, 0.0, 0.0)];
        p.look_at = vec![Point3f::new(0.0, 0.0, -1.0), Point3f::new(10.0, 0.0, -1.0)];
        p.shutter_start = 0.25;
        p.shutter_end = 0.75;
        let c = camera(p);

        let at = |u| {
            c.generate_ray(&CameraSample::new(Point2f::zero(), Point2f::zero(), u))
        };
        let r0 = at(0.0);
        let r1 = at(1.0);
        assert_eq!(r0.time, 0.25);
        assert_eq!(r1.time, 0.75);
        assert!(approx_eq!(f32, r0.o.x, 2.5, epsilon = 1e-4));
        assert!(approx_eq!(f32, r1.o.x, 7.5, epsilon = 1e-4));
    }

    #[test]
    fn motion_window_clamps_shutter_time() {
        let mut p = CameraParams::default();
        p.position = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(10.0, 0.0, 0.0)];
        p.look_at = vec![Point3f::new(0.0, 0.0, -1.0), Point3f::new(10.0, 0.0, -1.0)];
        p.shutter_start = -1.0;
        p.shutter_end = 2.0;
        let c = camera(p);

        let r = c.generate_ray(&CameraSample::new(Point2f::zero(), Point2f::zero(), 1.0));
        assert_eq!(r.time, 2.0);
        assert!(approx_eq!(f32, r.o.x, 10.0, epsilon = 1e-4));
    }

    #[test]
    fn reversed_motion_window_still_moves() {
        let mut p = CameraParams::default();
        p.position = vec![Point3f::new(0.0, 0.0, 0.0), Point3f::new(10.0, 0.0, 0.0)];
        p.look_at = vec![Point3f::new(0.0, 0.0, -1.0), Point3f::new(10.0, 0.0, -1.0)];
        p.motion_start = 1.0;
        p.motion_end = 0.0;
        p.shutter_end = 1.0;
        let c = camera(p);

        let xs: Vec<Float> = [0.0, 0.5, 1.0]
            .iter()
            .map(|u| c.generate_ray(&CameraSample::new(Point2f::zero(), Point2f::zero(), *u)).o.x)
            .collect();
        assert!(approx_eq!(f32, xs[0], 0.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, xs[1], 5.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, xs[2], 10.0, epsilon = 1e-4));
    }

    #[test]
    fn rolling_shutter_depends_on_scanline() {
        let mut p = CameraParams::default();
        p.shutter_end = 1.0;
        p.rolling_shutter = RollingShutter::Top;
        let c = camera(p);
        let top = c.generate_ray(&CameraSample::new(Point2f::new(0.0, 1.0), Point2f::zero(), 0.5));
        let bottom =
            c.generate_ray(&CameraSample::new(Point2f::new(0.0, -1.0), Point2f::zero(), 0.5));
        assert_eq!(top.time, 0.0);
        assert_eq!(bottom.time, 1.0);
    }

    #[test]
    fn rays_span_clipping_planes() {
        let mut p = CameraParams::default();
        p.near_clip = 1.0;
        p.far_clip = 100.0;
        p.aperture_size = 0.2;
        p.focus_distance = 5.0;
        let c = camera(p);
        let r = c.generate_ray(&sample(0.7, -0.4));
        assert!(approx_eq!(f32, r.at(r.t_min).z, -1.0, epsilon = 1e-4));
        assert!(approx_eq!(f32, r.at(r.t_max).z, -100.0, epsilon = 1e-2));
    }

    #[test]
    fn differentials_follow_screen_shift() {
        let c = camera(CameraParams::default());
        let s = sample(0.1, 0.2);
        let r = c.generate_ray_differential(&s);
        let rd = r.differentials.unwrap();
        assert_eq!(r.d, c.generate_ray(&s).d);
        assert!(rd.rx_direction.x > r.d.x);
        assert!(rd.ry_direction.y > r.d.y);
        assert_eq!(rd.rx_origin, r.o);
    }

    #[test]
    fn radial_distortion_moves_off_center_rays() {
        let mut p = CameraParams::default();
        p.radial_distortion = 0.2;
        let distorted = camera(p);
        let plain = camera(CameraParams::default());
        let s = sample(0.5, 0.5);
        assert!(distorted.generate_ray(&s).d.x > plain.generate_ray(&s).d.x);
        assert_eq!(
            distorted.generate_ray(&sample(0.0, 0.0)).d,
            plain.generate_ray(&sample(0.0, 0.0)).d
        );
    }

    #[test]
    fn concurrent_generation_matches_serial() {
        let mut p = CameraParams::default();
        p.aperture_size = 0.1;
        p.aperture_blades = 6;
        p.shutter_end = 1.0;
        p.focus_distance = 3.0;
        let c = Arc::new(camera(p));

        let samples: Vec<CameraSample> = (0..64)
            .map(|i| {
                let f = i as Float / 64.0;
                CameraSample::new(Point2f::new(2.0 * f - 1.0, 1.0 - f), Point2f::new(f, 1.0 - f), f)
            })
            .collect();
        let serial: Vec<Ray> = samples.iter().map(|s| c.generate_ray(s)).collect();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&c);
                let samples = samples.clone();
                thread::spawn(move || samples.iter().map(|s| c.generate_ray(s)).collect::<Vec<Ray>>())
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), serial);
        }
    }

    #[test]
    fn aperture_aspect_ratio_stretches_origins_vertically() {
        let mut p = CameraParams::default();
        p.aperture_size = 0.5;
        p.aperture_aspect_ratio = 2.0;
        let c = camera(p);

        // Top of the disk lands beyond the unstretched radius.
        let r = c.generate_ray(&CameraSample::new(Point2f::zero(), Point2f::new(0.5, 0.999), 0.0));
        assert!(approx_eq!(f32, r.o.x, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, r.o.y, 0.998, epsilon = 1e-4));
        assert!(r.o.y > 0.5);
    }

    proptest! {
        #[test]
        fn pinhole_rays_are_reproducible(
            x in -1.0..1.0f32,
            y in -1.0..1.0f32,
            lx in 0.0..1.0f32,
            ly in 0.0..1.0f32,
            t in 0.0..1.0f32,
        ) {
            let c = camera(CameraParams::default());
            let s = CameraSample::new(Point2f::new(x, y), Point2f::new(lx, ly), t);
            let r = c.generate_ray(&s);

            // No lens offset and the exact pinhole projection.
            prop_assert_eq!(r.o, Point3f::zero());
            prop_assert_eq!(r.d, c.projection.screen_to_camera_dir(&s.p_film));

            // Independent of the lens sample and bit-for-bit repeatable.
            let other = CameraSample::new(s.p_film, Point2f::new(ly, lx), t);
            prop_assert_eq!(c.generate_ray(&other), r.clone());
            prop_assert_eq!(c.generate_ray(&s), r);
        }

        #[test]
        fn lens_origins_stay_within_aperture(
            size in 0.0..2.0f32,
            x in -1.0..1.0f32,
            y in -1.0..1.0f32,
            lx in 0.0..1.0f32,
            ly in 0.0..1.0f32,
        ) {
            let mut p = CameraParams::default();
            p.aperture_size = size;
            p.focus_distance = 4.0;
            let c = camera(p);
            let r = c.generate_ray(&CameraSample::new(Point2f::new(x, y), Point2f::new(lx, ly), 0.0));
            let o = r.o - Point3f::zero();
            prop_assert!(o.length() <= size * (1.0 + 1e-5));
        }

        #[test]
        fn stretched_lens_origins_stay_within_ellipse(
            size in 0.01..2.0f32,
            aspect in 0.25..4.0f32,
            blades in prop_oneof![Just(0i32), 3i32..9],
            x in -1.0..1.0f32,
            y in -1.0..1.0f32,
            lx in 0.0..1.0f32,
            ly in 0.0..1.0f32,
        ) {
            let mut p = CameraParams::default();
            p.aperture_size = size;
            p.aperture_aspect_ratio = aspect;
            p.aperture_blades = blades;
            p.aperture_blade_curvature = 0.5;
            p.focus_distance = 4.0;
            let c = camera(p);
            let r = c.generate_ray(&CameraSample::new(Point2f::new(x, y), Point2f::new(lx, ly), 0.0));
            let (ex, ey) = (r.o.x / size, r.o.y / (size * aspect));
            prop_assert!(ex * ex + ey * ey <= 1.0 + 1e-4);
            prop_assert!(approx_eq!(f32, r.o.z, 0.0, epsilon = 1e-6));
        }

        #[test]
        fn in_focus_axis_point_is_sharp(
            size in 0.01..1.0f32,
            focus in 1.0..20.0f32,
            lx in 0.0..1.0f32,
            ly in 0.0..1.0f32,
        ) {
            let mut p = CameraParams::default();
            p.aperture_size = size;
            p.focus_distance = focus;
            let c = camera(p);
            let r = c.generate_ray(&CameraSample::new(Point2f::zero(), Point2f::new(lx, ly), 0.0));
            let hit = r.at(focus / -r.d.z);
            prop_assert!(abs(hit.x) < 1e-4 * focus);
            prop_assert!(abs(hit.y) < 1e-4 * focus);
        }
    }
}
