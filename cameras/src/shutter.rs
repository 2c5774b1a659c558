//! Shutter Sampler

use camera_core::error::*;
use camera_core::geometry::*;
use camera_core::pbrt::*;
use std::mem::swap;

/// How shutter samples are distributed over the shutter interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShutterType {
    /// Uniform over the interval.
    Box,

    /// Distributed according to the `shutter_curve` density.
    Curve,
}

impl ShutterType {
    /// Returns the shutter type for its parameter name.
    ///
    /// * `name` - Parameter value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "box" => Some(Self::Box),
            "curve" => Some(Self::Curve),
            _ => None,
        }
    }
}

impl Default for ShutterType {
    fn default() -> Self {
        Self::Box
    }
}

/// Direction in which a rolling shutter sweeps across the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RollingShutter {
    /// Global shutter.
    Off,

    /// First scanline at the top of the frame.
    Top,

    /// First scanline at the bottom of the frame.
    Bottom,

    /// First scanline at the left of the frame.
    Left,

    /// First scanline at the right of the frame.
    Right,
}

impl RollingShutter {
    /// Returns the rolling shutter direction for its parameter name.
    ///
    /// * `name` - Parameter value.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "off" => Some(Self::Off),
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Returns the scanline position in [0, 1] (0 for the first scanline read
    /// out, 1 for the last) or `None` for a global shutter.
    ///
    /// * `offset` - Film position relative to the screen window in [0, 1]^2
    ///              with `y` pointing up.
    pub fn line_position(&self, offset: &Point2f) -> Option<Float> {
        let line = match self {
            Self::Off => return None,
            Self::Top => 1.0 - offset.y,
            Self::Bottom => offset.y,
            Self::Left => offset.x,
            Self::Right => 1.0 - offset.x,
        };
        Some(line.saturate())
    }
}

impl Default for RollingShutter {
    fn default() -> Self {
        Self::Off
    }
}

/// A piecewise linear density over the shutter interval. Control points hold
/// the interval fraction in `x` and the relative density in `y`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShutterCurve {
    /// Control points.
    points: Vec<Point2f>,

    /// Normalized cumulative area at each control point.
    cdf: Vec<Float>,

    /// Total area under the curve.
    area: Float,
}

impl ShutterCurve {
    /// Creates a shutter curve. Fails with `InvalidCurve` when there are
    /// fewer than two points, `x` is not strictly increasing or leaves
    /// [0, 1], a density is negative or the curve encloses no area.
    ///
    /// * `points` - Control points.
    pub fn new(points: &[Point2f]) -> Result<Self, CameraError> {
        if points.len() < 2 {
            return Err(CameraError::InvalidCurve(format!(
                "needs at least 2 points, got {}",
                points.len()
            )));
        }
        for (i, p) in points.iter().enumerate() {
            if p.has_nans() || !(0.0..=1.0).contains(&p.x) {
                return Err(CameraError::InvalidCurve(format!(
                    "point {} has x = {} outside [0, 1]",
                    i, p.x
                )));
            }
            if p.y < 0.0 {
                return Err(CameraError::InvalidCurve(format!(
                    "point {} has negative density {}",
                    i, p.y
                )));
            }
        }
        if let Some(i) = points.windows(2).position(|w| w[1].x <= w[0].x) {
            return Err(CameraError::InvalidCurve(format!(
                "x values are not increasing at point {}",
                i + 1
            )));
        }

        let mut cdf = Vec::with_capacity(points.len());
        cdf.push(0.0);
        let mut area = 0.0;
        for w in points.windows(2) {
            area += 0.5 * (w[0].y + w[1].y) * (w[1].x - w[0].x);
            cdf.push(area);
        }
        if area.is_nan() || area <= 0.0 {
            return Err(CameraError::InvalidCurve(String::from(
                "curve encloses no area",
            )));
        }
        for c in cdf.iter_mut() {
            *c /= area;
        }

        Ok(Self {
            points: points.to_vec(),
            cdf,
            area,
        })
    }

    /// Returns the control points.
    pub fn points(&self) -> &[Point2f] {
        &self.points
    }

    /// Maps a uniform sample to an interval fraction distributed according to
    /// the curve by inverting its cumulative area.
    ///
    /// * `u` - Uniform sample in [0, 1].
    pub fn sample(&self, u: Float) -> Float {
        let u = u.saturate();
        let i = find_interval(self.cdf.len(), |j| self.cdf[j] <= u);

        let (p0, p1) = (self.points[i], self.points[i + 1]);
        let width = p1.x - p0.x;

        // Solve y0·s + k·s² = a for the offset `s` into the segment.
        let a = (u - self.cdf[i]) * self.area;
        let k = 0.5 * (p1.y - p0.y) / width;
        let q = p0.y * p0.y + 4.0 * k * a;
        let den = p0.y + max(q, 0.0).sqrt();
        let s = if den > 0.0 { 2.0 * a / den } else { 0.0 };

        p0.x + clamp(s, 0.0, width)
    }
}

/// Maps uniform time samples to scene time.
#[derive(Clone, Debug, PartialEq)]
pub struct ShutterSampler {
    /// Time the shutter opens.
    pub shutter_start: Float,

    /// Time the shutter closes.
    pub shutter_end: Float,

    /// Density over the shutter interval; `None` for a box shutter.
    curve: Option<ShutterCurve>,

    /// Rolling shutter direction.
    pub rolling_shutter: RollingShutter,

    /// Fraction of the interval each scanline stays exposed, in [0, 1].
    pub rolling_shutter_duration: Float,
}

impl ShutterSampler {
    /// Creates a shutter sampler.
    ///
    /// * `shutter_start`            - Time the shutter opens.
    /// * `shutter_end`              - Time the shutter closes.
    /// * `shutter_type`             - Distribution of samples over time.
    /// * `shutter_curve`            - Control points for `ShutterType::Curve`.
    /// * `rolling_shutter`          - Rolling shutter direction.
    /// * `rolling_shutter_duration` - Exposure fraction per scanline.
    pub fn new(
        shutter_start: Float,
        shutter_end: Float,
        shutter_type: ShutterType,
        shutter_curve: &[Point2f],
        rolling_shutter: RollingShutter,
        rolling_shutter_duration: Float,
    ) -> Result<Self, CameraError> {
        let mut shutter_start = shutter_start;
        let mut shutter_end = shutter_end;
        if shutter_end < shutter_start {
            warn!(
                "Shutter end [{}] < shutter start [{}]. Swapping them.",
                shutter_end, shutter_start
            );
            swap(&mut shutter_start, &mut shutter_end);
        }

        let curve = match shutter_type {
            ShutterType::Box => None,
            ShutterType::Curve => Some(ShutterCurve::new(shutter_curve)?),
        };

        let duration = rolling_shutter_duration.saturate();
        if rolling_shutter != RollingShutter::Off && duration != rolling_shutter_duration {
            warn!(
                "Rolling shutter duration {} outside [0, 1]. Using {}.",
                rolling_shutter_duration, duration
            );
        }

        Ok(Self {
            shutter_start,
            shutter_end,
            curve,
            rolling_shutter,
            rolling_shutter_duration: duration,
        })
    }

    /// Returns the shutter type.
    pub fn shutter_type(&self) -> ShutterType {
        if self.curve.is_some() {
            ShutterType::Curve
        } else {
            ShutterType::Box
        }
    }

    /// Maps a uniform sample to a fraction of the shutter interval.
    ///
    /// * `u` - Uniform sample in [0, 1].
    pub fn sample_fraction(&self, u: Float) -> Float {
        match &self.curve {
            Some(curve) => curve.sample(u),
            None => u.saturate(),
        }
    }

    /// Maps a uniform sample to scene time ignoring any rolling shutter.
    ///
    /// * `u` - Uniform sample in [0, 1].
    pub fn sample_time(&self, u: Float) -> Float {
        self.time_at_fraction(self.sample_fraction(u))
    }

    /// Maps a uniform sample to scene time for a scanline. The scanline's
    /// readout position shifts its exposure window within the interval.
    ///
    /// * `u`    - Uniform sample in [0, 1].
    /// * `line` - Scanline position in [0, 1]; see
    ///            `RollingShutter::line_position()`.
    pub fn sample_time_at_line(&self, u: Float, line: Float) -> Float {
        let f = self.sample_fraction(u);
        if self.rolling_shutter == RollingShutter::Off {
            return self.time_at_fraction(f);
        }

        let d = self.rolling_shutter_duration;
        self.time_at_fraction(line.saturate() * (1.0 - d) + f * d)
    }

    /// Returns the scene time at a fraction of the shutter interval. The end
    /// points are reproduced exactly.
    ///
    /// * `f` - Fraction in [0, 1].
    fn time_at_fraction(&self, f: Float) -> Float {
        if f >= 1.0 {
            self.shutter_end
        } else {
            min(
                self.shutter_start + f * (self.shutter_end - self.shutter_start),
                self.shutter_end,
            )
        }
    }
}

impl Default for ShutterSampler {
    /// Instantaneous box shutter at time 0.
    fn default() -> Self {
        Self {
            shutter_start: 0.0,
            shutter_end: 0.0,
            curve: None,
            rolling_shutter: RollingShutter::Off,
            rolling_shutter_duration: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    fn box_shutter(start: Float, end: Float) -> ShutterSampler {
        ShutterSampler::new(start, end, ShutterType::Box, &[], RollingShutter::Off, 0.0).unwrap()
    }

    fn pts(p: &[(Float, Float)]) -> Vec<Point2f> {
        p.iter().map(|(x, y)| Point2f::new(*x, *y)).collect()
    }

    #[test]
    fn box_zero_duration_is_instant() {
        let s = box_shutter(0.3, 0.3);
        for u in [0.0, 0.1, 0.5, 0.7, 1.0] {
            assert_eq!(s.sample_time(u), 0.3);
        }
    }

    #[test]
    fn reversed_interval_is_swapped() {
        let s = box_shutter(1.0, -1.0);
        assert_eq!(s.shutter_start, -1.0);
        assert_eq!(s.shutter_end, 1.0);
    }

    #[test]
    fn curve_validation() {
        let curve = |p: &[(Float, Float)]| {
            ShutterSampler::new(
                0.0,
                1.0,
                ShutterType::Curve,
                &pts(p),
                RollingShutter::Off,
                0.0,
            )
        };

        assert!(matches!(curve(&[]), Err(CameraError::InvalidCurve(_))));
        assert!(matches!(curve(&[(0.0, 1.0)]), Err(CameraError::InvalidCurve(_))));
        assert!(matches!(
            curve(&[(0.0, 1.0), (0.6, 1.0), (0.4, 1.0)]),
            Err(CameraError::InvalidCurve(_))
        ));
        assert!(matches!(
            curve(&[(0.0, 1.0), (1.5, 1.0)]),
            Err(CameraError::InvalidCurve(_))
        ));
        assert!(matches!(
            curve(&[(0.0, 1.0), (1.0, -1.0)]),
            Err(CameraError::InvalidCurve(_))
        ));
        assert!(matches!(
            curve(&[(0.0, 0.0), (1.0, 0.0)]),
            Err(CameraError::InvalidCurve(_))
        ));
        assert!(curve(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)]).is_ok());
    }

    #[test]
    fn box_ignores_curve() {
        let s = ShutterSampler::new(
            0.0,
            1.0,
            ShutterType::Box,
            &pts(&[(0.5, 1.0)]),
            RollingShutter::Off,
            0.0,
        )
        .unwrap();
        assert_eq!(s.shutter_type(), ShutterType::Box);
    }

    #[test]
    fn flat_curve_matches_box() {
        let s = ShutterSampler::new(
            2.0,
            4.0,
            ShutterType::Curve,
            &pts(&[(0.0, 1.0), (1.0, 1.0)]),
            RollingShutter::Off,
            0.0,
        )
        .unwrap();
        for u in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert!(approx_eq!(f32, s.sample_time(u), 2.0 + 2.0 * u, epsilon = 1e-5));
        }
    }

    #[test]
    fn triangle_curve_concentrates_in_the_middle() {
        let c = ShutterCurve::new(&pts(&[(0.0, 0.0), (0.5, 1.0), (1.0, 0.0)])).unwrap();
        assert!(approx_eq!(f32, c.sample(0.0), 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f32, c.sample(0.5), 0.5, epsilon = 1e-6));
        assert!(approx_eq!(f32, c.sample(1.0), 1.0, epsilon = 1e-6));
        // CDF of the left half is 2x², so u = 0.125 maps to x = 0.25.
        assert!(approx_eq!(f32, c.sample(0.125), 0.25, epsilon = 1e-5));
    }

    #[test]
    fn curve_support_limits_times() {
        let c = ShutterCurve::new(&pts(&[(0.25, 1.0), (0.75, 1.0)])).unwrap();
        assert!(approx_eq!(f32, c.sample(0.0), 0.25, epsilon = 1e-6));
        assert!(approx_eq!(f32, c.sample(1.0), 0.75, epsilon = 1e-6));
    }

    #[test]
    fn rolling_shutter_offsets_scanlines() {
        let s = ShutterSampler::new(
            0.0,
            1.0,
            ShutterType::Box,
            &[],
            RollingShutter::Top,
            0.0,
        )
        .unwrap();
        // Instantaneous scanlines read out from top to bottom.
        let top = RollingShutter::Top.line_position(&Point2f::new(0.5, 1.0)).unwrap();
        let bottom = RollingShutter::Top.line_position(&Point2f::new(0.5, 0.0)).unwrap();
        assert_eq!(s.sample_time_at_line(0.7, top), 0.0);
        assert_eq!(s.sample_time_at_line(0.7, bottom), 1.0);
        assert!(approx_eq!(f32, s.sample_time_at_line(0.7, 0.5), 0.5, epsilon = 1e-6));
    }

    #[test]
    fn rolling_shutter_full_duration_is_global() {
        let s = ShutterSampler::new(
            0.0,
            1.0,
            ShutterType::Box,
            &[],
            RollingShutter::Left,
            1.0,
        )
        .unwrap();
        assert_eq!(s.sample_time_at_line(0.25, 0.0), s.sample_time(0.25));
        assert_eq!(s.sample_time_at_line(0.25, 1.0), s.sample_time(0.25));
    }

    #[test]
    fn rolling_shutter_duration_is_clamped() {
        let s = ShutterSampler::new(
            0.0,
            1.0,
            ShutterType::Box,
            &[],
            RollingShutter::Bottom,
            3.0,
        )
        .unwrap();
        assert_eq!(s.rolling_shutter_duration, 1.0);
    }

    #[test]
    fn line_positions() {
        let p = Point2f::new(0.25, 0.75);
        assert_eq!(RollingShutter::Off.line_position(&p), None);
        assert_eq!(RollingShutter::Top.line_position(&p), Some(0.25));
        assert_eq!(RollingShutter::Bottom.line_position(&p), Some(0.75));
        assert_eq!(RollingShutter::Left.line_position(&p), Some(0.25));
        assert_eq!(RollingShutter::Right.line_position(&p), Some(0.75));
    }

    proptest! {
        #[test]
        fn box_end_points_are_exact(start in -100.0..100.0f32, len in 0.0..100.0f32) {
            let s = box_shutter(start, start + len);
            prop_assert_eq!(s.sample_time(0.0), s.shutter_start);
            prop_assert_eq!(s.sample_time(1.0), s.shutter_end);
        }

        #[test]
        fn box_times_stay_in_interval(start in -100.0..100.0f32, len in 0.0..100.0f32, u in 0.0..1.0f32) {
            let s = box_shutter(start, start + len);
            let t = s.sample_time(u);
            prop_assert!(t >= s.shutter_start && t <= s.shutter_end);
        }

        #[test]
        fn curve_sampling_is_monotonic(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32, peak in 0.05..0.95f32) {
            let c = ShutterCurve::new(&pts(&[(0.0, 0.2), (peak, 2.0), (1.0, 0.0)])).unwrap();
            let (lo, hi) = if u0 <= u1 { (u0, u1) } else { (u1, u0) };
            prop_assert!(c.sample(lo) <= c.sample(hi) + 1e-5);
            prop_assert!((0.0..=1.0).contains(&c.sample(lo)));
        }
    }
}
