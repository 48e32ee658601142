//! Disparity, vergence and parallax diagnostics.
//!
//! Horizontal disparity is `(x_left − x_right) / 2` in normalized image
//! units, i.e. a fraction of the display width. Negative values are
//! uncrossed (behind the display), positive values crossed (in front).

use std::fmt;

use stereosim_core::{DisplayConfig, ImagePoint, ImageStack, ViewerConfig};

/// Far vergence distances at or beyond this many meters are infinite.
pub const FAR_VERGENCE_LIMIT: f64 = 100.0;

const NEAR_MODEL: VergenceModel = VergenceModel {
    m0: 1.035,
    t0: 0.626,
};
const FAR_MODEL: VergenceModel = VergenceModel {
    m0: 1.129,
    t0: -0.442,
};

/// Which image pair the diagnostics are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSource {
    /// First and last camera of the rig.
    #[default]
    Global,
    /// The two eye images resolved for the display.
    Visible,
}

/// A distance that may be unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Distance {
    /// Meters.
    Finite(f64),
    /// Beyond the far limit.
    Infinity,
}

impl Distance {
    /// The finite value, if any.
    pub fn meters(self) -> Option<f64> {
        match self {
            Distance::Finite(m) => Some(m),
            Distance::Infinity => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(m) => write!(f, "{m:.3} m"),
            Distance::Infinity => write!(f, "INFINITY"),
        }
    }
}

/// One horizontal disparity value in several units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disparity {
    /// Fraction of the display width.
    pub fraction: f64,
    /// Millimeters on the display.
    pub millimeters: f64,
    /// Display pixels.
    pub pixels: f64,
    /// Percent of the display width.
    pub percent: f64,
    /// Eye convergence angle in degrees.
    pub convergence_degrees: f64,
    /// Parallax angle in degrees.
    pub parallax_degrees: f64,
}

/// Largest vertical disparity in several units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalDisparity {
    /// Fraction of the display width.
    pub fraction: f64,
    /// Millimeters on the display.
    pub millimeters: f64,
    /// Display pixels.
    pub pixels: f64,
    /// Percent of the display width.
    pub percent: f64,
    /// Vertical parallax in arc minutes.
    pub parallax_arcmin: f64,
}

/// One bound of the comfortable vergence range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VergenceBound {
    /// Distance from the viewer.
    pub absolute: Distance,
    /// Signed distance from the display plane.
    pub relative: Distance,
    /// Vergence demand relative to the display, in diopters.
    pub diopters: f64,
}

/// Whether the scene stays inside the comfort range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComfortFlags {
    /// Nearest point is no closer than the near bound.
    pub near_ok: bool,
    /// Farthest point is no farther than the far bound.
    pub far_ok: bool,
    /// Some point needs the eyes to diverge.
    pub diverging: bool,
}

/// Diagnostics for one image pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsReport {
    /// Points visible in both images.
    pub point_count: usize,
    /// Most uncrossed disparity.
    pub disparity_min: Option<Disparity>,
    /// Most crossed disparity.
    pub disparity_max: Option<Disparity>,
    /// Largest vertical disparity.
    pub vertical_max: Option<VerticalDisparity>,
    /// Near comfort bound.
    pub vergence_near: VergenceBound,
    /// Far comfort bound.
    pub vergence_far: VergenceBound,
    /// Scene against the comfort bounds; `None` without points.
    pub comfort: Option<ComfortFlags>,
}

#[derive(Debug, Clone, Copy)]
struct VergenceModel {
    m0: f64,
    t0: f64,
}

impl VergenceModel {
    /// Vergence distance for a comfort blend `alpha` in `[0, 1]`.
    fn distance(self, alpha: f64, head_distance: f64) -> f64 {
        let m = self.m0 * (1.0 - alpha) + alpha;
        let t = self.t0 * (1.0 - alpha);
        m / (1.0 / head_distance + t)
    }
}

/// Comfortable vergence distance for `comfort` in `[0, 10]`.
///
/// Returns (near, far) in meters from the viewer; the far value may be
/// negative or huge when the far limit is unbounded.
pub fn vergence_distances(comfort: f64, head_distance: f64) -> (f64, f64) {
    let alpha = (comfort / 10.0).clamp(0.0, 1.0);
    (
        NEAR_MODEL.distance(alpha, head_distance),
        FAR_MODEL.distance(alpha, head_distance),
    )
}

fn vergence_bound(distance: f64, head_distance: f64, unbounded: bool) -> VergenceBound {
    if unbounded {
        return VergenceBound {
            absolute: Distance::Infinity,
            relative: Distance::Infinity,
            diopters: -1.0 / head_distance,
        };
    }
    VergenceBound {
        absolute: Distance::Finite(distance),
        relative: Distance::Finite(distance - head_distance),
        diopters: 1.0 / distance - 1.0 / head_distance,
    }
}

/// Screen disparity in meters that places a point at `distance`.
fn disparity_at(distance: Distance, eye_separation: f64, head_distance: f64) -> f64 {
    match distance {
        Distance::Finite(d) => -eye_separation * (d - head_distance) / d,
        Distance::Infinity => -eye_separation,
    }
}

struct Units<'a> {
    display: &'a DisplayConfig,
    viewer: &'a ViewerConfig,
}

impl Units<'_> {
    fn angle(&self, meters: f64) -> f64 {
        (meters / (2.0 * self.viewer.head_distance)).atan().to_degrees()
    }

    fn horizontal(&self, fraction: f64) -> Disparity {
        let meters = fraction * self.display.width;
        Disparity {
            fraction,
            millimeters: meters * 1000.0,
            pixels: fraction * self.display.pixels_per_line,
            percent: fraction * 100.0,
            convergence_degrees: self.angle(self.viewer.eye_separation + meters),
            parallax_degrees: self.angle(meters),
        }
    }

    fn vertical(&self, fraction: f64) -> VerticalDisparity {
        let meters = fraction * self.display.width;
        VerticalDisparity {
            fraction,
            millimeters: meters * 1000.0,
            pixels: fraction * self.display.pixels_per_line,
            percent: fraction * 100.0,
            parallax_arcmin: self.angle(meters) * 60.0,
        }
    }
}

/// Computes disparity statistics and comfort bounds for an image pair.
///
/// With [`ImageSource::Global`] the first and last view are compared; with
/// [`ImageSource::Visible`] views 0 and 1. Points missing from either view
/// are skipped.
pub fn compute_diagnostics<P: ImagePoint>(
    images: &ImageStack<P>,
    display: &DisplayConfig,
    viewer: &ViewerConfig,
    comfort: f64,
    source: ImageSource,
) -> DiagnosticsReport {
    let head_distance = viewer.head_distance;
    let (near, far) = vergence_distances(comfort, head_distance);
    let far_unbounded = far < 0.0 || far >= FAR_VERGENCE_LIMIT;
    let vergence_near = vergence_bound(near, head_distance, false);
    let vergence_far = vergence_bound(far, head_distance, far_unbounded);

    let views = images.view_count();
    let (left, right) = match source {
        ImageSource::Global => (0, views.saturating_sub(1)),
        ImageSource::Visible => (0, 1),
    };

    let mut point_count = 0;
    let mut horizontal_range: Option<(f64, f64)> = None;
    let mut vertical_max: Option<f64> = None;
    if views >= 2 && right < views {
        for (_, _, a, b) in images.pairs(left, right) {
            let (Some(a), Some(b)) = (a.visible(), b.visible()) else {
                continue;
            };
            point_count += 1;
            let horizontal = (a.x - b.x) / 2.0;
            let vertical = (a.y - b.y).abs() / 2.0;
            horizontal_range = Some(match horizontal_range {
                Some((min, max)) => (min.min(horizontal), max.max(horizontal)),
                None => (horizontal, horizontal),
            });
            vertical_max = Some(vertical_max.map_or(vertical, |v| v.max(vertical)));
        }
    }

    let units = Units { display, viewer };
    let comfort_flags = horizontal_range.map(|(min, max)| {
        let min_m = min * display.width;
        let max_m = max * display.width;
        let separation = viewer.eye_separation;
        ComfortFlags {
            near_ok: max_m <= disparity_at(vergence_near.absolute, separation, head_distance),
            far_ok: min_m >= disparity_at(vergence_far.absolute, separation, head_distance),
            diverging: min_m < -separation,
        }
    });

    log::debug!(
        "diagnostics over {point_count} points: disparity {horizontal_range:?}, near {}, far {}",
        vergence_near.absolute,
        vergence_far.absolute
    );

    DiagnosticsReport {
        point_count,
        disparity_min: horizontal_range.map(|(min, _)| units.horizontal(min)),
        disparity_max: horizontal_range.map(|(_, max)| units.horizontal(max)),
        vertical_max: vertical_max.map(|v| units.vertical(v)),
        vergence_near,
        vergence_far,
        comfort: comfort_flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use stereosim_core::{Images, VisibleImages};

    fn pair(left: &[DVec2], right: &[DVec2]) -> Images {
        Images::from_views(vec![vec![left.to_vec()], vec![right.to_vec()]]).unwrap()
    }

    #[test]
    fn test_full_comfort_vergence_is_head_distance() {
        let (near, far) = vergence_distances(10.0, 0.6);
        assert!((near - 0.6).abs() < 1e-12);
        assert!((far - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_comfort_vergence() {
        let (near, far) = vergence_distances(0.0, 0.6);
        assert!((near - 1.035 / (1.0 / 0.6 + 0.626)).abs() < 1e-12);
        assert!((far - 1.129 / (1.0 / 0.6 - 0.442)).abs() < 1e-12);
        assert!(near < 0.6 && far > 0.6);
    }

    #[test]
    fn test_far_vergence_becomes_infinite() {
        // 1/3 + t0 < 0: the far model diverges.
        let images = pair(&[DVec2::ZERO], &[DVec2::ZERO]);
        let viewer = ViewerConfig::new().with_head_distance(3.0);
        let report = compute_diagnostics(
            &images,
            &DisplayConfig::default(),
            &viewer,
            0.0,
            ImageSource::Global,
        );
        assert_eq!(report.vergence_far.absolute, Distance::Infinity);
        assert_eq!(report.vergence_far.relative, Distance::Infinity);
        assert_eq!(report.vergence_far.absolute.to_string(), "INFINITY");
        assert!(report.vergence_near.absolute.meters().is_some());
    }

    #[test]
    fn test_disparity_units() {
        let images = pair(
            &[DVec2::new(0.1, 0.0), DVec2::new(-0.2, 0.05)],
            &[DVec2::new(0.0, 0.0), DVec2::new(0.0, 0.0)],
        );
        let display = DisplayConfig::default();
        let viewer = ViewerConfig::default();
        let report = compute_diagnostics(&images, &display, &viewer, 5.0, ImageSource::Global);
        assert_eq!(report.point_count, 2);

        let max = report.disparity_max.unwrap();
        assert!((max.fraction - 0.05).abs() < 1e-12);
        assert!((max.millimeters - 25.0).abs() < 1e-9);
        assert!((max.pixels - 96.0).abs() < 1e-9);
        assert!((max.percent - 5.0).abs() < 1e-12);
        let expected = ((0.065 + 0.025) / 1.2_f64).atan().to_degrees();
        assert!((max.convergence_degrees - expected).abs() < 1e-12);
        assert!((max.parallax_degrees - (0.025 / 1.2_f64).atan().to_degrees()).abs() < 1e-12);

        let min = report.disparity_min.unwrap();
        assert!((min.fraction + 0.1).abs() < 1e-12);

        let vertical = report.vertical_max.unwrap();
        assert!((vertical.fraction - 0.025).abs() < 1e-12);
        let arcmin = (0.0125 / 1.2_f64).atan().to_degrees() * 60.0;
        assert!((vertical.parallax_arcmin - arcmin).abs() < 1e-9);
    }

    #[test]
    fn test_global_uses_outermost_views() {
        let images = Images::from_views(vec![
            vec![vec![DVec2::new(0.1, 0.0)]],
            vec![vec![DVec2::new(5.0, 0.0)]],
            vec![vec![DVec2::new(-0.1, 0.0)]],
        ])
        .unwrap();
        let report = compute_diagnostics(
            &images,
            &DisplayConfig::default(),
            &ViewerConfig::default(),
            5.0,
            ImageSource::Global,
        );
        assert!((report.disparity_max.unwrap().fraction - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_hidden_points_are_skipped() {
        let visible = VisibleImages::from_views(vec![
            vec![vec![Some(DVec2::ZERO), None]],
            vec![vec![Some(DVec2::ZERO), Some(DVec2::X)]],
        ])
        .unwrap();
        let report = compute_diagnostics(
            &visible,
            &DisplayConfig::default(),
            &ViewerConfig::default(),
            5.0,
            ImageSource::Visible,
        );
        assert_eq!(report.point_count, 1);
        assert_eq!(report.disparity_max.unwrap().fraction, 0.0);

        let empty = VisibleImages::from_views(vec![vec![vec![None]], vec![vec![None]]]).unwrap();
        let report = compute_diagnostics(
            &empty,
            &DisplayConfig::default(),
            &ViewerConfig::default(),
            5.0,
            ImageSource::Visible,
        );
        assert_eq!(report.point_count, 0);
        assert!(report.disparity_min.is_none());
        assert!(report.comfort.is_none());
    }

    #[test]
    fn test_comfort_flags() {
        let display = DisplayConfig::default();
        let viewer = ViewerConfig::default();
        // Flat scene on the display plane.
        let flat = pair(&[DVec2::ZERO], &[DVec2::ZERO]);
        let report = compute_diagnostics(&flat, &display, &viewer, 5.0, ImageSource::Global);
        let flags = report.comfort.unwrap();
        assert!(flags.near_ok && flags.far_ok && !flags.diverging);

        // Uncrossed parallax wider than the eyes.
        let wide = pair(&[DVec2::new(-0.3, 0.0)], &[DVec2::new(0.3, 0.0)]);
        let report = compute_diagnostics(&wide, &display, &viewer, 5.0, ImageSource::Global);
        let flags = report.comfort.unwrap();
        assert!(flags.diverging);
        assert!(!flags.far_ok);
        assert!(flags.near_ok);
    }
}
