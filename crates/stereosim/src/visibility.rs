//! Which camera image each eye actually sees on the display.
//!
//! A stereoscopic display shows one chosen camera per eye. A lenticular
//! display interleaves all `N` camera images under a sheet of cylindrical
//! lenses: every lens pitch period (a cell) on the pixel plane is split into
//! `N` subcells, one per camera, mirrored left to right because the lens
//! inverts. An eye sees a camera's point only if it lies between the two
//! sight lines running from that camera's subcell edges through the lens
//! center (the pinhole).

use glam::{DVec2, DVec3};
use stereosim_core::math::triangle_orientation;
use stereosim_core::{
    DisplayConfig, DisplayKind, DisplayRecord, Images, Result, StereoPair, StereosimError,
    VisibleImages,
};

use crate::viewer::Eyes;

/// Lenticular sheet geometry in display-local coordinates.
///
/// X is measured from the display center along its width; the lens
/// (pinhole) plane is `z = 0` and the pixel plane is `z = depth`. Eyes sit
/// at negative z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LenticularSheet {
    /// Cell spacing on the pixel plane.
    pub visual_pitch: f64,
    /// Lens spacing on the lens plane.
    pub mechanical_pitch: f64,
    /// Distance from the lens plane to the pixel plane.
    pub depth: f64,
}

impl LenticularSheet {
    /// Creates a sheet from explicit pitches and depth.
    pub fn new(visual_pitch: f64, mechanical_pitch: f64, depth: f64) -> Self {
        Self {
            visual_pitch,
            mechanical_pitch,
            depth,
        }
    }

    /// Sheet described by a display configuration.
    pub fn from_config(config: &DisplayConfig) -> Self {
        Self::new(config.visual_pitch(), config.lens_pitch, config.lens_depth)
    }

    /// Pixel-plane span of camera `index`'s subcell in the cell under `x`,
    /// and the x of that cell's pinhole.
    ///
    /// Returns `(subcell_min, subcell_max, pinhole_x)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn subcell(&self, x: f64, index: usize, count: usize) -> (f64, f64, f64) {
        let cell_number = (x / self.visual_pitch).round();
        let cell_min = (cell_number - 0.5) * self.visual_pitch;
        let pinhole_x = cell_number * self.mechanical_pitch;
        let n = count as f64;
        let i = index as f64;
        let sub_min = self.visual_pitch * (n - i - 1.0) / n + cell_min;
        let sub_max = self.visual_pitch * (n - i) / n + cell_min;
        (sub_min, sub_max, pinhole_x)
    }

    /// Whether an eye at `eye` (x, z) sees camera `index`'s content at `x`.
    ///
    /// Both sight-line tests are closed, so an eye exactly on the line
    /// between two adjacent subcells sees both.
    pub fn is_visible(&self, x: f64, index: usize, count: usize, eye: DVec2) -> bool {
        let (sub_min, sub_max, pinhole_x) = self.subcell(x, index, count);
        let pinhole = DVec2::new(pinhole_x, 0.0);
        let orient_min = triangle_orientation(DVec2::new(sub_min, self.depth), pinhole, eye);
        let orient_max = triangle_orientation(DVec2::new(sub_max, self.depth), pinhole, eye);
        orient_min <= 0.0 && orient_max >= 0.0
    }

    /// Picks the single visible candidate among `candidates` (one per camera,
    /// in display-local x).
    ///
    /// Returns the camera index, or `None` when no candidate or more than one
    /// is visible.
    pub fn select<I>(&self, candidates: I, count: usize, eye: DVec2) -> Option<usize>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut chosen = None;
        for (index, x) in candidates.into_iter().enumerate() {
            if self.is_visible(x, index, count, eye) {
                if chosen.is_some() {
                    return None;
                }
                chosen = Some(index);
            }
        }
        chosen
    }
}

/// Resolves the two eye images for the configured display.
///
/// Stereoscopic displays copy the cameras selected by `pair`, which must be
/// clamped against the number of images. Lenticular displays keep, per eye and vertex, the
/// one camera point the eye can see through the lenses; occluded or
/// ambiguous points become `None`.
pub fn resolve_visibility(
    config: &DisplayConfig,
    pair: StereoPair,
    display: &DisplayRecord,
    eyes: &Eyes,
    images: &Images,
) -> Result<VisibleImages> {
    let count = images.view_count();
    if count < 2 {
        return Err(StereosimError::TooFewCameras(count));
    }
    let shape = images.shape();

    let visible = match config.kind {
        DisplayKind::Stereoscopic => {
            if pair.camera_count() != count {
                return Err(StereosimError::SizeMismatch {
                    expected: count,
                    actual: pair.camera_count(),
                });
            }
            let (left, right) = pair.indices();
            log::debug!("stereoscopic display shows cameras {} and {}", left + 1, right + 1);
            let views = [left, right];
            VisibleImages::from_fn(2, &shape, |eye, object, vertex| {
                images
                    .point(views[eye], object, vertex)
                    .filter(|p| p.is_finite())
            })
        }
        DisplayKind::Lenticular => {
            let sheet = LenticularSheet::from_config(config);
            let half_width = display.half_width();
            let eye_positions = eyes.records().map(|eye| display_local(eye.location, display.center));
            VisibleImages::from_fn(2, &shape, |eye, object, vertex| {
                let candidates = (0..count).map(|camera| {
                    images
                        .point(camera, object, vertex)
                        .map_or(f64::NAN, |p| p.x * half_width)
                });
                sheet
                    .select(candidates, count, eye_positions[eye])
                    .and_then(|camera| images.point(camera, object, vertex))
            })
        }
    };

    log::debug!(
        "visible points: left {}/{}, right {}/{}",
        visible.visible_count(0),
        visible.point_count(),
        visible.visible_count(1),
        visible.point_count()
    );
    Ok(visible)
}

/// Eye position in the display's (x, z) frame.
fn display_local(location: DVec3, center: DVec3) -> DVec2 {
    DVec2::new(location.x - center.x, location.z - center.z)
}
