//! Virtual camera rig construction.

use glam::DVec3;
use stereosim_core::{CameraRecord, ColorScheme, Result, RigConfig, RigType, StereosimError};

/// Horizontal angle of view of the rig's lenses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleOfView {
    /// Full horizontal angle in degrees.
    Degrees(f64),
    /// The crossing point is closer than the focal length.
    UnableToFocus,
}

impl std::fmt::Display for AngleOfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AngleOfView::Degrees(degrees) => write!(f, "{degrees:.1}°"),
            AngleOfView::UnableToFocus => write!(f, "unable to focus"),
        }
    }
}

/// The cameras of one pipeline pass, ordered left to right.
#[derive(Debug, Clone)]
pub struct Rig {
    cameras: Vec<CameraRecord>,
    dir_length: f64,
    unable_to_focus: bool,
}

impl Rig {
    /// All cameras, index 0 leftmost.
    pub fn cameras(&self) -> &[CameraRecord] {
        &self.cameras
    }

    /// Number of cameras.
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Always false for a built rig.
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Image distance in sensor half-widths, before focal correction.
    pub fn dir_length(&self) -> f64 {
        self.dir_length
    }

    /// Whether the lenses could focus on the crossing point.
    pub fn can_focus(&self) -> bool {
        !self.unable_to_focus
    }

    /// Horizontal angle of view, or the unable-to-focus state.
    pub fn angle_of_view(&self) -> AngleOfView {
        if self.unable_to_focus {
            AngleOfView::UnableToFocus
        } else {
            AngleOfView::Degrees(2.0 * (1.0 / self.dir_length).atan().to_degrees())
        }
    }

    /// Camera at 0-based `index`.
    pub fn camera(&self, index: usize) -> Result<&CameraRecord> {
        self.cameras.get(index).ok_or(StereosimError::IndexOutOfRange {
            index,
            count: self.cameras.len(),
        })
    }
}

/// Image distance mapped to sensor half-widths.
///
/// Thin lens: `v = F·Z / (Z − F)` for focus distance `Z`. A negative or
/// unbounded result means the lens cannot focus; it is reported as `None`.
fn image_distance(config: &RigConfig, focus_distance: f64) -> Option<f64> {
    let f = config.focal_length;
    let zc = -focus_distance;
    let length = f * zc / (f + zc) / config.sensor_half_width;
    (length.is_finite() && length >= 0.0).then_some(length)
}

/// Optical axis for the camera at `x`, before scaling.
fn aim(config: &RigConfig, x: f64) -> DVec3 {
    let depth = config.crossing - config.camera_z();
    match config.rig_type {
        RigType::ToeIn | RigType::TiltShift => DVec3::new(-x, -config.height, depth),
        RigType::ToeOut => DVec3::new(x, -config.height, depth),
        RigType::Parallel => DVec3::new(0.0, -config.height, depth),
    }
}

/// Right and up axes of the image plane for a unit optical axis.
///
/// Both axes have unit length: image coordinates share one scale, and the
/// sensor aspect shows up only as the frame's `±1/aspect` vertical extent.
fn image_axes(rig_type: RigType, axis: DVec3) -> (DVec3, DVec3) {
    match rig_type {
        RigType::ToeIn | RigType::ToeOut => {
            let right = DVec3::Y.cross(axis).try_normalize().unwrap_or(DVec3::X);
            let up = axis.cross(right).try_normalize().unwrap_or(DVec3::Y);
            (right, up)
        }
        RigType::Parallel | RigType::TiltShift => (DVec3::X, DVec3::Y),
    }
}

fn camera_color(scheme: ColorScheme, index: usize, count: usize) -> DVec3 {
    let (left, right) = scheme.colors();
    if index == 0 {
        left
    } else if index + 1 == count {
        right
    } else {
        ColorScheme::interior()
    }
}

/// Builds the camera rig described by `config`.
///
/// Cameras are spaced evenly along X from `-separation/2` to
/// `+separation/2` at height `height` and `z = -distance`. A lens that
/// cannot focus on the crossing point gets a zero-length direction and the
/// rig reports [`AngleOfView::UnableToFocus`]; the pass still completes.
#[allow(clippy::cast_precision_loss)]
pub fn build_rig(config: &RigConfig) -> Result<Rig> {
    config.validate()?;

    let count = config.camera_count;
    let z = config.camera_z();
    let axis_depth = config.crossing - z;

    let (dir_length, unable_to_focus) = match image_distance(config, axis_depth) {
        Some(length) => (length, false),
        None => {
            log::warn!(
                "unable to focus: crossing at {:.3} m is within focal length {:.3} m",
                axis_depth,
                config.focal_length
            );
            (0.0, true)
        }
    };

    let cameras: Vec<CameraRecord> = (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            let x = config.separation * (t - 0.5);
            let location = DVec3::new(x, config.height, z);

            let raw = aim(config, x);
            let unit = raw.try_normalize().unwrap_or(DVec3::Z);
            let mut length = dir_length;
            if config.focal_correction && axis_depth.abs() > f64::EPSILON {
                length *= raw.length() / axis_depth.abs();
            }
            let direction = unit * length;
            let (right, up) = image_axes(config.rig_type, unit);

            let camera = CameraRecord::new(
                location,
                direction,
                right,
                up,
                config.sensor_aspect,
                camera_color(config.color_scheme, i, count),
            );
            log::trace!("camera {i}: {camera:?}");
            camera
        })
        .collect();

    log::debug!(
        "built {:?} rig with {} cameras, image distance {:.3}",
        config.rig_type,
        cameras.len(),
        dir_length
    );

    Ok(Rig {
        cameras,
        dir_length,
        unable_to_focus,
    })
}
