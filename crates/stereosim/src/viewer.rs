//! Display plane and viewer eyes.
//!
//! The display lies in the `z = 0` plane facing `-Z`; the viewer sits at
//! negative Z looking at its center.

use glam::DVec3;
use stereosim_core::{CameraRecord, ColorScheme, DisplayConfig, DisplayRecord, EyeRecord, ViewerConfig};

/// Builds the world-space display record.
pub fn build_display(config: &DisplayConfig) -> DisplayRecord {
    let half_width = config.width * 0.5;
    DisplayRecord::new(
        DVec3::new(0.0, config.center_height, 0.0),
        DVec3::new(half_width, 0.0, 0.0),
        DVec3::new(0.0, half_width, 0.0),
        config.aspect,
    )
}

/// The viewer's two eyes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Eyes {
    records: [EyeRecord; 2],
}

impl Eyes {
    /// Places both eyes in front of `display`.
    pub fn new(viewer: &ViewerConfig, display: &DisplayRecord) -> Self {
        let (left_color, right_color) = ColorScheme::RedCyan.colors();
        let half = viewer.eye_separation * 0.5;
        let head = DVec3::new(
            display.center.x + viewer.head_offset,
            display.center.y + viewer.head_height,
            display.center.z - viewer.head_distance,
        );
        let eye = |x: f64, color: DVec3| {
            let location = head + DVec3::new(x, 0.0, 0.0);
            let direction = display.center - location;
            let axis = direction.try_normalize().unwrap_or(DVec3::Z);
            let right = DVec3::Y.cross(axis).try_normalize().unwrap_or(DVec3::X);
            let up = axis.cross(right).try_normalize().unwrap_or(DVec3::Y);
            EyeRecord::new(location, direction, right, up, display.aspect, color)
        };
        Self {
            records: [eye(-half, left_color), eye(half, right_color)],
        }
    }

    /// Left eye.
    pub fn left(&self) -> &EyeRecord {
        &self.records[0]
    }

    /// Right eye.
    pub fn right(&self) -> &EyeRecord {
        &self.records[1]
    }

    /// Both eyes, left first.
    pub fn records(&self) -> &[EyeRecord; 2] {
        &self.records
    }

    /// Distance between the eyes.
    pub fn separation(&self) -> f64 {
        (self.right().location - self.left().location).length()
    }

    /// Cameras at the eye positions whose image plane is the display.
    ///
    /// The image axes are the display's, so projecting through these
    /// cameras yields display coordinates directly. The basis is not
    /// orthonormal unless the eye sits straight in front of the center.
    pub fn as_cameras(&self, display: &DisplayRecord) -> [CameraRecord; 2] {
        self.records.map(|eye| {
            CameraRecord::new(
                eye.location,
                display.center - eye.location,
                display.right,
                display.up,
                display.aspect,
                eye.color,
            )
        })
    }
}
