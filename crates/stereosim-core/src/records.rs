//! Camera, eye and display records.
//!
//! Records are built fresh for every pipeline pass and never mutated
//! afterwards.

use glam::{DVec2, DVec3};

use crate::math::plane_point;

/// One pinhole camera of the rig.
///
/// `direction` runs from the pinhole to the center of the image plane; its
/// length is the image distance in units of the sensor half-width. `right`
/// and `up` span the image plane and need not be orthogonal to `direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRecord {
    /// Pinhole position.
    pub location: DVec3,
    /// Pinhole to image-plane center.
    pub direction: DVec3,
    /// Image-plane horizontal axis; normalized coordinate 1 is the frame edge.
    pub right: DVec3,
    /// Image-plane vertical axis, same scale as `right`.
    pub up: DVec3,
    /// Frame width / height.
    pub aspect: f64,
    /// Visualization color (RGB in `[0, 1]`).
    pub color: DVec3,
}

impl CameraRecord {
    /// Creates a camera record.
    pub fn new(
        location: DVec3,
        direction: DVec3,
        right: DVec3,
        up: DVec3,
        aspect: f64,
        color: DVec3,
    ) -> Self {
        Self {
            location,
            direction,
            right,
            up,
            aspect,
            color,
        }
    }

    /// World position of a normalized image-plane coordinate.
    pub fn image_point(&self, coords: DVec2) -> DVec3 {
        plane_point(self.location + self.direction, self.right, self.up, coords)
    }

    /// Normalized frame corners, counter-clockwise from bottom left.
    pub fn frame_corners(&self) -> [DVec2; 4] {
        let half_height = 1.0 / self.aspect;
        [
            DVec2::new(-1.0, -half_height),
            DVec2::new(1.0, -half_height),
            DVec2::new(1.0, half_height),
            DVec2::new(-1.0, half_height),
        ]
    }

    /// Whether a normalized image coordinate falls inside the frame.
    pub fn in_frame(&self, coords: DVec2) -> bool {
        coords.x.abs() <= 1.0 && coords.y.abs() <= 1.0 / self.aspect
    }
}

/// A viewer's eye has the same shape as a camera.
pub type EyeRecord = CameraRecord;

/// The physical display plane in world space.
///
/// `right` and `up` are half-extent vectors: normalized coordinate `±1`
/// along `right` reaches the left and right edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRecord {
    /// Center of the display surface.
    pub center: DVec3,
    /// Half-width vector.
    pub right: DVec3,
    /// Vertical vector at the same scale as `right`.
    pub up: DVec3,
    /// Width / height.
    pub aspect: f64,
}

impl DisplayRecord {
    /// Creates a display record.
    pub fn new(center: DVec3, right: DVec3, up: DVec3, aspect: f64) -> Self {
        Self {
            center,
            right,
            up,
            aspect,
        }
    }

    /// World position of a normalized display coordinate.
    pub fn world_point(&self, coords: DVec2) -> DVec3 {
        plane_point(self.center, self.right, self.up, coords)
    }

    /// Half of the physical width.
    pub fn half_width(&self) -> f64 {
        self.right.length()
    }
}
