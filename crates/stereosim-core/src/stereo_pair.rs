//! Camera selection for stereoscopic displays.
//!
//! The left eye sees camera `left` and the right eye sees camera
//! `left + offset`, both 1-based. After every change the pair satisfies
//! `1 <= left <= N` and `1 <= left + offset <= N`.

use serde::{Deserialize, Serialize};

/// The two cameras shown on a stereoscopic display.
///
/// Deserialized pairs go through [`StereoPair::new`], so a pair read from a
/// configuration file is clamped like any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredPair")]
pub struct StereoPair {
    camera_count: usize,
    left: usize,
    offset: isize,
}

impl StereoPair {
    /// Creates a pair for `camera_count` cameras, clamping `left` and
    /// `offset` jointly.
    ///
    /// The offset is clamped to its widest valid range first, then `left`
    /// moves so that the right camera stays on the rig.
    pub fn new(camera_count: usize, left: usize, offset: isize) -> Self {
        let mut pair = Self {
            camera_count: camera_count.max(1),
            left,
            offset,
        };
        pair.clamp_offset_first();
        pair
    }

    /// Outermost two cameras of the rig.
    pub fn outermost(camera_count: usize) -> Self {
        let offset = isize::try_from(camera_count.saturating_sub(1)).unwrap_or(isize::MAX);
        Self::new(camera_count, 1, offset)
    }

    /// Number of cameras the pair is clamped against.
    pub fn camera_count(&self) -> usize {
        self.camera_count
    }

    /// 1-based index of the left eye's camera.
    pub fn left(&self) -> usize {
        self.left
    }

    /// Signed distance from the left camera to the right camera.
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// 1-based index of the right eye's camera.
    pub fn right(&self) -> usize {
        self.left.saturating_add_signed(self.offset)
    }

    /// 0-based (left, right) camera indices.
    pub fn indices(&self) -> (usize, usize) {
        (self.left - 1, self.right() - 1)
    }

    /// Sets the left camera; the offset follows so the right camera stays valid.
    pub fn set_left(&mut self, left: usize) {
        self.left = left.clamp(1, self.camera_count);
        let (low, high) = self.offset_bounds_for_left();
        self.offset = self.offset.clamp(low, high);
    }

    /// Sets the offset; the left camera moves if the offset would leave the rig.
    pub fn set_offset(&mut self, offset: isize) {
        self.offset = offset;
        self.clamp_offset_first();
    }

    /// Changes the camera count and re-clamps both indices.
    pub fn set_camera_count(&mut self, camera_count: usize) {
        self.camera_count = camera_count.max(1);
        self.clamp_offset_first();
    }

    fn count(&self) -> isize {
        isize::try_from(self.camera_count).unwrap_or(isize::MAX)
    }

    fn offset_bounds_for_left(&self) -> (isize, isize) {
        let left = isize::try_from(self.left).unwrap_or(isize::MAX);
        (1 - left, self.count() - left)
    }

    fn clamp_offset_first(&mut self) {
        let requested = (self.left, self.offset);
        let n = self.count();
        self.offset = self.offset.clamp(1 - n, n - 1);
        let low = 1_isize.max(1 - self.offset);
        let high = n.min(n - self.offset);
        let left = isize::try_from(self.left).unwrap_or(isize::MAX).clamp(low, high);
        // low >= 1 so the conversion cannot fail.
        self.left = usize::try_from(left).unwrap_or(1);
        if requested != (self.left, self.offset) {
            log::debug!(
                "stereo pair {requested:?} clamped to ({}, {}) for {} cameras",
                self.left,
                self.offset,
                self.camera_count
            );
        }
    }
}

/// Field layout of a serialized [`StereoPair`], before clamping.
#[derive(Deserialize)]
struct StoredPair {
    camera_count: usize,
    left: usize,
    offset: isize,
}

impl From<StoredPair> for StereoPair {
    fn from(stored: StoredPair) -> Self {
        Self::new(stored.camera_count, stored.left, stored.offset)
    }
}

impl Default for StereoPair {
    fn default() -> Self {
        Self::outermost(2)
    }
}
