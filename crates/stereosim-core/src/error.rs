//! Error types for stereosim-rs.

use thiserror::Error;

/// The main error type for stereosim-rs operations.
///
/// These are configuration and shape errors. Optical conditions such as an
/// occluded point or a camera that cannot focus are carried as values, not
/// as errors.
#[derive(Error, Debug)]
pub enum StereosimError {
    /// A rig needs at least two cameras.
    #[error("camera rig needs at least 2 cameras, got {0}")]
    TooFewCameras(usize),

    /// A configuration parameter is outside its valid range.
    #[error("invalid parameter '{name}': {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A camera index does not address a camera of the rig.
    #[error("camera index {index} out of range for {count} cameras")]
    IndexOutOfRange { index: usize, count: usize },

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for stereosim-rs operations.
pub type Result<T> = std::result::Result<T, StereosimError>;

/// An optical configuration whose solution does not exist.
///
/// Returned when a ray runs parallel to an image plane, when two sight lines
/// never meet, or when a ray has no extent along Z.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("degenerate geometry: {0}")]
pub struct GeometryDegenerate(pub &'static str);

/// Checks that a parameter is finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StereosimError::InvalidParameter { name, value })
    }
}

/// Checks that a parameter is finite.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(StereosimError::InvalidParameter { name, value })
    }
}
