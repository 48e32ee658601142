//! Core types for stereosim-rs.
//!
//! This crate provides the value types and leaf algorithms the simulation
//! pipeline is built from:
//! - [`math`] vector algebra, determinants and ray intersection
//! - Configuration structs for the rig, display, viewer and scene
//! - [`CameraRecord`], [`EyeRecord`] and [`DisplayRecord`]
//! - Scene [`Wireframe`]s built from canonical templates
//! - [`ImageStack`] containers for projected and visible points
//! - The [`StereoPair`] camera selection for stereoscopic displays

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Optics formulas read better with their usual single-letter names
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod error;
pub mod image;
pub mod math;
pub mod options;
pub mod records;
pub mod stereo_pair;
pub mod wireframe;

pub use error::{GeometryDegenerate, Result, StereosimError};
pub use image::{ImagePoint, ImageStack, Images, VisibleImages};
pub use options::{
    ColorScheme, DisplayConfig, DisplayKind, RigConfig, RigType, SceneObjectConfig,
    SimulationConfig, ViewerConfig,
};
pub use records::{CameraRecord, DisplayRecord, EyeRecord};
pub use stereo_pair::StereoPair;
pub use wireframe::{build_scene, ObjectShape, Wireframe};

// Re-export glam types for convenience
pub use glam::{DMat3, DVec2, DVec3};
