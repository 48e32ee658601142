//! stereosim-rs: a multi-camera stereoscopic photography simulator.
//!
//! Builds a virtual camera rig, projects wireframe scene objects onto each
//! camera's image plane, works out which image each eye sees on a flat
//! stereoscopic or lenticular autostereoscopic display, reconstructs the
//! 3-D scene the viewer perceives, and reports viewing comfort diagnostics.
//!
//! # Quick Start
//!
//! ```no_run
//! use stereosim::*;
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let mut config = SimulationConfig::default().with_camera_count(4);
//!     config.display = config.display.with_kind(DisplayKind::Lenticular);
//!
//!     let simulation = Simulation::run(&config)?;
//!     println!("{}", simulation.rig.angle_of_view());
//!     Ok(())
//! }
//! ```
//!
//! # Pipeline
//!
//! - [`build_rig`] - camera records from a [`RigConfig`]
//! - [`project`] - `[camera][object][vertex]` image points
//! - [`resolve_visibility`] - the two eye images for the display
//! - [`reconstruct`] - perceived 3-D position of every vertex
//! - [`compute_diagnostics`] - disparity, vergence and parallax

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
#![allow(clippy::many_single_char_names)]

pub mod diagnostics;
pub mod pipeline;
pub mod projector;
pub mod reconstruct;
pub mod rig;
pub mod viewer;
pub mod visibility;

// Re-export core types
pub use stereosim_core::{
    build_scene,
    error::{GeometryDegenerate, Result, StereosimError},
    math, CameraRecord, ColorScheme, DisplayConfig, DisplayKind, DisplayRecord, EyeRecord,
    ImagePoint, ImageStack, Images, ObjectShape, RigConfig, RigType, SceneObjectConfig,
    SimulationConfig, StereoPair, ViewerConfig, VisibleImages, Wireframe, DMat3, DVec2, DVec3,
};

pub use diagnostics::{
    compute_diagnostics, vergence_distances, ComfortFlags, DiagnosticsReport, Disparity, Distance,
    ImageSource, VergenceBound, VerticalDisparity,
};
pub use pipeline::Simulation;
pub use projector::{project, project_point, Projection};
pub use reconstruct::{reconstruct, Perceived, ReconstructedScene};
pub use rig::{build_rig, AngleOfView, Rig};
pub use viewer::{build_display, Eyes};
pub use visibility::{resolve_visibility, LenticularSheet};

/// Initializes `env_logger` for binaries and examples.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
