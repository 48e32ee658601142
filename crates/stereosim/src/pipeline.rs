//! One full simulation pass.

use stereosim_core::{
    build_scene, DisplayRecord, Images, Result, SimulationConfig, VisibleImages, Wireframe,
};

use crate::diagnostics::{compute_diagnostics, DiagnosticsReport, ImageSource};
use crate::projector::project;
use crate::reconstruct::{reconstruct, ReconstructedScene};
use crate::rig::{build_rig, Rig};
use crate::viewer::{build_display, Eyes};
use crate::visibility::resolve_visibility;

/// Every stage output of a pass, from rig to diagnostics.
///
/// A pass is a pure function of its configuration; rerun it after any
/// configuration change.
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Camera rig.
    pub rig: Rig,
    /// Placed scene objects.
    pub scene: Vec<Wireframe>,
    /// Display plane.
    pub display: DisplayRecord,
    /// Viewer eyes.
    pub eyes: Eyes,
    /// Camera images, `[camera][object][vertex]`.
    pub images: Images,
    /// Projections that had no solution.
    pub degenerate_projections: usize,
    /// Projected points outside their camera's sensor frame.
    pub out_of_frame: usize,
    /// Eye images, `[eye][object][vertex]`.
    pub visible: VisibleImages,
    /// Perceived scene.
    pub reconstructed: ReconstructedScene,
    /// Diagnostics over the outermost cameras.
    pub global_diagnostics: DiagnosticsReport,
    /// Diagnostics over what the eyes see.
    pub visible_diagnostics: DiagnosticsReport,
}

impl Simulation {
    /// Validates `config` and runs rig → project → resolve → reconstruct → diagnostics.
    pub fn run(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;

        let rig = build_rig(&config.rig)?;
        let scene = build_scene(&config.objects);
        let display = build_display(&config.display);
        let eyes = Eyes::new(&config.viewer, &display);

        let projection = project(rig.cameras(), &scene);
        let images = projection.images;
        let out_of_frame = rig
            .cameras()
            .iter()
            .enumerate()
            .map(|(view, camera)| {
                images.view(view).map_or(0, |objects| {
                    objects
                        .iter()
                        .flatten()
                        .filter(|p| p.is_finite() && !camera.in_frame(**p))
                        .count()
                })
            })
            .sum::<usize>();
        if out_of_frame > 0 {
            log::debug!("{out_of_frame} projected points fall outside the sensor frame");
        }
        let visible = resolve_visibility(
            &config.display,
            config.stereo_pair,
            &display,
            &eyes,
            &images,
        )?;
        let reconstructed = reconstruct(&eyes, &display, &visible)?;

        let global_diagnostics = compute_diagnostics(
            &images,
            &config.display,
            &config.viewer,
            config.comfort,
            ImageSource::Global,
        );
        let visible_diagnostics = compute_diagnostics(
            &visible,
            &config.display,
            &config.viewer,
            config.comfort,
            ImageSource::Visible,
        );

        log::info!(
            "{:?} display, {} cameras, {} objects: {} of {} vertices perceived, angle of view {}",
            config.display.kind,
            rig.len(),
            scene.len(),
            reconstructed.perceived_count(),
            images.point_count(),
            rig.angle_of_view()
        );

        Ok(Self {
            rig,
            scene,
            display,
            eyes,
            images,
            degenerate_projections: projection.degenerate,
            out_of_frame,
            visible,
            reconstructed,
            global_diagnostics,
            visible_diagnostics,
        })
    }

    /// The scene as the viewer perceives it.
    pub fn perceived_wireframes(&self) -> Result<Vec<Wireframe>> {
        self.reconstructed.to_wireframes(&self.scene)
    }
}
