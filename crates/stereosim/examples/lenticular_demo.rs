//! Runs one simulation pass per display kind and prints the diagnostics.
//!
//! Pass a JSON configuration path to override the built-in scene:
//!
//! ```sh
//! RUST_LOG=debug cargo run --example lenticular_demo -- config.json
//! ```

use stereosim::*;

fn default_config() -> SimulationConfig {
    let mut config = SimulationConfig::default().with_camera_count(5);
    config.rig = config
        .rig
        .with_separation(0.2)
        .with_distance(1.2)
        .with_crossing(0.0);
    config.objects = vec![
        SceneObjectConfig::new(ObjectShape::Cube).with_rotation(DVec3::new(20.0, 30.0, 0.0)),
        SceneObjectConfig::new(ObjectShape::Pyramid).with_position(DVec3::new(0.12, -0.05, 0.15)),
        SceneObjectConfig::new(ObjectShape::Axes).with_position(DVec3::new(-0.15, 0.0, -0.1)),
    ];
    config.stereo_pair = StereoPair::new(5, 2, 2);
    config
}

fn print_report(label: &str, report: &DiagnosticsReport) {
    println!("  {label}: {} points in both images", report.point_count);
    if let (Some(min), Some(max)) = (&report.disparity_min, &report.disparity_max) {
        println!(
            "    disparity {:.2} .. {:.2} mm ({:.1} .. {:.1} px)",
            min.millimeters, max.millimeters, min.pixels, max.pixels
        );
    }
    if let Some(vertical) = &report.vertical_max {
        println!("    vertical disparity {:.2} arcmin", vertical.parallax_arcmin);
    }
    println!(
        "    comfortable vergence {} .. {} m",
        report.vergence_near.absolute, report.vergence_far.absolute
    );
    if let Some(flags) = report.comfort {
        println!(
            "    near ok: {}, far ok: {}, diverging: {}",
            flags.near_ok, flags.far_ok, flags.diverging
        );
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let mut config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading configuration from {path}");
            let json = std::fs::read_to_string(&path)?;
            SimulationConfig::from_json(&json)?
        }
        None => default_config(),
    };

    for kind in [DisplayKind::Stereoscopic, DisplayKind::Lenticular] {
        config.display = config.display.with_kind(kind);
        let simulation = Simulation::run(&config)?;

        println!("{kind:?} display");
        println!("  angle of view: {}", simulation.rig.angle_of_view());
        println!(
            "  perceived {} of {} vertices ({} degenerate)",
            simulation.reconstructed.perceived_count(),
            simulation.images.point_count(),
            simulation.reconstructed.degenerate_count()
        );
        print_report("global", &simulation.global_diagnostics);
        print_report("visible", &simulation.visible_diagnostics);
    }
    Ok(())
}
