//! End-to-end tests of the simulation pipeline.

use stereosim::*;

fn single_point_scene(point: DVec3) -> SceneObjectConfig {
    SceneObjectConfig::new(ObjectShape::Custom {
        vertices: vec![DVec3::ZERO],
        edges: vec![],
    })
    .with_scale(DVec3::ONE)
    .with_position(point)
}

#[test]
fn test_origin_projects_to_image_center() {
    let mut config = SimulationConfig::default();
    config.rig = RigConfig::new()
        .with_rig_type(RigType::Parallel)
        .with_separation(0.0)
        .with_crossing(0.0)
        .with_height(0.0)
        .with_distance(2.0);
    config.objects = vec![single_point_scene(DVec3::ZERO)];

    let simulation = Simulation::run(&config).unwrap();
    assert_eq!(simulation.out_of_frame, 0);
    for camera in 0..simulation.images.view_count() {
        let p = simulation.images.point(camera, 0, 0).unwrap();
        assert!(p.length() < 1e-12, "camera {camera} projected to {p:?}");
    }
}

#[test]
fn test_rig_symmetry() {
    let parallel = build_rig(
        &RigConfig::new()
            .with_camera_count(6)
            .with_rig_type(RigType::Parallel)
            .with_height(0.2),
    )
    .unwrap();
    let first = parallel.cameras()[0].direction;
    assert!(parallel.cameras().iter().all(|c| (c.direction - first).length() < 1e-12));

    let toe_in = build_rig(
        &RigConfig::new()
            .with_camera_count(5)
            .with_separation(0.3)
            .with_crossing(0.25),
    )
    .unwrap();
    let cameras = toe_in.cameras();
    for i in 0..cameras.len() {
        let a = cameras[i].direction;
        let b = cameras[cameras.len() - 1 - i].direction;
        assert!((a - DVec3::new(-b.x, b.y, b.z)).length() < 1e-12);
    }
}

#[test]
fn test_reconstruction_round_trip_through_eye_cameras() {
    let display = build_display(&DisplayConfig::default());
    let eyes = Eyes::new(&ViewerConfig::default(), &display);
    let cameras = eyes.as_cameras(&display);

    let points = vec![
        DVec3::new(0.0, 0.0, 0.0),
        DVec3::new(0.05, -0.02, 0.3),
        DVec3::new(-0.1, 0.04, -0.2),
        DVec3::new(0.12, 0.08, 1.5),
    ];
    let scene = vec![Wireframe::new(points.clone(), vec![[0, 1], [1, 2], [2, 3]])];
    let projection = project(&cameras, &scene);
    assert_eq!(projection.degenerate, 0);

    let visible = resolve_visibility(
        &DisplayConfig::default(),
        StereoPair::outermost(2),
        &display,
        &eyes,
        &projection.images,
    )
    .unwrap();
    let reconstructed = reconstruct(&eyes, &display, &visible).unwrap();

    for (vertex, expected) in points.iter().enumerate() {
        let perceived = reconstructed.get(0, vertex).unwrap().point().unwrap();
        assert!(
            (perceived - *expected).length() < 1e-6,
            "vertex {vertex}: {perceived:?} != {expected:?}"
        );
    }
}

fn lenticular_config() -> SimulationConfig {
    let mut config = SimulationConfig::default().with_camera_count(3);
    config.rig.separation = 0.1;
    config.display = DisplayConfig::new().with_kind(DisplayKind::Lenticular);
    config.objects = vec![
        SceneObjectConfig::new(ObjectShape::Cube),
        SceneObjectConfig::new(ObjectShape::Octahedron).with_position(DVec3::new(0.1, 0.0, 0.2)),
    ];
    config
}

#[test]
fn test_lenticular_at_optimal_distance_shows_outer_cameras() {
    let config = lenticular_config();
    let simulation = Simulation::run(&config).unwrap();
    assert_eq!(simulation.visible.view_count(), 2);
    assert_eq!(simulation.visible.shape(), simulation.images.shape());

    // Left eye sees the leftmost camera everywhere, right eye the rightmost.
    for (eye, camera) in [(0, 0), (1, 2)] {
        for (object, vertices) in simulation.visible.view(eye).unwrap().iter().enumerate() {
            for (vertex, point) in vertices.iter().enumerate() {
                assert_eq!(
                    *point,
                    simulation.images.point(camera, object, vertex),
                    "eye {eye}, object {object}, vertex {vertex}"
                );
            }
        }
    }
    assert_eq!(
        simulation.reconstructed.perceived_count(),
        simulation.images.point_count()
    );
}

#[test]
fn test_lenticular_off_distance_matches_sight_lines() {
    let mut config = lenticular_config();
    config.viewer = ViewerConfig::new().with_head_distance(0.3);
    let simulation = Simulation::run(&config).unwrap();

    let sheet = LenticularSheet::from_config(&config.display);
    let half_width = simulation.display.half_width();
    let center = simulation.display.center;
    let mut hidden = 0;
    for (eye, record) in simulation.eyes.records().iter().enumerate() {
        let local = DVec2::new(record.location.x - center.x, record.location.z - center.z);
        for (object, vertices) in simulation.visible.view(eye).unwrap().iter().enumerate() {
            for (vertex, point) in vertices.iter().enumerate() {
                let seen: Vec<usize> = (0..3)
                    .filter(|&camera| {
                        let image = simulation.images.point(camera, object, vertex).unwrap();
                        sheet.is_visible(image.x * half_width, camera, 3, local)
                    })
                    .collect();
                let expected = match seen.as_slice() {
                    [camera] => simulation.images.point(*camera, object, vertex),
                    _ => None,
                };
                assert_eq!(*point, expected, "eye {eye}, object {object}, vertex {vertex}");
                if point.is_none() {
                    hidden += 1;
                }
            }
        }
    }
    assert!(hidden > 0);
    assert!(simulation.reconstructed.perceived_count() < simulation.images.point_count());

    // Hidden vertices propagate as hidden.
    for (object, vertices) in simulation.reconstructed.objects().iter().enumerate() {
        for (vertex, perceived) in vertices.iter().enumerate() {
            let left = simulation.visible.point(0, object, vertex).unwrap();
            let right = simulation.visible.point(1, object, vertex).unwrap();
            if left.is_none() || right.is_none() {
                assert_eq!(*perceived, Perceived::Hidden);
            }
        }
    }
}

#[test]
fn test_boundary_point_is_never_assigned_to_two_cameras() {
    let sheet = LenticularSheet::new(3.0, 3.0, 1.0);
    let on_boundary = DVec2::new(-1.0, -2.0);
    let visible: Vec<usize> = (0..3)
        .filter(|&i| sheet.is_visible(0.0, i, 3, on_boundary))
        .collect();
    // Both neighbours claim the boundary, so the point is dropped.
    assert_eq!(visible, vec![0, 1]);
    assert_eq!(sheet.select([0.0; 3], 3, on_boundary), None);

    let just_left = DVec2::new(-1.0 + 1e-9, -2.0);
    assert_eq!(sheet.select([0.0; 3], 3, just_left), Some(1));
    let just_right = DVec2::new(-1.0 - 1e-9, -2.0);
    assert_eq!(sheet.select([0.0; 3], 3, just_right), Some(0));
}

#[test]
fn test_flat_scene_vergence_at_full_comfort() {
    let mut config = SimulationConfig::default();
    config.objects = vec![SceneObjectConfig::new(ObjectShape::Quad).with_position(DVec3::ZERO)];
    config.comfort = 10.0;
    let simulation = Simulation::run(&config).unwrap();

    let head_distance = config.viewer.head_distance;
    for report in [&simulation.global_diagnostics, &simulation.visible_diagnostics] {
        let near = report.vergence_near.absolute.meters().unwrap();
        let far = report.vergence_far.absolute.meters().unwrap();
        assert!((near - head_distance).abs() < 1e-12);
        assert!((far - head_distance).abs() < 1e-12);
    }
}

#[test]
fn test_stereo_pair_clamping() {
    let pair = StereoPair::new(4, 4, 3);
    assert_eq!((pair.left(), pair.offset()), (1, 3));

    let mut config = SimulationConfig::default().with_camera_count(4);
    config.stereo_pair = StereoPair::new(4, 4, 3);
    let simulation = Simulation::run(&config).unwrap();
    // Eye images are the outermost cameras.
    assert_eq!(
        simulation.visible.point(0, 0, 0).unwrap(),
        simulation.images.point(0, 0, 0)
    );
    assert_eq!(
        simulation.visible.point(1, 0, 0).unwrap(),
        simulation.images.point(3, 0, 0)
    );
}

#[test]
fn test_mismatched_stereo_pair_is_rejected() {
    let mut config = SimulationConfig::default().with_camera_count(4);
    config.stereo_pair = StereoPair::outermost(6);
    assert!(matches!(
        Simulation::run(&config),
        Err(StereosimError::SizeMismatch {
            expected: 4,
            actual: 6
        })
    ));
}

#[test]
fn test_unable_to_focus_still_completes() {
    let mut config = SimulationConfig::default();
    config.rig = config.rig.with_crossing(-0.99);
    let simulation = Simulation::run(&config).unwrap();
    assert_eq!(simulation.rig.angle_of_view(), AngleOfView::UnableToFocus);
    // Zero image distance: every ray meets the image plane at the pinhole.
    assert!(simulation
        .images
        .view(0)
        .unwrap()
        .iter()
        .flatten()
        .all(|p| p.length() < 1e-12));
}

#[test]
fn test_config_from_json() {
    let json = SimulationConfig::default().to_json().unwrap();
    let config = SimulationConfig::from_json(&json).unwrap();
    assert!(Simulation::run(&config).is_ok());

    let mut invalid = config;
    invalid.rig.camera_count = 1;
    assert!(matches!(
        Simulation::run(&invalid),
        Err(StereosimError::TooFewCameras(1))
    ));
}

#[test]
fn test_perceived_wireframes_keep_topology() {
    let simulation = Simulation::run(&SimulationConfig::default()).unwrap();
    let perceived = simulation.perceived_wireframes().unwrap();
    assert_eq!(perceived.len(), simulation.scene.len());
    assert_eq!(perceived[0].edges, simulation.scene[0].edges);
    assert_eq!(perceived[0].len(), simulation.scene[0].len());
}

#[test]
fn test_wide_scene_leaves_the_frame() {
    let mut config = SimulationConfig::default();
    config.objects = vec![SceneObjectConfig::new(ObjectShape::Quad)
        .with_scale(DVec3::new(5.0, 5.0, 1.0))];
    let simulation = Simulation::run(&config).unwrap();
    // Quad corners at (±5, ±5, 0) are far outside a 52 degree view from 1 m.
    assert_eq!(simulation.out_of_frame, 8);
    assert_eq!(simulation.degenerate_projections, 0);
}
