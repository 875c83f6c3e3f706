//! Integration tests for the calibscope facade.
//!
//! Note: the process context is shared by every test in this binary, so all
//! checks run in sequence inside a single test function.

use calibscope::*;

fn synthetic_scene() -> CalibratedScene {
    let k = DMat3::from_cols_array_2d(&[[600.0, 0.0, 0.0], [0.0, 600.0, 0.0], [640.0, 360.0, 1.0]]);
    let cameras = [-0.5, 0.5, 1.5]
        .iter()
        .map(|x| {
            let pose = CameraPose::new(DMat3::IDENTITY, DVec3::new(*x, 0.2, 4.0));
            CameraModel::new(k, [0.01, 0.0, 0.0, 0.0], pose)
        })
        .collect();
    CalibratedScene {
        cameras,
        camera_resolution: (1280, 720),
    }
}

fn board_frames(scene: &CalibratedScene, names: &[&str]) -> Vec<Vec<LabeledPoint2D>> {
    let board = BoardGeometry::planar(2, 3, 0.1).unwrap();
    scene
        .cameras
        .iter()
        .map(|camera| {
            names
                .iter()
                .enumerate()
                .flat_map(|(f, name)| {
                    let shift = DVec3::new(0.0, 0.0, 0.3 * f as f64);
                    board.points().iter().map(move |p| (*p + shift, name.to_string()))
                })
                .map(|(p, name)| Labeled::new(camera.project(p).unwrap(), name))
                .collect()
        })
        .collect()
}

#[test]
fn test_basics() {
    // Lifecycle
    {
        assert!(!is_initialized());
        assert!(matches!(options(), Err(CalibscopeError::NotInitialized)));
        assert!(register_camera("early", &CameraPose::identity()).is_err());

        init().expect("init failed");
        assert!(is_initialized());
        assert!(matches!(init(), Err(CalibscopeError::AlreadyInitialized)));

        shutdown();
        assert!(!is_initialized());
        init().expect("re-init failed");
    }

    // Options
    {
        let mut opts = options().unwrap();
        opts.camera_color = Vec4::new(0.0, 0.0, 1.0, 1.0);
        set_options(opts).unwrap();
        assert_eq!(options().unwrap().camera_color, Vec4::new(0.0, 0.0, 1.0, 1.0));
        set_options(Options::default()).unwrap();
    }

    // Camera glyphs
    {
        let pose = CameraPose::new(DMat3::IDENTITY, DVec3::new(0.0, 0.0, -2.0));
        let cam = register_camera("cam", &pose).unwrap();
        assert_eq!(cam.name(), "cam");
        let placement = cam.placement().unwrap();
        assert!((placement.position - DVec3::new(0.0, 0.0, 2.0)).length() < 1e-12);
        assert!(get_camera_glyph("cam").is_some());
        assert!(get_camera_glyph("nonexistent").is_none());
        assert!(matches!(
            register_camera("cam", &pose),
            Err(CalibscopeError::StructureExists(name)) if name == "cam"
        ));

        // hiding the only structure resets the scene extents
        let ((_, max), _) = scene_extents().unwrap();
        assert!(max.z > 1.5);
        cam.set_enabled(false);
        assert_eq!(scene_extents().unwrap(), ((DVec3::ZERO, DVec3::ONE), 1.0));
        cam.set_enabled(true);
        let ((_, max), _) = scene_extents().unwrap();
        assert!(max.z > 1.5);

        let bad = CameraPose::new(DMat3::from_diagonal(DVec3::splat(2.0)), DVec3::ZERO);
        assert!(matches!(
            register_camera("bad", &bad),
            Err(CalibscopeError::InvalidRotation { .. })
        ));
        assert!(get_camera_glyph("bad").is_none());

        assert!(remove_structure("CameraGlyph", "cam"));
        assert!(!remove_structure("CameraGlyph", "cam"));
    }

    // Boards and points
    {
        let board = BoardGeometry::planar(3, 4, 0.05).unwrap();
        let mesh = register_calib_board("board", &board, DVec3::ZERO, DVec3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(mesh.segments().unwrap().len(), 17 + 3);

        let corners: Vec<DVec2> = (0..12).map(|i| DVec2::new(f64::from(i), 0.0)).collect();
        let overlay = register_board_overlay("overlay", &[corners.clone(), corners], 3, 4, (640, 480)).unwrap();
        assert_eq!(overlay.num_segments(), Some(34));
        assert!(register_board_overlay("short", &[vec![DVec2::ZERO]], 3, 4, (640, 480)).is_err());

        let pts = register_points("pts", vec![DVec3::ZERO, DVec3::ONE], Vec4::ONE, 2.0).unwrap();
        assert_eq!(pts.points().unwrap().len(), 2);
        let ((min, max), scale) = scene_extents().unwrap();
        assert!(min.cmple(DVec3::ZERO).all());
        assert!(max.cmpge(DVec3::ONE).all());
        assert!(scale > 0.0);

        remove_all_structures();
        assert!(get_calib_board("board").is_none());
        assert!(get_point_set("pts").is_none());
    }

    // Scene plotting in label mode
    {
        let scene = synthetic_scene();
        let mut frames = board_frames(&scene, &["img1", "img2"]);
        frames[2].clear();
        let source = PointsSource::Labeled(
            frames
                .into_iter()
                .map(|corners| {
                    corners
                        .chunks(6)
                        .map(|chunk| {
                            let label = chunk[0].label.clone();
                            Labeled::new(chunk.iter().map(|c| c.value).collect(), label)
                        })
                        .collect()
                })
                .collect(),
        );

        let outcomes = plot_scene(&scene, &source, None, &FisheyeTriangulator::default()).unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_triangulated());
        assert_eq!(outcomes[0].points().unwrap().len(), 12);
        assert!(!outcomes[1].is_triangulated());
        assert!(!outcomes[2].is_triangulated());

        assert_eq!(
            structure_names("CameraGlyph"),
            vec!["camera 0".to_string(), "camera 1".to_string(), "camera 2".to_string()]
        );
        assert_eq!(structure_names("PointSet"), vec!["points 0-1".to_string()]);
        let color = with_point_set("points 0-1", |set| set.color()).unwrap();
        assert_eq!(color, Options::default().pair_color(0));

        // plotting again replaces the structures
        plot_scene(&scene, &source, None, &FisheyeTriangulator::default()).unwrap();
        assert_eq!(structure_names("CameraGlyph").len(), 3);
    }

    // Scene files
    {
        let scene = synthetic_scene();
        let path = std::env::temp_dir().join(format!("calibscope_scene_{}.json", std::process::id()));
        save_scene(&path, &scene).unwrap();
        let loaded = load_scene(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, scene);
        assert!(matches!(
            load_points("/nonexistent/points.json"),
            Err(CalibscopeError::IoError(_))
        ));
    }

    shutdown();
    assert!(plot_scene(
        &synthetic_scene(),
        &PointsSource::Labeled(Vec::new()),
        None,
        &FisheyeTriangulator::default()
    )
    .is_err());
}
