#![allow(clippy::cast_precision_loss)]
//! Scene plotting demonstration on a synthetic four-camera rig.
//!
//! This demo shows:
//! - Building a calibrated scene in memory and saving it as JSON
//! - Label-mode plotting from board detections shared by frame name
//! - Defined-points plotting for a subset of camera pairs
//! - Board meshes, 2D overlays and an animation over the markers
//!
//! Run with: `RUST_LOG=info cargo run --example scene_demo`
//!
//! Pass a scene file followed by one points file per camera to plot real
//! calibration output instead.

use calibscope::*;

const RADIUS: f64 = 3.0;

/// World-to-camera pose of a camera on a circle, looking at the origin.
fn look_at_origin(angle_deg: f64) -> CameraPose {
    let a = angle_deg.to_radians();
    let center = DVec3::new(RADIUS * a.sin(), -0.3, RADIUS * a.cos());
    let z = -center.normalize();
    let y = DVec3::NEG_Y.reject_from(z).normalize();
    let x = y.cross(z);
    let rotation = DMat3::from_cols(x, y, z).transpose();
    CameraPose::new(rotation, -(rotation * center))
}

fn synthetic_scene() -> CalibratedScene {
    let k = DMat3::from_cols_array_2d(&[[900.0, 0.0, 0.0], [0.0, 900.0, 0.0], [960.0, 540.0, 1.0]]);
    let cameras = [-45.0, -15.0, 15.0, 45.0]
        .iter()
        .map(|angle| CameraModel::new(k, [0.05, -0.01, 0.002, 0.0], look_at_origin(*angle)))
        .collect();
    CalibratedScene {
        cameras,
        camera_resolution: (1920, 1080),
    }
}

/// Rotation vector and translation of the board in frame `f`.
fn board_pose(f: usize) -> (DVec3, DVec3) {
    (
        DVec3::new(0.2 * f as f64, 0.1, 0.0),
        DVec3::new(-0.2, -0.15, 0.1 * f as f64),
    )
}

/// Board corners of each frame, in world coordinates.
fn board_frames(board: &BoardGeometry) -> Vec<(String, Vec<DVec3>)> {
    (0..3)
        .map(|f| {
            let (rv, t) = board_pose(f);
            let rotation = rotation_from_rotation_vector(rv);
            let corners = board.points().iter().map(|p| rotation * *p + t).collect();
            (format!("img{:05}.jpg", f + 1), corners)
        })
        .collect()
}

fn label_source(scene: &CalibratedScene, frames: &[(String, Vec<DVec3>)]) -> PointsSource {
    let per_camera = scene
        .cameras
        .iter()
        .enumerate()
        .map(|(c, camera)| {
            frames
                .iter()
                // the last camera missed the first two frames
                .skip(if c == 3 { 2 } else { 0 })
                .filter_map(|(name, corners)| {
                    let pixels: Option<Vec<DVec2>> = corners.iter().map(|p| camera.project(*p)).collect();
                    pixels.map(|pixels| Labeled::new(pixels, name.clone()))
                })
                .collect()
        })
        .collect();
    PointsSource::Labeled(per_camera)
}

fn defined_source(scene: &CalibratedScene, markers: &[DVec3]) -> Result<PointsSource> {
    let names = (0..markers.len()).map(|i| format!("marker {i}")).collect();
    let table = markers
        .iter()
        .enumerate()
        .map(|(m, p)| {
            scene
                .cameras
                .iter()
                .enumerate()
                .map(|(c, camera)| if (m + c) % 5 == 0 { None } else { camera.project(*p) })
                .collect()
        })
        .collect();
    Ok(PointsSource::Defined(DefinedPoints::new(names, table)?))
}

fn plot_from_files(args: &[String]) -> Result<()> {
    let scene = load_scene(&args[0])?;
    let detections = args[1..].iter().map(load_points).collect::<Result<Vec<_>>>()?;
    for (i, det) in detections.iter().enumerate() {
        register_board_overlay(
            format!("overlay {i}"),
            &det.corner_sets(),
            det.rows,
            det.cols,
            det.camera_resolution,
        )?;
    }
    let source = PointsSource::from_detections(&detections);
    for outcome in plot_scene(&scene, &source, None, &FisheyeTriangulator::default())? {
        println!("{outcome}");
    }
    Ok(())
}

fn main() -> Result<()> {
    init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() >= 2 {
        plot_from_files(&args)?;
        shutdown();
        return Ok(());
    }

    let scene = synthetic_scene();
    let path = std::env::temp_dir().join("calibscope_demo_scene.json");
    save_scene(&path, &scene)?;
    let scene = load_scene(&path)?;

    // Boards
    let board = BoardGeometry::planar(4, 5, 0.1)?;
    let frames = board_frames(&board);
    for (f, (name, _)) in frames.iter().enumerate() {
        let (rv, t) = board_pose(f);
        register_calib_board(name.as_str(), &board, rv, t)?;
    }

    // Label mode over ring pairs
    println!("label mode:");
    let source = label_source(&scene, &frames);
    for outcome in plot_scene(&scene, &source, None, &FisheyeTriangulator::default())? {
        println!("  {outcome}");
    }

    // Defined points for two chosen pairs
    println!("defined points:");
    let markers: Vec<DVec3> = (0..8)
        .map(|i| {
            let a = i as f64 * std::f64::consts::FRAC_PI_4;
            DVec3::new(0.3 * a.cos(), 0.2 * a.sin(), 0.1)
        })
        .collect();
    let source = defined_source(&scene, &markers)?;
    let pairs = [CameraPair::new(0, 2), CameraPair::new(1, 3)];
    for outcome in plot_scene(&scene, &source, Some(&pairs), &FisheyeTriangulator::default())? {
        println!("  {outcome}");
    }

    // Markers drifting along X, with a segment to the origin per marker
    let scatter: Vec<Vec<DVec3>> = (0..10)
        .map(|f| markers.iter().map(|m| *m + DVec3::X * 0.02 * f as f64).collect())
        .collect();
    let lines = scatter
        .iter()
        .map(|frame| frame.iter().flat_map(|p| [*p, DVec3::ZERO]).collect())
        .collect();
    let mut animation = Animation::new(scatter, lines, &scene.cameras)?;
    for _ in 0..12 {
        let index = animation.advance();
        if let Some(frame) = animation.frame(index) {
            let visible = frame.camera_lines[0].iter().filter(|p| p.is_some()).count();
            log::debug!("frame {index}: {visible} vertices visible in camera 0");
        }
    }

    if let Some(((min, max), scale)) = scene_extents() {
        println!("scene extents: {min} .. {max} (length scale {scale:.3})");
    }
    println!("cameras: {:?}", structure_names("CameraGlyph"));
    println!("point sets: {:?}", structure_names("PointSet"));

    std::fs::remove_file(&path)?;
    shutdown();
    Ok(())
}
