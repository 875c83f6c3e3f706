//! JSON loaders for calibration results and detections.
//!
//! File layouts follow what the calibration tools write:
//!
//! - scene: `{"k": [...], "d": [...], "r": [...], "t": [...], "camera_resolution": [w, h]}`
//!   with one entry per camera; `d` and `t` may be flat or column vectors.
//! - points: `{"points": [...], "frame_names": [...], "board_shape": [cols, rows],
//!   "board_edge_len": len, "camera_resolution": [w, h]}`.
//! - defined points: `{"marker_names": [...], "points": [[[u, v] | null, ...], ...]}`,
//!   indexed `[marker][camera]`.

use std::fs;
use std::path::Path;

use calibscope_core::{
    corner_count, BoardGeometry, CalibscopeError, CameraModel, CameraPose, Labeled, Result,
};
use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::scene::DefinedPoints;

/// Calibrated cameras of one scene.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibratedScene {
    /// One model per camera, in file order.
    pub cameras: Vec<CameraModel>,
    /// Image size `(width, height)` shared by all cameras.
    pub camera_resolution: (u32, u32),
}

impl CalibratedScene {
    /// Number of cameras.
    #[must_use]
    pub fn num_cameras(&self) -> usize {
        self.cameras.len()
    }
}

/// Board corner detections of one camera, one entry per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardDetections {
    /// Row-major corners labeled by frame name.
    pub frames: Vec<Labeled<Vec<DVec2>, String>>,
    /// Corner rows.
    pub rows: usize,
    /// Corner columns.
    pub cols: usize,
    /// Board square edge length.
    pub square_len: f64,
    /// Image size `(width, height)`.
    pub camera_resolution: (u32, u32),
}

impl BoardDetections {
    /// Board geometry matching these detections.
    pub fn board(&self) -> Result<BoardGeometry> {
        BoardGeometry::planar(self.rows, self.cols, self.square_len)
    }

    /// Corner lists without frame labels, for overlays.
    #[must_use]
    pub fn corner_sets(&self) -> Vec<Vec<DVec2>> {
        self.frames.iter().map(|f| f.value.clone()).collect()
    }
}

/// A scalar or a one-element array, as column vectors are serialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
enum Component {
    Flat(f64),
    Column([f64; 1]),
}

impl Component {
    fn value(self) -> f64 {
        match self {
            Component::Flat(v) | Component::Column([v]) => v,
        }
    }
}

/// A pixel as `[u, v]` or `[[u, v]]`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum Pixel {
    Flat([f64; 2]),
    Nested([[f64; 2]; 1]),
}

impl Pixel {
    fn value(self) -> DVec2 {
        match self {
            Pixel::Flat(p) | Pixel::Nested([p]) => DVec2::from_array(p),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SceneFile {
    k: Vec<[[f64; 3]; 3]>,
    d: Vec<Vec<Component>>,
    r: Vec<[[f64; 3]; 3]>,
    t: Vec<Vec<Component>>,
    camera_resolution: [u32; 2],
}

#[derive(Debug, Deserialize)]
struct PointsFile {
    points: Vec<Vec<Pixel>>,
    frame_names: Vec<String>,
    board_shape: [usize; 2],
    board_edge_len: f64,
    camera_resolution: [u32; 2],
}

#[derive(Debug, Deserialize)]
struct DefinedPointsFile {
    #[serde(default)]
    marker_names: Vec<String>,
    points: Vec<Vec<Option<[f64; 2]>>>,
}

/// Loads a calibrated scene from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> Result<CalibratedScene> {
    let path = path.as_ref();
    let scene = parse_scene(&fs::read_to_string(path)?)?;
    log::info!(
        "loaded {} cameras from {}",
        scene.num_cameras(),
        path.display()
    );
    Ok(scene)
}

/// Parses a calibrated scene from JSON text.
pub fn parse_scene(json: &str) -> Result<CalibratedScene> {
    let file: SceneFile = serde_json::from_str(json)?;
    let n = file.k.len();
    for len in [file.d.len(), file.r.len(), file.t.len()] {
        check_len(n, len)?;
    }

    let cameras = (0..n)
        .map(|i| -> Result<CameraModel> {
            let d = fixed::<4>(&file.d[i])?;
            let t = fixed::<3>(&file.t[i])?;
            let k = DMat3::from_cols_array_2d(&file.k[i]).transpose();
            let r = DMat3::from_cols_array_2d(&file.r[i]).transpose();
            Ok(CameraModel::new(k, d, CameraPose::new(r, DVec3::from_array(t))))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CalibratedScene {
        cameras,
        camera_resolution: (file.camera_resolution[0], file.camera_resolution[1]),
    })
}

/// Writes a calibrated scene as JSON, with `d` and `t` as column vectors.
pub fn save_scene(path: impl AsRef<Path>, scene: &CalibratedScene) -> Result<()> {
    fs::write(path, scene_to_json(scene)?)?;
    Ok(())
}

/// Serializes a calibrated scene to pretty JSON text.
pub fn scene_to_json(scene: &CalibratedScene) -> Result<String> {
    let rows = |m: &DMat3| m.transpose().to_cols_array_2d();
    let column = |v: &[f64]| v.iter().map(|x| Component::Column([*x])).collect::<Vec<_>>();
    let file = SceneFile {
        k: scene.cameras.iter().map(|c| rows(&c.k)).collect(),
        d: scene.cameras.iter().map(|c| column(&c.distortion)).collect(),
        r: scene.cameras.iter().map(|c| rows(&c.pose.rotation)).collect(),
        t: scene
            .cameras
            .iter()
            .map(|c| column(&c.pose.translation.to_array()))
            .collect(),
        camera_resolution: [scene.camera_resolution.0, scene.camera_resolution.1],
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

/// Loads board corner detections of one camera from a JSON file.
pub fn load_points(path: impl AsRef<Path>) -> Result<BoardDetections> {
    let path = path.as_ref();
    let detections = parse_points(&fs::read_to_string(path)?)?;
    log::info!(
        "loaded {} frames of {}x{} corners from {}",
        detections.frames.len(),
        detections.rows,
        detections.cols,
        path.display()
    );
    Ok(detections)
}

/// Parses board corner detections from JSON text.
///
/// `board_shape` is stored as `[cols, rows]`.
pub fn parse_points(json: &str) -> Result<BoardDetections> {
    let file: PointsFile = serde_json::from_str(json)?;
    check_len(file.points.len(), file.frame_names.len())?;

    let [cols, rows] = file.board_shape;
    let expected = corner_count(rows, cols)?;
    let frames = file
        .points
        .into_iter()
        .zip(file.frame_names)
        .map(|(corners, name)| {
            if corners.len() != expected {
                return Err(CalibscopeError::InvalidBoardShape {
                    rows,
                    cols,
                    points: corners.len(),
                });
            }
            Ok(Labeled::new(corners.into_iter().map(Pixel::value).collect(), name))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BoardDetections {
        frames,
        rows,
        cols,
        square_len: file.board_edge_len,
        camera_resolution: (file.camera_resolution[0], file.camera_resolution[1]),
    })
}

/// Loads user-defined marker pixels for all cameras from a JSON file.
pub fn load_defined_points(path: impl AsRef<Path>) -> Result<DefinedPoints> {
    let path = path.as_ref();
    let points = parse_defined_points(&fs::read_to_string(path)?)?;
    log::info!(
        "loaded {} defined markers over {} cameras from {}",
        points.num_markers(),
        points.num_cameras(),
        path.display()
    );
    Ok(points)
}

/// Parses user-defined marker pixels from JSON text.
pub fn parse_defined_points(json: &str) -> Result<DefinedPoints> {
    let file: DefinedPointsFile = serde_json::from_str(json)?;
    let points = file
        .points
        .into_iter()
        .map(|row| row.into_iter().map(|p| p.map(DVec2::from_array)).collect())
        .collect();
    DefinedPoints::new(file.marker_names, points)
}

fn fixed<const N: usize>(values: &[Component]) -> Result<[f64; N]> {
    check_len(N, values.len())?;
    let mut out = [0.0; N];
    for (o, v) in out.iter_mut().zip(values) {
        *o = v.value();
    }
    Ok(out)
}

fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(CalibscopeError::DimensionMismatch { expected, actual })
    }
}
