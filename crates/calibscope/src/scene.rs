//! Pairwise triangulation of a calibrated scene.
//!
//! [`build_scene`] turns a [`CalibratedScene`] and per-camera 2D
//! observations into camera glyphs and one colored point set per camera
//! pair. [`plot_scene`] does the same and registers the result with the
//! process context.

use std::fmt;

use calibscope_core::{
    match_correspondences, CalibscopeError, Labeled, Options, Result, Triangulator,
};
use calibscope_structures::{CameraGlyph, PointSet};
use glam::{DVec2, DVec3, Vec4};

use crate::io::{BoardDetections, CalibratedScene};

/// Two camera indices, stored with `first < second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraPair {
    /// Lower camera index.
    pub first: usize,
    /// Higher camera index.
    pub second: usize,
}

impl CameraPair {
    /// Creates a pair, sorting the indices.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }
}

impl fmt::Display for CameraPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Pairs every camera with the next one, the last with the first.
///
/// Self-pairs and repeated pairs are skipped, so one camera yields no
/// pairs and two cameras yield a single pair.
pub fn ring_pairs(num_cameras: usize) -> Vec<CameraPair> {
    let mut pairs: Vec<CameraPair> = Vec::with_capacity(num_cameras);
    for c in 0..num_cameras {
        let next = (c + 1) % num_cameras;
        if next == c {
            continue;
        }
        let pair = CameraPair::new(c, next);
        if !pairs.contains(&pair) {
            pairs.push(pair);
        }
    }
    pairs
}

/// User-defined marker pixels, indexed `[marker][camera]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinedPoints {
    marker_names: Vec<String>,
    points: Vec<Vec<Option<DVec2>>>,
}

impl DefinedPoints {
    /// Creates the marker table.
    ///
    /// Every marker must list the same number of cameras. `marker_names`
    /// may be empty; otherwise it needs one name per marker.
    pub fn new(marker_names: Vec<String>, points: Vec<Vec<Option<DVec2>>>) -> Result<Self> {
        if !marker_names.is_empty() && marker_names.len() != points.len() {
            return Err(CalibscopeError::DimensionMismatch {
                expected: points.len(),
                actual: marker_names.len(),
            });
        }
        if let Some(first) = points.first() {
            let expected = first.len();
            if let Some(row) = points.iter().find(|row| row.len() != expected) {
                return Err(CalibscopeError::DimensionMismatch {
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(Self {
            marker_names,
            points,
        })
    }

    /// Number of markers.
    pub fn num_markers(&self) -> usize {
        self.points.len()
    }

    /// Number of cameras each marker lists.
    pub fn num_cameras(&self) -> usize {
        self.points.first().map_or(0, Vec::len)
    }

    /// Marker names, empty when the file had none.
    pub fn marker_names(&self) -> &[String] {
        &self.marker_names
    }

    /// Pixels of the markers seen by both cameras, index-aligned.
    ///
    /// Missing and non-finite pixels are left out. The third vector holds
    /// the marker indices that were kept.
    pub fn pair_points(
        &self,
        first: usize,
        second: usize,
    ) -> Result<(Vec<DVec2>, Vec<DVec2>, Vec<usize>)> {
        let count = self.num_cameras();
        for index in [first, second] {
            if index >= count {
                return Err(CalibscopeError::CameraIndexOutOfRange { index, count });
            }
        }

        let mut points_a = Vec::new();
        let mut points_b = Vec::new();
        let mut markers = Vec::new();
        for (marker, row) in self.points.iter().enumerate() {
            if let (Some(a), Some(b)) = (row[first], row[second]) {
                if a.is_finite() && b.is_finite() {
                    points_a.push(a);
                    points_b.push(b);
                    markers.push(marker);
                }
            }
        }
        Ok((points_a, points_b, markers))
    }
}

/// Per-camera 2D observations to triangulate.
#[derive(Debug, Clone, PartialEq)]
pub enum PointsSource {
    /// Board corners per camera, one labeled entry per frame.
    Labeled(Vec<Vec<Labeled<Vec<DVec2>, String>>>),
    /// Individual markers clicked in each camera.
    Defined(DefinedPoints),
}

impl PointsSource {
    /// Label mode from loaded board detections, one entry per camera.
    pub fn from_detections(detections: &[BoardDetections]) -> Self {
        Self::Labeled(detections.iter().map(|d| d.frames.clone()).collect())
    }

    /// Number of cameras with observations.
    pub fn num_cameras(&self) -> usize {
        match self {
            Self::Labeled(frames) => frames.len(),
            Self::Defined(defined) => defined.num_cameras(),
        }
    }

    /// Point size for triangulated sets of this source.
    pub fn point_size(&self, options: &Options) -> f32 {
        match self {
            Self::Labeled(_) => options.board_point_size,
            Self::Defined(_) => options.defined_point_size,
        }
    }

    /// Corresponding pixels of a camera pair, index-aligned.
    fn pair_correspondences(&self, pair: CameraPair) -> Result<(Vec<DVec2>, Vec<DVec2>)> {
        let (points_a, points_b) = match self {
            Self::Labeled(frames) => {
                let count = frames.len();
                let frames_of = |index: usize| {
                    frames
                        .get(index)
                        .ok_or(CalibscopeError::CameraIndexOutOfRange { index, count })
                };
                let matched = match_correspondences(frames_of(pair.first)?, frames_of(pair.second)?);

                let mut points_a = Vec::new();
                let mut points_b = Vec::new();
                for (corners_a, corners_b) in matched.points_a.iter().zip(&matched.points_b) {
                    if corners_a.len() != corners_b.len() {
                        return Err(CalibscopeError::DimensionMismatch {
                            expected: corners_a.len(),
                            actual: corners_b.len(),
                        });
                    }
                    points_a.extend_from_slice(corners_a);
                    points_b.extend_from_slice(corners_b);
                }
                log::debug!(
                    "cameras {pair}: {} shared frames, {} corners",
                    matched.len(),
                    points_a.len()
                );
                (points_a, points_b)
            }
            Self::Defined(defined) => {
                let (points_a, points_b, _) = defined.pair_points(pair.first, pair.second)?;
                (points_a, points_b)
            }
        };

        if points_a.is_empty() {
            return Err(CalibscopeError::NoCorrespondences {
                first: pair.first,
                second: pair.second,
            });
        }
        Ok((points_a, points_b))
    }
}

/// Result of one camera pair.
#[derive(Debug)]
pub enum PairOutcome {
    /// Points were reconstructed.
    Triangulated {
        pair: CameraPair,
        points: Vec<DVec3>,
        color: Vec4,
    },
    /// The pair was left out of the scene.
    Skipped {
        pair: CameraPair,
        reason: CalibscopeError,
    },
}

impl PairOutcome {
    /// The camera pair this outcome belongs to.
    pub fn pair(&self) -> CameraPair {
        match self {
            Self::Triangulated { pair, .. } | Self::Skipped { pair, .. } => *pair,
        }
    }

    /// Reconstructed points, `None` for skipped pairs.
    pub fn points(&self) -> Option<&[DVec3]> {
        match self {
            Self::Triangulated { points, .. } => Some(points),
            Self::Skipped { .. } => None,
        }
    }

    /// Whether the pair produced points.
    pub fn is_triangulated(&self) -> bool {
        matches!(self, Self::Triangulated { .. })
    }
}

impl fmt::Display for PairOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Triangulated { pair, points, .. } => {
                write!(f, "cameras {pair}: {} points", points.len())
            }
            Self::Skipped { pair, reason } => write!(f, "cameras {pair}: skipped ({reason})"),
        }
    }
}

/// Geometry of a plotted scene, before registration.
#[derive(Debug)]
pub struct SceneAssembly {
    /// One glyph per camera, named `camera {i}`.
    pub cameras: Vec<CameraGlyph>,
    /// One point set per triangulated pair, named `points {a}-{b}`.
    pub point_sets: Vec<PointSet>,
    /// One outcome per requested pair, in request order.
    pub outcomes: Vec<PairOutcome>,
}

/// Builds camera glyphs and triangulated point sets.
///
/// `pairs` defaults to [`ring_pairs`] over the scene's cameras. A pair that
/// cannot be triangulated becomes [`PairOutcome::Skipped`]; an invalid
/// camera pose fails the whole scene. The `i`-th requested pair gets the
/// `i`-th palette color.
pub fn build_scene(
    scene: &CalibratedScene,
    source: &PointsSource,
    pairs: Option<&[CameraPair]>,
    triangulator: &dyn Triangulator,
    options: &Options,
) -> Result<SceneAssembly> {
    let cameras = scene
        .cameras
        .iter()
        .enumerate()
        .map(|(i, model)| {
            CameraGlyph::from_pose(
                format!("camera {i}"),
                &model.pose,
                options.camera_color,
                options.rotation_tolerance,
            )
        })
        .collect::<Result<Vec<_>>>()?;

    if source.num_cameras() != scene.num_cameras() {
        log::warn!(
            "scene has {} cameras but observations cover {}",
            scene.num_cameras(),
            source.num_cameras()
        );
    }

    let default_pairs;
    let pairs = match pairs {
        Some(pairs) => pairs,
        None => {
            default_pairs = ring_pairs(scene.num_cameras());
            default_pairs.as_slice()
        }
    };

    let point_size = source.point_size(options);
    let mut point_sets = Vec::new();
    let mut outcomes = Vec::with_capacity(pairs.len());

    for (i, &pair) in pairs.iter().enumerate() {
        match triangulate_pair(scene, source, pair, triangulator) {
            Ok(points) => {
                let color = options.pair_color(i);
                log::debug!("cameras {pair}: triangulated {} points", points.len());
                point_sets.push(PointSet::new(
                    format!("points {pair}"),
                    points.clone(),
                    color,
                    point_size,
                ));
                outcomes.push(PairOutcome::Triangulated {
                    pair,
                    points,
                    color,
                });
            }
            Err(reason) => {
                log::warn!("skipping cameras {pair}: {reason}");
                outcomes.push(PairOutcome::Skipped { pair, reason });
            }
        }
    }

    Ok(SceneAssembly {
        cameras,
        point_sets,
        outcomes,
    })
}

fn triangulate_pair(
    scene: &CalibratedScene,
    source: &PointsSource,
    pair: CameraPair,
    triangulator: &dyn Triangulator,
) -> Result<Vec<DVec3>> {
    let count = scene.num_cameras();
    let camera = |index: usize| {
        scene
            .cameras
            .get(index)
            .ok_or(CalibscopeError::CameraIndexOutOfRange { index, count })
    };
    let camera_a = camera(pair.first)?;
    let camera_b = camera(pair.second)?;

    let (points_a, points_b) = source.pair_correspondences(pair)?;
    triangulator.triangulate(&points_a, camera_a, &points_b, camera_b)
}

/// Builds the scene with the current options and registers it.
///
/// Structures with the same names are replaced, so plotting twice shows
/// the latest result only.
pub fn plot_scene(
    scene: &CalibratedScene,
    source: &PointsSource,
    pairs: Option<&[CameraPair]>,
    triangulator: &dyn Triangulator,
) -> Result<Vec<PairOutcome>> {
    let options = crate::options()?;
    let assembly = build_scene(scene, source, pairs, triangulator, &options)?;

    for glyph in assembly.cameras {
        crate::insert_structure(Box::new(glyph))?;
    }
    for set in assembly.point_sets {
        crate::insert_structure(Box::new(set))?;
    }

    let triangulated = assembly
        .outcomes
        .iter()
        .filter(|o| o.is_triangulated())
        .count();
    log::info!(
        "plotted {} cameras, {triangulated}/{} pairs triangulated",
        scene.num_cameras(),
        assembly.outcomes.len()
    );
    Ok(assembly.outcomes)
}
