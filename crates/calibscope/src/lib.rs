//! calibscope-rs: geometry and scene assembly for calibrated multi-camera setups.
//!
//! The crate turns calibration results into plain scene geometry: camera
//! glyphs at their world poses, calibration boards, and point clouds
//! triangulated from pairs of cameras. An external renderer draws the
//! registered structures.
//!
//! # Quick Start
//!
//! ```no_run
//! use calibscope::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let scene = load_scene("scene_sba.json")?;
//!     let detections: Vec<_> = ["cam1.json", "cam2.json", "cam3.json"]
//!         .iter()
//!         .map(load_points)
//!         .collect::<Result<_>>()?;
//!     let source = PointsSource::from_detections(&detections);
//!
//!     let outcomes = plot_scene(&scene, &source, None, &FisheyeTriangulator::default())?;
//!     for outcome in &outcomes {
//!         println!("{outcome}");
//!     }
//!
//!     shutdown();
//!     Ok(())
//! }
//! ```
//!
//! # Lifecycle
//!
//! All registered structures live in one process context created by
//! [`init`] and dropped by [`shutdown`]. The pure geometry in
//! [`calibscope_core`] does not need the context.

// Geometry code converts between index and float types routinely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
mod board;
mod camera_glyph;
pub mod io;
mod point_set;
pub mod scene;

pub use animation::{Animation, AnimationFrame};
pub use board::*;
pub use camera_glyph::*;
pub use io::{load_defined_points, load_points, load_scene, save_scene, BoardDetections, CalibratedScene};
pub use point_set::*;
pub use scene::{
    build_scene, plot_scene, ring_pairs, CameraPair, DefinedPoints, PairOutcome, PointsSource,
    SceneAssembly,
};

// Re-export core types
pub use calibscope_core::{
    board_topology, grid_edges, invert_pose, match_correspondences, AxisAngle, BoardGeometry,
    BoardTopology, CalibscopeError, CameraModel, CameraPlacement, CameraPose, Context,
    Correspondences, DMat3, DVec2, DVec3, EdgeList, FisheyeTriangulator, Labeled, LabeledPoint2D,
    Options, Registry, Result, Structure, Triangulator, Vec4,
};

pub use calibscope_core::pose::{rotation_from_rotation_vector, rotation_to_axis_angle};

// Re-export structures
pub use calibscope_structures::{BoardMesh, BoardOverlay, CameraGlyph, PointSet, Viewport};

use calibscope_core::state;

/// Initializes calibscope with default options.
///
/// This must be called before any `register_*` function.
pub fn init() -> Result<()> {
    init_with_options(Options::default())
}

/// Initializes calibscope with the given options.
///
/// Fails with [`CalibscopeError::AlreadyInitialized`] if the context exists.
pub fn init_with_options(options: Options) -> Result<()> {
    let _ = env_logger::try_init();
    state::init_context(options)?;
    log::info!("calibscope-rs initialized");
    Ok(())
}

/// Returns whether calibscope has been initialized.
pub fn is_initialized() -> bool {
    state::is_initialized()
}

/// Drops all registered structures and the context.
///
/// [`init`] may be called again afterwards.
pub fn shutdown() {
    if state::shutdown_context() {
        log::info!("calibscope-rs shut down");
    }
}

/// Returns a copy of the current options.
pub fn options() -> Result<Options> {
    state::try_with_context(|ctx| ctx.options.clone()).ok_or(CalibscopeError::NotInitialized)
}

/// Replaces the current options.
///
/// Already registered structures keep the colors they were created with.
pub fn set_options(options: Options) -> Result<()> {
    state::try_with_context_mut(|ctx| ctx.options = options).ok_or(CalibscopeError::NotInitialized)
}

/// Removes a structure by type and name. Returns whether it existed.
pub fn remove_structure(type_name: &str, name: &str) -> bool {
    state::try_with_context_mut(|ctx| {
        let removed = ctx.registry.remove(type_name, name).is_some();
        if removed {
            ctx.update_extents();
        }
        removed
    })
    .unwrap_or(false)
}

/// Removes all registered structures.
pub fn remove_all_structures() {
    state::try_with_context_mut(|ctx| {
        ctx.registry.clear();
        ctx.update_extents();
    });
}

/// Returns the sorted names of all registered structures of a type.
pub fn structure_names(type_name: &str) -> Vec<String> {
    state::try_with_context(|ctx| ctx.registry.names_of_type(type_name)).unwrap_or_default()
}

/// Returns the scene bounding box and length scale.
pub fn scene_extents() -> Option<((DVec3, DVec3), f64)> {
    state::try_with_context(|ctx| (ctx.bounding_box, ctx.length_scale))
}

/// Registers a structure, failing with `StructureExists` on a taken name.
pub(crate) fn register_structure(structure: Box<dyn Structure>) -> Result<()> {
    state::try_with_context_mut(|ctx| -> Result<()> {
        ctx.registry.register(structure)?;
        ctx.update_extents();
        Ok(())
    })
    .ok_or(CalibscopeError::NotInitialized)?
}

/// Registers a structure, replacing one with the same type and name.
pub(crate) fn insert_structure(structure: Box<dyn Structure>) -> Result<()> {
    state::try_with_context_mut(|ctx| {
        if let Some(old) = ctx.registry.replace(structure) {
            log::debug!("replaced {} '{}'", old.type_name(), old.name());
        }
        ctx.update_extents();
    })
    .ok_or(CalibscopeError::NotInitialized)
}

/// Runs `f` on a registered structure of concrete type `T`.
///
/// Scene extents are recomputed afterwards, as `f` may hide the structure.
pub(crate) fn with_structure<T, R>(type_name: &str, name: &str, f: impl FnOnce(&mut T) -> R) -> Option<R>
where
    T: Structure,
{
    state::try_with_context_mut(|ctx| {
        let result = ctx
            .registry
            .get_mut(type_name, name)
            .and_then(|s| s.as_any_mut().downcast_mut::<T>())
            .map(f);
        if result.is_some() {
            ctx.update_extents();
        }
        result
    })
    .flatten()
}

/// Returns whether a structure of the given type and name exists.
pub(crate) fn has_structure(type_name: &str, name: &str) -> bool {
    state::try_with_context(|ctx| ctx.registry.contains(type_name, name)).unwrap_or(false)
}
