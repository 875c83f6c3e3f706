//! Core geometry for calibscope-rs.
//!
//! This crate holds the parts of multi-camera scene visualization that have
//! real invariants:
//! - [`pose`]: world-to-camera pose inversion and axis-angle conversion
//! - [`board`]: calibration board grid topology
//! - [`correspondence`]: label-based matching of observations between cameras
//! - [`camera`] and [`triangulation`]: fisheye back-projection and two-view triangulation
//!
//! It also provides the [`Structure`] trait, the [`Registry`] and the
//! explicit process context used by the facade crate.

// Geometry code converts between index and float types routinely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::many_single_char_names)]

pub mod board;
pub mod camera;
pub mod correspondence;
pub mod error;
pub mod options;
pub mod pose;
pub mod registry;
pub mod state;
pub mod structure;
pub mod triangulation;

pub use board::{board_topology, corner_count, grid_edges, BoardGeometry, BoardTopology, EdgeList};
pub use camera::CameraModel;
pub use correspondence::{match_correspondences, Correspondences, Labeled, LabeledPoint2D};
pub use error::{CalibscopeError, Result};
pub use options::Options;
pub use pose::{invert_pose, AxisAngle, CameraPlacement, CameraPose};
pub use registry::Registry;
pub use state::{with_context, with_context_mut, Context};
pub use structure::Structure;
pub use triangulation::{FisheyeTriangulator, Triangulator};

// Re-export glam types for convenience
pub use glam::{DMat3, DVec2, DVec3, Vec4};
