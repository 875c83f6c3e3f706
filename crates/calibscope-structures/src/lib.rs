//! Structure implementations for calibscope-rs.
//!
//! This crate provides the plain geometric structures a calibration scene is
//! made of:
//! - Camera glyphs placed at calibrated camera poses
//! - Calibration boards with their grid and axis indicator
//! - Point sets from triangulation
//! - 2D board overlays for detected corners in image space

// Geometry code converts between index and float types routinely
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod board_mesh;
pub mod board_overlay;
pub mod camera_glyph;
pub mod point_set;

pub use board_mesh::BoardMesh;
pub use board_overlay::{BoardOverlay, Viewport};
pub use camera_glyph::CameraGlyph;
pub use point_set::PointSet;

use glam::{DVec3, Vec4};

/// Axis indicator colors: X red, Y green, Z blue.
pub const AXIS_COLORS: [Vec4; 3] = [
    Vec4::new(1.0, 0.0, 0.0, 1.0),
    Vec4::new(0.0, 1.0, 0.0, 1.0),
    Vec4::new(0.0, 0.0, 1.0, 1.0),
];

/// Expands indexed edges into explicit segment endpoints.
pub(crate) fn edge_segments(vertices: &[DVec3], edges: &[[u32; 2]]) -> Vec<[DVec3; 2]> {
    edges
        .iter()
        .map(|&[a, b]| [vertices[a as usize], vertices[b as usize]])
        .collect()
}
