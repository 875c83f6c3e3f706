//! Calibration board placed in the world.

use std::any::Any;

use calibscope_core::board::{BoardGeometry, BoardTopology};
use calibscope_core::pose::rotation_from_rotation_vector;
use calibscope_core::structure::bounds_of;
use calibscope_core::Structure;
use glam::{DMat3, DVec3, Vec4};

use crate::{edge_segments, AXIS_COLORS};

/// A calibration board grid with its axis indicator, posed in the world.
///
/// Local board points map to `rotation * p + translation`.
#[derive(Debug, Clone)]
pub struct BoardMesh {
    name: String,
    topology: BoardTopology,
    rotation: DMat3,
    translation: DVec3,
    world_vertices: Vec<DVec3>,
    color: Vec4,
    enabled: bool,
}

impl BoardMesh {
    /// Creates a board mesh posed by a rotation matrix and a translation.
    pub fn new(
        name: impl Into<String>,
        board: &BoardGeometry,
        rotation: DMat3,
        translation: DVec3,
        axis_length: f64,
        color: Vec4,
    ) -> Self {
        let topology = board.topology(axis_length);
        let world_vertices = topology
            .vertices
            .iter()
            .map(|p| rotation * *p + translation)
            .collect();
        Self {
            name: name.into(),
            topology,
            rotation,
            translation,
            world_vertices,
            color,
            enabled: true,
        }
    }

    /// Creates a board mesh posed by a rotation vector (radians) and a translation.
    pub fn from_rotation_vector(
        name: impl Into<String>,
        board: &BoardGeometry,
        rotation_vector: DVec3,
        translation: DVec3,
        axis_length: f64,
        color: Vec4,
    ) -> Self {
        let rotation = rotation_from_rotation_vector(rotation_vector);
        Self::new(name, board, rotation, translation, axis_length, color)
    }

    /// Returns the local topology.
    #[must_use]
    pub fn topology(&self) -> &BoardTopology {
        &self.topology
    }

    /// Returns the board rotation.
    #[must_use]
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    /// Returns the board translation.
    #[must_use]
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// Returns the vertices in world coordinates.
    #[must_use]
    pub fn vertices(&self) -> &[DVec3] {
        &self.world_vertices
    }

    /// Returns the edges as vertex index pairs.
    #[must_use]
    pub fn edges(&self) -> &[[u32; 2]] {
        self.topology.edges.edges()
    }

    /// Returns one color per edge: grid color, then red, green, blue axes.
    #[must_use]
    pub fn edge_colors(&self) -> Vec<Vec4> {
        std::iter::repeat(self.color)
            .take(self.topology.grid_edge_count)
            .chain(AXIS_COLORS)
            .collect()
    }

    /// Returns the edges as explicit world-space segments.
    #[must_use]
    pub fn segments(&self) -> Vec<[DVec3; 2]> {
        edge_segments(&self.world_vertices, self.edges())
    }

    /// Gets the grid color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Sets the grid color.
    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = color;
        self
    }
}

impl Structure for BoardMesh {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &'static str {
        "BoardMesh"
    }

    fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        bounds_of(&self.world_vertices)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn test_pose_applied() {
        let board = BoardGeometry::planar(2, 3, 1.0).unwrap();
        let mesh = BoardMesh::from_rotation_vector(
            "board",
            &board,
            DVec3::new(0.0, 0.0, FRAC_PI_2),
            DVec3::new(10.0, 0.0, 0.0),
            0.1,
            Vec4::ONE,
        );
        // Corner (0, 1) at (1, 0, 0) turns to (0, 1, 0) then shifts by +10 x.
        assert!((mesh.vertices()[1] - DVec3::new(10.0, 1.0, 0.0)).length() < 1e-12);
        assert_eq!(mesh.edges().len(), 10);
        assert_eq!(mesh.segments().len(), 10);
    }

    #[test]
    fn test_translation_not_rotated() {
        let board = BoardGeometry::planar(2, 2, 1.0).unwrap();
        let t = DVec3::new(0.0, 2.0, 5.0);
        let mesh = BoardMesh::from_rotation_vector(
            "board",
            &board,
            DVec3::new(FRAC_PI_2, 0.0, 0.0),
            t,
            0.1,
            Vec4::ONE,
        );
        // The board origin lands on t itself, not on R * t.
        assert!((mesh.vertices()[0] - t).length() < 1e-12);
        assert!((mesh.vertices()[4] - t).length() < 1e-12);
    }

    #[test]
    fn test_edge_colors() {
        let board = BoardGeometry::planar(3, 3, 1.0).unwrap();
        let gray = Vec4::new(0.5, 0.5, 0.5, 1.0);
        let mesh = BoardMesh::new("b", &board, DMat3::IDENTITY, DVec3::ZERO, 0.1, gray);
        let colors = mesh.edge_colors();
        assert_eq!(colors.len(), mesh.edges().len());
        assert_eq!(colors[11], gray);
        assert_eq!(&colors[12..], &AXIS_COLORS);
    }
}
