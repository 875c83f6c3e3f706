//! Camera glyph: a wireframe camera body placed at a calibrated pose.

use std::any::Any;

use calibscope_core::pose::CameraPlacement;
use calibscope_core::structure::bounds_of;
use calibscope_core::{CameraPose, Result, Structure};
use glam::{DVec3, Vec4};

use crate::{edge_segments, AXIS_COLORS};

const HALF_X: f64 = 0.15;
const HALF_Y: f64 = 0.1;
const HALF_Z: f64 = 0.1;

/// Box corners, front frame, origin and axis tips, in the camera frame.
fn local_vertices() -> Vec<DVec3> {
    let (bx, by, bz) = (HALF_X, HALF_Y, HALF_Z);
    let axis = 5.0 * bx.max(by).max(bz);
    vec![
        DVec3::new(bx, by, bz),
        DVec3::new(bx, by, -bz),
        DVec3::new(bx, -by, bz),
        DVec3::new(bx, -by, -bz),
        DVec3::new(-bx, by, bz),
        DVec3::new(-bx, by, -bz),
        DVec3::new(-bx, -by, bz),
        DVec3::new(-bx, -by, -bz),
        DVec3::new(2.0 * bx, 2.0 * by, 2.0 * bz),
        DVec3::new(2.0 * bx, -2.0 * by, 2.0 * bz),
        DVec3::new(-2.0 * bx, 2.0 * by, 2.0 * bz),
        DVec3::new(-2.0 * bx, -2.0 * by, 2.0 * bz),
        DVec3::ZERO,
        DVec3::new(axis, 0.0, 0.0),
        DVec3::new(0.0, axis, 0.0),
        DVec3::new(0.0, 0.0, axis),
    ]
}

/// Box edges, frame struts, frame border, then the X, Y, Z axes.
const EDGES: [[u32; 2]; 23] = [
    [0, 1],
    [0, 2],
    [0, 4],
    [1, 3],
    [1, 5],
    [2, 3],
    [2, 6],
    [3, 7],
    [4, 5],
    [4, 6],
    [5, 7],
    [6, 7],
    [0, 8],
    [2, 9],
    [4, 10],
    [6, 11],
    [8, 9],
    [8, 10],
    [9, 11],
    [10, 11],
    [12, 13],
    [12, 14],
    [12, 15],
];

/// A camera body drawn at the camera's world position and orientation.
#[derive(Debug, Clone)]
pub struct CameraGlyph {
    name: String,
    placement: CameraPlacement,
    world_vertices: Vec<DVec3>,
    color: Vec4,
    enabled: bool,
}

impl CameraGlyph {
    /// Creates a glyph at an already inverted camera placement.
    pub fn new(name: impl Into<String>, placement: CameraPlacement, color: Vec4) -> Self {
        let world_vertices = local_vertices()
            .into_iter()
            .map(|v| placement.to_world(v))
            .collect();
        Self {
            name: name.into(),
            placement,
            world_vertices,
            color,
            enabled: true,
        }
    }

    /// Creates a glyph from a world-to-camera pose.
    ///
    /// Fails with `InvalidRotation` if the pose rotation is not a rotation
    /// within `tolerance`.
    pub fn from_pose(
        name: impl Into<String>,
        pose: &CameraPose,
        color: Vec4,
        tolerance: f64,
    ) -> Result<Self> {
        let placement = pose.invert(tolerance)?;
        Ok(Self::new(name, placement, color))
    }

    /// Returns the structure name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the camera placement in the world.
    #[must_use]
    pub fn placement(&self) -> &CameraPlacement {
        &self.placement
    }

    /// Returns the vertices in world coordinates.
    #[must_use]
    pub fn vertices(&self) -> &[DVec3] {
        &self.world_vertices
    }

    /// Returns the edges as vertex index pairs.
    #[must_use]
    pub fn edges(&self) -> &[[u32; 2]] {
        &EDGES
    }

    /// Returns one color per edge: the body color, then red, green, blue axes.
    #[must_use]
    pub fn edge_colors(&self) -> Vec<Vec4> {
        let body = EDGES.len() - AXIS_COLORS.len();
        std::iter::repeat(self.color)
            .take(body)
            .chain(AXIS_COLORS)
            .collect()
    }

    /// Returns the edges as explicit world-space segments.
    #[must_use]
    pub fn segments(&self) -> Vec<[DVec3; 2]> {
        edge_segments(&self.world_vertices, &EDGES)
    }

    /// Gets the body color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Sets the body color.
    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = color;
        self
    }
}

impl Structure for CameraGlyph {
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
        "CameraGlyph"
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
    use calibscope_core::pose::DEFAULT_ROTATION_TOLERANCE;
    use calibscope_core::DMat3;

    use super::*;

    #[test]
    fn test_glyph_at_camera_center() {
        let pose = CameraPose::new(DMat3::from_rotation_x(0.4), DVec3::new(0.0, 0.0, 3.0));
        let glyph =
            CameraGlyph::from_pose("cam0", &pose, Vec4::ONE, DEFAULT_ROTATION_TOLERANCE).unwrap();
        // Vertex 12 is the glyph origin, i.e. the camera center.
        let center = glyph.vertices()[12];
        assert!(pose.transform_point(center).length() < 1e-12);
        assert_eq!(glyph.edges().len(), 23);
    }

    #[test]
    fn test_optical_axis_points_forward() {
        let pose = CameraPose::new(DMat3::from_rotation_y(0.7), DVec3::new(1.0, 0.0, 2.0));
        let glyph =
            CameraGlyph::from_pose("cam", &pose, Vec4::ONE, DEFAULT_ROTATION_TOLERANCE).unwrap();
        // Vertex 15 is the tip of the local Z axis, which must lie on +z in camera coordinates.
        let tip = pose.transform_point(glyph.vertices()[15]);
        assert!(tip.x.abs() < 1e-12 && tip.y.abs() < 1e-12 && tip.z > 0.0);
    }

    #[test]
    fn test_axis_edges_colored() {
        let glyph = CameraGlyph::from_pose(
            "cam",
            &CameraPose::identity(),
            Vec4::new(0.1, 0.1, 0.1, 1.0),
            DEFAULT_ROTATION_TOLERANCE,
        )
        .unwrap();
        let colors = glyph.edge_colors();
        assert_eq!(colors.len(), 23);
        assert_eq!(colors[0], Vec4::new(0.1, 0.1, 0.1, 1.0));
        assert_eq!(&colors[20..], &AXIS_COLORS);
        assert_eq!(glyph.segments()[20], [DVec3::ZERO, DVec3::new(0.75, 0.0, 0.0)]);
    }

    #[test]
    fn test_invalid_pose() {
        let pose = CameraPose::new(DMat3::ZERO, DVec3::ZERO);
        assert!(CameraGlyph::from_pose("bad", &pose, Vec4::ONE, DEFAULT_ROTATION_TOLERANCE).is_err());
    }
}
