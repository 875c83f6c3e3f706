//! Calibration board geometry and grid topology.
//!
//! Board corners are stored row-major: corner `(r, c)` lives at index
//! `c + r * cols`. The topology connects horizontal and vertical neighbours
//! only, and appends a small XYZ axis indicator after the grid vertices.

use glam::DVec3;

use crate::error::{CalibscopeError, Result};

/// Vertex offsets of the axis indicator relative to the first appended vertex.
const AXIS_EDGES: [[u32; 2]; 3] = [[0, 1], [0, 2], [0, 3]];

/// Geometry of a calibration board: its shape and its object points.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGeometry {
    rows: usize,
    cols: usize,
    points: Vec<DVec3>,
}

impl BoardGeometry {
    /// Creates a board from row-major object points.
    ///
    /// Fails with [`CalibscopeError::InvalidBoardShape`] when either dimension
    /// is below 2 or `points.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, points: Vec<DVec3>) -> Result<Self> {
        check_shape(rows, cols, points.len())?;
        Ok(Self { rows, cols, points })
    }

    /// Creates a planar board in the `z = 0` plane with square cells.
    ///
    /// Corner `(r, c)` sits at `(c * square_len, r * square_len, 0)`.
    pub fn planar(rows: usize, cols: usize, square_len: f64) -> Result<Self> {
        check_shape(rows, cols, rows.saturating_mul(cols))?;
        let points = (0..rows)
            .flat_map(|r| {
                (0..cols).map(move |c| DVec3::new(c as f64 * square_len, r as f64 * square_len, 0.0))
            })
            .collect();
        Ok(Self { rows, cols, points })
    }

    /// Number of corner rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of corner columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Row-major object points.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Builds the grid and axis-indicator topology for this board.
    #[must_use]
    pub fn topology(&self, axis_length: f64) -> BoardTopology {
        build_topology(self.rows, self.cols, &self.points, axis_length)
    }
}

/// Ordered list of vertex-index pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeList {
    edges: Vec<[u32; 2]>,
}

impl EdgeList {
    /// Wraps a list of edges.
    pub fn new(edges: Vec<[u32; 2]>) -> Self {
        Self { edges }
    }

    /// The edges as index pairs.
    #[must_use]
    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    /// Number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if there are no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// The edges as a flat index buffer `[a0, b0, a1, b1, ...]`.
    #[must_use]
    pub fn flattened(&self) -> Vec<u32> {
        self.edges.iter().flatten().copied().collect()
    }

    fn push(&mut self, a: usize, b: usize) {
        self.edges.push([index(a), index(b)]);
    }
}

/// Vertex buffer and connectivity of a board, ready for a line renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTopology {
    /// Grid points followed by the axis origin and the X, Y, Z tips.
    pub vertices: Vec<DVec3>,
    /// Grid edges followed by the three axis edges (X, Y, Z).
    pub edges: EdgeList,
    /// Number of leading edges that belong to the grid.
    pub grid_edge_count: usize,
}

impl BoardTopology {
    /// The grid edges without the axis indicator.
    #[must_use]
    pub fn grid_edges(&self) -> &[[u32; 2]] {
        &self.edges.edges()[..self.grid_edge_count]
    }

    /// The X, Y, Z axis-indicator edges, in that order.
    #[must_use]
    pub fn axis_edges(&self) -> &[[u32; 2]] {
        &self.edges.edges()[self.grid_edge_count..]
    }
}

/// Builds the topology of a `rows x cols` board from its object points.
///
/// Fails with [`CalibscopeError::InvalidBoardShape`] on a bad shape or a
/// point count other than `rows * cols`.
pub fn board_topology(
    rows: usize,
    cols: usize,
    points: &[DVec3],
    axis_length: f64,
) -> Result<BoardTopology> {
    check_shape(rows, cols, points.len())?;
    Ok(build_topology(rows, cols, points, axis_length))
}

/// Edges between horizontally and vertically adjacent corners.
///
/// Rows come first (consecutive columns in each row), then columns
/// (consecutive rows in each column).
pub fn grid_edges(rows: usize, cols: usize) -> Result<EdgeList> {
    check_shape(rows, cols, rows.saturating_mul(cols))?;
    Ok(build_grid_edges(rows, cols))
}

/// Number of grid edges of a `rows x cols` board.
#[must_use]
pub fn grid_edge_count(rows: usize, cols: usize) -> usize {
    rows * cols.saturating_sub(1) + cols * rows.saturating_sub(1)
}

fn build_grid_edges(rows: usize, cols: usize) -> EdgeList {
    let mut edges = EdgeList::new(Vec::with_capacity(grid_edge_count(rows, cols) + 3));
    for r in 0..rows {
        for c in 0..cols - 1 {
            edges.push(c + r * cols, c + 1 + r * cols);
        }
    }
    for c in 0..cols {
        for r in 0..rows - 1 {
            edges.push(c + r * cols, c + (r + 1) * cols);
        }
    }
    edges
}

fn build_topology(rows: usize, cols: usize, points: &[DVec3], axis_length: f64) -> BoardTopology {
    let mut edges = build_grid_edges(rows, cols);
    let grid_edge_count = edges.len();

    let origin = points.len();
    let mut vertices = Vec::with_capacity(origin + 4);
    vertices.extend_from_slice(points);
    vertices.extend([
        DVec3::ZERO,
        DVec3::X * axis_length,
        DVec3::Y * axis_length,
        DVec3::Z * axis_length,
    ]);
    for [a, b] in AXIS_EDGES {
        edges.push(origin + a as usize, origin + b as usize);
    }

    log::debug!(
        "board {rows}x{cols}: {grid_edge_count} grid edges, {} vertices",
        vertices.len()
    );

    BoardTopology {
        vertices,
        edges,
        grid_edge_count,
    }
}

/// Number of corners on a `rows` x `cols` board.
///
/// Fails with `InvalidBoardShape` when a side is below 2 or the product
/// does not fit in `usize`.
pub fn corner_count(rows: usize, cols: usize) -> Result<usize> {
    match rows.checked_mul(cols) {
        Some(count) if rows >= 2 && cols >= 2 => Ok(count),
        _ => Err(CalibscopeError::InvalidBoardShape {
            rows,
            cols,
            points: 0,
        }),
    }
}

fn check_shape(rows: usize, cols: usize, points: usize) -> Result<()> {
    if rows < 2 || cols < 2 || rows.checked_mul(cols) != Some(points) {
        return Err(CalibscopeError::InvalidBoardShape { rows, cols, points });
    }
    Ok(())
}

fn index(i: usize) -> u32 {
    u32::try_from(i).expect("board vertex index exceeds u32")
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_corner_count() {
        assert_eq!(corner_count(6, 9).unwrap(), 54);
        assert!(corner_count(1, 9).is_err());
        assert!(matches!(
            corner_count(usize::MAX, 2),
            Err(CalibscopeError::InvalidBoardShape { points: 0, .. })
        ));
    }

    #[test]
    fn test_two_by_three_counts() {
        let board = BoardGeometry::planar(2, 3, 1.0).unwrap();
        let topo = board.topology(0.1);
        assert_eq!(topo.grid_edge_count, 7);
        assert_eq!(topo.edges.len(), 10);
        assert_eq!(topo.edges.flattened().len(), 20);
        assert_eq!(topo.vertices.len(), 10);
    }

    #[test]
    fn test_edge_order() {
        let edges = grid_edges(2, 3).unwrap();
        assert_eq!(
            edges.edges(),
            &[[0, 1], [1, 2], [3, 4], [4, 5], [0, 3], [1, 4], [2, 5]]
        );
    }

    #[test]
    fn test_axis_indicator() {
        let board = BoardGeometry::planar(2, 2, 0.5).unwrap();
        let topo = board.topology(0.25);
        assert_eq!(topo.axis_edges(), &[[4, 5], [4, 6], [4, 7]]);
        assert_eq!(topo.vertices[4], DVec3::ZERO);
        assert_eq!(topo.vertices[5], DVec3::new(0.25, 0.0, 0.0));
        assert_eq!(topo.vertices[6], DVec3::new(0.0, 0.25, 0.0));
        assert_eq!(topo.vertices[7], DVec3::new(0.0, 0.0, 0.25));
    }

    #[test]
    fn test_planar_points_row_major() {
        let board = BoardGeometry::planar(3, 2, 2.0).unwrap();
        assert_eq!(board.points()[1], DVec3::new(2.0, 0.0, 0.0));
        assert_eq!(board.points()[2], DVec3::new(0.0, 2.0, 0.0));
        assert_eq!(board.points()[5], DVec3::new(2.0, 4.0, 0.0));
    }

    #[test]
    fn test_rejects_single_row() {
        assert!(matches!(
            board_topology(1, 4, &[DVec3::ZERO; 4], 0.1),
            Err(CalibscopeError::InvalidBoardShape { rows: 1, cols: 4, points: 4 })
        ));
        assert!(BoardGeometry::planar(3, 1, 1.0).is_err());
    }

    #[test]
    fn test_rejects_point_count() {
        assert!(matches!(
            BoardGeometry::new(2, 3, vec![DVec3::ZERO; 5]),
            Err(CalibscopeError::InvalidBoardShape { points: 5, .. })
        ));
    }

    #[test]
    fn test_no_duplicate_edges() {
        let board = BoardGeometry::planar(6, 9, 0.1).unwrap();
        let topo = board.topology(0.1);
        let mut seen = HashSet::new();
        for &[a, b] in topo.edges.edges() {
            assert!(seen.insert((a.min(b), a.max(b))));
            assert!((a as usize) < topo.vertices.len());
            assert!((b as usize) < topo.vertices.len());
        }
        assert_eq!(topo.grid_edge_count, grid_edge_count(6, 9));
    }
}
