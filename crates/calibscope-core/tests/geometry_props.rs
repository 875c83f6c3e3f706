//! Property tests for the core geometry routines.

use calibscope_core::board::grid_edge_count;
use calibscope_core::pose::{rotation_from_rotation_vector, DEFAULT_ROTATION_TOLERANCE};
use calibscope_core::*;
use proptest::prelude::*;

fn rotation_vector() -> impl Strategy<Value = DVec3> {
    (-3.0f64..3.0, -3.0f64..3.0, -3.0f64..3.0).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #[test]
    fn inverted_rotation_is_transpose(v in rotation_vector(), tx in -5.0f64..5.0, tz in -5.0f64..5.0) {
        let r = rotation_from_rotation_vector(v);
        let t = DVec3::new(tx, 0.5, tz);
        let placement = invert_pose(&r, t, DEFAULT_ROTATION_TOLERANCE).unwrap();

        prop_assert!(placement.rotation.abs_diff_eq(r.transpose(), 1e-12));
        prop_assert!((placement.rotation * placement.rotation.transpose())
            .abs_diff_eq(DMat3::IDENTITY, 1e-9));
        prop_assert!((0.0..=180.0 + 1e-9).contains(&placement.axis_angle.angle_degrees));
        prop_assert!((placement.axis_angle.axis.length() - 1.0).abs() < 1e-9);
        // Axis-angle reproduces the camera-to-world rotation.
        prop_assert!(placement.axis_angle.to_mat3().abs_diff_eq(placement.rotation, 1e-6));
    }

    #[test]
    fn board_edge_counts(rows in 2usize..12, cols in 2usize..12) {
        let board = BoardGeometry::planar(rows, cols, 0.05).unwrap();
        let topo = board.topology(0.1);
        prop_assert_eq!(topo.grid_edge_count, grid_edge_count(rows, cols));
        prop_assert_eq!(topo.edges.len(), topo.grid_edge_count + 3);
        prop_assert_eq!(topo.vertices.len(), rows * cols + 4);
        for [a, b] in topo.grid_edges() {
            prop_assert!(a < b);
            let (a, b) = (*a as usize, *b as usize);
            // Neighbours differ by one column or by one row.
            prop_assert!((b - a == 1 && a / cols == b / cols) || b - a == cols);
        }
    }

    #[test]
    fn matches_preserve_first_camera_order(
        a in prop::collection::vec(0u8..8, 0..12),
        b in prop::collection::vec(0u8..8, 0..12),
    ) {
        let la: Vec<Labeled<usize, u8>> = a.iter().enumerate().map(|(i, l)| Labeled::new(i, *l)).collect();
        let lb: Vec<Labeled<usize, u8>> = b.iter().enumerate().map(|(i, l)| Labeled::new(i, *l)).collect();
        let m = match_correspondences(&la, &lb);

        prop_assert_eq!(m.points_a.len(), m.points_b.len());
        prop_assert_eq!(m.points_a.len(), m.labels.len());
        let pairs: Vec<(usize, usize)> = m.points_a.iter().copied().zip(m.points_b.iter().copied()).collect();
        let mut sorted = pairs.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&pairs, &sorted);
        for ((ia, ib), label) in pairs.iter().zip(&m.labels) {
            prop_assert_eq!(a[*ia], *label);
            prop_assert_eq!(b[*ib], *label);
        }
        // Every equal-label (i, j) pair appears exactly once.
        let expected = a.iter().map(|la| b.iter().filter(|lb| *lb == la).count()).sum::<usize>();
        prop_assert_eq!(m.len(), expected);
        sorted.dedup();
        prop_assert_eq!(sorted.len(), pairs.len());
    }
}

#[test]
fn board_rejects_bad_shapes() {
    assert!(matches!(
        board_topology(1, 3, &[DVec3::ZERO; 3], 0.1),
        Err(CalibscopeError::InvalidBoardShape { .. })
    ));
    assert!(matches!(
        board_topology(2, 3, &[DVec3::ZERO; 7], 0.1),
        Err(CalibscopeError::InvalidBoardShape { .. })
    ));
}
