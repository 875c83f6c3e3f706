//! Two-view triangulation.
//!
//! [`Triangulator`] is the seam the scene workflow calls through. The
//! bundled [`FisheyeTriangulator`] back-projects pixels through the fisheye
//! model and solves the linear (DLT) system for each correspondence.

use glam::{DMat3, DVec2, DVec3};

use crate::camera::CameraModel;
use crate::error::{CalibscopeError, Result};
use crate::pose::{CameraPose, DEFAULT_ROTATION_TOLERANCE};

/// Reconstructs 3D points from corresponding pixels in two cameras.
pub trait Triangulator {
    /// Returns one world point per correspondence `(points_a[i], points_b[i])`.
    ///
    /// Implementations must fail with [`CalibscopeError::DimensionMismatch`]
    /// when the two sequences differ in length.
    fn triangulate(
        &self,
        points_a: &[DVec2],
        camera_a: &CameraModel,
        points_b: &[DVec2],
        camera_b: &CameraModel,
    ) -> Result<Vec<DVec3>>;
}

/// Linear triangulation with fisheye back-projection.
#[derive(Debug, Clone, Copy)]
pub struct FisheyeTriangulator {
    /// Tolerance used to validate both camera rotations.
    pub rotation_tolerance: f64,
}

impl Default for FisheyeTriangulator {
    fn default() -> Self {
        Self {
            rotation_tolerance: DEFAULT_ROTATION_TOLERANCE,
        }
    }
}

impl FisheyeTriangulator {
    /// Creates a triangulator with the given rotation tolerance.
    pub fn new(rotation_tolerance: f64) -> Self {
        Self { rotation_tolerance }
    }
}

impl Triangulator for FisheyeTriangulator {
    fn triangulate(
        &self,
        points_a: &[DVec2],
        camera_a: &CameraModel,
        points_b: &[DVec2],
        camera_b: &CameraModel,
    ) -> Result<Vec<DVec3>> {
        if points_a.len() != points_b.len() {
            return Err(CalibscopeError::DimensionMismatch {
                expected: points_a.len(),
                actual: points_b.len(),
            });
        }
        camera_a.pose.validate(self.rotation_tolerance)?;
        camera_b.pose.validate(self.rotation_tolerance)?;

        points_a
            .iter()
            .zip(points_b)
            .enumerate()
            .map(|(index, (pa, pb))| {
                let na = camera_a.undistort(*pa);
                let nb = camera_b.undistort(*pb);
                triangulate_normalized(na, &camera_a.pose, nb, &camera_b.pose)
                    .ok_or(CalibscopeError::DegenerateTriangulation { index })
            })
            .collect()
    }
}

/// Triangulates one point from two undistorted normalized image points.
///
/// Solves `u * P3 - P1 = 0`, `v * P3 - P2 = 0` for both views in least
/// squares, with `P = [R | t]`. Returns `None` for parallel rays or a
/// non-finite solution.
pub fn triangulate_normalized(
    na: DVec2,
    pose_a: &CameraPose,
    nb: DVec2,
    pose_b: &CameraPose,
) -> Option<DVec3> {
    let mut ata = DMat3::ZERO;
    let mut atb = DVec3::ZERO;

    for (n, pose) in [(na, pose_a), (nb, pose_b)] {
        let r = pose.rotation;
        let t = pose.translation;
        let rows = [
            (n.x * r.row(2) - r.row(0), t.x - n.x * t.z),
            (n.y * r.row(2) - r.row(1), t.y - n.y * t.z),
        ];
        for (a, b) in rows {
            ata += DMat3::from_cols(a * a.x, a * a.y, a * a.z);
            atb += a * b;
        }
    }

    let det = ata.determinant();
    if !det.is_finite() || det.abs() < 1e-12 {
        return None;
    }
    let x = ata.inverse() * atb;
    x.is_finite().then_some(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig() -> (CameraModel, CameraModel) {
        let k = [[700.0, 0.0, 640.0], [0.0, 700.0, 360.0], [0.0, 0.0, 1.0]];
        let d = [0.01, -0.002, 0.0005, -0.0001];
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let a = CameraModel::from_rows(k, d, identity, [0.0; 3]);
        let r_b = DMat3::from_rotation_y(-0.3);
        let mut b = a;
        b.pose = CameraPose::new(r_b, DVec3::new(-1.0, 0.0, 0.2));
        (a, b)
    }

    #[test]
    fn test_recovers_points() {
        let (a, b) = rig();
        let world = [
            DVec3::new(0.2, -0.1, 4.0),
            DVec3::new(-0.5, 0.3, 3.0),
            DVec3::new(1.0, 0.5, 6.0),
        ];
        let pa: Vec<DVec2> = world.iter().map(|p| a.project(*p).unwrap()).collect();
        let pb: Vec<DVec2> = world.iter().map(|p| b.project(*p).unwrap()).collect();

        let est = FisheyeTriangulator::default().triangulate(&pa, &a, &pb, &b).unwrap();
        assert_eq!(est.len(), world.len());
        for (e, w) in est.iter().zip(&world) {
            assert!((*e - *w).length() < 1e-6, "{e} vs {w}");
        }
    }

    #[test]
    fn test_length_mismatch() {
        let (a, b) = rig();
        let err = FisheyeTriangulator::default()
            .triangulate(&[DVec2::ZERO; 3], &a, &[DVec2::ZERO; 2], &b)
            .unwrap_err();
        assert!(matches!(
            err,
            CalibscopeError::DimensionMismatch { expected: 3, actual: 2 }
        ));
    }

    #[test]
    fn test_empty_input() {
        let (a, b) = rig();
        let est = FisheyeTriangulator::default().triangulate(&[], &a, &[], &b).unwrap();
        assert!(est.is_empty());
    }

    #[test]
    fn test_same_camera_is_degenerate() {
        let (a, _) = rig();
        let px = a.project(DVec3::new(0.1, 0.1, 2.0)).unwrap();
        let err = FisheyeTriangulator::default()
            .triangulate(&[px], &a, &[px], &a)
            .unwrap_err();
        assert!(matches!(err, CalibscopeError::DegenerateTriangulation { index: 0 }));
    }

    #[test]
    fn test_invalid_pose_rejected() {
        let (a, mut b) = rig();
        b.pose.rotation = DMat3::from_diagonal(DVec3::new(2.0, 1.0, 1.0));
        let err = FisheyeTriangulator::default()
            .triangulate(&[DVec2::ZERO], &a, &[DVec2::ZERO], &b)
            .unwrap_err();
        assert!(matches!(err, CalibscopeError::InvalidRotation { .. }));
    }
}
