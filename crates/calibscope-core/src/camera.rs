//! Fisheye camera model (equidistant projection with four distortion terms).
//!
//! A camera-frame point `(x, y, z)` with `z > 0` is projected as
//!
//! ```text
//! a = x / z, b = y / z, r = sqrt(a^2 + b^2), theta = atan(r)
//! theta_d = theta * (1 + k1 theta^2 + k2 theta^4 + k3 theta^6 + k4 theta^8)
//! (u, v, 1) = K * (a * theta_d / r, b * theta_d / r, 1)
//! ```

use std::f64::consts::FRAC_PI_2;

use glam::{DMat3, DVec2, DVec3};
use serde::{Deserialize, Serialize};

use crate::pose::CameraPose;

const UNDISTORT_ITERATIONS: usize = 20;
const UNDISTORT_EPS: f64 = 1e-12;

/// Intrinsics, fisheye distortion and extrinsic pose of one camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    /// Intrinsic matrix.
    pub k: DMat3,
    /// Fisheye distortion coefficients `k1..k4`.
    pub distortion: [f64; 4],
    /// World-to-camera pose.
    pub pose: CameraPose,
}

impl CameraModel {
    /// Creates a camera model.
    pub fn new(k: DMat3, distortion: [f64; 4], pose: CameraPose) -> Self {
        Self {
            k,
            distortion,
            pose,
        }
    }

    /// Creates a camera model from row-major matrices, as calibration files store them.
    pub fn from_rows(
        k: [[f64; 3]; 3],
        distortion: [f64; 4],
        r: [[f64; 3]; 3],
        t: [f64; 3],
    ) -> Self {
        Self {
            k: DMat3::from_cols_array_2d(&k).transpose(),
            distortion,
            pose: CameraPose::from_rows(r, t),
        }
    }

    /// Projects a world point to pixel coordinates.
    ///
    /// Returns `None` for points on or behind the image plane.
    #[must_use]
    pub fn project(&self, world: DVec3) -> Option<DVec2> {
        self.project_camera(self.pose.transform_point(world))
    }

    /// Projects a point given in camera coordinates to pixel coordinates.
    #[must_use]
    pub fn project_camera(&self, cam: DVec3) -> Option<DVec2> {
        if cam.z.is_nan() || cam.z <= 0.0 {
            return None;
        }
        let distorted = self.distort(DVec2::new(cam.x / cam.z, cam.y / cam.z));
        let h = self.k * distorted.extend(1.0);
        Some(DVec2::new(h.x / h.z, h.y / h.z))
    }

    /// Applies fisheye distortion to a normalized image point.
    #[must_use]
    pub fn distort(&self, normalized: DVec2) -> DVec2 {
        let r = normalized.length();
        if r < 1e-8 {
            return normalized;
        }
        let theta = r.atan();
        normalized * (self.theta_d(theta) / r)
    }

    /// Maps a pixel to its undistorted normalized image point.
    ///
    /// Inverts the distortion polynomial with Newton iterations.
    #[must_use]
    pub fn undistort(&self, pixel: DVec2) -> DVec2 {
        let h = self.k.inverse() * pixel.extend(1.0);
        let pw = DVec2::new(h.x / h.z, h.y / h.z);

        let theta_d = pw.length().min(FRAC_PI_2);
        if theta_d < 1e-8 {
            return pw;
        }

        let [k1, k2, k3, k4] = self.distortion;
        let mut theta = theta_d;
        for _ in 0..UNDISTORT_ITERATIONS {
            let t2 = theta * theta;
            let t4 = t2 * t2;
            let t6 = t4 * t2;
            let t8 = t6 * t2;
            let f = theta * (1.0 + k1 * t2 + k2 * t4 + k3 * t6 + k4 * t8) - theta_d;
            let df = 1.0 + 3.0 * k1 * t2 + 5.0 * k2 * t4 + 7.0 * k3 * t6 + 9.0 * k4 * t8;
            let step = f / df;
            theta -= step;
            if step.abs() < UNDISTORT_EPS {
                break;
            }
        }

        pw * (theta.tan() / theta_d)
    }

    /// Unit ray in camera coordinates through a pixel.
    #[must_use]
    pub fn pixel_ray(&self, pixel: DVec2) -> DVec3 {
        self.undistort(pixel).extend(1.0).normalize()
    }

    fn theta_d(&self, theta: f64) -> f64 {
        let [k1, k2, k3, k4] = self.distortion;
        let t2 = theta * theta;
        theta * (1.0 + t2 * (k1 + t2 * (k2 + t2 * (k3 + t2 * k4))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraModel {
        CameraModel::from_rows(
            [[800.0, 0.0, 640.0], [0.0, 790.0, 360.0], [0.0, 0.0, 1.0]],
            [-0.02, 0.003, -0.001, 0.0002],
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            [0.0, 0.0, 0.0],
        )
    }

    #[test]
    fn test_principal_point() {
        let cam = camera();
        let px = cam.project(DVec3::new(0.0, 0.0, 3.0)).unwrap();
        assert!((px - DVec2::new(640.0, 360.0)).length() < 1e-9);
    }

    #[test]
    fn test_behind_camera() {
        assert!(camera().project(DVec3::new(0.1, 0.2, -1.0)).is_none());
        assert!(camera().project(DVec3::new(0.1, 0.2, 0.0)).is_none());
    }

    #[test]
    fn test_undistort_inverts_project() {
        let cam = camera();
        for p in [
            DVec3::new(0.3, -0.2, 2.0),
            DVec3::new(-1.5, 0.8, 1.2),
            DVec3::new(0.01, 0.0, 5.0),
        ] {
            let px = cam.project(p).unwrap();
            let n = cam.undistort(px);
            assert!((n - DVec2::new(p.x / p.z, p.y / p.z)).length() < 1e-9);
        }
    }

    #[test]
    fn test_zero_distortion_is_pinhole() {
        let mut cam = camera();
        cam.distortion = [0.0; 4];
        let px = cam.project(DVec3::new(0.5, 0.0, 1.0)).unwrap();
        let expected = 640.0 + 800.0 * 0.5f64.atan();
        assert!((px.x - expected).abs() < 1e-9);
    }
}
