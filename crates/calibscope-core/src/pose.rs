//! Camera pose inversion and axis-angle conversion.
//!
//! Calibration stores extrinsics world-to-camera: a world point `X` maps to
//! `r * X + t` in camera coordinates. Placing a camera in a scene needs the
//! opposite direction, camera-to-world, which is `R = r^T` and `T = -r^T * t`.
//! The scene then wants `R` as an axis and an angle in degrees.

use glam::{DMat3, DQuat, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{CalibscopeError, Result};

/// Default tolerance on `||R * R^T - I||` for accepting a rotation.
pub const DEFAULT_ROTATION_TOLERANCE: f64 = 1e-4;

/// A camera extrinsic pose in world-to-camera convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    /// Rotation taking world axes to camera axes.
    pub rotation: DMat3,
    /// World origin expressed in camera coordinates.
    pub translation: DVec3,
}

impl CameraPose {
    /// Creates a pose from a rotation matrix and a translation.
    pub fn new(rotation: DMat3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Creates a pose from a row-major rotation, as calibration files store it.
    pub fn from_rows(rows: [[f64; 3]; 3], translation: [f64; 3]) -> Self {
        Self {
            rotation: DMat3::from_cols_array_2d(&rows).transpose(),
            translation: DVec3::from_array(translation),
        }
    }

    /// Identity rotation at the world origin.
    pub fn identity() -> Self {
        Self::new(DMat3::IDENTITY, DVec3::ZERO)
    }

    /// Maps a world point into camera coordinates.
    #[must_use]
    pub fn transform_point(&self, world: DVec3) -> DVec3 {
        self.rotation * world + self.translation
    }

    /// Checks the rotation against `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<()> {
        validate_rotation(&self.rotation, tolerance)
    }

    /// Computes where this camera sits in the world.
    pub fn invert(&self, tolerance: f64) -> Result<CameraPlacement> {
        invert_pose(&self.rotation, self.translation, tolerance)
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::identity()
    }
}

/// A rotation as a unit axis and an angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisAngle {
    /// Rotation magnitude in degrees, in `[0, 180]`.
    pub angle_degrees: f64,
    /// Unit rotation axis. `(1, 0, 0)` when the angle is zero.
    pub axis: DVec3,
}

impl AxisAngle {
    /// The zero rotation with the default axis.
    pub const IDENTITY: Self = Self {
        angle_degrees: 0.0,
        axis: DVec3::X,
    };

    /// Returns the rotation vector (axis scaled by the angle in radians).
    #[must_use]
    pub fn to_rotation_vector(&self) -> DVec3 {
        self.axis * self.angle_degrees.to_radians()
    }

    /// Returns the rotation as a matrix.
    #[must_use]
    pub fn to_mat3(&self) -> DMat3 {
        DMat3::from_axis_angle(self.axis, self.angle_degrees.to_radians())
    }
}

/// Camera-to-world placement derived from a world-to-camera pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPlacement {
    /// Camera center in world coordinates.
    pub position: DVec3,
    /// Camera-to-world rotation.
    pub rotation: DMat3,
    /// `rotation` as an axis and an angle.
    pub axis_angle: AxisAngle,
}

impl CameraPlacement {
    /// Maps a point given in the camera's local frame into the world.
    #[must_use]
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.rotation * local + self.position
    }
}

/// Frobenius norm of `r * r^T - I`.
pub fn orthonormality_deviation(r: &DMat3) -> f64 {
    let residual = *r * r.transpose() - DMat3::IDENTITY;
    residual
        .to_cols_array()
        .iter()
        .map(|v| v * v)
        .sum::<f64>()
        .sqrt()
}

/// Fails with [`CalibscopeError::InvalidRotation`] unless `r` is a proper
/// rotation within `tolerance`.
pub fn validate_rotation(r: &DMat3, tolerance: f64) -> Result<()> {
    if !r.is_finite() {
        return Err(CalibscopeError::InvalidRotation {
            deviation: f64::INFINITY,
        });
    }
    let deviation = orthonormality_deviation(r);
    if deviation > tolerance {
        return Err(CalibscopeError::InvalidRotation { deviation });
    }
    let det = r.determinant();
    if det < 0.0 {
        return Err(CalibscopeError::InvalidRotation {
            deviation: (det - 1.0).abs(),
        });
    }
    Ok(())
}

/// Inverts a world-to-camera pose into a camera placement.
///
/// `R = r^T`, `T = -r^T * t`, and `R` converted to axis-angle. Identity
/// rotations are valid and give a zero angle about `(1, 0, 0)`.
pub fn invert_pose(rotation: &DMat3, translation: DVec3, tolerance: f64) -> Result<CameraPlacement> {
    validate_rotation(rotation, tolerance)?;

    let world_rotation = rotation.transpose();
    let position = -(world_rotation * translation);

    Ok(CameraPlacement {
        position,
        rotation: world_rotation,
        axis_angle: rotation_to_axis_angle(&world_rotation),
    })
}

/// Converts a rotation matrix to axis-angle through a unit quaternion.
///
/// The quaternion is taken with `w >= 0` so the angle lands in `[0, 180]`.
/// The caller is responsible for `r` being a rotation; see [`validate_rotation`].
pub fn rotation_to_axis_angle(r: &DMat3) -> AxisAngle {
    let q = canonical_quat(r);
    let (axis, angle) = q.to_axis_angle();
    if angle == 0.0 {
        return AxisAngle::IDENTITY;
    }
    AxisAngle {
        angle_degrees: angle.to_degrees(),
        axis,
    }
}

/// Converts a rotation matrix to a rotation vector (radians).
pub fn rotation_to_rotation_vector(r: &DMat3) -> DVec3 {
    rotation_to_axis_angle(r).to_rotation_vector()
}

/// Converts a rotation vector (axis times angle in radians) to a matrix.
pub fn rotation_from_rotation_vector(v: DVec3) -> DMat3 {
    DMat3::from_quat(DQuat::from_scaled_axis(v))
}

fn canonical_quat(r: &DMat3) -> DQuat {
    let q = DQuat::from_mat3(r).normalize();
    if q.w < 0.0 {
        -q
    } else {
        q
    }
}
