//! Camera glyph registration and manipulation.
//!
//! Camera glyphs show where each calibrated camera sits in the world and
//! which way it looks. Poses are given world-to-camera, as calibration
//! produces them, and are inverted on registration.
//!
//! # Example
//!
//! ```no_run
//! use calibscope::*;
//!
//! fn main() -> Result<()> {
//!     init()?;
//!
//!     let pose = CameraPose::new(DMat3::IDENTITY, DVec3::new(0.0, 0.0, 2.0));
//!     let cam = register_camera("cam0", &pose)?;
//!     cam.set_color(Vec4::new(0.8, 0.1, 0.1, 1.0));
//!
//!     Ok(())
//! }
//! ```

use calibscope_core::state::try_with_context;
use calibscope_core::{CalibscopeError, CameraPlacement, CameraPose, Result, Vec4};
use calibscope_structures::CameraGlyph;

use crate::{has_structure, register_structure, with_structure};

const TYPE_NAME: &str = "CameraGlyph";

/// Registers a camera glyph for a world-to-camera pose.
///
/// Fails with `InvalidRotation` if the pose rotation is not a rotation, and
/// with `StructureExists` if the name is taken.
pub fn register_camera(name: impl Into<String>, pose: &CameraPose) -> Result<CameraGlyphHandle> {
    let (color, tolerance) = try_with_context(|ctx| {
        (ctx.options.camera_color, ctx.options.rotation_tolerance)
    })
    .ok_or(CalibscopeError::NotInitialized)?;

    let name = name.into();
    let glyph = CameraGlyph::from_pose(name.clone(), pose, color, tolerance)?;
    log::debug!(
        "camera '{name}' at {} rotated {:.2} deg",
        glyph.placement().position,
        glyph.placement().axis_angle.angle_degrees
    );
    register_structure(Box::new(glyph))?;
    Ok(CameraGlyphHandle { name })
}

/// Gets a registered camera glyph by name.
#[must_use]
pub fn get_camera_glyph(name: &str) -> Option<CameraGlyphHandle> {
    has_structure(TYPE_NAME, name).then(|| CameraGlyphHandle {
        name: name.to_string(),
    })
}

/// Handle for a registered camera glyph.
#[derive(Clone)]
pub struct CameraGlyphHandle {
    name: String,
}

impl CameraGlyphHandle {
    /// Returns the name of this camera glyph.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the body color.
    pub fn set_color(&self, color: Vec4) -> &Self {
        with_camera_glyph(&self.name, |glyph| {
            glyph.set_color(color);
        });
        self
    }

    /// Sets whether the glyph is visible.
    pub fn set_enabled(&self, enabled: bool) -> &Self {
        with_camera_glyph(&self.name, |glyph| {
            calibscope_core::Structure::set_enabled(glyph, enabled);
        });
        self
    }

    /// Returns the camera placement in the world.
    #[must_use]
    pub fn placement(&self) -> Option<CameraPlacement> {
        with_camera_glyph(&self.name, |glyph| *glyph.placement())
    }
}

/// Runs `f` on the named camera glyph, if registered.
pub fn with_camera_glyph<R>(name: &str, f: impl FnOnce(&mut CameraGlyph) -> R) -> Option<R> {
    with_structure(TYPE_NAME, name, f)
}
