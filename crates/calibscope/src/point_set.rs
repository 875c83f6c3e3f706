//! Point set registration.

use calibscope_core::{DVec3, Result, Structure, Vec4};
use calibscope_structures::PointSet;

use crate::{has_structure, register_structure, with_structure};

const TYPE_NAME: &str = "PointSet";

/// Registers a colored point set, for instance triangulated points.
///
/// Fails with `StructureExists` if the name is taken.
pub fn register_points(
    name: impl Into<String>,
    points: Vec<DVec3>,
    color: Vec4,
    point_size: f32,
) -> Result<PointSetHandle> {
    let name = name.into();
    register_structure(Box::new(PointSet::new(name.clone(), points, color, point_size)))?;
    Ok(PointSetHandle { name })
}

/// Gets a registered point set by name.
#[must_use]
pub fn get_point_set(name: &str) -> Option<PointSetHandle> {
    has_structure(TYPE_NAME, name).then(|| PointSetHandle {
        name: name.to_string(),
    })
}

/// Handle for a registered point set.
#[derive(Clone)]
pub struct PointSetHandle {
    name: String,
}

impl PointSetHandle {
    /// Returns the name of this point set.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the color.
    pub fn set_color(&self, color: Vec4) -> &Self {
        with_point_set(&self.name, |ps| {
            ps.set_color(color);
        });
        self
    }

    /// Sets the point size.
    pub fn set_point_size(&self, size: f32) -> &Self {
        with_point_set(&self.name, |ps| {
            ps.set_point_size(size);
        });
        self
    }

    /// Sets whether the point set is visible.
    pub fn set_enabled(&self, enabled: bool) -> &Self {
        with_point_set(&self.name, |ps| ps.set_enabled(enabled));
        self
    }

    /// Returns a copy of the points.
    #[must_use]
    pub fn points(&self) -> Option<Vec<DVec3>> {
        with_point_set(&self.name, |ps| ps.points().to_vec())
    }
}

/// Runs `f` on the named point set, if registered.
pub fn with_point_set<R>(name: &str, f: impl FnOnce(&mut PointSet) -> R) -> Option<R> {
    with_structure(TYPE_NAME, name, f)
}
