//! Structure trait.
//!
//! A [`Structure`] is a piece of scene geometry handed to the visualization
//! sink, such as a camera glyph, a calibration board, or a point set.

use std::any::Any;

use glam::DVec3;

/// A geometric object that can be placed in a calibration scene.
///
/// Structures carry only plain data. They never hold a reference to a
/// rendering object; the sink reads their buffers and draws them.
pub trait Structure: Any + Send + Sync {
    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns a mutable reference to self as `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the unique name of this structure.
    fn name(&self) -> &str;

    /// Returns the type name of this structure (e.g., "`CameraGlyph`", "`PointSet`").
    fn type_name(&self) -> &'static str;

    /// Returns the axis-aligned bounding box in world coordinates.
    ///
    /// Returns `None` if the structure has no spatial extent.
    fn bounding_box(&self) -> Option<(DVec3, DVec3)>;

    /// Returns whether this structure is currently visible.
    fn is_enabled(&self) -> bool;

    /// Sets the visibility of this structure.
    fn set_enabled(&mut self, enabled: bool);
}

/// Axis-aligned bounds of a set of points, or `None` when the set is empty
/// or contains no finite point.
pub fn bounds_of<'a>(points: impl IntoIterator<Item = &'a DVec3>) -> Option<(DVec3, DVec3)> {
    let mut min = DVec3::splat(f64::MAX);
    let mut max = DVec3::splat(f64::MIN);
    let mut any = false;
    for p in points {
        if !p.is_finite() {
            continue;
        }
        min = min.min(*p);
        max = max.max(*p);
        any = true;
    }
    any.then_some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_skip_non_finite() {
        let pts = [
            DVec3::new(1.0, -2.0, 0.5),
            DVec3::new(f64::NAN, 0.0, 0.0),
            DVec3::new(-1.0, 3.0, 0.0),
        ];
        let (min, max) = bounds_of(&pts).unwrap();
        assert_eq!(min, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(max, DVec3::new(1.0, 3.0, 0.5));
        assert!(bounds_of(&[]).is_none());
    }
}
