//! Colored 3D point set.

use std::any::Any;

use calibscope_core::structure::bounds_of;
use calibscope_core::Structure;
use glam::{DVec3, Vec4};

/// A set of 3D points drawn with one color and size.
#[derive(Debug, Clone)]
pub struct PointSet {
    name: String,
    points: Vec<DVec3>,
    color: Vec4,
    point_size: f32,
    enabled: bool,
}

impl PointSet {
    /// Creates a new point set.
    pub fn new(name: impl Into<String>, points: Vec<DVec3>, color: Vec4, point_size: f32) -> Self {
        Self {
            name: name.into(),
            points,
            color,
            point_size,
            enabled: true,
        }
    }

    /// Returns the number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Returns the points.
    #[must_use]
    pub fn points(&self) -> &[DVec3] {
        &self.points
    }

    /// Replaces the points.
    pub fn update_points(&mut self, points: Vec<DVec3>) -> &mut Self {
        self.points = points;
        self
    }

    /// Gets the color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Sets the color.
    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = color;
        self
    }

    /// Gets the point size in pixels.
    #[must_use]
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Sets the point size in pixels.
    pub fn set_point_size(&mut self, size: f32) -> &mut Self {
        self.point_size = size;
        self
    }
}

impl Structure for PointSet {
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
        "PointSet"
    }

    fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        bounds_of(&self.points)
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
