//! 2D overlay of detected board corners in image space.

use std::any::Any;

use calibscope_core::board::grid_edges;
use calibscope_core::{CalibscopeError, Result, Structure};
use glam::{DVec2, DVec3, Vec4};

/// Visible image region. `y_range` runs from the image height to 0 so the
/// y axis points down, as in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl Viewport {
    /// Viewport covering an image of the given resolution.
    pub fn from_resolution(width: u32, height: u32) -> Self {
        Self {
            x_range: (0.0, f64::from(width)),
            y_range: (f64::from(height), 0.0),
        }
    }
}

/// Grid lines of every detected board in one camera image.
#[derive(Debug, Clone)]
pub struct BoardOverlay {
    name: String,
    rows: usize,
    cols: usize,
    segments: Vec<[DVec2; 2]>,
    viewport: Viewport,
    color: Vec4,
    line_width: f32,
    enabled: bool,
}

impl BoardOverlay {
    /// Builds the overlay from per-frame corner detections.
    ///
    /// Each detection holds `rows * cols` row-major corners. Fails with
    /// `InvalidBoardShape` when a detection has a different count.
    pub fn new(
        name: impl Into<String>,
        detections: &[Vec<DVec2>],
        rows: usize,
        cols: usize,
        resolution: (u32, u32),
    ) -> Result<Self> {
        let edges = grid_edges(rows, cols)?;
        let mut segments = Vec::with_capacity(detections.len() * edges.len());
        for corners in detections {
            if corners.len() != rows * cols {
                return Err(CalibscopeError::InvalidBoardShape {
                    rows,
                    cols,
                    points: corners.len(),
                });
            }
            segments.extend(
                edges
                    .edges()
                    .iter()
                    .map(|&[a, b]| [corners[a as usize], corners[b as usize]]),
            );
        }

        let name = name.into();
        log::debug!(
            "overlay {name}: {} detections, {} segments",
            detections.len(),
            segments.len()
        );

        Ok(Self {
            name,
            rows,
            cols,
            segments,
            viewport: Viewport::from_resolution(resolution.0, resolution.1),
            color: Vec4::new(1.0, 0.0, 0.0, 1.0),
            line_width: 0.25,
            enabled: true,
        })
    }

    /// Returns the board shape as `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns the grid line segments in pixel coordinates.
    #[must_use]
    pub fn segments(&self) -> &[[DVec2; 2]] {
        &self.segments
    }

    /// Returns the visible image region.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Gets the line color.
    #[must_use]
    pub fn color(&self) -> Vec4 {
        self.color
    }

    /// Sets the line color.
    pub fn set_color(&mut self, color: Vec4) -> &mut Self {
        self.color = color;
        self
    }

    /// Gets the line width.
    #[must_use]
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Sets the line width.
    pub fn set_line_width(&mut self, width: f32) -> &mut Self {
        self.line_width = width;
        self
    }
}

impl Structure for BoardOverlay {
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
        "BoardOverlay"
    }

    // Image-space geometry does not contribute to the 3D scene extents.
    fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        None
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
