//! Configuration options for calibscope.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Global configuration options for scene assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Maximum Frobenius norm of `R * R^T - I` accepted for a rotation.
    pub rotation_tolerance: f64,

    /// Length of the axis indicator drawn at a board origin (board units).
    pub board_axis_length: f64,

    /// Color of calibration board grid lines.
    pub board_color: Vec4,

    /// Color of camera glyph bodies.
    pub camera_color: Vec4,

    /// Point size for triangulated board corners.
    pub board_point_size: f32,

    /// Point size for triangulated user-defined markers.
    pub defined_point_size: f32,

    /// Colors assigned to camera pairs, reused cyclically.
    pub pair_palette: Vec<Vec4>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            rotation_tolerance: 1e-4,
            board_axis_length: 0.1,
            board_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
            camera_color: Vec4::new(0.1, 0.1, 0.1, 1.0),
            board_point_size: 3.0,
            defined_point_size: 10.0,
            pair_palette: default_pair_palette(),
        }
    }
}

impl Options {
    /// Returns the color for the `index`-th camera pair.
    ///
    /// Falls back to black when the palette is empty.
    #[must_use]
    pub fn pair_color(&self, index: usize) -> Vec4 {
        if self.pair_palette.is_empty() {
            return Vec4::new(0.0, 0.0, 0.0, 1.0);
        }
        self.pair_palette[index % self.pair_palette.len()]
    }
}

/// Red, green, black, blue, light blue, magenta.
fn default_pair_palette() -> Vec<Vec4> {
    vec![
        Vec4::new(1.0, 0.0, 0.0, 0.99),
        Vec4::new(0.0, 1.0, 0.0, 0.99),
        Vec4::new(0.0, 0.0, 0.0, 0.99),
        Vec4::new(0.0, 0.0, 1.0, 0.99),
        Vec4::new(0.0, 0.8, 0.8, 0.99),
        Vec4::new(1.0, 0.0, 1.0, 0.99),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_color_cycles() {
        let options = Options::default();
        assert_eq!(options.pair_color(0), options.pair_color(6));
        assert_eq!(options.pair_color(5), Vec4::new(1.0, 0.0, 1.0, 0.99));
    }

    #[test]
    fn test_empty_palette() {
        let options = Options {
            pair_palette: Vec::new(),
            ..Options::default()
        };
        assert_eq!(options.pair_color(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_options_json_roundtrip() {
        let options = Options::default();
        let json = serde_json::to_string(&options).unwrap();
        let back: Options = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pair_palette.len(), 6);
        assert!((back.rotation_tolerance - 1e-4).abs() < 1e-12);
    }
}
