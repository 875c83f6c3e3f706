//! Frame buffers for animated reconstructions.
//!
//! An [`Animation`] holds a 3D scatter and a line set per frame, plus the
//! projection of every line vertex into each camera, so a viewer can show
//! the 3D scene next to per-camera 2D overlays. Projections are computed
//! once at construction.

use std::ops::Range;

use calibscope_core::{CalibscopeError, CameraModel, Result};
use glam::{DVec2, DVec3};

/// Buffers of one frame, or of several frames concatenated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationFrame {
    /// Scatter positions.
    pub scatter: Vec<DVec3>,
    /// Line vertices, consecutive pairs form segments.
    pub lines: Vec<DVec3>,
    /// Line vertices projected into each camera, `None` behind the camera.
    pub camera_lines: Vec<Vec<Option<DVec2>>>,
}

/// Looping playback over precomputed frames.
#[derive(Debug, Clone)]
pub struct Animation {
    scatter_frames: Vec<Vec<DVec3>>,
    line_frames: Vec<Vec<DVec3>>,
    /// Indexed `[camera][frame][vertex]`.
    camera_lines: Vec<Vec<Vec<Option<DVec2>>>>,
    cursor: usize,
}

impl Animation {
    /// Creates an animation and projects every line frame into `cameras`.
    ///
    /// Scatter and line frame counts must be equal and non-zero.
    pub fn new(
        scatter_frames: Vec<Vec<DVec3>>,
        line_frames: Vec<Vec<DVec3>>,
        cameras: &[CameraModel],
    ) -> Result<Self> {
        if scatter_frames.is_empty() || scatter_frames.len() != line_frames.len() {
            return Err(CalibscopeError::DimensionMismatch {
                expected: scatter_frames.len().max(1),
                actual: line_frames.len(),
            });
        }

        let camera_lines = cameras
            .iter()
            .map(|camera| {
                line_frames
                    .iter()
                    .map(|frame| frame.iter().map(|p| camera.project(*p)).collect())
                    .collect()
            })
            .collect();

        log::debug!(
            "animation with {} frames over {} cameras",
            scatter_frames.len(),
            cameras.len()
        );

        Ok(Self {
            scatter_frames,
            line_frames,
            camera_lines,
            cursor: 0,
        })
    }

    /// Number of frames.
    pub fn n_frames(&self) -> usize {
        self.scatter_frames.len()
    }

    /// Number of cameras with projected lines.
    pub fn n_cameras(&self) -> usize {
        self.camera_lines.len()
    }

    /// Index of the frame [`advance`](Self::advance) returns next.
    pub fn current(&self) -> usize {
        self.cursor
    }

    /// Returns the current frame index and moves to the next, wrapping to 0.
    pub fn advance(&mut self) -> usize {
        let index = self.cursor;
        self.cursor = (self.cursor + 1) % self.n_frames();
        index
    }

    /// Moves the cursor back to the first frame.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Buffers of frame `index`, `None` when out of range.
    pub fn frame(&self, index: usize) -> Option<AnimationFrame> {
        index.checked_add(1).and_then(|end| self.frames(index..end))
    }

    /// Concatenated buffers of a frame range, for a static multi-frame view.
    ///
    /// Returns `None` when the range is empty or reaches past the last frame.
    pub fn frames(&self, range: Range<usize>) -> Option<AnimationFrame> {
        if range.is_empty() || range.end > self.n_frames() {
            return None;
        }
        let scatter = self.scatter_frames[range.clone()].concat();
        let lines = self.line_frames[range.clone()].concat();
        let camera_lines = self
            .camera_lines
            .iter()
            .map(|frames| frames[range.clone()].concat())
            .collect();
        Some(AnimationFrame {
            scatter,
            lines,
            camera_lines,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calibscope_core::{CameraPose, DMat3};

    fn camera() -> CameraModel {
        let k = DMat3::from_cols_array_2d(&[[400.0, 0.0, 0.0], [0.0, 400.0, 0.0], [320.0, 240.0, 1.0]]);
        CameraModel::new(k, [0.0; 4], CameraPose::new(DMat3::IDENTITY, DVec3::new(0.0, 0.0, 2.0)))
    }

    fn frames(n: usize) -> (Vec<Vec<DVec3>>, Vec<Vec<DVec3>>) {
        let scatter = (0..n).map(|i| vec![DVec3::splat(i as f64)]).collect();
        let lines = (0..n)
            .map(|i| vec![DVec3::new(i as f64 * 0.1, 0.0, 0.0), DVec3::new(0.0, 0.0, -3.0)])
            .collect();
        (scatter, lines)
    }

    #[test]
    fn test_advance_wraps() {
        let (scatter, lines) = frames(3);
        let mut anim = Animation::new(scatter, lines, &[]).unwrap();
        let seen: Vec<usize> = (0..5).map(|_| anim.advance()).collect();
        assert_eq!(seen, vec![0, 1, 2, 0, 1]);
        assert_eq!(anim.current(), 2);
        anim.rewind();
        assert_eq!(anim.current(), 0);
    }

    #[test]
    fn test_camera_projections() {
        let (scatter, lines) = frames(2);
        let anim = Animation::new(scatter, lines, &[camera(), camera()]).unwrap();
        assert_eq!(anim.n_cameras(), 2);

        let frame = anim.frame(0).unwrap();
        assert_eq!(frame.camera_lines.len(), 2);
        let principal = frame.camera_lines[0][0].unwrap();
        assert!((principal - DVec2::new(320.0, 240.0)).length() < 1e-9);
        // second vertex sits behind the camera
        assert!(frame.camera_lines[1][1].is_none());
    }

    #[test]
    fn test_frames_concatenate() {
        let (scatter, lines) = frames(4);
        let anim = Animation::new(scatter, lines, &[camera()]).unwrap();
        let view = anim.frames(1..3).unwrap();
        assert_eq!(view.scatter, vec![DVec3::splat(1.0), DVec3::splat(2.0)]);
        assert_eq!(view.lines.len(), 4);
        assert_eq!(view.camera_lines[0].len(), 4);
        assert!(anim.frames(2..5).is_none());
        assert!(anim.frame(4).is_none());
        assert!(anim.frame(usize::MAX).is_none());
    }

    #[test]
    fn test_frame_count_mismatch() {
        let (scatter, _) = frames(3);
        let (_, lines) = frames(2);
        assert!(matches!(
            Animation::new(scatter, lines, &[]),
            Err(CalibscopeError::DimensionMismatch { expected: 3, actual: 2 })
        ));
        assert!(Animation::new(Vec::new(), Vec::new(), &[]).is_err());
    }
}
