//! Error types for calibscope-rs.

use thiserror::Error;

/// The main error type for calibscope-rs operations.
#[derive(Error, Debug)]
pub enum CalibscopeError {
    /// A rotation matrix is not orthonormal with determinant +1.
    #[error("invalid rotation: deviation from orthonormality {deviation:.3e}")]
    InvalidRotation {
        /// Frobenius norm of `R * R^T - I`, `|det(R) - 1|` for reflections,
        /// or `f64::INFINITY` for non-finite input.
        deviation: f64,
    },

    /// Board dimensions are too small or disagree with the point count.
    #[error("invalid board shape: {rows}x{cols} with {points} points")]
    InvalidBoardShape {
        rows: usize,
        cols: usize,
        points: usize,
    },

    /// Two inputs that must have the same length do not.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Triangulation rays are parallel or the solution is not finite.
    #[error("degenerate triangulation at correspondence {index}")]
    DegenerateTriangulation { index: usize },

    /// A camera pair shares no labeled observations.
    #[error("no correspondences between cameras {first} and {second}")]
    NoCorrespondences { first: usize, second: usize },

    /// A camera index does not exist in the loaded scene.
    #[error("camera index {index} out of range for {count} cameras")]
    CameraIndexOutOfRange { index: usize, count: usize },

    /// The process context has not been initialized.
    #[error("calibscope not initialized - call calibscope::init() first")]
    NotInitialized,

    /// The process context has already been initialized.
    #[error("calibscope already initialized")]
    AlreadyInitialized,

    /// A structure with the given name already exists.
    #[error("structure '{0}' already exists")]
    StructureExists(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for calibscope-rs operations.
pub type Result<T> = std::result::Result<T, CalibscopeError>;
