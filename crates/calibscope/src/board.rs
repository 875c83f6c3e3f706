//! Calibration board registration: boards posed in 3D and 2D corner overlays.

use calibscope_core::state::try_with_context;
use calibscope_core::{BoardGeometry, CalibscopeError, DVec2, DVec3, Result, Vec4};
use calibscope_structures::{BoardMesh, BoardOverlay};

use crate::{has_structure, register_structure, with_structure};

const MESH_TYPE_NAME: &str = "BoardMesh";
const OVERLAY_TYPE_NAME: &str = "BoardOverlay";

/// Registers a calibration board posed by a rotation vector and a translation.
///
/// Fails with `StructureExists` if a board with this name is registered.
pub fn register_calib_board(
    name: impl Into<String>,
    board: &BoardGeometry,
    rotation_vector: DVec3,
    translation: DVec3,
) -> Result<BoardMeshHandle> {
    let (axis_length, color) =
        try_with_context(|ctx| (ctx.options.board_axis_length, ctx.options.board_color))
            .ok_or(CalibscopeError::NotInitialized)?;

    let name = name.into();
    let mesh = BoardMesh::from_rotation_vector(
        name.clone(),
        board,
        rotation_vector,
        translation,
        axis_length,
        color,
    );
    register_structure(Box::new(mesh))?;
    Ok(BoardMeshHandle { name })
}

/// Registers the 2D grid overlay of board detections in one camera image.
///
/// Every detection must hold `rows * cols` row-major corners. Names must
/// be unique among overlays.
pub fn register_board_overlay(
    name: impl Into<String>,
    detections: &[Vec<DVec2>],
    rows: usize,
    cols: usize,
    resolution: (u32, u32),
) -> Result<BoardOverlayHandle> {
    let name = name.into();
    let overlay = BoardOverlay::new(name.clone(), detections, rows, cols, resolution)?;
    register_structure(Box::new(overlay))?;
    Ok(BoardOverlayHandle { name })
}

/// Gets a registered board mesh by name.
#[must_use]
pub fn get_calib_board(name: &str) -> Option<BoardMeshHandle> {
    has_structure(MESH_TYPE_NAME, name).then(|| BoardMeshHandle {
        name: name.to_string(),
    })
}

/// Gets a registered board overlay by name.
#[must_use]
pub fn get_board_overlay(name: &str) -> Option<BoardOverlayHandle> {
    has_structure(OVERLAY_TYPE_NAME, name).then(|| BoardOverlayHandle {
        name: name.to_string(),
    })
}

/// Handle for a registered board mesh.
#[derive(Clone)]
pub struct BoardMeshHandle {
    name: String,
}

impl BoardMeshHandle {
    /// Returns the name of this board.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the grid color.
    pub fn set_color(&self, color: Vec4) -> &Self {
        with_structure(MESH_TYPE_NAME, &self.name, |mesh: &mut BoardMesh| {
            mesh.set_color(color);
        });
        self
    }

    /// Returns the world-space line segments of the board.
    #[must_use]
    pub fn segments(&self) -> Option<Vec<[DVec3; 2]>> {
        with_structure(MESH_TYPE_NAME, &self.name, |mesh: &mut BoardMesh| mesh.segments())
    }
}

/// Handle for a registered board overlay.
#[derive(Clone)]
pub struct BoardOverlayHandle {
    name: String,
}

impl BoardOverlayHandle {
    /// Returns the name of this overlay.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the line color.
    pub fn set_color(&self, color: Vec4) -> &Self {
        with_structure(OVERLAY_TYPE_NAME, &self.name, |overlay: &mut BoardOverlay| {
            overlay.set_color(color);
        });
        self
    }

    /// Returns the number of grid segments.
    #[must_use]
    pub fn num_segments(&self) -> Option<usize> {
        with_structure(OVERLAY_TYPE_NAME, &self.name, |overlay: &mut BoardOverlay| {
            overlay.segments().len()
        })
    }
}
