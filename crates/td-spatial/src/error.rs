//! Spatial-subsystem error type.

use thiserror::Error;

use td_core::{AgentRef, Position};

/// Errors produced by `td-spatial`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpatialError {
    /// A placement or move targeted a cell outside the grid.  Correct
    /// movement logic never produces this; it indicates a configuration or
    /// logic defect.
    #[error("position {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Position, width: u32, height: u32 },

    #[error("{0} is not on the grid")]
    NotPlaced(AgentRef),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
