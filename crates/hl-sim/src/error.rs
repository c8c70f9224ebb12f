//! Error types for time marching.

use hl_core::{HlError, RoomId};
use thiserror::Error;

/// Errors encountered during simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Input mismatch: {what}")]
    InputMismatch { what: String },

    #[error("Non-physical condition in room {room}: {what}")]
    NonPhysical { room: RoomId, what: &'static str },

    #[error("Comfort evaluation failed in room {room}: {source}")]
    Control {
        room: RoomId,
        #[source]
        source: hl_controls::ControlError,
    },

    #[error("Invalid comfort configuration: {0}")]
    Comfort(#[source] hl_controls::ControlError),

    #[error("Assembly error: {0}")]
    Solver(#[from] hl_solver::SolverError),

    #[error("Core error: {0}")]
    Core(#[from] HlError),
}

pub type SimResult<T> = Result<T, SimError>;
