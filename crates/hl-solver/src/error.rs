//! Error types for network assembly.

use hl_core::{BoundaryId, HlError, RoomId};
use hl_fabric::FabricError;
use thiserror::Error;

/// Errors raised while assembling the room network. All of them are
/// configuration or numerical problems found before time marching starts.
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Input mismatch: {what}")]
    InputMismatch { what: String },

    #[error("Invalid boundary {boundary:?}: {what}")]
    InvalidBoundary { boundary: BoundaryId, what: String },

    #[error("Invalid room {room:?}: {what}")]
    InvalidRoom { room: RoomId, what: String },

    #[error("Response factor of boundary {boundary:?}: {source}")]
    Fabric {
        boundary: BoundaryId,
        #[source]
        source: FabricError,
    },

    #[error("Surface matrix of room {room:?} is singular")]
    Singular { room: RoomId },

    #[error("Surface matrix of room {room:?} is ill-conditioned (condition {condition:e} > {limit:e})")]
    IllConditioned {
        room: RoomId,
        condition: f64,
        limit: f64,
    },

    #[error("Core error: {0}")]
    Core(#[from] HlError),
}

pub type SolverResult<T> = Result<T, SolverError>;

impl From<hl_graph::GraphError> for SolverError {
    fn from(e: hl_graph::GraphError) -> Self {
        SolverError::Core(e.into())
    }
}
