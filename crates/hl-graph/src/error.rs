//! Topology-specific error types.

use hl_core::{BoundaryId, EdgeId, HlError, RoomId};

/// Topology construction and validation errors.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A surface refers to an owning room that doesn't exist.
    InvalidOwner { surface: BoundaryId, room: RoomId },

    /// A partition refers to a rear room that doesn't exist.
    InvalidRearRoom { surface: BoundaryId, room: RoomId },

    /// A partition faces its own room.
    SelfFacingPartition { surface: BoundaryId },

    /// A ventilation edge refers to a room that doesn't exist.
    InvalidEdgeRoom { edge: EdgeId, room: RoomId },

    /// A ventilation edge leaves and enters the same room.
    SelfLoop { edge: EdgeId },

    /// Two edges carry air between the same pair of rooms in the same direction.
    DuplicateEdge { edge: EdgeId, first: EdgeId },

    /// A ventilation flow is negative or not finite.
    InvalidFlow { edge: EdgeId, flow: f64 },

    /// A room owns no surfaces and cannot be assembled.
    RoomWithoutSurfaces { room: RoomId },

    /// Name not found in the index.
    NameNotFound { what: &'static str, name: String },

    /// Two entities of the same kind share a name.
    DuplicateName { what: &'static str, name: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GraphError::InvalidOwner { surface, room } => {
                write!(f, "Surface {} is owned by non-existent room {}", surface, room)
            }
            GraphError::InvalidRearRoom { surface, room } => {
                write!(f, "Surface {} faces non-existent room {}", surface, room)
            }
            GraphError::SelfFacingPartition { surface } => {
                write!(f, "Partition {} faces its own room", surface)
            }
            GraphError::InvalidEdgeRoom { edge, room } => {
                write!(f, "Ventilation edge {} refers to non-existent room {}", edge, room)
            }
            GraphError::SelfLoop { edge } => {
                write!(f, "Ventilation edge {} leaves and enters the same room", edge)
            }
            GraphError::DuplicateEdge { edge, first } => {
                write!(f, "Ventilation edge {} duplicates edge {}", edge, first)
            }
            GraphError::InvalidFlow { edge, flow } => {
                write!(f, "Ventilation edge {} has invalid flow {} m3/s", edge, flow)
            }
            GraphError::RoomWithoutSurfaces { room } => {
                write!(f, "Room {} owns no surfaces", room)
            }
            GraphError::NameNotFound { what, name } => {
                write!(f, "{} '{}' not found", what, name)
            }
            GraphError::DuplicateName { what, name } => {
                write!(f, "Duplicate {} name '{}'", what, name)
            }
        }
    }
}

impl std::error::Error for GraphError {}

impl From<GraphError> for HlError {
    fn from(err: GraphError) -> Self {
        HlError::Topology {
            what: err.to_string(),
        }
    }
}
