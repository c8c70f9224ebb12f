//! Topology validation logic.

use std::collections::HashMap;

use hl_core::{HlResult, RoomId};

use crate::error::GraphError;
use crate::topology::{RearSide, Room, Surface, VentEdge};

/// Validate references: every surface and edge points at existing rooms,
/// partitions face another room, flows are finite and non-negative.
pub(crate) fn validate_structure(
    rooms: &[Room],
    surfaces: &[Surface],
    edges: &[VentEdge],
) -> HlResult<()> {
    let room_exists = |id: RoomId| id.slot() < rooms.len();

    for surface in surfaces {
        if !room_exists(surface.owner) {
            return Err(GraphError::InvalidOwner {
                surface: surface.id,
                room: surface.owner,
            }
            .into());
        }
        if let RearSide::Room(rear) = surface.rear {
            if !room_exists(rear) {
                return Err(GraphError::InvalidRearRoom {
                    surface: surface.id,
                    room: rear,
                }
                .into());
            }
            if rear == surface.owner {
                return Err(GraphError::SelfFacingPartition {
                    surface: surface.id,
                }
                .into());
            }
        }
    }

    let mut seen: HashMap<(RoomId, RoomId), VentEdge> = HashMap::new();
    for edge in edges {
        for room in [edge.from, edge.to] {
            if !room_exists(room) {
                return Err(GraphError::InvalidEdgeRoom {
                    edge: edge.id,
                    room,
                }
                .into());
            }
        }
        if edge.from == edge.to {
            return Err(GraphError::SelfLoop { edge: edge.id }.into());
        }
        if !edge.flow_m3_per_s.is_finite() || edge.flow_m3_per_s < 0.0 {
            return Err(GraphError::InvalidFlow {
                edge: edge.id,
                flow: edge.flow_m3_per_s,
            }
            .into());
        }
        if let Some(first) = seen.get(&(edge.from, edge.to)) {
            return Err(GraphError::DuplicateEdge {
                edge: edge.id,
                first: first.id,
            }
            .into());
        }
        seen.insert((edge.from, edge.to), edge.clone());
    }

    Ok(())
}

/// A room without surfaces has no radiant enclosure to assemble.
pub(crate) fn validate_rooms_have_surfaces(
    rooms: &[Room],
    room_surface_offsets: &[usize],
) -> HlResult<()> {
    for room in rooms {
        let idx = room.id.slot();
        if room_surface_offsets[idx + 1] == room_surface_offsets[idx] {
            return Err(GraphError::RoomWithoutSurfaces { room: room.id }.into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hl_core::Id;

    fn rooms(n: u32) -> Vec<Room> {
        (0..n)
            .map(|i| Room {
                id: Id::from_index(i),
                name: format!("R{i}"),
            })
            .collect()
    }

    #[test]
    fn validate_empty_topology() {
        assert!(validate_structure(&[], &[], &[]).is_ok());
    }

    #[test]
    fn validate_invalid_owner() {
        let surfaces = vec![Surface {
            id: Id::from_index(0),
            name: "S".into(),
            owner: Id::from_index(99),
            rear: RearSide::Outdoor,
        }];
        let result = validate_structure(&rooms(1), &surfaces, &[]);
        assert!(matches!(
            result.unwrap_err(),
            hl_core::HlError::Topology { .. }
        ));
    }

    #[test]
    fn validate_self_loop_and_negative_flow() {
        let loop_edge = VentEdge {
            id: Id::from_index(0),
            name: "loop".into(),
            from: Id::from_index(0),
            to: Id::from_index(0),
            flow_m3_per_s: 0.01,
        };
        assert!(validate_structure(&rooms(1), &[], &[loop_edge]).is_err());

        let negative = VentEdge {
            id: Id::from_index(0),
            name: "neg".into(),
            from: Id::from_index(0),
            to: Id::from_index(1),
            flow_m3_per_s: -0.01,
        };
        assert!(validate_structure(&rooms(2), &[], &[negative]).is_err());
    }

    #[test]
    fn validate_duplicate_edge() {
        let edge = |i: u32| VentEdge {
            id: Id::from_index(i),
            name: format!("E{i}"),
            from: Id::from_index(0),
            to: Id::from_index(1),
            flow_m3_per_s: 0.01,
        };
        let err = validate_structure(&rooms(2), &[], &[edge(0), edge(1)]).unwrap_err();
        assert!(format!("{err}").contains("duplicates"));
    }

    #[test]
    fn validate_self_facing_partition() {
        let surfaces = vec![Surface {
            id: Id::from_index(0),
            name: "P".into(),
            owner: Id::from_index(0),
            rear: RearSide::Room(Id::from_index(0)),
        }];
        assert!(validate_structure(&rooms(1), &surfaces, &[]).is_err());
    }
}
