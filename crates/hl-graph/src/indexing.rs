//! Name-to-id lookup for resolving textual references in input files.
//!
//! Input documents refer to rooms and boundaries by string ids; the solver
//! works on compact contiguous ids. `NameIndex` gives O(1) lookup both ways.

use std::collections::HashMap;

use hl_core::{BoundaryId, HlResult, RoomId};

use crate::error::GraphError;
use crate::topology::Topology;

#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    room_by_name: HashMap<String, RoomId>,
    surface_by_name: HashMap<String, BoundaryId>,
    room_names: Vec<String>,
    surface_names: Vec<String>,
}

impl NameIndex {
    /// Build an index from a topology, rejecting duplicate names.
    pub fn from_topology(topo: &Topology) -> HlResult<Self> {
        let mut index = Self::default();
        for room in topo.rooms() {
            if index
                .room_by_name
                .insert(room.name.clone(), room.id)
                .is_some()
            {
                return Err(GraphError::DuplicateName {
                    what: "room",
                    name: room.name.clone(),
                }
                .into());
            }
            index.room_names.push(room.name.clone());
        }
        for surface in topo.surfaces() {
            if index
                .surface_by_name
                .insert(surface.name.clone(), surface.id)
                .is_some()
            {
                return Err(GraphError::DuplicateName {
                    what: "surface",
                    name: surface.name.clone(),
                }
                .into());
            }
            index.surface_names.push(surface.name.clone());
        }
        Ok(index)
    }

    pub fn room_count(&self) -> usize {
        self.room_names.len()
    }

    pub fn surface_count(&self) -> usize {
        self.surface_names.len()
    }

    /// Resolve a room name.
    pub fn room(&self, name: &str) -> HlResult<RoomId> {
        self.room_by_name.get(name).copied().ok_or_else(|| {
            GraphError::NameNotFound {
                what: "room",
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Resolve a surface name.
    pub fn surface(&self, name: &str) -> HlResult<BoundaryId> {
        self.surface_by_name.get(name).copied().ok_or_else(|| {
            GraphError::NameNotFound {
                what: "surface",
                name: name.to_string(),
            }
            .into()
        })
    }

    /// Name of a room (panics if out of bounds).
    pub fn room_name(&self, id: RoomId) -> &str {
        &self.room_names[id.slot()]
    }

    /// Name of a surface (panics if out of bounds).
    pub fn surface_name(&self, id: BoundaryId) -> &str {
        &self.surface_names[id.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TopologyBuilder;
    use crate::topology::RearSide;

    #[test]
    fn name_index_round_trip() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("living");
        let r2 = builder.add_room("bed");
        let s1 = builder.add_surface("living-n", r1, RearSide::Outdoor);
        builder.add_surface("bed-n", r2, RearSide::Outdoor);
        let topo = builder.build().unwrap();

        let index = NameIndex::from_topology(&topo).unwrap();
        assert_eq!(index.room_count(), 2);
        assert_eq!(index.surface_count(), 2);
        assert_eq!(index.room("living").unwrap(), r1);
        assert_eq!(index.room_name(r2), "bed");
        assert_eq!(index.surface("living-n").unwrap(), s1);
    }

    #[test]
    fn name_index_unknown_name() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("only");
        builder.add_surface("w", r1, RearSide::Outdoor);
        let topo = builder.build().unwrap();
        let index = NameIndex::from_topology(&topo).unwrap();
        assert!(index.room("missing").is_err());
    }

    #[test]
    fn name_index_duplicate_room() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("same");
        let r2 = builder.add_room("same");
        builder.add_surface("a", r1, RearSide::Outdoor);
        builder.add_surface("b", r2, RearSide::Outdoor);
        let topo = builder.build().unwrap();
        assert!(NameIndex::from_topology(&topo).is_err());
    }
}
