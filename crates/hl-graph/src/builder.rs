//! Incremental topology builder.

use hl_core::{BoundaryId, EdgeId, HlResult, RoomId};

use crate::topology::{RearSide, Room, Surface, Topology, VentEdge};
use crate::validate;

/// Builder for constructing a topology incrementally.
///
/// Use `add_room`, `add_surface` and `add_ventilation` to build up the
/// building, then call `build()` to validate and freeze it.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    rooms: Vec<Room>,
    surfaces: Vec<Surface>,
    edges: Vec<VentEdge>,
}

impl TopologyBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a room and return its ID.
    pub fn add_room(&mut self, name: impl Into<String>) -> RoomId {
        let id = RoomId::from_index(self.rooms.len() as u32);
        self.rooms.push(Room {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a surface facing `owner` and return its ID.
    pub fn add_surface(
        &mut self,
        name: impl Into<String>,
        owner: RoomId,
        rear: RearSide,
    ) -> BoundaryId {
        let id = BoundaryId::from_index(self.surfaces.len() as u32);
        self.surfaces.push(Surface {
            id,
            name: name.into(),
            owner,
            rear,
        });
        id
    }

    /// Add an air transfer of `flow_m3_per_s` from `from` into `to`.
    pub fn add_ventilation(
        &mut self,
        name: impl Into<String>,
        from: RoomId,
        to: RoomId,
        flow_m3_per_s: f64,
    ) -> EdgeId {
        let id = EdgeId::from_index(self.edges.len() as u32);
        self.edges.push(VentEdge {
            id,
            name: name.into(),
            from,
            to,
            flow_m3_per_s,
        });
        id
    }

    /// Build and validate the topology.
    pub fn build(self) -> HlResult<Topology> {
        validate::validate_structure(&self.rooms, &self.surfaces, &self.edges)?;

        let (room_surface_offsets, room_surfaces) =
            Self::group_by_room(self.rooms.len(), self.surfaces.iter().map(|s| (s.owner, s.id)));
        let (room_inflow_offsets, room_inflows) =
            Self::group_by_room(self.rooms.len(), self.edges.iter().map(|e| (e.to, e.id)));

        validate::validate_rooms_have_surfaces(&self.rooms, &room_surface_offsets)?;

        Ok(Topology {
            rooms: self.rooms,
            surfaces: self.surfaces,
            edges: self.edges,
            room_surface_offsets,
            room_surfaces,
            room_inflow_offsets,
            room_inflows,
        })
    }

    /// Build compact adjacency lists keyed by room, preserving insertion order.
    fn group_by_room<T: Copy>(
        room_count: usize,
        items: impl Iterator<Item = (RoomId, T)>,
    ) -> (Vec<usize>, Vec<T>) {
        let mut buckets: Vec<Vec<T>> = vec![Vec::new(); room_count];
        for (room, item) in items {
            buckets[room.slot()].push(item);
        }

        let mut offsets = Vec::with_capacity(room_count + 1);
        let mut flat = Vec::new();
        offsets.push(0);
        for bucket in buckets {
            flat.extend(bucket);
            offsets.push(flat.len());
        }
        (offsets, flat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_basic() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("R1");
        let r2 = builder.add_room("R2");
        let s1 = builder.add_surface("S1", r1, RearSide::Outdoor);
        let e1 = builder.add_ventilation("E1", r1, r2, 0.01);

        assert_eq!(r1.index(), 0);
        assert_eq!(r2.index(), 1);
        assert_eq!(s1.index(), 0);
        assert_eq!(e1.index(), 0);
        assert_eq!(builder.rooms.len(), 2);
        assert_eq!(builder.surfaces.len(), 1);
        assert_eq!(builder.edges.len(), 1);
    }

    #[test]
    fn builder_groups_surfaces_by_owner() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("R1");
        let r2 = builder.add_room("R2");
        let a = builder.add_surface("A", r2, RearSide::Outdoor);
        let b = builder.add_surface("B", r1, RearSide::Ground);
        let c = builder.add_surface("C", r2, RearSide::Room(r1));

        let topo = builder.build().unwrap();
        assert_eq!(topo.room_surfaces(r1), &[b]);
        assert_eq!(topo.room_surfaces(r2), &[a, c]);
        assert_eq!(topo.local_index(c), Some(1));
    }

    #[test]
    fn builder_rejects_room_without_surfaces() {
        let mut builder = TopologyBuilder::new();
        let r1 = builder.add_room("R1");
        builder.add_room("Empty");
        builder.add_surface("S", r1, RearSide::Outdoor);
        let err = builder.build().unwrap_err();
        assert!(format!("{err}").contains("owns no surfaces"));
    }
}
