//! Core topology data structures.

use hl_core::{BoundaryId, EdgeId, RoomId};

/// What lies behind a surface, as far as topology is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RearSide {
    /// Outdoor air, directly or through a temperature-difference coefficient.
    Outdoor,
    /// Soil below a ground-contact slab.
    Ground,
    /// Another room of the same building.
    Room(RoomId),
}

/// A room: one well-mixed air node with its own furniture and HVAC.
///
/// Rooms are minimal here: an ID and a name. Thermal data lives in the
/// solver's assembled network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

/// A room-facing surface (wall, floor, ceiling, window).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Surface {
    pub id: BoundaryId,
    pub name: String,
    /// Room the surface faces.
    pub owner: RoomId,
    pub rear: RearSide,
}

/// Fixed-volume air transfer from one room into another.
#[derive(Debug, Clone, PartialEq)]
pub struct VentEdge {
    pub id: EdgeId,
    pub name: String,
    /// Upstream room, the air source.
    pub from: RoomId,
    /// Downstream room, the air receiver.
    pub to: RoomId,
    /// Volume flow in m³/s.
    pub flow_m3_per_s: f64,
}

/// The topology: a validated, immutable collection of rooms, surfaces and
/// ventilation edges.
///
/// Stores compact adjacency: for each room, which surfaces it owns and which
/// edges carry air into it.
#[derive(Debug, Clone)]
pub struct Topology {
    pub(crate) rooms: Vec<Room>,
    pub(crate) surfaces: Vec<Surface>,
    pub(crate) edges: Vec<VentEdge>,

    /// Room i's surfaces are in room_surfaces[room_surface_offsets[i]..room_surface_offsets[i+1]].
    pub(crate) room_surface_offsets: Vec<usize>,
    pub(crate) room_surfaces: Vec<BoundaryId>,

    /// Room i's inflow edges are in room_inflows[room_inflow_offsets[i]..room_inflow_offsets[i+1]].
    pub(crate) room_inflow_offsets: Vec<usize>,
    pub(crate) room_inflows: Vec<EdgeId>,
}

impl Topology {
    /// Return all rooms.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Return all surfaces.
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Return all ventilation edges.
    pub fn edges(&self) -> &[VentEdge] {
        &self.edges
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.slot())
    }

    pub fn surface(&self, id: BoundaryId) -> Option<&Surface> {
        self.surfaces.get(id.slot())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&VentEdge> {
        self.edges.get(id.slot())
    }

    /// Surfaces owned by a room, in insertion order.
    pub fn room_surfaces(&self, room: RoomId) -> &[BoundaryId] {
        let idx = room.slot();
        if idx >= self.rooms.len() {
            return &[];
        }
        &self.room_surfaces[self.room_surface_offsets[idx]..self.room_surface_offsets[idx + 1]]
    }

    /// Ventilation edges whose downstream room is `room`.
    pub fn inflows(&self, room: RoomId) -> &[EdgeId] {
        let idx = room.slot();
        if idx >= self.rooms.len() {
            return &[];
        }
        &self.room_inflows[self.room_inflow_offsets[idx]..self.room_inflow_offsets[idx + 1]]
    }

    /// Position of a surface within its owner's surface list.
    pub fn local_index(&self, surface: BoundaryId) -> Option<usize> {
        let owner = self.surface(surface)?.owner;
        self.room_surfaces(owner).iter().position(|&s| s == surface)
    }
}
