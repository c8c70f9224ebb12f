use core::fmt;
use core::num::NonZeroU32;

/// Dense handle of a room, boundary or ventilation edge.
///
/// Handles are issued in insertion order by the topology builder, so the
/// 0-based `slot` indexes every per-entity array of the model directly.
/// Stored offset by one so `Option<Id>` costs nothing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Handle for a position in a dense array.
    pub fn from_slot(slot: usize) -> Self {
        Self::from_index(slot as u32)
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    pub fn slot(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

pub type RoomId = Id;
pub type BoundaryId = Id;
pub type EdgeId = Id;
