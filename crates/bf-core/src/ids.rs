use core::fmt;
use core::num::NonZeroU32;

/// Arena index for objects of a built network.
///
/// Labels and segment ids are user-facing strings; a run works on dense
/// integer handles instead so adjacency lists stay small and comparisons cheap.
/// The `NonZero` backing keeps `Option<Id>` the same size as `Id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based arena position (stored as position+1).
    pub fn from_index(index: usize) -> Self {
        let index = u32::try_from(index).unwrap_or(u32::MAX - 1);
        Self(NonZeroU32::MIN.saturating_add(index))
    }

    /// Recover the 0-based arena position.
    pub fn index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Position of a node label inside a built network.
pub type NodeIdx = Id;
/// Position of a segment inside the segment arena.
pub type SegmentIdx = Id;
