//! Ownership

/// Ownership of a cell in a partitioned mesh
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ownership {
    /// Owned by the local partition
    Owned,
    /// Ghost on the local partition. The value is the partition that owns it
    Ghost(usize),
}

impl Ownership {
    /// Is this a ghost?
    pub fn is_ghost(&self) -> bool {
        matches!(self, Ownership::Ghost(_))
    }
}
