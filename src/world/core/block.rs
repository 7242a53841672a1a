use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a block type.
///
/// Ids are assigned by the [`BlockRegistry`](super::BlockRegistry) at
/// startup; id 0 is always the empty (air) block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

// Safe because BlockId is just a u16
unsafe impl bytemuck::Pod for BlockId {}
unsafe impl bytemuck::Zeroable for BlockId {}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::EMPTY
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            BlockId::EMPTY => write!(f, "Empty"),
            _ => write!(f, "Block({})", self.0),
        }
    }
}

impl BlockId {
    /// The empty (air) block. Every registry resolves `"Empty"` to this id.
    pub const EMPTY: BlockId = BlockId(0);

    /// Create a new BlockId from a raw u16 value
    pub const fn new(id: u16) -> Self {
        BlockId(id)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}
