//! Generated chunk data - pure data
//!
//! No methods; all transformations live in chunk_operations.rs.

use crate::world::core::{BlockId, ChunkPos};

/// One fully generated chunk column: a `CHUNK_SIZE x CHUNK_SIZE`
/// footprint at full world height, plus per-column tint and environment.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedChunk {
    pub position: ChunkPos,
    /// Generation request index, echoed back to the host scheduler.
    pub index: u64,
    /// Flat block buffer, indexed `(y * CHUNK_SIZE + z) * CHUNK_SIZE + x`.
    pub blocks: Vec<BlockId>,
    /// Ground tint per column, indexed `z * CHUNK_SIZE + x`.
    pub tints: Vec<u32>,
    /// Environment/biome id per column, indexed `z * CHUNK_SIZE + x`.
    pub environments: Vec<u16>,
}
