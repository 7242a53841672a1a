//! Generated chunk operations - pure functions
//!
//! Take data, return results; no side effects beyond the chunk passed in.

use super::chunk_data::GeneratedChunk;
use crate::constants::core::{CHUNK_SIZE, WORLD_HEIGHT};
use crate::world::core::{BlockId, ChunkPos};

const FOOTPRINT: usize = (CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Create a new chunk filled with the empty block.
pub fn create_chunk(position: ChunkPos, index: u64) -> GeneratedChunk {
    GeneratedChunk {
        position,
        index,
        blocks: vec![BlockId::EMPTY; FOOTPRINT * WORLD_HEIGHT as usize],
        tints: vec![0; FOOTPRINT],
        environments: vec![0; FOOTPRINT],
    }
}

/// Flat buffer index for local coordinates.
pub fn block_index(x: i32, y: i32, z: i32) -> usize {
    ((y * CHUNK_SIZE + z) * CHUNK_SIZE + x) as usize
}

/// Check if local coordinates are within chunk bounds.
pub fn is_in_bounds(x: i32, y: i32, z: i32) -> bool {
    (0..CHUNK_SIZE).contains(&x) && (0..WORLD_HEIGHT).contains(&y) && (0..CHUNK_SIZE).contains(&z)
}

/// Set a block at local coordinates. Out-of-bounds writes are ignored.
pub fn set_block(chunk: &mut GeneratedChunk, x: i32, y: i32, z: i32, block: BlockId) {
    if is_in_bounds(x, y, z) {
        chunk.blocks[block_index(x, y, z)] = block;
    }
}

/// Get a block at local coordinates. Out of bounds reads as empty.
pub fn get_block(chunk: &GeneratedChunk, x: i32, y: i32, z: i32) -> BlockId {
    if is_in_bounds(x, y, z) {
        chunk.blocks[block_index(x, y, z)]
    } else {
        BlockId::EMPTY
    }
}

/// Set the ground tint for a column.
pub fn set_tint(chunk: &mut GeneratedChunk, x: i32, z: i32, tint: u32) {
    if (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_SIZE).contains(&z) {
        chunk.tints[(z * CHUNK_SIZE + x) as usize] = tint;
    }
}

/// Set the environment id for a column.
pub fn set_environment(chunk: &mut GeneratedChunk, x: i32, z: i32, environment: u16) {
    if (0..CHUNK_SIZE).contains(&x) && (0..CHUNK_SIZE).contains(&z) {
        chunk.environments[(z * CHUNK_SIZE + x) as usize] = environment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut chunk = create_chunk(ChunkPos::new(0, 0), 0);
        set_block(&mut chunk, 3, 64, 7, BlockId::new(5));
        assert_eq!(get_block(&chunk, 3, 64, 7), BlockId::new(5));
        assert_eq!(get_block(&chunk, 3, 63, 7), BlockId::EMPTY);
    }

    #[test]
    fn test_out_of_bounds_write_is_ignored() {
        let mut chunk = create_chunk(ChunkPos::new(0, 0), 0);
        let before = chunk.clone();
        set_block(&mut chunk, 32, 0, 0, BlockId::new(5));
        set_block(&mut chunk, 0, -1, 0, BlockId::new(5));
        set_block(&mut chunk, 0, WORLD_HEIGHT, 0, BlockId::new(5));
        assert_eq!(chunk, before);
    }

    #[test]
    fn test_column_attributes() {
        let mut chunk = create_chunk(ChunkPos::new(1, -1), 42);
        set_tint(&mut chunk, 31, 31, 0xFF00FF00);
        set_environment(&mut chunk, 0, 31, 7);
        assert_eq!(chunk.tints[(31 * CHUNK_SIZE + 31) as usize], 0xFF00FF00);
        assert_eq!(chunk.environments[(31 * CHUNK_SIZE) as usize], 7);
        assert_eq!(chunk.index, 42);
    }
}
