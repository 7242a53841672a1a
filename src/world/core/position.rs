//! Positions in chunk space and in the plot grid.

use crate::constants::core::CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a generated chunk column, in chunk coordinates.
///
/// A chunk covers a `CHUNK_SIZE x CHUNK_SIZE` column footprint at full
/// world height, so only the horizontal axes are addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Minimum world X coordinate covered by this chunk (inclusive).
    pub const fn min_world_x(self) -> i32 {
        self.x * CHUNK_SIZE
    }

    /// Minimum world Z coordinate covered by this chunk (inclusive).
    pub const fn min_world_z(self) -> i32 {
        self.z * CHUNK_SIZE
    }

    /// Maximum world X coordinate covered by this chunk (inclusive).
    pub const fn max_world_x(self) -> i32 {
        self.min_world_x() + CHUNK_SIZE - 1
    }

    /// Maximum world Z coordinate covered by this chunk (inclusive).
    pub const fn max_world_z(self) -> i32 {
        self.min_world_z() + CHUNK_SIZE - 1
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// One addressable slot in the claim grid.
///
/// Cells are unbounded signed indices; a cell maps to world space through
/// [`GridGeometry`](crate::world::grid::GridGeometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub z: i32,
}

impl GridCell {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}
