//! The plot world: grid geometry, claims, and terrain generation.
//!
//! Layout follows data-oriented lines: `storage` holds pure chunk data
//! with free-function operations, `generation` turns coordinates into
//! chunks, `claims` owns the live ownership table, and `core` carries the
//! shared primitive types.

pub mod claims;
pub mod core;
pub mod generation;
pub mod grid;
pub mod plot;
pub mod storage;

pub use claims::{PlotManager, TeleportAnchor};
pub use self::core::{BlockId, BlockRegistry, ChunkPos, GridCell};
pub use generation::{PlotWorldGenerator, SpawnPoint, WorldGenerator};
pub use grid::{AxisGeometry, GridGeometry};
pub use plot::Plot;
pub use storage::GeneratedChunk;
