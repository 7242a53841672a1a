//! Core world data types
//!
//! Fundamental types shared by the grid model, the claim store and the
//! chunk generator.

mod block;
mod position;
mod registry;

pub use block::BlockId;
pub use position::{ChunkPos, GridCell};
pub use registry::{normalize_block_name, BlockRegistration, BlockRegistry};
