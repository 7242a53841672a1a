//! Chunk storage

pub mod chunk_data;
pub mod chunk_operations;

pub use chunk_data::GeneratedChunk;
