//! World generation

pub mod generator;
pub mod prefab;

use crate::world::storage::GeneratedChunk;
use rayon::prelude::*;

pub use generator::{classify_column, ColumnKind, MaterialIds, PlotWorldGenerator, DEFAULT_TINT};
pub use prefab::{
    load_prefab_set, PrefabBlock, PrefabBounds, PrefabError, PrefabManager, PrefabSet,
    PrefabTemplate, Rotation,
};

/// A suggested player spawn position in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// The seam between terrain generators and the host scheduler.
///
/// `generate` returns `None` when `still_needed(index)` reports the
/// request was abandoned; everything else about a chunk is a pure
/// function of the seed and coordinates.
pub trait WorldGenerator: Send + Sync {
    fn generate(
        &self,
        seed: u32,
        index: u64,
        chunk_x: i32,
        chunk_z: i32,
        still_needed: &(dyn Fn(u64) -> bool + Sync),
    ) -> Option<GeneratedChunk>;

    fn spawn_points(&self, seed: u32) -> Vec<SpawnPoint>;
}

/// Generate a batch of chunks in parallel. Cancelled chunks are dropped
/// from the result; order follows the request order.
pub fn generate_batch(
    generator: &dyn WorldGenerator,
    seed: u32,
    requests: &[(u64, i32, i32)],
    still_needed: &(dyn Fn(u64) -> bool + Sync),
) -> Vec<GeneratedChunk> {
    requests
        .par_iter()
        .filter_map(|&(index, cx, cz)| generator.generate(seed, index, cx, cz, still_needed))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use crate::world::core::BlockRegistry;
    use std::sync::Arc;

    #[test]
    fn test_batch_skips_cancelled_requests() {
        let config = PlotConfig::default();
        let generator =
            PlotWorldGenerator::new(&config, Arc::new(BlockRegistry::new()), PrefabSet::default());

        let requests = vec![(0u64, 0, 0), (1, 1, 0), (2, 0, 1)];
        let chunks = generate_batch(&generator, 0, &requests, &|index| index != 1);

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.index != 1));
    }
}
