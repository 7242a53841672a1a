//! Plot world core: an infinite grid of claimable plots separated by
//! roads, with deterministic terrain generation and JSON persistence.
//!
//! The crate is host-agnostic. The embedding server supplies a
//! [`PermissionOracle`] and a block registry, drives the
//! [`WorldGenerator`] from its chunk scheduler, and calls into
//! [`PlotsCore`] for claims and saves. Nothing in here is a global;
//! every collaborator is passed in explicitly.

pub mod config;
pub mod constants;
pub mod permissions;
pub mod persistence;
pub mod world;

pub use config::PlotConfig;
pub use permissions::{DenyAll, PermissionOracle};
pub use persistence::{PersistenceError, PersistenceResult};
pub use world::claims::{PlotManager, TeleportAnchor};
pub use world::core::{BlockId, BlockRegistry, ChunkPos, GridCell};
pub use world::generation::{
    PlotWorldGenerator, PrefabManager, PrefabSet, SpawnPoint, WorldGenerator,
};
pub use world::grid::{AxisGeometry, GridGeometry};
pub use world::plot::Plot;
pub use world::storage::GeneratedChunk;

use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a host needs to run a plot world, wired together once at
/// startup and handed around by reference.
pub struct PlotsCore {
    config: Arc<PlotConfig>,
    registry: Arc<BlockRegistry>,
    plots: PlotManager,
    prefabs: PrefabManager,
    data_dir: PathBuf,
}

impl PlotsCore {
    /// Validate the configuration, load persisted claims, and wire the
    /// claim manager. Fails on invalid configuration or an unreadable
    /// plots file; a missing plots file is a fresh world.
    pub fn new(
        config: PlotConfig,
        registry: Arc<BlockRegistry>,
        permissions: Arc<dyn PermissionOracle>,
        data_dir: &Path,
    ) -> anyhow::Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let plots = PlotManager::new(Arc::clone(&config), permissions);
        plots.load_plots(persistence::load_plots(&persistence::plots_path(
            data_dir,
        ))?);

        let prefabs = PrefabManager::new(data_dir);

        log::info!(
            "[PlotsCore::new] plot world '{}' ready with {} plots",
            config.plot_world_name(),
            plots.plot_count()
        );

        Ok(Self {
            config,
            registry,
            plots,
            prefabs,
            data_dir: data_dir.to_path_buf(),
        })
    }

    pub fn config(&self) -> &Arc<PlotConfig> {
        &self.config
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn plots(&self) -> &PlotManager {
        &self.plots
    }

    pub fn prefabs(&self) -> &PrefabManager {
        &self.prefabs
    }

    /// Build a generator for the host's chunk scheduler. Prefab lookups
    /// go through the shared cache, so repeated calls are cheap.
    pub fn generator(&self) -> PlotWorldGenerator {
        let prefab_set = PrefabSet::from_config(&self.config.prefabs, &self.prefabs);
        PlotWorldGenerator::new(&self.config, Arc::clone(&self.registry), prefab_set)
    }

    /// Persist the current claim table.
    pub fn save(&self) -> PersistenceResult<()> {
        persistence::save_plots(
            &persistence::plots_path(&self.data_dir),
            &self.plots.snapshot(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn core(dir: &Path) -> PlotsCore {
        PlotsCore::new(
            PlotConfig::default(),
            Arc::new(BlockRegistry::new()),
            Arc::new(DenyAll),
            dir,
        )
        .expect("core")
    }

    #[test]
    fn test_save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let owner = Uuid::new_v4();

        let first = core(dir.path());
        assert!(first.plots().claim(owner, "alex", GridCell::new(2, -3)));
        first.save().expect("save");

        let second = core(dir.path());
        assert_eq!(second.plots().plot_count(), 1);
        let plot = second.plots().plot(GridCell::new(2, -3)).expect("plot");
        assert_eq!(plot.owner, owner);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut config = PlotConfig::default();
        config.world.plot_world_name = String::new();
        assert!(PlotsCore::new(
            config,
            Arc::new(BlockRegistry::new()),
            Arc::new(DenyAll),
            dir.path(),
        )
        .is_err());
    }

    #[test]
    fn test_generator_from_core_is_deterministic() {
        let dir = tempfile::tempdir().expect("tempdir");
        let core = core(dir.path());
        let gen_a = core.generator();
        let gen_b = core.generator();
        let a = gen_a.generate(0, 0, 2, -1, &|_| true);
        let b = gen_b.generate(0, 0, 2, -1, &|_| true);
        assert_eq!(a, b);
    }
}
