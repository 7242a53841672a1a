//! The claim store: single source of truth for plot ownership.

use super::core::GridCell;
use super::plot::Plot;
use crate::config::PlotConfig;
use crate::constants::claims::SPIRAL_MAX_CHECKS;
use crate::permissions::{limit_node, PermissionOracle, PERM_ADMIN};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// World-space target a host would teleport a player to for a plot:
/// centered in front of the plot on the road, facing into it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportAnchor {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Yaw in degrees; 180 faces south, into the plot.
    pub yaw: f32,
}

/// Manages all plots in the world.
///
/// The table is a concurrent map with per-key mutation; command handlers
/// on different workers call in concurrently. Claims on the same cell are
/// settled by the map's insert-if-absent semantics, exactly one wins.
/// The quota check is not atomic with the insert: two concurrent claims
/// by the same player on different cells can both observe the
/// pre-increment count and admit one plot over quota. Known, accepted
/// race; it only costs a single plot and only on claim, never on the
/// protection path.
pub struct PlotManager {
    plots: DashMap<GridCell, Plot>,
    config: Arc<PlotConfig>,
    permissions: Arc<dyn PermissionOracle>,
}

impl PlotManager {
    pub fn new(config: Arc<PlotConfig>, permissions: Arc<dyn PermissionOracle>) -> Self {
        Self {
            plots: DashMap::new(),
            config,
            permissions,
        }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Claim a cell for a player.
    ///
    /// Fails (no mutation) if the cell is already claimed or the player is
    /// at their quota.
    pub fn claim(&self, player: Uuid, owner_name: &str, cell: GridCell) -> bool {
        if self.plots.contains_key(&cell) {
            return false;
        }

        // Counted before the insert; see the type-level note on the race.
        let owned = self.count_owned(player);
        if owned >= self.max_plots_for(player) {
            log::debug!(
                "[PlotManager::claim] {} at quota ({} plots), rejecting {}",
                player,
                owned,
                cell
            );
            return false;
        }

        match self.plots.entry(cell) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Plot::new(cell, player, owner_name));
                log::info!("[PlotManager::claim] {} claimed {}", player, cell);
                true
            }
        }
    }

    /// Unclaim (delete) a plot. Returns whether a plot was removed.
    pub fn unclaim(&self, cell: GridCell) -> bool {
        let removed = self.plots.remove(&cell).is_some();
        if removed {
            log::info!("[PlotManager::unclaim] released {}", cell);
        }
        removed
    }

    /// Rename a plot. Returns false if the cell is unclaimed.
    pub fn rename(&self, cell: GridCell, name: &str) -> bool {
        match self.plots.get_mut(&cell) {
            Some(mut plot) => {
                plot.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Maximum number of plots a player may claim.
    ///
    /// Resolution order: the admin wildcard grants unlimited; otherwise
    /// the highest `plots.limit.N` node held, scanning from the
    /// configured ceiling down; otherwise the configured default. The
    /// scan is O(ceiling) and only runs on claim attempts.
    pub fn max_plots_for(&self, player: Uuid) -> usize {
        if self.permissions.has_permission(player, PERM_ADMIN) {
            return usize::MAX;
        }

        for tier in (1..=self.config.plots.max_plot_limit).rev() {
            if self.permissions.has_permission(player, &limit_node(tier)) {
                return tier as usize;
            }
        }

        self.config.plots.max_plots_default as usize
    }

    /// Plot at a grid cell, if claimed.
    pub fn plot(&self, cell: GridCell) -> Option<Plot> {
        self.plots.get(&cell).map(|p| p.clone())
    }

    /// Plot covering a world column, if the column is inside a claimed
    /// plot in the plot world. Road columns and other worlds yield None.
    pub fn plot_at(&self, world_name: &str, world_x: i32, world_z: i32) -> Option<Plot> {
        if world_name != self.config.plot_world_name() {
            return None;
        }
        let geometry = self.config.geometry();
        if !geometry.is_inside_plot(world_x, world_z) {
            return None;
        }
        self.plot(geometry.cell_of(world_x, world_z))
    }

    /// Whether a player may modify a block at the given position.
    ///
    /// Admins bypass everything. Roads are never modifiable by
    /// non-admins; that is deliberate policy, not an oversight.
    pub fn can_modify(
        &self,
        player: Uuid,
        world_name: &str,
        world_x: i32,
        _world_y: i32,
        world_z: i32,
    ) -> bool {
        if self.permissions.has_permission(player, PERM_ADMIN) {
            return true;
        }
        match self.plot_at(world_name, world_x, world_z) {
            Some(plot) => plot.has_permission(player),
            None => false,
        }
    }

    /// Apply a mutation to a claimed plot under the per-key lock.
    ///
    /// Used for trust changes and administrative owner updates; returns
    /// false if the cell is unclaimed.
    pub fn update_plot<F: FnOnce(&mut Plot)>(&self, cell: GridCell, mutate: F) -> bool {
        match self.plots.get_mut(&cell) {
            Some(mut plot) => {
                mutate(&mut plot);
                true
            }
            None => false,
        }
    }

    /// All plots owned by a player.
    pub fn player_plots(&self, player: Uuid) -> Vec<Plot> {
        self.plots
            .iter()
            .filter(|entry| entry.value().owner == player)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn count_owned(&self, player: Uuid) -> usize {
        self.plots
            .iter()
            .filter(|entry| entry.value().owner == player)
            .count()
    }

    /// Total number of claimed plots.
    pub fn plot_count(&self) -> usize {
        self.plots.len()
    }

    /// Nearest unclaimed cell to the origin, by deterministic outward
    /// spiral. Bounded at `SPIRAL_MAX_CHECKS` visits; None past that.
    ///
    /// Reads a live view: a concurrent claim can take the returned cell
    /// before the caller does. `claim`'s insert-if-absent makes the loser
    /// observe false, and it can simply re-search.
    pub fn find_next_free_plot(&self) -> Option<GridCell> {
        let (mut x, mut z) = (0i32, 0i32);
        let (mut dx, mut dz) = (0i32, -1i32);

        for _ in 0..SPIRAL_MAX_CHECKS {
            let cell = GridCell::new(x, z);
            if !self.plots.contains_key(&cell) {
                return Some(cell);
            }

            // Square spiral: turn on the diagonal and at the two
            // off-by-one corners of each ring.
            if x == z || (x < 0 && x == -z) || (x > 0 && x == 1 - z) {
                let temp = dx;
                dx = -dz;
                dz = temp;
            }
            x += dx;
            z += dz;
        }

        log::warn!(
            "[PlotManager::find_next_free_plot] no free plot within {} cells",
            SPIRAL_MAX_CHECKS
        );
        None
    }

    /// Replace the entire table with loaded records. Called once at
    /// startup by the persistence layer.
    pub fn load_plots(&self, loaded: HashMap<GridCell, Plot>) {
        self.plots.clear();
        let count = loaded.len();
        for (cell, plot) in loaded {
            self.plots.insert(cell, plot);
        }
        log::info!("[PlotManager::load_plots] loaded {} plots", count);
    }

    /// Defensive copy of the table for persistence. The live map is
    /// never exposed.
    pub fn snapshot(&self) -> HashMap<GridCell, Plot> {
        self.plots
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }

    /// Teleport target for a plot: centered along X, two blocks onto the
    /// road north of the plot, facing south into it.
    pub fn teleport_anchor(&self, plot: &Plot) -> TeleportAnchor {
        let geometry = self.config.geometry();
        let world_x = plot.min_x(&geometry) + geometry.x.plot_size() / 2;
        let world_z = plot.min_z(&geometry) - 2;
        TeleportAnchor {
            x: world_x as f64 + 0.5,
            y: crate::constants::core::GROUND_HEIGHT as f64 + 2.5,
            z: world_z as f64 + 0.5,
            yaw: 180.0,
        }
    }
}
