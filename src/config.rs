//! Startup configuration for the plot world.
//!
//! One configuration object feeds both the claim store and the chunk
//! generator; neither mutates it. Loadable from TOML, with a one-time
//! migration step for the legacy single-value size fields.

use crate::world::grid::{AxisGeometry, GridGeometry};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    pub auto_save_interval_seconds: u32,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            auto_save_interval_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Name of the one world that carries the plot grid.
    pub plot_world_name: String,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            plot_world_name: "plotworld".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    pub plot_size_x: i32,
    pub plot_size_z: i32,
    pub road_size_x: i32,
    pub road_size_z: i32,
    /// Quota for players without any `plots.limit.N` grant.
    pub max_plots_default: u32,
    /// Highest `plots.limit.N` tier the quota scan considers.
    pub max_plot_limit: u32,
    /// Legacy uniform plot size; folded into both axes by
    /// [`PlotConfig::migrate_legacy`], then cleared.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_size: Option<i32>,
    /// Legacy uniform road size, handled like `plot_size`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road_size: Option<i32>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            plot_size_x: 32,
            plot_size_z: 32,
            road_size_x: 4,
            road_size_z: 4,
            max_plots_default: 1,
            max_plot_limit: 50,
            plot_size: None,
            road_size: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSettings {
    pub bedrock: String,
    pub plot_surface: String,
    pub plot_sub_surface: String,
    pub road_surface: String,
    pub border: String,
    pub filling: String,
}

impl Default for BlockSettings {
    fn default() -> Self {
        Self {
            bedrock: "Rock_Bedrock".to_string(),
            plot_surface: "Soil_Grass".to_string(),
            plot_sub_surface: "Soil_Dirt".to_string(),
            road_surface: "Rock_Stone_Cobble".to_string(),
            border: "Rock_calcite_brick_smooth_half".to_string(),
            filling: "Rock_Stone".to_string(),
        }
    }
}

/// Optional structure templates overlaid onto generated terrain. Empty
/// names mean "no template".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefabSettings {
    pub road: String,
    pub plot: String,
    pub intersection: String,
}

/// Complete plot system configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub general: GeneralSettings,
    pub world: WorldSettings,
    pub plots: PlotSettings,
    pub blocks: BlockSettings,
    pub prefabs: PrefabSettings,
}

impl PlotConfig {
    /// Parse a TOML document, apply the legacy migration and validate.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let mut config: PlotConfig = toml::from_str(input)?;
        config.migrate_legacy();
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&input)?;
        log::info!(
            "[PlotConfig::load] loaded configuration from {}",
            path.display()
        );
        Ok(config)
    }

    /// Fold the legacy single-value `plot_size`/`road_size` fields into
    /// the per-axis fields, once, then drop them. A legacy value only
    /// wins where the per-axis field was left at its default, so explicit
    /// per-axis settings always take precedence.
    pub fn migrate_legacy(&mut self) {
        let defaults = PlotSettings::default();

        if let Some(size) = self.plots.plot_size.take() {
            if self.plots.plot_size_x == defaults.plot_size_x {
                self.plots.plot_size_x = size;
            }
            if self.plots.plot_size_z == defaults.plot_size_z {
                self.plots.plot_size_z = size;
            }
            log::info!(
                "[PlotConfig::migrate_legacy] folded legacy plot_size={} into per-axis fields",
                size
            );
        }
        if let Some(size) = self.plots.road_size.take() {
            if self.plots.road_size_x == defaults.road_size_x {
                self.plots.road_size_x = size;
            }
            if self.plots.road_size_z == defaults.road_size_z {
                self.plots.road_size_z = size;
            }
            log::info!(
                "[PlotConfig::migrate_legacy] folded legacy road_size={} into per-axis fields",
                size
            );
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<()> {
        if self.world.plot_world_name.is_empty() {
            return Err(anyhow::anyhow!("PlotConfig: plot_world_name cannot be empty"));
        }
        if self.plots.max_plot_limit == 0 {
            return Err(anyhow::anyhow!("PlotConfig: max_plot_limit cannot be 0"));
        }
        if self.plots.plot_size_x <= 0 || self.plots.plot_size_z <= 0 {
            log::warn!(
                "[PlotConfig::validate] non-positive plot size ({}, {}), will be clamped to 1",
                self.plots.plot_size_x,
                self.plots.plot_size_z
            );
        }
        if self.plots.road_size_x < 0 || self.plots.road_size_z < 0 {
            log::warn!(
                "[PlotConfig::validate] negative road size ({}, {}), will be clamped to 0",
                self.plots.road_size_x,
                self.plots.road_size_z
            );
        }
        Ok(())
    }

    /// Clamped grid geometry derived from the size settings.
    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(
            AxisGeometry::new(self.plots.plot_size_x, self.plots.road_size_x),
            AxisGeometry::new(self.plots.plot_size_z, self.plots.road_size_z),
        )
    }

    pub fn plot_world_name(&self) -> &str {
        &self.world.plot_world_name
    }
}
