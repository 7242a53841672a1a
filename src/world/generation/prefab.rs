//! Structure templates ("prefabs") overlaid onto generated terrain.
//!
//! Templates are immutable, name-addressed sets of relative block
//! placements loaded from the host's prefab JSON format. The bounding box
//! and the occupancy sets are computed once at load; block-name
//! resolution is deferred and memoized per placement because the block id
//! table may not be ready at load time.

use crate::config::{PlotConfig, PrefabSettings};
use crate::constants::persistence::PREFAB_EXTENSION;
use crate::world::core::{BlockId, BlockRegistry};
use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrefabError {
    #[error("failed to read prefab '{name}': {source}")]
    Io {
        name: String,
        source: std::io::Error,
    },

    #[error("failed to parse prefab '{name}': {source}")]
    Parse {
        name: String,
        source: serde_json::Error,
    },
}

/// On-disk prefab document. Version and anchor metadata are carried by
/// the format but unused here; placements are relative to the bounding
/// box minimum, not the anchor.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
struct PrefabFile {
    #[serde(default)]
    version: i32,
    #[serde(default)]
    block_id_version: i32,
    #[serde(default)]
    anchor_x: i32,
    #[serde(default)]
    anchor_y: i32,
    #[serde(default)]
    anchor_z: i32,
    #[serde(default)]
    blocks: Vec<RawPrefabBlock>,
}

#[derive(Debug, Deserialize)]
struct RawPrefabBlock {
    x: i32,
    y: i32,
    z: i32,
    name: String,
}

/// One block placement within a template.
#[derive(Debug)]
pub struct PrefabBlock {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    name: String,
    resolved: OnceLock<BlockId>,
}

impl PrefabBlock {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve this placement's block id, memoizing the first lookup.
    /// Unknown names resolve to `fallback`; generation never aborts on a
    /// missing asset.
    pub fn block_id(&self, registry: &BlockRegistry, fallback: BlockId) -> BlockId {
        *self
            .resolved
            .get_or_init(|| registry.resolve_or(&self.name, fallback))
    }
}

/// Axis-aligned bounding box over a template's placements, inclusive on
/// both ends. Empty templates have inverted sentinels and zero extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefabBounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl PrefabBounds {
    const EMPTY: PrefabBounds = PrefabBounds {
        min_x: i32::MAX,
        max_x: i32::MIN,
        min_y: i32::MAX,
        max_y: i32::MIN,
        min_z: i32::MAX,
        max_z: i32::MIN,
    };

    pub fn width_x(&self) -> i32 {
        if self.max_x < self.min_x {
            0
        } else {
            self.max_x - self.min_x + 1
        }
    }

    pub fn height_y(&self) -> i32 {
        if self.max_y < self.min_y {
            0
        } else {
            self.max_y - self.min_y + 1
        }
    }

    pub fn depth_z(&self) -> i32 {
        if self.max_z < self.min_z {
            0
        } else {
            self.max_z - self.min_z + 1
        }
    }
}

/// An immutable, name-addressed structure template.
pub struct PrefabTemplate {
    name: String,
    blocks: Vec<PrefabBlock>,
    bounds: PrefabBounds,
    occupancy: FxHashSet<(i32, i32, i32)>,
    columns: FxHashSet<(i32, i32)>,
}

impl PrefabTemplate {
    /// Build a template from raw placements, computing the bounding box
    /// and occupancy sets in one O(n) pass.
    pub fn new(name: &str, placements: Vec<(i32, i32, i32, String)>) -> Self {
        let mut bounds = PrefabBounds::EMPTY;
        let mut occupancy = FxHashSet::default();
        let mut columns = FxHashSet::default();
        let mut blocks = Vec::with_capacity(placements.len());

        for (x, y, z, block_name) in placements {
            bounds.min_x = bounds.min_x.min(x);
            bounds.max_x = bounds.max_x.max(x);
            bounds.min_y = bounds.min_y.min(y);
            bounds.max_y = bounds.max_y.max(y);
            bounds.min_z = bounds.min_z.min(z);
            bounds.max_z = bounds.max_z.max(z);
            occupancy.insert((x, y, z));
            columns.insert((x, z));
            blocks.push(PrefabBlock {
                x,
                y,
                z,
                name: block_name,
                resolved: OnceLock::new(),
            });
        }

        Self {
            name: name.to_string(),
            blocks,
            bounds,
            occupancy,
            columns,
        }
    }

    pub fn from_json_str(name: &str, json: &str) -> Result<Self, PrefabError> {
        let file: PrefabFile = serde_json::from_str(json).map_err(|source| PrefabError::Parse {
            name: name.to_string(),
            source,
        })?;
        Ok(Self::new(
            name,
            file.blocks
                .into_iter()
                .map(|b| (b.x, b.y, b.z, b.name))
                .collect(),
        ))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[PrefabBlock] {
        &self.blocks
    }

    pub fn bounds(&self) -> PrefabBounds {
        self.bounds
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// O(1) point membership in template-local coordinates.
    pub fn has_block_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.occupancy.contains(&(x, y, z))
    }

    /// O(1) column membership in template-local coordinates.
    pub fn has_column_at(&self, x: i32, z: i32) -> bool {
        self.columns.contains(&(x, z))
    }
}

/// Quarter-turn rotation about the vertical axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    None,
    /// 90 degrees clockwise viewed from above.
    Clockwise90,
}

impl Rotation {
    /// Map normalized template-local horizontal offsets (relative to the
    /// bounding-box minimum) into placement-local offsets. `depth` is the
    /// template's Z extent.
    pub fn apply(self, local_x: i32, local_z: i32, depth: i32) -> (i32, i32) {
        match self {
            Rotation::None => (local_x, local_z),
            Rotation::Clockwise90 => (depth - 1 - local_z, local_x),
        }
    }
}

/// The up-to-three templates the generator overlays per grid cell.
#[derive(Clone, Default)]
pub struct PrefabSet {
    pub plot: Option<Arc<PrefabTemplate>>,
    pub road: Option<Arc<PrefabTemplate>>,
    pub intersection: Option<Arc<PrefabTemplate>>,
}

impl PrefabSet {
    /// Resolve the configured template names through a manager. Empty
    /// names and missing files yield `None` slots.
    pub fn from_config(settings: &PrefabSettings, manager: &PrefabManager) -> Self {
        Self {
            plot: manager.get_or_load(&settings.plot),
            road: manager.get_or_load(&settings.road),
            intersection: manager.get_or_load(&settings.intersection),
        }
    }
}

/// Directory-backed, cached prefab loader.
pub struct PrefabManager {
    prefab_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<PrefabTemplate>>>,
}

impl PrefabManager {
    pub fn new(data_dir: &Path) -> Self {
        let prefab_dir = data_dir.join("prefabs");
        if let Err(e) = std::fs::create_dir_all(&prefab_dir) {
            log::error!(
                "[PrefabManager::new] failed to create prefab directory {}: {}",
                prefab_dir.display(),
                e
            );
        }
        Self {
            prefab_dir,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Fetch a template by name, loading and caching it on first use.
    ///
    /// Empty names and missing files are not errors; they log and yield
    /// `None` so generation proceeds without the overlay.
    pub fn get_or_load(&self, input_name: &str) -> Option<Arc<PrefabTemplate>> {
        if input_name.is_empty() {
            return None;
        }

        let file_name = if input_name.to_lowercase().ends_with(PREFAB_EXTENSION) {
            input_name.to_string()
        } else {
            format!("{}{}", input_name, PREFAB_EXTENSION)
        };

        if let Some(template) = self.cache.read().get(&file_name) {
            return Some(Arc::clone(template));
        }

        let path = self.prefab_dir.join(&file_name);
        if !path.exists() {
            log::warn!(
                "[PrefabManager::get_or_load] prefab file not found: {}",
                path.display()
            );
            return None;
        }

        match self.load_file(&file_name, &path) {
            Ok(template) => {
                log::info!(
                    "[PrefabManager::get_or_load] loaded prefab {} with {} blocks",
                    file_name,
                    template.blocks().len()
                );
                let template = Arc::new(template);
                self.cache
                    .write()
                    .insert(file_name, Arc::clone(&template));
                Some(template)
            }
            Err(e) => {
                log::error!("[PrefabManager::get_or_load] {}", e);
                None
            }
        }
    }

    fn load_file(&self, name: &str, path: &Path) -> Result<PrefabTemplate, PrefabError> {
        let json = std::fs::read_to_string(path).map_err(|source| PrefabError::Io {
            name: name.to_string(),
            source,
        })?;
        PrefabTemplate::from_json_str(name, &json)
    }
}

/// Convenience: resolve the full prefab set for a configuration rooted at
/// a data directory.
pub fn load_prefab_set(config: &PlotConfig, data_dir: &Path) -> PrefabSet {
    let manager = PrefabManager::new(data_dir);
    PrefabSet::from_config(&config.prefabs, &manager)
}
