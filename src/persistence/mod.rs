//! Plot persistence
//!
//! Claims are stored in a single JSON document mapping `"gridX,gridZ"`
//! keys to plot records. Saves go through a temp file and an atomic
//! rename so a crash mid-write never truncates the live file.

use crate::constants::persistence::PLOTS_FILE;
use crate::world::core::GridCell;
use crate::world::plot::Plot;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Format a grid cell as a plots-file key.
pub fn cell_key(cell: GridCell) -> String {
    format!("{},{}", cell.x, cell.z)
}

/// Parse a plots-file key back into a grid cell.
pub fn parse_cell_key(key: &str) -> Option<GridCell> {
    let (x, z) = key.split_once(',')?;
    Some(GridCell::new(
        x.trim().parse().ok()?,
        z.trim().parse().ok()?,
    ))
}

/// Path of the plots file under a data directory.
pub fn plots_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PLOTS_FILE)
}

/// Load all claims from a plots file.
///
/// A missing file is an empty world, not an error. Entries with
/// malformed keys are skipped with a warning rather than poisoning the
/// whole load.
pub fn load_plots(path: &Path) -> PersistenceResult<HashMap<GridCell, Plot>> {
    if !path.exists() {
        log::info!(
            "[persistence::load_plots] no plots file at {}, starting empty",
            path.display()
        );
        return Ok(HashMap::new());
    }

    let json = fs::read_to_string(path)?;
    let raw: HashMap<String, Plot> = serde_json::from_str(&json)?;

    let mut plots = HashMap::with_capacity(raw.len());
    for (key, plot) in raw {
        match parse_cell_key(&key) {
            Some(cell) => {
                plots.insert(cell, plot);
            }
            None => {
                log::warn!(
                    "[persistence::load_plots] skipping malformed plot key '{}'",
                    key
                );
            }
        }
    }

    log::info!(
        "[persistence::load_plots] loaded {} plots from {}",
        plots.len(),
        path.display()
    );
    Ok(plots)
}

/// Save all claims to a plots file, atomically.
pub fn save_plots(path: &Path, plots: &HashMap<GridCell, Plot>) -> PersistenceResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // BTreeMap keeps the file diff-stable across saves
    let keyed: BTreeMap<String, &Plot> = plots
        .iter()
        .map(|(cell, plot)| (cell_key(*cell), plot))
        .collect();
    let json = serde_json::to_string_pretty(&keyed)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    log::debug!(
        "[persistence::save_plots] saved {} plots to {}",
        plots.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn sample_plots() -> HashMap<GridCell, Plot> {
        let mut plots = HashMap::new();
        for (x, z) in [(0, 0), (3, -2), (-1, 7)] {
            let cell = GridCell::new(x, z);
            plots.insert(cell, Plot::new(cell, Uuid::new_v4(), "steve"));
        }
        plots
    }

    #[test]
    fn test_key_round_trip() {
        let cell = GridCell::new(3, -2);
        assert_eq!(cell_key(cell), "3,-2");
        assert_eq!(parse_cell_key("3,-2"), Some(cell));
        assert_eq!(parse_cell_key("3, -2"), Some(cell));
        assert_eq!(parse_cell_key("nonsense"), None);
        assert_eq!(parse_cell_key("1,2,3"), None);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = plots_path(dir.path());

        let plots = sample_plots();
        save_plots(&path, &plots).expect("save");
        let loaded = load_plots(&path).expect("load");

        assert_eq!(loaded.len(), plots.len());
        for (cell, plot) in &plots {
            let restored = loaded.get(cell).expect("plot survives");
            assert_eq!(restored.owner, plot.owner);
            assert_eq!(restored.name, plot.name);
            assert_eq!(restored.cell(), *cell);
        }
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = load_plots(&plots_path(dir.path())).expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_malformed_key_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = plots_path(dir.path());

        let mut plots = sample_plots();
        save_plots(&path, &plots).expect("save");

        // Corrupt one key in place
        let json = fs::read_to_string(&path).expect("read");
        let json = json.replacen("\"0,0\"", "\"zero,zero\"", 1);
        fs::write(&path, json).expect("write");

        let loaded = load_plots(&path).expect("load");
        plots.remove(&GridCell::new(0, 0));
        assert_eq!(loaded.len(), plots.len());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = plots_path(dir.path());
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(
            load_plots(&path),
            Err(PersistenceError::Serialization(_))
        ));
    }
}
