//! Shared constants for the plot world core.

/// Core world layout constants.
pub mod core {
    /// Horizontal footprint of a generated chunk column, in blocks.
    pub const CHUNK_SIZE: i32 = 32;

    /// Number of vertical blocks in a generated chunk (Y range `0..WORLD_HEIGHT`).
    pub const WORLD_HEIGHT: i32 = 256;

    /// Y level of the terrain surface layer.
    pub const GROUND_HEIGHT: i32 = 64;
}

/// Claim store constants.
pub mod claims {
    /// Maximum number of cells the spiral free-plot search visits before
    /// reporting that nothing is available.
    pub const SPIRAL_MAX_CHECKS: usize = 10_000;
}

/// Persistence constants.
pub mod persistence {
    /// File name of the persisted claim table inside the data directory.
    pub const PLOTS_FILE: &str = "plots.json";

    /// File suffix for prefab templates on disk.
    pub const PREFAB_EXTENSION: &str = ".prefab.json";
}
