//! The claimable unit of land.

use super::core::GridCell;
use super::grid::GridGeometry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A claimed plot.
///
/// A `Plot` exists in the claim store if and only if its cell is claimed;
/// unclaimed cells have no record. Wire field names stay camelCase for
/// compatibility with the persisted JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plot {
    grid_x: i32,
    grid_z: i32,
    /// Owning player. Reassignable administratively, otherwise fixed.
    pub owner: Uuid,
    /// Display name of the owner, for UI only.
    pub owner_name: String,
    /// Player-visible plot name.
    pub name: String,
    trusted_players: Vec<Uuid>,
    created_at: i64,
}

impl Plot {
    /// Create a freshly claimed plot. The name defaults to
    /// `"Plot (x, z)"` and the creation time is taken from the clock.
    pub fn new(cell: GridCell, owner: Uuid, owner_name: &str) -> Self {
        Self {
            grid_x: cell.x,
            grid_z: cell.z,
            owner,
            owner_name: owner_name.to_string(),
            name: format!("Plot ({}, {})", cell.x, cell.z),
            trusted_players: Vec::new(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn cell(&self) -> GridCell {
        GridCell::new(self.grid_x, self.grid_z)
    }

    pub fn grid_x(&self) -> i32 {
        self.grid_x
    }

    pub fn grid_z(&self) -> i32 {
        self.grid_z
    }

    /// Creation time, milliseconds since the epoch.
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// Whether a player may build here: the owner or a trusted player.
    pub fn has_permission(&self, player: Uuid) -> bool {
        player == self.owner || self.trusted_players.contains(&player)
    }

    /// Trust a player. Adding an already-trusted player is a no-op.
    pub fn add_trusted(&mut self, player: Uuid) {
        if !self.trusted_players.contains(&player) {
            self.trusted_players.push(player);
        }
    }

    /// Untrust a player. Removing an absent player is a no-op.
    pub fn remove_trusted(&mut self, player: Uuid) {
        self.trusted_players.retain(|p| *p != player);
    }

    pub fn is_trusted(&self, player: Uuid) -> bool {
        self.trusted_players.contains(&player)
    }

    /// Defensive copy of the trusted player list.
    pub fn trusted_players(&self) -> Vec<Uuid> {
        self.trusted_players.clone()
    }

    // World-space bounds are computed on demand from the current geometry,
    // never cached: configuration can change between calls during a reload.

    /// Minimum world X coordinate (inclusive).
    pub fn min_x(&self, geometry: &GridGeometry) -> i32 {
        geometry.x.grid_to_world(self.grid_x)
    }

    /// Maximum world X coordinate (exclusive).
    pub fn max_x(&self, geometry: &GridGeometry) -> i32 {
        self.min_x(geometry) + geometry.x.plot_size()
    }

    /// Minimum world Z coordinate (inclusive).
    pub fn min_z(&self, geometry: &GridGeometry) -> i32 {
        geometry.z.grid_to_world(self.grid_z)
    }

    /// Maximum world Z coordinate (exclusive).
    pub fn max_z(&self, geometry: &GridGeometry) -> i32 {
        self.min_z(geometry) + geometry.z.plot_size()
    }

    pub fn center_x(&self, geometry: &GridGeometry) -> f64 {
        self.min_x(geometry) as f64 + geometry.x.plot_size() as f64 / 2.0
    }

    pub fn center_z(&self, geometry: &GridGeometry) -> f64 {
        self.min_z(geometry) as f64 + geometry.z.plot_size() as f64 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_from_cell() {
        let plot = Plot::new(GridCell::new(3, -2), Uuid::new_v4(), "Alex");
        assert_eq!(plot.name, "Plot (3, -2)");
    }

    #[test]
    fn test_permission_owner_and_trusted() {
        let owner = Uuid::new_v4();
        let friend = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let mut plot = Plot::new(GridCell::new(0, 0), owner, "Alex");

        assert!(plot.has_permission(owner));
        assert!(!plot.has_permission(friend));

        plot.add_trusted(friend);
        assert!(plot.has_permission(friend));
        assert!(!plot.has_permission(stranger));
    }

    #[test]
    fn test_trust_is_idempotent() {
        let mut plot = Plot::new(GridCell::new(0, 0), Uuid::new_v4(), "Alex");
        let friend = Uuid::new_v4();

        plot.add_trusted(friend);
        plot.add_trusted(friend);
        assert_eq!(plot.trusted_players().len(), 1);

        plot.remove_trusted(friend);
        plot.remove_trusted(friend);
        assert!(plot.trusted_players().is_empty());
        assert!(!plot.is_trusted(friend));
    }

    #[test]
    fn test_bounds_follow_geometry() {
        let plot = Plot::new(GridCell::new(1, -1), Uuid::new_v4(), "Alex");
        let geometry = GridGeometry::square(32, 4);

        assert_eq!(plot.min_x(&geometry), 36);
        assert_eq!(plot.max_x(&geometry), 68);
        assert_eq!(plot.min_z(&geometry), -36);
        assert_eq!(plot.max_z(&geometry), -4);
        assert_eq!(plot.center_x(&geometry), 52.0);

        // Bounds track the geometry passed in, nothing is cached
        let wider = GridGeometry::square(48, 6);
        assert_eq!(plot.min_x(&wider), 54);
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let plot = Plot::new(GridCell::new(2, 5), Uuid::new_v4(), "Alex");
        let json = serde_json::to_value(&plot).expect("serialize");
        assert!(json.get("gridX").is_some());
        assert!(json.get("ownerName").is_some());
        assert!(json.get("trustedPlayers").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
