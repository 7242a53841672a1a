//! Permission boundary.
//!
//! Quota and admin-bypass decisions call out to the host's permission
//! system through [`PermissionOracle`]; the core treats it as a black box
//! over permission node strings.

use uuid::Uuid;

/// Wildcard admin permission: unlimited plots, bypasses protection.
pub const PERM_ADMIN: &str = "plots.*";
pub const PERM_USER: &str = "plots.user";
pub const PERM_CLAIM: &str = "plots.claim";
pub const PERM_DELETE: &str = "plots.delete";
pub const PERM_DELETE_ANY: &str = "plots.delete.*";
pub const PERM_WORLD: &str = "plots.world";
pub const PERM_LIST: &str = "plots.list";
pub const PERM_INFO: &str = "plots.info";
pub const PERM_RENAME: &str = "plots.rename";
pub const PERM_TRUST: &str = "plots.trust";

/// Prefix of the per-count quota nodes; `plots.limit.N` grants a quota
/// of N plots.
pub const PERM_LIMIT_PREFIX: &str = "plots.limit.";

/// Builds the quota node for a specific tier.
pub fn limit_node(tier: u32) -> String {
    format!("{}{}", PERM_LIMIT_PREFIX, tier)
}

/// External predicate over the host's permission store.
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, player: Uuid, node: &str) -> bool;
}

/// Oracle that grants nothing. Useful as a default and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl PermissionOracle for DenyAll {
    fn has_permission(&self, _player: Uuid, _node: &str) -> bool {
        false
    }
}
