use super::BlockId;
use std::collections::HashMap;

/// Block registration data
#[derive(Debug, Clone)]
pub struct BlockRegistration {
    pub id: BlockId,
    pub name: String,
}

/// Registry mapping host block-type names to [`BlockId`]s.
///
/// The host engine owns the real block-type table; this registry is the
/// narrow view the core needs: resolve a configured name to an id once,
/// with an explicit fallback when the name is unknown. Id 0 is always the
/// empty block, registered under the name `"Empty"`.
pub struct BlockRegistry {
    name_to_id: HashMap<String, BlockId>,
    registrations: Vec<BlockRegistration>,
    next_id: u16,
}

impl BlockRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            name_to_id: HashMap::new(),
            registrations: Vec::new(),
            next_id: 1, // 0 is reserved for the empty block
        };
        registry.name_to_id.insert("Empty".to_string(), BlockId::EMPTY);
        registry.registrations.push(BlockRegistration {
            id: BlockId::EMPTY,
            name: "Empty".to_string(),
        });
        registry
    }

    /// Register a block type name, returning its id.
    ///
    /// Registering an already-known name returns the existing id.
    pub fn register(&mut self, name: &str) -> BlockId {
        let name = normalize_block_name(name);
        if let Some(&id) = self.name_to_id.get(name.as_ref()) {
            return id;
        }

        let id = BlockId(self.next_id);
        self.next_id += 1;
        self.name_to_id.insert(name.to_string(), id);
        self.registrations.push(BlockRegistration {
            id,
            name: name.to_string(),
        });

        log::debug!("[BlockRegistry::register] '{}' -> {}", name, id.0);
        id
    }

    /// Get a block id by name
    pub fn get_id(&self, name: &str) -> Option<BlockId> {
        self.name_to_id.get(normalize_block_name(name).as_ref()).copied()
    }

    /// Resolve a name to an id, falling back when the name is unknown.
    ///
    /// Generation never aborts on a missing asset; callers pass the filler
    /// id (or another already-resolved id) as the fallback.
    pub fn resolve_or(&self, name: &str, fallback: BlockId) -> BlockId {
        match self.get_id(name) {
            Some(id) => id,
            None => {
                log::warn!(
                    "[BlockRegistry::resolve_or] unknown block '{}', using {}",
                    name,
                    fallback
                );
                fallback
            }
        }
    }

    /// Get all registered blocks
    pub fn registrations(&self) -> &[BlockRegistration] {
        &self.registrations
    }

    /// Check if a name is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.name_to_id.contains_key(normalize_block_name(name).as_ref())
    }
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Map the host's spellings of "nothing" onto the canonical empty block.
pub fn normalize_block_name(name: &str) -> std::borrow::Cow<'_, str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return "Empty".into();
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower == "air" || lower == "hytale:air" || lower == "null" {
        return "Empty".into();
    }
    trimmed.into()
}
