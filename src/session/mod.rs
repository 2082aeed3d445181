/// Session-scoped storage for the Linkdeck client
///
/// Models the browser's per-tab session storage: a string key/value store
/// whose lifetime is tied to the session context. The draft buffer and the
/// OAuth CSRF state live here. Cross-tab consistency is not guaranteed.
pub mod draft;

use crate::error::ClientResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Well-known storage keys owned by this crate
pub mod keys {
    /// Buffered profile edits made before authentication
    pub const PROFILE_DRAFT: &str = "linkdeck:draft:profile";
    /// Buffered links and social links made before authentication
    pub const LINKS_DRAFT: &str = "linkdeck:draft:links";
    /// OAuth CSRF state parameter
    pub const OAUTH_STATE: &str = "linkdeck:oauth:state";
}

/// Session storage backend
///
/// Implementations may fail (quota, corrupt backing store); callers in the
/// draft buffer treat failures as non-fatal and degrade to memory-only.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
}

/// In-memory session storage, scoped to the session context's lifetime
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert_eq!(store.get("missing").unwrap(), None);

        store.set("k", "v1").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v1".to_string()));

        // Last write wins
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("v2".to_string()));

        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        // Removing a missing key is a no-op
        store.remove("k").unwrap();
    }

    #[test]
    fn test_keys_are_distinct() {
        assert_ne!(keys::PROFILE_DRAFT, keys::LINKS_DRAFT);
        assert_ne!(keys::PROFILE_DRAFT, keys::OAUTH_STATE);
        assert_ne!(keys::LINKS_DRAFT, keys::OAUTH_STATE);
    }
}
