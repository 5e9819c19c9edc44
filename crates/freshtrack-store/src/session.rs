//! In-memory session storage
//!
//! The draft slot only has to survive navigation inside one running session,
//! so a process-local map is enough. Dropping the storage ends the session.

use freshtrack_domain::traits::SessionStorage;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Process-local `SessionStorage`
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// End the session, dropping every key
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A poisoned map only means another holder panicked mid-write; the map
    // itself is still usable.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        debug!(key, bytes = value.len(), "Session item written");
        self.lock().insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        if self.lock().remove(key).is_some() {
            debug!(key, "Session item removed");
        }
    }
}
