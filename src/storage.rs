use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// Durable entry names shared between the session layer and the store.
pub const CREDENTIAL_KEY: &str = "credential";
pub const USER_KEY: &str = "user";

// 1. SessionStore Contract
/// SessionStore
///
/// Defines the abstract contract for the durable key-value entries backing the
/// session (the `credential` and `user` keys). The trait allows swapping the
/// concrete implementation—from the file-backed store (FileSessionStore) in the
/// running console to the in-memory mock (MemorySessionStore) in tests—without
/// affecting the session layer.
///
/// The store is deliberately failure-silent: an unavailable or corrupt backing
/// store reads as "absent" and writes are best-effort, matching the rule that
/// session restoration can never itself fail.
pub trait SessionStore: Send + Sync {
    /// Reads one entry. Missing, unreadable, or corrupt storage yields None.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes one entry. Best-effort; failures are logged, never surfaced.
    fn put(&self, key: &str, value: &str);

    /// Removes one entry. Best-effort, idempotent.
    fn remove(&self, key: &str);
}

/// SessionStoreState
///
/// The concrete type used to share store access between the session layer and
/// the route guard.
pub type SessionStoreState = Arc<dyn SessionStore>;

// 2. The Real Implementation (File-Backed)
/// FileSessionStore
///
/// The durable implementation: a single JSON object on disk mapping entry names
/// to serialized values. Every read goes back to the file, so a freshly
/// constructed store (a "process restart") observes exactly what the previous
/// run persisted. Reads of a missing or malformed file resolve to an empty map.
#[derive(Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// load_map
    ///
    /// Reads and parses the backing file. Any failure mode (file absent, I/O
    /// error, invalid JSON) collapses to an empty map, which downstream code
    /// treats as an anonymous session.
    fn load_map(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e,
                    "session file is corrupt, treating as empty");
                HashMap::new()
            }
        }
    }

    fn save_map(&self, map: &HashMap<String, String>) {
        // Serializing a HashMap<String, String> cannot fail.
        let raw = serde_json::to_string(map).unwrap_or_default();
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!(path = %self.path.display(), error = %e,
                "failed to persist session file");
        }
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load_map().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        let mut map = self.load_map();
        map.insert(key.to_string(), value.to_string());
        self.save_map(&map);
    }

    fn remove(&self, key: &str) {
        let mut map = self.load_map();
        if map.remove(key).is_some() {
            self.save_map(&map);
        }
    }
}

// 3. The Mock Implementation (For Tests)
/// MemorySessionStore
///
/// An in-memory implementation of `SessionStore` used in tests and available to
/// embedders that do not want on-disk persistence. The failure switch simulates
/// an unavailable backing store: reads yield nothing and writes are dropped.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
    /// When true, all operations behave as if storage were unavailable.
    unavailable: bool,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_unavailable() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            unavailable: true,
        }
    }

    /// Pre-seeds an entry, bypassing the unavailability switch. Test setup only.
    pub fn seed(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        if self.unavailable {
            return None;
        }
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: &str) {
        if self.unavailable {
            return;
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        if self.unavailable {
            return;
        }
        self.entries.lock().unwrap().remove(key);
    }
}
