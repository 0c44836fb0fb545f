//! Session Token Storage
//!
//! Tokens and the cached user object live behind a small store interface
//! injected into the API clients, so tests can substitute an in-memory
//! implementation. The file-backed store persists a plain JSON map under
//! the platform data directory.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

/// Key-value storage for session state
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
    fn clear(&self);
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}

/// File-backed store: one JSON object, rewritten on every mutation
pub struct FileTokenStore {
    file_path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileTokenStore {
    /// Open a store at the given path, loading existing entries
    ///
    /// An unreadable or corrupt file starts the session empty rather than
    /// failing; the next mutation rewrites it.
    pub fn open(file_path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&file_path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Session file corrupt, starting empty: {}", e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Self {
            file_path,
            entries: RwLock::new(entries),
        }
    }

    /// Default session file location under the platform data directory
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("veritext")
            .join("session.json")
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).ok();
        }

        match serde_json::to_string_pretty(entries) {
            Ok(content) => {
                if let Err(e) = fs::write(&self.file_path, content) {
                    log::warn!("Failed to persist session file: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize session: {}", e),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.write();
        entries.remove(key);
        self.persist(&entries);
    }

    fn clear(&self) {
        let mut entries = self.entries.write();
        entries.clear();
        self.persist(&entries);
    }
}

/// Typed accessors over a token store
///
/// The three session keys are always cleared together on logout or a failed
/// token refresh.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Fresh in-memory session
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::new()))
    }

    /// Session persisted at the default file location
    pub fn persistent() -> Self {
        Self::new(Arc::new(FileTokenStore::open(FileTokenStore::default_path())))
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn user_json(&self) -> Option<String> {
        self.store.get(USER_KEY)
    }

    pub fn set_tokens(&self, access: &str, refresh: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access);
        self.store.set(REFRESH_TOKEN_KEY, refresh);
    }

    pub fn set_access_token(&self, access: &str) {
        self.store.set(ACCESS_TOKEN_KEY, access);
    }

    pub fn set_user_json(&self, user: &str) {
        self.store.set(USER_KEY, user);
    }

    pub fn clear(&self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        store.set("access_token", "abc");
        assert_eq!(store.get("access_token"), Some("abc".to_string()));

        store.remove("access_token");
        assert_eq!(store.get("access_token"), None);
    }

    #[test]
    fn test_session_clear_removes_everything() {
        let session = Session::in_memory();
        session.set_tokens("access", "refresh");
        session.set_user_json(r#"{"email":"ada@example.com"}"#);

        session.clear();

        assert_eq!(session.access_token(), None);
        assert_eq!(session.refresh_token(), None);
        assert_eq!(session.user_json(), None);
    }

    #[test]
    fn test_file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let store = FileTokenStore::open(path.clone());
            store.set(ACCESS_TOKEN_KEY, "token-1");
            store.set(REFRESH_TOKEN_KEY, "token-2");
        }

        let reopened = FileTokenStore::open(path);
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY), Some("token-1".to_string()));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY), Some("token-2".to_string()));
    }

    #[test]
    fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileTokenStore::open(path);
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    }
}
