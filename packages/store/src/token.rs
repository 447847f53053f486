//! # Token persistence — one key, three backends
//!
//! [`TokenStore`] is the async interface the session layer uses to persist
//! the bearer token between application loads. Implementations:
//!
//! | Store | Platform | Backing |
//! |-------|----------|---------|
//! | [`MemoryTokenStore`] | any | `Arc<Mutex<Option<String>>>`, for tests and fakes |
//! | [`LocalStorageTokenStore`] | wasm | browser `localStorage` under [`TOKEN_KEY`] |
//! | [`FileTokenStore`] | native | a single file in the user data directory |
//!
//! All backends silently swallow storage errors: a failed read degrades to
//! "no persisted token" and a failed write leaves the session memory-only.
//! The session treats an unreadable token the same as an absent one, so the
//! worst case is an extra login prompt.

/// Fixed storage key for the persisted bearer token.
pub const TOKEN_KEY: &str = "token";

/// Async trait for persisting the bearer token.
pub trait TokenStore {
    fn load(&self) -> impl std::future::Future<Output = Option<String>>;
    fn save(&self, token: &str) -> impl std::future::Future<Output = ()>;
    fn clear(&self) -> impl std::future::Future<Output = ()>;
}

/// In-memory TokenStore for testing and as a non-persistent fallback.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    token: std::sync::Arc<std::sync::Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    async fn save(&self, token: &str) {
        *self.token.lock().unwrap() = Some(token.to_string());
    }

    async fn clear(&self) {
        *self.token.lock().unwrap() = None;
    }
}

/// `localStorage`-backed TokenStore for the web platform.
///
/// Zero-size and `Clone`-friendly; the window handle is looked up on every
/// operation rather than held across suspension points.
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Debug, Default)]
pub struct LocalStorageTokenStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageTokenStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for LocalStorageTokenStore {
    async fn load(&self) -> Option<String> {
        let storage = Self::storage()?;
        storage
            .get_item(TOKEN_KEY)
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }

    async fn save(&self, token: &str) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.set_item(TOKEN_KEY, token) {
                tracing::warn!("failed to persist token: {e:?}");
            }
        }
    }

    async fn clear(&self) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(TOKEN_KEY) {
                tracing::warn!("failed to clear persisted token: {e:?}");
            }
        }
    }
}

/// File-backed TokenStore for native builds.
///
/// Stores the token as the sole content of `fieldlog/token` under the
/// platform data directory (falling back to the current directory when no
/// data directory is available).
#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileTokenStore {
    pub fn new() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
        Self {
            path: base.join("fieldlog").join(TOKEN_KEY),
        }
    }

    /// Store the token at an explicit path (used by tests).
    pub fn with_path(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let token = raw.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

    async fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("failed to create token directory: {e}");
                return;
            }
        }
        if let Err(e) = std::fs::write(&self.path, token) {
            tracing::warn!("failed to persist token: {e}");
        }
    }

    async fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("failed to clear persisted token: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().await, None);

        store.save("abc123").await;
        assert_eq!(store.load().await, Some("abc123".to_string()));

        store.clear().await;
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn memory_store_clear_is_idempotent() {
        let store = MemoryTokenStore::new();
        store.clear().await;
        store.clear().await;
        assert_eq!(store.load().await, None);
    }

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::with_path(dir.path().join("token"));

        assert_eq!(store.load().await, None);

        store.save("tok-1").await;
        assert_eq!(store.load().await, Some("tok-1".to_string()));

        store.save("tok-2").await;
        assert_eq!(store.load().await, Some("tok-2".to_string()));

        store.clear().await;
        assert_eq!(store.load().await, None);
        // Clearing again must not error.
        store.clear().await;
    }

    #[tokio::test]
    async fn file_store_ignores_surrounding_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  tok\n").unwrap();

        let store = FileTokenStore::with_path(path);
        assert_eq!(store.load().await, Some("tok".to_string()));
    }

    #[tokio::test]
    async fn file_store_treats_empty_file_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n").unwrap();

        let store = FileTokenStore::with_path(path);
        assert_eq!(store.load().await, None);
    }
}
