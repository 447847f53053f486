//! Durable client-side storage for Fieldlog.
//!
//! Exactly one item is ever persisted on the client: the bearer token. It
//! lives behind the [`TokenStore`] trait so the same session logic works
//! against browser `localStorage` on the web build, a dotfile on native, or
//! an in-memory store in tests.

pub mod token;

pub use token::{MemoryTokenStore, TokenStore, TOKEN_KEY};

#[cfg(target_arch = "wasm32")]
pub use token::LocalStorageTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub use token::FileTokenStore;

/// The token store used on the current platform.
#[cfg(target_arch = "wasm32")]
pub type PlatformTokenStore = LocalStorageTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformTokenStore = FileTokenStore;

/// Construct the token store appropriate for the current platform.
pub fn platform_store() -> PlatformTokenStore {
    PlatformTokenStore::new()
}
