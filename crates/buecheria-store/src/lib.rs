//! Key-value storage abstraction for Buecheria.
//!
//! The session layer persists three strings (`access_token`, `username`,
//! `role`) and needs nothing more than get/set/remove on string keys.
//! [`KeyValueStore`] is that interface, so callers can pick where a
//! session lives:
//!
//! - [`MemoryStore`] — process-local, gone when the process exits. Tests
//!   use it as the in-memory fake.
//! - [`FileStore`] — a JSON file on disk that survives restarts.
//!
//! # Feature Flags
//!
//! - `file` (default) — the [`FileStore`] implementation

mod error;
#[cfg(feature = "file")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "file")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// A string-to-string store with interior mutability.
///
/// All methods take `&self`: the store is shared by every request a
/// client issues, and each implementation guards its own state.
///
/// # Trait bounds
///
/// - `Send + Sync` → the store can be read from concurrent async tasks.
/// - `'static` → it owns its data and can live inside a long-lived client.
pub trait KeyValueStore: Send + Sync + 'static {
    /// Returns the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing a key that doesn't exist is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
