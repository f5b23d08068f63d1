//! Error types for the storage layer.

/// Errors that can occur while reading or writing a [`KeyValueStore`].
///
/// [`KeyValueStore`]: crate::KeyValueStore
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("store I/O failed: {0}")]
    Io(#[source] std::io::Error),

    /// The backing file exists but isn't a JSON object of strings.
    ///
    /// The store refuses to open rather than silently discarding the
    /// previous contents.
    #[cfg(feature = "file")]
    #[error("store file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}
