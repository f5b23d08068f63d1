//! File-backed store: a JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use rand::Rng;

use crate::{KeyValueStore, StoreError};

/// A [`KeyValueStore`] persisted as a single JSON file.
///
/// The file is the only copy of the data: every `get` reads it and every
/// mutation re-reads it, applies the change and writes it back. Any number
/// of `FileStore`s (in this process or others) opened on the same path
/// therefore see each other's logins and logouts.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// target, so a crash mid-write leaves either the old or the new contents,
/// never a truncated file. Within one `FileStore` the read-modify-write is
/// serialized by a lock; across stores there is no file lock, so two
/// writers racing on the same key end with the last rename.
///
/// Values are stored as plaintext. On Unix the file is created with mode
/// `0600` so only the owning user can read the token.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles from this handle.
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `path`. A missing (or empty) file is an empty
    /// store; the file is created on the first write.
    ///
    /// # Errors
    /// - [`StoreError::Io`] — the file exists but can't be read
    /// - [`StoreError::Corrupt`] — the file isn't a JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = load(&path)?;
        tracing::debug!(path = %path.display(), keys = entries.len(), "file store opened");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current file, applies `change`, and writes the result
    /// back if anything changed.
    fn update(
        &self,
        change: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let current = load(&self.path)?;
        let mut next = current.clone();
        change(&mut next);
        if next == current {
            return Ok(());
        }
        write_atomically(&self.path, &next)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = load(&self.path)?;
        Ok(entries.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Reads the file at `path`. Missing or blank means empty.
fn load(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
        Ok(text) => serde_json::from_str(&text).map_err(StoreError::Corrupt),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
        Err(e) => Err(StoreError::Io(e)),
    }
}

/// Serializes `entries` next to `path` and renames the temp file over it.
fn write_atomically(
    path: &Path,
    entries: &BTreeMap<String, String>,
) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty())
    {
        fs::create_dir_all(parent).map_err(StoreError::Io)?;
    }

    let bytes = serde_json::to_vec_pretty(entries).map_err(|e| {
        StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e))
    })?;

    let tmp = temp_path(path);
    let result = (|| {
        let mut file = create_private(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result.map_err(StoreError::Io)
}

/// `<dir>/.<name>.<16 hex chars>.tmp`, unique per write.
fn temp_path(path: &Path) -> PathBuf {
    let bytes: [u8; 8] = rand::rng().random();
    let suffix: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{name}.{suffix}.tmp"))
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}
