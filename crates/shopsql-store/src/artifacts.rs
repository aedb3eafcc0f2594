use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

/// Keyed byte storage for pipeline artifacts. Keys are `/`-separated relative
/// paths such as `raw/all_products.json`.
pub trait ArtifactStore {
    /// Creates or replaces `key`. A reader never observes a partial write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] or [`StoreError::Io`].
    fn write(&self, key: &str, contents: &[u8]) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] when nothing was written under `key`.
    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    fn exists(&self, key: &str) -> bool;

    /// Human-readable location of `key`, for logs.
    fn describe(&self, key: &str) -> String;
}

/// Pretty-printed JSON with a trailing newline, as [`save_json`] writes it.
///
/// Stages that write several artifacts serialize all of them first, so a
/// serialization failure cannot leave some of them behind.
///
/// # Errors
///
/// Returns [`StoreError::Json`] naming `key` if serialization fails.
pub fn json_bytes<T>(key: &str, value: &T) -> Result<Vec<u8>, StoreError>
where
    T: Serialize + ?Sized,
{
    let mut bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Writes `value` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`StoreError::Json`] if serialization fails, or the store's error.
pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<(), StoreError>
where
    S: ArtifactStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.write(key, &json_bytes(key, value)?)
}

/// Reads and parses a JSON artifact.
///
/// # Errors
///
/// Returns [`StoreError::Missing`] if absent or [`StoreError::Json`] if the
/// contents do not parse as `T`.
pub fn load_json<S, T>(store: &S, key: &str) -> Result<T, StoreError>
where
    S: ArtifactStore + ?Sized,
    T: DeserializeOwned,
{
    let bytes = store.read(key)?;
    serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        key: key.to_owned(),
        source,
    })
}

fn validate_key(key: &str) -> Result<(), StoreError> {
    let path = Path::new(key);
    let valid = !key.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey {
            key: key.to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Filesystem
// ---------------------------------------------------------------------------

/// Artifacts as files under a root directory.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl ArtifactStore for FsStore {
    fn write(&self, key: &str, contents: &[u8]) -> Result<(), StoreError> {
        let path = self.path_of(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let written = std::fs::write(&tmp, contents).and_then(|()| std::fs::rename(&tmp, &path));
        if let Err(e) = written {
            // best effort; the temp file is never read
            let _ = std::fs::remove_file(&tmp);
            return Err(io_error(&path, e));
        }

        tracing::debug!(path = %path.display(), bytes = contents.len(), "artifact written");
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_of(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::Missing {
                key: path.display().to_string(),
            }),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn exists(&self, key: &str) -> bool {
        self.path_of(key).is_ok_and(|p| p.is_file())
    }

    fn describe(&self, key: &str) -> String {
        self.root.join(key).display().to_string()
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Artifacts held in a map; for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys written so far, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>> {
        // A panic while holding the lock cannot leave a half-written entry.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ArtifactStore for MemoryStore {
    fn write(&self, key: &str, contents: &[u8]) -> Result<(), StoreError> {
        validate_key(key)?;
        self.lock().insert(key.to_owned(), contents.to_vec());
        Ok(())
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.lock()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::Missing {
                key: key.to_owned(),
            })
    }

    fn exists(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn describe(&self, key: &str) -> String {
        format!("memory:{key}")
    }
}
