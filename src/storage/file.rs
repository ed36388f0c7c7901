//! File-based key/value storage for EduDash.
//!
//! Each key is stored as `<sanitized-key>.json` in a data directory
//! (`~/.edudash/data/` by default). Atomic writes are achieved via temp file +
//! rename. Every write gets its own temp file, so concurrent writes to one key
//! never share a file and the last rename wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::data_dir;
use crate::error::{EduDashError, Result};
use crate::storage::KeyValueStore;

/// Counter distinguishing temp files of overlapping writes.
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-based key/value store.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    /// Directory where value files are stored.
    data_dir: PathBuf,
}

impl FileKeyValueStore {
    /// Create a file store in the default data directory.
    ///
    /// Uses `~/.edudash/data/` or `$EDUDASH_HOME/data/`.
    pub fn new() -> Result<Self> {
        let dir = data_dir().ok_or_else(|| {
            EduDashError::config("Could not determine data directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a file store in a custom directory.
    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();

        if !data_dir.exists() {
            std::fs::create_dir_all(&data_dir)
                .map_err(|e| EduDashError::storage(&data_dir, e))?;
        }

        Ok(Self { data_dir })
    }

    /// Directory holding the value files.
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the path for a key's value file.
    fn value_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", sanitize_key(key)))
    }

    /// Get a fresh temp file path for one atomic write.
    ///
    /// Unique per process and write, so overlapping writes to the same key
    /// (in this process or another one) never truncate each other.
    fn temp_path(&self, key: &str) -> PathBuf {
        let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.data_dir.join(format!(
            ".{}.{}.{}.json.tmp",
            sanitize_key(key),
            std::process::id(),
            seq
        ))
    }

    /// Write a value atomically using temp file + rename.
    async fn atomic_write(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.value_path(key);
        let temp_path = self.temp_path(key);

        let written = async {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(value.as_bytes()).await?;
            file.sync_all().await
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(EduDashError::storage(&temp_path, e));
        }

        // Rename temp file to final path (atomic on POSIX)
        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(EduDashError::storage(&final_path, e));
        }

        Ok(())
    }
}

/// Map a storage key onto a safe file stem.
///
/// Alphanumerics and `-` are kept, `_` is doubled, and every other byte
/// becomes `_` followed by two hex digits, so `@edudash_courses` is stored as
/// `_40edudash__courses.json`. The escape is reversible, so distinct keys
/// never share a file.
pub fn sanitize_key(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'_' => stem.push_str("__"),
            b'-' => stem.push('-'),
            b if b.is_ascii_alphanumeric() => stem.push(char::from(b)),
            b => stem.push_str(&format!("_{:02X}", b)),
        }
    }
    stem
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.value_path(key);

        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(EduDashError::storage(&path, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.atomic_write(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.value_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(EduDashError::storage(&path, e)),
        }

        Ok(())
    }
}
