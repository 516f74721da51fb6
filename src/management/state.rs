use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::{Duration, Instant, SystemTime},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

use crate::config;

const STATE_FILE: &str = "state.json";
const LOCK_FILE: &str = "state.lock";
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(10);
const STALE_LOCK_AGE: Duration = Duration::from_secs(600);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("state file is not valid JSON: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("state at {0} is locked by another spotplay process")]
    Locked(PathBuf),
}

/// Small key-value store for everything spotplay keeps between runs.
///
/// All values live in one JSON object (`state.json`). Access goes through
/// [`StateStore::lock`], which takes an exclusive lock file next to it, so two
/// concurrent invocations serialize their read-modify-write cycles instead of
/// overwriting each other.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    lock_timeout: Duration,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }

    /// Store in the spotplay config directory.
    pub fn default_location() -> Self {
        Self::new(config::config_dir())
    }

    /// How long [`StateStore::lock`] waits for another holder before giving up.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Acquires the exclusive lock and loads the current entries.
    ///
    /// A lock file older than ten minutes is treated as left over from a
    /// crashed run and taken over.
    pub async fn lock(&self) -> Result<StoreGuard, StoreError> {
        async_fs::create_dir_all(&self.dir).await?;

        let lock_path = self.dir.join(LOCK_FILE);
        let started = Instant::now();

        loop {
            let created = async_fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&lock_path)
                .await;

            match created {
                Ok(_) => break,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if is_stale(&lock_path).await && take_over_stale(&lock_path).await? {
                        continue;
                    }
                    if started.elapsed() >= self.lock_timeout {
                        return Err(StoreError::Locked(self.dir.clone()));
                    }
                    sleep(LOCK_POLL_INTERVAL).await;
                }
                Err(e) => return Err(StoreError::IoError(e)),
            }
        }

        let mut guard = StoreGuard {
            path: self.dir.join(STATE_FILE),
            lock_path,
            entries: BTreeMap::new(),
        };

        // From here on the guard owns the lock and releases it on error too.
        match async_fs::read_to_string(&guard.path).await {
            Ok(content) if !content.trim().is_empty() => {
                guard.entries = serde_json::from_str(&content)?;
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(StoreError::IoError(e)),
        }

        Ok(guard)
    }
}

/// Removes a stale lock.
///
/// Removal happens only while holding the takeover marker (created with
/// `create_new`), and staleness is checked again under it, so a lock another
/// process has just created is never removed. A marker left behind by a
/// crashed takeover is cleared once it is stale itself. Returns `false` when
/// another process holds the marker.
async fn take_over_stale(lock_path: &Path) -> Result<bool, StoreError> {
    let marker = lock_path.with_extension("lock.takeover");

    let claimed = async_fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker)
        .await;

    match claimed {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            if is_stale(&marker).await {
                let _ = async_fs::remove_file(&marker).await;
            }
            return Ok(false);
        }
        Err(e) => return Err(StoreError::IoError(e)),
    }

    let removed = if is_stale(lock_path).await {
        match async_fs::remove_file(lock_path).await {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    } else {
        Ok(())
    };

    async_fs::remove_file(&marker).await?;
    removed?;
    Ok(true)
}

async fn is_stale(lock_path: &Path) -> bool {
    async_fs::metadata(lock_path)
        .await
        .ok()
        .and_then(|meta| meta.modified().ok())
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map(|age| age >= STALE_LOCK_AGE)
        .unwrap_or(false)
}

/// Exclusive access to the store's entries.
///
/// Changes are only written by [`StoreGuard::commit`]. The lock is released
/// when the guard is dropped, committed or not.
#[derive(Debug)]
pub struct StoreGuard {
    path: PathBuf,
    lock_path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl StoreGuard {
    /// Value under `key`, or `None` when absent or of a different shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.entries
            .get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        self.entries
            .insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// Writes the entries (temp file, then rename) and releases the lock.
    pub async fn commit(self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        async_fs::write(&tmp_path, json).await?;
        async_fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

impl Drop for StoreGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.lock_path);
    }
}
