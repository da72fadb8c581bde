//! Store accessor for the song collection
//!
//! The whole collection is read on every request and rewritten in full on
//! every mutation. `load` never fails: a missing or corrupt document degrades
//! to an empty collection and is reported through tracing. `save` reports
//! failures both to the log and to the caller.

use async_trait::async_trait;
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::song::Song;
use crate::{Error, Result};

/// Load/save contract over the persisted collection
#[async_trait]
pub trait SongStore: Send + Sync {
    /// Read the full collection, or an empty one if it cannot be read
    async fn load(&self) -> Vec<Song>;

    /// Replace the persisted collection with `songs`
    async fn save(&self, songs: &[Song]) -> Result<()>;
}

/// Collection stored as one pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing document location
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_collection(&self) -> Result<Vec<Song>> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        let root: Value = serde_json::from_str(&contents)?;

        let Value::Array(items) = root else {
            return Err(Error::Storage(format!(
                "{} does not contain a JSON array",
                self.path.display()
            )));
        };

        let total = items.len();
        let songs: Vec<Song> = items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(Song::new(fields)),
                _ => None,
            })
            .collect();

        if songs.len() != total {
            warn!(
                path = %self.path.display(),
                skipped = total - songs.len(),
                "Skipped collection entries that are not objects"
            );
        }

        Ok(songs)
    }

    /// Sibling file written first and then renamed over the document
    fn staging_path(&self) -> PathBuf {
        let mut staging = OsString::from(self.path.as_os_str());
        staging.push(".tmp");
        PathBuf::from(staging)
    }

    async fn write_collection(&self, songs: &[Song]) -> Result<()> {
        let contents = serde_json::to_string_pretty(songs)?;
        let staging = self.staging_path();
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl SongStore for JsonFileStore {
    async fn load(&self) -> Vec<Song> {
        match self.read_collection().await {
            Ok(songs) => {
                debug!(path = %self.path.display(), count = songs.len(), "Loaded collection");
                songs
            }
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "Collection file not found, using empty collection");
                Vec::new()
            }
            Err(e) => {
                error!(path = %self.path.display(), "Failed to read collection: {}", e);
                Vec::new()
            }
        }
    }

    async fn save(&self, songs: &[Song]) -> Result<()> {
        self.write_collection(songs).await.map_err(|e| {
            error!(path = %self.path.display(), "Failed to save collection: {}", e);
            Error::Storage(format!("{}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), count = songs.len(), "Saved collection");
        Ok(())
    }
}

/// In-process collection, used where no file should be involved
#[derive(Debug, Default)]
pub struct MemoryStore {
    songs: Mutex<Vec<Song>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new(songs: Vec<Song>) -> Self {
        Self {
            songs: Mutex::new(songs),
            fail_saves: AtomicBool::new(false),
        }
    }

    /// Make every following `save` fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Copy of the current collection
    pub async fn snapshot(&self) -> Vec<Song> {
        self.songs.lock().await.clone()
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn load(&self) -> Vec<Song> {
        self.snapshot().await
    }

    async fn save(&self, songs: &[Song]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            error!("Failed to save collection: memory store is read-only");
            return Err(Error::Storage("memory store is read-only".to_string()));
        }
        *self.songs.lock().await = songs.to_vec();
        Ok(())
    }
}
