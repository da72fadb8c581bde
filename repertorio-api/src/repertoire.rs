//! Repertoire operations over the injected song store
//!
//! Every operation loads the full collection from the store. Mutations run
//! behind a single write gate, held from `load` through `save`, so two
//! overlapping requests can no longer drop each other's changes.

use repertorio_common::song::{parse_path_id, position_of};
use repertorio_common::{Result, Song, SongStore};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

pub struct Repertoire {
    store: Arc<dyn SongStore>,
    /// Serializes load-modify-save sequences
    write_gate: Mutex<()>,
}

impl Repertoire {
    pub fn new(store: Arc<dyn SongStore>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// Full collection in stored order
    pub async fn list(&self) -> Vec<Song> {
        self.store.load().await
    }

    /// First song whose id equals the parsed path id
    pub async fn get(&self, raw_id: &str) -> Option<Song> {
        let id = parse_path_id(raw_id);
        self.store
            .load()
            .await
            .into_iter()
            .find(|song| song.has_id(id))
    }

    /// Append a song built from `body` and return it as stored
    pub async fn create(&self, body: Map<String, Value>) -> Result<Song> {
        let song = Song::from_body(body);

        let _guard = self.write_gate.lock().await;
        let mut songs = self.store.load().await;
        songs.push(song.clone());
        self.store.save(&songs).await?;

        info!(id = ?song.id(), count = songs.len(), "Created song");
        Ok(song)
    }

    /// Merge `body` into the first matching song; the path id always wins
    ///
    /// Returns `Ok(None)` when no song matches.
    pub async fn update(&self, raw_id: &str, body: Map<String, Value>) -> Result<Option<Song>> {
        let Some(id) = parse_path_id(raw_id) else {
            return Ok(None);
        };

        let _guard = self.write_gate.lock().await;
        let mut songs = self.store.load().await;
        let Some(index) = position_of(&songs, Some(id)) else {
            return Ok(None);
        };

        let song = &mut songs[index];
        song.merge(body);
        song.set_id(id);
        let updated = song.clone();
        self.store.save(&songs).await?;

        info!(id, "Updated song");
        Ok(Some(updated))
    }

    /// Remove the first matching song and return it
    ///
    /// Returns `Ok(None)` when no song matches.
    pub async fn delete(&self, raw_id: &str) -> Result<Option<Song>> {
        let id = parse_path_id(raw_id);

        let _guard = self.write_gate.lock().await;
        let mut songs = self.store.load().await;
        let Some(index) = position_of(&songs, id) else {
            return Ok(None);
        };

        let removed = songs.remove(index);
        self.store.save(&songs).await?;

        info!(id = ?id, count = songs.len(), "Deleted song");
        Ok(Some(removed))
    }
}
