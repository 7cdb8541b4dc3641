//! Durable favorites store.
//!
//! Favorites survive restarts through a small JSON file. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous contents intact.

use pulseboard_core::{FavoriteEntry, FavoriteKind};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("favorites io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("favorites file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Keyed collection of favorited dashboard items, persisted as JSON.
pub struct FavoriteStore {
    path: PathBuf,
    entries: Mutex<Vec<FavoriteEntry>>,
}

impl FavoriteStore {
    /// Open the store, loading any existing file. A missing file is an
    /// empty store; a corrupt file is discarded with a warning rather than
    /// blocking startup.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::load(&path) {
            Ok(entries) => entries,
            Err(FavoriteError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not load favorites, starting empty");
                Vec::new()
            }
        };

        info!(path = %path.display(), count = entries.len(), "favorites loaded");
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn load(path: &Path) -> Result<Vec<FavoriteEntry>, FavoriteError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Toggle one item's favorite status. Returns `true` if the item is a
    /// favorite after the call.
    ///
    /// Mutation and persistence happen under one lock, so concurrent
    /// toggles serialize and the file always reflects a real state.
    pub fn toggle(&self, id: &str, kind: FavoriteKind, name: &str) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        let now_favorite = match entries.iter().position(|e| e.matches(id, kind)) {
            Some(idx) => {
                entries.remove(idx);
                false
            }
            None => {
                entries.push(FavoriteEntry::new(id, kind, name));
                true
            }
        };

        // In-memory state wins over the file: a persist failure degrades
        // durability for this change, not the session.
        if let Err(e) = self.persist(&entries) {
            warn!(path = %self.path.display(), error = %e, "could not persist favorites");
        }

        now_favorite
    }

    fn persist(&self, entries: &[FavoriteEntry]) -> Result<(), FavoriteError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn is_favorite(&self, id: &str, kind: FavoriteKind) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .any(|e| e.matches(id, kind))
    }

    pub fn snapshot(&self) -> Vec<FavoriteEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
