//! Persistence port for session snapshots.
//!
//! Loading and saving never fail from the caller's point of view: a missing
//! or unreadable snapshot falls back to a default and a failed write is
//! logged and dropped.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::session::SessionState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed snapshot for '{key}': {source}")]
    Json {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub trait SessionStore {
    /// Reads the snapshot stored under `key`; `Ok(None)` when there is none.
    fn try_load(&self, key: &str) -> Result<Option<SessionState>, StorageError>;

    fn try_save(&mut self, key: &str, state: &SessionState) -> Result<(), StorageError>;

    /// Stored snapshot, or `default` when it is missing or unreadable.
    fn load_or(&self, key: &str, default: SessionState) -> SessionState {
        match self.try_load(key) {
            Ok(Some(state)) => state,
            Ok(None) => default,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to load session, starting fresh");
                default
            }
        }
    }

    /// Best-effort write. Returns whether the snapshot was stored.
    fn save(&mut self, key: &str, state: &SessionState) -> bool {
        match self.try_save(key, state) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to save session");
                false
            }
        }
    }
}

/// One pretty-printed JSON file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_file()
    }
}

impl SessionStore for JsonFileStore {
    fn try_load(&self, key: &str) -> Result<Option<SessionState>, StorageError> {
        let path = self.path_for(key);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            })
    }

    /// Writes to a sibling temp file first so a crash never leaves a
    /// half-written snapshot behind.
    fn try_save(&mut self, key: &str, state: &SessionState) -> Result<(), StorageError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| StorageError::Io { path, source }
        };
        fs::create_dir_all(&self.dir).map_err(io_err(&self.dir))?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        let body = serde_json::to_string_pretty(state).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        {
            let f = File::create(&tmp).map_err(io_err(&tmp))?;
            let mut w = BufWriter::new(f);
            w.write_all(body.as_bytes()).map_err(io_err(&tmp))?;
            w.write_all(b"\n").map_err(io_err(&tmp))?;
            w.flush().map_err(io_err(&tmp))?;
        }
        fs::rename(&tmp, &path).map_err(io_err(&path))?;
        tracing::debug!(key, path = %path.display(), "session saved");
        Ok(())
    }
}

/// Snapshots kept as JSON text in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text under `key`, bypassing serialization.
    pub fn insert_raw(&mut self, key: &str, text: impl Into<String>) {
        self.entries.insert(key.to_string(), text.into());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl SessionStore for MemoryStore {
    fn try_load(&self, key: &str) -> Result<Option<SessionState>, StorageError> {
        let Some(text) = self.entries.get(key) else {
            return Ok(None);
        };
        serde_json::from_str(text)
            .map(Some)
            .map_err(|source| StorageError::Json {
                key: key.to_string(),
                source,
            })
    }

    fn try_save(&mut self, key: &str, state: &SessionState) -> Result<(), StorageError> {
        let text = serde_json::to_string(state).map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })?;
        self.entries.insert(key.to_string(), text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::rank::RankPoints;

    fn session() -> SessionState {
        SessionState::new_tien_len(
            vec![Player::new("a", "An"), Player::new("b", "Binh")],
            RankPoints::default(),
        )
        .unwrap()
    }

    #[test]
    fn memory_store_round_trips() {
        let mut store = MemoryStore::new();
        let s = session()
            .submit_ranking(&["a".into(), "b".into()])
            .unwrap()
            .state;
        assert!(store.save("tienlen", &s));
        assert_eq!(store.load_or("tienlen", session()), s);
    }

    #[test]
    fn corrupt_entry_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.insert_raw("tienlen", "{not json");
        assert!(matches!(
            store.try_load("tienlen"),
            Err(StorageError::Json { .. })
        ));
        assert_eq!(store.load_or("tienlen", session()), session());
    }

    #[test]
    fn file_store_writes_key_json() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("data"));
        assert!(store.try_load("xidach").unwrap().is_none());
        store.try_save("tienlen", &session()).unwrap();
        assert!(store.exists("tienlen"));
        assert!(!dir.path().join("data/tienlen.json.tmp").exists());
        assert_eq!(store.try_load("tienlen").unwrap(), Some(session()));
    }
}
