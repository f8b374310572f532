//! JSON file snapshot store.
//!
//! Each save writes the full snapshot to a sibling temp file and renames
//! it over the target, so a crash mid-write leaves the previous snapshot
//! intact. A missing file loads as "no snapshot". Besides the
//! `{ "generation": n, "cells": [...] }` document, a bare JSON array of
//! cells is accepted as generation 0.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use lifegrid_core::persist::{PersistError, Snapshot, SnapshotStore};
use lifegrid_types::Cell;
use serde::Deserialize;
use tracing::{debug, info};

/// On-disk layouts accepted by [`FileSnapshotStore::load`].
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredSnapshot {
    Full(Snapshot),
    Bare(Vec<Cell>),
}

impl From<StoredSnapshot> for Snapshot {
    fn from(stored: StoredSnapshot) -> Self {
        match stored {
            StoredSnapshot::Full(snapshot) => snapshot,
            StoredSnapshot::Bare(cells) => Self {
                generation: 0,
                cells,
            },
        }
    }
}

/// Snapshot store backed by one JSON file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    /// Create a store reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map_or_else(|| OsString::from("snapshot"), ToOwned::to_owned);
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>, PersistError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no snapshot file, starting empty");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let stored: StoredSnapshot = serde_json::from_slice(&bytes)?;
        let snapshot = Snapshot::from(stored);
        info!(
            path = %self.path.display(),
            generation = snapshot.generation,
            cells = snapshot.cells.len(),
            "loaded snapshot"
        );
        Ok(Some(snapshot))
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), PersistError> {
        let bytes = serde_json::to_vec(snapshot)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        tokio::fs::rename(&temp, &self.path).await?;

        debug!(
            path = %self.path.display(),
            generation = snapshot.generation,
            bytes = bytes.len(),
            "saved snapshot"
        );
        Ok(())
    }
}
