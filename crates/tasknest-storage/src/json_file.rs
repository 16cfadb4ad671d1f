//! JSON array file store.
//!
//! Keeps the whole dataset in memory behind a Mutex and mirrors it to disk
//! on every mutation. Writes go to `<file>.tmp` first and are renamed over
//! the real file, so a crash mid-write leaves either the old or the new
//! array, never a truncated one. The id sequence lives in its own sidecar
//! file (`<file>.seq`) so it survives deletion of the highest record.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use tasknest_core::error::{Result, TasknestError};

use crate::store::{Record, Store, WriteOutcome};

struct Inner<R> {
    records: Vec<R>,
    /// Last id handed out by `allocate_id` (0 = none yet).
    sequence: u64,
}

/// Write-through JSON file store.
pub struct JsonFileStore<R> {
    path: Option<PathBuf>,
    inner: Mutex<Inner<R>>,
}

impl<R: Record> JsonFileStore<R> {
    /// Open the store backed by `path`.
    ///
    /// A missing or zero-length file is an empty dataset. The parent
    /// directory is created if needed. Malformed JSON is an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let records = read_records::<R>(&path)?;
        let stored_sequence = read_sequence(&sequence_path(&path))?;
        let sequence = stored_sequence.max(max_sequence(&records));

        info!(
            path = %path.display(),
            count = records.len(),
            sequence,
            "JSON store opened"
        );

        Ok(Self {
            path: Some(path),
            inner: Mutex::new(Inner { records, sequence }),
        })
    }

    /// A store that never touches disk (for testing).
    pub fn in_memory() -> Self {
        Self::with_records(Vec::new())
    }

    /// An in-memory store seeded with `records`.
    pub fn with_records(records: Vec<R>) -> Self {
        let sequence = max_sequence(&records);
        Self {
            path: None,
            inner: Mutex::new(Inner { records, sequence }),
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner<R>>> {
        self.inner
            .lock()
            .map_err(|e| TasknestError::Storage(format!("Store lock poisoned: {}", e)))
    }

    /// Persist `next` and, only if that succeeds, make it the live dataset.
    fn commit(&self, inner: &mut Inner<R>, next: Vec<R>) -> Result<()> {
        if let Some(path) = &self.path {
            let bytes = serde_json::to_vec(&next)?;
            if let Err(e) = write_atomic(path, &bytes) {
                warn!(path = %path.display(), error = %e, "Failed to persist dataset");
                return Err(e);
            }
            debug!(path = %path.display(), count = next.len(), "Dataset persisted");
        }
        inner.records = next;
        Ok(())
    }
}

impl<R: Record> Store<R> for JsonFileStore<R> {
    fn list(&self) -> Result<Vec<R>> {
        Ok(self.lock()?.records.clone())
    }

    fn find(&self, predicate: &dyn Fn(&R) -> bool) -> Result<Option<R>> {
        Ok(self.lock()?.records.iter().find(|&r| predicate(r)).cloned())
    }

    fn insert(&self, record: R) -> Result<R> {
        let mut inner = self.lock()?;
        let mut next = inner.records.clone();
        next.push(record.clone());
        self.commit(&mut inner, next)?;
        Ok(record)
    }

    fn insert_unique(&self, record: R, conflicts: &dyn Fn(&R) -> bool) -> Result<WriteOutcome<R>> {
        let mut inner = self.lock()?;
        if inner.records.iter().any(|r| conflicts(r)) {
            return Ok(WriteOutcome::Conflict);
        }
        let mut next = inner.records.clone();
        next.push(record.clone());
        self.commit(&mut inner, next)?;
        Ok(WriteOutcome::Written(record))
    }

    fn update(&self, id: &R::Id, mutate: &mut dyn FnMut(&mut R)) -> Result<Option<R>> {
        Ok(self.update_unique(id, &|_| false, mutate)?.into_written())
    }

    fn update_unique(
        &self,
        id: &R::Id,
        conflicts: &dyn Fn(&R) -> bool,
        mutate: &mut dyn FnMut(&mut R),
    ) -> Result<WriteOutcome<R>> {
        let mut inner = self.lock()?;
        let Some(index) = inner.records.iter().position(|r| r.id() == id) else {
            return Ok(WriteOutcome::Missing);
        };
        if inner
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && conflicts(r))
        {
            return Ok(WriteOutcome::Conflict);
        }

        let mut next = inner.records.clone();
        mutate(&mut next[index]);
        let updated = next[index].clone();
        self.commit(&mut inner, next)?;
        Ok(WriteOutcome::Written(updated))
    }

    fn delete(&self, id: &R::Id) -> Result<Option<R>> {
        let mut inner = self.lock()?;
        let Some(index) = inner.records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let mut next = inner.records.clone();
        let removed = next.remove(index);
        self.commit(&mut inner, next)?;
        Ok(Some(removed))
    }

    fn allocate_id(&self) -> Result<u64> {
        let mut inner = self.lock()?;
        let id = inner
            .sequence
            .checked_add(1)
            .ok_or_else(|| TasknestError::Storage("Id sequence exhausted".to_string()))?;
        if let Some(path) = &self.path {
            write_atomic(&sequence_path(path), id.to_string().as_bytes())?;
        }
        inner.sequence = id;
        Ok(id)
    }

    fn reload(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let records = read_records::<R>(path)?;
        let mut inner = self.lock()?;
        inner.sequence = inner.sequence.max(max_sequence(&records));
        debug!(path = %path.display(), count = records.len(), "Dataset reloaded");
        inner.records = records;
        Ok(())
    }
}

impl<R> std::fmt::Debug for JsonFileStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileStore")
            .field("path", &self.path)
            .finish()
    }
}

// =============================================================================
// File helpers
// =============================================================================

fn read_records<R: Record>(path: &Path) -> Result<Vec<R>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&bytes).map_err(|e| {
        TasknestError::Storage(format!("Malformed dataset {}: {}", path.display(), e))
    })
}

fn read_sequence(path: &Path) -> Result<u64> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|e| {
        TasknestError::Storage(format!("Malformed id sequence {}: {}", path.display(), e))
    })
}

fn max_sequence<R: Record>(records: &[R]) -> u64 {
    records.iter().filter_map(|r| r.sequence()).max().unwrap_or(0)
}

fn sequence_path(path: &Path) -> PathBuf {
    with_suffix(path, ".seq")
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Write `bytes` to `path` via a temp file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = with_suffix(path, ".tmp");
    let mut file = File::create(&tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(&tmp, path).map_err(|e| {
        TasknestError::Storage(format!(
            "Failed to replace {} with {}: {}",
            path.display(),
            tmp.display(),
            e
        ))
    })
}
