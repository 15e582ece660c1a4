use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::records::RecordSet;
use crate::traits::RecordSetAccess;

/// Record store persisted as a single JSON document.
///
/// Every mutation is applied to a copy of the record set, written to a
/// temporary file in the same directory, and renamed over the data file.
/// Only after the rename succeeds does the copy replace the in-memory set,
/// so a failed write changes nothing.
pub struct JsonFileRecordStore {
    path: PathBuf,
    records: RwLock<RecordSet>,
}

impl JsonFileRecordStore {
    /// Open the store at `path`, creating an empty one if the file does not
    /// exist. A file that exists but cannot be parsed is an error.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = if path.exists() {
            let bytes = fs::read(&path)?;
            let mut records: RecordSet =
                serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            records.reindex().map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                reason: e.to_string(),
            })?;
            info!(
                path = %path.display(),
                users = records.user_count(),
                shifts = records.shift_count(),
                "opened record file"
            );
            records
        } else {
            fs::create_dir_all(parent_dir(&path))?;
            info!(path = %path.display(), "creating new record file");
            RecordSet::new()
        };
        Ok(Self {
            path,
            records: RwLock::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, records: &RecordSet) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent_dir(&self.path))?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        debug!(path = %self.path.display(), bytes = json.len(), "persisted record file");
        Ok(())
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl RecordSetAccess for JsonFileRecordStore {
    const BACKEND: &'static str = "file";

    fn with_set<T>(&self, f: impl FnOnce(&RecordSet) -> T) -> StoreResult<T> {
        let set = self.records.read().map_err(|_| StoreError::poisoned())?;
        Ok(f(&set))
    }

    fn mutate<T>(&self, f: impl FnOnce(&mut RecordSet) -> StoreResult<T>) -> StoreResult<T> {
        let mut set = self.records.write().map_err(|_| StoreError::poisoned())?;
        let mut next = set.clone();
        let out = f(&mut next)?;
        self.persist(&next).map_err(|e| match e {
            StoreError::Io(io) => StoreError::Unavailable(format!(
                "cannot write {}: {io}",
                self.path.display()
            )),
            other => other,
        })?;
        *set = next;
        Ok(out)
    }
}

impl std::fmt::Debug for JsonFileRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileRecordStore")
            .field("path", &self.path)
            .finish()
    }
}
