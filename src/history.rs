//! # Interaction history store
//!
//! Durable, append-only log of classified interactions. One store owns one
//! JSON file (the fixed "storage key"); every user of that store shares the
//! same log. Reads come from an in-memory copy loaded once at open;
//! mutations rewrite the file through a temp-then-rename so a reader never
//! observes a partial write. A corrupt or unreadable file degrades to an
//! empty log rather than failing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::NeurotapError;

/// Default storage key. Matches the single localStorage-style slot the
/// prototypes used: one file, one ordered list, no per-user partitioning.
pub const DEFAULT_HISTORY_KEY: &str = "neurotap_history.json";

// ---------------------------------------------------------------------------
// Entry
// ---------------------------------------------------------------------------

/// One classified interaction. Immutable once appended; `color` is
/// denormalized from the matched tone entry at write time and never
/// recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub text: String,
    pub tone: String,
    pub color: String,
    /// Unix-epoch milliseconds. Non-decreasing across the log in insertion
    /// order — the store clamps a backwards clock on append.
    pub timestamp: u64,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Append-only log with single-writer semantics. `append` and `clear`
/// serialize against each other through the interior mutex.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    log: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Open the store at `path`, loading whatever valid log is already
    /// there. Missing or corrupt files yield an empty log.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let log = read_log(&path);
        debug!(entries = log.len(), path = %path.display(), "history store opened");
        HistoryStore {
            path,
            log: Mutex::new(log),
        }
    }

    /// Append one entry to the end of the log and persist. Previously
    /// stored entries are never lost or reordered. The entry's timestamp is
    /// clamped so the log stays monotonically non-decreasing even if the
    /// wall clock steps backwards.
    pub fn append(&self, mut entry: HistoryEntry) -> Result<(), NeurotapError> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(last) = log.last() {
            if entry.timestamp < last.timestamp {
                entry.timestamp = last.timestamp;
            }
        }
        log.push(entry);
        self.persist(&log)
    }

    /// All entries in original insertion order. An empty store returns an
    /// empty vec, never an error.
    pub fn load_all(&self) -> Vec<HistoryEntry> {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Display view: most recent entry first. Pure transformation of
    /// [`load_all`], storage order is untouched.
    pub fn recent_first(&self) -> Vec<HistoryEntry> {
        let mut entries = self.load_all();
        entries.reverse();
        entries
    }

    /// Destroy all entries. Observable as an immediately empty
    /// [`load_all`].
    pub fn clear(&self) -> Result<(), NeurotapError> {
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.clear();
        self.persist(&log)
    }

    pub fn len(&self) -> usize {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full log to disk. Temp file + rename keeps the visible
    /// file whole at every instant.
    fn persist(&self, log: &[HistoryEntry]) -> Result<(), NeurotapError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(log)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Defensive load: any failure — missing file, I/O error, malformed JSON —
/// is treated as an empty log. History corruption must never be fatal.
fn read_log(path: &Path) -> Vec<HistoryEntry> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return Vec::new(),
    };
    match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), %err, "history log unreadable, starting empty");
            Vec::new()
        }
    }
}
