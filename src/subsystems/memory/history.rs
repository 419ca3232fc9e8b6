//! Cumulative question/answer history — an append-only JSON Lines file.
//!
//! ## On-disk format
//!
//! One [`SessionRecord`] serialised as a JSON object per line, in creation
//! order, across every session that ever used the file. Records are only ever
//! appended with a single write; the file is never rewritten, so there is no
//! read-modify-write window in which an update could be lost.
//!
//! Reading is forgiving: a missing file is created empty, an unreadable file
//! is treated as empty, and malformed lines are skipped. None of these
//! conditions reach the user.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::AppError;

use super::types::SessionRecord;

pub struct PersistedLog {
    path: PathBuf,
    /// Records known to be in the file (loaded + appended by this process).
    len: usize,
}

impl PersistedLog {
    /// Point at `path` without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), len: 0 }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Read every record from disk, creating an empty log if none exists.
    ///
    /// Never fails: I/O problems are logged and yield an empty history.
    pub fn load_persisted(&mut self) -> Vec<SessionRecord> {
        if let Err(e) = self.ensure_exists() {
            warn!(path = %self.path.display(), "history: {e}; continuing with empty history");
            self.len = 0;
            return Vec::new();
        }

        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "history: unreadable; treating as empty");
                self.len = 0;
                return Vec::new();
            }
        };

        let records = parse_lines(&text, &self.path);
        self.len = records.len();
        debug!(path = %self.path.display(), records = self.len, "history loaded");
        records
    }

    /// Append one record as a single line.
    pub fn append(&mut self, record: &SessionRecord) -> Result<(), AppError> {
        self.ensure_parent()?;

        let mut line = serde_json::to_string(record)
            .map_err(|e| AppError::History(format!("serialise record: {e}")))?;
        line.push('\n');

        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::History(format!("cannot open {}: {e}", self.path.display())))?;
        f.write_all(line.as_bytes())
            .map_err(|e| AppError::History(format!("write {}: {e}", self.path.display())))?;

        self.len += 1;
        Ok(())
    }

    fn ensure_parent(&self) -> Result<(), AppError> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
                .map_err(|e| AppError::History(format!("cannot create {}: {e}", parent.display()))),
            _ => Ok(()),
        }
    }

    fn ensure_exists(&self) -> Result<(), AppError> {
        self.ensure_parent()?;
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map(|_| ())
            .map_err(|e| AppError::History(format!("cannot create {}: {e}", self.path.display())))
    }
}

/// Parse JSON Lines, skipping blank and malformed lines.
fn parse_lines(text: &str, path: &Path) -> Vec<SessionRecord> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<SessionRecord>(line) {
            Ok(rec) => records.push(rec),
            Err(e) => {
                warn!(path = %path.display(), line = idx + 1, error = %e, "history: skipping malformed line");
            }
        }
    }
    records
}
