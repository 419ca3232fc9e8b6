//! Session memory — the in-memory transcript and session log, backed by the
//! cumulative on-disk history.
//!
//! [`SessionStore`] owns one active session:
//!
//! - **transcript** — ordered [`Turn`]s shown to the student.
//! - **records** — the [`SessionRecord`]s created in this session.
//! - **persisted** — the [`PersistedLog`] shared by every session that used the
//!   same history file.
//!
//! `reset` clears the first two and starts a new session id; the persisted
//! history only ever grows.

pub mod history;
pub mod types;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

pub use history::PersistedLog;
pub use types::{RecordMeta, SessionRecord, Speaker, Turn};

pub struct SessionStore {
    session_id: String,
    transcript: Vec<Turn>,
    records: Vec<SessionRecord>,
    persisted: PersistedLog,
}

impl SessionStore {
    /// Open a new session on top of `persisted`, loading it on first use.
    pub fn open(mut persisted: PersistedLog) -> Self {
        let existing = persisted.load_persisted();
        let session_id = new_session_id();
        info!(
            %session_id,
            history = %persisted.path().display(),
            persisted_records = existing.len(),
            "session opened"
        );
        Self {
            session_id,
            transcript: Vec::new(),
            records: Vec::new(),
            persisted,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn records(&self) -> &[SessionRecord] {
        &self.records
    }

    pub fn persisted(&self) -> &PersistedLog {
        &self.persisted
    }

    /// Record one completed exchange: two turns (student, then assistant) and
    /// one record in both the session log and the persisted history.
    ///
    /// A failed disk append is logged; the in-memory session keeps the turn.
    pub fn append_turn(&mut self, question: &str, answer: &str, meta: RecordMeta) -> &SessionRecord {
        self.transcript.push(Turn::student(question));
        self.transcript.push(Turn::assistant(answer));

        let record = SessionRecord::new(&self.session_id, question, answer, meta, Utc::now());
        if let Err(e) = self.persisted.append(&record) {
            warn!(session_id = %self.session_id, "history append failed: {e}");
        }
        self.records.push(record);
        &self.records[self.records.len() - 1]
    }

    /// Clear the transcript and session log and start a new session id.
    pub fn reset(&mut self) {
        let previous = std::mem::replace(&mut self.session_id, new_session_id());
        info!(
            previous_session = %previous,
            session_id = %self.session_id,
            dropped_turns = self.transcript.len(),
            "session reset"
        );
        self.transcript.clear();
        self.records.clear();
    }
}

fn new_session_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::tutor::selection::{RefinementMode, Selection, Subject};
    use tempfile::TempDir;

    fn meta(subject: Subject) -> RecordMeta {
        RecordMeta {
            topic: None,
            selection: Selection { subject, ..Selection::default() },
            refinement: RefinementMode::None,
        }
    }

    fn store(dir: &TempDir) -> SessionStore {
        SessionStore::open(PersistedLog::new(dir.path().join("h.jsonl")))
    }

    #[test]
    fn append_turn_adds_two_turns_and_one_record() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        s.append_turn("What is 2+2?", "4", meta(Subject::Math));

        assert_eq!(s.transcript(), &[Turn::student("What is 2+2?"), Turn::assistant("4")]);
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.records()[0].session_id, s.session_id());
        assert_eq!(s.persisted().len(), 1);
    }

    #[test]
    fn reset_keeps_persisted_history() {
        let dir = TempDir::new().unwrap();
        let mut s = store(&dir);
        s.append_turn("q1", "a1", meta(Subject::Science));
        s.append_turn("q2", "a2", meta(Subject::Science));
        let before = s.session_id().to_string();

        s.reset();

        assert!(s.transcript().is_empty());
        assert!(s.records().is_empty());
        assert_eq!(s.persisted().len(), 2);
        assert_ne!(s.session_id(), before);
    }

    #[test]
    fn reopened_store_sees_previous_sessions() {
        let dir = TempDir::new().unwrap();
        {
            let mut s = store(&dir);
            s.append_turn("q1", "a1", meta(Subject::General));
        }
        let mut s = store(&dir);
        assert_eq!(s.persisted().len(), 1);
        assert!(s.records().is_empty());
        s.append_turn("q2", "a2", meta(Subject::General));
        assert_eq!(s.persisted().len(), 2);
    }

    #[test]
    fn failed_append_keeps_in_memory_turn() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("h.jsonl");
        std::fs::create_dir(&path).unwrap();
        let mut s = SessionStore::open(PersistedLog::new(&path));
        s.append_turn("q", "a", meta(Subject::Math));
        assert_eq!(s.transcript().len(), 2);
        assert_eq!(s.records().len(), 1);
        assert_eq!(s.persisted().len(), 0);
    }
}
