//! Transcript and history record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::subsystems::tutor::selection::{Depth, RefinementMode, Selection, Style, Subject};

/// Who produced a [`Turn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Student,
    Assistant,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::Student => "Student",
            Speaker::Assistant => "AI Assistant",
        }
    }
}

/// One utterance in the visible transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
}

impl Turn {
    pub fn student(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Student, text: text.into() }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self { speaker: Speaker::Assistant, text: text.into() }
    }
}

/// Selection metadata attached to a record at creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordMeta {
    pub topic: Option<String>,
    pub selection: Selection,
    pub refinement: RefinementMode,
}

/// Durable record of one question/answer exchange.
///
/// Serialised as one JSON object per line in the history log. Immutable once
/// created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub subject: Subject,
    pub depth: Depth,
    pub style: Style,
    #[serde(default)]
    pub refinement: RefinementMode,
    pub question: String,
    pub response: String,
}

impl SessionRecord {
    pub fn new(
        session_id: &str,
        question: &str,
        response: &str,
        meta: RecordMeta,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            session_id: session_id.to_string(),
            topic: meta.topic,
            subject: meta.selection.subject,
            depth: meta.selection.depth,
            style: meta.selection.style,
            refinement: meta.refinement,
            question: question.to_string(),
            response: response.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_json_uses_readable_labels() {
        let meta = RecordMeta {
            topic: None,
            selection: Selection {
                subject: Subject::ComputerScience,
                depth: Depth::Intermediate,
                style: Style::StepByStep,
            },
            refinement: RefinementMode::None,
        };
        let rec = SessionRecord::new("s1", "What is a stack?", "LIFO.", meta, Utc::now());
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["subject"], "Computer Science");
        assert_eq!(json["style"], "Step-by-Step");
        assert_eq!(json["refinement"], "none");
        assert!(json.get("topic").is_none());
    }

    #[test]
    fn refinement_defaults_when_absent() {
        let line = r#"{"timestamp":"2026-01-02T03:04:05Z","session_id":"s","subject":"Math","depth":"Basic","style":"Simple","question":"q","response":"r"}"#;
        let rec: SessionRecord = serde_json::from_str(line).unwrap();
        assert_eq!(rec.refinement, RefinementMode::None);
        assert!(rec.topic.is_none());
    }
}
