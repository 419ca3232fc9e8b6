//! Session summary — a plain-text recap of the current session's questions.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};

use crate::subsystems::memory::SessionRecord;

use super::selection::Subject;

/// Returned in place of a summary when nothing has been asked yet.
pub const EMPTY_SUMMARY: &str = "No questions asked yet in this session.";

pub const REFLECTION_PROMPTS: [&str; 3] = [
    "Which concept feels clearer now than at the start of the session?",
    "Which question would you still struggle to explain to a friend?",
    "What will you practise next to close the remaining gap?",
];

/// Structured recap of one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub topic: String,
    pub generated_at: String,
    pub total_questions: usize,
    /// Distinct subjects.
    pub subjects: BTreeSet<Subject>,
    /// Questions in the order they were asked.
    pub questions: Vec<String>,
}

impl SessionSummary {
    /// Render one line per field, in a fixed order.
    pub fn render(&self) -> String {
        let mut labels: Vec<&str> = self.subjects.iter().map(|s| s.label()).collect();
        labels.sort_unstable();
        let subjects = labels.join(", ");

        let mut lines = vec![
            "Learning Session Summary".to_string(),
            format!("Topic: {}", self.topic),
            format!("Generated: {}", self.generated_at),
            format!("Total Questions: {}", self.total_questions),
            format!("Subjects Covered: {subjects}"),
            String::new(),
            "Questions Asked:".to_string(),
        ];
        lines.extend(
            self.questions
                .iter()
                .enumerate()
                .map(|(i, q)| format!("{}. {}", i + 1, single_line(q))),
        );
        lines.push(String::new());
        lines.push("Reflection:".to_string());
        lines.extend(REFLECTION_PROMPTS.iter().map(|p| format!("- {p}")));
        lines.join("\n")
    }
}

/// Build a summary of `records`, or `None` when the session is empty.
pub fn summarize(
    topic: Option<&str>,
    records: &[SessionRecord],
    generated_at: DateTime<Local>,
) -> Option<SessionSummary> {
    if records.is_empty() {
        return None;
    }
    Some(SessionSummary {
        topic: topic.unwrap_or("General").to_string(),
        generated_at: generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        total_questions: records.len(),
        subjects: records.iter().map(|r| r.subject).collect(),
        questions: records.iter().map(|r| r.question.clone()).collect(),
    })
}

/// Summary text for display and export; [`EMPTY_SUMMARY`] for an empty session.
pub fn summary_text(
    topic: Option<&str>,
    records: &[SessionRecord],
    generated_at: DateTime<Local>,
) -> String {
    summarize(topic, records, generated_at)
        .map(|s| s.render())
        .unwrap_or_else(|| EMPTY_SUMMARY.to_string())
}

/// Keep one logical line per question.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::memory::RecordMeta;
    use crate::subsystems::tutor::selection::{RefinementMode, Selection};
    use chrono::{TimeZone, Utc};

    fn rec(subject: Subject, q: &str) -> SessionRecord {
        let meta = RecordMeta {
            topic: None,
            selection: Selection { subject, ..Selection::default() },
            refinement: RefinementMode::None,
        };
        SessionRecord::new("s", q, "a", meta, Utc::now())
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn empty_log_is_none_and_sentinel() {
        assert!(summarize(Some("x"), &[], at()).is_none());
        assert_eq!(summary_text(Some("x"), &[], at()), EMPTY_SUMMARY);
    }

    #[test]
    fn counts_questions_and_dedups_subjects() {
        let records = vec![
            rec(Subject::Math, "What is a prime?"),
            rec(Subject::Science, "Why is the sky blue?"),
            rec(Subject::Math, "What is a factor?"),
            rec(Subject::Math, "What is a multiple?"),
        ];
        let s = summarize(Some("Numbers"), &records, at()).unwrap();
        assert_eq!(s.total_questions, 4);
        assert_eq!(s.subjects, BTreeSet::from([Subject::Math, Subject::Science]));
        assert_eq!(s.questions[2], "What is a factor?");

        let text = s.render();
        assert!(text.contains("Total Questions: 4"));
        assert!(text.contains("Subjects Covered: Math, Science"));
        assert!(text.contains("Generated: 2026-03-14 09:26:53"));
    }

    #[test]
    fn render_field_order() {
        let s = summarize(Some("Cells"), &[rec(Subject::Science, "What is a cell?")], at()).unwrap();
        let text = s.render();
        let order = [
            "Topic: Cells",
            "Generated:",
            "Total Questions:",
            "Subjects Covered:",
            "Questions Asked:",
            "1. What is a cell?",
            "Reflection:",
        ];
        let positions: Vec<usize> = order.iter().map(|p| text.find(p).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for p in REFLECTION_PROMPTS {
            assert!(text.contains(p));
        }
    }

    #[test]
    fn subjects_render_alphabetically() {
        let records = vec![
            rec(Subject::Science, "a"),
            rec(Subject::ComputerScience, "b"),
            rec(Subject::Economics, "c"),
        ];
        let text = summarize(None, &records, at()).unwrap().render();
        assert!(text.contains("Subjects Covered: Computer Science, Economics, Science"));
    }

    #[test]
    fn multiline_question_stays_on_one_line() {
        let s = summarize(None, &[rec(Subject::General, "line one\nline two")], at()).unwrap();
        assert!(s.render().contains("1. line one line two"));
        assert_eq!(s.topic, "General");
    }
}
