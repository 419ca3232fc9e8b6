//! Tutor — command dispatch over one explicit session context.
//!
//! [`Tutor::handle`] consumes one [`Command`] at a time and returns a
//! [`Reply`] for the front end to render. Every action runs to completion
//! before the next one is accepted:
//!
//! ```text
//! Ask ─► build_messages ─► provider.complete ─► store.append_turn ─► Reply::Answer
//!                                  │
//!                                  └─ error ─► Reply::Error   (no state change)
//! ```
//!
//! Validation failures (empty question, nothing to refine) are warnings and
//! never touch the session.

pub mod commands;
pub mod export;
pub mod prompt;
pub mod selection;
pub mod summary;

use std::path::PathBuf;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::{Config, ExportConfig};
use crate::llm::LlmProvider;
use crate::subsystems::memory::{RecordMeta, SessionStore, Speaker};

use commands::{Command, ExportFormat};
use prompt::TurnRequest;
use selection::{RefinementMode, Selection};

pub const EMPTY_QUESTION: &str = "Enter a question first.";
pub const NOTHING_TO_REFINE: &str = "Ask a question first, then use /simpler or /examples.";

/// What the front end should show for one handled command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Assistant answer to a question.
    Answer(String),
    Info(String),
    /// Recoverable input problem; nothing changed.
    Warning(String),
    /// Remote-call or export failure; nothing changed.
    Error(String),
    Exit,
}

/// The active session context: selections, topic and stored turns.
pub struct TutorSession {
    pub topic: Option<String>,
    pub selection: Selection,
    pub store: SessionStore,
}

pub struct Tutor {
    provider: LlmProvider,
    prompts_dir: PathBuf,
    context_turns: usize,
    export: ExportConfig,
    session: TutorSession,
}

impl Tutor {
    pub fn new(config: &Config, provider: LlmProvider, store: SessionStore) -> Self {
        Self {
            provider,
            prompts_dir: config.tutor.prompts_dir.clone(),
            context_turns: config.tutor.context_turns,
            export: config.export.clone(),
            session: TutorSession {
                topic: config.tutor.topic.clone(),
                selection: config.tutor.selection,
                store,
            },
        }
    }

    pub fn session(&self) -> &TutorSession {
        &self.session
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    pub async fn handle(&mut self, command: Command) -> Reply {
        debug!(?command, "tutor: handling command");
        match command {
            Command::Ask(question) => self.ask(&question, RefinementMode::None).await,
            Command::Refine { mode, question } => {
                let question = match question {
                    Some(q) => q,
                    None => match self.last_question() {
                        Some(q) => q,
                        None => return Reply::Warning(NOTHING_TO_REFINE.to_string()),
                    },
                };
                self.ask(&question, mode).await
            }
            Command::Subject(subject) => {
                self.session.selection.subject = subject;
                Reply::Info(format!("Subject set to {subject}."))
            }
            Command::Depth(depth) => {
                self.session.selection.depth = depth;
                Reply::Info(format!("Learning depth set to {depth}."))
            }
            Command::Style(style) => {
                self.session.selection.style = style;
                Reply::Info(format!("Explanation style set to {style}."))
            }
            Command::Topic(topic) => {
                let reply = match &topic {
                    Some(t) => format!("Topic set to {t}."),
                    None => "Topic cleared.".to_string(),
                };
                self.session.topic = topic;
                Reply::Info(reply)
            }
            Command::History => Reply::Info(self.render_history()),
            Command::Summary => Reply::Info(self.summary_text()),
            Command::Export { format, path } => self.export(format, path),
            Command::Reset => {
                self.session.store.reset();
                Reply::Info("Started a new session.".to_string())
            }
            Command::Status => Reply::Info(self.render_status()),
            Command::Help => Reply::Info(commands::USAGE.to_string()),
            Command::Exit => Reply::Exit,
        }
    }

    async fn ask(&mut self, question: &str, refinement: RefinementMode) -> Reply {
        let question = question.trim();
        if question.is_empty() {
            return Reply::Warning(EMPTY_QUESTION.to_string());
        }

        let session = &self.session;
        let request = TurnRequest {
            question,
            topic: session.topic.as_deref(),
            selection: session.selection,
            refinement,
        };
        let messages = prompt::build_messages(
            &self.prompts_dir,
            &request,
            session.store.transcript(),
            self.context_turns,
        );

        info!(
            session_id = %session.store.session_id(),
            subject = %session.selection.subject,
            %refinement,
            messages = messages.len(),
            "tutor: asking"
        );

        let response = match self.provider.complete(&messages).await {
            Ok(r) => r,
            Err(e) => {
                warn!(provider = %self.provider.describe(), "completion failed: {e}");
                return Reply::Error(format!("Could not get an answer: {e}"));
            }
        };
        if let Some(usage) = response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "tutor: usage"
            );
        }

        let meta = RecordMeta {
            topic: self.session.topic.clone(),
            selection: self.session.selection,
            refinement,
        };
        self.session.store.append_turn(question, &response.text, meta);
        Reply::Answer(response.text)
    }

    fn last_question(&self) -> Option<String> {
        self.session
            .store
            .transcript()
            .iter()
            .rev()
            .find(|t| t.speaker == Speaker::Student)
            .map(|t| t.text.clone())
    }

    pub fn summary_text(&self) -> String {
        summary::summary_text(
            self.session.topic.as_deref(),
            self.session.store.records(),
            Local::now(),
        )
    }

    fn export(&self, format: ExportFormat, path: Option<PathBuf>) -> Reply {
        let result = match format {
            ExportFormat::Text => {
                let path = path.unwrap_or_else(|| self.export.dir.join(export::TEXT_FILE));
                export::export_text(&self.summary_text(), &path).map(|()| path)
            }
            ExportFormat::Pdf => self.export_pdf(&self.summary_text(), path),
            ExportFormat::Csv => {
                let path = path.unwrap_or_else(|| self.export.dir.join(export::CSV_FILE));
                export::export_records(self.session.store.records(), &path).map(|()| path)
            }
        };
        let what = match format {
            ExportFormat::Csv => "Session log",
            ExportFormat::Text | ExportFormat::Pdf => "Summary",
        };
        match result {
            Ok(path) => Reply::Info(format!("{what} exported to {}", path.display())),
            Err(e) => {
                warn!("export failed: {e}");
                Reply::Error(format!("Export failed: {e}"))
            }
        }
    }

    #[cfg(feature = "export-pdf")]
    fn export_pdf(&self, text: &str, path: Option<PathBuf>) -> Result<PathBuf, crate::error::AppError> {
        let path = path.unwrap_or_else(|| self.export.dir.join(export::PDF_FILE));
        export::export_document(text, &path, &self.export.pdf).map(|()| path)
    }

    #[cfg(not(feature = "export-pdf"))]
    fn export_pdf(&self, _text: &str, _path: Option<PathBuf>) -> Result<PathBuf, crate::error::AppError> {
        Err(crate::error::AppError::Export(
            "PDF export is not available in this build (enable the `export-pdf` feature)".to_string(),
        ))
    }

    fn render_history(&self) -> String {
        let transcript = self.session.store.transcript();
        if transcript.is_empty() {
            return "No conversation yet.".to_string();
        }
        transcript
            .iter()
            .map(|t| format!("{}: {}", t.speaker.label(), t.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_status(&self) -> String {
        let s = &self.session;
        let store = &s.store;
        [
            format!("provider:   {}", self.provider.describe()),
            format!("session:    {}", store.session_id()),
            format!("topic:      {}", s.topic.as_deref().unwrap_or("(none)")),
            format!("subject:    {}", s.selection.subject),
            format!("depth:      {}", s.selection.depth),
            format!("style:      {}", s.selection.style),
            format!("questions:  {} this session", store.records().len()),
            format!(
                "history:    {} records in {}",
                store.persisted().len(),
                store.persisted().path().display()
            ),
        ]
        .join("\n")
    }
}
