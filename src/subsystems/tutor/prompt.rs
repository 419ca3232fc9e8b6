//! Prompt assembly for the tutor.
//!
//! A request to the completion endpoint is an ordered message list:
//!
//! ```text
//! system     — fixed answer-format contract (system.md)
//! user       ┐
//! assistant  │ prior transcript, most recent `context_turns` turns
//! …          ┘
//! user       — selections + refinement + question (turn.md)
//! ```
//!
//! Both templates are read from the prompts directory when present and fall
//! back to built-in text otherwise. Variables use `{{key}}` syntax and are
//! substituted in a single pass, so text inside a substituted value (say a
//! question that itself contains `{{topic}}`) is never expanded again.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::llm::ChatMessage;
use crate::subsystems::memory::{Speaker, Turn};

use super::selection::{RefinementMode, Selection};

const SEPARATOR: &str = "\n\n";

pub const SYSTEM_FILE: &str = "system.md";
pub const TURN_FILE: &str = "turn.md";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an AI-powered Learning Gap Doubt-Solving Assistant for students.

Always answer using this format:

1) Concept Explanation - simple, clear, student-friendly
2) Real-World Example - short and relatable
3) Key-Point Summary - 3 to 5 bullet points
4) Common Misconceptions - clarify mistakes students usually make
5) Quick Practice Questions - 2 conceptual questions (no answers)
6) Follow-up Support - ask if they want a simpler explanation or more examples

Focus on conceptual clarity and learning improvement.
Avoid direct exam or cheating help.";

pub const DEFAULT_TURN_TEMPLATE: &str = "\
Topic: {{topic}}
Subject: {{subject}}
Subject Guidance: {{guidance}}
Learning Depth: {{depth}}
Explanation Style: {{style}}

{{refinement}}

Student Question:
{{question}}";

/// Shown in place of a missing topic.
const NO_TOPIC: &str = "Not specified";

/// Fluent builder that assembles a prompt from template layers.
pub struct PromptBuilder {
    prompts_dir: PathBuf,
    parts: Vec<String>,
    vars: HashMap<String, String>,
}

impl PromptBuilder {
    /// Create a builder rooted at `prompts_dir` (e.g. `"config/prompts"`).
    pub fn new(prompts_dir: impl Into<PathBuf>) -> Self {
        Self {
            prompts_dir: prompts_dir.into(),
            parts: Vec::new(),
            vars: HashMap::new(),
        }
    }

    /// Append a layer loaded from `filename`, or `fallback` when the file is
    /// missing or blank.
    pub fn layer_or(mut self, filename: &str, fallback: &str) -> Self {
        let path = self.prompts_dir.join(filename);
        let text = match fs::read_to_string(&path) {
            Ok(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::debug!("prompt: layer '{}' not found, using built-in", path.display());
                fallback.to_string()
            }
        };
        self.append(text)
    }

    /// Directly append a text fragment.
    pub fn append(mut self, text: impl Into<String>) -> Self {
        let s = text.into();
        let trimmed = s.trim();
        if !trimmed.is_empty() {
            self.parts.push(trimmed.to_string());
        }
        self
    }

    /// Register a single `{{key}}` → `value` substitution.
    pub fn var(mut self, key: &str, value: impl Into<String>) -> Self {
        self.vars.insert(key.to_string(), value.into());
        self
    }

    /// Join all layers with blank lines and substitute variables.
    pub fn build(self) -> String {
        let joined = self.parts.join(SEPARATOR);
        collapse_blank_runs(&render(&joined, &self.vars))
    }
}

/// Single-pass `{{key}}` substitution. Unknown keys are left as written.
fn render(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = after[..end].trim();
                match vars.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 2]),
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// Squash runs of blank lines left behind by empty variables.
fn collapse_blank_runs(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        if blank && out.last().is_none_or(|prev| prev.trim().is_empty()) {
            continue;
        }
        out.push(line);
    }
    while out.last().is_some_and(|l| l.trim().is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// Everything the per-turn prompt embeds.
#[derive(Debug, Clone, Copy)]
pub struct TurnRequest<'a> {
    pub question: &'a str,
    pub topic: Option<&'a str>,
    pub selection: Selection,
    pub refinement: RefinementMode,
}

/// The fixed answer-format instruction.
pub fn system_instruction(prompts_dir: impl AsRef<Path>) -> String {
    PromptBuilder::new(prompts_dir.as_ref())
        .layer_or(SYSTEM_FILE, DEFAULT_SYSTEM_PROMPT)
        .build()
}

/// The final user message for one question.
pub fn turn_prompt(prompts_dir: impl AsRef<Path>, req: &TurnRequest<'_>) -> String {
    let s = req.selection;
    PromptBuilder::new(prompts_dir.as_ref())
        .layer_or(TURN_FILE, DEFAULT_TURN_TEMPLATE)
        .var("topic", req.topic.unwrap_or(NO_TOPIC))
        .var("subject", s.subject.label())
        .var("guidance", s.subject.guidance())
        .var("depth", s.depth.label())
        .var("style", s.style.label())
        .var("refinement", req.refinement.instruction())
        .var("question", req.question.trim())
        .build()
}

/// The most recent `limit` turns, trimmed so the window opens on a student turn.
pub fn context_window(turns: &[Turn], limit: usize) -> &[Turn] {
    let start = turns.len().saturating_sub(limit);
    let mut window = &turns[start..];
    while let Some((first, rest)) = window.split_first() {
        if first.speaker == Speaker::Student {
            break;
        }
        window = rest;
    }
    window
}

/// Assemble the full message list for one completion request.
pub fn build_messages(
    prompts_dir: impl AsRef<Path>,
    req: &TurnRequest<'_>,
    prior_turns: &[Turn],
    context_turns: usize,
) -> Vec<ChatMessage> {
    let dir = prompts_dir.as_ref();
    let window = context_window(prior_turns, context_turns);

    let mut messages = Vec::with_capacity(window.len() + 2);
    messages.push(ChatMessage::system(system_instruction(dir)));
    for turn in window {
        messages.push(match turn.speaker {
            Speaker::Student => ChatMessage::user(&turn.text),
            Speaker::Assistant => ChatMessage::assistant(&turn.text),
        });
    }
    messages.push(ChatMessage::user(turn_prompt(dir, req)));
    messages
}
