//! Public configuration types.
//!
//! These are the resolved, ready-to-use structs that subsystems consume.
//! Raw TOML deserialization types live in `raw.rs`.

use std::path::PathBuf;

use crate::subsystems::tutor::selection::Selection;

// ── LLM ──────────────────────────────────────────────────────────────────────

/// Settings for one OpenAI-compatible endpoint.
/// Populated from `[llm.groq]` or `[llm.openai]` in the TOML.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Full chat completions endpoint URL.
    pub api_base_url: String,
    /// Model name passed in the request body.
    pub model: String,
    /// Sampling temperature (ignored for models that forbid it).
    pub temperature: f32,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
}

/// LLM subsystem configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Active provider name: `"groq"`, `"openai"` or `"dummy"`.
    pub provider: String,
    pub groq: EndpointConfig,
    pub openai: EndpointConfig,
}

impl LlmConfig {
    /// Endpoint settings for the active provider, if it is a remote one.
    pub fn active_endpoint(&self) -> Option<&EndpointConfig> {
        match self.provider.as_str() {
            "groq" => Some(&self.groq),
            "openai" | "openai-compatible" => Some(&self.openai),
            _ => None,
        }
    }
}

// ── Tutor ────────────────────────────────────────────────────────────────────

/// Tutor session defaults and storage.
#[derive(Debug, Clone)]
pub struct TutorConfig {
    /// Directory holding `system.md` / `turn.md` prompt templates.
    pub prompts_dir: PathBuf,
    /// Selections a new session starts with.
    pub selection: Selection,
    /// Topic a new session starts with.
    pub topic: Option<String>,
    /// Maximum number of prior turns sent as conversation context.
    pub context_turns: usize,
    /// Append-only JSON Lines history log (resolved against `work_dir`).
    pub history_file: PathBuf,
}

// ── Export ───────────────────────────────────────────────────────────────────

/// Fixed page geometry for the PDF summary, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub left_margin: f32,
    /// Baseline of the first line on every page.
    pub top: f32,
    /// A new page starts once the cursor drops below this value.
    pub bottom_margin: f32,
    pub line_height: f32,
    pub font_size: f32,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            left_margin: 40.0,
            top: 750.0,
            bottom_margin: 40.0,
            line_height: 15.0,
            font_size: 10.0,
        }
    }
}

/// Export subsystem configuration.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Default output directory (resolved against `work_dir`).
    pub dir: PathBuf,
    pub pdf: PageLayout,
}

// ── Top-level ────────────────────────────────────────────────────────────────

/// Fully-resolved application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub work_dir: PathBuf,
    pub log_level: String,
    /// When set, tracing output goes to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub llm: LlmConfig,
    /// Sourced from `GROQ_API_KEY` / `LLM_API_KEY` env (never TOML).
    pub llm_api_key: Option<String>,
    pub tutor: TutorConfig,
    pub export: ExportConfig,
}
