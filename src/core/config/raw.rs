//! Raw TOML deserialization types.
//!
//! These structs mirror the TOML file shape and use `serde` defaults.
//! The `load` module converts them into the public `types` structs.

use serde::Deserialize;

// ── Top-level ────────────────────────────────────────────────────────────────

/// Raw TOML shape — serde target before resolution.
#[derive(Deserialize, Default)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub app: RawApp,
    #[serde(default)]
    pub llm: RawLlm,
    #[serde(default)]
    pub tutor: RawTutor,
    #[serde(default)]
    pub export: RawExport,
}

#[derive(Deserialize)]
pub(super) struct RawApp {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_work_dir")]
    pub work_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for RawApp {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            work_dir: default_work_dir(),
            log_level: default_log_level(),
            log_file: None,
        }
    }
}

// ── LLM ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawLlm {
    #[serde(rename = "default", default = "default_llm_provider")]
    pub provider: String,
    #[serde(default)]
    pub groq: RawEndpoint,
    #[serde(default)]
    pub openai: RawEndpoint,
}

impl Default for RawLlm {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            groq: RawEndpoint::default(),
            openai: RawEndpoint::default(),
        }
    }
}

/// Every field is optional so a partial table only overrides what it names;
/// missing fields fall back to the provider's defaults in `load`.
#[derive(Deserialize, Default)]
pub(super) struct RawEndpoint {
    pub api_base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub timeout_seconds: Option<u64>,
}

// ── Tutor ───────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawTutor {
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: String,
    #[serde(default = "default_subject")]
    pub subject: String,
    #[serde(default = "default_depth")]
    pub depth: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default = "default_context_turns")]
    pub context_turns: usize,
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

impl Default for RawTutor {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            subject: default_subject(),
            depth: default_depth(),
            style: default_style(),
            topic: None,
            context_turns: default_context_turns(),
            history_file: default_history_file(),
        }
    }
}

// ── Export ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct RawExport {
    #[serde(default = "default_export_dir")]
    pub dir: String,
    #[serde(default)]
    pub pdf: RawPageLayout,
}

impl Default for RawExport {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
            pdf: RawPageLayout::default(),
        }
    }
}

#[derive(Deserialize, Default)]
pub(super) struct RawPageLayout {
    pub page_width: Option<f32>,
    pub page_height: Option<f32>,
    pub left_margin: Option<f32>,
    pub top: Option<f32>,
    pub bottom_margin: Option<f32>,
    pub line_height: Option<f32>,
    pub font_size: Option<f32>,
}

// ── Defaults ────────────────────────────────────────────────────────────────

pub(super) fn default_app_name() -> String {
    "learngap".to_string()
}

pub(super) fn default_work_dir() -> String {
    "~/.learngap".to_string()
}

pub(super) fn default_log_level() -> String {
    "warn".to_string()
}

pub(super) fn default_llm_provider() -> String {
    "groq".to_string()
}

pub(super) fn default_groq_api_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

pub(super) fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

pub(super) fn default_openai_api_base_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

pub(super) fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

pub(super) fn default_temperature() -> f32 {
    0.3
}

pub(super) fn default_timeout_seconds() -> u64 {
    60
}

pub(super) fn default_prompts_dir() -> String {
    "config/prompts".to_string()
}

pub(super) fn default_subject() -> String {
    "General".to_string()
}

pub(super) fn default_depth() -> String {
    "Basic".to_string()
}

pub(super) fn default_style() -> String {
    "Simple".to_string()
}

pub(super) fn default_context_turns() -> usize {
    20
}

pub(super) fn default_history_file() -> String {
    "learning_history.jsonl".to_string()
}

pub(super) fn default_export_dir() -> String {
    "exports".to_string()
}
