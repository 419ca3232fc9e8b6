//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory,
//! then applies `LEARNGAP_WORK_DIR` and `LEARNGAP_LOG_LEVEL` env overrides.
//! The completion credential comes from `GROQ_API_KEY` / `LLM_API_KEY` only.
//!
//! # Module layout
//!
//! - **types** — Public configuration structs consumed by subsystems
//!   (`Config`, `LlmConfig`, `TutorConfig`, `ExportConfig`).
//! - **raw** — Raw TOML deserialization types (`RawConfig`, `RawLlm`, …).
//!   These mirror the file shape and use serde defaults; kept private.
//! - **load** — Loading logic: `merge_toml`, `load_raw_merged`, `load`,
//!   `load_from`, `expand_home`.

mod load;
mod raw;
mod types;

pub use load::{expand_home, load, load_from};
pub use types::*;

impl Config {
    /// Offline `Config` rooted at `work_dir`: dummy LLM, no API key, built-in prompts.
    /// Used by tests and demos that must never reach the network.
    pub fn offline(work_dir: &std::path::Path) -> Self {
        let endpoint = |url: &str, model: &str| EndpointConfig {
            api_base_url: url.into(),
            model: model.into(),
            temperature: 0.0,
            timeout_seconds: 1,
        };
        Self {
            app_name: "test".into(),
            work_dir: work_dir.to_path_buf(),
            log_level: "info".into(),
            log_file: None,
            llm: LlmConfig {
                provider: "dummy".into(),
                groq: endpoint("http://localhost:0/v1/chat/completions", "test-model"),
                openai: endpoint("http://localhost:0/v1/chat/completions", "test-model"),
            },
            llm_api_key: None,
            tutor: TutorConfig {
                prompts_dir: work_dir.join("prompts"),
                selection: crate::subsystems::tutor::selection::Selection::default(),
                topic: None,
                context_turns: 20,
                history_file: work_dir.join("learning_history.jsonl"),
            },
            export: ExportConfig {
                dir: work_dir.join("exports"),
                pdf: PageLayout::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subsystems::tutor::selection::{Depth, Style, Subject};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const MINIMAL_TOML: &str = r#"
[app]
name = "test-tutor"
work_dir = "/tmp/learngap-test"
log_level = "info"
"#;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn parse_basic_config() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.app_name, "test-tutor");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.llm.provider, "groq");
        assert_eq!(cfg.llm.groq.model, "llama-3.3-70b-versatile");
    }

    #[test]
    fn empty_file_uses_defaults() {
        let f = write_toml("");
        let cfg = load_from(f.path(), Some("/tmp/wd"), None).unwrap();
        assert_eq!(cfg.log_level, "warn");
        assert_eq!(cfg.tutor.context_turns, 20);
        assert_eq!(cfg.tutor.selection.subject, Subject::General);
        assert_eq!(
            cfg.tutor.history_file,
            std::path::PathBuf::from("/tmp/wd/learning_history.jsonl")
        );
        assert_eq!(cfg.export.dir, std::path::PathBuf::from("/tmp/wd/exports"));
        assert_eq!(cfg.export.pdf, PageLayout::default());
    }

    #[test]
    fn tutor_selections_parse() {
        let toml = r#"
[tutor]
subject = "computer science"
depth = "Detailed"
style = "step-by-step"
topic = "  Recursion "
context_turns = 4
"#;
        let f = write_toml(toml);
        let cfg = load_from(f.path(), None, None).unwrap();
        assert_eq!(cfg.tutor.selection.subject, Subject::ComputerScience);
        assert_eq!(cfg.tutor.selection.depth, Depth::Detailed);
        assert_eq!(cfg.tutor.selection.style, Style::StepByStep);
        assert_eq!(cfg.tutor.topic.as_deref(), Some("Recursion"));
        assert_eq!(cfg.tutor.context_turns, 4);
    }

    #[test]
    fn blank_topic_is_none() {
        let f = write_toml("[tutor]\ntopic = \"   \"\n");
        let cfg = load_from(f.path(), None, None).unwrap();
        assert!(cfg.tutor.topic.is_none());
    }

    #[test]
    fn invalid_subject_is_config_error() {
        let f = write_toml("[tutor]\nsubject = \"astrology\"\n");
        let err = load_from(f.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("config error"));
        assert!(err.to_string().contains("astrology"));
    }

    #[test]
    fn partial_endpoint_keeps_defaults() {
        let toml = r#"
[llm]
default = "openai"

[llm.openai]
model = "gpt-4.1-mini"
"#;
        let f = write_toml(toml);
        let cfg = load_from(f.path(), None, None).unwrap();
        let active = cfg.llm.active_endpoint().unwrap();
        assert_eq!(active.model, "gpt-4.1-mini");
        assert_eq!(active.api_base_url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(active.timeout_seconds, 60);
    }

    #[test]
    fn dummy_provider_has_no_endpoint() {
        let cfg = Config::offline(std::path::Path::new("/tmp"));
        assert!(cfg.llm.active_endpoint().is_none());
    }

    #[test]
    fn pdf_layout_rejects_zero_line_height() {
        let f = write_toml("[export.pdf]\nline_height = 0.0\n");
        let err = load_from(f.path(), None, None).unwrap_err();
        assert!(err.to_string().contains("line_height"));
    }

    #[test]
    fn pdf_layout_rejects_top_below_margin() {
        let f = write_toml("[export.pdf]\ntop = 30.0\nbottom_margin = 40.0\n");
        assert!(load_from(f.path(), None, None).is_err());
    }

    #[test]
    fn absolute_history_file_kept() {
        let f = write_toml("[tutor]\nhistory_file = \"/var/tmp/h.jsonl\"\n");
        let cfg = load_from(f.path(), Some("/tmp/wd"), None).unwrap();
        assert_eq!(cfg.tutor.history_file, std::path::PathBuf::from("/var/tmp/h.jsonl"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = dirs::home_dir().expect("home dir must exist in test env");
        let expanded = expand_home("~/.learngap");
        assert!(expanded.starts_with(&home));
        assert!(expanded.ends_with(".learngap"));
    }

    #[test]
    fn relative_path_unchanged() {
        let p = expand_home("relative/path");
        assert_eq!(p, std::path::PathBuf::from("relative/path"));
    }

    #[test]
    fn missing_file_errors() {
        let result = load_from(std::path::Path::new("/nonexistent/config.toml"), None, None);
        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("config error"));
    }

    #[test]
    fn env_overrides_win() {
        let f = write_toml(MINIMAL_TOML);
        let cfg = load_from(f.path(), Some("/tmp/test-override"), Some("debug")).unwrap();
        assert_eq!(cfg.work_dir, std::path::PathBuf::from("/tmp/test-override"));
        assert_eq!(cfg.log_level, "debug");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let f = write_toml("[app]\nlog_level = \"verbose\"\n");
        let msg = load_from(f.path(), None, None).unwrap_err().to_string();
        assert!(msg.contains("config error"), "got: {msg}");
        assert!(msg.contains("verbose"), "got: {msg}");

        let f = write_toml(MINIMAL_TOML);
        assert!(load_from(f.path(), None, Some("loud")).is_err());
        let cfg = load_from(f.path(), None, Some(" WARN ")).unwrap();
        assert_eq!(cfg.log_level, "warn");
    }

    const BASE_TOML: &str = r#"
[app]
name = "base-tutor"
work_dir = "/tmp/base"
log_level = "info"

[llm.groq]
model = "llama-base"
temperature = 0.1
"#;

    fn write_named(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        std::fs::write(&p, content).unwrap();
        p
    }

    #[test]
    fn overlay_wins_scalar_and_keeps_base() {
        let dir = TempDir::new().unwrap();
        write_named(&dir, "base.toml", BASE_TOML);
        let overlay = r#"
[meta]
base = "base.toml"

[llm.groq]
model = "llama-overlay"
"#;
        let overlay_path = write_named(&dir, "overlay.toml", overlay);
        let cfg = load_from(&overlay_path, None, None).unwrap();
        assert_eq!(cfg.app_name, "base-tutor");
        assert_eq!(cfg.llm.groq.model, "llama-overlay");
        assert_eq!(cfg.llm.groq.temperature, 0.1);
    }

    #[test]
    fn cycle_detection() {
        let dir = TempDir::new().unwrap();
        let self_path = dir.path().join("self.toml");
        let content = format!("[meta]\nbase = \"{}\"\n\n{BASE_TOML}", self_path.display());
        std::fs::write(&self_path, content).unwrap();
        let msg = load_from(&self_path, None, None).unwrap_err().to_string();
        assert!(msg.contains("circular"));
    }
}
