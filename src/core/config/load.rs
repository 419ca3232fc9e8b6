//! Configuration loading with env-var overrides.
//!
//! Reads TOML files, supports `[meta] base = "..."` inheritance chains,
//! and applies `LEARNGAP_WORK_DIR` and `LEARNGAP_LOG_LEVEL` env overrides.

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;
use crate::logger;
use crate::subsystems::tutor::selection::{Depth, Selection, Style, Subject};

use super::raw::{self, RawConfig, RawEndpoint, RawPageLayout};
use super::types::*;

/// Env vars checked, in order, for the completion endpoint credential.
const API_KEY_VARS: [&str; 2] = ["GROQ_API_KEY", "LLM_API_KEY"];

/// Deep-merge two TOML values.
/// Tables are merged recursively — the overlay only needs to specify keys that
/// differ from the base. For every other type (string, integer, array, …)
/// the overlay value replaces the base value wholesale.
fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_tbl), toml::Value::Table(overlay_tbl)) => {
            for (key, ov_val) in overlay_tbl {
                let merged = match base_tbl.remove(&key) {
                    Some(base_val) => merge_toml(base_val, ov_val),
                    None => ov_val,
                };
                base_tbl.insert(key, merged);
            }
            toml::Value::Table(base_tbl)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file, follow any `[meta] base = "..."` chain, and return the
/// fully merged `toml::Value`. `visited` carries canonicalized paths already
/// seen in this chain so circular references are caught early.
fn load_raw_merged(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<toml::Value, AppError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(AppError::Config(format!(
            "circular base reference detected at: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let overlay_val: toml::Value = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if let Some(base_str) = overlay_val
        .get("meta")
        .and_then(|m| m.get("base"))
        .and_then(|b| b.as_str())
    {
        let base_path = if Path::new(base_str).is_absolute() {
            PathBuf::from(base_str)
        } else {
            path.parent().unwrap_or(Path::new(".")).join(base_str)
        };
        let base_val = load_raw_merged(&base_path, visited)?;
        Ok(merge_toml(base_val, overlay_val))
    } else {
        Ok(overlay_val)
    }
}

/// Load config from the given path, or `config/default.toml`, then apply env-var overrides.
/// If no path is given and `config/default.toml` does not exist, the built-in defaults are used.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let work_dir_override = env::var("LEARNGAP_WORK_DIR").ok();
    let log_level_override = env::var("LEARNGAP_LOG_LEVEL").ok();

    if let Some(path) = config_path {
        return load_from(
            Path::new(path),
            work_dir_override.as_deref(),
            log_level_override.as_deref(),
        );
    }

    let default_path = Path::new("config/default.toml");
    if default_path.exists() {
        load_from(
            default_path,
            work_dir_override.as_deref(),
            log_level_override.as_deref(),
        )
    } else {
        resolve(
            RawConfig::default(),
            work_dir_override.as_deref(),
            log_level_override.as_deref(),
        )
    }
}

/// Internal loader — accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
/// Follows `[meta] base = "..."` inheritance chains before resolving.
pub fn load_from(
    path: &Path,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let merged_val = load_raw_merged(path, &mut HashSet::new())?;

    let parsed: RawConfig = Deserialize::deserialize(merged_val).map_err(|e: toml::de::Error| {
        AppError::Config(format!("config error in {}: {e}", path.display()))
    })?;

    resolve(parsed, work_dir_override, log_level_override)
}

/// Turn the raw TOML shape into the resolved [`Config`].
fn resolve(
    parsed: RawConfig,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let app = parsed.app;

    let work_dir = expand_home(work_dir_override.unwrap_or(&app.work_dir));
    let log_level = log_level_override.unwrap_or(&app.log_level).trim().to_lowercase();
    // EnvFilter would accept a typo as a target directive; reject it here instead.
    logger::parse_level(&log_level).map_err(|_| {
        AppError::Config(format!(
            "invalid log_level '{log_level}' (expected one of: off, error, warn, info, debug, trace)"
        ))
    })?;
    let log_file = app.log_file.map(|p| under(&work_dir, &p));

    let tutor = parsed.tutor;
    let selection = Selection {
        subject: tutor.subject.parse::<Subject>().map_err(AppError::Config)?,
        depth: tutor.depth.parse::<Depth>().map_err(AppError::Config)?,
        style: tutor.style.parse::<Style>().map_err(AppError::Config)?,
    };
    let topic = tutor
        .topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let pdf = resolve_layout(parsed.export.pdf)?;

    Ok(Config {
        app_name: app.name,
        log_level,
        log_file,
        llm: LlmConfig {
            provider: parsed.llm.provider,
            groq: resolve_endpoint(
                parsed.llm.groq,
                raw::default_groq_api_base_url,
                raw::default_groq_model,
            ),
            openai: resolve_endpoint(
                parsed.llm.openai,
                raw::default_openai_api_base_url,
                raw::default_openai_model,
            ),
        },
        llm_api_key: api_key_from_env(),
        tutor: TutorConfig {
            prompts_dir: expand_home(&tutor.prompts_dir),
            selection,
            topic,
            context_turns: tutor.context_turns,
            history_file: under(&work_dir, &tutor.history_file),
        },
        export: ExportConfig {
            dir: under(&work_dir, &parsed.export.dir),
            pdf,
        },
        work_dir,
    })
}

fn resolve_endpoint(
    endpoint: RawEndpoint,
    default_url: fn() -> String,
    default_model: fn() -> String,
) -> EndpointConfig {
    EndpointConfig {
        api_base_url: endpoint.api_base_url.unwrap_or_else(default_url),
        model: endpoint.model.unwrap_or_else(default_model),
        temperature: endpoint.temperature.unwrap_or_else(raw::default_temperature),
        timeout_seconds: endpoint
            .timeout_seconds
            .unwrap_or_else(raw::default_timeout_seconds)
            .max(1),
    }
}

fn resolve_layout(pdf: RawPageLayout) -> Result<PageLayout, AppError> {
    let d = PageLayout::default();
    let layout = PageLayout {
        page_width: pdf.page_width.unwrap_or(d.page_width),
        page_height: pdf.page_height.unwrap_or(d.page_height),
        left_margin: pdf.left_margin.unwrap_or(d.left_margin),
        top: pdf.top.unwrap_or(d.top),
        bottom_margin: pdf.bottom_margin.unwrap_or(d.bottom_margin),
        line_height: pdf.line_height.unwrap_or(d.line_height),
        font_size: pdf.font_size.unwrap_or(d.font_size),
    };

    // A page must fit at least one line, otherwise pagination never advances.
    if layout.line_height <= 0.0 {
        return Err(AppError::Config("export.pdf.line_height must be positive".into()));
    }
    if layout.top <= layout.bottom_margin || layout.top > layout.page_height {
        return Err(AppError::Config(format!(
            "export.pdf.top ({}) must lie between bottom_margin ({}) and page_height ({})",
            layout.top, layout.bottom_margin, layout.page_height
        )));
    }
    Ok(layout)
}

/// First non-empty credential among [`API_KEY_VARS`].
fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Expand `~` and resolve relative paths against `base`.
fn under(base: &Path, path: &str) -> PathBuf {
    let p = expand_home(path);
    if p.is_absolute() { p } else { base.join(p) }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
