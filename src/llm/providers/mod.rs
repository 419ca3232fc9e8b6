//! LLM provider implementations.
//!
//! `build(config, api_key)` is the factory; `from_config` is its startup
//! wrapper, where any build failure is a fatal configuration error.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod groq;
pub mod openai_compatible;

use crate::config::{Config, LlmConfig};
use crate::error::AppError;
use crate::llm::{LlmProvider, ProviderError};

/// Build the configured provider with the credential resolved from the environment.
pub fn from_config(config: &Config) -> Result<LlmProvider, AppError> {
    build(&config.llm, config.llm_api_key.clone()).map_err(|e| AppError::Config(e.to_string()))
}

/// Construct a `LlmProvider` from config and an optional API key.
///
/// `api_key` is sourced from `GROQ_API_KEY` / `LLM_API_KEY` env (never TOML).
/// Hosted providers refuse to build without one; `dummy` ignores it.
pub fn build(config: &LlmConfig, api_key: Option<String>) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "groq" => {
            let api_key = api_key.ok_or_else(|| ProviderError::MissingApiKey("groq".into()))?;
            let g = &config.groq;
            let p = groq::GroqProvider::new(
                g.api_base_url.clone(),
                g.model.clone(),
                g.temperature,
                g.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::Groq(p))
        }
        "openai" | "openai-compatible" => {
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?;
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
