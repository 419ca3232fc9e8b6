//! Groq chat completion provider.
//!
//! Groq serves an OpenAI-compatible API, so this wraps the generic provider
//! with `[llm.groq]` config and a mandatory API key.

use crate::llm::{ChatMessage, LlmResponse, ProviderError};

use super::openai_compatible::OpenAiCompatibleProvider;

#[derive(Debug, Clone)]
pub struct GroqProvider {
    inner: OpenAiCompatibleProvider,
}

impl GroqProvider {
    pub fn new(
        api_base_url: String,
        model: String,
        temperature: f32,
        timeout_seconds: u64,
        api_key: String,
    ) -> Result<Self, ProviderError> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey("groq".into()));
        }
        let inner = OpenAiCompatibleProvider::new(
            api_base_url,
            model,
            temperature,
            timeout_seconds,
            Some(api_key),
        )?;
        Ok(Self { inner })
    }

    pub fn model(&self) -> &str {
        self.inner.model()
    }

    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<LlmResponse, ProviderError> {
        self.inner.complete(messages).await
    }
}
