//! Dummy LLM provider — echoes the final user message back prefixed with `[echo]`.
//! Used for offline runs and tests without a real API key.

use crate::llm::{ChatMessage, ChatRole, LlmResponse, ProviderError};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<LlmResponse, ProviderError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.trim())
            .unwrap_or_default();
        Ok(LlmResponse {
            text: format!("[echo] {last_user}").trim_end().to_string(),
            usage: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn complete_echoes_last_user_message() {
        let p = DummyProvider;
        let messages = vec![
            ChatMessage::system("be nice"),
            ChatMessage::user("first"),
            ChatMessage::assistant("reply"),
            ChatMessage::user("second"),
        ];
        assert_eq!(p.complete(&messages).await.unwrap().text, "[echo] second");
    }

    #[tokio::test]
    async fn complete_without_user_message() {
        let p = DummyProvider;
        let reply = p.complete(&[ChatMessage::system("x")]).await.unwrap();
        assert_eq!(reply.text, "[echo]");
        assert!(reply.usage.is_none());
    }
}
