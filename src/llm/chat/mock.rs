use async_trait::async_trait;
use serde_json::Value;

use super::ReplyProvider;
use crate::llm::structured::{ structured_to_markdown, Section, StructuredReply };
use crate::llm::{ GenerateError, GenerationResult };
use crate::models::chat::{ ChatMessage, Role };

/// Hint surfaced in every mock reply so a developer knows why they are not
/// talking to a real model.
const CONFIG_HINT: &str =
    "No chat provider is configured. Set CHAT_PROVIDER (with CHAT_API_KEY) or CHAT_API_URL \
to reach a real model; this reply was generated locally.";

/// No-network fallback used for local development. Deterministic for a given
/// conversation, which also makes it the canonical endpoint test fixture.
pub struct MockProvider;

#[async_trait]
impl ReplyProvider for MockProvider {
    async fn generate(
        &self,
        messages: &[ChatMessage]
    ) -> Result<GenerationResult, GenerateError> {
        let echoed = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .or_else(|| messages.last())
            .map(|m| m.content.clone())
            .unwrap_or_default();

        let reply = StructuredReply {
            title: Some("Mock reply".to_string()),
            summary: Some(format!("You said: {}", echoed)),
            sections: vec![Section {
                heading: "Echo".to_string(),
                content: echoed,
            }],
            examples: Vec::new(),
            notes: Some(CONFIG_HINT.to_string()),
        };

        Ok(GenerationResult {
            text: structured_to_markdown(&reply),
            raw: serde_json::to_value(&reply).unwrap_or(Value::Null),
        })
    }
}
