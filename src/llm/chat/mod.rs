pub mod http;
pub mod mock;
pub mod sdk;

use async_trait::async_trait;
use log::warn;
use serde_json::Value;
use std::error::Error as StdError;
use std::sync::Arc;

use self::http::HttpProvider;
use self::mock::MockProvider;
use self::sdk::SdkProvider;
use super::{ GenerateError, GenerationResult, ProviderConfig };
use crate::llm::structured::{ structured_to_markdown, try_parse_structured };
use crate::models::chat::ChatMessage;

/// Instruction prepended to every real-provider prompt. Demands a bare JSON
/// object matching the structured-reply schema so the decoder can turn the
/// answer into Markdown.
pub(crate) const STRUCTURED_INSTRUCTION: &str =
    "You are a helpful assistant. Respond with a single JSON object and nothing else: \
no prose before or after it, no markdown fences. The object must use exactly these keys: \
\"title\" (string), \"summary\" (string), \"sections\" (array of objects with \"heading\" \
and \"content\" strings), \"examples\" (array of objects with \"input\" and \"output\" \
strings, may be empty), \"notes\" (string or null).";

/// A resolved generation strategy. One upstream call per invocation, no
/// retries; upstream failures propagate to the endpoint.
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn generate(
        &self,
        messages: &[ChatMessage]
    ) -> Result<GenerationResult, GenerateError>;
}

/// Picks the strategy once at startup. SDK initialization failures degrade
/// to the HTTP endpoint (or to a per-request configuration error when no
/// endpoint exists) instead of aborting startup; with nothing configured at
/// all, replies come from the deterministic mock.
pub fn new_provider(
    config: &ProviderConfig
) -> Result<Arc<dyn ReplyProvider>, Box<dyn StdError + Send + Sync>> {
    if let Some(kind) = config.kind {
        match SdkProvider::from_config(kind, config) {
            Ok(provider) => {
                return Ok(Arc::new(provider));
            }
            Err(e) => {
                warn!("Could not initialise {} SDK client, falling back to HTTP endpoint: {}", kind, e);
            }
        }
        return match &config.endpoint {
            Some(endpoint) => Ok(Arc::new(HttpProvider::from_config(endpoint.clone(), config)?)),
            None => Ok(Arc::new(UnconfiguredProvider)),
        };
    }

    match &config.endpoint {
        Some(endpoint) => Ok(Arc::new(HttpProvider::from_config(endpoint.clone(), config)?)),
        None => Ok(Arc::new(MockProvider)),
    }
}

/// Terminal strategy when a provider was selected but nothing is reachable.
/// Surfaces as a 500 per request rather than a startup failure.
pub struct UnconfiguredProvider;

#[async_trait]
impl ReplyProvider for UnconfiguredProvider {
    async fn generate(
        &self,
        _messages: &[ChatMessage]
    ) -> Result<GenerationResult, GenerateError> {
        Err(GenerateError::NoEndpoint)
    }
}

pub(crate) fn render_conversation(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub(crate) fn build_prompt(messages: &[ChatMessage]) -> String {
    format!("{}\n\n{}", STRUCTURED_INSTRUCTION, render_conversation(messages))
}

/// Shared post-processing for the SDK and HTTP paths: try the structured
/// decode on the extracted text, then on the stringified raw payload; the
/// first success wins and its Markdown rendering replaces the text. With no
/// decode the extracted text and raw payload pass through untouched.
pub(crate) fn decode_reply(text: String, raw: Value) -> GenerationResult {
    let parsed = try_parse_structured(&text).or_else(|| {
        let stringified = match &raw {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        try_parse_structured(&stringified)
    });

    match parsed {
        Some(reply) =>
            GenerationResult {
                text: structured_to_markdown(&reply),
                raw: serde_json::to_value(&reply).unwrap_or(Value::Null),
            },
        None => GenerationResult { text, raw },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::chat::Role;
    use serde_json::json;

    fn msg(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
            time: None,
        }
    }

    fn config() -> ProviderConfig {
        ProviderConfig {
            kind: None,
            api_key: None,
            endpoint: None,
            model: None,
            max_tokens: 512,
            timeout_secs: 120,
        }
    }

    #[test]
    fn conversation_renders_role_content_pairs() {
        let rendered = render_conversation(
            &[msg(Role::System, "be brief"), msg(Role::User, "hi")]
        );
        assert_eq!(rendered, "system: be brief\n\nuser: hi");
    }

    #[test]
    fn prompt_starts_with_instruction() {
        let prompt = build_prompt(&[msg(Role::User, "hi")]);
        assert!(prompt.starts_with(STRUCTURED_INSTRUCTION));
        assert!(prompt.ends_with("user: hi"));
    }

    #[test]
    fn decode_prefers_structured_text() {
        let text = r#"{"sections": [{"heading": "h", "content": "c"}]}"#.to_string();
        let result = decode_reply(text, json!({"anything": 1}));
        assert!(result.text.contains("## h"));
        assert!(result.raw.get("sections").is_some());
    }

    #[test]
    fn decode_falls_back_to_stringified_raw() {
        let raw = json!({"sections": [{"heading": "from raw", "content": "c"}]});
        let result = decode_reply("not json at all".to_string(), raw);
        assert!(result.text.contains("## from raw"));
    }

    #[test]
    fn undecodable_reply_passes_through() {
        let result = decode_reply("plain answer".to_string(), json!("plain answer"));
        assert_eq!(result.text, "plain answer");
        assert_eq!(result.raw, json!("plain answer"));
    }

    #[tokio::test]
    async fn nothing_configured_resolves_to_mock() {
        let provider = new_provider(&config()).unwrap();
        let result = provider.generate(&[msg(Role::User, "ping")]).await.unwrap();
        assert!(result.text.contains("ping"));
        assert!(result.raw.get("notes").is_some());
    }

    #[tokio::test]
    async fn selector_without_key_or_endpoint_fails_per_request() {
        let mut cfg = config();
        cfg.kind = Some(crate::llm::ProviderKind::Google);
        let provider = new_provider(&cfg).unwrap();
        let err = provider.generate(&[msg(Role::User, "hi")]).await.unwrap_err();
        assert!(matches!(err, GenerateError::NoEndpoint));
    }
}
