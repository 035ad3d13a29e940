use async_trait::async_trait;
use log::info;
use serde_json::Value;
use std::error::Error as StdError;

use rllm::LLMProvider;
use rllm::builder::LLMBuilder;
use rllm::chat::{ ChatMessage as SdkChatMessage, ChatRole, MessageType };

use super::{ build_prompt, decode_reply, ReplyProvider };
use crate::llm::{ GenerateError, GenerationResult, ProviderConfig, ProviderKind };
use crate::models::chat::ChatMessage;

/// Vendor-SDK strategy. The backend is generic over `rllm` providers; the
/// whole conversation travels as one user turn because the prompt already
/// renders roles inline.
pub struct SdkProvider {
    llm: Box<dyn LLMProvider + Send + Sync>,
    kind: ProviderKind,
    model: String,
}

impl std::fmt::Debug for SdkProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkProvider")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl SdkProvider {
    pub fn from_config(
        kind: ProviderKind,
        config: &ProviderConfig
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let api_key = config.api_key
            .clone()
            .ok_or_else(|| format!("{} API key is required for the SDK client", kind))?;
        let model = config.model.clone().unwrap_or_else(|| kind.default_model().to_string());

        let mut builder = LLMBuilder::new()
            .backend(kind.backend())
            .api_key(api_key)
            .model(&model)
            .max_tokens(config.max_tokens)
            .stream(false);

        if let Some(url) = &config.endpoint {
            builder = builder.base_url(url);
        }

        let llm = builder.build()?;

        Ok(Self { llm, kind, model })
    }
}

#[async_trait]
impl ReplyProvider for SdkProvider {
    async fn generate(
        &self,
        messages: &[ChatMessage]
    ) -> Result<GenerationResult, GenerateError> {
        let prompt = build_prompt(messages);
        let chat = vec![SdkChatMessage {
            role: ChatRole::User,
            content: prompt,
            message_type: MessageType::Text,
        }];

        info!("SdkProvider::generate() → backend={} model={}", self.kind, self.model);

        let resp = self.llm
            .chat(&chat).await
            .map_err(|e| GenerateError::Sdk(e.to_string()))?;
        let text = resp
            .text()
            .map(|s| s.to_string())
            .unwrap_or_else(|| resp.to_string());
        let raw = Value::String(resp.to_string());

        Ok(decode_reply(text, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_requires_an_api_key() {
        let config = ProviderConfig {
            kind: Some(ProviderKind::Google),
            api_key: None,
            endpoint: None,
            model: None,
            max_tokens: 512,
            timeout_secs: 120,
        };
        let err = SdkProvider::from_config(ProviderKind::Google, &config).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
