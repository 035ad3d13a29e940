use async_trait::async_trait;
use log::info;
use reqwest::Client as HttpClient;
use reqwest::header::{ HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE };
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::time::Duration;

use super::{ build_prompt, decode_reply, ReplyProvider };
use crate::llm::normalize::{ normalize, value_to_string };
use crate::llm::{ GenerateError, GenerationResult, ProviderConfig };
use crate::models::chat::ChatMessage;

/// Direct-POST strategy for providers reachable over a plain completion
/// endpoint. The response body may be JSON of any shape or bare text; the
/// normalizer sorts it out.
pub struct HttpProvider {
    http: HttpClient,
    endpoint: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct CompletionRequest {
    prompt: String,
    max_tokens: u32,
}

impl HttpProvider {
    pub fn from_config(
        endpoint: String,
        config: &ProviderConfig
    ) -> Result<Self, Box<dyn StdError + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = config.api_key.as_deref() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", key))
                    .map_err(|e| format!("Invalid API key format: {}", e))?
            );
        }

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Box::new(e) as Box<dyn StdError + Send + Sync>)?;

        Ok(Self {
            http,
            endpoint,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl ReplyProvider for HttpProvider {
    async fn generate(
        &self,
        messages: &[ChatMessage]
    ) -> Result<GenerationResult, GenerateError> {
        let payload = CompletionRequest {
            prompt: build_prompt(messages),
            max_tokens: self.max_tokens,
        };

        info!("HttpProvider::generate() → endpoint={}", self.endpoint);

        let resp = self.http.post(&self.endpoint).json(&payload).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let raw: Value = match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => Value::String(body),
        };

        if !status.is_success() {
            let detail = raw
                .get("error")
                .map(value_to_string)
                .unwrap_or_else(|| format!("upstream returned status {}", status.as_u16()));
            return Err(GenerateError::UpstreamStatus {
                status: status.as_u16(),
                detail,
            });
        }

        let text = normalize(&raw);
        Ok(decode_reply(text, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            kind: None,
            api_key: api_key.map(str::to_string),
            endpoint: Some("http://localhost:9/v1/complete".to_string()),
            model: None,
            max_tokens: 512,
            timeout_secs: 120,
        }
    }

    #[test]
    fn builds_with_and_without_key() {
        assert!(
            HttpProvider::from_config(
                "http://localhost:9/v1/complete".to_string(),
                &config(Some("secret"))
            ).is_ok()
        );
        assert!(
            HttpProvider::from_config(
                "http://localhost:9/v1/complete".to_string(),
                &config(None)
            ).is_ok()
        );
    }

    #[test]
    fn completion_request_shape() {
        let payload = CompletionRequest {
            prompt: "p".to_string(),
            max_tokens: 512,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, serde_json::json!({"prompt": "p", "max_tokens": 512}));
    }
}
