pub mod chat;
pub mod normalize;
pub mod structured;

use serde::{ Deserialize, Serialize };
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use rllm::builder::LLMBackend;

use crate::cli::Args;

/// Vendor backends the SDK path can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    OpenAI,
    Anthropic,
    Ollama,
    DeepSeek,
    XAI,
    Groq,
}

impl ProviderKind {
    pub fn backend(&self) -> LLMBackend {
        match self {
            ProviderKind::Google => LLMBackend::Google,
            ProviderKind::OpenAI => LLMBackend::OpenAI,
            ProviderKind::Anthropic => LLMBackend::Anthropic,
            ProviderKind::Ollama => LLMBackend::Ollama,
            ProviderKind::DeepSeek => LLMBackend::DeepSeek,
            ProviderKind::XAI => LLMBackend::XAI,
            ProviderKind::Groq => LLMBackend::Groq,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Google => "gemini-1.5-flash-latest",
            ProviderKind::OpenAI => "gpt-4o",
            ProviderKind::Anthropic => "claude-3-5-sonnet-20240620",
            ProviderKind::Ollama => "llama3",
            ProviderKind::DeepSeek => "deepseek-chat",
            ProviderKind::XAI => "grok-3-latest",
            ProviderKind::Groq => "llama-3.1-8b-instruct",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::Google => "google",
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::XAI => "xai",
            ProviderKind::Groq => "groq",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported chat provider: '{0}'")]
pub struct ParseProviderError(String);

impl FromStr for ProviderKind {
    type Err = ParseProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "gemini" => Ok(ProviderKind::Google),
            "openai" => Ok(ProviderKind::OpenAI),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "xai" => Ok(ProviderKind::XAI),
            "groq" => Ok(ProviderKind::Groq),
            _ => Err(ParseProviderError(s.to_string())),
        }
    }
}

/// Provider settings resolved from the CLI/environment once at startup.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: Option<ProviderKind>,
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl ProviderConfig {
    pub fn from_args(args: &Args) -> Result<Self, ParseProviderError> {
        let kind = match args.chat_provider.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(name) => Some(name.parse()?),
        };
        Ok(Self {
            kind,
            api_key: Some(args.chat_api_key.clone()).filter(|key| !key.is_empty()),
            endpoint: args.chat_api_url.clone().filter(|url| !url.is_empty()),
            model: args.chat_model.clone(),
            max_tokens: args.max_tokens,
            timeout_secs: args.request_timeout_secs,
        })
    }
}

/// Canonical adapter output: `text` is ready for display, `raw` keeps the
/// provider payload (or the parsed structured reply) for diagnostics.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub text: String,
    pub raw: Value,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no endpoint configured")]
    NoEndpoint,
    #[error("chat completion request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("chat provider returned status {status}: {detail}")]
    UpstreamStatus {
        status: u16,
        detail: String,
    },
    #[error("chat SDK call failed: {0}")]
    Sdk(String),
}

impl GenerateError {
    /// Bounded detail safe to hand to a client. The full error goes to the
    /// server log only; transport errors are collapsed to a short summary so
    /// nothing secret-bearing leaks.
    pub fn client_detail(&self) -> Value {
        match self {
            GenerateError::UpstreamStatus { detail, .. } => Value::String(detail.clone()),
            GenerateError::Http(e) if e.is_timeout() => {
                Value::String("upstream request timed out".to_string())
            }
            GenerateError::Http(_) => Value::String("upstream request failed".to_string()),
            other => Value::String(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_parse() {
        assert_eq!("google".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Google);
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert!("cohere".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn empty_selector_and_key_become_none() {
        let args = Args::for_tests();
        let config = ProviderConfig::from_args(&args).unwrap();
        assert!(config.kind.is_none());
        assert!(config.api_key.is_none());
        assert!(config.endpoint.is_none());
        assert_eq!(config.max_tokens, 512);
    }

    #[test]
    fn no_endpoint_detail_is_the_summary() {
        assert_eq!(
            GenerateError::NoEndpoint.client_detail(),
            Value::String("no endpoint configured".to_string())
        );
    }
}
