use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Chat LLM Provider Args ---
    /// LLM provider for chat completion (google, openai, anthropic, ollama,
    /// deepseek, xai, groq). Leave unset to use the built-in mock.
    #[arg(long, env = "CHAT_PROVIDER")]
    pub chat_provider: Option<String>,

    /// API Key for the chat provider.
    #[arg(long, env = "CHAT_API_KEY", default_value = "")]
    pub chat_api_key: String,

    /// Direct completion endpoint URL. Used as the HTTP fallback when no SDK
    /// provider is active, and as the base URL override when one is.
    #[arg(long, env = "CHAT_API_URL")]
    pub chat_api_url: Option<String>,

    /// Model name for chat completion (e.g., gemini-1.5-flash-latest, gpt-4o)
    #[arg(long, env = "CHAT_MODEL")] // No default, rely on provider defaults if None
    pub chat_model: Option<String>,

    /// Maximum completion tokens requested from the provider.
    #[arg(long, env = "MAX_TOKENS", default_value = "512")]
    pub max_tokens: u32,

    /// Timeout in seconds for upstream completion requests.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "120")]
    pub request_timeout_secs: u64,

    // --- Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Buffer size in characters that forces a flush when simulating a
    /// streamed reply.
    #[arg(long, env = "STREAM_CHUNK_CHARS", default_value = "60")]
    pub stream_chunk_chars: usize,

    /// Pause in milliseconds between streamed chunks, pacing the perceived
    /// typing speed.
    #[arg(long, env = "STREAM_CHUNK_DELAY_MS", default_value = "60")]
    pub stream_chunk_delay_ms: u64,
}

#[cfg(test)]
impl Args {
    /// Baseline arguments for unit tests, independent of the environment.
    pub fn for_tests() -> Self {
        Self {
            chat_provider: None,
            chat_api_key: String::new(),
            chat_api_url: None,
            chat_model: None,
            max_tokens: 512,
            request_timeout_secs: 120,
            server_addr: "127.0.0.1:4000".to_string(),
            stream_chunk_chars: 60,
            stream_chunk_delay_ms: 60,
        }
    }
}
