//! Simulated incremental delivery. The complete reply exists before the
//! first byte is written; it is re-segmented at word boundaries and paced
//! with short sleeps so the client sees a typing effect. This is not
//! token-level streaming from the upstream provider.

use axum::body::Bytes;
use futures::{ Future, Stream };
use std::convert::Infallible;
use std::pin::Pin;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, Infallible>> + Send>>;

/// Bridges a spawned producer task to a chunked response body. The producer
/// owns the sender; when the client disconnects the receiver drops and the
/// producer's next send fails, which is its signal to stop.
pub fn response_stream<F, Fut>(producer: F) -> ByteStream
    where
        F: FnOnce(mpsc::Sender<Result<Bytes, Infallible>>) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static
{
    let (tx, rx) = mpsc::channel(32);

    tokio::spawn(async move {
        producer(tx).await;
    });

    Box::pin(ReceiverStream::new(rx))
}

/// Splits text into tokens, keeping each whitespace run as its own token so
/// re-concatenating the tokens reproduces the input byte for byte.
pub fn whitespace_tokens(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace: Option<bool> = None;

    for (i, ch) in text.char_indices() {
        let ws = ch.is_whitespace();
        match in_whitespace {
            None => {
                in_whitespace = Some(ws);
            }
            Some(prev) if prev != ws => {
                tokens.push(&text[start..i]);
                start = i;
                in_whitespace = Some(ws);
            }
            Some(_) => {}
        }
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

/// Accumulates tokens into a buffer and flushes whenever the buffer grows
/// past `flush_at` bytes or the token just appended is whitespace; any
/// remainder is flushed at the end. Concatenating the chunks yields the
/// original text exactly.
pub fn chunk_text(text: &str, flush_at: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut buffer = String::new();

    for token in whitespace_tokens(text) {
        buffer.push_str(token);
        if buffer.len() > flush_at || token.chars().all(char::is_whitespace) {
            chunks.push(std::mem::take(&mut buffer));
        }
    }
    if !buffer.is_empty() {
        chunks.push(buffer);
    }

    chunks
}
