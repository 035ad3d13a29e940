use crate::cli::Args;
use crate::llm::chat::ReplyProvider;
use crate::models::chat::{ ChatMessage, ChatRequest, ChatResponse, ErrorBody };
use super::stream::{ chunk_text, response_stream };

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{ Body, Bytes },
    extract::State,
    http::{ header, StatusCode },
    response::{ IntoResponse, Response },
    routing::post,
    Json,
    Router,
};
use log::{ error, info };
use tower_http::cors::{ Any, CorsLayer };

/// Marker written into an already-open stream when generation fails. The
/// client treats a response containing it as a failed turn.
const STREAM_ERROR_MARKER: &str = "\n[error]\n";

#[derive(Clone)]
struct AppState {
    provider: Arc<dyn ReplyProvider>,
    chunk_chars: usize,
    chunk_delay: Duration,
}

/// Builds the application router. Standalone so tests can drive the
/// endpoints in-process with an injected provider.
pub fn router(provider: Arc<dyn ReplyProvider>, args: &Args) -> Router {
    let state = AppState {
        provider,
        chunk_chars: args.stream_chunk_chars,
        chunk_delay: Duration::from_millis(args.stream_chunk_delay_ms),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/api/chat/stream", post(chat_stream_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn serve(
    addr: &str,
    provider: Arc<dyn ReplyProvider>,
    args: Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = addr.parse::<SocketAddr>()?;
    let app = router(provider, &args);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on: http://{}", addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn validated(req: ChatRequest) -> Result<Vec<ChatMessage>, Response> {
    match req.messages {
        Some(messages) if !messages.is_empty() => Ok(messages),
        _ =>
            Err(
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        error: "messages required".to_string(),
                        details: None,
                    }),
                ).into_response()
            ),
    }
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Response {
    let messages = match validated(req) {
        Ok(messages) => messages,
        Err(rejection) => {
            return rejection;
        }
    };

    match state.provider.generate(&messages).await {
        Ok(result) =>
            (
                StatusCode::OK,
                Json(ChatResponse {
                    reply: result.text,
                    raw: result.raw,
                }),
            ).into_response(),
        Err(e) => {
            error!("LLM request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "LLM request failed".to_string(),
                    details: Some(e.client_detail()),
                }),
            ).into_response()
        }
    }
}

/// Generates the complete reply, then drip-feeds it as paced chunks over an
/// unbuffered `text/plain` body. A failure after the stream opens is
/// reported in-band with the error marker.
async fn chat_stream_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>
) -> Response {
    let messages = match validated(req) {
        Ok(messages) => messages,
        Err(rejection) => {
            return rejection;
        }
    };

    let provider = state.provider.clone();
    let chunk_chars = state.chunk_chars;
    let chunk_delay = state.chunk_delay;

    let body = response_stream(move |tx| async move {
        match provider.generate(&messages).await {
            Ok(result) => {
                if result.text.is_empty() {
                    return;
                }
                let mut first = true;
                for chunk in chunk_text(&result.text, chunk_chars) {
                    if !first {
                        tokio::time::sleep(chunk_delay).await;
                    }
                    first = false;
                    if tx.send(Ok(Bytes::from(chunk))).await.is_err() {
                        // client went away; stop segmenting
                        return;
                    }
                }
            }
            Err(e) => {
                error!("Stream generation failed: {}", e);
                let _ = tx.send(Ok(Bytes::from_static(STREAM_ERROR_MARKER.as_bytes()))).await;
            }
        }
    });

    (
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
        ],
        Body::from_stream(body),
    ).into_response()
}
