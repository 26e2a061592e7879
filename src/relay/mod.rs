//! # Relay Server
//!
//! `bloby relay`: a small HTTP pass-through between the terminal (or any
//! browser client) and the completion API. It owns the API key and the
//! system prompt so clients never see either.
//!
//! ```text
//! client ──POST /chat {message, history}──► relay ──► GroqClient ──► Groq
//!        ◄──── {response} | {error} ───────┘
//! ```
//!
//! CORS is permissive: any origin, and the headers browser SDKs send
//! (`authorization`, `x-client-info`, `apikey`, `content-type`).

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderName, Method, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use tower_http::cors::{Any, CorsLayer};

use crate::chat::{ChatClient, ChatEnvelope, ChatError, ChatRequest, RATE_LIMIT_MESSAGE};

#[derive(Clone)]
pub struct RelayState {
    pub upstream: Arc<dyn ChatClient>,
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
}

pub fn router(upstream: Arc<dyn ChatClient>) -> Router {
    Router::new()
        .route("/", post(chat))
        .route("/chat", post(chat))
        .with_state(RelayState { upstream })
        .layer(cors_layer())
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, upstream: Arc<dyn ChatClient>) -> std::io::Result<()> {
    let addr: SocketAddr = addr.parse().map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid bind address '{addr}': {e}"),
        )
    })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Relay listening on http://{}", addr);
    info!("Chat endpoint: http://{}/chat", addr);
    axum::serve(listener, router(upstream)).await
}

type Reply = (StatusCode, Json<ChatEnvelope>);

async fn chat(State(state): State<RelayState>, body: Bytes) -> Reply {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(e) => {
            warn!("Rejecting malformed relay body: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ChatEnvelope::error(format!("Invalid request body: {e}"))),
            );
        }
    };
    // Clients may send more than we forward.
    let request = ChatRequest::new(request.message, request.history);

    info!(
        "Relay received message ({} chars, {} history turns)",
        request.message.chars().count(),
        request.history.len()
    );

    match state.upstream.complete(&request).await {
        Ok(text) => (StatusCode::OK, Json(ChatEnvelope::response(text))),
        Err(ChatError::RateLimited(_)) => {
            warn!("Upstream rate limited");
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ChatEnvelope::error(RATE_LIMIT_MESSAGE)),
            )
        }
        Err(e) => {
            error!("Relay upstream error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatEnvelope::error(failure_message(&e))),
            )
        }
    }
}

fn failure_message(e: &ChatError) -> String {
    match e {
        ChatError::Api { status, .. } => format!("GROQ API error: {status}"),
        other => other.user_message(),
    }
}
