//! Question API.
//!
//! - GET /api/ai/prompt?question=...
//! - GET /api/ai/prompt/stream?question=...

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::service::ChatService;
use crate::chat::ChatError;
use crate::config::Config;
use crate::server::streaming::{parts_to_body, parts_to_sse, simulated_parts};

/// Application state shared across handlers.
pub struct AppState {
    pub service: ChatService,
    pub config: Arc<Config>,
}

/// Build the axum router with all API routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/ai/prompt", get(ask))
        .route("/api/ai/prompt/stream", get(ask_stream))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Query string shared by both routes.
#[derive(Debug, Deserialize)]
pub struct PromptParams {
    pub question: String,
}

/// True when the `Accept` header lists `text/event-stream`.
pub fn accepts_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|media| media.split(';').next())
        .any(|media| media.trim().eq_ignore_ascii_case("text/event-stream"))
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            // Surface the provider's own status and message.
            ChatError::Provider { status, body } => (status, body).into_response(),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()).into_response(),
        }
    }
}

// ─── Route Handlers ────────────────────────────────────────────────────────

async fn ask(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PromptParams>,
) -> Result<String, ChatError> {
    let request_id = Uuid::new_v4().to_string();

    info!(
        request_id = request_id,
        question_len = params.question.len(),
        "Prompt request"
    );

    match state.service.ask(&params.question).await {
        Ok(answer) => Ok(answer),
        Err(e) => {
            warn!(request_id = request_id, "Prompt failed: {e}");
            Err(e)
        }
    }
}

async fn ask_stream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<PromptParams>,
) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let stream_config = &state.config.stream;
    let sse = accepts_event_stream(&headers);

    info!(
        request_id = request_id,
        question_len = params.question.len(),
        parts = stream_config.parts,
        interval_ms = stream_config.interval_ms,
        sse,
        "Streaming prompt request"
    );

    let parts = simulated_parts(params.question, stream_config.parts, stream_config.interval());
    if sse {
        Sse::new(parts_to_sse(parts))
            .keep_alive(KeepAlive::default())
            .into_response()
    } else {
        (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            parts_to_body(parts),
        )
            .into_response()
    }
}
