//! Request body limits.
//!
//! # Responsibilities
//! - Enforce maximum request body size
//! - Render every 413 as the JSON failure envelope
//!
//! # Design Decisions
//! - Declared lengths over the limit are rejected before the handler runs
//! - Streamed bodies are cut off at the limit while being read
//! - axum's own default limit is disabled so only the configured one applies

use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    Json, Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::http::response::ApiResponse;

const MIB: usize = 1024 * 1024;
const KIB: usize = 1024;

/// Wrap `router` with a `max_body_size` byte limit.
pub fn apply<S>(router: Router<S>, max_body_size: usize) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(middleware::map_response_with_state(
            max_body_size,
            payload_too_large_json,
        ))
}

async fn payload_too_large_json(State(max_body_size): State<usize>, response: Response) -> Response {
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE {
        return response;
    }

    tracing::info!(limit = max_body_size, "Request body too large");
    let message = format!(
        "File size too large. Maximum size is {}.",
        describe_size(max_body_size)
    );
    (
        StatusCode::PAYLOAD_TOO_LARGE,
        Json(ApiResponse::failure(message)),
    )
        .into_response()
}

/// Human-readable size: whole megabytes or kilobytes when exact, bytes otherwise.
pub fn describe_size(bytes: usize) -> String {
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else if bytes >= KIB && bytes % KIB == 0 {
        format!("{}KB", bytes / KIB)
    } else {
        format!("{bytes} bytes")
    }
}
