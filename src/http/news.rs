//! `GET /api/news` proxy handler.

use std::time::Instant;

use axum::{extract::State, Json};

use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::news::{NewsError, NewsItem};
use crate::observability::metrics;

pub async fn latest_news(State(state): State<AppState>) -> Result<Json<Vec<NewsItem>>, ApiError> {
    let start = Instant::now();

    match state.news.latest().await {
        Ok(items) => {
            metrics::record_news("success", start);
            tracing::debug!(count = items.len(), "News fetched");
            Ok(Json(items))
        }
        Err(err) => {
            let outcome = match err {
                NewsError::NotConfigured => "disabled",
                _ => "failure",
            };
            metrics::record_news(outcome, start);
            tracing::error!(error = %err, "Failed to fetch news");
            Err(ApiError::News)
        }
    }
}
