//! Response envelope and error mapping.
//!
//! # Responsibilities
//! - Wrap submission results in `{success, message, data?}`
//! - Map every failure to its status code and caller-facing message
//!
//! # Design Decisions
//! - `ApiError` is the only place statuses are chosen
//! - Internal detail is logged by the caller, never serialized

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

pub const INVALID_FORM_DATA: &str = "Invalid form data. Please check your inputs.";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable. Please try again later.";
pub const SERVER_ERROR: &str = "Server error. Please try again later.";
pub const ALREADY_SUBSCRIBED: &str = "Email already subscribed";
pub const NEWS_FAILED: &str = "Failed to fetch news";

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Every way a request can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Client input rejected; the message is shown to the caller.
    Validation(String),
    /// Unique constraint violation.
    Duplicate,
    /// The document store could not be reached after one reconnect.
    Unavailable,
    /// Anything unexpected.
    Internal,
    /// Body exceeded the configured limit. Rendered by the limits layer.
    PayloadTooLarge,
    /// The news upstream failed.
    News,
    /// No route matched.
    NotFound,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Duplicate => StatusCode::BAD_REQUEST,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal | ApiError::News => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(message) => {
                (status, Json(ApiResponse::failure(message))).into_response()
            }
            ApiError::Duplicate => {
                (status, Json(ApiResponse::failure(ALREADY_SUBSCRIBED))).into_response()
            }
            ApiError::Unavailable => {
                (status, Json(ApiResponse::failure(SERVICE_UNAVAILABLE))).into_response()
            }
            ApiError::Internal => (status, Json(ApiResponse::failure(SERVER_ERROR))).into_response(),
            ApiError::PayloadTooLarge => status.into_response(),
            ApiError::News => (status, Json(json!({ "error": NEWS_FAILED }))).into_response(),
            ApiError::NotFound => (status, Json(ApiResponse::failure("Not found"))).into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
            ApiError::Validation(INVALID_FORM_DATA.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_error_statuses_and_bodies() {
        let response = ApiError::Validation("All fields are required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "success": false, "message": "All fields are required" })
        );

        let response = ApiError::Unavailable.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["message"], SERVICE_UNAVAILABLE);

        let response = ApiError::Internal.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["message"], SERVER_ERROR);

        let response = ApiError::News.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await, json!({ "error": NEWS_FAILED }));
    }

    #[test]
    fn test_success_envelope_includes_data() {
        let value = serde_json::to_value(ApiResponse::created("ok", json!({ "email": "a@b.co" })))
            .unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["data"]["email"], "a@b.co");

        let value = serde_json::to_value(ApiResponse::failure("nope")).unwrap();
        assert!(value.get("data").is_none());
    }
}
