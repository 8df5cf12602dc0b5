//! Form submission, root and health handlers.
//!
//! Every submission handler runs the same pipeline:
//! validate → persist (one insert) → respond.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use crate::forms::{
    CareerSubmission, ContactSectionSubmission, ContactSubmission, IconContactSubmission,
    NewsletterSubmission, Submission, ValidationError,
};
use crate::http::request::FormJson;
use crate::http::response::{ApiError, ApiResponse};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::store::{ConnectionState, StoreError};

const CAREER_INVALID: &str = "Please fill all required fields correctly.";

/// Per-route success contract.
struct Form {
    name: &'static str,
    status: StatusCode,
    success: &'static str,
}

const CONTACT: Form = Form {
    name: "contact",
    status: StatusCode::CREATED,
    success: "Contact form submitted successfully",
};

const CAREER: Form = Form {
    name: "career",
    status: StatusCode::OK,
    success: "Career form submitted successfully",
};

const NEWSLETTER: Form = Form {
    name: "newsletter",
    status: StatusCode::CREATED,
    success: "Newsletter subscription successful",
};

const ICON_CONTACT: Form = Form {
    name: "icon_contact",
    status: StatusCode::CREATED,
    success: "Icon contact form submitted successfully",
};

const CONTACT_SECTION: Form = Form {
    name: "contact_section",
    status: StatusCode::CREATED,
    success: "Contact section form submitted successfully",
};

async fn submit<S, F>(
    state: &AppState,
    form: Form,
    payload: S,
    reject_message: F,
) -> Result<(StatusCode, Json<ApiResponse<S::Record>>), ApiError>
where
    S: Submission,
    F: Fn(&ValidationError) -> String,
{
    let record = payload.into_record(Utc::now()).map_err(|err| {
        tracing::info!(
            form = form.name,
            fields = ?err.fields(),
            reason = %err,
            detail = err.detail().unwrap_or_default(),
            "Submission rejected"
        );
        metrics::record_submission(form.name, "invalid");
        ApiError::Validation(reject_message(&err))
    })?;

    state
        .gateway
        .insert(&record)
        .await
        .map_err(|err| store_failure(form.name, err))?;

    metrics::record_submission(form.name, "stored");
    tracing::info!(form = form.name, "Submission stored");

    Ok((form.status, Json(ApiResponse::created(form.success, record))))
}

fn store_failure(form: &'static str, err: StoreError) -> ApiError {
    match err {
        StoreError::Duplicate { field } => {
            tracing::info!(form, field = %field, "Duplicate submission rejected");
            metrics::record_submission(form, "duplicate");
            ApiError::Duplicate
        }
        StoreError::Unavailable(detail) => {
            tracing::error!(form, error = %detail, "Document store unavailable");
            metrics::record_submission(form, "unavailable");
            ApiError::Unavailable
        }
        other => {
            tracing::error!(form, error = %other, "Submission failed");
            metrics::record_submission(form, "error");
            ApiError::Internal
        }
    }
}

pub async fn submit_contact(
    State(state): State<AppState>,
    FormJson(payload): FormJson<ContactSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    submit(&state, CONTACT, payload, |e| e.to_string()).await
}

pub async fn submit_career(
    State(state): State<AppState>,
    FormJson(payload): FormJson<CareerSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    submit(&state, CAREER, payload, |_| CAREER_INVALID.to_string()).await
}

pub async fn subscribe_newsletter(
    State(state): State<AppState>,
    FormJson(payload): FormJson<NewsletterSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    submit(&state, NEWSLETTER, payload, |e| e.to_string()).await
}

pub async fn submit_icon_contact(
    State(state): State<AppState>,
    FormJson(payload): FormJson<IconContactSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    submit(&state, ICON_CONTACT, payload, |e| e.to_string()).await
}

pub async fn submit_contact_section(
    State(state): State<AppState>,
    FormJson(payload): FormJson<ContactSectionSubmission>,
) -> Result<impl IntoResponse, ApiError> {
    submit(&state, CONTACT_SECTION, payload, |e| e.to_string()).await
}

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "Backend API is running" }))
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    let database = state.gateway.state();
    Json(HealthStatus {
        status: if database == ConnectionState::Connected {
            "ok"
        } else {
            "degraded"
        },
        version: env!("CARGO_PKG_VERSION"),
        database: database.as_str(),
    })
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
