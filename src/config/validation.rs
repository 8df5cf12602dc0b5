//! Configuration validation.
//!
//! Semantic checks only; serde handles the syntax. Every violation is
//! reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.database.uri.as_deref().map(str::trim) {
        None | Some("") => errors.push(ValidationError::new(
            "database.uri",
            "connection string is not defined (set MONGODB_URI)",
        )),
        Some(_) => {}
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() || tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new(
                "listener.tls",
                "cert_path and key_path must both be set",
            ));
        }
    }

    if let Err(e) = url::Url::parse(&config.news.base_url) {
        errors.push(ValidationError::new(
            "news.base_url",
            format!("'{}' is not a valid URL: {}", config.news.base_url, e),
        ));
    }

    if !(1..=100).contains(&config.news.page_size) {
        errors.push(ValidationError::new(
            "news.page_size",
            "must be between 1 and 100",
        ));
    }

    if config.http.max_body_size == 0 {
        errors.push(ValidationError::new(
            "http.max_body_size",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
