//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the intake service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Document store connection settings.
    pub database: DatabaseConfig,

    /// External news search settings.
    pub news: NewsConfig,

    /// Request handling limits and response hardening.
    pub http: HttpConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string. Required; usually supplied through `MONGODB_URI`.
    pub uri: Option<String>,

    /// Database name. Falls back to the one named in the URI, then `website`.
    pub name: Option<String>,

    /// Server selection / ping timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Delay before the single startup reachability re-check.
    pub startup_grace_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: None,
            name: None,
            connect_timeout_secs: 10,
            startup_grace_secs: 10,
        }
    }
}

/// News search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NewsConfig {
    /// API credential. When absent the news endpoint fails closed.
    pub api_key: Option<String>,

    /// Base URL of the search API.
    pub base_url: String,

    /// Fixed server-side search query.
    pub query: String,

    /// Article language filter.
    pub language: String,

    /// Maximum number of articles requested and returned.
    pub page_size: u32,

    /// Outbound request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://newsapi.org/v2".to_string(),
            query: r#"(finance OR accounting OR GST OR VAT OR "chartered accountant")"#.to_string(),
            language: "en".to_string(),
            page_size: 10,
            timeout_secs: 10,
        }
    }
}

/// HTTP request handling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Allow cross-origin requests from any origin.
    pub cors_enabled: bool,

    /// Add security headers to every response.
    pub security_headers: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_body_size: 5 * 1024 * 1024, // 5MB
            cors_enabled: true,
            security_headers: true,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log output format.
    pub log_format: LogFormat,

    /// Enable Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics server bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
