//! News search client.
//!
//! # Responsibilities
//! - Call the upstream search API with the server-held credential
//! - Validate and reshape the response
//! - Fail closed when no credential is configured

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::NewsConfig;
use crate::news::models::{reshape, NewsItem, UpstreamResponse};

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news API key is not configured")]
    NotConfigured,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

/// A source of recent finance news.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn latest(&self) -> Result<Vec<NewsItem>, NewsError>;
}

pub type DynNewsSource = Arc<dyn NewsSource>;

/// Source used when no API key is configured. Every call fails.
#[derive(Debug, Clone, Default)]
pub struct DisabledNewsSource;

#[async_trait]
impl NewsSource for DisabledNewsSource {
    async fn latest(&self) -> Result<Vec<NewsItem>, NewsError> {
        Err(NewsError::NotConfigured)
    }
}

/// Client for a NewsAPI-compatible `/everything` endpoint.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    query: String,
    language: String,
    page_size: u32,
}

impl NewsApiClient {
    pub fn new(config: &NewsConfig, api_key: String) -> Result<Self, NewsError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint: format!("{}/everything", config.base_url.trim_end_matches('/')),
            api_key,
            query: config.query.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
        })
    }
}

#[async_trait]
impl NewsSource for NewsApiClient {
    async fn latest(&self) -> Result<Vec<NewsItem>, NewsError> {
        let page_size = self.page_size.to_string();
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", self.query.as_str()),
                ("language", self.language.as_str()),
                ("sortBy", "publishedAt"),
                ("pageSize", page_size.as_str()),
            ])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body: UpstreamResponse = response
            .json()
            .await
            .map_err(|e| NewsError::Malformed(e.to_string()))?;

        if !status.is_success() || body.status.as_deref().is_some_and(|s| s != "ok") {
            return Err(NewsError::Upstream {
                status: status.as_u16(),
                message: body.message.unwrap_or_else(|| "no message".to_string()),
            });
        }

        let articles = body
            .articles
            .ok_or_else(|| NewsError::Malformed("missing articles".to_string()))?;

        Ok(reshape(articles, self.page_size as usize))
    }
}

/// Build the news source from configuration.
///
/// With an API key → [`NewsApiClient`]; without → [`DisabledNewsSource`].
pub fn build_news_source(config: &NewsConfig) -> Result<DynNewsSource, NewsError> {
    match config.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(key) => {
            tracing::info!(endpoint = %config.base_url, "News source configured");
            Ok(Arc::new(NewsApiClient::new(config, key.to_string())?))
        }
        None => {
            tracing::warn!("NEWS_API_KEY not set; news endpoint will fail closed");
            Ok(Arc::new(DisabledNewsSource))
        }
    }
}
