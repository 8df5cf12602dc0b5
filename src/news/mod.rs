//! News proxy subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/news
//!     → NewsSource::latest (client.rs)
//!     → upstream /everything?q=...&sortBy=publishedAt&pageSize=N
//!     → models.rs reshape → [{id, title, date, url}]
//! ```
//!
//! # Design Decisions
//! - No caching and no retry
//! - No embedded fallback credential; a missing key fails closed

pub mod client;
pub mod models;

pub use client::{
    build_news_source, DisabledNewsSource, DynNewsSource, NewsApiClient, NewsError, NewsSource,
};
pub use models::NewsItem;
