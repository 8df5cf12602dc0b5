//! News wire formats and the reshaped item returned to callers.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Item returned by `GET /api/news`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Source URL, doubling as a stable identifier.
    pub id: String,
    pub title: String,
    /// Publication date rendered as `M/D/YYYY`.
    pub date: String,
    pub url: String,
}

/// Search response as returned by the upstream API.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamResponse {
    pub status: Option<String>,
    pub message: Option<String>,
    pub articles: Option<Vec<UpstreamArticle>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamArticle {
    pub url: Option<String>,
    pub title: Option<String>,
    pub published_at: Option<String>,
}

/// Render an RFC 3339 timestamp as a short US date. Unparsable values are
/// passed through unchanged.
pub fn display_date(published_at: &str) -> String {
    match DateTime::parse_from_rfc3339(published_at) {
        Ok(ts) => ts.format("%-m/%-d/%Y").to_string(),
        Err(_) => published_at.to_string(),
    }
}

/// Reduce upstream articles to [`NewsItem`]s, dropping any without a title
/// or URL and keeping at most `limit`.
pub fn reshape(articles: Vec<UpstreamArticle>, limit: usize) -> Vec<NewsItem> {
    articles
        .into_iter()
        .filter_map(|article| {
            let url = article.url.filter(|u| !u.trim().is_empty())?;
            let title = article.title.filter(|t| !t.trim().is_empty())?;
            let date = article
                .published_at
                .as_deref()
                .map(display_date)
                .unwrap_or_default();
            Some(NewsItem {
                id: url.clone(),
                title,
                date,
                url,
            })
        })
        .take(limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(n: usize) -> UpstreamArticle {
        UpstreamArticle {
            url: Some(format!("https://news.example.com/{}", n)),
            title: Some(format!("Headline {}", n)),
            published_at: Some("2026-10-05T08:15:00Z".to_string()),
        }
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2026-10-05T08:15:00Z"), "10/5/2026");
        assert_eq!(display_date("2026-01-31T23:59:59+00:00"), "1/31/2026");
        assert_eq!(display_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_reshape_keeps_ten() {
        let items = reshape((0..10).map(article).collect(), 10);
        assert_eq!(items.len(), 10);
        for (n, item) in items.iter().enumerate() {
            assert_eq!(item.id, item.url);
            assert_eq!(item.title, format!("Headline {}", n));
            assert_eq!(item.date, "10/5/2026");
        }
    }

    #[test]
    fn test_reshape_drops_incomplete_and_caps() {
        let mut articles: Vec<_> = (0..12).map(article).collect();
        articles[0].url = None;
        articles[1].title = Some("  ".into());
        articles[2].published_at = None;

        let items = reshape(articles, 5);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].title, "Headline 2");
        assert_eq!(items[0].date, "");
        assert!(items.iter().all(|i| !i.title.is_empty() && !i.url.is_empty()));
    }
}
