//! Cross-origin access and hardening response headers.
//!
//! # Responsibilities
//! - Allow browser clients on any origin (CORS)
//! - Add security response headers (optional)
//!
//! # Design Decisions
//! - Handler-set headers win; hardening headers are only added when absent

use axum::{
    http::{header, HeaderValue},
    Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer};

use crate::config::HttpConfig;

/// Apply the CORS and security header layers enabled in `config`.
pub fn apply<S>(mut router: Router<S>, config: &HttpConfig) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if config.security_headers {
        router = router
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ));
    }

    if config.cors_enabled {
        router = router.layer(CorsLayer::permissive());
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    fn app(config: &HttpConfig) -> Router {
        apply(Router::new().route("/", get(|| async { "ok" })), config)
    }

    #[tokio::test]
    async fn test_security_headers_added() {
        let config = HttpConfig {
            security_headers: true,
            cors_enabled: false,
            ..HttpConfig::default()
        };
        let response = app(&config)
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
        assert_eq!(response.headers()["x-frame-options"], "DENY");
        assert!(response.headers().get("access-control-allow-origin").is_none());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let config = HttpConfig {
            security_headers: false,
            cors_enabled: true,
            ..HttpConfig::default()
        };
        let response = app(&config)
            .oneshot(
                Request::get("/")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()["access-control-allow-origin"], "*");
        assert!(response.headers().get("x-frame-options").is_none());
    }
}
