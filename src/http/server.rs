//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, body limits, headers)
//! - Serve over plain TCP or TLS until shutdown is signalled

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::news::latest_news;
use crate::http::request::{request_span, UuidRequestId};
use crate::news::DynNewsSource;
use crate::security;
use crate::store::PersistenceGateway;

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN_SECS: u64 = 10;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<PersistenceGateway>,
    pub news: DynNewsSource,
}

/// HTTP server for the intake API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &AppConfig, gateway: Arc<PersistenceGateway>, news: DynNewsSource) -> Self {
        let state = AppState { gateway, news };
        Self {
            router: Self::build_router(config, state),
        }
    }

    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let router = Router::new()
            .route("/", get(handlers::root))
            .route("/health", get(handlers::health))
            .route("/api/contact", post(handlers::submit_contact))
            .route("/api/career", post(handlers::submit_career))
            .route("/api/newsletter", post(handlers::subscribe_newsletter))
            .route("/api/icon-contact", post(handlers::submit_icon_contact))
            .route("/api/contact-section", post(handlers::submit_contact_section))
            .route("/api/news", get(latest_news))
            .fallback(handlers::not_found)
            .with_state(state);

        let router = security::limits::apply(router, config.http.max_body_size);
        let router = security::headers::apply(router, &config.http);

        // Outermost first: the ID must exist before the trace span reads it.
        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http().make_span_with(request_span))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
    }

    /// Run the server on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let handle = axum_server::Handle::new();

        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            drain.graceful_shutdown(Some(Duration::from_secs(TLS_DRAIN_SECS)));
        });

        tracing::info!(address = %addr, "HTTPS server starting");
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(self.router.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}
