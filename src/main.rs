//! Website form intake service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser form POST
//!     ─────────────────▶ http::server ──▶ http::handlers ──▶ forms (validate)
//!                         (request id,          │
//!                          trace, limits)       ▼
//!                                         store::gateway ──▶ MongoDB
//!                                        (one reconnect)
//!
//!     GET /api/news ───▶ http::news ──▶ news::client ──▶ NewsAPI
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use form_intake::config::load_config;
use form_intake::http::HttpServer;
use form_intake::lifecycle::{startup_watchdog, Shutdown};
use form_intake::news::build_news_source;
use form_intake::observability::{logging, metrics};
use form_intake::security::load_tls_config;
use form_intake::store::{MongoStore, PersistenceGateway};

#[derive(Parser)]
#[command(name = "form-intake", version, about = "Website form intake service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long, env = "INTAKE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    logging::init_logging(config.observability.log_format);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "form-intake starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let store = MongoStore::new(&config.database).await?;
    let gateway = Arc::new(PersistenceGateway::new(Arc::new(store)));

    // Index setup is owned by the gateway and retried on later writes.
    if gateway.connect().await.is_err() {
        let grace = Duration::from_secs(config.database.startup_grace_secs);
        let watchdog = gateway.clone();
        tokio::spawn(async move {
            if !startup_watchdog(&watchdog, grace).await {
                std::process::exit(1);
            }
        });
    }

    let news = build_news_source(&config.news)?;
    let server = HttpServer::new(&config, gateway, news);

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    match &config.listener.tls {
        Some(tls) => {
            let addr = config.listener.bind_address.parse()?;
            let rustls =
                load_tls_config(Path::new(&tls.cert_path), Path::new(&tls.key_path)).await?;
            server.run_tls(addr, rustls, server_shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            server.run(listener, server_shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
