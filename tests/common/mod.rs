//! Shared utilities for integration testing.
//!
//! Each test gets its own server on an ephemeral port backed by an
//! in-memory document store.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use form_intake::config::AppConfig;
use form_intake::http::HttpServer;
use form_intake::lifecycle::Shutdown;
use form_intake::news::{DisabledNewsSource, DynNewsSource};
use form_intake::store::{InMemoryStore, PersistenceGateway};
use serde_json::Value;
use tokio::net::TcpListener;

pub struct TestApp {
    pub addr: SocketAddr,
    pub store: Arc<InMemoryStore>,
    pub gateway: Arc<PersistenceGateway>,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("server unreachable")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("server unreachable")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server with default configuration and no news source.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(AppConfig::default(), Arc::new(DisabledNewsSource)).await
}

/// Start a server with the given configuration and news source.
pub async fn spawn_app_with(config: AppConfig, news: DynNewsSource) -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let gateway = Arc::new(PersistenceGateway::new(store.clone()));
    gateway.connect().await.expect("in-memory store connects");
    gateway
        .ensure_indexes()
        .await
        .expect("in-memory indexes are created");

    let server = HttpServer::new(&config, gateway.clone(), news);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap();

    TestApp {
        addr,
        store,
        gateway,
        client,
        shutdown,
    }
}
