//! MongoDB-backed document store.
//!
//! # Responsibilities
//! - Build the driver client from the configured connection string
//! - Verify connectivity with `ping`
//! - Swap in a fresh client on reconnect
//! - Translate driver errors (duplicate key, network) into `StoreError`

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::config::DatabaseConfig;
use crate::store::{DocumentStore, StoreError};

const DEFAULT_DATABASE: &str = "website";
const DUPLICATE_KEY: i32 = 11000;

pub struct MongoStore {
    uri: String,
    database: String,
    timeout: Duration,
    client: ArcSwap<Client>,
}

impl MongoStore {
    /// Build a store from configuration. Does not require the server to be
    /// up; use [`DocumentStore::ping`] to check.
    pub async fn new(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let uri = config
            .uri
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| StoreError::Backend("connection string is not defined".to_string()))?;
        let timeout = Duration::from_secs(config.connect_timeout_secs);

        let client = build_client(&uri, timeout).await?;
        let database = config
            .name
            .clone()
            .or_else(|| client.default_database().map(|db| db.name().to_string()))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        tracing::info!(database = %database, "Document store client created");

        Ok(Self {
            uri,
            database,
            timeout,
            client: ArcSwap::from_pointee(client),
        })
    }

    fn db(&self) -> Database {
        self.client.load().database(&self.database)
    }
}

async fn build_client(uri: &str, timeout: Duration) -> Result<Client, StoreError> {
    let mut options = ClientOptions::parse(uri).await.map_err(map_error)?;
    options.server_selection_timeout = Some(timeout);
    options.connect_timeout = Some(timeout);
    options
        .app_name
        .get_or_insert_with(|| env!("CARGO_PKG_NAME").to_string());
    Client::with_options(options).map_err(map_error)
}

async fn ping_database(db: &Database) -> Result<(), StoreError> {
    db.run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(map_error)
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn ping(&self) -> Result<(), StoreError> {
        ping_database(&self.db()).await
    }

    async fn reconnect(&self) -> Result<(), StoreError> {
        let client = build_client(&self.uri, self.timeout).await?;
        ping_database(&client.database(&self.database)).await?;
        self.client.store(Arc::new(client));
        Ok(())
    }

    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(field, 1);
        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.db()
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.db()
            .collection::<Document>(collection)
            .insert_one(document)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}

fn map_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            StoreError::Duplicate {
                field: duplicate_field(&write.message).unwrap_or("unknown").to_string(),
            }
        }
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. }
        | ErrorKind::DnsResolve { .. } => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

/// Extract the field name from a duplicate-key message such as
/// `E11000 ... dup key: { email: "a@b.co" }`.
fn duplicate_field(message: &str) -> Option<&str> {
    let rest = message.split("dup key: {").nth(1)?;
    let field = rest.split(':').next()?.trim();
    if field.is_empty() {
        None
    } else {
        Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_field_from_message() {
        let message = r#"E11000 duplicate key error collection: website.newsletters index: email_1 dup key: { email: "a@b.co" }"#;
        assert_eq!(duplicate_field(message), Some("email"));
        assert_eq!(duplicate_field("E11000 duplicate key error"), None);
        assert_eq!(duplicate_field("dup key: { : 1 }"), None);
    }

    #[tokio::test]
    async fn test_missing_uri_is_rejected() {
        let config = DatabaseConfig::default();
        assert!(matches!(
            MongoStore::new(&config).await,
            Err(StoreError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_database_name_resolution() {
        let mut config = DatabaseConfig {
            uri: Some("mongodb://127.0.0.1:1/forms".into()),
            ..Default::default()
        };
        let store = MongoStore::new(&config).await.unwrap();
        assert_eq!(store.database, "forms");

        config.uri = Some("mongodb://127.0.0.1:1".into());
        let store = MongoStore::new(&config).await.unwrap();
        assert_eq!(store.database, DEFAULT_DATABASE);

        config.name = Some("override".into());
        let store = MongoStore::new(&config).await.unwrap();
        assert_eq!(store.database, "override");
    }
}
