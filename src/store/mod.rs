//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → gateway.rs (readiness check, one reconnect attempt, Record → Document)
//!     → DocumentStore (mongo.rs in production, memory.rs in tests)
//!     → single atomic insert
//! ```
//!
//! # Design Decisions
//! - The gateway is passed explicitly through application state
//! - Connection state is tracked by the gateway, not the driver
//! - Uniqueness is enforced by the store itself (unique index)
//! - No retry loop: a write gets at most one reconnect attempt

pub mod gateway;
pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::Document;
use thiserror::Error;

pub use gateway::{ConnectionState, PersistenceGateway};
pub use memory::InMemoryStore;
pub use mongo::MongoStore;

/// Errors surfaced by a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    /// A unique constraint rejected the write.
    #[error("duplicate value for unique field '{field}'")]
    Duplicate { field: String },

    /// The record could not be converted to a document.
    #[error("document encoding failed: {0}")]
    Encode(String),

    /// Any other store failure.
    #[error("document store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Whether the error indicates a lost connection.
    pub fn is_connection(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<mongodb::bson::ser::Error> for StoreError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        StoreError::Encode(err.to_string())
    }
}

/// A document store able to hold the submission collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Round-trip to the store.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Re-establish the connection and verify it.
    async fn reconnect(&self) -> Result<(), StoreError>;

    /// Create a unique index on `collection.field` if it does not exist.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;

    /// Insert one document.
    async fn insert(&self, collection: &str, document: Document) -> Result<(), StoreError>;
}
