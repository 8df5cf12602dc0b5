//! The persistence gateway shared by all handlers.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use mongodb::bson::{self, Document};

use crate::forms::{
    CareerForm, ContactForm, ContactSection, IconContactForm, Newsletter, Record,
};
use crate::observability::metrics;
use crate::store::{DocumentStore, StoreError};

/// Connection state as seen by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ConnectionState::Connected,
            2 => ConnectionState::Disconnected,
            _ => ConnectionState::Connecting,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConnectionState::Connecting => 0,
            ConnectionState::Connected => 1,
            ConnectionState::Disconnected => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owns the single document store connection for the process lifetime.
///
/// Unique indexes are created after every successful connect or reconnect
/// until they are in place. Entities with unique fields are not written
/// before that, so uniqueness is never silently unenforced.
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
    state: AtomicU8,
    indexes_ready: AtomicBool,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            state: AtomicU8::new(ConnectionState::Connecting.as_u8()),
            indexes_ready: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_ready(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Whether every declared unique index has been created.
    pub fn indexes_ready(&self) -> bool {
        self.indexes_ready.load(Ordering::Acquire)
    }

    fn set_state(&self, new: ConnectionState) {
        let old = ConnectionState::from_u8(self.state.swap(new.as_u8(), Ordering::AcqRel));
        if old == new {
            return;
        }
        match new {
            ConnectionState::Connected => tracing::info!(from = %old, "Document store connected"),
            ConnectionState::Disconnected => {
                tracing::warn!(from = %old, "Document store disconnected")
            }
            ConnectionState::Connecting => tracing::debug!(from = %old, "Document store connecting"),
        }
    }

    /// Record a dropped connection; the next write attempts a reconnect.
    pub fn mark_disconnected(&self) {
        self.set_state(ConnectionState::Disconnected);
    }

    /// Initial connection check at startup.
    pub async fn connect(&self) -> Result<(), StoreError> {
        match self.store.ping().await {
            Ok(()) => {
                self.set_state(ConnectionState::Connected);
                self.try_prepare_indexes().await;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to connect to document store");
                self.set_state(ConnectionState::Disconnected);
                Err(e)
            }
        }
    }

    /// Make sure the connection is usable, attempting exactly one
    /// reconnect if it is not.
    pub async fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.is_ready() {
            return Ok(());
        }

        tracing::warn!(state = %self.state(), "Document store not ready, attempting reconnect");
        match self.store.reconnect().await {
            Ok(()) => {
                metrics::record_reconnect(true);
                self.set_state(ConnectionState::Connected);
                self.try_prepare_indexes().await;
                Ok(())
            }
            Err(e) => {
                metrics::record_reconnect(false);
                tracing::error!(error = %e, "Reconnection attempt failed");
                self.set_state(ConnectionState::Disconnected);
                Err(StoreError::Unavailable(e.to_string()))
            }
        }
    }

    /// Persist one record.
    pub async fn insert<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        if !R::UNIQUE_FIELDS.is_empty() {
            self.require_indexes::<R>().await?;
        }

        let document = to_document(record)?;
        match self.store.insert(R::COLLECTION, document).await {
            Ok(()) => Ok(()),
            Err(e) => {
                if e.is_connection() {
                    self.mark_disconnected();
                }
                Err(e)
            }
        }
    }

    /// Create the unique indexes every entity declares.
    pub async fn ensure_indexes(&self) -> Result<(), StoreError> {
        self.ensure_indexes_for::<ContactForm>().await?;
        self.ensure_indexes_for::<CareerForm>().await?;
        self.ensure_indexes_for::<IconContactForm>().await?;
        self.ensure_indexes_for::<Newsletter>().await?;
        self.ensure_indexes_for::<ContactSection>().await?;
        self.indexes_ready.store(true, Ordering::Release);
        tracing::info!("Unique indexes in place");
        Ok(())
    }

    /// Best-effort index setup after a (re)connect. Failures are retried on
    /// the next write that needs the indexes.
    async fn try_prepare_indexes(&self) {
        if self.indexes_ready() {
            return;
        }
        if let Err(e) = self.ensure_indexes().await {
            tracing::warn!(error = %e, "Failed to ensure unique indexes");
        }
    }

    /// Refuse writes to `R` while its uniqueness constraint is not enforced.
    async fn require_indexes<R: Record>(&self) -> Result<(), StoreError> {
        if self.indexes_ready() {
            return Ok(());
        }

        match self.ensure_indexes().await {
            Ok(()) => Ok(()),
            Err(e) => {
                if e.is_connection() {
                    self.mark_disconnected();
                }
                tracing::error!(
                    collection = R::COLLECTION,
                    error = %e,
                    "Unique indexes missing, refusing write"
                );
                Err(StoreError::Unavailable(format!("unique indexes not in place: {e}")))
            }
        }
    }

    async fn ensure_indexes_for<R: Record>(&self) -> Result<(), StoreError> {
        for field in R::UNIQUE_FIELDS {
            self.store.ensure_unique_index(R::COLLECTION, field).await?;
            tracing::debug!(collection = R::COLLECTION, field = %field, "Unique index ensured");
        }
        Ok(())
    }

    /// Single reachability check used by the startup watchdog.
    pub async fn check_reachable(&self) -> bool {
        self.ensure_ready().await.is_ok()
    }
}

/// Serialize a record, storing its timestamp as a native date.
pub fn to_document<R: Record>(record: &R) -> Result<Document, StoreError> {
    let mut document = bson::to_document(record)?;
    document.insert(
        R::TIMESTAMP_FIELD,
        bson::DateTime::from_millis(record.timestamp().timestamp_millis()),
    );
    Ok(document)
}
