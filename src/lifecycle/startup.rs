//! Startup watchdog.
//!
//! When the initial connection fails the service still starts serving
//! (writes answer 503) but gets one grace period to reach the store.

use std::time::Duration;

use crate::store::PersistenceGateway;

/// Wait `grace`, then check the store once.
///
/// Returns `false` when the store is still unreachable; the caller is
/// expected to terminate the process.
pub async fn startup_watchdog(gateway: &PersistenceGateway, grace: Duration) -> bool {
    tokio::time::sleep(grace).await;

    if gateway.check_reachable().await {
        tracing::info!("Document store reachable after startup grace period");
        true
    } else {
        tracing::error!(
            grace_secs = grace.as_secs(),
            "Document store still unreachable after startup grace period"
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_watchdog_reports_unreachable_store() {
        let store = Arc::new(InMemoryStore::new());
        store.set_reachable(false);
        let gateway = PersistenceGateway::new(store.clone());

        assert!(!startup_watchdog(&gateway, Duration::from_millis(10)).await);
        assert_eq!(store.reconnect_attempts(), 1);
    }

    #[tokio::test]
    async fn test_watchdog_accepts_recovered_store() {
        let store = Arc::new(InMemoryStore::new());
        store.set_reachable(false);
        let gateway = PersistenceGateway::new(store.clone());
        assert!(gateway.connect().await.is_err());

        store.set_reachable(true);
        assert!(startup_watchdog(&gateway, Duration::from_millis(10)).await);
        assert!(gateway.is_ready());
    }
}
