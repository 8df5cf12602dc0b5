//! Shutdown coordination.
//!
//! One [`Shutdown`] is created in `main`; the HTTP server and any other
//! long-running task hold a receiver and stop when it fires.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::lifecycle::signals::shutdown_signal;

#[derive(Clone)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Fire the event. A trigger with nobody listening is only logged.
    pub fn trigger(&self) {
        if self.tx.send(()).is_err() {
            tracing::debug!("Shutdown triggered with no listeners");
        }
    }

    /// Fire on the first SIGINT or SIGTERM.
    pub fn trigger_on_signal(&self) -> JoinHandle<()> {
        let shutdown = self.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            shutdown.trigger();
        })
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_trigger_reaches_every_receiver() {
        let shutdown = Shutdown::new();
        let mut server = shutdown.subscribe();
        let mut watchdog = shutdown.clone().subscribe();

        shutdown.trigger();

        assert!(server.recv().await.is_ok());
        assert!(watchdog.recv().await.is_ok());
    }

    #[test]
    fn test_trigger_without_receivers_is_harmless() {
        Shutdown::default().trigger();
    }
}
