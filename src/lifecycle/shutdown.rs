//! Shutdown coordination for the launcher.

use tokio::sync::broadcast::{self, error::RecvError};

/// Coordinator for shutdown.
///
/// The launcher and the signal listener share one broadcast channel; the
/// listener triggers it, the launcher subscribes to it.
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

    /// Ask every subscriber to stop.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown has been triggered.
///
/// A channel whose senders are all gone can never be triggered, so it never
/// resolves: losing the signal listener must not stop the launcher.
pub async fn requested(rx: &mut broadcast::Receiver<()>) {
    match rx.recv().await {
        Ok(()) | Err(RecvError::Lagged(_)) => {}
        Err(RecvError::Closed) => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_reaches_every_subscriber() {
        let shutdown = Shutdown::new();
        let mut a = shutdown.subscribe();
        let mut b = shutdown.clone().subscribe();

        shutdown.trigger();

        requested(&mut a).await;
        requested(&mut b).await;
    }

    #[test]
    fn test_trigger_without_subscribers_is_harmless() {
        Shutdown::new().trigger();
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_coordinator_is_not_a_request() {
        let mut rx = Shutdown::new().subscribe();

        let outcome = tokio::time::timeout(Duration::from_secs(3600), requested(&mut rx)).await;
        assert!(outcome.is_err(), "closed channel must not resolve");
    }
}
