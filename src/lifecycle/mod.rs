//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! SIGINT (Ctrl+C)
//!     → trigger_on_ctrl_c task
//!     → Shutdown broadcast
//!     → HTTP server drains and exits
//! ```

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Provides a broadcast channel that all long-running tasks can subscribe to.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Trigger the shutdown signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a task that triggers shutdown when Ctrl+C arrives.
pub fn trigger_on_ctrl_c(shutdown: &Shutdown) {
    let tx = shutdown.tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            let _ = tx.send(());
        }
    });
}
