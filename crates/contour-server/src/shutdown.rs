//! Graceful shutdown.
//!
//! Both types wrap a `tokio::sync::watch` channel: [`ShutdownSignal`]
//! publishes a fired flag, [`ConnectionTracker`] the number of open
//! connections.

use std::sync::Arc;

use tokio::sync::watch;

/// A cloneable, one-shot stop signal for the accept loop and its
/// connections.
///
/// # Example
///
/// ```rust
/// use contour_server::ShutdownSignal;
///
/// let shutdown = ShutdownSignal::new();
/// let observer = shutdown.clone();
///
/// shutdown.trigger();
/// assert!(observer.is_shutdown());
/// ```
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    fired: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (fired, _) = watch::channel(false);
        Self {
            fired: Arc::new(fired),
        }
    }

    /// Fires the signal. Firing twice is a no-op.
    pub fn trigger(&self) {
        self.fired
            .send_if_modified(|fired| !std::mem::replace(fired, true));
    }

    /// Whether the signal has fired.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.fired.borrow()
    }

    /// Resolves once the signal fires.
    pub async fn recv(&self) {
        let mut observer = self.fired.subscribe();
        // The sender is owned by `self` and cannot drop while we wait.
        let _ = observer.wait_for(|fired| *fired).await;
    }

    /// Creates a signal fired by SIGTERM or SIGINT, or Ctrl+C off Unix.
    ///
    /// Spawns a task, so it needs a running tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            wait_for_os_signal().await;
            trigger.trigger();
        });
        signal
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut terminate, mut interrupt) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(terminate), Ok(interrupt)) => (terminate, interrupt),
            (Err(error), _) | (_, Err(error)) => {
                tracing::error!(%error, "cannot install signal handlers, using Ctrl+C only");
                return wait_for_ctrl_c().await;
            }
        };

    tokio::select! {
        _ = terminate.recv() => tracing::info!("SIGTERM received, shutting down"),
        _ = interrupt.recv() => tracing::info!("SIGINT received, shutting down"),
    }
}

#[cfg(not(unix))]
async fn wait_for_os_signal() {
    wait_for_ctrl_c().await;
}

async fn wait_for_ctrl_c() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "cannot listen for Ctrl+C, shutdown must be triggered manually");
        std::future::pending::<()>().await;
    }
    tracing::info!("Ctrl+C received, shutting down");
}

/// Counts open connections so the server can drain them before exiting.
///
/// # Example
///
/// ```rust
/// use contour_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let token = tracker.acquire();
/// assert_eq!(tracker.active_connections(), 1);
///
/// drop(token);
/// assert_eq!(tracker.active_connections(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionTracker {
    open: Arc<watch::Sender<usize>>,
}

impl ConnectionTracker {
    /// Creates a tracker with no open connections.
    #[must_use]
    pub fn new() -> Self {
        let (open, _) = watch::channel(0);
        Self {
            open: Arc::new(open),
        }
    }

    /// Registers a connection until the returned token drops.
    #[must_use]
    pub fn acquire(&self) -> ConnectionToken {
        self.open.send_modify(|open| *open += 1);
        ConnectionToken {
            open: Arc::clone(&self.open),
        }
    }

    /// Number of tokens alive.
    #[must_use]
    pub fn active_connections(&self) -> usize {
        *self.open.borrow()
    }

    /// Resolves once no token is alive.
    pub async fn drained(&self) {
        let mut observer = self.open.subscribe();
        let _ = observer.wait_for(|open| *open == 0).await;
    }
}

impl Default for ConnectionTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Keeps one connection counted by its [`ConnectionTracker`].
#[derive(Debug)]
pub struct ConnectionToken {
    open: Arc<watch::Sender<usize>>,
}

impl Drop for ConnectionToken {
    fn drop(&mut self) {
        self.open.send_modify(|open| *open -= 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_twice() {
        let signal = ShutdownSignal::default();
        assert!(!signal.is_shutdown());
        signal.trigger();
        signal.trigger();
        assert!(signal.is_shutdown());
    }

    #[tokio::test]
    async fn test_recv_wakes_on_trigger() {
        let signal = ShutdownSignal::new();
        let waiter = tokio::spawn({
            let signal = signal.clone();
            async move { signal.recv().await }
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        signal.trigger();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_recv_after_trigger_is_ready() {
        let signal = ShutdownSignal::new();
        signal.trigger();
        tokio::time::timeout(Duration::from_millis(10), signal.recv())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_drained_waits_for_last_token() {
        let tracker = ConnectionTracker::default();
        let first = tracker.acquire();
        let second = tracker.acquire();
        assert_eq!(tracker.active_connections(), 2);

        drop(first);
        let pending = tokio::time::timeout(Duration::from_millis(10), tracker.drained()).await;
        assert!(pending.is_err());

        drop(second);
        tokio::time::timeout(Duration::from_secs(1), tracker.drained())
            .await
            .unwrap();
        assert_eq!(tracker.active_connections(), 0);
    }
}
