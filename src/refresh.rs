//! Background connectivity monitor
//!
//! Periodically probes the backend in the background and reports
//! online/offline transitions to the main application over a tokio channel.

use std::time::Duration;
use tokio::sync::mpsc;

use crate::data::RestaurantApi;

/// Messages sent from the background monitor to the main app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshMessage {
    /// The backend became reachable or unreachable
    ConnectivityChanged { online: bool },
}

/// Configuration for the connectivity probe
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between reachability probes
    pub probe_interval: Duration,
    /// Whether probing is enabled
    pub enabled: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            probe_interval: Duration::from_secs(15),
            enabled: true,
        }
    }
}

/// Handle for controlling the background monitor
pub struct RefreshHandle {
    /// Channel for receiving connectivity messages
    pub receiver: mpsc::Receiver<RefreshMessage>,
    /// Flag to signal shutdown
    shutdown_tx: mpsc::Sender<()>,
}

impl RefreshHandle {
    /// Creates a new RefreshHandle and spawns the probe task
    ///
    /// # Arguments
    /// * `api` - Backend client used for probing
    /// * `online` - Connectivity state the app currently assumes
    /// * `config` - Probe interval and enablement
    ///
    /// # Returns
    /// A RefreshHandle that receives transitions via the `receiver` channel
    pub fn spawn<A>(api: A, online: bool, config: RefreshConfig) -> Self
    where
        A: RestaurantApi + 'static,
    {
        let (msg_tx, msg_rx) = mpsc::channel(8);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        if config.enabled {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.probe_interval);
                // Skip the first tick (immediate)
                interval.tick().await;
                let mut last = online;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let now = api.is_reachable().await;
                            if now != last {
                                tracing::info!(online = now, "connectivity changed");
                                last = now;
                                if msg_tx
                                    .send(RefreshMessage::ConnectivityChanged { online: now })
                                    .await
                                    .is_err()
                                {
                                    break;
                                }
                            }
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            });
        }

        Self {
            receiver: msg_rx,
            shutdown_tx,
        }
    }

    /// Shuts down the background probe
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
    }
}

/// Checks for pending connectivity messages without blocking
///
/// # Returns
/// * `Some(RefreshMessage)` if a message was available
/// * `None` if no messages are pending
pub fn try_recv(handle: &mut RefreshHandle) -> Option<RefreshMessage> {
    handle.receiver.try_recv().ok()
}
