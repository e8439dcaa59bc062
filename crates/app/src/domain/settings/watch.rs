//! Order Settings Watcher
//!
//! The settings document propagates to running sessions without a
//! reload. The engines only ever take a plain snapshot, so refresh
//! delivery is this watcher's concern alone: it polls the store and
//! publishes a new snapshot whenever the version advances.

use std::{sync::Arc, time::Duration};

use tokio::{sync::watch, task::JoinHandle, time};
use tracing::warn;

use crate::domain::settings::service::{SettingsService, SettingsSnapshot};

/// A live view of the order settings.
#[derive(Debug)]
pub struct SettingsWatcher {
    rx: watch::Receiver<Option<SettingsSnapshot>>,
    poller: JoinHandle<()>,
}

impl SettingsWatcher {
    /// Spawns the refresh loop and returns the watcher.
    ///
    /// Fetch failures are logged and the previous snapshot stays
    /// current; a transient store outage never tears down a session.
    #[must_use]
    pub fn spawn(service: Arc<dyn SettingsService>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);

        let poller = tokio::spawn(async move {
            let mut version = None;

            loop {
                match service.fetch_order_settings().await {
                    Ok(Some(snapshot)) if version != Some(snapshot.version) => {
                        version = Some(snapshot.version);

                        if tx.send(Some(snapshot)).is_err() {
                            break;
                        }
                    }
                    Ok(_) => {}
                    Err(error) => warn!(%error, "order settings refresh failed"),
                }

                time::sleep(interval).await;
            }
        });

        Self { rx, poller }
    }

    /// The current snapshot; `None` until the first successful fetch
    /// of an existing document.
    #[must_use]
    pub fn snapshot(&self) -> Option<SettingsSnapshot> {
        self.rx.borrow().clone()
    }

    /// Waits for the next published snapshot. Returns `false` when
    /// the poller has stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

impl Drop for SettingsWatcher {
    fn drop(&mut self) {
        self.poller.abort();
    }
}
