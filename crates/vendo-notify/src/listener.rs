//! Background sync on restock notifications.

use crate::bus::NotifyBus;
use std::sync::Arc;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use vendo_inventory::InventoryManager;
use vendo_remote::RemoteGateway;

/// Handle for a running restock listener.
pub struct RestockListenerHandle {
    task: JoinHandle<()>,
}

impl RestockListenerHandle {
    /// Stop the listener and wait for it to terminate.
    pub async fn shutdown(self) {
        self.task.abort();
        let _ = self.task.await;
    }

    /// Whether the listener task has terminated on its own.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn a task that re-syncs `manager` whenever its machine is restocked.
///
/// Events for other machine identities are ignored. A failed sync is
/// logged and the listener keeps running; the next restock event (or a
/// manual reload) will try again. The task ends when the bus is dropped
/// or the handle is shut down.
pub fn spawn_restock_listener<G>(
    bus: &NotifyBus,
    manager: Arc<Mutex<InventoryManager<G>>>,
) -> RestockListenerHandle
where
    G: RemoteGateway + 'static,
{
    let mut rx = bus.subscribe_restocked();

    let task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let mut manager = manager.lock().await;
                    if event.machine_id != *manager.machine_id() {
                        continue;
                    }
                    info!(machine = %event.machine_id, "restocked, syncing from remote");
                    if let Err(e) = manager.sync_from_remote().await {
                        warn!(machine = %event.machine_id, error = %e, "restock sync failed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Restock events are idempotent triggers; one sync
                    // covers however many we missed.
                    warn!(skipped, "restock listener lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    RestockListenerHandle { task }
}
