//! In-process publish/subscribe bus.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;
use vendo_core::MachineId;

/// Buffered events per topic before slow subscribers start lagging.
const DEFAULT_BUS_CAPACITY: usize = 32;

/// A machine's inventory was physically restocked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestockEvent {
    pub machine_id: MachineId,
}

/// Connection status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    Online,
    Offline,
}

/// A machine came online or went offline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusEvent {
    pub machine_id: MachineId,
    pub status: MachineStatus,
    pub at: DateTime<Utc>,
}

/// Periodic location report for a machine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationEvent {
    pub machine_id: MachineId,
    pub latitude: f64,
    pub longitude: f64,
    pub at: DateTime<Utc>,
}

/// Fire-and-forget notification channel.
///
/// Publishing never blocks and never fails: events sent with no live
/// subscriber are dropped, and a subscriber that falls behind loses the
/// oldest buffered events (broadcast semantics). That matches the wire
/// transport this stands in for.
#[derive(Debug, Clone)]
pub struct NotifyBus {
    restock_tx: broadcast::Sender<RestockEvent>,
    status_tx: broadcast::Sender<StatusEvent>,
    location_tx: broadcast::Sender<LocationEvent>,
}

impl NotifyBus {
    /// Create a bus with the default per-topic buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    /// Create a bus with a custom per-topic buffer.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (restock_tx, _) = broadcast::channel(capacity);
        let (status_tx, _) = broadcast::channel(capacity);
        let (location_tx, _) = broadcast::channel(capacity);
        Self {
            restock_tx,
            status_tx,
            location_tx,
        }
    }

    /// Announce that a machine was restocked.
    pub fn publish_restocked(&self, machine_id: &MachineId) {
        trace!(machine = %machine_id, "publishing restock event");
        let _ = self.restock_tx.send(RestockEvent {
            machine_id: machine_id.clone(),
        });
    }

    /// Subscribe to restock events for all machines.
    #[must_use]
    pub fn subscribe_restocked(&self) -> broadcast::Receiver<RestockEvent> {
        self.restock_tx.subscribe()
    }

    /// Announce a machine's connection status.
    pub fn publish_status(&self, machine_id: &MachineId, status: MachineStatus) {
        trace!(machine = %machine_id, ?status, "publishing status event");
        let _ = self.status_tx.send(StatusEvent {
            machine_id: machine_id.clone(),
            status,
            at: Utc::now(),
        });
    }

    /// Subscribe to status events for all machines.
    #[must_use]
    pub fn subscribe_status(&self) -> broadcast::Receiver<StatusEvent> {
        self.status_tx.subscribe()
    }

    /// Report a machine's location.
    pub fn publish_location(&self, machine_id: &MachineId, latitude: f64, longitude: f64) {
        let _ = self.location_tx.send(LocationEvent {
            machine_id: machine_id.clone(),
            latitude,
            longitude,
            at: Utc::now(),
        });
    }

    /// Subscribe to location events for all machines.
    #[must_use]
    pub fn subscribe_location(&self) -> broadcast::Receiver<LocationEvent> {
        self.location_tx.subscribe()
    }
}

impl Default for NotifyBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine_id() -> MachineId {
        MachineId::new("vm-1").unwrap()
    }

    #[tokio::test]
    async fn test_restock_pub_sub() {
        let bus = NotifyBus::new();
        let mut rx = bus.subscribe_restocked();

        bus.publish_restocked(&machine_id());
        let event = rx.recv().await.unwrap();
        assert_eq!(event.machine_id, machine_id());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_fine() {
        let bus = NotifyBus::new();
        bus.publish_restocked(&machine_id());
        bus.publish_status(&machine_id(), MachineStatus::Online);
        bus.publish_location(&machine_id(), 43.07, -89.4);
    }

    #[tokio::test]
    async fn test_all_subscribers_receive() {
        let bus = NotifyBus::new();
        let mut first = bus.subscribe_restocked();
        let mut second = bus.subscribe_restocked();

        bus.publish_restocked(&machine_id());
        assert!(first.recv().await.is_ok());
        assert!(second.recv().await.is_ok());
    }

    #[tokio::test]
    async fn test_location_event_payload() {
        let bus = NotifyBus::new();
        let mut rx = bus.subscribe_location();

        bus.publish_location(&machine_id(), 43.07, -89.4);
        let event = rx.recv().await.unwrap();
        assert_eq!(event.latitude, 43.07);
        assert_eq!(event.longitude, -89.4);
    }
}
