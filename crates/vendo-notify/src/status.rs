//! Online/offline presence and location reporting.

use crate::bus::{MachineStatus, NotifyBus};
use tracing::info;
use vendo_core::MachineId;

/// Presence announcer for one machine.
///
/// Announces `online` when created and `offline` when dropped, so any
/// exit path (including a panic unwinding the runner) publishes the
/// offline status. This mirrors the broker-side will message that covers
/// abnormal disconnection on the wire transport.
pub struct StatusReporter {
    bus: NotifyBus,
    machine_id: MachineId,
}

impl StatusReporter {
    /// Announce the machine online and return the reporter guarding it.
    #[must_use]
    pub fn announce(bus: &NotifyBus, machine_id: MachineId) -> Self {
        bus.publish_status(&machine_id, MachineStatus::Online);
        info!(machine = %machine_id, "announced online");
        Self {
            bus: bus.clone(),
            machine_id,
        }
    }

    /// Report the machine's current location.
    pub fn publish_location(&self, latitude: f64, longitude: f64) {
        self.bus
            .publish_location(&self.machine_id, latitude, longitude);
    }
}

impl Drop for StatusReporter {
    fn drop(&mut self) {
        self.bus
            .publish_status(&self.machine_id, MachineStatus::Offline);
    }
}
