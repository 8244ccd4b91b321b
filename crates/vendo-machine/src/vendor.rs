//! Vendor-facing restocking orchestration.

use std::fmt;
use tracing::info;
use vendo_core::{Error, MachineId, Mode, Money, Result};
use vendo_inventory::InventoryManager;
use vendo_remote::{MachineRecord, RemoteGateway};

/// One machine's vendor session surface.
///
/// Caches the machine's registry record (name, identity, dimensions) from
/// construction time and gates every inventory edit on `Restocking` mode.
#[derive(Debug)]
pub struct VendorInterface<G> {
    inventory: InventoryManager<G>,
    record: MachineRecord,
}

impl<G: RemoteGateway> VendorInterface<G> {
    /// Attach to an existing machine identity.
    ///
    /// The machine must already be registered: a vendor never creates
    /// machines, so an absent record is a hard failure here rather than a
    /// cue to register.
    ///
    /// # Errors
    /// - `Error::QueryFailure` (status 404) if the identity is not
    ///   registered.
    /// - Gateway errors from the record fetch or the initial sync.
    pub async fn connect(machine_id: MachineId, gateway: G) -> Result<Self> {
        let record = gateway.get_machine(&machine_id).await.map_err(|e| {
            if e.is_not_found() {
                Error::query_failure(
                    404,
                    format!("cannot initialize vendor: machine {machine_id} is not registered"),
                )
            } else {
                e
            }
        })?;

        let mut inventory =
            InventoryManager::new(record.row_count, record.column_count, machine_id, gateway)?;
        inventory.sync_from_remote().await?;

        Ok(Self { inventory, record })
    }

    /// The underlying inventory manager (read-only).
    #[must_use]
    pub fn inventory(&self) -> &InventoryManager<G> {
        &self.inventory
    }

    /// The cached registry record.
    #[must_use]
    pub fn record(&self) -> &MachineRecord {
        &self.record
    }

    /// Full stock listing including empty and sold-out slots.
    #[must_use]
    pub fn list_options(&self) -> String {
        self.inventory.get_stock_information(true)
    }

    /// Begin a restocking session.
    ///
    /// # Errors
    /// `Error::InvalidMode` if the machine is not idle, and gateway errors
    /// from the remote-validated transition.
    pub async fn start_restocking(&mut self) -> Result<()> {
        self.inventory.set_mode(Mode::Restocking).await
    }

    fn ensure_restocking(&self) -> Result<()> {
        if self.inventory.mode() != Mode::Restocking {
            return Err(Error::invalid_mode(
                "Restocking operations can only be performed while restocking is in progress; start restocking first",
            ));
        }
        Ok(())
    }

    /// Adjust the stock of an existing item by a signed amount.
    ///
    /// # Errors
    /// `Error::InvalidMode` outside a restocking session, then whatever
    /// the stock adjustment raises.
    pub fn change_stock_of_slot(&mut self, slot_name: &str, amount: i64) -> Result<()> {
        self.ensure_restocking()?;
        self.inventory.change_stock(slot_name, amount)?;
        Ok(())
    }

    /// Stock a slot with a new item, replacing anything already there.
    ///
    /// # Errors
    /// `Error::InvalidMode` outside a restocking session, then whatever
    /// the item creation raises.
    pub fn add_item_to_slot(
        &mut self,
        slot_name: &str,
        item_name: &str,
        cost: Money,
        stock: u32,
    ) -> Result<()> {
        self.ensure_restocking()?;
        self.inventory.add_item(slot_name, item_name, stock, cost)
    }

    /// Re-price the item in a slot.
    ///
    /// # Errors
    /// `Error::InvalidMode` outside a restocking session, then whatever
    /// the cost update raises.
    pub fn set_cost_of_slot(&mut self, slot_name: &str, new_cost: Money) -> Result<()> {
        self.ensure_restocking()?;
        self.inventory.set_cost(slot_name, new_cost)
    }

    /// Empty a slot.
    ///
    /// # Errors
    /// `Error::InvalidMode` outside a restocking session, then whatever
    /// the clear raises.
    pub fn clear_slot(&mut self, slot_name: &str) -> Result<()> {
        self.ensure_restocking()?;
        self.inventory.clear_slot(slot_name)
    }

    /// Flush the session's edits and return the machine to idle.
    ///
    /// The flush happens first; if it fails the machine stays in
    /// `Restocking` with the ledger intact so the vendor can retry.
    ///
    /// # Errors
    /// `Error::InvalidMode` if no restocking session is in progress, and
    /// gateway errors from the flush or the transition.
    pub async fn end_restocking(&mut self) -> Result<()> {
        if self.inventory.mode() != Mode::Restocking {
            return Err(Error::invalid_mode(
                "Restocking is not currently in progress; start restocking first",
            ));
        }

        self.inventory.flush_to_remote().await?;
        self.inventory.set_mode(Mode::Idle).await?;
        info!(machine = %self.inventory.machine_id(), "restocking complete");
        Ok(())
    }

    /// Rename the machine in the registry and in the local cache.
    ///
    /// # Errors
    /// Gateway errors from the rename.
    pub async fn rename(&mut self, new_name: &str) -> Result<()> {
        let updated = self
            .inventory
            .gateway()
            .set_machine_name(self.inventory.machine_id(), new_name)
            .await?;
        self.record = updated;
        Ok(())
    }

    /// Re-load grid and mode from the remote store.
    ///
    /// # Errors
    /// Gateway and dimension-mismatch errors from the sync.
    pub async fn reload_data(&mut self) -> Result<()> {
        self.inventory.sync_from_remote().await
    }
}

impl<G> fmt::Display for VendorInterface<G> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(name) = &self.record.name {
            write!(f, "Name: {name}; ")?;
        }
        write!(
            f,
            "ID: {}; Dimensions: {}x{} slots",
            self.record.id, self.record.row_count, self.record.column_count
        )
    }
}
