//! Machine registry and inventory gateway contract.
//!
//! The gateway is the single source of truth for a machine's registration
//! record (dimensions, name, operating mode) and its slot inventory. The
//! inventory manager loads from it, flushes change batches to it, and
//! re-validates mode transitions against it.

use serde::{Deserialize, Serialize};
use std::future::Future;
use vendo_core::{MachineId, Mode, Money, Result, SlotName};

/// Registration record for one machine, as stored by the remote registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    /// Externally-assigned machine identity.
    #[serde(rename = "vm_id")]
    pub id: MachineId,

    /// Optional human-readable machine name.
    #[serde(rename = "vm_name")]
    pub name: Option<String>,

    /// Declared number of grid rows.
    #[serde(rename = "vm_row_count")]
    pub row_count: u8,

    /// Declared number of grid columns.
    #[serde(rename = "vm_column_count")]
    pub column_count: u8,

    /// Current operating mode. The remote value is authoritative.
    #[serde(rename = "vm_mode")]
    pub mode: Mode,
}

/// One slot's inventory state on the wire.
///
/// A record with `item_name: None` means the slot is (or is to be) empty;
/// `price` and `stock` are `None` in that case. This is both the download
/// format of [`RemoteGateway::get_inventory`] and the upsert format of
/// [`RemoteGateway::upsert_inventory`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    /// Two-digit slot address.
    pub slot_name: SlotName,

    /// Item name, or `None` for an empty slot.
    pub item_name: Option<String>,

    /// Unit price, or `None` for an empty slot.
    pub price: Option<Money>,

    /// Units in stock, or `None` for an empty slot.
    pub stock: Option<u32>,
}

impl SlotRecord {
    /// Record describing an occupied slot.
    #[must_use]
    pub fn occupied(slot_name: SlotName, item_name: String, price: Money, stock: u32) -> Self {
        Self {
            slot_name,
            item_name: Some(item_name),
            price: Some(price),
            stock: Some(stock),
        }
    }

    /// Record describing an empty (cleared) slot.
    #[must_use]
    pub fn cleared(slot_name: SlotName) -> Self {
        Self {
            slot_name,
            item_name: None,
            price: None,
            stock: None,
        }
    }

    /// Returns `true` if the record describes an empty slot.
    #[must_use]
    pub fn is_cleared(&self) -> bool {
        self.item_name.is_none()
    }
}

/// Remote machine registry and inventory store.
///
/// Every call has a bounded timeout. Failures are distinguishable by kind:
/// a missing record is `Error::NotFound`, an application-level rejection is
/// `Error::QueryFailure` carrying the status code, and a transport failure
/// is `Error::Connectivity`. Retry policy belongs to the caller (see the
/// [`crate::health`] helpers), never to implementations of this trait.
///
/// Methods are declared in return-position `impl Future` form with a
/// `Send` bound so that managers built over a gateway can run inside
/// spawned tasks (the restock listener does). Implementations are free to
/// use plain `async fn`.
pub trait RemoteGateway: Send + Sync {
    /// Fetch a machine's registration record.
    ///
    /// # Errors
    /// `Error::NotFound` if no machine is registered under `id`.
    fn get_machine(&self, id: &MachineId) -> impl Future<Output = Result<MachineRecord>> + Send;

    /// Register a new machine with the given grid dimensions.
    ///
    /// # Errors
    /// `Error::QueryFailure` with status 400 if the identity is already
    /// registered. Callers performing startup registration treat that
    /// status as success.
    fn register_machine(
        &self,
        id: &MachineId,
        row_count: u8,
        column_count: u8,
    ) -> impl Future<Output = Result<MachineRecord>> + Send;

    /// Write a machine's operating mode and return the updated record.
    fn set_machine_mode(
        &self,
        id: &MachineId,
        mode: Mode,
    ) -> impl Future<Output = Result<MachineRecord>> + Send;

    /// Rename a machine and return the updated record.
    fn set_machine_name(
        &self,
        id: &MachineId,
        name: &str,
    ) -> impl Future<Output = Result<MachineRecord>> + Send;

    /// Download the full slot inventory for a machine.
    fn get_inventory(&self, id: &MachineId)
    -> impl Future<Output = Result<Vec<SlotRecord>>> + Send;

    /// Apply a batch of slot changes (cleared records empty the slot).
    fn upsert_inventory(
        &self,
        id: &MachineId,
        changes: &[SlotRecord],
    ) -> impl Future<Output = Result<()>> + Send;

    /// Check whether a machine identity is registered.
    ///
    /// A `NotFound` from [`get_machine`](Self::get_machine) means absence,
    /// not failure; every other error propagates.
    fn machine_exists(&self, id: &MachineId) -> impl Future<Output = Result<bool>> + Send {
        async move {
            match self.get_machine(id).await {
                Ok(_) => Ok(true),
                Err(e) if e.is_not_found() => Ok(false),
                Err(e) => Err(e),
            }
        }
    }
}
