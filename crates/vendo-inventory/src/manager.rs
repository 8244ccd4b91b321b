//! Slot grid ownership, the pending-change ledger, and mode gating.

use crate::item::Item;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use vendo_core::{
    Error, MachineId, Mode, Money, Result, SlotName,
    constants::{EMPTY_SLOT_LABEL, MAX_GRID_COLS, MAX_GRID_ROWS, MIN_GRID_DIM},
};
use vendo_remote::{RemoteGateway, SlotRecord};

/// Inventory state for one machine identity.
///
/// Owns the grid of optional [`Item`]s, the change ledger pending upload,
/// and the cached operating mode. The remote registry is the authority for
/// the mode: transitions re-read it immediately before validating, so two
/// front-ends that both believe the machine is idle cannot both win.
///
/// All slot mutations are sequential and atomic from the caller's point of
/// view: an operation either fully applies or leaves grid and ledger
/// untouched.
#[derive(Debug)]
pub struct InventoryManager<G> {
    machine_id: MachineId,
    rows: u8,
    cols: u8,
    grid: Vec<Vec<Option<Item>>>,
    change_log: BTreeMap<SlotName, Option<Item>>,
    mode: Mode,
    gateway: G,
}

impl<G: RemoteGateway> InventoryManager<G> {
    /// Create a manager with an empty grid, in `Idle` mode.
    ///
    /// # Errors
    /// `Error::InvalidDimensions` unless both dimensions are in `[1, 10]`.
    pub fn new(rows: u8, cols: u8, machine_id: MachineId, gateway: G) -> Result<Self> {
        if rows < MIN_GRID_DIM || cols < MIN_GRID_DIM || rows > MAX_GRID_ROWS || cols > MAX_GRID_COLS
        {
            return Err(Error::invalid_dimensions(format!(
                "Rows and columns must be between {MIN_GRID_DIM} and {MAX_GRID_ROWS}, got {rows}x{cols}"
            )));
        }

        Ok(Self {
            machine_id,
            rows,
            cols,
            grid: vec![vec![None; cols as usize]; rows as usize],
            change_log: BTreeMap::new(),
            mode: Mode::Idle,
            gateway,
        })
    }

    /// The machine identity this manager is bound to.
    #[must_use]
    pub fn machine_id(&self) -> &MachineId {
        &self.machine_id
    }

    /// The remote gateway this manager persists through.
    ///
    /// Orchestrators use this for registry operations that are not slot
    /// state (registration, renaming); slot and mode writes always go
    /// through the manager itself.
    #[must_use]
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Grid dimensions as `(rows, cols)`.
    #[must_use]
    pub fn dimensions(&self) -> (u8, u8) {
        (self.rows, self.cols)
    }

    /// The cached operating mode.
    ///
    /// This is a cache of the remote authority; it is refreshed on every
    /// transition attempt and on every sync.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether any slot changes are waiting to be flushed.
    #[must_use]
    pub fn has_pending_changes(&self) -> bool {
        !self.change_log.is_empty()
    }

    /// Resolve a slot name against this machine's grid.
    ///
    /// # Errors
    /// `Error::InvalidSlotName` if the name is not exactly two digits or
    /// addresses a slot at or beyond either dimension.
    pub fn resolve_slot(&self, slot_name: &str) -> Result<SlotName> {
        let slot: SlotName = slot_name.parse()?;
        if slot.row() >= self.rows || slot.col() >= self.cols {
            return Err(Error::invalid_slot_name(format!(
                "Slot {slot} is outside the {}x{} grid",
                self.rows, self.cols
            )));
        }
        Ok(slot)
    }

    fn slot(&self, slot: SlotName) -> &Option<Item> {
        &self.grid[slot.row() as usize][slot.col() as usize]
    }

    fn slot_mut(&mut self, slot: SlotName) -> &mut Option<Item> {
        &mut self.grid[slot.row() as usize][slot.col() as usize]
    }

    /// Render the stock listing, one slot per line in row-major order.
    ///
    /// Occupied slots render as `"{row}{col}: {name}, Price: {cost},
    /// Left in Stock: {stock}"`. Slots with zero stock are omitted unless
    /// `show_empty_slots` is set, and unoccupied slots appear (as
    /// `<EMPTY>`) only when it is set. No trailing newline.
    #[must_use]
    pub fn get_stock_information(&self, show_empty_slots: bool) -> String {
        let mut lines = Vec::new();

        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                match cell {
                    None => {
                        if show_empty_slots {
                            lines.push(format!("{r}{c}: {EMPTY_SLOT_LABEL}"));
                        }
                    }
                    Some(item) => {
                        if item.stock() != 0 || show_empty_slots {
                            lines.push(format!(
                                "{r}{c}: {}, Price: {}, Left in Stock: {}",
                                item.name(),
                                item.cost(),
                                item.stock()
                            ));
                        }
                    }
                }
            }
        }

        lines.join("\n")
    }

    /// Adjust the stock of the item in a slot by a signed delta.
    ///
    /// For a negative delta the monetary value of the removed units
    /// (`-delta * cost`) is returned; the transaction layer accumulates
    /// it into the purchase total. Non-negative deltas return zero.
    ///
    /// # Errors
    /// - `Error::InvalidSlotName` if the name does not resolve.
    /// - `Error::EmptySlot` if the slot holds no item.
    /// - `Error::NegativeStock` if the delta would take stock below zero;
    ///   the slot is left unchanged.
    pub fn change_stock(&mut self, slot_name: &str, delta: i64) -> Result<Money> {
        let slot = self.resolve_slot(slot_name)?;

        let item = self
            .slot_mut(slot)
            .as_mut()
            .ok_or_else(|| Error::empty_slot(slot.to_string()))?;
        item.adjust_stock(delta)?;

        let cost = item.cost();
        let snapshot = item.clone();
        self.change_log.insert(slot, Some(snapshot));

        if delta < 0 {
            Ok(cost.times((-delta) as u32))
        } else {
            Ok(Money::ZERO)
        }
    }

    /// Stock a slot with a new item, replacing anything already there.
    ///
    /// Replacement is unconditional: the previous item and its remaining
    /// stock are discarded.
    ///
    /// # Errors
    /// - `Error::InvalidSlotName` if the name does not resolve.
    /// - Item validation errors from [`Item::new`].
    pub fn add_item(&mut self, slot_name: &str, item_name: &str, stock: u32, cost: Money) -> Result<()> {
        let slot = self.resolve_slot(slot_name)?;
        let item = Item::new(item_name, cost, i64::from(stock))?;

        debug!(slot = %slot, item = item_name, stock, "stocking slot");
        *self.slot_mut(slot) = Some(item.clone());
        self.change_log.insert(slot, Some(item));
        Ok(())
    }

    /// Empty a slot, recording the clear for the next flush.
    ///
    /// # Errors
    /// `Error::InvalidSlotName` if the name does not resolve.
    pub fn clear_slot(&mut self, slot_name: &str) -> Result<()> {
        let slot = self.resolve_slot(slot_name)?;
        *self.slot_mut(slot) = None;
        self.change_log.insert(slot, None);
        Ok(())
    }

    /// Change the cost of the item in a slot.
    ///
    /// # Errors
    /// - `Error::InvalidSlotName` if the name does not resolve.
    /// - `Error::EmptySlot` if the slot holds no item.
    /// - `Error::NegativeCost` if the new cost is below zero.
    pub fn set_cost(&mut self, slot_name: &str, new_cost: Money) -> Result<()> {
        let slot = self.resolve_slot(slot_name)?;

        let item = self
            .slot_mut(slot)
            .as_mut()
            .ok_or_else(|| Error::empty_slot(slot.to_string()))?;
        item.set_cost(new_cost)?;

        let snapshot = item.clone();
        self.change_log.insert(slot, Some(snapshot));
        Ok(())
    }

    /// The item in a slot.
    ///
    /// # Errors
    /// - `Error::InvalidSlotName` if the name does not resolve.
    /// - `Error::EmptySlot` if the slot holds no item.
    pub fn get_item(&self, slot_name: &str) -> Result<&Item> {
        let slot = self.resolve_slot(slot_name)?;
        self.slot(slot)
            .as_ref()
            .ok_or_else(|| Error::empty_slot(slot.to_string()))
    }

    /// Transition the operating mode.
    ///
    /// The authoritative mode is re-read from the registry first and the
    /// transition rule is applied to that fresh value, then the new mode
    /// is written back. A stale local cache therefore cannot legalize a
    /// transition: if another session already moved the machine out of
    /// `Idle`, this request is evaluated against the true state and
    /// rejected.
    ///
    /// # Errors
    /// - `Error::InvalidMode` if the transition is not legal from the
    ///   freshly-read mode. The redundant `Idle -> Idle` transition is
    ///   rejected with a dedicated message.
    /// - Gateway errors from the read or the write-back.
    pub async fn set_mode(&mut self, new_mode: Mode) -> Result<()> {
        let record = self.gateway.get_machine(&self.machine_id).await?;
        self.mode = record.mode;

        if !self.mode.can_transition_to(new_mode) {
            let message = if self.mode == Mode::Idle && new_mode == Mode::Idle {
                "Cannot change mode from IDLE to IDLE".to_string()
            } else {
                format!("Cannot change mode from {} to {}", self.mode, new_mode)
            };
            return Err(Error::invalid_mode(message));
        }

        self.gateway
            .set_machine_mode(&self.machine_id, new_mode)
            .await?;
        info!(machine = %self.machine_id, from = %self.mode, to = %new_mode, "mode changed");
        self.mode = new_mode;
        Ok(())
    }

    /// Replace local grid and mode with the remote record.
    ///
    /// This is a full overwrite: the remote store wins, and any unflushed
    /// ledger entries are discarded (a warning is logged so the condition
    /// is observable).
    ///
    /// # Errors
    /// - `Error::DimensionMismatch` if the remote record's dimensions
    ///   disagree with the configured grid; local state is untouched.
    /// - Gateway errors; local state is untouched.
    pub async fn sync_from_remote(&mut self) -> Result<()> {
        let record = self.gateway.get_machine(&self.machine_id).await?;
        if record.row_count != self.rows || record.column_count != self.cols {
            return Err(Error::DimensionMismatch {
                local_rows: self.rows,
                local_cols: self.cols,
                remote_rows: record.row_count,
                remote_cols: record.column_count,
            });
        }

        let inventory = self.gateway.get_inventory(&self.machine_id).await?;

        let mut grid = vec![vec![None; self.cols as usize]; self.rows as usize];
        for slot_record in inventory {
            let slot = slot_record.slot_name;
            if slot.row() >= self.rows || slot.col() >= self.cols {
                return Err(Error::invalid_slot_name(format!(
                    "Remote inventory addresses slot {slot} outside the {}x{} grid",
                    self.rows, self.cols
                )));
            }
            if slot_record.is_cleared() {
                continue;
            }
            let (name, price, stock) = match (
                slot_record.item_name,
                slot_record.price,
                slot_record.stock,
            ) {
                (Some(name), Some(price), Some(stock)) => (name, price, stock),
                _ => {
                    return Err(Error::query_failure(
                        500,
                        format!("inventory record for slot {slot} is missing price or stock"),
                    ));
                }
            };
            grid[slot.row() as usize][slot.col() as usize] =
                Some(Item::new(name, price, i64::from(stock))?);
        }

        if !self.change_log.is_empty() {
            warn!(
                machine = %self.machine_id,
                discarded = self.change_log.len(),
                "sync overwrote unflushed slot changes (remote wins)"
            );
        }

        self.grid = grid;
        self.change_log.clear();
        self.mode = record.mode;
        info!(machine = %self.machine_id, mode = %self.mode, "synced inventory from remote");
        Ok(())
    }

    /// Upload the pending change ledger as one upsert batch.
    ///
    /// The ledger is cleared only after the upload succeeds; on failure it
    /// is kept intact so the flush can be retried.
    ///
    /// # Errors
    /// Gateway errors from the upload.
    pub async fn flush_to_remote(&mut self) -> Result<()> {
        if self.change_log.is_empty() {
            debug!(machine = %self.machine_id, "no pending changes to flush");
            return Ok(());
        }

        let changes: Vec<SlotRecord> = self
            .change_log
            .iter()
            .map(|(slot, item)| match item {
                Some(item) => SlotRecord::occupied(
                    *slot,
                    item.name().to_string(),
                    item.cost(),
                    item.stock(),
                ),
                None => SlotRecord::cleared(*slot),
            })
            .collect();

        self.gateway
            .upsert_inventory(&self.machine_id, &changes)
            .await?;
        info!(machine = %self.machine_id, count = changes.len(), "flushed slot changes");
        self.change_log.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use vendo_remote::mock::{GatewayCall, MockGateway};

    fn machine_id() -> MachineId {
        MachineId::new("vm-1").unwrap()
    }

    /// 3x3 manager backed by a registered mock machine.
    fn manager() -> InventoryManager<MockGateway> {
        let id = machine_id();
        let gateway = MockGateway::with_machine(&id, 3, 3);
        InventoryManager::new(3, 3, id, gateway).unwrap()
    }

    fn gateway_of(manager: &InventoryManager<MockGateway>) -> MockGateway {
        manager.gateway.clone()
    }

    #[test]
    fn test_initialization() {
        let inv = manager();
        assert_eq!(inv.mode(), Mode::Idle);
        assert_eq!(inv.dimensions(), (3, 3));
        assert!(!inv.has_pending_changes());
    }

    #[rstest]
    #[case(0, 5)]
    #[case(5, 0)]
    #[case(11, 5)]
    #[case(5, 11)]
    fn test_invalid_dimensions(#[case] rows: u8, #[case] cols: u8) {
        let id = machine_id();
        let result = InventoryManager::new(rows, cols, id, MockGateway::new());
        assert!(matches!(result, Err(Error::InvalidDimensions { .. })));
    }

    #[rstest]
    #[case("00", 0, 0)]
    #[case("12", 1, 2)]
    #[case("22", 2, 2)]
    fn test_resolve_slot_valid(#[case] name: &str, #[case] row: u8, #[case] col: u8) {
        let inv = manager();
        let slot = inv.resolve_slot(name).unwrap();
        assert_eq!((slot.row(), slot.col()), (row, col));
    }

    #[rstest]
    #[case("0")] // wrong length
    #[case("000")] // wrong length
    #[case("a0")] // non-digit
    #[case("30")] // row == rows
    #[case("03")] // col == cols
    #[case("99")] // well outside
    fn test_resolve_slot_invalid(#[case] name: &str) {
        let inv = manager();
        assert!(matches!(
            inv.resolve_slot(name),
            Err(Error::InvalidSlotName { .. })
        ));
    }

    #[test]
    fn test_add_item_then_get_item() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();

        let item = inv.get_item("00").unwrap();
        assert_eq!(item.name(), "Soda");
        assert_eq!(item.cost(), Money::from_cents(150));
        assert_eq!(item.stock(), 10);
    }

    #[test]
    fn test_add_item_overwrites_existing() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        inv.add_item("00", "Chips", 4, Money::from_dollars(2.25))
            .unwrap();

        let item = inv.get_item("00").unwrap();
        assert_eq!(item.name(), "Chips");
        assert_eq!(item.stock(), 4);
    }

    #[test]
    fn test_get_stock_information() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();

        let info = inv.get_stock_information(false);
        assert!(info.contains("00: Soda, Price: 1.5, Left in Stock: 10"));
    }

    #[test]
    fn test_stock_information_hides_and_shows_empty_slots() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        inv.add_item("01", "Chips", 0, Money::from_dollars(2.0))
            .unwrap();

        let hidden = inv.get_stock_information(false);
        assert_eq!(hidden, "00: Soda, Price: 1.5, Left in Stock: 10");
        assert!(!hidden.ends_with('\n'));

        let shown = inv.get_stock_information(true);
        assert!(shown.contains("01: Chips, Price: 2.0, Left in Stock: 0"));
        assert!(shown.contains("02: <EMPTY>"));
        assert!(shown.contains("22: <EMPTY>"));
        // 1 header-free line per slot of the 3x3 grid
        assert_eq!(shown.lines().count(), 9);
    }

    #[test]
    fn test_stock_information_is_row_major() {
        let mut inv = manager();
        inv.add_item("10", "Water", 5, Money::from_dollars(1.0))
            .unwrap();
        inv.add_item("01", "Gum", 7, Money::from_dollars(0.5))
            .unwrap();

        let info = inv.get_stock_information(false);
        let lines: Vec<&str> = info.lines().collect();
        assert!(lines[0].starts_with("01:"));
        assert!(lines[1].starts_with("10:"));
    }

    #[test]
    fn test_change_stock_returns_removed_value() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();

        let removed = inv.change_stock("00", -2).unwrap();
        assert_eq!(removed, Money::from_dollars(3.0));
        assert_eq!(inv.get_item("00").unwrap().stock(), 8);
    }

    #[test]
    fn test_change_stock_restock_returns_zero() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();

        assert_eq!(inv.change_stock("00", 5).unwrap(), Money::ZERO);
        assert_eq!(inv.get_item("00").unwrap().stock(), 15);
    }

    #[test]
    fn test_change_stock_empty_slot() {
        let mut inv = manager();
        assert!(matches!(
            inv.change_stock("01", 5),
            Err(Error::EmptySlot { .. })
        ));
    }

    #[test]
    fn test_change_stock_below_zero_is_rejected_without_mutation() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 1, Money::from_dollars(1.5))
            .unwrap();

        assert!(matches!(
            inv.change_stock("00", -2),
            Err(Error::NegativeStock)
        ));
        assert_eq!(inv.get_item("00").unwrap().stock(), 1);
    }

    #[test]
    fn test_clear_slot() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        inv.clear_slot("00").unwrap();

        assert!(matches!(inv.get_item("00"), Err(Error::EmptySlot { .. })));
    }

    #[test]
    fn test_set_cost() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        inv.set_cost("00", Money::from_dollars(1.75)).unwrap();
        assert_eq!(inv.get_item("00").unwrap().cost(), Money::from_cents(175));

        assert!(matches!(
            inv.set_cost("11", Money::from_dollars(1.0)),
            Err(Error::EmptySlot { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_mode_transitions() {
        let mut inv = manager();

        inv.set_mode(Mode::Restocking).await.unwrap();
        assert_eq!(inv.mode(), Mode::Restocking);

        inv.set_mode(Mode::Idle).await.unwrap();
        assert_eq!(inv.mode(), Mode::Idle);

        let err = inv.set_mode(Mode::Idle).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid mode: Cannot change mode from IDLE to IDLE"
        );
        assert_eq!(inv.mode(), Mode::Idle);

        inv.set_mode(Mode::Transaction).await.unwrap();
        let err = inv.set_mode(Mode::Restocking).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMode { .. }));
        assert_eq!(inv.mode(), Mode::Transaction);
    }

    #[tokio::test]
    async fn test_set_mode_writes_back_to_remote() {
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        inv.set_mode(Mode::Transaction).await.unwrap();

        let record = gateway.machine(&machine_id()).unwrap();
        assert_eq!(record.mode, Mode::Transaction);
    }

    #[tokio::test]
    async fn test_set_mode_revalidates_against_remote() {
        // Another session put the machine into TRANSACTION behind our back;
        // the local cache still says IDLE.
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        gateway.force_mode(&machine_id(), Mode::Transaction);
        assert_eq!(inv.mode(), Mode::Idle);

        let err = inv.set_mode(Mode::Transaction).await.unwrap_err();
        assert!(matches!(err, Error::InvalidMode { .. }));
        // The cache now reflects the authoritative state.
        assert_eq!(inv.mode(), Mode::Transaction);
    }

    #[tokio::test]
    async fn test_set_mode_has_no_side_effects_on_failure() {
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        gateway.force_mode(&machine_id(), Mode::Restocking);

        inv.set_mode(Mode::Transaction).await.unwrap_err();

        // The rejected transition must not have been written back.
        let record = gateway.machine(&machine_id()).unwrap();
        assert_eq!(record.mode, Mode::Restocking);
    }

    #[tokio::test]
    async fn test_flush_uploads_ledger_and_clears_it() {
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        inv.change_stock("00", -2).unwrap();
        inv.add_item("01", "Chips", 4, Money::from_dollars(2.25))
            .unwrap();
        inv.clear_slot("01").unwrap();

        inv.flush_to_remote().await.unwrap();
        assert!(!inv.has_pending_changes());

        // Last write per slot wins: slot 00 at stock 8, slot 01 cleared.
        let stored = gateway.inventory(&machine_id());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].slot_name.to_string(), "00");
        assert_eq!(stored[0].stock, Some(8));

        let calls = gateway.take_calls();
        assert!(calls.contains(&GatewayCall::UpsertInventory("vm-1".to_string(), 2)));
    }

    #[tokio::test]
    async fn test_flush_failure_keeps_ledger() {
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();

        gateway.fail_next(Error::connectivity("simulated outage"));
        assert!(inv.flush_to_remote().await.is_err());
        assert!(inv.has_pending_changes());

        inv.flush_to_remote().await.unwrap();
        assert!(!inv.has_pending_changes());
    }

    #[tokio::test]
    async fn test_sync_round_trip_reconstructs_items() {
        let mut writer = manager();
        writer
            .add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        writer
            .add_item("12", "Chips", 4, Money::from_dollars(2.25))
            .unwrap();
        writer.flush_to_remote().await.unwrap();

        let mut reader =
            InventoryManager::new(3, 3, machine_id(), gateway_of(&writer)).unwrap();
        reader.sync_from_remote().await.unwrap();

        let soda = reader.get_item("00").unwrap();
        assert_eq!(soda.name(), "Soda");
        assert_eq!(soda.cost(), Money::from_cents(150));
        assert_eq!(soda.stock(), 10);

        let chips = reader.get_item("12").unwrap();
        assert_eq!(chips.name(), "Chips");
        assert_eq!(chips.stock(), 4);
    }

    #[tokio::test]
    async fn test_sync_overwrites_unflushed_changes() {
        let mut inv = manager();
        inv.add_item("00", "Soda", 10, Money::from_dollars(1.5))
            .unwrap();
        assert!(inv.has_pending_changes());

        // Remote has no inventory; sync wins and the ledger is dropped.
        inv.sync_from_remote().await.unwrap();
        assert!(!inv.has_pending_changes());
        assert!(matches!(inv.get_item("00"), Err(Error::EmptySlot { .. })));
    }

    #[tokio::test]
    async fn test_sync_adopts_remote_mode() {
        let mut inv = manager();
        let gateway = gateway_of(&inv);
        gateway.force_mode(&machine_id(), Mode::Restocking);

        inv.sync_from_remote().await.unwrap();
        assert_eq!(inv.mode(), Mode::Restocking);
    }

    #[tokio::test]
    async fn test_sync_rejects_dimension_mismatch() {
        let id = machine_id();
        let gateway = MockGateway::with_machine(&id, 4, 5);
        let mut inv = InventoryManager::new(3, 3, id, gateway).unwrap();

        let err = inv.sync_from_remote().await.unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { .. }));
        // Local state untouched.
        assert_eq!(inv.dimensions(), (3, 3));
        assert_eq!(inv.mode(), Mode::Idle);
    }
}
