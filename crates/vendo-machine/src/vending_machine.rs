//! Customer-facing purchase orchestration.

use tracing::{info, warn};
use vendo_core::{Error, MachineId, Mode, Money, Result};
use vendo_inventory::InventoryManager;
use vendo_remote::{CardDetails, PaymentProcessor, PaymentToken, RemoteGateway};

/// One machine's customer session surface.
///
/// Holds the transaction context: an accumulated running total and the
/// payment authorization token. Both are populated exactly on transaction
/// start and reset exactly on transaction end; outside `Transaction` mode
/// they are empty.
#[derive(Debug)]
pub struct VendingMachine<G, P> {
    inventory: InventoryManager<G>,
    payment: P,
    payment_token: Option<PaymentToken>,
    transaction_total: Money,
}

impl<G: RemoteGateway, P: PaymentProcessor> VendingMachine<G, P> {
    /// Register (or re-attach to) a machine identity and load its state.
    ///
    /// Registration is idempotent from the caller's point of view: the
    /// registry rejects a duplicate identity with status 400, which is
    /// treated as "already ours". The initial sync then loads the grid
    /// and authoritative mode.
    ///
    /// # Errors
    /// - `Error::InvalidDimensions` for an out-of-range grid.
    /// - `Error::DimensionMismatch` if the existing registration disagrees
    ///   with the configured dimensions.
    /// - Any non-duplicate registration failure, and gateway errors from
    ///   the initial sync.
    pub async fn connect(
        rows: u8,
        cols: u8,
        machine_id: MachineId,
        gateway: G,
        payment: P,
    ) -> Result<Self> {
        let mut inventory = InventoryManager::new(rows, cols, machine_id, gateway)?;

        match inventory
            .gateway()
            .register_machine(inventory.machine_id(), rows, cols)
            .await
        {
            Ok(_) => info!(machine = %inventory.machine_id(), "machine registered"),
            Err(Error::QueryFailure { status: 400, .. }) => {
                info!(machine = %inventory.machine_id(), "machine already registered");
            }
            Err(e) => return Err(e),
        }

        inventory.sync_from_remote().await?;

        Ok(Self {
            inventory,
            payment,
            payment_token: None,
            transaction_total: Money::ZERO,
        })
    }

    /// The underlying inventory manager (read-only).
    #[must_use]
    pub fn inventory(&self) -> &InventoryManager<G> {
        &self.inventory
    }

    /// The running total of the current transaction.
    #[must_use]
    pub fn transaction_total(&self) -> Money {
        self.transaction_total
    }

    /// Stock listing for customers: occupied, in-stock slots only.
    #[must_use]
    pub fn list_options(&self) -> String {
        self.inventory.get_stock_information(false)
    }

    /// Begin a purchase session.
    ///
    /// The mode transition happens first; a payment token is requested
    /// only once the machine is actually in `Transaction` mode, so a
    /// rejected transition never contacts the payment processor.
    ///
    /// # Errors
    /// - `Error::InvalidMode` if the machine is not idle.
    /// - Payment errors from token creation; the machine stays in
    ///   `Transaction` mode for the caller to resolve or abort.
    pub async fn start_transaction(&mut self, card: &CardDetails) -> Result<()> {
        self.inventory.set_mode(Mode::Transaction).await?;
        let token = self.payment.create_token(card).await?;
        self.payment_token = Some(token);
        Ok(())
    }

    /// Dispense one unit from a slot, accumulating its price.
    ///
    /// Returns the purchased item's name.
    ///
    /// # Errors
    /// - `Error::InvalidMode` if no transaction is in progress.
    /// - `Error::InvalidSlotName` / `Error::EmptySlot` /
    ///   `Error::NegativeStock` from the stock adjustment; the running
    ///   total is untouched on failure.
    pub fn buy_item(&mut self, slot_name: &str) -> Result<String> {
        if self.inventory.mode() != Mode::Transaction {
            return Err(Error::invalid_mode(
                "Items can only be bought while a transaction is in progress; start a transaction first",
            ));
        }

        let purchase_price = self.inventory.change_stock(slot_name, -1)?;
        self.transaction_total += purchase_price;
        Ok(self.inventory.get_item(slot_name)?.name().to_string())
    }

    /// Dispense a zero-cost item without a payment session.
    ///
    /// The machine passes through `Transaction` mode internally and is
    /// back in `Idle` (with the dispense flushed) before this returns, so
    /// no payment token is ever involved. If the dispense or flush fails
    /// mid-way, the mode is restored to `Idle` on a best-effort basis
    /// before the error propagates.
    ///
    /// # Errors
    /// - `Error::NotFreeItem` if the slot's cost is not exactly zero.
    /// - `Error::InvalidMode` if the machine is not idle.
    /// - Stock, flush, and gateway errors.
    pub async fn buy_free_item(&mut self, slot_name: &str) -> Result<String> {
        let item = self.inventory.get_item(slot_name)?;
        if !item.cost().is_zero() {
            return Err(Error::NotFreeItem {
                cost: item.cost().to_string(),
            });
        }
        let name = item.name().to_string();

        self.inventory.set_mode(Mode::Transaction).await?;

        let dispense = async {
            self.inventory.change_stock(slot_name, -1)?;
            self.inventory.flush_to_remote().await
        };
        if let Err(e) = dispense.await {
            if let Err(revert) = self.inventory.set_mode(Mode::Idle).await {
                warn!(error = %revert, "failed to return machine to idle after aborted free dispense");
            }
            return Err(e);
        }

        self.inventory.set_mode(Mode::Idle).await?;
        info!(slot = slot_name, item = %name, "free item dispensed");
        Ok(name)
    }

    /// Charge the accumulated total and close the purchase session.
    ///
    /// Ordering matters: the charge and the inventory flush must both
    /// succeed before the transaction context is reset and the mode
    /// returns to `Idle`. A failed charge leaves the machine in
    /// `Transaction` with the total and token intact, so the failure is
    /// never silently absorbed. A total of zero skips the charge call.
    ///
    /// Returns the total that was charged.
    ///
    /// # Errors
    /// - `Error::InvalidMode` if no transaction is in progress.
    /// - Payment, flush, and gateway errors.
    pub async fn end_transaction(&mut self) -> Result<Money> {
        if self.inventory.mode() != Mode::Transaction {
            return Err(Error::invalid_mode(
                "Transaction is not currently in progress; start a transaction first",
            ));
        }

        if !self.transaction_total.is_zero() {
            let token = self
                .payment_token
                .as_ref()
                .ok_or_else(|| Error::payment("transaction has no payment token"))?;
            self.payment.charge(token, self.transaction_total).await?;
        }

        self.inventory.flush_to_remote().await?;

        let total = self.transaction_total;
        self.transaction_total = Money::ZERO;
        self.payment_token = None;

        self.inventory.set_mode(Mode::Idle).await?;
        info!(total = %total, "transaction complete");
        Ok(total)
    }

    /// A slot's unit price. Pure read, no mode gating.
    ///
    /// # Errors
    /// `Error::InvalidSlotName` / `Error::EmptySlot`.
    pub fn get_price(&self, slot_name: &str) -> Result<Money> {
        Ok(self.inventory.get_item(slot_name)?.cost())
    }

    /// Re-load grid and mode from the remote store.
    ///
    /// # Errors
    /// Gateway and dimension-mismatch errors from the sync.
    pub async fn reload_data(&mut self) -> Result<()> {
        self.inventory.sync_from_remote().await
    }
}
