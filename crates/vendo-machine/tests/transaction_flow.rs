//! End-to-end purchase flows against the in-memory collaborators.

use vendo_core::{Error, MachineId, Mode, Money};
use vendo_machine::VendingMachine;
use vendo_remote::mock::{MockGateway, MockPayment};
use vendo_remote::{CardDetails, SlotRecord};

fn machine_id() -> MachineId {
    MachineId::new("vm-1").unwrap()
}

fn card() -> CardDetails {
    CardDetails {
        card_number: "4242424242424242".to_string(),
        exp_month: "12".to_string(),
        exp_year: "2030".to_string(),
        cvc: "123".to_string(),
    }
}

fn seed_soda(gateway: &MockGateway, stock: u32) {
    gateway.seed_slot(
        &machine_id(),
        SlotRecord::occupied(
            "00".parse().unwrap(),
            "Soda".to_string(),
            Money::from_dollars(1.5),
            stock,
        ),
    );
}

async fn connect(
    gateway: &MockGateway,
    payment: &MockPayment,
) -> VendingMachine<MockGateway, MockPayment> {
    VendingMachine::connect(3, 3, machine_id(), gateway.clone(), payment.clone())
        .await
        .unwrap()
}

#[tokio::test]
async fn connect_registers_unknown_machine() {
    let gateway = MockGateway::new();
    let payment = MockPayment::new();

    let machine = connect(&gateway, &payment).await;
    assert_eq!(machine.inventory().mode(), Mode::Idle);

    let record = gateway.machine(&machine_id()).unwrap();
    assert_eq!((record.row_count, record.column_count), (3, 3));
}

#[tokio::test]
async fn connect_treats_existing_registration_as_success() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();

    // Registration returns status 400 here; connect must still succeed
    // and load the existing inventory.
    let machine = connect(&gateway, &payment).await;
    assert!(machine.list_options().contains("00: Soda"));
}

#[tokio::test]
async fn connect_rejects_dimension_mismatch() {
    let gateway = MockGateway::with_machine(&machine_id(), 4, 5);
    let payment = MockPayment::new();

    let err = VendingMachine::connect(3, 3, machine_id(), gateway, payment)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch { .. }));
}

#[tokio::test]
async fn full_transaction_charges_flushes_and_returns_to_idle() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    machine.start_transaction(&card()).await.unwrap();
    assert_eq!(machine.inventory().mode(), Mode::Transaction);
    assert_eq!(payment.tokens_issued(), 1);

    let name = machine.buy_item("00").unwrap();
    assert_eq!(name, "Soda");
    assert_eq!(machine.transaction_total(), Money::from_dollars(1.5));

    let total = machine.end_transaction().await.unwrap();
    assert_eq!(total, Money::from_dollars(1.5));
    assert_eq!(machine.transaction_total(), Money::ZERO);
    assert_eq!(machine.inventory().mode(), Mode::Idle);

    // Charge went out in cents, and the dispense reached the remote store.
    let charges = payment.charges();
    assert_eq!(charges.len(), 1);
    assert_eq!(charges[0].1.cents(), 150);
    let stored = gateway.inventory(&machine_id());
    assert_eq!(stored[0].stock, Some(9));

    // No second end without a new start.
    let err = machine.end_transaction().await.unwrap_err();
    assert!(matches!(err, Error::InvalidMode { .. }));
}

#[tokio::test]
async fn multiple_purchases_accumulate() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    gateway.seed_slot(
        &machine_id(),
        SlotRecord::occupied(
            "01".parse().unwrap(),
            "Chips".to_string(),
            Money::from_dollars(2.25),
            4,
        ),
    );
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    machine.start_transaction(&card()).await.unwrap();
    machine.buy_item("00").unwrap();
    machine.buy_item("00").unwrap();
    machine.buy_item("01").unwrap();
    assert_eq!(machine.transaction_total(), Money::from_dollars(5.25));

    let total = machine.end_transaction().await.unwrap();
    assert_eq!(total, Money::from_dollars(5.25));
}

#[tokio::test]
async fn buy_item_requires_transaction_mode() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    let err = machine.buy_item("00").unwrap_err();
    assert!(matches!(err, Error::InvalidMode { .. }));
    assert_eq!(machine.transaction_total(), Money::ZERO);
}

#[tokio::test]
async fn rejected_transition_requests_no_token() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    // Another session already owns the machine.
    gateway.force_mode(&machine_id(), Mode::Restocking);

    let err = machine.start_transaction(&card()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidMode { .. }));
    assert_eq!(payment.tokens_issued(), 0);
}

#[tokio::test]
async fn failed_charge_keeps_transaction_open() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    machine.start_transaction(&card()).await.unwrap();
    machine.buy_item("00").unwrap();

    payment.fail_next_charge(Error::payment("card declined"));
    let err = machine.end_transaction().await.unwrap_err();
    assert!(matches!(err, Error::Payment { .. }));

    // Nothing was reset and nothing was flushed.
    assert_eq!(machine.inventory().mode(), Mode::Transaction);
    assert_eq!(machine.transaction_total(), Money::from_dollars(1.5));
    assert_eq!(gateway.inventory(&machine_id())[0].stock, Some(10));

    // A retry completes the transaction.
    let total = machine.end_transaction().await.unwrap();
    assert_eq!(total, Money::from_dollars(1.5));
    assert_eq!(machine.inventory().mode(), Mode::Idle);
    assert_eq!(gateway.inventory(&machine_id())[0].stock, Some(9));
}

#[tokio::test]
async fn empty_transaction_skips_the_charge() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    machine.start_transaction(&card()).await.unwrap();
    let total = machine.end_transaction().await.unwrap();

    assert_eq!(total, Money::ZERO);
    assert!(payment.charges().is_empty());
    assert_eq!(machine.inventory().mode(), Mode::Idle);
}

#[tokio::test]
async fn free_item_dispenses_without_payment() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    gateway.seed_slot(
        &machine_id(),
        SlotRecord::occupied("11".parse().unwrap(), "Sample".to_string(), Money::ZERO, 5),
    );
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    let name = machine.buy_free_item("11").await.unwrap();
    assert_eq!(name, "Sample");
    assert_eq!(machine.inventory().mode(), Mode::Idle);
    assert_eq!(payment.tokens_issued(), 0);
    assert!(payment.charges().is_empty());

    // Flushed before returning to idle.
    let stored = gateway.inventory(&machine_id());
    assert_eq!(stored[0].stock, Some(4));
}

#[tokio::test]
async fn free_item_rejects_priced_slots() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    let err = machine.buy_free_item("00").await.unwrap_err();
    assert!(matches!(err, Error::NotFreeItem { .. }));

    // The cost check happens before any mode transition.
    assert_eq!(machine.inventory().mode(), Mode::Idle);
    assert_eq!(gateway.machine(&machine_id()).unwrap().mode, Mode::Idle);
}

#[tokio::test]
async fn free_item_out_of_stock_returns_machine_to_idle() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    gateway.seed_slot(
        &machine_id(),
        SlotRecord::occupied("11".parse().unwrap(), "Sample".to_string(), Money::ZERO, 0),
    );
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;

    let err = machine.buy_free_item("11").await.unwrap_err();
    assert!(matches!(err, Error::NegativeStock));

    // The aborted dispense must not strand the machine in TRANSACTION.
    assert_eq!(machine.inventory().mode(), Mode::Idle);
    assert_eq!(gateway.machine(&machine_id()).unwrap().mode, Mode::Idle);
}

#[tokio::test]
async fn get_price_is_ungated() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    seed_soda(&gateway, 10);
    let payment = MockPayment::new();
    let machine = connect(&gateway, &payment).await;

    assert_eq!(machine.get_price("00").unwrap(), Money::from_dollars(1.5));
    assert!(matches!(
        machine.get_price("01"),
        Err(Error::EmptySlot { .. })
    ));
}

#[tokio::test]
async fn reload_data_picks_up_remote_changes() {
    let gateway = MockGateway::with_machine(&machine_id(), 3, 3);
    let payment = MockPayment::new();
    let mut machine = connect(&gateway, &payment).await;
    assert_eq!(machine.list_options(), "");

    seed_soda(&gateway, 10);
    machine.reload_data().await.unwrap();
    assert!(machine.list_options().contains("00: Soda"));
}
