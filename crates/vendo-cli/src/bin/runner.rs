//! Machine runner: drives a vending machine from keypad, display, and
//! motor peripherals.
//!
//! Usage: `runner [machine.json] [--mock]`
//!
//! Physical GPIO/I2C drivers are out of scope here, so the peripherals
//! are the mock devices: stdin is bridged onto the keypad (each typed
//! character becomes a key press: digits, `A`-`D`, `*`, `#`) and the LCD
//! renders to stdout. Key bindings follow the front panel: `A` enters
//! payment, `B` ends the transaction, `C` deletes, `D` confirms a slot
//! entry.

use anyhow::Context;
use std::time::Duration;
use vendo_cli::{Prompt, init_tracing};
use vendo_core::constants::{
    DISPLAY_LINES, DISPLAY_WIDTH, MSG_CHOOSE_SLOT, MSG_DISPENSING, MSG_INVALID_SLOT,
    MSG_OUT_OF_STOCK,
};
use vendo_core::{Error, MachineId, Money};
use vendo_hardware::mock::{MockKeypad, MockKeypadHandle, MockMotor};
use vendo_hardware::{
    DispenserGrid, DisplayController, DisplayDevice, HardwareError, KeypadDevice, KeypadKey,
    MotorDevice,
};
use vendo_machine::VendingMachine;
use vendo_notify::{NotifyBus, StatusReporter};
use vendo_remote::mock::{MockGateway, MockPayment};
use vendo_remote::{CardDetails, PaymentProcessor, RemoteGateway, SlotRecord};

const PAYMENT_KEY: char = 'A';
const END_TRANSACTION_KEY: char = 'B';
const DELETE_KEY: char = 'C';
const CONFIRM_KEY: char = 'D';

/// Card on file for walk-up purchases on the demo panel.
fn demo_card() -> CardDetails {
    CardDetails {
        card_number: "4242424242424242".to_string(),
        exp_month: "12".to_string(),
        exp_year: "2030".to_string(),
        cvc: "123".to_string(),
    }
}

/// LCD stand-in that renders each frame to stdout.
struct ConsoleDisplay;

impl DisplayDevice for ConsoleDisplay {
    fn width(&self) -> usize {
        DISPLAY_WIDTH
    }

    fn lines(&self) -> u8 {
        DISPLAY_LINES
    }

    async fn write_line(&mut self, line: u8, text: &str) -> vendo_hardware::Result<()> {
        println!("[LCD{line}] {text}");
        Ok(())
    }

    async fn clear_line(&mut self, _line: u8) -> vendo_hardware::Result<()> {
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if !args.iter().any(|a| a == "--mock") {
        // The runner needs real peripherals; until a GPIO backend lands
        // it only supports demo mode.
        anyhow::bail!("the runner currently requires --mock (no hardware backend built in)");
    }

    let machine_id = MachineId::new("vm-demo")?;
    let gateway = MockGateway::new();
    let mut machine =
        VendingMachine::connect(3, 3, machine_id.clone(), gateway.clone(), MockPayment::new())
            .await
            .context("connecting demo machine")?;
    seed_demo_slots(&gateway, &machine_id);
    machine.reload_data().await?;

    // Presence: online now, offline on any exit path.
    let bus = NotifyBus::new();
    let _reporter = StatusReporter::announce(&bus, machine_id);

    let (mut keypad, keypad_handle) = MockKeypad::new();
    tokio::spawn(bridge_stdin_to_keypad(keypad_handle));

    let mut display = DisplayController::new(ConsoleDisplay);

    let (rows, cols) = machine.inventory().dimensions();
    let motors: Vec<Vec<MockMotor>> = (0..rows)
        .map(|_| (0..cols).map(|_| MockMotor::new().0).collect())
        .collect();
    let mut dispenser = DispenserGrid::new(motors)?;

    println!("Type digits and A-D then press enter (D confirms a slot entry). Ctrl-D exits.");
    let result = run(&mut machine, &mut keypad, &mut display, &mut dispenser).await;
    display.clear_all().await.ok();
    result
}

fn seed_demo_slots(gateway: &MockGateway, machine_id: &MachineId) {
    gateway.seed_slot(
        machine_id,
        SlotRecord::occupied(
            "00".parse().expect("static slot name"),
            "Soda".to_string(),
            Money::from_dollars(1.5),
            10,
        ),
    );
    gateway.seed_slot(
        machine_id,
        SlotRecord::occupied(
            "10".parse().expect("static slot name"),
            "Sample".to_string(),
            Money::ZERO,
            5,
        ),
    );
}

/// Feed typed characters to the keypad until stdin closes.
async fn bridge_stdin_to_keypad(handle: MockKeypadHandle) {
    let mut prompt = Prompt::new();
    loop {
        let line = match prompt.ask("").await {
            Ok(line) => line,
            Err(_) => return,
        };
        for c in line.chars() {
            let key = match c {
                '0'..='9' => KeypadKey::Digit(c as u8 - b'0'),
                'A'..='D' => KeypadKey::Letter(c),
                '*' => KeypadKey::Star,
                '#' => KeypadKey::Hash,
                _ => continue,
            };
            if handle.send_key(key).await.is_err() {
                return;
            }
        }
    }
}

/// Outcome of one round of panel input.
enum Entry {
    /// Digits confirmed with the confirm key.
    Text(String),
    /// One of the requested function keys.
    Key(char),
}

async fn get_and_display_input<K: KeypadDevice, D: DisplayDevice + 'static>(
    keypad: &mut K,
    display: &mut DisplayController<D>,
    line1: &str,
    return_keys: &[char],
) -> anyhow::Result<Option<Entry>> {
    display.show(0, line1).await?;
    display.clear(1).await?;
    let mut entry = String::new();

    loop {
        let key = match keypad.read_key().await {
            Ok(key) => key,
            // Stdin closed: shut the panel down.
            Err(HardwareError::Disconnected { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match key {
            KeypadKey::Letter(CONFIRM_KEY) => return Ok(Some(Entry::Text(entry))),
            KeypadKey::Letter(c) if return_keys.contains(&c) => return Ok(Some(Entry::Key(c))),
            KeypadKey::Letter(DELETE_KEY) => {
                entry.pop();
            }
            KeypadKey::Digit(d) => entry.push_str(&d.to_string()),
            _ => {}
        }
        display.show(1, &entry).await?;
    }
}

async fn run<G, P, K, D, M>(
    machine: &mut VendingMachine<G, P>,
    keypad: &mut K,
    display: &mut DisplayController<D>,
    dispenser: &mut DispenserGrid<M>,
) -> anyhow::Result<()>
where
    G: RemoteGateway,
    P: PaymentProcessor,
    K: KeypadDevice,
    D: DisplayDevice + 'static,
    M: MotorDevice,
{
    loop {
        let prompt_line = format!("{MSG_CHOOSE_SLOT} OR {PAYMENT_KEY}");
        let Some(entry) =
            get_and_display_input(keypad, display, &prompt_line, &[PAYMENT_KEY]).await?
        else {
            return Ok(());
        };

        match entry {
            Entry::Key(_) => {
                if !perform_transaction(machine, keypad, display, dispenser).await? {
                    return Ok(());
                }
            }
            Entry::Text(slot) => match machine.buy_free_item(&slot).await {
                Ok(item) => {
                    display.show(0, MSG_DISPENSING).await?;
                    dispense(machine, dispenser, &slot).await;
                    println!("Dispensing item: {item}");
                }
                Err(Error::NotFreeItem { .. }) => match machine.get_price(&slot) {
                    Ok(price) => {
                        display.show(0, &format!("${price}")).await?;
                        tokio::time::sleep(Duration::from_secs(2)).await;
                    }
                    Err(e) => println!("Error: {e}"),
                },
                Err(e) => show_purchase_error(display, &e).await?,
            },
        }
    }
}

/// Returns `false` when the panel should shut down.
async fn perform_transaction<G, P, K, D, M>(
    machine: &mut VendingMachine<G, P>,
    keypad: &mut K,
    display: &mut DisplayController<D>,
    dispenser: &mut DispenserGrid<M>,
) -> anyhow::Result<bool>
where
    G: RemoteGateway,
    P: PaymentProcessor,
    K: KeypadDevice,
    D: DisplayDevice + 'static,
    M: MotorDevice,
{
    display.show(0, "ENTERING PAYMENT").await?;
    if let Err(e) = machine.start_transaction(&demo_card()).await {
        println!("Error: {e}");
        return Ok(true);
    }

    loop {
        let prompt_line = format!("ENTER SLOT OR {END_TRANSACTION_KEY}");
        let Some(entry) =
            get_and_display_input(keypad, display, &prompt_line, &[END_TRANSACTION_KEY]).await?
        else {
            return Ok(false);
        };

        match entry {
            Entry::Key(_) => {
                match machine.end_transaction().await {
                    Ok(total) => {
                        display.show(0, &format!("CHARGED ${total}")).await?;
                        tokio::time::sleep(Duration::from_secs(2)).await;
                        println!("Payment method was charged {total}");
                    }
                    Err(e) => println!("Error: {e}"),
                }
                return Ok(true);
            }
            Entry::Text(slot) => match machine.buy_item(&slot) {
                Ok(item) => {
                    display.show(0, &format!("{MSG_DISPENSING} {slot}")).await?;
                    dispense(machine, dispenser, &slot).await;
                    println!("Dispensing item: {item}");
                }
                Err(e) => show_purchase_error(display, &e).await?,
            },
        }
    }
}

/// Run the motor for a slot that was already dispensed in software.
async fn dispense<G, P, M>(
    machine: &VendingMachine<G, P>,
    dispenser: &mut DispenserGrid<M>,
    slot: &str,
) where
    G: RemoteGateway,
    P: PaymentProcessor,
    M: MotorDevice,
{
    let resolved = match machine.inventory().resolve_slot(slot) {
        Ok(resolved) => resolved,
        Err(e) => {
            println!("Error: {e}");
            return;
        }
    };
    if let Err(e) = dispenser.dispense(resolved.row(), resolved.col()).await {
        println!("Error: {e}");
    }
}

async fn show_purchase_error<D: DisplayDevice + 'static>(
    display: &mut DisplayController<D>,
    error: &Error,
) -> anyhow::Result<()> {
    match error {
        Error::NegativeStock | Error::EmptySlot { .. } => {
            println!("Item at this slot is out of stock, please try another.");
            display.show(0, MSG_OUT_OF_STOCK).await?;
        }
        Error::InvalidSlotName { .. } => {
            println!("Error: {error}");
            display.show(0, MSG_INVALID_SLOT).await?;
        }
        _ => println!("Error: {error}"),
    }
    tokio::time::sleep(Duration::from_secs(1)).await;
    Ok(())
}
