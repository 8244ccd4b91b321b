//! Customer purchase CLI.
//!
//! Usage: `customer [machine.json] [--mock]`
//!
//! With `--mock` the machine runs against in-memory collaborators seeded
//! with a few demo slots instead of the HTTP backend.

use anyhow::Context;
use vendo_cli::{MachineConfig, Prompt, call_with_reconnect, init_tracing};
use vendo_core::{Error, MachineId, Money};
use vendo_machine::VendingMachine;
use vendo_remote::mock::{MockGateway, MockPayment};
use vendo_remote::{
    CardDetails, HttpGateway, HttpGatewayConfig, HttpPaymentClient, PaymentProcessor,
    RemoteGateway, SlotRecord,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut prompt = Prompt::new();

    if args.iter().any(|a| a == "--mock") {
        let machine_id = MachineId::new("vm-demo")?;
        let gateway = MockGateway::new();
        let mut machine =
            VendingMachine::connect(3, 3, machine_id.clone(), gateway.clone(), MockPayment::new())
                .await
                .context("connecting demo machine")?;
        seed_demo_slots(&gateway, &machine_id);
        machine.reload_data().await?;
        return run(machine, None, &mut prompt).await;
    }

    let config_path = args
        .first()
        .cloned()
        .unwrap_or_else(|| "machine.json".to_string());
    let config = MachineConfig::load(&config_path)?;

    let machine_id = MachineId::new(config.hardware_id.clone())?;
    let gateway = HttpGateway::new(HttpGatewayConfig::new(config.remote_url.clone()))?;
    let payment = HttpPaymentClient::new(
        config.remote_url.clone(),
        std::time::Duration::from_millis(vendo_core::constants::DEFAULT_REMOTE_TIMEOUT),
    )?;

    let machine = VendingMachine::connect(config.rows, config.columns, machine_id, gateway, payment)
        .await
        .context("connecting to remote registry")?;

    run(machine, Some(config.remote_url), &mut prompt).await
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
            "01".parse().expect("static slot name"),
            "Chips".to_string(),
            Money::from_dollars(2.25),
            4,
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

async fn run<G: RemoteGateway, P: PaymentProcessor>(
    mut machine: VendingMachine<G, P>,
    reconnect_url: Option<String>,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    loop {
        println!();
        println!("Vending Machine Inventory:");
        println!("{}", machine.list_options());

        let choice = prompt
            .ask(
                "\nPlease select one of the following options\n\
                 1. List options\n\
                 2. Dispense free item\n\
                 3. Enter payment information\n\
                 4. Reload inventory\n\
                 5. Exit customer CLI",
            )
            .await?;

        match choice.as_str() {
            "1" => {} // the loop reprints the listing
            "2" => dispense_free(&mut machine, prompt).await?,
            "3" => perform_transaction(&mut machine, reconnect_url.as_deref(), prompt).await?,
            "4" => {
                match call_with_reconnect(reconnect_url.as_deref(), async || {
                    machine.reload_data().await
                })
                .await
                {
                    Ok(()) => println!("Data reloaded."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "5" => return Ok(()),
            _ => println!("Invalid input, please type an option 1 - 5"),
        }
    }
}

async fn dispense_free<G: RemoteGateway, P: PaymentProcessor>(
    machine: &mut VendingMachine<G, P>,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    let slot = prompt
        .ask("Please type the slot name of the item you would like to dispense:")
        .await?;

    match machine.buy_free_item(&slot).await {
        Ok(item) => println!("Dispensing item: {item}"),
        Err(Error::NegativeStock) => {
            println!("Item at this slot is out of stock, please try another.");
        }
        Err(e) => println!("Error: {e}"),
    }
    Ok(())
}

async fn perform_transaction<G: RemoteGateway, P: PaymentProcessor>(
    machine: &mut VendingMachine<G, P>,
    reconnect_url: Option<&str>,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    let card = CardDetails {
        card_number: prompt.ask("Card number:").await?,
        exp_month: prompt.ask("Expiry month:").await?,
        exp_year: prompt.ask("Expiry year:").await?,
        cvc: prompt.ask("CVC:").await?,
    };

    if let Err(e) = machine.start_transaction(&card).await {
        println!("Error: {e}");
        return Ok(());
    }
    println!("Payment information entered.");

    loop {
        let selection = prompt
            .ask(
                "Please type the slot name of the item you would like to purchase, \
                 or Q to finish the transaction:",
            )
            .await?;

        if selection == "Q" {
            match call_with_reconnect(reconnect_url, async || machine.end_transaction().await)
                .await
            {
                Ok(total) => {
                    println!("Payment method was charged {total}");
                    return Ok(());
                }
                // The transaction stays open; the customer can retry Q
                // or keep buying.
                Err(e) => println!("Error: {e}"),
            }
            continue;
        }

        match machine.buy_item(&selection) {
            Ok(item) => {
                println!("Dispensing item: {item}");
                println!("Running total: {}", machine.transaction_total());
            }
            Err(Error::NegativeStock) => {
                println!("Item at this slot is out of stock, please try another.");
            }
            Err(e) => println!("Error: {e}"),
        }
    }
}
