//! Vendor restocking CLI.
//!
//! Usage: `vendor [machine.json] [--mock]`
//!
//! Attaches to an already-registered machine identity. With `--mock` a
//! demo machine is registered in an in-memory gateway first.

use anyhow::Context;
use vendo_cli::{MachineConfig, Prompt, call_with_reconnect, init_tracing};
use vendo_core::{MachineId, Money};
use vendo_machine::VendorInterface;
use vendo_remote::mock::MockGateway;
use vendo_remote::{HttpGateway, HttpGatewayConfig, RemoteGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut prompt = Prompt::new();

    if args.iter().any(|a| a == "--mock") {
        let machine_id = MachineId::new("vm-demo")?;
        let gateway = MockGateway::with_machine(&machine_id, 3, 3);
        let vendor = VendorInterface::connect(machine_id, gateway)
            .await
            .context("attaching to demo machine")?;
        return run(vendor, None, &mut prompt).await;
    }

    let config_path = args
        .first()
        .cloned()
        .unwrap_or_else(|| "machine.json".to_string());
    let config = MachineConfig::load(&config_path)?;

    let machine_id = MachineId::new(config.hardware_id.clone())?;
    let gateway = HttpGateway::new(HttpGatewayConfig::new(config.remote_url.clone()))?;

    let vendor = VendorInterface::connect(machine_id, gateway)
        .await
        .context("attaching to remote machine")?;

    run(vendor, Some(config.remote_url), &mut prompt).await
}

async fn run<G: RemoteGateway>(
    mut vendor: VendorInterface<G>,
    reconnect_url: Option<String>,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    loop {
        println!();
        println!("{vendor}");

        let choice = prompt
            .ask(
                "\nPlease select one of the following options\n\
                 1. View inventory\n\
                 2. Reload inventory\n\
                 3. Start restocking\n\
                 4. Rename vending machine\n\
                 5. Exit vendor CLI",
            )
            .await?;

        match choice.as_str() {
            "1" => println!("{}", vendor.list_options()),
            "2" => {
                match call_with_reconnect(reconnect_url.as_deref(), async || {
                    vendor.reload_data().await
                })
                .await
                {
                    Ok(()) => println!("Data reloaded."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "3" => restocking_session(&mut vendor, reconnect_url.as_deref(), prompt).await?,
            "4" => {
                let new_name = prompt.ask("Please enter the new machine name:").await?;
                match vendor.rename(&new_name).await {
                    Ok(()) => println!("Renamed."),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "5" => return Ok(()),
            _ => println!("Invalid input, please type an option 1 - 5"),
        }
    }
}

async fn restocking_session<G: RemoteGateway>(
    vendor: &mut VendorInterface<G>,
    reconnect_url: Option<&str>,
    prompt: &mut Prompt,
) -> anyhow::Result<()> {
    if let Err(e) = vendor.start_restocking().await {
        println!("Error: {e}");
        return Ok(());
    }

    loop {
        println!();
        println!("{}", vendor.list_options());

        let choice = prompt
            .ask(
                "\nPlease select one of the following options\n\
                 1. Update stock of a slot\n\
                 2. Add or override an item\n\
                 3. Set the cost of an item in a slot\n\
                 4. Clear a slot\n\
                 5. End restocking",
            )
            .await?;

        match choice.as_str() {
            "1" => {
                let slot = prompt.ask("Please enter the slot you'd like to update:").await?;
                let amount = prompt
                    .ask_i64("Please enter the amount you'd like to change the stock by:")
                    .await?;
                match vendor.change_stock_of_slot(&slot, amount) {
                    Ok(()) => println!("Updated slot {slot} by {amount}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "2" => {
                let slot = prompt.ask("Please enter the slot to stock:").await?;
                let name = prompt.ask("Please enter the item name:").await?;
                let cost = prompt.ask_dollars("Please enter the item cost:").await?;
                let stock = prompt.ask_i64("Please enter the stock count:").await?;
                let stock = match u32::try_from(stock) {
                    Ok(stock) => stock,
                    Err(_) => {
                        println!("Stock must be at least 0.");
                        continue;
                    }
                };
                match vendor.add_item_to_slot(&slot, &name, Money::from_dollars(cost), stock) {
                    Ok(()) => println!("Stocked slot {slot} with {stock} x {name}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "3" => {
                let slot = prompt.ask("Please enter the slot to re-price:").await?;
                let cost = prompt.ask_dollars("Please enter the new cost:").await?;
                match vendor.set_cost_of_slot(&slot, Money::from_dollars(cost)) {
                    Ok(()) => println!("Updated cost of slot {slot}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "4" => {
                let slot = prompt.ask("Please enter the slot to clear:").await?;
                match vendor.clear_slot(&slot) {
                    Ok(()) => println!("Cleared slot {slot}"),
                    Err(e) => println!("Error: {e}"),
                }
            }
            "5" => {
                match call_with_reconnect(reconnect_url, async || vendor.end_restocking().await)
                    .await
                {
                    Ok(()) => return Ok(()),
                    // Session stays open so the edits are not lost.
                    Err(e) => println!("Error: {e}"),
                }
            }
            _ => println!("Invalid input, please type an option 1 - 5"),
        }
    }
}
