//! Credits command - account credit balance.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::{Context, print_json};

/// Arguments for the credits command.
#[derive(Args, Debug)]
pub struct CreditsArgs {}

/// Run the credits command.
pub async fn run(_args: CreditsArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;
    let balance = connected.client.credits().balance().await?;

    if ctx.json_output {
        return print_json(&balance);
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("Credits").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!("  {} {}", dim.apply_to("Total:    "), balance.total_credits);
    println!("  {} {}", dim.apply_to("Used:     "), balance.used_credits);
    println!(
        "  {} {}",
        dim.apply_to("Available:"),
        style(balance.available_credits).green()
    );
    println!();

    Ok(())
}
