//! Models command - model catalogue with remaining credits.

use anyhow::Result;
use clap::Args;
use console::{Style, style};

use super::{Context, print_json};

/// Arguments for the models command.
#[derive(Args, Debug)]
pub struct ModelsArgs {}

/// Run the models command.
pub async fn run(_args: ModelsArgs, ctx: &Context) -> Result<()> {
    let connected = ctx.connect()?;
    let models = connected.client.credits().models().await?;

    if ctx.json_output {
        return print_json(&models);
    }

    let dim = Style::new().dim();
    let default_model = connected
        .defaults
        .model
        .as_deref()
        .unwrap_or(aiengine_client::DEFAULT_MODEL_ID);

    println!("{}", style(format!("{:<20} {:<24} CREDITS", "ID", "NAME")).bold());
    for model in &models {
        let marker = if model.id == default_model { "*" } else { " " };
        println!(
            "{:<20} {:<24} {}{}",
            model.id,
            model.name,
            model.credits,
            dim.apply_to(marker)
        );
    }

    Ok(())
}
