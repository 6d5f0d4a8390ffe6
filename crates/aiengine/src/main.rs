//! aiengine - command-line client for the AI engine service.
//!
//! Main entry point for the aiengine CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{chat, config, credits, execute, functions, groups, models};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// aiengine - talk to the AI engine from the terminal
#[derive(Parser)]
#[command(name = "aiengine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (default: current context, then https://agentverse.ai)
    #[arg(long, global = true, env = "AIENGINE_SERVER_URL")]
    pub server: Option<String>,

    /// API key (default: current context's auth)
    #[arg(long, global = true, env = "AV_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Context to use instead of the current context
    #[arg(long, global = true)]
    pub context: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Function group management
    Groups(groups::GroupsArgs),

    /// Function listing
    Functions(functions::FunctionsArgs),

    /// Show the account credit balance
    Credits(credits::CreditsArgs),

    /// List models with remaining credits
    Models(models::ModelsArgs),

    /// Start an interactive chat session with a function group
    Chat(chat::ChatArgs),

    /// Execute specific functions and print the engine's messages
    Execute(execute::ExecuteArgs),

    /// Client configuration and contexts
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "aiengine=debug,aiengine_client=debug,aiengine_config=debug,info"
    } else {
        "aiengine=info,aiengine_client=info,warn"
    };

    let log_dir = aiengine_config::log_dir().unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "aiengine.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "aiengine=trace,aiengine_client=trace,aiengine_config=trace,info",
                )),
        )
        .init();

    let ctx = commands::Context {
        server_override: cli.server,
        api_key_override: cli.api_key,
        context_override: cli.context,
        json_output: cli.json,
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Groups(args) => groups::run(args, &ctx).await,
        Commands::Functions(args) => functions::run(args, &ctx).await,
        Commands::Credits(args) => credits::run(args, &ctx).await,
        Commands::Models(args) => models::run(args, &ctx).await,
        Commands::Chat(args) => chat::run(args, &ctx).await,
        Commands::Execute(args) => execute::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx).await,
    }
}
