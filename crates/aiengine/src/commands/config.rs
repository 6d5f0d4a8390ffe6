//! Config command - client configuration and contexts.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::{Style, style};
use serde::Serialize;

use aiengine_config::{AuthConfig, Context as ClientContext, KeySource};

use super::display::{print_dim, print_success};
use super::{Context, print_json};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show contexts, defaults and the resolved connection
    Show,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// Server URL (e.g., https://agentverse.ai)
        #[arg(long)]
        server: Option<String>,

        /// Environment variable holding the API key
        #[arg(long, conflicts_with = "key_file")]
        key_env: Option<String>,

        /// File holding the API key
        #[arg(long)]
        key_file: Option<PathBuf>,
    },

    /// Delete a context
    RemoveContext {
        /// Context name to delete
        name: String,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::SetContext {
            name,
            server,
            key_env,
            key_file,
        } => cmd_set_context(&name, server, key_env, key_file),
        ConfigCommand::RemoveContext { name } => cmd_remove_context(&name),
    }
}

/// Resolved connection for JSON output. The key itself is never printed.
#[derive(Debug, Serialize)]
struct ShowOutput<'a> {
    config_path: Option<String>,
    context: Option<&'a str>,
    server: &'a str,
    api_key_source: Option<&'static str>,
    contexts: Vec<&'a str>,
    defaults: &'a aiengine_config::ClientDefaults,
}

fn key_source_label(source: Option<KeySource>) -> Option<&'static str> {
    source.map(|s| match s {
        KeySource::Explicit => "flag",
        KeySource::Environment => "environment",
        KeySource::Context => "context",
    })
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let (connection, config) = ctx.resolve()?;
    let path = aiengine_config::client_config_path();

    if ctx.json_output {
        return print_json(&ShowOutput {
            config_path: path.map(|p| p.display().to_string()),
            context: connection.context.as_deref(),
            server: &connection.server,
            api_key_source: key_source_label(connection.key_source),
            contexts: config.context_names(),
            defaults: &config.defaults,
        });
    }

    let dim = Style::new().dim();
    println!("{}", style("Client Configuration").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    match &path {
        Some(p) => println!("  {} {}", dim.apply_to("File:   "), p.display()),
        None => println!("  {} (no config directory)", dim.apply_to("File:   ")),
    }
    println!(
        "  {} {}",
        dim.apply_to("Context:"),
        connection.context.as_deref().unwrap_or("(none)")
    );
    println!("  {} {}", dim.apply_to("Server: "), connection.server);
    println!(
        "  {} {}",
        dim.apply_to("API key:"),
        key_source_label(connection.key_source)
            .map(|s| format!("set (from {})", s))
            .unwrap_or_else(|| "not found".to_string())
    );
    println!();

    if config.contexts.is_empty() {
        print_dim("No contexts configured. Create one with:");
        print_dim("  aiengine config set-context prod --server https://agentverse.ai --key-env AV_API_KEY");
    } else {
        println!("CURRENT   NAME            SERVER");
        let current = config.current_context.as_deref();
        for c in &config.contexts {
            let marker = if current == Some(c.name.as_str()) {
                "*"
            } else {
                " "
            };
            println!("{}         {:<15} {}", marker, c.name, c.server);
        }
    }
    println!();

    println!("{}", style("Defaults").bold());
    println!(
        "  {} {}",
        dim.apply_to("model:          "),
        config
            .defaults
            .model
            .as_deref()
            .unwrap_or(aiengine_client::DEFAULT_MODEL_ID)
    );
    println!(
        "  {} {}",
        dim.apply_to("poll-interval-ms:"),
        config.defaults.poll_interval_ms
    );
    println!(
        "  {} {}",
        dim.apply_to("max-empty-polls: "),
        config.defaults.max_empty_polls
    );

    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = aiengine_config::load_client_config()?;

    config.use_context(name)?;
    aiengine_config::save_client_config(&config)?;

    println!("Switched to context \"{}\".", name);

    Ok(())
}

fn cmd_set_context(
    name: &str,
    server: Option<String>,
    key_env: Option<String>,
    key_file: Option<PathBuf>,
) -> Result<()> {
    let mut config = aiengine_config::load_client_config()?;

    let auth = match (key_env, key_file) {
        (Some(var), _) => Some(AuthConfig::api_key_env(var)),
        (None, Some(path)) => Some(AuthConfig::api_key_file(path)),
        (None, None) => None,
    };

    let updated = match config.get_context(name).cloned() {
        Some(mut existing) => {
            if let Some(url) = server {
                existing.server = url;
            }
            if auth.is_some() {
                existing.auth = auth;
            }
            print_success(&format!("Context \"{}\" modified.", name));
            existing
        }
        None => {
            let Some(url) = server else {
                bail!("--server is required when creating a new context");
            };
            let mut created = ClientContext::new(name, url);
            created.auth = auth;
            print_success(&format!("Context \"{}\" created.", name));
            created
        }
    };
    config.set_context(updated);

    // The first context becomes current.
    if config.current_context.is_none() && config.contexts.len() == 1 {
        config.use_context(name)?;
        println!("Context \"{}\" set as current context.", name);
    }

    aiengine_config::save_client_config(&config)?;
    Ok(())
}

fn cmd_remove_context(name: &str) -> Result<()> {
    let mut config = aiengine_config::load_client_config()?;

    if config.remove_context(name).is_none() {
        bail!("context \"{}\" not found", name);
    }
    aiengine_config::save_client_config(&config)?;
    println!("Context \"{}\" deleted.", name);
    if config.current_context.is_none() {
        print_dim("No current context. Use 'aiengine config use-context <name>' to set one.");
    }

    Ok(())
}
