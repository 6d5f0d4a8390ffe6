//! CLI command handlers.

pub mod chat;
pub mod config;
pub mod credits;
pub mod display;
pub mod execute;
pub mod functions;
pub mod groups;
pub mod models;

use aiengine_client::{EngineClient, PollPolicy};
use aiengine_config::{ClientConfig, ClientDefaults, Connection, Overrides};
use anyhow::{Context as _, Result, bail};
use serde::Serialize;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Server URL from `--server` / `AIENGINE_SERVER_URL`.
    pub server_override: Option<String>,
    /// API key from `--api-key` / `AV_API_KEY`.
    pub api_key_override: Option<String>,
    /// Context name from `--context`.
    pub context_override: Option<String>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

/// A connected client plus the config defaults it was resolved with.
pub struct Connected {
    pub client: EngineClient,
    pub defaults: ClientDefaults,
}

impl Connected {
    /// Poll policy from config defaults, with per-command overrides.
    pub fn poll_policy(&self, interval_ms: Option<u64>, max_empty_polls: Option<u32>) -> PollPolicy {
        PollPolicy {
            interval: interval_ms
                .map(std::time::Duration::from_millis)
                .unwrap_or_else(|| self.defaults.poll_interval()),
            max_empty_polls: max_empty_polls.unwrap_or(self.defaults.max_empty_polls),
        }
    }
}

impl Context {
    /// Resolve server and API key from flags, environment and client config.
    pub fn resolve(&self) -> Result<(Connection, ClientConfig)> {
        let config = aiengine_config::load_client_config().context("loading client config")?;
        let overrides = Overrides {
            context: self.context_override.as_deref(),
            server: self.server_override.as_deref(),
            api_key: self.api_key_override.as_deref(),
        };
        let connection = aiengine_config::resolve_connection(&config, &overrides)?;
        Ok((connection, config))
    }

    /// Build an engine client, failing if no API key can be found.
    pub fn connect(&self) -> Result<Connected> {
        let (connection, config) = self.resolve()?;
        let Some(api_key) = connection.api_key else {
            bail!(
                "no API key found; pass --api-key, set {} or configure auth for the context",
                aiengine_config::API_KEY_ENV
            );
        };

        tracing::debug!(
            server = %connection.server,
            context = ?connection.context,
            key_source = ?connection.key_source,
            "Connecting"
        );

        let client = EngineClient::builder()
            .base_url(connection.server)
            .api_key(api_key)
            .timeout(config.defaults.timeout())
            .build()?;

        Ok(Connected {
            client,
            defaults: config.defaults,
        })
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
