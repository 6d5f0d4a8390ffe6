//! Connection resolution.
//!
//! Server URL: explicit override → context server → [`DEFAULT_SERVER_URL`].
//! API key: explicit override → `AV_API_KEY` → context auth.

use crate::{ClientConfig, Context, Result};

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "AV_API_KEY";

/// Environment variable holding the server URL.
pub const SERVER_URL_ENV: &str = "AIENGINE_SERVER_URL";

/// Server used when nothing else is configured.
pub const DEFAULT_SERVER_URL: &str = "https://agentverse.ai";

/// Where the resolved API key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Passed explicitly (CLI flag).
    Explicit,
    /// Read from [`API_KEY_ENV`].
    Environment,
    /// Resolved from the selected context's auth section.
    Context,
}

/// Fully resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Name of the context used, if any.
    pub context: Option<String>,
    /// Server base URL.
    pub server: String,
    /// API key, if one could be found.
    pub api_key: Option<String>,
    /// Origin of `api_key`.
    pub key_source: Option<KeySource>,
}

/// Explicit values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides<'a> {
    /// Context name to use instead of `current-context`.
    pub context: Option<&'a str>,
    /// Server URL.
    pub server: Option<&'a str>,
    /// API key.
    pub api_key: Option<&'a str>,
}

/// Resolve the connection settings from config, overrides and the environment.
pub fn resolve_connection(config: &ClientConfig, overrides: &Overrides<'_>) -> Result<Connection> {
    resolve_connection_with(config, overrides, |key| std::env::var(key).ok())
}

fn resolve_connection_with<F>(
    config: &ClientConfig,
    overrides: &Overrides<'_>,
    env: F,
) -> Result<Connection>
where
    F: Fn(&str) -> Option<String>,
{
    let context = config.select(overrides.context)?;

    let server = overrides
        .server
        .map(str::to_string)
        .or_else(|| context.map(|c| c.server.clone()))
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

    let (api_key, key_source) = resolve_api_key_with(overrides.api_key, context, &env)?
        .map_or((None, None), |(key, source)| (Some(key), Some(source)));

    Ok(Connection {
        context: context.map(|c| c.name.clone()),
        server,
        api_key,
        key_source,
    })
}

fn resolve_api_key_with<F>(
    explicit: Option<&str>,
    context: Option<&Context>,
    env: &F,
) -> Result<Option<(String, KeySource)>>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = explicit.filter(|k| !k.trim().is_empty()) {
        return Ok(Some((key.to_string(), KeySource::Explicit)));
    }
    if let Some(key) = env(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
        return Ok(Some((key, KeySource::Environment)));
    }
    match context.and_then(|c| c.auth.as_ref()) {
        Some(auth) => Ok(auth
            .resolve_with(env)?
            .map(|key| (key, KeySource::Context))),
        None => Ok(None),
    }
}
