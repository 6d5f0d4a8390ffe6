//! Client configuration for the AI engine CLI.
//!
//! - Kubeconfig-style YAML file with named contexts (server + auth bundle)
//! - `current-context` for default selection
//! - Defaults for session model and polling cadence
//! - Connection resolution (flag → environment → context → built-in default)

pub mod client;
pub mod discovery;
pub mod error;
pub mod resolve;

pub use client::{
    AuthConfig, ClientConfig, ClientDefaults, Context, load_client_config,
    load_client_config_from, save_client_config, save_client_config_to,
};
pub use discovery::{client_config_path, config_dir, log_dir};
pub use error::{ConfigError, Result};
pub use resolve::{
    API_KEY_ENV, Connection, DEFAULT_SERVER_URL, KeySource, Overrides, SERVER_URL_ENV,
    resolve_connection,
};
