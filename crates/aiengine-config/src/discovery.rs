//! Config directory discovery.
//!
//! `AIENGINE_CONFIG_DIR` overrides the platform default
//! (`~/.config/aiengine` on Linux, `~/Library/Application Support/aiengine`
//! on macOS).

use std::path::PathBuf;

/// Application directory name under the platform config dir.
const APP_NAME: &str = "aiengine";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "AIENGINE_CONFIG_DIR";

/// Client config filename.
pub const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Subdirectory holding rolling log files.
const LOG_DIR: &str = "logs";

/// Get the config directory.
pub fn config_dir() -> Option<PathBuf> {
    config_dir_with(|key| std::env::var(key).ok())
}

/// Get the path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Get the directory for log files.
pub fn log_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join(LOG_DIR))
}

fn config_dir_with<F>(env: F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = env(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
