//! Configuration file management.
//!
//! Handles loading and creating the TOML configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::{AppConfig, AppError, Result};

/// Default configuration file content.
const DEFAULT_CONFIG: &str = r#"# Launchpad Reset Configuration
# Auto-generated - edit as needed

[owner]
# Process that owns the Launchpad database
process = "Dock"

# Program used to terminate the owner by name
stop_program = "killall"

[owner.respawn]
# "supervisor": launchd brings the owner back on its own
# "command": run `program` with `args` after the settle delay
mode = "supervisor"
# program = "open"
# args = ["-a", "Dock"]

[storage]
# Keep the layout config in iCloud Drive (one file per host)
icloud = false

[backup]
# Copy the database files aside before every reset
enabled = false

# Number of days to keep backups (default: 30)
retention_days = 30

[paths]
# Custom data directory (optional, defaults to ~/.launchpad-reset)
# data_dir = "/custom/path"
# Launchpad database directory (optional, defaults to $(getconf DARWIN_USER_DIR)/com.apple.dock.launchpad/db)
# db_root = "/custom/db"
# Layout config file (optional)
# config = "/custom/launchpad.yaml"
"#;

/// Load configuration from file or fall back to defaults.
///
/// # Errors
/// Returns error if file exists but cannot be read or parsed.
pub fn load_config() -> Result<AppConfig> {
    let config_path = config_file_path();

    if config_path.exists() {
        load_config_from_file(&config_path)
    } else {
        tracing::debug!(path = %config_path.display(), "No config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// Load configuration from a specific file.
///
/// # Errors
/// Returns error if file cannot be read or parsed.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("Failed to read config file: {}", path.display()), e))?;

    toml::from_str(&content).map_err(|e| AppError::Config {
        message: format!("Failed to parse config file: {e}"),
    })
}

/// Create default configuration file if it doesn't exist.
///
/// Returns the path and whether it was newly written.
///
/// # Errors
/// Returns error if file cannot be created.
pub fn ensure_config_exists() -> Result<(PathBuf, bool)> {
    let config_path = config_file_path();
    let created = write_default_config(&config_path)?;
    Ok((config_path, created))
}

fn write_default_config(config_path: &Path) -> Result<bool> {
    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::io("Failed to create config directory", e))?;
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .map_err(|e| AppError::io("Failed to create default config", e))?;

    tracing::info!(path = %config_path.display(), "Created default configuration");

    Ok(true)
}

/// Get the path to the configuration file.
#[must_use]
pub fn config_file_path() -> PathBuf {
    AppConfig::default_data_dir().join("config.toml")
}
