//! Application configuration models.
//!
//! Describes the owning process, path overrides and backup policy loaded
//! from `config.toml`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// How the owning process comes back after it is stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum RespawnPolicy {
    /// The host's process supervisor (launchd) respawns the owner.
    #[default]
    Supervisor,
    /// Run an explicit command to start the owner again.
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

/// The process that owns the Launchpad state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Process name passed to the stop program.
    #[serde(default = "default_owner_process")]
    pub process: String,

    /// Program used to terminate the owner by name.
    #[serde(default = "default_stop_program")]
    pub stop_program: String,

    /// Restart behavior after the settle delay.
    #[serde(default)]
    pub respawn: RespawnPolicy,
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            process: default_owner_process(),
            stop_program: default_stop_program(),
            respawn: RespawnPolicy::default(),
        }
    }
}

fn default_owner_process() -> String {
    "Dock".into()
}

fn default_stop_program() -> String {
    "killall".into()
}

/// Path overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathConfig {
    /// Base data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Launchpad database directory.
    #[serde(default)]
    pub db_root: Option<PathBuf>,

    /// Layout config file.
    #[serde(default)]
    pub config: Option<PathBuf>,
}

/// Where the layout config file lives by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Keep the layout config in iCloud Drive.
    #[serde(default)]
    pub icloud: bool,
}

/// Backups of the state files taken before deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Back up state files on every reset.
    #[serde(default)]
    pub enabled: bool,

    /// Number of days to retain backups.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            retention_days: default_retention_days(),
        }
    }
}

const fn default_retention_days() -> u32 {
    30
}

/// Complete application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub owner: OwnerConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub backup: BackupConfig,
}

impl AppConfig {
    /// Get the data directory, using default if not configured.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.paths
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".launchpad-reset")
    }

    /// Get the backups directory path.
    #[must_use]
    pub fn backups_dir(&self) -> PathBuf {
        self.data_dir().join("backups")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.owner.process, "Dock");
        assert_eq!(config.owner.stop_program, "killall");
        assert_eq!(config.owner.respawn, RespawnPolicy::Supervisor);
        assert!(!config.backup.enabled);
        assert_eq!(config.backup.retention_days, 30);
    }

    #[test]
    fn test_respawn_command_parses() {
        let config: AppConfig = toml::from_str(
            r#"
            [owner.respawn]
            mode = "command"
            program = "open"
            args = ["-a", "Dock"]
            "#,
        )
        .unwrap();

        assert_eq!(
            config.owner.respawn,
            RespawnPolicy::Command {
                program: "open".into(),
                args: vec!["-a".into(), "Dock".into()],
            }
        );
        assert_eq!(config.owner.process, "Dock");
    }

    #[test]
    fn test_custom_data_dir() {
        let mut config = AppConfig::default();
        config.paths.data_dir = Some(PathBuf::from("/tmp/lpr"));
        assert_eq!(config.backups_dir(), PathBuf::from("/tmp/lpr/backups"));
    }
}
