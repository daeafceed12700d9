//! Backups of the Launchpad state files.
//!
//! Each backup is a directory named after its creation time holding copies
//! of whichever state files were present.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDateTime, Utc};

use crate::domain::{AppError, Result, StateFileSet};

/// Directory name format for a single backup.
const BACKUP_DIR_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Copies state files aside and rotates old copies.
pub struct StateBackup {
    backups_dir: PathBuf,
    retention_days: u32,
}

/// Result of pruning old backups.
#[derive(Debug, Default)]
pub struct PruneResult {
    /// Backup directories removed.
    pub deleted: Vec<PathBuf>,
}

impl StateBackup {
    /// Create a backup store rooted at `backups_dir`.
    #[must_use]
    pub fn new(backups_dir: impl Into<PathBuf>, retention_days: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            retention_days,
        }
    }

    /// Copy every present file of `files` into a new timestamped directory.
    ///
    /// # Errors
    /// Returns error if the directory cannot be created or a copy fails.
    pub fn snapshot(&self, files: &StateFileSet, now: DateTime<Utc>) -> Result<PathBuf> {
        let target = self
            .backups_dir
            .join(now.format(BACKUP_DIR_FORMAT).to_string());

        fs::create_dir_all(&target).map_err(|e| {
            AppError::io(format!("Failed to create backup directory {}", target.display()), e)
        })?;

        for path in files.iter() {
            let Some(name) = path.file_name() else {
                continue;
            };
            if !path.exists() {
                continue;
            }

            fs::copy(path, target.join(name))
                .map_err(|e| AppError::io(format!("Failed to back up {}", path.display()), e))?;
            tracing::debug!(path = %path.display(), "Backed up state file");
        }

        Ok(target)
    }

    /// Remove backups older than the retention window.
    ///
    /// Directories whose names are not backup timestamps are left alone.
    ///
    /// # Errors
    /// Returns error if the backups directory cannot be read.
    pub fn prune(&self, now: DateTime<Utc>) -> Result<PruneResult> {
        let mut result = PruneResult::default();
        if !self.backups_dir.exists() {
            return Ok(result);
        }

        let cutoff = now - Duration::days(i64::from(self.retention_days));

        let entries = fs::read_dir(&self.backups_dir)
            .map_err(|e| AppError::io("Failed to read backups directory", e))?;

        for entry in entries.filter_map(std::result::Result::ok) {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }

            let Some(created) = backup_time(&path) else {
                continue;
            };

            if created < cutoff {
                match fs::remove_dir_all(&path) {
                    Ok(()) => {
                        tracing::info!(path = %path.display(), "Deleted old backup");
                        result.deleted.push(path);
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to delete old backup");
                    }
                }
            }
        }

        Ok(result)
    }
}

fn backup_time(path: &Path) -> Option<DateTime<Utc>> {
    let name = path.file_name()?.to_str()?;
    NaiveDateTime::parse_from_str(name, BACKUP_DIR_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
