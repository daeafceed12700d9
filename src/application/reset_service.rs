//! Launchpad reset orchestration.
//!
//! Stops the Dock, removes the Launchpad database files, waits for the
//! system to settle and brings the Dock back. Steps run strictly in order
//! and the first fatal failure aborts the reset.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use crate::domain::{
    AppError, OwnerConfig, ResetReport, ResetStep, RespawnPolicy, Result, StateFileSet,
};
use crate::infrastructure::{CommandRunner, LogSink, Logger, StateBackup};

/// Grace period between stopping the owner and bringing it back.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Deadline for an explicit respawn command.
const RESPAWN_DEADLINE: Duration = Duration::from_secs(10);

/// Runs a single reset of the Launchpad state.
pub struct ResetOrchestrator<'a> {
    runner: CommandRunner,
    owner: OwnerConfig,
    backup: Option<StateBackup>,
    settle_delay: Duration,
    log: Logger<'a>,
}

impl<'a> ResetOrchestrator<'a> {
    /// Create an orchestrator for the given owner process.
    #[must_use]
    pub fn new(owner: OwnerConfig, sink: &'a dyn LogSink) -> Self {
        Self {
            runner: CommandRunner::new(),
            owner,
            backup: None,
            settle_delay: SETTLE_DELAY,
            log: Logger::new(sink),
        }
    }

    /// Back up the state files before deleting them.
    #[must_use]
    pub fn with_backup(mut self, backup: StateBackup) -> Self {
        self.backup = Some(backup);
        self
    }

    #[cfg(test)]
    fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Reset the Launchpad state stored under `db_root`.
    ///
    /// Safe to call repeatedly: files that are already gone are skipped.
    ///
    /// # Errors
    /// Returns `OwnerStopFailed`, `FileRemovalFailed` or
    /// `OwnerRestartFailed` for the step that aborted the reset.
    pub async fn reset(&self, db_root: &Path) -> Result<ResetReport> {
        let mut report = ResetReport {
            db_root: db_root.to_path_buf(),
            ..ResetReport::default()
        };

        match self.run_steps(db_root, &mut report).await {
            Ok(()) => {
                self.log.info(0, "reset complete", &[]);
                Ok(report)
            }
            Err(e) => {
                let step = report
                    .steps
                    .last()
                    .map_or_else(String::new, ToString::to_string);
                self.log
                    .error(0, "reset aborted", &[("step", step), ("error", e.to_string())]);
                Err(e)
            }
        }
    }

    async fn run_steps(&self, db_root: &Path, report: &mut ResetReport) -> Result<()> {
        let files = StateFileSet::under(db_root);

        report.steps.push(ResetStep::StopOwner);
        self.stop_owner().await?;

        if let Some(backup) = &self.backup {
            report.steps.push(ResetStep::BackupStateFiles);
            report.backup_dir = Some(self.backup_state_files(backup, &files)?);
        }

        report.steps.push(ResetStep::DeleteStateFiles);
        self.delete_state_files(&files, report)?;

        report.steps.push(ResetStep::SettleDelay);
        self.log.info(
            1,
            "waiting for system to settle",
            &[("seconds", self.settle_delay.as_secs().to_string())],
        );
        tokio::time::sleep(self.settle_delay).await;

        report.steps.push(ResetStep::RestartOwner);
        self.restart_owner().await
    }

    async fn stop_owner(&self) -> Result<()> {
        let owner = &self.owner.process;
        self.log.info(1, &format!("stopping {owner}"), &[]);

        self.runner
            .run(None, &self.owner.stop_program, &[owner.as_str()])
            .await
            .map(|_| ())
            .map_err(|e| AppError::OwnerStopFailed {
                owner: owner.clone(),
                source: Box::new(e),
            })
    }

    fn backup_state_files(&self, backup: &StateBackup, files: &StateFileSet) -> Result<PathBuf> {
        let now = Utc::now();
        let target = backup.snapshot(files, now)?;
        self.log.info(
            1,
            "backed up state files",
            &[("path", target.display().to_string())],
        );

        match backup.prune(now) {
            Ok(pruned) if !pruned.deleted.is_empty() => self.log.info(
                2,
                "pruned old backups",
                &[("count", pruned.deleted.len().to_string())],
            ),
            Ok(_) => {}
            Err(e) => self
                .log
                .warn(2, "pruning old backups failed", &[("error", e.to_string())]),
        }

        Ok(target)
    }

    /// Every entry is attempted; absence is logged and tolerated.
    fn delete_state_files(&self, files: &StateFileSet, report: &mut ResetReport) -> Result<()> {
        self.log.info(
            1,
            "removing Launchpad database files",
            &[("root", files.root().display().to_string())],
        );

        for path in files.iter() {
            let field = [("path", path.display().to_string())];

            if matches!(path.try_exists(), Ok(false)) {
                self.log.warn(2, "file not found", &field);
                report.missing.push(path.to_path_buf());
                continue;
            }

            match fs::remove_file(path) {
                Ok(()) => {
                    self.log.info(2, "removed old file", &field);
                    report.removed.push(path.to_path_buf());
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    self.log.warn(2, "file not found", &field);
                    report.missing.push(path.to_path_buf());
                }
                Err(e) => {
                    return Err(AppError::FileRemovalFailed {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
            }
        }

        Ok(())
    }

    async fn restart_owner(&self) -> Result<()> {
        let owner = &self.owner.process;

        match &self.owner.respawn {
            RespawnPolicy::Supervisor => {
                self.log
                    .info(1, &format!("{owner} will be respawned by launchd"), &[]);
                Ok(())
            }
            RespawnPolicy::Command { program, args } => {
                self.log.info(1, &format!("restarting {owner}"), &[]);
                let args: Vec<&str> = args.iter().map(String::as_str).collect();

                self.runner
                    .run(Some(RESPAWN_DEADLINE), program, &args)
                    .await
                    .map(|_| ())
                    .map_err(|e| AppError::OwnerRestartFailed {
                        owner: owner.clone(),
                        source: Box::new(e),
                    })
            }
        }
    }
}
