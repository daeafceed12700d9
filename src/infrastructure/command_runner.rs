//! External command execution with optional deadlines.
//!
//! Each call spawns exactly one process. On deadline expiry the child is
//! killed and reaped before the call returns.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::domain::{AppError, CommandOutcome, CommandStatus, ExternalCommand, Result};

/// Runs external programs.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner;

impl CommandRunner {
    /// Create a new command runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Run `program` with `args` and return its captured stdout.
    ///
    /// # Errors
    /// Returns `Timeout` if the deadline expires, or `CommandFailed` if the
    /// program cannot be spawned or exits unsuccessfully.
    pub async fn run(
        &self,
        deadline: Option<Duration>,
        program: &str,
        args: &[&str],
    ) -> Result<String> {
        let command = ExternalCommand::new(program, args.iter().copied()).with_deadline(deadline);
        let outcome = self.execute(&command).await;
        into_result(&command, &outcome)
    }

    /// Run a command and report its outcome without interpreting it.
    pub async fn execute(&self, command: &ExternalCommand) -> CommandOutcome {
        tracing::debug!(command = %command, deadline = ?command.deadline, "Running command");

        let mut child = match Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return CommandOutcome::spawn_failed(e.to_string()),
        };

        let pid = child.id();
        let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill().await;
            return CommandOutcome::spawn_failed("stdio pipes unavailable".into());
        };

        let mut out = Vec::new();
        let mut err = Vec::new();

        let finished = {
            let completion = async {
                let (_, _, status) = tokio::join!(
                    stdout.read_to_end(&mut out),
                    stderr.read_to_end(&mut err),
                    child.wait()
                );
                status
            };

            match command.deadline {
                Some(deadline) => tokio::time::timeout(deadline, completion).await.ok(),
                None => Some(completion.await),
            }
        };

        let status = match finished {
            Some(Ok(exit)) if exit.success() => CommandStatus::Success,
            Some(Ok(exit)) => CommandStatus::NonZeroExit(exit.code()),
            Some(Err(e)) => CommandStatus::SpawnFailed(format!("wait failed: {e}")),
            None => {
                // kill() also waits, so the child is reaped here
                if let Err(e) = child.kill().await {
                    tracing::warn!(program = %command.program, error = %e, "Failed to kill timed out process");
                }
                CommandStatus::TimedOut
            }
        };

        CommandOutcome {
            stdout: out,
            stderr: err,
            status,
            pid,
        }
    }
}

/// Convert an outcome into the runner's error contract.
fn into_result(command: &ExternalCommand, outcome: &CommandOutcome) -> Result<String> {
    let program = command.program.clone();

    match &outcome.status {
        CommandStatus::Success => Ok(outcome.stdout_lossy()),
        CommandStatus::TimedOut => Err(AppError::Timeout {
            program,
            deadline: command.deadline.unwrap_or_default(),
        }),
        CommandStatus::NonZeroExit(code) => {
            let stderr = outcome.stderr_lossy();
            let mut reason = code.map_or_else(
                || "terminated by signal".to_string(),
                |c| format!("exit status {c}"),
            );
            if !stderr.is_empty() {
                reason.push_str(": ");
                reason.push_str(&stderr);
            }
            Err(AppError::CommandFailed {
                program,
                reason,
                output: outcome.stdout_lossy(),
            })
        }
        CommandStatus::SpawnFailed(reason) => Err(AppError::CommandFailed {
            program,
            reason: format!("spawn failed: {reason}"),
            output: outcome.stdout_lossy(),
        }),
    }
}
