//! Domain models for the Launchpad reset.
//!
//! These models describe external commands, resolved paths and the state
//! files that back the Launchpad layout.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    /// Program name, resolved through `PATH`.
    pub program: String,
    /// Ordered argument list.
    pub args: Vec<String>,
    /// Optional deadline; `None` waits indefinitely.
    pub deadline: Option<Duration>,
}

impl ExternalCommand {
    /// Create a command with no deadline.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            deadline: None,
        }
    }

    /// Set the deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

impl fmt::Display for ExternalCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How an external command completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    /// Exit status zero.
    Success,
    /// Non-zero exit; `None` when terminated by a signal.
    NonZeroExit(Option<i32>),
    /// Deadline expired; the process was killed.
    TimedOut,
    /// The process could not be started.
    SpawnFailed(String),
}

/// Result of a single external command invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error.
    pub stderr: Vec<u8>,
    /// Completion status.
    pub status: CommandStatus,
    /// OS process id, if the process was spawned.
    pub pid: Option<u32>,
}

impl CommandOutcome {
    pub(crate) const fn spawn_failed(reason: String) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            status: CommandStatus::SpawnFailed(reason),
            pid: None,
        }
    }

    /// Standard output decoded lossily.
    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded lossily and trimmed.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// State files backing the Launchpad database.
const STATE_FILE_NAMES: [&str; 3] = ["db", "db-shm", "db-wal"];

/// The primary store plus its shared-memory and write-ahead-log side files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateFileSet {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl StateFileSet {
    /// Derive the triad under `root`.
    #[must_use]
    pub fn under(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            files: STATE_FILE_NAMES.iter().map(|name| root.join(name)).collect(),
        }
    }

    /// Directory that holds the state files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths in deletion order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(PathBuf::as_path)
    }
}

/// How a path was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Supplied by the caller.
    Explicit,
    /// Under the iCloud Drive root.
    SyncedStorage,
    /// Directly under the user's home directory.
    LocalHome,
    /// Under the per-user Darwin data directory.
    UserDataDir,
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit => write!(f, "explicit"),
            Self::SyncedStorage => write!(f, "synced-storage"),
            Self::LocalHome => write!(f, "local-home"),
            Self::UserDataDir => write!(f, "user-data-dir"),
        }
    }
}

/// An absolute path tagged with the mode that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedPath {
    pub path: PathBuf,
    pub mode: ResolutionMode,
}

impl ResolvedPath {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, mode: ResolutionMode) -> Self {
        Self {
            path: path.into(),
            mode,
        }
    }
}

/// Steps of a reset, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetStep {
    StopOwner,
    BackupStateFiles,
    DeleteStateFiles,
    SettleDelay,
    RestartOwner,
}

impl fmt::Display for ResetStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::StopOwner => "stop owner",
            Self::BackupStateFiles => "backup state files",
            Self::DeleteStateFiles => "delete state files",
            Self::SettleDelay => "settle delay",
            Self::RestartOwner => "restart owner",
        };
        f.write_str(name)
    }
}

/// Summary of a completed reset.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResetReport {
    /// Directory the state files were removed from.
    pub db_root: PathBuf,
    /// Files that were present and removed.
    pub removed: Vec<PathBuf>,
    /// Files that were already absent.
    pub missing: Vec<PathBuf>,
    /// Backup directory, if a backup was taken.
    pub backup_dir: Option<PathBuf>,
    /// Steps that ran, in order.
    pub steps: Vec<ResetStep>,
}

/// Presence of a single state file.
#[derive(Debug, Clone, Serialize)]
pub struct StateFileStatus {
    pub path: PathBuf,
    pub present: bool,
}

/// Where everything resolves to on this host.
#[derive(Debug, Clone, Serialize)]
pub struct PathsOverview {
    /// Layout config file.
    pub config: ResolvedPath,
    /// Launchpad database directory.
    pub db_root: ResolvedPath,
    /// State files under `db_root`.
    pub state_files: Vec<StateFileStatus>,
}

impl PathsOverview {
    /// Check which state files exist under the resolved database root.
    #[must_use]
    pub fn inspect(config: ResolvedPath, db_root: ResolvedPath) -> Self {
        let state_files = StateFileSet::under(&db_root.path)
            .iter()
            .map(|path| StateFileStatus {
                path: path.to_path_buf(),
                present: path.exists(),
            })
            .collect();

        Self {
            config,
            db_root,
            state_files,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_file_set_order() {
        let set = StateFileSet::under(Path::new("/tmp/lp"));
        let paths: Vec<_> = set.iter().collect();

        assert_eq!(
            paths,
            vec![
                Path::new("/tmp/lp/db"),
                Path::new("/tmp/lp/db-shm"),
                Path::new("/tmp/lp/db-wal"),
            ]
        );
        assert_eq!(set.root(), Path::new("/tmp/lp"));
    }

    #[test]
    fn test_paths_overview_reports_presence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("db-wal"), b"x").unwrap();

        let overview = PathsOverview::inspect(
            ResolvedPath::new("/tmp/x.yaml", ResolutionMode::Explicit),
            ResolvedPath::new(dir.path(), ResolutionMode::Explicit),
        );

        let present: Vec<bool> = overview.state_files.iter().map(|s| s.present).collect();
        assert_eq!(present, vec![false, false, true]);
    }

    #[test]
    fn test_external_command_display() {
        let cmd = ExternalCommand::new("killall", ["Dock"]);
        assert_eq!(cmd.to_string(), "killall Dock");
        assert_eq!(cmd.deadline, None);
    }

    #[test]
    fn test_resolution_mode_display() {
        assert_eq!(ResolutionMode::SyncedStorage.to_string(), "synced-storage");
        assert_eq!(
            serde_json::to_string(&ResolutionMode::LocalHome).unwrap(),
            "\"local-home\""
        );
    }
}
