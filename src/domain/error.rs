//! Domain-level error types for launchpad-reset.
//!
//! All errors are typed with `thiserror` and carry the program name or path
//! needed to diagnose a failure without re-running the command.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// An external command exceeded its deadline and was killed.
    #[error("Command `{program}` timed out after {deadline:?}")]
    Timeout { program: String, deadline: Duration },

    /// An external command could not be spawned or exited unsuccessfully.
    #[error("Command `{program}` failed: {reason}")]
    CommandFailed {
        program: String,
        reason: String,
        /// Whatever stdout was captured before the failure.
        output: String,
    },

    /// The cloud-synced storage root could not be located.
    #[error("Synced storage unavailable: {reason}")]
    SyncedStorageUnavailable { reason: String },

    /// The current user or their home directory could not be determined.
    #[error("User lookup failed: {reason}")]
    UserLookupFailed { reason: String },

    /// The host name could not be read.
    #[error("Hostname unavailable: {reason}")]
    HostnameUnavailable { reason: String },

    /// Terminating the owning process failed.
    #[error("Stopping owner process `{owner}` failed")]
    OwnerStopFailed {
        owner: String,
        #[source]
        source: Box<AppError>,
    },

    /// Restarting the owning process failed.
    #[error("Restarting owner process `{owner}` failed")]
    OwnerRestartFailed {
        owner: String,
        #[source]
        source: Box<AppError>,
    },

    /// A present state file could not be removed.
    #[error("Removing file failed: {path}")]
    FileRemovalFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or environment error.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// IO operation failed.
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl AppError {
    /// Create an IO error with context.
    pub fn io(message: impl Into<String>, err: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(err),
        }
    }
}

/// Result type alias using `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
