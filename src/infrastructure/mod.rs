//! Infrastructure layer - external adapters (processes, filesystem, host).
//!
//! This layer handles all I/O operations and external dependencies.

pub mod command_runner;
pub mod config;
pub mod launchpad_paths;
pub mod log_sink;
pub mod state_backup;

pub use command_runner::CommandRunner;
pub use config::{ensure_config_exists, load_config};
pub use launchpad_paths::PathResolver;
pub use log_sink::{LogSink, Logger, TracingSink};
pub use state_backup::StateBackup;
