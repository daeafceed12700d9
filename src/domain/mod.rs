//! Domain layer - core types, configuration and errors.
//!
//! This layer contains domain models and error types without any
//! process or host dependencies.

pub mod config;
pub mod error;
pub mod models;

pub use config::{AppConfig, OwnerConfig, RespawnPolicy};
pub use error::{AppError, Result};
pub use models::{
    CommandOutcome, CommandStatus, ExternalCommand, PathsOverview, ResetReport, ResetStep,
    ResolutionMode, ResolvedPath, StateFileSet,
};
