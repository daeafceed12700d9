//! Application layer - use cases and orchestration.
//!
//! This layer sequences the reset and renders its results.

pub mod formatter;
pub mod reset_service;

pub use formatter::{format_json, format_paths_table, format_reset_table, OutputFormat};
pub use reset_service::ResetOrchestrator;
