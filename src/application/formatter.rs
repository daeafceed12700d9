//! Output formatting for reset reports and resolved paths.
//!
//! Supports a human-readable table view and JSON.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{PathsOverview, ResetReport};

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Table view for terminals.
    #[default]
    Table,
    /// JSON format for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: table, json")),
        }
    }
}

/// Formats a reset report as a table.
pub fn format_reset_table(report: &ResetReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["File", "Result"]);

    for path in &report.removed {
        table.add_row(vec![path.display().to_string(), "removed".to_string()]);
    }
    for path in &report.missing {
        table.add_row(vec![path.display().to_string(), "not found".to_string()]);
    }

    let mut out = format!(
        "{} {}\n\n{table}",
        "✓".green().bold(),
        "Launchpad reset complete".bold()
    );

    if let Some(dir) = &report.backup_dir {
        out.push_str(&format!("\n\nBackup: {}", dir.display().to_string().cyan()));
    }

    out
}

/// Formats resolved paths and state file presence as a table.
pub fn format_paths_table(overview: &PathsOverview) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Artifact", "Path", "Status"]);

    table.add_row(vec![
        "config".to_string(),
        overview.config.path.display().to_string(),
        overview.config.mode.to_string(),
    ]);
    table.add_row(vec![
        "db root".to_string(),
        overview.db_root.path.display().to_string(),
        overview.db_root.mode.to_string(),
    ]);

    for state in &overview.state_files {
        let name = state
            .path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let status = if state.present { "present" } else { "absent" };
        table.add_row(vec![name, state.path.display().to_string(), status.to_string()]);
    }

    format!("{}\n\n{table}", "📂 Launchpad Paths".bold())
}

/// Formats any serializable report as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_json<T: serde::Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResetStep, ResolutionMode, ResolvedPath};
    use std::path::PathBuf;

    fn report() -> ResetReport {
        ResetReport {
            db_root: PathBuf::from("/tmp/lp"),
            removed: vec![PathBuf::from("/tmp/lp/db")],
            missing: vec![PathBuf::from("/tmp/lp/db-shm")],
            backup_dir: None,
            steps: vec![ResetStep::StopOwner, ResetStep::DeleteStateFiles],
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!(
            "table".parse::<OutputFormat>(),
            Ok(OutputFormat::Table)
        ));
        assert!(matches!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("markdown".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_reset_table_lists_files() {
        let out = format_reset_table(&report());
        assert!(out.contains("/tmp/lp/db"));
        assert!(out.contains("not found"));
        assert!(!out.contains("Backup:"));
    }

    #[test]
    fn test_reset_json() {
        let json = format_json(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["steps"][0], "stop_owner");
        assert_eq!(value["missing"][0], "/tmp/lp/db-shm");
    }

    #[test]
    fn test_paths_table_shows_modes() {
        let overview = PathsOverview::inspect(
            ResolvedPath::new("/Users/alice/.launchpad.yaml", ResolutionMode::LocalHome),
            ResolvedPath::new("/nonexistent/lp", ResolutionMode::Explicit),
        );
        let out = format_paths_table(&overview);
        assert!(out.contains("local-home"));
        assert!(out.contains("db-wal"));
        assert!(out.contains("absent"));
    }
}
