//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::application::OutputFormat;

/// Launchpad Reset - wipe the Launchpad layout database and restart the Dock.
#[derive(Parser, Debug)]
#[command(name = "launchpad-reset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: table or json.
    #[arg(short, long, default_value = "table")]
    pub format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stop the Dock, delete the Launchpad database and let it regenerate.
    Reset {
        /// Launchpad database directory (resolved via getconf if omitted).
        #[arg(long)]
        db_root: Option<PathBuf>,

        /// Copy the database files aside before deleting them.
        #[arg(long)]
        backup: bool,
    },

    /// Show where the layout config and database resolve to.
    Paths {
        /// Layout config file (overrides resolution).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Resolve the layout config under iCloud Drive.
        #[arg(long)]
        icloud: bool,

        /// Launchpad database directory.
        #[arg(long)]
        db_root: Option<PathBuf>,
    },

    /// Write the default configuration file if it does not exist.
    Init,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reset() {
        let cli = Cli::try_parse_from([
            "launchpad-reset",
            "-vv",
            "reset",
            "--db-root",
            "/tmp/lp",
            "--backup",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Reset { db_root, backup } => {
                assert_eq!(db_root, Some(PathBuf::from("/tmp/lp")));
                assert!(backup);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_paths_format() {
        let cli =
            Cli::try_parse_from(["launchpad-reset", "-f", "json", "paths", "--icloud"]).unwrap();
        assert!(matches!(cli.output_format(), Ok(OutputFormat::Json)));
        assert!(matches!(cli.command, Commands::Paths { icloud: true, .. }));
    }
}
