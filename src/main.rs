//! Launchpad Reset - restore the macOS Launchpad to a clean layout.
//!
//! Stops the Dock, deletes the Launchpad database (`db`, `db-shm`, `db-wal`)
//! and lets the Dock regenerate it.
//!
//!   launchpad-reset reset               # Reset using the resolved database
//!   launchpad-reset reset --backup      # Keep a copy of the old database
//!   launchpad-reset paths --icloud      # Show where everything resolves to
//!   launchpad-reset init                # Write the default config file

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::error::Error as _;
use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_json, format_paths_table, format_reset_table, OutputFormat, ResetOrchestrator,
};
use cli::{Cli, Commands};
use domain::{AppConfig, PathsOverview};
use infrastructure::{
    ensure_config_exists, load_config, CommandRunner, PathResolver, StateBackup, TracingSink,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  {} {}", "caused by:".dimmed(), cause);
            source = cause.source();
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| domain::AppError::Config { message: e })?;

    match cli.command {
        Commands::Reset { db_root, backup } => {
            let config = load_config()?;
            cmd_reset(&config, db_root, backup, format).await?;
        }
        Commands::Paths {
            config: config_path,
            icloud,
            db_root,
        } => {
            let config = load_config()?;
            cmd_paths(&config, config_path, icloud, db_root, format).await?;
        }
        Commands::Init => {
            cmd_init()?;
        }
    }

    Ok(())
}

/// Reset the Launchpad database.
async fn cmd_reset(
    config: &AppConfig,
    db_root: Option<PathBuf>,
    backup: bool,
    format: OutputFormat,
) -> domain::Result<()> {
    let runner = CommandRunner::new();
    let explicit = db_root.or_else(|| config.paths.db_root.clone());
    let db_root = PathResolver::new()
        .resolve_db_root(explicit.as_deref(), &runner)
        .await?;

    tracing::info!(path = %db_root.path.display(), mode = %db_root.mode, "Resolved Launchpad database");

    let sink = TracingSink;
    let mut orchestrator = ResetOrchestrator::new(config.owner.clone(), &sink);
    if backup || config.backup.enabled {
        orchestrator = orchestrator.with_backup(StateBackup::new(
            config.backups_dir(),
            config.backup.retention_days,
        ));
    }

    let report = orchestrator.reset(&db_root.path).await?;

    let output = match format {
        OutputFormat::Table => format_reset_table(&report),
        OutputFormat::Json => format_json(&report).map_err(json_error)?,
    };
    println!("{output}");

    Ok(())
}

/// Show resolved paths.
async fn cmd_paths(
    config: &AppConfig,
    config_path: Option<PathBuf>,
    icloud: bool,
    db_root: Option<PathBuf>,
    format: OutputFormat,
) -> domain::Result<()> {
    let resolver = PathResolver::new();

    let config_path = config_path.or_else(|| config.paths.config.clone());
    let layout = resolver.resolve_config(config_path.as_deref(), icloud || config.storage.icloud)?;

    let db_root = db_root.or_else(|| config.paths.db_root.clone());
    let db_root = resolver
        .resolve_db_root(db_root.as_deref(), &CommandRunner::new())
        .await?;

    let overview = PathsOverview::inspect(layout, db_root);

    let output = match format {
        OutputFormat::Table => format_paths_table(&overview),
        OutputFormat::Json => format_json(&overview).map_err(json_error)?,
    };
    println!("{output}");

    Ok(())
}

/// Write the default configuration file.
fn cmd_init() -> domain::Result<()> {
    let (path, created) = ensure_config_exists()?;

    if created {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("Config already exists at {}", path.display());
    }

    Ok(())
}

fn json_error(err: serde_json::Error) -> domain::AppError {
    domain::AppError::Config {
        message: format!("Failed to serialize output: {err}"),
    }
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
