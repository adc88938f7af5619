use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cts_cli::commands::{ingest, report, status, util};
use cts_cli::{Cli, Commands, Config, TimesheetRequest};

/// Load config, applying the `--db` override.
fn load_config(config_path: Option<&Path>, db: Option<&Path>) -> Result<Config> {
    let mut config = Config::load_from(config_path).context("failed to load configuration")?;
    if let Some(db) = db {
        config.database_path = db.to_path_buf();
    }
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = load_config(cli.config.as_deref(), cli.db.as_deref())?;

    match command {
        Commands::Ingest { file, projects_dir } => {
            let projects_dir = projects_dir.as_deref().unwrap_or(config.projects_dir.as_path());
            ingest::run(&config.database_path, file.as_deref(), projects_dir)?;
        }
        Commands::Report {
            since,
            project,
            exclude,
            group,
        } => {
            let request = TimesheetRequest {
                since: since.clone(),
                include: project.clone(),
                exclude: exclude.clone(),
                merge: *group,
            };
            report::run(&config.database_path, &request, &config.project_namer())?;
        }
        Commands::Status => {
            let db = util::open_database(&config.database_path)?;
            status::run(
                &mut std::io::stdout().lock(),
                &db,
                &config.database_path,
                &config.project_namer(),
            )?;
        }
    }

    Ok(())
}
