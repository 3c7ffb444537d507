use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use nt_core::Tracker;
use nt_db::Database;
use tracing_subscriber::EnvFilter;

use nt_cli::commands::{add, events, recent, status, summary, top, util};
use nt_cli::{Cli, Commands, Config};

/// Load config and open the tracker, ensuring the database directory exists.
fn open_tracker(cli: &Cli) -> Result<(Tracker<Database>, Config)> {
    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path)
        .with_context(|| format!("failed to open {}", config.database_path.display()))?;
    Ok((Tracker::new(db), config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Add {
            start,
            end,
            description,
        }) => {
            let start = util::parse_datetime(start)?;
            let end = util::parse_datetime(end.as_deref().unwrap_or("now"))?;
            let (mut tracker, _config) = open_tracker(&cli)?;
            add::run(&mut stdout, &mut tracker, start, end, description.as_deref())?;
        }
        Some(Commands::Events { window, json }) => {
            let window = util::resolve_window(window)?;
            let (tracker, _config) = open_tracker(&cli)?;
            events::run(&mut stdout, &tracker, &window, *json)?;
        }
        Some(Commands::Summary { window, json }) => {
            let window = util::resolve_window(window)?;
            let (tracker, _config) = open_tracker(&cli)?;
            summary::run(&mut stdout, &tracker, &window, *json)?;
        }
        Some(Commands::Top { window, json }) => {
            let window = util::resolve_window(window)?;
            let (tracker, _config) = open_tracker(&cli)?;
            top::run(&mut stdout, &tracker, &window, *json)?;
        }
        Some(Commands::Recent { json }) => {
            let (tracker, _config) = open_tracker(&cli)?;
            recent::run(&mut stdout, &tracker, *json)?;
        }
        Some(Commands::Status) => {
            let (tracker, config) = open_tracker(&cli)?;
            status::run(&mut stdout, &tracker, &config.database_path)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
