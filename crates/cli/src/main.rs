// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! chiptime - race timing from chip punch files

mod commands;
mod completions;
mod output;
mod parse;

use anyhow::{Context, Result};
use chiptime_core::Config;
use chiptime_engine::RaceService;
use clap::{Parser, Subcommand};
use commands::{race, results, watch};
use completions::CompletionsArgs;
use output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chiptime", version, about = "Race results from chip timing punches")]
struct Cli {
    /// Directory holding races, manual times and cached results
    #[arg(long, global = true, env = "CHIPTIME_DATA_DIR", default_value = ".chiptime")]
    data_dir: PathBuf,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Race management
    Race(race::RaceArgs),
    /// Show a race's results
    Results {
        /// Race name
        race: String,
        /// Only chips containing this text
        #[arg(long)]
        search: Option<String>,
        /// Re-read the punch file instead of using cached results
        #[arg(long)]
        refresh: bool,
    },
    /// Print the valid results as a plain-text report
    Report {
        /// Race name
        race: String,
    },
    /// Mark a result invalid, or valid again
    Toggle {
        /// Race name
        race: String,
        /// Chip number
        chip: String,
        /// Punch time: HH:MM:SS after the start, or YYYY-MM-DD HH:MM:SS
        time: String,
    },
    /// Record a hand-timed result
    AddTime {
        /// Race name
        race: String,
        /// Chip number
        chip: String,
        /// Elapsed time since the start (HH:MM:SS)
        elapsed: String,
    },
    /// Follow punch files and refresh results as they change
    Watch {
        /// Race to watch; without one, resume every race flagged for live update
        race: Option<String>,
        /// Only chips containing this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = cli.command {
        completions::generate_completions::<Cli>(args.shell);
        return Ok(());
    }

    let config = Config::load(cli.data_dir.clone())?;
    let _guard = setup_logging(&config)?;
    let service = RaceService::from_config(&config)?;
    let format = cli.output;

    match cli.command {
        Commands::Race(args) => race::handle(args.command, &service, format).await?,
        Commands::Results {
            race,
            search,
            refresh,
        } => results::show(&service, &race, search.as_deref(), refresh, format)?,
        Commands::Report { race } => results::show_report(&service, &race)?,
        Commands::Toggle { race, chip, time } => {
            results::toggle(&service, &race, &chip, &time, format)?
        }
        Commands::AddTime {
            race,
            chip,
            elapsed,
        } => results::add_time(&service, &race, &chip, &elapsed, format)?,
        Commands::Watch { race, search } => match race {
            Some(race) => watch::watch_race(&service, &race, search.as_deref(), format).await?,
            None => watch::watch_all(&service).await?,
        },
        Commands::Completions(_) => {}
    }

    Ok(())
}

fn setup_logging(config: &Config) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = config.log_path();
    let dir = log_path
        .parent()
        .context("log file has no parent directory")?;
    let file_name = log_path.file_name().context("log file has no name")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
        .init();

    Ok(guard)
}
