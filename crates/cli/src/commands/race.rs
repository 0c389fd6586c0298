// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `chiptime race` - Race list management

use crate::output::{print_list, print_warnings, OutputFormat, RaceInfo};
use crate::parse::{parse_chips, parse_min_time, parse_start};
use anyhow::Result;
use chiptime_core::Race;
use chiptime_engine::{RaceEdit, RaceService};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Args)]
pub struct RaceArgs {
    #[command(subcommand)]
    pub command: RaceCommand,
}

#[derive(Subcommand)]
pub enum RaceCommand {
    /// List races
    List,
    /// Register a new race
    Add {
        /// Race name
        name: String,
        /// Start time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: String,
        /// Minimum finishing time (MM:SS)
        #[arg(long, default_value = "0:00")]
        min_time: String,
        /// Registered chips, comma separated
        #[arg(long, value_name = "CHIPS")]
        chips: Vec<String>,
        /// File with one registered chip per line
        #[arg(long)]
        chips_file: Option<PathBuf>,
        /// Punch file from the timing hardware
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Change a race's name, start, minimum time or chips
    Edit {
        /// Race name
        name: String,
        /// New race name
        #[arg(long)]
        rename: Option<String>,
        /// New start time (YYYY-MM-DD HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// New minimum finishing time (MM:SS)
        #[arg(long)]
        min_time: Option<String>,
        /// Replacement chip list, comma separated
        #[arg(long, value_name = "CHIPS")]
        chips: Vec<String>,
        /// Replacement chip list, one chip per line
        #[arg(long)]
        chips_file: Option<PathBuf>,
    },
    /// Flag a race for live update by `chiptime watch`, or clear the flag
    Live {
        /// Race name
        name: String,
        #[arg(value_enum)]
        mode: LiveMode,
    },
    /// Point a race at a punch file and rebuild its results
    SetFile {
        /// Race name
        name: String,
        /// Punch file path
        path: PathBuf,
    },
    /// Delete a race with its manual times and cached results
    Remove {
        /// Race name
        name: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LiveMode {
    On,
    Off,
}

pub async fn handle(command: RaceCommand, service: &RaceService, format: OutputFormat) -> Result<()> {
    match command {
        RaceCommand::List => list(service, format),
        RaceCommand::Add {
            name,
            start,
            min_time,
            chips,
            chips_file,
            file,
        } => {
            let mut race = Race::new(&name, parse_start(&start)?, parse_min_time(&min_time)?)
                .with_chips(parse_chips(&chips, chips_file.as_deref())?);
            race.results_file = file;
            let chip_count = race.chips.len();
            service.add_race(race)?;
            println!("Race '{}' added with {} chips", name, chip_count);
            Ok(())
        }
        RaceCommand::Edit {
            name,
            rename,
            start,
            min_time,
            chips,
            chips_file,
        } => {
            let chips = if chips.is_empty() && chips_file.is_none() {
                None
            } else {
                Some(parse_chips(&chips, chips_file.as_deref())?.into_iter().collect())
            };
            let edit = RaceEdit {
                name: rename,
                start_time: start.as_deref().map(parse_start).transpose()?,
                min_time: min_time.as_deref().map(parse_min_time).transpose()?,
                chips,
            };
            let new_name = edit.name.clone().unwrap_or_else(|| name.clone());
            let reconciliation = service.edit_race(&name, edit).await?;
            print_warnings(&reconciliation.warnings);
            println!(
                "Race '{}' updated ({} results)",
                new_name,
                reconciliation.results.len()
            );
            Ok(())
        }
        RaceCommand::Live { name, mode } => {
            match mode {
                LiveMode::On => service.set_live_flag(&name, true)?,
                LiveMode::Off => {
                    service.race(&name)?;
                    service.disable_live_update(&name).await?;
                }
            }
            let state = match mode {
                LiveMode::On => "on",
                LiveMode::Off => "off",
            };
            println!("Live update for '{}' is {}", name, state);
            Ok(())
        }
        RaceCommand::SetFile { name, path } => {
            let reconciliation = service.set_results_file(&name, &path).await?;
            print_warnings(&reconciliation.warnings);
            println!(
                "Race '{}' now reads {} ({} results)",
                name,
                path.display(),
                reconciliation.results.len()
            );
            Ok(())
        }
        RaceCommand::Remove { name } => {
            service.remove_race(&name).await?;
            println!("Race '{}' removed", name);
            Ok(())
        }
    }
}

fn list(service: &RaceService, format: OutputFormat) -> Result<()> {
    let races: Vec<RaceInfo> = service.races()?.iter().map(RaceInfo::new).collect();
    if let OutputFormat::Text = format {
        if races.is_empty() {
            println!("No races found.");
            return Ok(());
        }
        println!("{}", RaceInfo::HEADER);
    }
    print_list(&races, format);
    Ok(())
}
