//! Command implementations for the vprof CLI.
//!
//! Each subcommand loads the dataset once through the cache service and
//! emits its result as JSON for a UI shell to render.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use vprof_core::{AnnotationKey, DayPeriod, Parameter, WaterPeriod};
use vprof_data::PeriodFilter;

mod output;
pub mod profile;
pub mod session;
pub mod stations;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Profile dataset (CSV or CSV.gz); overrides `data-path` from the config
    #[arg(short = 'd', long)]
    pub data: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Write JSON here instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List stations as map layers (full cycle, normal, selected)
    Stations {
        #[command(flatten)]
        data: DataArgs,

        /// Station to highlight
        #[arg(long)]
        selected: Option<String>,
    },

    /// Build depth-profile curves for one station
    Profile {
        #[command(flatten)]
        data: DataArgs,

        /// Station identifier
        #[arg(short = 's', long)]
        station: String,

        /// Temp, pH, ODO%, ODO Conc or Turbidity
        #[arg(short = 'p', long, default_value = "Temp")]
        parameter: Parameter,

        /// All, LW, RW, HW or FW
        #[arg(short = 'w', long, default_value = "All")]
        water: PeriodFilter<WaterPeriod>,

        /// All, AM or PM
        #[arg(long, default_value = "All")]
        day: PeriodFilter<DayPeriod>,

        /// Draw the thermocline depth
        #[arg(long)]
        thermocline: bool,

        /// Draw the chlorophyll maximum depth
        #[arg(long)]
        max_chloro: bool,

        /// Other annotation columns to draw (repeatable)
        #[arg(short = 'a', long = "annotation")]
        annotations: Vec<AnnotationKey>,
    },

    /// Show which sheet was kept for each period of a station
    Sheets {
        #[command(flatten)]
        data: DataArgs,

        /// Station identifier
        #[arg(short = 's', long)]
        station: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Stations { data, selected } => stations::run_stations(&data, selected.as_deref()),
        Command::Profile {
            data,
            station,
            parameter,
            water,
            day,
            thermocline,
            max_chloro,
            annotations,
        } => {
            let mut keys = Vec::new();
            if thermocline {
                keys.push(AnnotationKey::Thermocline);
            }
            if max_chloro {
                keys.push(AnnotationKey::MaxChloro);
            }
            for key in annotations {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
            let request = vprof_data::ProfileRequest {
                station_id: station,
                parameter,
                water,
                day,
                annotations: keys,
            };
            profile::run_profile(&data, &request)
        }
        Command::Sheets { data, station } => profile::run_sheets(&data, &station),
    }
}
