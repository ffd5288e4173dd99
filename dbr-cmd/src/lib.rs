//! Command implementations for DBR CLI.
//!
//! Provides the full usage versus rainfall analysis and an export of the
//! per-station usage breakdown.

use anyhow::Context;
use clap::{Args, Subcommand};
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub mod analyze;
pub mod breakdown;

/// Occupancy export read when no path is given.
pub const DEFAULT_OCCUPANCY_CSV: &str = "dublinbikes_20190101_20190401.csv";

/// Weather export read when no path is given.
pub const DEFAULT_RAINFALL_CSV: &str = "Weather.csv";

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    /// Path to the bike station occupancy CSV
    #[arg(short = 'o', long, default_value = DEFAULT_OCCUPANCY_CSV)]
    pub occupancy_csv: PathBuf,

    /// Path to the daily weather CSV (needs `date` and `rain` columns)
    #[arg(short = 'w', long, default_value = DEFAULT_RAINFALL_CSV)]
    pub rainfall_csv: PathBuf,

    /// Directory the SVG charts are written to
    #[arg(short = 'd', long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Also write the merged daily usage and rainfall table to this CSV
    #[arg(long)]
    pub summary_csv: Option<PathBuf>,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        AnalyzeArgs {
            occupancy_csv: PathBuf::from(DEFAULT_OCCUPANCY_CSV),
            rainfall_csv: PathBuf::from(DEFAULT_RAINFALL_CSV),
            output_dir: PathBuf::from("."),
            summary_csv: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive daily usage, join it with rainfall, draw both charts and
    /// print the correlation coefficient
    Analyze(AnalyzeArgs),

    /// Export bikes taken per station per day
    Breakdown {
        /// Path to the bike station occupancy CSV
        #[arg(short = 'o', long, default_value = DEFAULT_OCCUPANCY_CSV)]
        occupancy_csv: PathBuf,

        /// Output path for the per-station daily totals CSV
        #[arg(short = 's', long)]
        stations_csv: PathBuf,

        /// Also write every sample with its delta and running total
        #[arg(long)]
        per_sample: Option<PathBuf>,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze(args) => analyze::run_analyze(&args).map(|_| ()),
        Command::Breakdown {
            occupancy_csv,
            stations_csv,
            per_sample,
        } => breakdown::run_breakdown(&occupancy_csv, &stations_csv, per_sample.as_deref())
            .map(|_| ()),
    }
}

/// Serialize rows to a CSV file with a header row.
pub(crate) fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("failed to write a row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;
    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}
