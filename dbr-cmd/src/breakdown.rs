//! Per-station export of derived usage.

use crate::write_csv;
use dbr_core::occupancy::OccupancySample;
use dbr_data::usage::{derive_sample_usage, summarize_by_station, StationDailyUsage};
use log::info;
use std::path::Path;

/// Write bikes taken per station per date, and optionally every sample with
/// its delta, removals and running total.
pub fn run_breakdown(
    occupancy_csv: &Path,
    stations_csv: &Path,
    per_sample: Option<&Path>,
) -> anyhow::Result<Vec<StationDailyUsage>> {
    let samples = OccupancySample::from_path(occupancy_csv)?;
    let usages = derive_sample_usage(&samples);
    let by_station = summarize_by_station(&usages);
    info!(
        "Derived {} station-day totals from {} samples",
        by_station.len(),
        usages.len()
    );

    write_csv(stations_csv, &by_station)?;
    if let Some(per_sample) = per_sample {
        write_csv(per_sample, &usages)?;
    }
    Ok(by_station)
}
