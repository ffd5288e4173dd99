//! Bike usage derived from successive occupancy readings.
//!
//! A station only reports how many bikes are docked. Whenever the count drops
//! between two consecutive readings of the same station on the same day, the
//! drop is counted as that many bikes taken. Rises (returns) count as zero.

use chrono::{NaiveDate, NaiveDateTime};
use dbr_core::occupancy::OccupancySample;
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

/// One occupancy reading with the usage inferred from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SampleUsage {
    pub station_id: u32,
    pub timestamp: NaiveDateTime,
    pub available_bikes: u32,
    /// Change from the previous reading of this station on this date.
    /// Zero for the first reading of each (station, date) window.
    pub delta: i64,
    /// Bikes taken since the previous reading; never negative.
    pub removed: u64,
    /// Cumulative `removed` within the (station, date) window so far.
    pub running_taken: u64,
}

impl SampleUsage {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }
}

/// Total bikes taken across every station on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyUsageSummary {
    pub date: NaiveDate,
    pub total_taken: u64,
}

/// Bikes taken at a single station on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StationDailyUsage {
    pub station_id: u32,
    pub date: NaiveDate,
    pub total_taken: u64,
}

/// Number of bikes taken implied by a change in docked bikes.
pub fn removed_bikes(delta: i64) -> u64 {
    if delta < 0 {
        delta.unsigned_abs()
    } else {
        0
    }
}

/// Compute delta, removals and running totals for every sample.
///
/// Samples are sorted by station then timestamp first, so the input order
/// does not matter. The interval between readings is not assumed; any two
/// successive readings of a station on the same date form a transition.
/// The output is in (station, timestamp) order.
pub fn derive_sample_usage(samples: &[OccupancySample]) -> Vec<SampleUsage> {
    let mut ordered: Vec<&OccupancySample> = samples.iter().collect();
    ordered.sort_by_key(|sample| (sample.station_id, sample.timestamp));

    let mut result = Vec::with_capacity(ordered.len());
    let mut previous: Option<&OccupancySample> = None;
    let mut running_taken = 0u64;
    for sample in ordered {
        let delta = match previous {
            Some(prev) if prev.station_id == sample.station_id && prev.date() == sample.date() => {
                i64::from(sample.available_bikes) - i64::from(prev.available_bikes)
            }
            _ => {
                running_taken = 0;
                0
            }
        };
        let removed = removed_bikes(delta);
        running_taken += removed;
        result.push(SampleUsage {
            station_id: sample.station_id,
            timestamp: sample.timestamp,
            available_bikes: sample.available_bikes,
            delta,
            removed,
            running_taken,
        });
        previous = Some(sample);
    }
    result
}

/// Sum removals per date across all stations, in date order.
pub fn summarize_by_date(usages: &[SampleUsage]) -> Vec<DailyUsageSummary> {
    let mut totals: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for usage in usages {
        *totals.entry(usage.date()).or_insert(0) += usage.removed;
    }
    totals
        .into_iter()
        .map(|(date, total_taken)| DailyUsageSummary { date, total_taken })
        .collect()
}

/// Sum removals per (station, date), ordered by station then date.
pub fn summarize_by_station(usages: &[SampleUsage]) -> Vec<StationDailyUsage> {
    let mut totals: BTreeMap<(u32, NaiveDate), u64> = BTreeMap::new();
    for usage in usages {
        *totals.entry((usage.station_id, usage.date())).or_insert(0) += usage.removed;
    }
    totals
        .into_iter()
        .map(|((station_id, date), total_taken)| StationDailyUsage {
            station_id,
            date,
            total_taken,
        })
        .collect()
}

/// The full pipeline: raw occupancy samples to one summary per date.
pub fn daily_usage(samples: &[OccupancySample]) -> Vec<DailyUsageSummary> {
    let usages = derive_sample_usage(samples);
    let summaries = summarize_by_date(&usages);
    for summary in &summaries {
        debug!("{}: {} bikes taken", summary.date, summary.total_taken);
    }
    info!(
        "Derived usage for {} dates from {} samples",
        summaries.len(),
        samples.len()
    );
    summaries
}
