//! Left join of daily usage against daily rainfall.

use crate::usage::DailyUsageSummary;
use chrono::NaiveDate;
use dbr_core::rainfall::RainfallObservation;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;

/// A usage date paired with the rainfall observed that day, if any.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MergedRecord {
    pub date: NaiveDate,
    pub total_taken: u64,
    pub rain_mm: Option<f64>,
}

/// Join usage to rainfall on date, keeping every usage date.
///
/// Dates without a rainfall row get `rain_mm: None`. Rainfall dates with no
/// usage are dropped. If the rainfall table repeats a date, the first row
/// wins so the output always has exactly one record per summary. Output is
/// in date order.
pub fn left_join(
    summaries: &[DailyUsageSummary],
    rainfall: &[RainfallObservation],
) -> Vec<MergedRecord> {
    let mut rain_by_date: HashMap<NaiveDate, f64> = HashMap::with_capacity(rainfall.len());
    for observation in rainfall {
        if rain_by_date.contains_key(&observation.date) {
            warn!(
                "Duplicate rainfall observation for {}; keeping the first",
                observation.date
            );
            continue;
        }
        rain_by_date.insert(observation.date, observation.rain_mm);
    }

    let mut merged: Vec<MergedRecord> = summaries
        .iter()
        .map(|summary| MergedRecord {
            date: summary.date,
            total_taken: summary.total_taken,
            rain_mm: rain_by_date.get(&summary.date).copied(),
        })
        .collect();
    merged.sort_by_key(|record| record.date);

    let missing = merged.iter().filter(|r| r.rain_mm.is_none()).count();
    if missing > 0 {
        warn!(
            "{} of {} usage dates have no rainfall observation",
            missing,
            merged.len()
        );
    }
    info!("Merged {} usage dates with rainfall", merged.len());
    merged
}

/// The (rainfall, bikes taken) pairs for dates where rainfall is known.
pub fn rainfall_usage_pairs(records: &[MergedRecord]) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|record| record.rain_mm.map(|rain| (rain, record.total_taken as f64)))
        .unzip()
}
