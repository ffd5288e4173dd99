use crate::{
    error::{LoadError, Result},
    table::{Cell, Table},
};
use chrono::{NaiveDate, NaiveDateTime};
use dbr_utils::dates::parse_day_first_datetime;
use log::info;
use serde::Serialize;
use std::{collections::HashSet, fs::File, io::Read, path::Path};

/// Station identifier column of the Dublin Bikes export.
pub const STATION_ID_COLUMN: &str = "STATION ID";

/// Reading time column of the Dublin Bikes export.
pub const TIME_COLUMN: &str = "TIME";

/// Bikes docked at the station when the reading was taken.
pub const AVAILABLE_BIKES_COLUMN: &str = "AVAILABLE BIKES";

/// A single bike count reading at one station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct OccupancySample {
    pub station_id: u32,
    pub timestamp: NaiveDateTime,
    pub available_bikes: u32,
}

impl OccupancySample {
    pub fn new(station_id: u32, timestamp: NaiveDateTime, available_bikes: u32) -> Self {
        OccupancySample {
            station_id,
            timestamp,
            available_bikes,
        }
    }

    /// Calendar date of the reading. Always derived from `timestamp`.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Load occupancy samples from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<OccupancySample>> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Io {
            source_name: source_name.clone(),
            source,
        })?;
        Self::parse_occupancy_csv(file, &source_name)
    }

    /// Parse occupancy CSV text with a header row.
    ///
    /// Columns are located by name, so extra columns (station name, address,
    /// stand counts) are ignored. Parsing stops at the first bad row, and a
    /// repeated `(station, timestamp)` pair is rejected.
    ///
    /// # Example CSV
    /// ```text
    /// STATION ID,TIME,LAST UPDATED,NAME,BIKE STANDS,AVAILABLE BIKE STANDS,AVAILABLE BIKES
    /// 2,2019-01-01 00:00:03,2019-01-01 00:00:03,BLESSINGTON STREET,20,18,2
    /// ```
    pub fn parse_occupancy_csv<R: Read>(rdr: R, source_name: &str) -> Result<Vec<OccupancySample>> {
        let mut table = Table::new(rdr, source_name)?;
        let station_idx = table.column_index(STATION_ID_COLUMN)?;
        let time_idx = table.column_index(TIME_COLUMN)?;
        let bikes_idx = table.column_index(AVAILABLE_BIKES_COLUMN)?;
        let source_name = table.source_name.clone();

        let mut samples = Vec::new();
        let mut seen: HashSet<(u32, NaiveDateTime)> = HashSet::new();
        for result in table.records() {
            let record = result?;
            let station_id =
                Cell::get(&record, station_idx, STATION_ID_COLUMN, &source_name)?.parse::<u32>()?;
            let time_cell = Cell::get(&record, time_idx, TIME_COLUMN, &source_name)?;
            let timestamp =
                parse_day_first_datetime(time_cell.value()).map_err(|e| time_cell.invalid(e))?;
            let available_bikes =
                Cell::get(&record, bikes_idx, AVAILABLE_BIKES_COLUMN, &source_name)?
                    .parse::<u32>()?;

            if !seen.insert((station_id, timestamp)) {
                return Err(LoadError::DuplicateSample {
                    source_name,
                    station_id,
                    timestamp,
                });
            }
            samples.push(OccupancySample::new(station_id, timestamp, available_bikes));
        }
        info!(
            "Loaded {} occupancy samples for {} stations from {}",
            samples.len(),
            seen.iter().map(|(id, _)| id).collect::<HashSet<_>>().len(),
            source_name
        );
        Ok(samples)
    }
}
