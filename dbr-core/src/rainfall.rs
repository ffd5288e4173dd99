use crate::{
    error::{LoadError, Result},
    table::{Cell, Table},
};
use chrono::NaiveDate;
use dbr_utils::dates::parse_day_first_date;
use log::info;
use serde::Serialize;
use std::{fs::File, io::Read, path::Path};

pub const DATE_COLUMN: &str = "date";
pub const RAIN_COLUMN: &str = "rain";

/// Total rainfall recorded for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RainfallObservation {
    pub date: NaiveDate,
    /// Rainfall in millimetres
    pub rain_mm: f64,
}

impl RainfallObservation {
    pub fn new(date: NaiveDate, rain_mm: f64) -> Self {
        RainfallObservation { date, rain_mm }
    }

    /// Load daily rainfall from a CSV file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<RainfallObservation>> {
        let path = path.as_ref();
        let source_name = path.display().to_string();
        let file = File::open(path).map_err(|source| LoadError::Io {
            source_name: source_name.clone(),
            source,
        })?;
        Self::parse_rainfall_csv(file, &source_name)
    }

    /// Parse daily weather CSV text with a header row.
    ///
    /// Only the `date` and `rain` columns are read. Dates are day-first.
    ///
    /// # Example CSV
    /// ```text
    /// date,ind,rain,ind,maxtp,ind,mintp
    /// 01-jan-2019,0,0.2,0,9.6,0,4.1
    /// ```
    pub fn parse_rainfall_csv<R: Read>(
        rdr: R,
        source_name: &str,
    ) -> Result<Vec<RainfallObservation>> {
        let mut table = Table::new(rdr, source_name)?;
        let date_idx = table.column_index(DATE_COLUMN)?;
        let rain_idx = table.column_index(RAIN_COLUMN)?;
        let source_name = table.source_name.clone();

        let mut observations = Vec::new();
        for result in table.records() {
            let record = result?;
            let date_cell = Cell::get(&record, date_idx, DATE_COLUMN, &source_name)?;
            let date =
                parse_day_first_date(date_cell.value()).map_err(|e| date_cell.invalid(e))?;
            let rain_cell = Cell::get(&record, rain_idx, RAIN_COLUMN, &source_name)?;
            let rain_mm = rain_cell.parse::<f64>()?;
            if !rain_mm.is_finite() || rain_mm < 0.0 {
                return Err(rain_cell.invalid("rainfall must be a non-negative number"));
            }
            observations.push(RainfallObservation::new(date, rain_mm));
        }
        info!(
            "Loaded {} rainfall observations from {}",
            observations.len(),
            source_name
        );
        Ok(observations)
    }
}
