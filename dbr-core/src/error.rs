/// Error types for loading the occupancy and rainfall tables
use chrono::NaiveDateTime;
use thiserror::Error;

/// Main error type for table loading.
///
/// Every variant names the file (or other source) being read; row level
/// variants also carry the 1-based line number and the column header.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read
    #[error("{source_name}: failed to read: {source}")]
    Io {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    /// The CSV text itself is malformed
    #[error("{source_name}: failed to parse CSV: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row
    #[error("{source_name}: missing required column {column:?}")]
    MissingColumn { source_name: String, column: String },

    /// A row is too short or has an empty cell in a required column
    #[error("{source_name}: line {line}: column {column:?} is empty")]
    MissingField {
        source_name: String,
        line: u64,
        column: String,
    },

    /// A cell could not be converted to its column type
    #[error("{source_name}: line {line}: column {column:?} has invalid value {value:?} ({reason})")]
    InvalidField {
        source_name: String,
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    /// The same station reported twice at the same instant
    #[error("{source_name}: station {station_id} has more than one reading at {timestamp}")]
    DuplicateSample {
        source_name: String,
        station_id: u32,
        timestamp: NaiveDateTime,
    },
}

/// Type alias for Results using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
