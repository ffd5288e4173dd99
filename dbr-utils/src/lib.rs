//! Shared utility functions for DBR crates.

/// Date utility functions
pub mod dates {
    use crate::error::DateError;
    use chrono::{NaiveDate, NaiveDateTime};

    /// Timestamp layouts accepted for occupancy readings, ISO first and then
    /// the day-first forms found in exported spreadsheets.
    pub const DATETIME_FORMATS: [&str; 9] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%d-%b-%Y %H:%M:%S",
        "%d-%b-%Y %H:%M",
    ];

    /// Date layouts accepted for rainfall observations.
    pub const DATE_FORMATS: [&str; 5] = [
        "%Y-%m-%d",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%d-%b-%Y",
        "%d %b %Y",
    ];

    /// Format a NaiveDateTime as "YYYY-MM-DD HH:MM:SS"
    pub fn format_datetime(datetime: &NaiveDateTime) -> String {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Parse a timestamp, reading ambiguous numeric dates day-first.
    ///
    /// "02/01/2019 10:15" is the 2nd of January, never February 1st.
    pub fn parse_day_first_datetime(s: &str) -> Result<NaiveDateTime, DateError> {
        let trimmed = s.trim();
        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .ok_or_else(|| DateError(format!("unrecognised timestamp {trimmed:?}")))
    }

    /// Parse a calendar date, reading ambiguous numeric dates day-first.
    ///
    /// A value carrying a time of day is accepted and the time discarded.
    pub fn parse_day_first_date(s: &str) -> Result<NaiveDate, DateError> {
        let trimmed = s.trim();
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .or_else(|| parse_day_first_datetime(trimmed).ok().map(|dt| dt.date()))
            .ok_or_else(|| DateError(format!("unrecognised date {trimmed:?}")))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_parse_iso_timestamp() {
            let parsed = parse_day_first_datetime("2019-01-01 06:20:02").unwrap();
            let expected = NaiveDate::from_ymd_opt(2019, 1, 1)
                .unwrap()
                .and_hms_opt(6, 20, 2)
                .unwrap();
            assert_eq!(parsed, expected);

            let no_seconds = parse_day_first_datetime("2019-01-01 06:20").unwrap();
            assert_eq!(no_seconds.date(), expected.date());
        }

        #[test]
        fn test_parse_timestamp_is_day_first() {
            let parsed = parse_day_first_datetime("02/01/2019 10:15").unwrap();
            assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2019, 1, 2).unwrap());

            let dashed = parse_day_first_datetime("13-03-2019 23:59:59").unwrap();
            assert_eq!(dashed.date(), NaiveDate::from_ymd_opt(2019, 3, 13).unwrap());
        }

        #[test]
        fn test_parse_date_forms() {
            let jan2 = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
            assert_eq!(parse_day_first_date("2019-01-02").unwrap(), jan2);
            assert_eq!(parse_day_first_date("02/01/2019").unwrap(), jan2);
            assert_eq!(parse_day_first_date("02-jan-2019").unwrap(), jan2);
            assert_eq!(parse_day_first_date(" 02-Jan-2019 ").unwrap(), jan2);
            assert_eq!(parse_day_first_date("02/01/2019 00:00").unwrap(), jan2);
        }

        #[test]
        fn test_parse_rejects_garbage() {
            assert!(parse_day_first_date("yesterday").is_err());
            assert!(parse_day_first_date("").is_err());
            assert!(parse_day_first_datetime("2019-13-40 10:00").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let datetime = NaiveDate::from_ymd_opt(2019, 3, 15)
                .unwrap()
                .and_hms_opt(8, 5, 0)
                .unwrap();
            let formatted = format_datetime(&datetime);
            assert_eq!(formatted, "2019-03-15 08:05:00");
            assert_eq!(parse_day_first_datetime(&formatted).unwrap(), datetime);
            assert_eq!(parse_day_first_date(&formatted).unwrap(), datetime.date());
        }
    }
}

/// Error types
pub mod error {
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    pub struct DateError(pub String);

    impl fmt::Display for DateError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "Date error: {}", self.0)
        }
    }

    impl std::error::Error for DateError {}
}
