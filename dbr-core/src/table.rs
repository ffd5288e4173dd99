//! Header-addressed CSV access shared by the occupancy and rainfall loaders.

use crate::error::{LoadError, Result};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use std::{fmt::Display, io::Read, str::FromStr};

/// A CSV reader with its resolved header row and the name used in errors.
pub(crate) struct Table<R: Read> {
    pub source_name: String,
    reader: Reader<R>,
    headers: StringRecord,
}

impl<R: Read> Table<R> {
    pub fn new(rdr: R, source_name: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(rdr);
        let headers = reader
            .headers()
            .map_err(|source| LoadError::Csv {
                source_name: source_name.to_string(),
                source,
            })?
            .clone();
        Ok(Table {
            source_name: source_name.to_string(),
            reader,
            headers,
        })
    }

    /// Position of `column` in the header row, ignoring case and padding.
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(column))
            .ok_or_else(|| LoadError::MissingColumn {
                source_name: self.source_name.clone(),
                column: column.to_string(),
            })
    }

    pub fn records(&mut self) -> impl Iterator<Item = Result<StringRecord>> + '_ {
        let source_name = self.source_name.clone();
        self.reader.records().map(move |result| {
            result.map_err(|source| LoadError::Csv {
                source_name: source_name.clone(),
                source,
            })
        })
    }
}

/// One non-empty cell of a record, remembered with its location.
pub(crate) struct Cell<'a> {
    source_name: &'a str,
    line: u64,
    column: &'a str,
    value: &'a str,
}

impl<'a> Cell<'a> {
    pub fn get(
        record: &'a StringRecord,
        index: usize,
        column: &'a str,
        source_name: &'a str,
    ) -> Result<Self> {
        let line = record.position().map_or(0, |p| p.line());
        match record.get(index).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(Cell {
                source_name,
                line,
                column,
                value,
            }),
            _ => Err(LoadError::MissingField {
                source_name: source_name.to_string(),
                line,
                column: column.to_string(),
            }),
        }
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    pub fn invalid(&self, reason: impl Display) -> LoadError {
        LoadError::InvalidField {
            source_name: self.source_name.to_string(),
            line: self.line,
            column: self.column.to_string(),
            value: self.value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn parse<T>(&self) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.value.parse::<T>().map_err(|e| self.invalid(e))
    }
}
