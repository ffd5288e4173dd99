//! Data processing for bike occupancy and rainfall observations.
//!
//! This crate turns raw occupancy readings into daily usage, joins usage
//! with rainfall, and fits the regression reported by the CLI.

pub mod merge;
pub mod regression;
pub mod usage;
