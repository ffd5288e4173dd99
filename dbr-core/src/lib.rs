pub mod error;
pub mod occupancy;
pub mod rainfall;
mod table;
