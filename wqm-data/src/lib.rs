//! Classification and chart shaping for water-quality readings.
//!
//! This crate turns a coerced `ReadingSeries` into the two things the
//! dashboard shows: status cards for the latest reading and line-chart data.

pub mod chart_data;
pub mod classify;

pub use chart_data::{ChartData, ChartSlot, ChartStyle};
pub use classify::{classify, classify_named, ParameterStatus, Severity, StatusBoard};
