//! Polling-and-classification controller for the water-quality dashboard.
//!
//! This crate provides:
//! - `scheduler`: the timer that alternates between live and historical queries
//! - `charts`: the `ChartSink` seam and the per-slot chart lifecycle
//! - `controller`: `DashboardController`, which ties fetching, classification
//!   and rendering together
//!
//! Everything runs on one thread. Hosts drive the controller from inside a
//! `tokio::task::LocalSet`.

pub mod charts;
pub mod config;
pub mod controller;
pub mod scheduler;

#[cfg(test)]
mod testing;

pub use charts::{ChartError, ChartFocus, ChartSink, ChartStateManager, ChartStats};
pub use config::{DashboardConfig, StaleResponsePolicy};
pub use controller::DashboardController;
pub use scheduler::PollScheduler;
