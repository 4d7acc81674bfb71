//! Live terminal dashboard.
//!
//! Runs the dashboard controller against the remote service and draws each
//! chart as a one-line sparkline every time the controller rebuilds it.

use crate::FeedArgs;
use log::{debug, info};
use std::time::Duration;
use tokio::signal;
use tokio::task::LocalSet;
use tokio::time::sleep;
use wqm_dashboard::{
    ChartError, ChartFocus, ChartSink, DashboardConfig, DashboardController, StaleResponsePolicy,
};
use wqm_data::{ChartData, ChartSlot};
use wqm_feed::FeedClient;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Number of most recent points drawn per sparkline.
const SPARK_WIDTH: usize = 60;

/// Render `values` as a unicode sparkline scaled between their min and max.
pub fn sparkline(values: &[f64]) -> String {
    let start = values.len().saturating_sub(SPARK_WIDTH);
    let window = &values[start..];
    let (min, max) = window
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), v| {
            (mn.min(*v), mx.max(*v))
        });
    let span = max - min;
    window
        .iter()
        .map(|v| {
            if !span.is_finite() || span.abs() < 1e-9 {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_LEVELS.len() - 1) as f64).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

/// A chart "drawn" to the terminal.
#[derive(Debug)]
pub struct TerminalChart {
    id: u64,
}

/// Chart sink that prints every rebuilt chart as a sparkline line.
#[derive(Debug, Default)]
pub struct TerminalChartSink {
    focus: ChartFocus,
    next_id: u64,
}

impl TerminalChartSink {
    /// Format one chart line: label, sparkline and the latest value.
    pub fn format_chart(data: &ChartData) -> String {
        match (data.values.last(), data.labels.last()) {
            (Some(value), Some(label)) => format!(
                "{:<16} {} {:.2} @ {}",
                data.style.label,
                sparkline(&data.values),
                value,
                label
            ),
            _ => format!("{:<16} (no readings)", data.style.label),
        }
    }
}

impl ChartSink for TerminalChartSink {
    type Chart = TerminalChart;

    fn target_exists(&self, slot: ChartSlot) -> bool {
        self.focus.is_visible(slot)
    }

    fn construct(&mut self, _slot: ChartSlot, data: &ChartData) -> Result<TerminalChart, ChartError> {
        self.next_id += 1;
        println!("{}", TerminalChartSink::format_chart(data));
        Ok(TerminalChart { id: self.next_id })
    }

    fn destroy(&mut self, slot: ChartSlot, chart: TerminalChart) {
        debug!("Released {} chart #{}", slot, chart.id);
    }

    fn set_focus(&mut self, focus: ChartFocus) {
        self.focus = focus;
    }
}

/// Settings for one `watch` run.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub date: Option<String>,
    pub collection: String,
    pub interval: Duration,
    pub render_delay: Duration,
    /// Stop after this long; `None` waits for Ctrl-C.
    pub duration: Option<Duration>,
    pub latest_request_wins: bool,
}

/// Run the dashboard until Ctrl-C or the configured duration elapses.
pub async fn run_watch(feed: &FeedArgs, options: WatchOptions) -> anyhow::Result<()> {
    if options.interval.is_zero() {
        anyhow::bail!("--interval-secs must be at least 1");
    }
    let client = feed.client()?;
    let config = DashboardConfig {
        poll_interval: options.interval,
        render_delay: options.render_delay,
        collection: options.collection.clone(),
        stale_responses: if options.latest_request_wins {
            StaleResponsePolicy::LatestRequestWins
        } else {
            StaleResponsePolicy::LastArrivalWins
        },
    };
    info!("Watching {} ({})", client.base_url(), client.feed());

    LocalSet::new()
        .run_until(watch_local(config, client, options))
        .await
}

async fn watch_local(
    config: DashboardConfig,
    client: FeedClient,
    options: WatchOptions,
) -> anyhow::Result<()> {
    let mut dashboard = DashboardController::new(config, client, TerminalChartSink::default());
    if let Some(date) = &options.date {
        dashboard.select_date(date);
    }
    dashboard.start();

    let stopped = match options.duration {
        Some(duration) => {
            tokio::select! {
                _ = sleep(duration) => Ok(()),
                res = signal::ctrl_c() => res,
            }
        }
        None => signal::ctrl_c().await,
    };
    dashboard.teardown();
    stopped?;

    if let Some(e) = dashboard.last_error() {
        info!("Last fetch error: {}", e);
    }
    println!("{}", serde_json::to_string_pretty(&dashboard.statuses())?);
    Ok(())
}
