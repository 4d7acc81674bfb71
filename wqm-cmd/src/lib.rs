//! Command implementations for the WQM CLI.
//!
//! Provides subcommands for watching the sensor feed with terminal charts,
//! fetching a series once, and classifying single values.

use clap::{Args, Subcommand};
use log::warn;
use std::time::Duration;
use wqm_feed::{FeedClient, DEFAULT_BASE_URL, DEFAULT_FEED};
use wqm_utils::dates;

pub mod fetch;
pub mod watch;

/// Where the sensor API lives.
#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// Base URL of the sensor API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Name of the live readings feed
    #[arg(long, default_value = DEFAULT_FEED)]
    pub feed: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl FeedArgs {
    pub fn client(&self) -> anyhow::Result<FeedClient> {
        Ok(FeedClient::new(
            &self.base_url,
            &self.feed,
            Duration::from_secs(self.timeout_secs),
        )?)
    }
}

/// Optional historical date selection.
#[derive(Args, Debug, Clone, Default)]
pub struct DateArgs {
    /// Query readings recorded on this date instead of the live feed (sent as given)
    #[arg(short = 'd', long, conflicts_with = "today")]
    pub date: Option<String>,

    /// Query readings recorded today
    #[arg(long)]
    pub today: bool,

    /// Collection holding the historical readings
    #[arg(long, default_value = DEFAULT_FEED)]
    pub collection: String,
}

impl DateArgs {
    /// The date to query, if any. Unusual date shapes are only warned about.
    pub fn resolve(&self) -> Option<String> {
        if self.today {
            return Some(dates::today());
        }
        let date = self.date.clone()?;
        if !dates::is_query_date(&date) {
            warn!(
                "Date {:?} is not YYYY-MM-DD; the service may return no readings",
                date
            );
        }
        Some(date)
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Poll the feed and redraw terminal charts until interrupted
    Watch {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        date: DateArgs,

        /// Seconds between fetches
        #[arg(long, default_value_t = 10)]
        interval_secs: u64,

        /// Milliseconds between data arriving and the charts being redrawn
        #[arg(long, default_value_t = 300)]
        render_delay_ms: u64,

        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(long)]
        duration_secs: Option<u64>,

        /// Ignore responses to requests older than the one currently shown
        #[arg(long)]
        latest_request_wins: bool,
    },

    /// Fetch readings once and write them as CSV to stdout
    Fetch {
        #[command(flatten)]
        feed: FeedArgs,

        #[command(flatten)]
        date: DateArgs,
    },

    /// Classify a single parameter value (ph, turbidity or tds)
    Classify {
        /// Parameter name
        parameter: String,

        /// Measured value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Watch {
            feed,
            date,
            interval_secs,
            render_delay_ms,
            duration_secs,
            latest_request_wins,
        } => {
            let options = watch::WatchOptions {
                date: date.resolve(),
                collection: date.collection,
                interval: Duration::from_secs(interval_secs),
                render_delay: Duration::from_millis(render_delay_ms),
                duration: duration_secs.map(Duration::from_secs),
                latest_request_wins,
            };
            watch::run_watch(&feed, options).await
        }
        Command::Fetch { feed, date } => {
            fetch::run_fetch(&feed, &date.collection, date.resolve()).await
        }
        Command::Classify { parameter, value } => {
            let status = wqm_data::classify_named(&parameter, value);
            println!("{}", serde_json::to_string(&status)?);
            Ok(())
        }
    }
}
