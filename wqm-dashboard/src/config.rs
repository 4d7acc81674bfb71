use std::time::Duration;
use wqm_feed::DEFAULT_FEED;

/// Time between two scheduled fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Delay between data arriving and the charts being rebuilt.
pub const DEFAULT_RENDER_DELAY: Duration = Duration::from_millis(300);

/// What to do with a response whose request is older than the last applied one.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum StaleResponsePolicy {
    /// Apply every response as it arrives; the last one to arrive wins.
    #[default]
    LastArrivalWins,
    /// Drop responses to requests issued before the most recently applied one.
    LatestRequestWins,
}

/// Dashboard controller settings.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub poll_interval: Duration,
    pub render_delay: Duration,
    /// Collection queried in historical mode.
    pub collection: String,
    pub stale_responses: StaleResponsePolicy,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
            render_delay: DEFAULT_RENDER_DELAY,
            collection: DEFAULT_FEED.to_string(),
            stale_responses: StaleResponsePolicy::default(),
        }
    }
}
