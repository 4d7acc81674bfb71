use serde::{Deserialize, Serialize};
use std::fmt;

/// Which logical query the dashboard is polling.
#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize, Deserialize)]
pub enum QuerySelection {
    /// The most recent readings feed.
    #[default]
    Live,
    /// All readings of `collection` recorded on `date`.
    HistoricalByDate { collection: String, date: String },
}

impl QuerySelection {
    /// Build a selection from an optional date; an empty date means live mode.
    pub fn for_date(collection: &str, date: Option<&str>) -> Self {
        match date {
            Some(d) if !d.trim().is_empty() => QuerySelection::HistoricalByDate {
                collection: collection.to_string(),
                date: d.to_string(),
            },
            _ => QuerySelection::Live,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, QuerySelection::Live)
    }

    /// The selected date, if in historical mode.
    pub fn date(&self) -> Option<&str> {
        match self {
            QuerySelection::Live => None,
            QuerySelection::HistoricalByDate { date, .. } => Some(date.as_str()),
        }
    }
}

impl fmt::Display for QuerySelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySelection::Live => f.write_str("live"),
            QuerySelection::HistoricalByDate { collection, date } => {
                write!(f, "historical {} on {}", collection, date)
            }
        }
    }
}
