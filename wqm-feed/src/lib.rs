//! Reading model and remote query client for the water-quality sensor feed.
//!
//! - `reading`: the coerced `Reading` record and `ReadingSeries`
//! - `query`: live vs. historical `QuerySelection`
//! - `client`: the `ReadingSource` trait, URL builders and, with the `api`
//!   feature, the reqwest-backed `FeedClient`

pub mod client;
pub mod error;
pub mod query;
pub mod reading;

pub use client::{decode_series, ReadingSource, DEFAULT_BASE_URL, DEFAULT_FEED};
#[cfg(feature = "api")]
pub use client::FeedClient;
pub use error::FetchError;
pub use query::QuerySelection;
pub use reading::{Parameter, Reading, ReadingSeries};
