use crate::error::FetchError;
use crate::query::QuerySelection;
use crate::reading::ReadingSeries;

#[cfg(feature = "api")]
use log::{debug, warn};
#[cfg(feature = "api")]
use reqwest::Client;
#[cfg(feature = "api")]
use std::time::Duration;

/// Base URL of the hosted sensor API.
pub const DEFAULT_BASE_URL: &str = "https://esp32-mongodb-idev3.onrender.com/";

/// Feed (and collection) the station publishes to.
pub const DEFAULT_FEED: &str = "JuChecchio";

/// Anything that can answer the two dashboard queries.
///
/// Implementations must report every failure as a [`FetchError`]; they are
/// never retried here.
#[allow(async_fn_in_trait)]
pub trait ReadingSource {
    /// Fetch the most recent readings.
    async fn fetch_live(&self) -> Result<ReadingSeries, FetchError>;

    /// Fetch every reading of `collection` recorded on `date`.
    ///
    /// `date` is passed to the service verbatim.
    async fn fetch_historical(
        &self,
        collection: &str,
        date: &str,
    ) -> Result<ReadingSeries, FetchError>;

    /// Dispatch on the active query selection.
    async fn fetch(&self, query: &QuerySelection) -> Result<ReadingSeries, FetchError> {
        match query {
            QuerySelection::Live => self.fetch_live().await,
            QuerySelection::HistoricalByDate { collection, date } => {
                self.fetch_historical(collection, date).await
            }
        }
    }
}

fn normalize_base(base: &str) -> String {
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}

/// `<base>api/leituras/<feed>`
pub fn live_url(base: &str, feed: &str) -> String {
    format!("{}api/leituras/{}", normalize_base(base), feed)
}

/// `<base>api/historico-dia/<collection>?data=<date>`
pub fn historical_url(base: &str, collection: &str, date: &str) -> String {
    format!(
        "{}api/historico-dia/{}?data={}",
        normalize_base(base),
        collection,
        date
    )
}

/// Decode a response body into a series. Anything but a JSON array is rejected.
pub fn decode_series(body: &str) -> Result<ReadingSeries, FetchError> {
    Ok(serde_json::from_str::<ReadingSeries>(body)?)
}

/// HTTP client for the sensor API.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    base_url: String,
    feed: String,
}

#[cfg(feature = "api")]
impl FeedClient {
    pub fn new(base_url: &str, feed: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::transport)?;
        Ok(FeedClient {
            client,
            base_url: normalize_base(base_url),
            feed: feed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn feed(&self) -> &str {
        &self.feed
    }

    async fn get_series(&self, url: &str) -> Result<ReadingSeries, FetchError> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::transport)?;
        let status = response.status();
        if !status.is_success() {
            warn!("Bad response status for {}: {}", url, status);
            return Err(FetchError::Status(status.as_u16()));
        }
        let body = response.text().await.map_err(FetchError::transport)?;
        decode_series(&body)
    }
}

#[cfg(feature = "api")]
impl ReadingSource for FeedClient {
    async fn fetch_live(&self) -> Result<ReadingSeries, FetchError> {
        self.get_series(&live_url(&self.base_url, &self.feed)).await
    }

    async fn fetch_historical(
        &self,
        collection: &str,
        date: &str,
    ) -> Result<ReadingSeries, FetchError> {
        self.get_series(&historical_url(&self.base_url, collection, date))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reading::Reading;
    use std::cell::RefCell;

    #[test]
    fn test_urls() {
        assert_eq!(
            live_url(DEFAULT_BASE_URL, DEFAULT_FEED),
            "https://esp32-mongodb-idev3.onrender.com/api/leituras/JuChecchio"
        );
        assert_eq!(
            historical_url("http://localhost:3000", "JuChecchio", "2025-06-01"),
            "http://localhost:3000/api/historico-dia/JuChecchio?data=2025-06-01"
        );
        // No client-side validation of the date
        assert_eq!(
            historical_url("http://localhost:3000/", "JuChecchio", "not a date"),
            "http://localhost:3000/api/historico-dia/JuChecchio?data=not a date"
        );
    }

    #[test]
    fn test_decode_series() {
        let body = r#"[
            {"timestamp": "10:00", "PH": 7.0, "Turbidez": 0, "TDS": 120},
            {"timestamp": "10:05", "PH": "7.2", "Turbidez": "1.5", "TDS": "130"}
        ]"#;
        let series = decode_series(body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.latest().map(|r| r.ph), Some(7.2));

        assert!(decode_series("[]").unwrap().is_empty());
        assert!(matches!(
            decode_series(r#"{"error": "not found"}"#),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(decode_series("<html>"), Err(FetchError::Decode(_))));
    }

    struct Recording {
        calls: RefCell<Vec<String>>,
    }

    impl ReadingSource for Recording {
        async fn fetch_live(&self) -> Result<ReadingSeries, FetchError> {
            self.calls.borrow_mut().push("live".to_string());
            Ok(ReadingSeries::new(vec![Reading::default()]))
        }

        async fn fetch_historical(
            &self,
            collection: &str,
            date: &str,
        ) -> Result<ReadingSeries, FetchError> {
            self.calls
                .borrow_mut()
                .push(format!("{}/{}", collection, date));
            Ok(ReadingSeries::default())
        }
    }

    #[tokio::test]
    async fn test_fetch_dispatch() {
        let source = Recording {
            calls: RefCell::new(Vec::new()),
        };
        let live = source.fetch(&QuerySelection::Live).await.unwrap();
        assert_eq!(live.len(), 1);
        let historical = source
            .fetch(&QuerySelection::for_date("JuChecchio", Some("2025-06-01")))
            .await
            .unwrap();
        assert!(historical.is_empty());
        assert_eq!(
            *source.calls.borrow(),
            vec!["live".to_string(), "JuChecchio/2025-06-01".to_string()]
        );
    }
}
