//! One-shot fetch of a live or historical series.

use crate::FeedArgs;
use log::info;
use std::io::Write;
use wqm_data::StatusBoard;
use wqm_feed::{QuerySelection, ReadingSeries, ReadingSource};

/// Fetch once and write the series to stdout as CSV.
///
/// Output columns: `timestamp,ph,turbidity,tds,residue`.
pub async fn run_fetch(feed: &FeedArgs, collection: &str, date: Option<String>) -> anyhow::Result<()> {
    let client = feed.client()?;
    let query = QuerySelection::for_date(collection, date.as_deref());
    info!("Fetching {} readings from {}", query, client.base_url());

    let series = client.fetch(&query).await?;
    info!("Received {} readings", series.len());

    write_csv(&series, std::io::stdout().lock())?;

    let board = StatusBoard::from_series(&series);
    info!(
        "Latest: pH {:.2} ({}), turbidity {:.2} ({}), TDS {:.0} ({}), residue {:.1}%",
        board.ph.value,
        board.ph.status,
        board.turbidity.value,
        board.turbidity.status,
        board.tds.value,
        board.tds.status,
        board.residue
    );
    Ok(())
}

/// Write `series` as CSV with a header row.
pub fn write_csv<W: Write>(series: &ReadingSeries, out: W) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for reading in series {
        wtr.serialize(reading)?;
    }
    wtr.flush()?;
    Ok(())
}
