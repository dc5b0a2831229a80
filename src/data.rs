//! Data loading
//!
//! Reads a single price column (plus an optional `Date` column) from a CSV
//! export into a [`TimeSeries`]. Quoted fields and thousands separators such
//! as `"4,512.58"` are accepted.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use crate::series::TimeSeries;

/// Default price column name
pub const DEFAULT_PRICE_COLUMN: &str = "Close";

/// Strip surrounding whitespace/quotes and thousands separators
fn clean_value(raw: &str) -> String {
    raw.trim_matches(|c: char| c == ' ' || c == '"')
        .chars()
        .filter(|&c| c != ',')
        .collect()
}

/// Load a price series from a CSV file
pub fn read_price_series(path: impl AsRef<Path>, price_column: &str) -> Result<TimeSeries> {
    let path = path.as_ref();
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Cannot open file: {}", path.display()))?;

    let series = parse_price_series(reader, price_column)
        .with_context(|| format!("Failed to load prices from {}", path.display()))?;

    info!("Read {} rows from {}", series.len(), path.display());
    Ok(series)
}

/// Parse a price series from any CSV reader
pub fn parse_price_series<R: std::io::Read>(
    mut reader: csv::Reader<R>,
    price_column: &str,
) -> Result<TimeSeries> {
    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(clean_value)
        .collect();

    if headers.iter().all(String::is_empty) {
        anyhow::bail!("Empty file");
    }

    let price_idx = headers
        .iter()
        .position(|h| h == price_column)
        .with_context(|| format!("Price column not found: {}", price_column))?;
    let date_idx = headers.iter().position(|h| h == "Date" || h == "date");
    debug!(price_idx, ?date_idx, "Resolved CSV columns");

    let mut values = Vec::new();
    let mut dates = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        // +2 for the header row and 1-indexing
        let line = row_idx + 2;
        let record = record.with_context(|| format!("Failed to read row {}", line))?;

        let raw = record
            .get(price_idx)
            .with_context(|| format!("Missing {} value on line {}", price_column, line))?;
        let price: f64 = clean_value(raw)
            .parse()
            .with_context(|| format!("Failed to parse price {:?} on line {}", raw, line))?;

        let date = date_idx
            .and_then(|i| record.get(i))
            .map(clean_value)
            .unwrap_or_default();

        values.push(price);
        dates.push(date);
    }

    Ok(TimeSeries::with_dates(values, dates))
}
