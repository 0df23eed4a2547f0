use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

use super::model::{ColumnMap, OrderDataset, OrderLine};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV header: {0}")]
    Header(#[source] csv::Error),
    #[error("CSV record {row}: {source}")]
    Record {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an order export from disk.
pub fn load_file(path: &Path, columns: &ColumnMap, delimiter: u8) -> Result<OrderDataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = load_reader(file, columns, delimiter)?;
    if dataset.is_empty() {
        log::warn!("{} contains no order lines", path.display());
    }
    log::info!(
        "Loaded {} lines ({} orders) from {} with columns {:?}",
        dataset.len(),
        dataset.order_count(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

/// CSV layout: one header row, then one record per line item.
///
/// * Empty lines are skipped. A line of only delimiters or spaces is kept as
///   a record of (mostly empty) cells.
/// * Short records are padded with empty cells; extra cells are dropped.
/// * Expected headers that are absent only produce a warning.
pub fn load_reader<R: Read>(reader: R, columns: &ColumnMap, delimiter: u8) -> Result<OrderDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(LoadError::Header)?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if i == 0 {
                h.trim_start_matches('\u{feff}').to_string()
            } else {
                h.to_string()
            }
        })
        .collect();

    let missing: Vec<&str> = columns
        .names()
        .into_iter()
        .filter(|name| !headers.iter().any(|h| h == name))
        .collect();
    if !missing.is_empty() {
        log::warn!("CSV is missing expected columns {missing:?}");
    }

    let mut lines = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|source| LoadError::Record { row: row_no, source })?;

        let fields: IndexMap<String, String> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();

        lines.push(OrderLine::from_fields(&fields, columns));
    }

    let dataset = OrderDataset::new(lines, headers);

    let inconsistent = dataset.inconsistent_orders();
    if !inconsistent.is_empty() {
        log::warn!(
            "{} orders have lines disagreeing on order-level fields; first line wins: {:?}",
            inconsistent.len(),
            inconsistent
        );
    }

    Ok(dataset)
}
