//! Price sources — the fetch side of the monitor loop.
//!
//! A `PriceSource` yields one price per poll, in arrival order. `Ok(None)`
//! marks a finite source as exhausted; `Err` is a per-cycle failure the
//! session skips without touching the window. Network clients (the exchange
//! REST polling this replaces) would implement the same trait; the shipped
//! sources read a CSV column or synthesize a seeded random walk.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors from a price source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read price data: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{column}' not found in header; available: {available}")]
    MissingColumn { column: String, available: String },
    #[error("row {row}: cannot parse '{value}' as a price")]
    BadPrice { row: u64, value: String },
}

/// One price per poll, in arrival order.
pub trait PriceSource: Send {
    /// Identifies the source in logs.
    fn name(&self) -> &str;

    /// The next price, `Ok(None)` once a finite source runs dry, or an
    /// error for this cycle only — the next poll may succeed again.
    fn poll(&mut self) -> Result<Option<f64>, SourceError>;
}

/// Streams one column of a headed CSV file, top to bottom.
///
/// The column is resolved against the header row at open time. A row whose
/// value does not parse yields an error for that poll and the reader moves
/// on, so one bad row costs one cycle, not the whole stream.
pub struct CsvPriceSource {
    records: csv::StringRecordsIntoIter<std::fs::File>,
    column_index: usize,
    row: u64,
    name: String,
}

impl std::fmt::Debug for CsvPriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `records` holds a csv reader with no Debug impl.
        f.debug_struct("CsvPriceSource")
            .field("column_index", &self.column_index)
            .field("row", &self.row)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl CsvPriceSource {
    /// Default column name, matching the records the monitor writes.
    pub const DEFAULT_COLUMN: &'static str = "price";

    pub fn open(path: &Path, column: &str) -> Result<Self, SourceError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?;
        let column_index =
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| SourceError::MissingColumn {
                    column: column.to_string(),
                    available: headers.iter().collect::<Vec<_>>().join(", "),
                })?;
        Ok(Self {
            records: reader.into_records(),
            column_index,
            row: 0,
            name: format!("csv:{}", path.display()),
        })
    }

    /// Rows consumed so far, header excluded.
    pub fn rows_read(&self) -> u64 {
        self.row
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Result<Option<f64>, SourceError> {
        let record = match self.records.next() {
            None => return Ok(None),
            Some(result) => {
                self.row += 1;
                result?
            }
        };
        let raw = record.get(self.column_index).unwrap_or("");
        match raw.trim().parse::<f64>() {
            Ok(price) => Ok(Some(price)),
            Err(_) => Err(SourceError::BadPrice {
                row: self.row,
                value: raw.to_string(),
            }),
        }
    }
}

/// Seeded random-walk quotes for offline runs.
///
/// Each poll drifts a mid price, jitters a bid/ask pair around it, and
/// reports the pair's midpoint — the shape a top-of-book poll produces.
/// The walk is fully determined by the seed and emits exactly `cycles`
/// prices before exhausting.
pub struct SyntheticPriceSource {
    rng: StdRng,
    mid: f64,
    remaining: usize,
    name: String,
}

impl SyntheticPriceSource {
    const START_PRICE: f64 = 100.0;
    const MAX_DRIFT: f64 = 0.02;
    const MAX_HALF_SPREAD: f64 = 0.001;

    pub fn new(seed: u64, cycles: usize) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            mid: Self::START_PRICE,
            remaining: cycles,
            name: format!("synthetic_{seed}"),
        }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn poll(&mut self) -> Result<Option<f64>, SourceError> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;

        let drift: f64 = self.rng.gen_range(-Self::MAX_DRIFT..Self::MAX_DRIFT);
        self.mid = (self.mid * (1.0 + drift)).max(0.01);
        let bid = self.mid * (1.0 - self.rng.gen_range(0.0..Self::MAX_HALF_SPREAD));
        let ask = self.mid * (1.0 + self.rng.gen_range(0.0..Self::MAX_HALF_SPREAD));
        Ok(Some((bid + ask) / 2.0))
    }
}
