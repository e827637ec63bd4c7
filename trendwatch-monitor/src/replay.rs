//! Strategy replay over historical price files.
//!
//! Wraps the core RSI reversion replay with CSV loading and a parallel
//! many-file runner. Unlike the live loop, loading is strict: a row that
//! fails to parse or an inadmissible price aborts the replay with the row
//! number, because a historical file can be fixed and rerun.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

use trendwatch_core::{replay_rsi_strategy, ReplayResult};

use crate::session::admissible;
use crate::source::{CsvPriceSource, PriceSource, SourceError};

/// Errors from a replay run.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("rsi period must be at least 1")]
    ZeroPeriod,
    #[error("source error: {0}")]
    Source(#[from] SourceError),
    #[error("row {row}: inadmissible price {value}")]
    InadmissiblePrice { row: u64, value: f64 },
}

/// Outcome of replaying one file.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub path: PathBuf,
    /// Prices loaded from the file.
    pub samples: usize,
    pub rsi_period: usize,
    pub result: ReplayResult,
}

/// Replay one CSV price file through the RSI reversion rule.
pub fn run_replay(
    path: &Path,
    column: &str,
    rsi_period: usize,
) -> Result<ReplayReport, ReplayError> {
    if rsi_period == 0 {
        return Err(ReplayError::ZeroPeriod);
    }

    let prices = load_prices(path, column)?;
    let result = replay_rsi_strategy(&prices, rsi_period);
    tracing::info!(
        path = %path.display(),
        samples = prices.len(),
        trades = result.trade_count,
        total_return = result.total_return,
        "replay finished"
    );

    Ok(ReplayReport {
        path: path.to_path_buf(),
        samples: prices.len(),
        rsi_period,
        result,
    })
}

/// Replay several files in parallel.
///
/// Reports come back in input order, one per path, so a failed file marks
/// its own slot instead of poisoning the batch.
pub fn run_replay_many(
    paths: &[PathBuf],
    column: &str,
    rsi_period: usize,
) -> Vec<Result<ReplayReport, ReplayError>> {
    paths
        .par_iter()
        .map(|path| run_replay(path, column, rsi_period))
        .collect()
}

fn load_prices(path: &Path, column: &str) -> Result<Vec<f64>, ReplayError> {
    let mut source = CsvPriceSource::open(path, column)?;
    let mut prices = Vec::new();
    while let Some(price) = source.poll()? {
        if !admissible(price) {
            return Err(ReplayError::InadmissiblePrice {
                row: source.rows_read(),
                value: price,
            });
        }
        prices.push(price);
    }
    Ok(prices)
}
