//! Monitor session — the poll / observe / record loop.
//!
//! A session wires a price source, the decision engine and a trend sink
//! together and advances them one cycle at a time. The session itself is
//! unpaced: `run_cycle` does one poll and returns immediately, so callers
//! decide whether to sleep between cycles (the CLI does) or to spin through
//! a finite source as fast as it reads (tests and replays do).
//!
//! Failure containment is the rule. A failed fetch skips the cycle, a
//! rejected price never reaches the window, a sink error loses one record;
//! none of them stop the loop.

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use trendwatch_core::{CycleOutput, Decision, PolicyInputs, TrendEngine};

use crate::config::{ConfigError, MonitorConfig};
use crate::record::TrendRecord;
use crate::sink::TrendSink;
use crate::source::{CsvPriceSource, PriceSource, SourceError};

/// Errors from session construction.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Whether a fetched price may enter the window.
///
/// Only finite, non-negative prices are admissible; NaN or a negative
/// quote is a broken fetch wearing a float costume.
pub fn admissible(price: f64) -> bool {
    price.is_finite() && price >= 0.0
}

/// Outcome of a single monitor cycle.
#[derive(Debug)]
pub enum CycleEvent {
    /// The price entered the window and the engine produced an output.
    Observed(CycleOutput),
    /// The fetch failed; nothing reached the window.
    SkippedFetch(SourceError),
    /// The fetch succeeded but the price was not admissible.
    RejectedPrice(f64),
    /// A finite source has no more prices.
    Exhausted,
}

/// Final tally of a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Poll attempts, successful or not. Exhaustion is not a cycle.
    pub cycles: u64,
    /// Cycles where the policy took a stance.
    pub decisions: u64,
    /// Records the sink accepted. Lags `decisions` when the sink fails.
    pub records_written: u64,
    /// Cycles lost to fetch errors or inadmissible prices.
    pub skipped_fetches: u64,
    /// The most recent engine output, if any cycle observed a price.
    pub last: Option<CycleOutput>,
}

/// One monitoring run: a source, an engine and a sink advancing in lockstep.
pub struct MonitorSession {
    engine: TrendEngine,
    source: Box<dyn PriceSource>,
    sink: Box<dyn TrendSink>,
    symbol: String,
    session_id: String,
    inputs: PolicyInputs,
    cycles: u64,
    decisions: u64,
    records_written: u64,
    skipped_fetches: u64,
    last: Option<CycleOutput>,
}

impl MonitorSession {
    /// Build a session from a validated configuration.
    pub fn new(
        config: &MonitorConfig,
        source: Box<dyn PriceSource>,
        sink: Box<dyn TrendSink>,
    ) -> Result<Self, MonitorError> {
        config.validate()?;
        let engine = TrendEngine::new(&config.engine_config()).map_err(ConfigError::from)?;
        let inputs = engine.policy().inputs();
        let session_id = config.fingerprint();

        tracing::info!(
            session = %session_id,
            symbol = %config.monitor.symbol,
            source = %source.name(),
            sink = %sink.name(),
            policy = ?engine.policy(),
            warmup = engine.warmup_remaining(),
            "session started"
        );

        Ok(Self {
            engine,
            source,
            sink,
            symbol: config.monitor.symbol.clone(),
            session_id,
            inputs,
            cycles: 0,
            decisions: 0,
            records_written: 0,
            skipped_fetches: 0,
            last: None,
        })
    }

    /// Convenience constructor: monitor a CSV column top to bottom.
    pub fn from_csv(
        config: &MonitorConfig,
        path: &std::path::Path,
        column: &str,
        sink: Box<dyn TrendSink>,
    ) -> Result<Self, MonitorError> {
        let source = CsvPriceSource::open(path, column)?;
        Self::new(config, Box::new(source), sink)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn engine(&self) -> &TrendEngine {
        &self.engine
    }

    /// Run one poll / observe / record cycle.
    ///
    /// Exhaustion does not count as a cycle; every other outcome does.
    pub fn run_cycle(&mut self) -> CycleEvent {
        let price = match self.source.poll() {
            Ok(None) => return CycleEvent::Exhausted,
            Ok(Some(price)) => {
                self.cycles += 1;
                price
            }
            Err(e) => {
                self.cycles += 1;
                self.skipped_fetches += 1;
                tracing::warn!(
                    source = %self.source.name(),
                    error = %e,
                    "fetch failed, skipping cycle"
                );
                return CycleEvent::SkippedFetch(e);
            }
        };

        if !admissible(price) {
            self.skipped_fetches += 1;
            tracing::warn!(price, "inadmissible price rejected");
            return CycleEvent::RejectedPrice(price);
        }

        let output = self.engine.observe(price);

        match output.decision {
            Decision::Action(action) => {
                self.decisions += 1;
                tracing::info!(
                    symbol = %self.symbol,
                    price = output.price,
                    action = %action,
                    "cycle decided"
                );
                if let Some(record) = TrendRecord::from_cycle(
                    &self.session_id,
                    self.cycles,
                    Utc::now(),
                    &self.symbol,
                    &output,
                    self.inputs,
                ) {
                    match self.sink.record(&record) {
                        Ok(()) => self.records_written += 1,
                        Err(e) => {
                            tracing::error!(
                                sink = %self.sink.name(),
                                error = %e,
                                "failed to write record"
                            );
                        }
                    }
                }
            }
            Decision::InsufficientData => {
                tracing::debug!(
                    warmup_remaining = self.engine.warmup_remaining(),
                    "collecting"
                );
            }
        }

        self.last = Some(output.clone());
        CycleEvent::Observed(output)
    }

    /// Drain a finite source, then report the tally.
    pub fn run_to_exhaustion(&mut self) -> SessionSummary {
        loop {
            if let CycleEvent::Exhausted = self.run_cycle() {
                break;
            }
        }
        let summary = self.summary();
        tracing::info!(
            session = %self.session_id,
            cycles = summary.cycles,
            decisions = summary.decisions,
            records_written = summary.records_written,
            skipped_fetches = summary.skipped_fetches,
            "session exhausted"
        );
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            cycles: self.cycles,
            decisions: self.decisions,
            records_written: self.records_written,
            skipped_fetches: self.skipped_fetches,
            last: self.last.clone(),
        }
    }
}
