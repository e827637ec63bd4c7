//! TrendWatch Monitor — sources, sinks and the session loop.
//!
//! This crate builds on `trendwatch-core` to provide:
//! - Price sources (CSV column streaming, seeded synthetic walks)
//! - Trend sinks (JSONL append-only file, stdout)
//! - TOML configuration with a blake3 session fingerprint
//! - The poll / observe / record session loop with failure containment
//! - Parallel strategy replay over historical price files
//!
//! Pacing stays out: sessions advance one cycle per call and the caller
//! decides when the next cycle happens.

pub mod config;
pub mod record;
pub mod replay;
pub mod session;
pub mod sink;
pub mod source;

pub use config::{ConfigError, MonitorConfig};
pub use record::TrendRecord;
pub use replay::{run_replay, run_replay_many, ReplayError, ReplayReport};
pub use session::{admissible, CycleEvent, MonitorError, MonitorSession, SessionSummary};
pub use sink::{JsonlSink, SinkError, StdoutSink, TrendSink};
pub use source::{CsvPriceSource, PriceSource, SourceError, SyntheticPriceSource};
