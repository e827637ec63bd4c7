//! TrendWatch Core — price window, indicator bank, signal fusion, decision
//! cycle, replay.
//!
//! This crate contains the heart of the recommendation engine:
//! - Fixed-capacity FIFO price window
//! - Trailing-value indicators (RSI, MACD, Bollinger, Stochastic, SMA) with
//!   explicit `Option` readiness per indicator
//! - Fusion policies folding a snapshot into a buy/sell/hold action, with a
//!   distinct "insufficient data" outcome
//! - Decision cycle engine with a Collecting → Ready phase machine
//! - RSI reversion replay over historical series
//!
//! Everything here is synchronous and deterministic: the same config and the
//! same price sequence always produce the same outputs. I/O, timestamps and
//! pacing live in `trendwatch-monitor`.

pub mod config;
pub mod domain;
pub mod engine;
pub mod fusion;
pub mod indicators;
pub mod replay;

pub use config::{ConfigError, EngineConfig};
pub use domain::{Action, PriceWindow};
pub use engine::{CycleOutput, EnginePhase, TrendEngine};
pub use fusion::{Decision, FusionPolicy, PolicyInputs};
pub use indicators::{
    BollingerValue, IndicatorBank, IndicatorSnapshot, MacdValue, StochasticValue,
};
pub use replay::{replay_rsi_strategy, ReplayResult};
