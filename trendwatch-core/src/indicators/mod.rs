//! Trailing-value indicator implementations.
//!
//! Each indicator reads an ordered price slice (oldest first) and produces a
//! value for the newest price only, or `None` while the slice is shorter than
//! its `min_samples()`. Readiness is per indicator: a window long enough for
//! RSI(14) can still be too short for MACD(12, 26, 9), and the snapshot
//! carries that difference instead of papering over it.
//!
//! Multi-part indicators (MACD, Bollinger, Stochastic) return small value
//! structs rather than separate instances per part; all parts of one
//! indicator become defined at the same sample count.

pub mod bank;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;

pub use bank::{IndicatorBank, IndicatorSnapshot};
pub use bollinger::{Bollinger, BollingerValue};
pub use macd::{Macd, MacdValue};
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::{Stochastic, StochasticValue};

/// Warmup contract shared by all indicators.
///
/// The `compute` methods stay on the concrete types because their output
/// shapes differ (scalar, band triple, line/signal/histogram). What the
/// engine needs uniformly is a display name and the number of prices an
/// indicator must see before it produces a value.
pub trait Indicator {
    /// Human-readable name (e.g., "rsi_14", "macd_12_26_9").
    fn name(&self) -> &str;

    /// Number of prices needed before `compute` returns `Some`.
    fn min_samples(&self) -> usize;
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
