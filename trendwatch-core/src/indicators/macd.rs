//! Moving Average Convergence Divergence (MACD).
//!
//! MACD line = EMA(fast) - EMA(slow); signal line = EMA(line series, signal);
//! histogram = line - signal, exactly, so the sign of the histogram always
//! matches the line/signal comparison.
//!
//! All EMAs seed from the first sample (see `ema::ema_series`), and the
//! signal line grows alongside the MACD line from the first price instead of
//! waiting for `signal` complete line values. min_samples: slow — even
//! though the recursions produce numbers earlier, a value computed from
//! fewer than `slow` prices is not reported.

use serde::{Deserialize, Serialize};

use crate::indicators::ema::ema_series;
use crate::indicators::Indicator;

/// The three MACD components, defined together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdValue {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast: usize,
    slow: usize,
    signal: usize,
    name: String,
}

impl Macd {
    pub fn new(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast >= 1, "MACD fast span must be >= 1");
        assert!(signal >= 1, "MACD signal span must be >= 1");
        assert!(fast < slow, "MACD fast span must be below the slow span");
        Self {
            fast,
            slow,
            signal,
            name: format!("macd_{fast}_{slow}_{signal}"),
        }
    }

    /// MACD of the newest price, or `None` with fewer than `slow` prices.
    pub fn compute(&self, prices: &[f64]) -> Option<MacdValue> {
        if prices.len() < self.slow {
            return None;
        }

        let fast = ema_series(prices, self.fast);
        let slow = ema_series(prices, self.slow);
        let line_series: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_series = ema_series(&line_series, self.signal);

        let line = *line_series.last()?;
        let signal = *signal_series.last()?;
        Some(MacdValue {
            line,
            signal,
            histogram: line - signal,
        })
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_samples(&self) -> usize {
        self.slow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn constant_series_is_all_zero() {
        let macd = Macd::new(3, 5, 2);
        let value = macd.compute(&[50.0; 8]).unwrap();
        assert_approx(value.line, 0.0, DEFAULT_EPSILON);
        assert_approx(value.signal, 0.0, DEFAULT_EPSILON);
        assert_approx(value.histogram, 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn hand_computed_small_case() {
        // Prices: 10, 11, 12, 13. fast=2 (alpha 2/3), slow=4 (alpha 0.4), signal=2.
        // fast EMA:  10, 10.6667, 11.5556, 12.5185  (10+2/3, ...)
        // slow EMA:  10, 10.4,    11.04,   11.824
        // line:      0,  0.266667, 0.515556, 0.694519
        // signal (alpha 2/3 over line series):
        //   0, 0.177778, 0.402963, 0.597333...
        let prices = [10.0, 11.0, 12.0, 13.0];
        let fast = crate::indicators::ema::ema_series(&prices, 2);
        let slow = crate::indicators::ema::ema_series(&prices, 4);
        let expected_line = fast[3] - slow[3];

        let macd = Macd::new(2, 4, 2);
        let value = macd.compute(&prices).unwrap();
        assert_approx(value.line, expected_line, DEFAULT_EPSILON);
        assert_approx(value.line, 0.6945185185185184, 1e-12);
        assert_approx(value.histogram, value.line - value.signal, DEFAULT_EPSILON);
    }

    #[test]
    fn uptrend_puts_line_above_signal() {
        // In a steady rise the fast EMA leads, the line is positive, and the
        // slower signal lags below it.
        let prices: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let macd = Macd::new(12, 26, 9);
        let value = macd.compute(&prices).unwrap();
        assert!(value.line > 0.0);
        assert!(value.line > value.signal);
        assert!(value.histogram > 0.0);
    }

    #[test]
    fn downtrend_puts_line_below_signal() {
        let prices: Vec<f64> = (0..40).map(|i| 200.0 - i as f64).collect();
        let macd = Macd::new(12, 26, 9);
        let value = macd.compute(&prices).unwrap();
        assert!(value.line < 0.0);
        assert!(value.line < value.signal);
        assert!(value.histogram < 0.0);
    }

    #[test]
    fn undefined_below_slow_span() {
        let macd = Macd::new(12, 26, 9);
        let prices: Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        assert_eq!(macd.compute(&prices), None);

        let prices: Vec<f64> = (0..26).map(|i| 100.0 + i as f64).collect();
        assert!(macd.compute(&prices).is_some());
    }

    #[test]
    fn histogram_is_exactly_line_minus_signal() {
        let prices: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0)
            .collect();
        let macd = Macd::new(12, 26, 9);
        let value = macd.compute(&prices).unwrap();
        // Bit-exact, not approximate: the struct stores the difference itself.
        assert_eq!(value.histogram, value.line - value.signal);
    }

    #[test]
    fn min_samples_is_slow_span() {
        let macd = Macd::new(12, 26, 9);
        assert_eq!(macd.min_samples(), 26);
        assert_eq!(macd.name(), "macd_12_26_9");
    }

    #[test]
    #[should_panic(expected = "fast span must be below the slow span")]
    fn fast_not_below_slow_panics() {
        Macd::new(26, 12, 9);
    }

    #[test]
    #[should_panic(expected = "fast span must be below the slow span")]
    fn equal_spans_panic() {
        Macd::new(12, 12, 9);
    }
}
