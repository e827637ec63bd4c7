//! Relative Strength Index (RSI) over the trailing window.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss), where the averages are plain
//! means of the gains and losses across the last `period` price changes.
//! No Wilder smoothing: the value depends only on the current window
//! contents, so a restarted process reproduces it exactly.
//! min_samples: period + 1 (period changes need period + 1 prices).
//!
//! Edge case: avg_loss == 0 → RSI = 100. A perfectly flat window has no
//! losses and reports maximum strength; there is no special neutral value.

use crate::indicators::Indicator;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }

    /// RSI of the newest price, or `None` with fewer than `period + 1` prices.
    pub fn compute(&self, prices: &[f64]) -> Option<f64> {
        if prices.len() < self.period + 1 {
            return None;
        }
        let tail = &prices[prices.len() - (self.period + 1)..];

        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for pair in tail.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum -= change;
            }
        }

        let avg_gain = gain_sum / self.period as f64;
        let avg_loss = loss_sum / self.period as f64;

        if avg_loss == 0.0 {
            return Some(100.0);
        }
        Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_samples(&self) -> usize {
        self.period + 1
    }
}
