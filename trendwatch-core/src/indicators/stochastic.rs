//! Stochastic oscillator (%K and %D) on close prices.
//!
//! %K = 100 * (close - min) / (max - min) over the last `k_period` prices;
//! %D = mean of the last `d_period` %K values. Without separate high/low
//! series both extremes come from the prices themselves.
//! min_samples: k_period + d_period - 1, the shortest window that yields
//! `d_period` complete %K readings.
//!
//! Edge case: max == min (flat %K window) → %K = 50, dead center of the range.

use serde::{Deserialize, Serialize};

use crate::indicators::Indicator;

/// %K and its smoothed companion, defined together or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochasticValue {
    pub percent_k: f64,
    pub percent_d: f64,
}

#[derive(Debug, Clone)]
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
    name: String,
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        assert!(k_period >= 1, "Stochastic %K period must be >= 1");
        assert!(d_period >= 1, "Stochastic %D period must be >= 1");
        Self {
            k_period,
            d_period,
            name: format!("stoch_{k_period}_{d_period}"),
        }
    }

    /// %K/%D for the newest price, or `None` with fewer than
    /// `k_period + d_period - 1` prices.
    pub fn compute(&self, prices: &[f64]) -> Option<StochasticValue> {
        let needed = self.k_period + self.d_period - 1;
        if prices.len() < needed {
            return None;
        }

        // One %K per trailing position, oldest first so the newest lands last.
        let mut k_values = Vec::with_capacity(self.d_period);
        for offset in (0..self.d_period).rev() {
            let end = prices.len() - offset;
            let window = &prices[end - self.k_period..end];
            k_values.push(percent_k(window));
        }

        let percent_k = *k_values.last()?;
        let percent_d = k_values.iter().sum::<f64>() / self.d_period as f64;
        Some(StochasticValue {
            percent_k,
            percent_d,
        })
    }
}

impl Indicator for Stochastic {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_samples(&self) -> usize {
        self.k_period + self.d_period - 1
    }
}

fn percent_k(window: &[f64]) -> f64 {
    let mut low = f64::INFINITY;
    let mut high = f64::NEG_INFINITY;
    for &p in window {
        low = low.min(p);
        high = high.max(p);
    }
    let close = window[window.len() - 1];
    if high == low {
        50.0
    } else {
        100.0 * (close - low) / (high - low)
    }
}
