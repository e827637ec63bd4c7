//! Bollinger Bands around a simple moving average.
//!
//! middle = SMA(period); upper/lower = middle +/- multiplier * stddev.
//! Uses the sample standard deviation (divide by period - 1), so period must
//! be at least 2. min_samples: period.
//!
//! A flat window has zero spread and all three bands collapse onto the mean.

use serde::{Deserialize, Serialize};

use crate::indicators::Indicator;

/// The three bands, defined together or not at all.
/// Invariant: lower <= middle <= upper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    name: String,
}

impl Bollinger {
    pub fn new(period: usize, multiplier: f64) -> Self {
        assert!(period >= 2, "Bollinger period must be >= 2");
        assert!(
            multiplier.is_finite() && multiplier > 0.0,
            "Bollinger multiplier must be positive"
        );
        Self {
            period,
            multiplier,
            name: format!("bollinger_{period}_{multiplier}"),
        }
    }

    /// Bands for the newest price, or `None` with fewer than `period` prices.
    pub fn compute(&self, prices: &[f64]) -> Option<BollingerValue> {
        if prices.len() < self.period {
            return None;
        }
        let window = &prices[prices.len() - self.period..];
        let mean = window.iter().sum::<f64>() / self.period as f64;
        let variance = window
            .iter()
            .map(|p| {
                let diff = p - mean;
                diff * diff
            })
            .sum::<f64>()
            / (self.period - 1) as f64;
        let stddev = variance.sqrt();

        Some(BollingerValue {
            upper: mean + self.multiplier * stddev,
            middle: mean,
            lower: mean - self.multiplier * stddev,
        })
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_samples(&self) -> usize {
        self.period
    }
}
