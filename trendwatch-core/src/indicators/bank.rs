//! Indicator bank and the per-cycle snapshot it produces.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::indicators::{
    Bollinger, BollingerValue, Indicator, Macd, MacdValue, Rsi, Sma, Stochastic, StochasticValue,
};

/// One cycle's indicator readings.
///
/// `None` marks an indicator whose warmup requirement the window does not yet
/// meet. Fusion policies read these fields directly; nothing downstream ever
/// sees a placeholder number standing in for "not ready".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub macd: Option<MacdValue>,
    pub bollinger: Option<BollingerValue>,
    pub stochastic: Option<StochasticValue>,
    pub sma: Option<f64>,
}

impl IndicatorSnapshot {
    /// True when every indicator produced a value.
    pub fn is_complete(&self) -> bool {
        self.rsi.is_some()
            && self.macd.is_some()
            && self.bollinger.is_some()
            && self.stochastic.is_some()
            && self.sma.is_some()
    }
}

/// The five configured indicators, computed together each cycle.
#[derive(Debug, Clone)]
pub struct IndicatorBank {
    rsi: Rsi,
    macd: Macd,
    bollinger: Bollinger,
    stochastic: Stochastic,
    sma: Sma,
}

impl IndicatorBank {
    /// Build the bank from a config. Callers validate the config first;
    /// the indicator constructors only enforce their own local bounds.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            rsi: Rsi::new(config.rsi_period),
            macd: Macd::new(config.macd_fast, config.macd_slow, config.macd_signal),
            bollinger: Bollinger::new(config.bollinger_period, config.bollinger_multiplier),
            stochastic: Stochastic::new(config.stochastic_k, config.stochastic_d),
            sma: Sma::new(config.sma_period),
        }
    }

    /// Compute every indicator over the ordered window contents.
    pub fn compute(&self, prices: &[f64]) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi.compute(prices),
            macd: self.macd.compute(prices),
            bollinger: self.bollinger.compute(prices),
            stochastic: self.stochastic.compute(prices),
            sma: self.sma.compute(prices),
        }
    }

    /// (name, min_samples) per indicator, for diagnostics.
    pub fn requirements(&self) -> Vec<(String, usize)> {
        self.members()
            .iter()
            .map(|m| (m.name().to_string(), m.min_samples()))
            .collect()
    }

    /// Samples needed before every indicator is defined.
    pub fn warmup_samples(&self) -> usize {
        self.members()
            .iter()
            .map(|m| m.min_samples())
            .max()
            .unwrap_or(0)
    }

    fn members(&self) -> [&dyn Indicator; 5] {
        [
            &self.rsi,
            &self.macd,
            &self.bollinger,
            &self.stochastic,
            &self.sma,
        ]
    }
}
