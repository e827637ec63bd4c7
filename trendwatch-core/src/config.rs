//! Engine configuration and fail-fast validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fusion::FusionPolicy;

/// Parameters for one engine instance.
///
/// The same config always produces the same engine behavior; there is no
/// hidden state outside these fields and the observed prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Price window capacity.
    pub capacity: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_multiplier: f64,
    pub stochastic_k: usize,
    pub stochastic_d: usize,
    pub sma_period: usize,
    pub policy: FusionPolicy,
}

impl Default for EngineConfig {
    /// Textbook parameters: RSI 14, MACD 12/26/9, Bollinger 20x2,
    /// Stochastic 14/3, SMA 20, majority vote over a 50-price window.
    fn default() -> Self {
        Self {
            capacity: 50,
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_multiplier: 2.0,
            stochastic_k: 14,
            stochastic_d: 3,
            sma_period: 20,
            policy: FusionPolicy::MajorityVote,
        }
    }
}

impl EngineConfig {
    /// Check every parameter before any price is accepted.
    ///
    /// Returns the first violation found. The never-ready check compares each
    /// indicator's warmup requirement against the window capacity: an
    /// indicator that stays undefined at a full window would silently pin its
    /// snapshot field to `None` for the life of the process, which is a
    /// configuration mistake, not a data condition.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.rsi_period < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "rsi",
                min: 1,
                got: self.rsi_period,
            });
        }
        if self.macd_fast < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "macd fast",
                min: 1,
                got: self.macd_fast,
            });
        }
        if self.macd_signal < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "macd signal",
                min: 1,
                got: self.macd_signal,
            });
        }
        if self.macd_fast >= self.macd_slow {
            return Err(ConfigError::MacdSpanOrder {
                fast: self.macd_fast,
                slow: self.macd_slow,
            });
        }
        if self.bollinger_period < 2 {
            return Err(ConfigError::PeriodTooSmall {
                name: "bollinger",
                min: 2,
                got: self.bollinger_period,
            });
        }
        if !(self.bollinger_multiplier.is_finite() && self.bollinger_multiplier > 0.0) {
            return Err(ConfigError::BadMultiplier(self.bollinger_multiplier));
        }
        if self.stochastic_k < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "stochastic %K",
                min: 1,
                got: self.stochastic_k,
            });
        }
        if self.stochastic_d < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "stochastic %D",
                min: 1,
                got: self.stochastic_d,
            });
        }
        if self.sma_period < 1 {
            return Err(ConfigError::PeriodTooSmall {
                name: "sma",
                min: 1,
                got: self.sma_period,
            });
        }
        for (name, required) in self.requirements() {
            if required > self.capacity {
                return Err(ConfigError::NeverReady {
                    name,
                    required,
                    capacity: self.capacity,
                });
            }
        }
        Ok(())
    }

    /// Warmup requirement per indicator. Must agree with the `min_samples`
    /// of the corresponding indicator type; a test pins the two together.
    pub fn requirements(&self) -> [(&'static str, usize); 5] {
        [
            ("rsi", self.rsi_period + 1),
            ("macd", self.macd_slow),
            ("bollinger", self.bollinger_period),
            ("stochastic", self.stochastic_k + self.stochastic_d - 1),
            ("sma", self.sma_period),
        ]
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("window capacity must be at least 1")]
    ZeroCapacity,
    #[error("{name} period must be at least {min}, got {got}")]
    PeriodTooSmall {
        name: &'static str,
        min: usize,
        got: usize,
    },
    #[error("bollinger multiplier must be positive and finite, got {0}")]
    BadMultiplier(f64),
    #[error("macd fast span {fast} must be shorter than the slow span {slow}")]
    MacdSpanOrder { fast: usize, slow: usize },
    #[error("{name} needs {required} samples but the window holds at most {capacity}, so it would never produce a value")]
    NeverReady {
        name: &'static str,
        required: usize,
        capacity: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{Bollinger, Indicator, Macd, Rsi, Sma, Stochastic};

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_rejected() {
        let config = EngineConfig {
            capacity: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn zero_rsi_period_rejected() {
        let config = EngineConfig {
            rsi_period: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodTooSmall {
                name: "rsi",
                min: 1,
                got: 0
            })
        );
    }

    #[test]
    fn bollinger_period_one_rejected() {
        // Sample stddev needs at least two points.
        let config = EngineConfig {
            bollinger_period: 1,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::PeriodTooSmall {
                name: "bollinger",
                min: 2,
                got: 1
            })
        );
    }

    #[test]
    fn macd_fast_must_be_below_slow() {
        let config = EngineConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::MacdSpanOrder { fast: 26, slow: 12 })
        );

        let config = EngineConfig {
            macd_fast: 12,
            macd_slow: 12,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MacdSpanOrder { .. })
        ));
    }

    #[test]
    fn non_positive_multiplier_rejected() {
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig {
                bollinger_multiplier: bad,
                ..EngineConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::BadMultiplier(_))),
                "expected rejection for multiplier {bad}"
            );
        }
    }

    #[test]
    fn indicator_that_cannot_fill_window_rejected() {
        // RSI 14 needs 15 samples; a 14-price window can never supply them.
        let config = EngineConfig {
            capacity: 14,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NeverReady { .. })
        ));

        // MACD slow 26 is the binding constraint for the defaults.
        let config = EngineConfig {
            capacity: 25,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NeverReady {
                name: "macd",
                required: 26,
                capacity: 25
            })
        );
    }

    #[test]
    fn capacity_exactly_at_requirement_accepted() {
        let config = EngineConfig {
            capacity: 26,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn requirements_match_indicator_min_samples() {
        let config = EngineConfig::default();
        let expected = [
            Rsi::new(config.rsi_period).min_samples(),
            Macd::new(config.macd_fast, config.macd_slow, config.macd_signal).min_samples(),
            Bollinger::new(config.bollinger_period, config.bollinger_multiplier).min_samples(),
            Stochastic::new(config.stochastic_k, config.stochastic_d).min_samples(),
            Sma::new(config.sma_period).min_samples(),
        ];
        let actual: Vec<usize> = config.requirements().iter().map(|(_, n)| *n).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = ConfigError::NeverReady {
            name: "macd",
            required: 26,
            capacity: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("macd"));
        assert!(msg.contains("26"));
        assert!(msg.contains("10"));
    }
}
