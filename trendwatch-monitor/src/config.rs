//! Monitor configuration — TOML sections over the engine config.
//!
//! Every section and field is optional; absent values fall back to the
//! textbook defaults, so an empty file (or no file at all) configures a
//! working monitor. Validation is fail-fast: a bad file is rejected at
//! load time, before any source is opened.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use trendwatch_core::{ConfigError as EngineConfigError, EngineConfig, FusionPolicy};

/// Errors raised while loading or validating a monitor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("monitor.symbol must not be empty")]
    EmptySymbol,
    #[error("monitor.{name} must be at least 1 second")]
    ZeroInterval { name: &'static str },
    #[error(transparent)]
    Engine(#[from] EngineConfigError),
}

/// Complete monitor configuration, one TOML section per concern.
///
/// This struct captures everything needed to reproduce a session: the
/// symbol and pacing, the window capacity, every indicator's parameters
/// and the fusion policy. Its [`fingerprint`](Self::fingerprint) is the
/// session identity stamped on every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub monitor: MonitorSection,
    pub window: WindowSection,
    pub rsi: RsiSection,
    pub macd: MacdSection,
    pub bollinger: BollingerSection,
    pub stochastic: StochasticSection,
    pub sma: SmaSection,
    pub fusion: FusionSection,
}

/// `[monitor]` — what to watch and how fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorSection {
    pub symbol: String,
    /// Seconds between polls when the CLI paces the loop.
    pub poll_interval_secs: u64,
    /// Seconds to back off after a failed fetch.
    pub error_backoff_secs: u64,
}

impl Default for MonitorSection {
    fn default() -> Self {
        Self {
            symbol: "BTC/USDT".into(),
            poll_interval_secs: 10,
            error_backoff_secs: 15,
        }
    }
}

/// `[window]` — price window capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSection {
    pub capacity: usize,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self { capacity: 50 }
    }
}

/// `[rsi]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiSection {
    pub period: usize,
}

impl Default for RsiSection {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// `[macd]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdSection {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdSection {
    fn default() -> Self {
        Self {
            fast: 12,
            slow: 26,
            signal: 9,
        }
    }
}

/// `[bollinger]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerSection {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for BollingerSection {
    fn default() -> Self {
        Self {
            period: 20,
            multiplier: 2.0,
        }
    }
}

/// `[stochastic]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StochasticSection {
    pub k_period: usize,
    pub d_period: usize,
}

impl Default for StochasticSection {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

/// `[sma]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmaSection {
    pub period: usize,
}

impl Default for SmaSection {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// `[fusion]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionSection {
    pub policy: FusionPolicy,
}

impl Default for FusionSection {
    fn default() -> Self {
        Self {
            policy: FusionPolicy::MajorityVote,
        }
    }
}

impl MonitorConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// The engine parameters this configuration describes.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            capacity: self.window.capacity,
            rsi_period: self.rsi.period,
            macd_fast: self.macd.fast,
            macd_slow: self.macd.slow,
            macd_signal: self.macd.signal,
            bollinger_period: self.bollinger.period,
            bollinger_multiplier: self.bollinger.multiplier,
            stochastic_k: self.stochastic.k_period,
            stochastic_d: self.stochastic.d_period,
            sma_period: self.sma.period,
            policy: self.fusion.policy,
        }
    }

    /// Reject bad values before any source or sink is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.monitor.poll_interval_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "poll_interval_secs",
            });
        }
        if self.monitor.error_backoff_secs == 0 {
            return Err(ConfigError::ZeroInterval {
                name: "error_backoff_secs",
            });
        }
        self.engine_config().validate()?;
        Ok(())
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two sessions with identical configs share a fingerprint, so records
    /// from reruns of the same setup group together downstream.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("MonitorConfig serialization failed");
        let hash = blake3::hash(json.as_bytes());
        format!("{}", hash.to_hex())
    }
}
