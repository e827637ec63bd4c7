//! The trend record written for every decided cycle.
//!
//! Records are flat so downstream tooling (spreadsheets, jq, pandas) can
//! consume them without unnesting. Only the indicators the active policy
//! actually reads are included, and values are rounded at this boundary —
//! the engine itself always works at full precision.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trendwatch_core::{Action, CycleOutput, PolicyInputs};

/// One decided cycle, flattened for JSONL output.
///
/// Indicator fields are present only when the fusion policy consulted
/// them and the engine had a value. Prices, RSI, stochastic and SMA carry
/// two decimals; MACD and Bollinger values carry four.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRecord {
    /// Fingerprint of the session's configuration.
    pub session: String,
    /// Cycle number within the session, starting at 1.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_line: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_signal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd_histogram: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_upper: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_middle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger_lower: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_k: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_d: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sma: Option<f64>,
    pub action: Action,
}

impl TrendRecord {
    /// Builds a record from a cycle, or `None` if the cycle produced no
    /// decision — undecided cycles are never persisted.
    pub fn from_cycle(
        session: &str,
        seq: u64,
        timestamp: DateTime<Utc>,
        symbol: &str,
        output: &CycleOutput,
        inputs: PolicyInputs,
    ) -> Option<Self> {
        let action = output.decision.action()?;
        let snapshot = &output.snapshot;

        let macd = snapshot.macd.filter(|_| inputs.macd);
        let bollinger = snapshot.bollinger.filter(|_| inputs.bollinger);
        let stochastic = snapshot.stochastic.filter(|_| inputs.stochastic);

        Some(Self {
            session: session.to_string(),
            seq,
            timestamp,
            symbol: symbol.to_string(),
            price: round2(output.price),
            rsi: snapshot.rsi.filter(|_| inputs.rsi).map(round2),
            macd_line: macd.map(|m| round4(m.line)),
            macd_signal: macd.map(|m| round4(m.signal)),
            macd_histogram: macd.map(|m| round4(m.histogram)),
            bollinger_upper: bollinger.map(|b| round4(b.upper)),
            bollinger_middle: bollinger.map(|b| round4(b.middle)),
            bollinger_lower: bollinger.map(|b| round4(b.lower)),
            stoch_k: stochastic.map(|s| round2(s.percent_k)),
            stoch_d: stochastic.map(|s| round2(s.percent_d)),
            sma: snapshot.sma.filter(|_| inputs.sma).map(round2),
            action,
        })
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use trendwatch_core::{EngineConfig, FusionPolicy, TrendEngine};

    fn decided_output(policy: FusionPolicy) -> CycleOutput {
        let config = EngineConfig {
            capacity: 20,
            rsi_period: 5,
            macd_fast: 3,
            macd_slow: 6,
            macd_signal: 2,
            bollinger_period: 5,
            stochastic_k: 5,
            stochastic_d: 2,
            sma_period: 5,
            policy,
            ..EngineConfig::default()
        };
        let mut engine = TrendEngine::new(&config).unwrap();
        let mut last = None;
        // Steady decline drives RSI into oversold so every policy decides.
        for i in 0..20 {
            last = Some(engine.observe(100.0 - i as f64));
        }
        last.unwrap()
    }

    #[test]
    fn undecided_cycle_yields_no_record() {
        let config = EngineConfig::default();
        let mut engine = TrendEngine::new(&config).unwrap();
        let output = engine.observe(100.0);
        assert!(output.decision.action().is_none());
        let record = TrendRecord::from_cycle(
            "abc",
            1,
            Utc::now(),
            "BTC/USDT",
            &output,
            PolicyInputs::ALL,
        );
        assert!(record.is_none());
    }

    #[test]
    fn record_carries_only_consulted_indicators() {
        let output = decided_output(FusionPolicy::RsiThreshold);
        let inputs = FusionPolicy::RsiThreshold.inputs();
        let record =
            TrendRecord::from_cycle("abc", 7, Utc::now(), "BTC/USDT", &output, inputs).unwrap();

        assert!(record.rsi.is_some());
        assert!(record.macd_line.is_none());
        assert!(record.bollinger_upper.is_none());
        assert!(record.stoch_k.is_none());
        assert!(record.sma.is_none());
        assert_eq!(record.seq, 7);
        assert_eq!(record.symbol, "BTC/USDT");
    }

    #[test]
    fn majority_vote_record_carries_all_ready_indicators() {
        let output = decided_output(FusionPolicy::MajorityVote);
        let inputs = FusionPolicy::MajorityVote.inputs();
        let record =
            TrendRecord::from_cycle("abc", 1, Utc::now(), "BTC/USDT", &output, inputs).unwrap();

        assert!(record.rsi.is_some());
        assert!(record.macd_line.is_some());
        assert!(record.macd_signal.is_some());
        assert!(record.macd_histogram.is_some());
        assert!(record.bollinger_upper.is_some());
        assert!(record.bollinger_middle.is_some());
        assert!(record.bollinger_lower.is_some());
        assert!(record.stoch_k.is_some());
        assert!(record.stoch_d.is_some());
        assert!(record.sma.is_some());
    }

    #[test]
    fn values_are_rounded_at_the_boundary() {
        let output = decided_output(FusionPolicy::MajorityVote);
        let record = TrendRecord::from_cycle(
            "abc",
            1,
            Utc::now(),
            "BTC/USDT",
            &output,
            PolicyInputs::ALL,
        )
        .unwrap();

        let two_places = |v: f64| (v * 100.0).round() / 100.0;
        let four_places = |v: f64| (v * 10_000.0).round() / 10_000.0;
        assert_eq!(record.price, two_places(record.price));
        assert_eq!(record.rsi.unwrap(), two_places(record.rsi.unwrap()));
        assert_eq!(record.sma.unwrap(), two_places(record.sma.unwrap()));
        assert_eq!(
            record.macd_line.unwrap(),
            four_places(record.macd_line.unwrap())
        );
        assert_eq!(
            record.bollinger_upper.unwrap(),
            four_places(record.bollinger_upper.unwrap())
        );
    }

    #[test]
    fn absent_indicators_are_omitted_from_json() {
        let output = decided_output(FusionPolicy::RsiThreshold);
        let record = TrendRecord::from_cycle(
            "abc",
            1,
            Utc::now(),
            "BTC/USDT",
            &output,
            FusionPolicy::RsiThreshold.inputs(),
        )
        .unwrap();

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"rsi\""));
        assert!(!json.contains("macd"));
        assert!(!json.contains("bollinger"));
        assert!(!json.contains("stoch"));
        assert!(!json.contains("\"sma\""));
    }

    #[test]
    fn record_round_trips_through_json() {
        let output = decided_output(FusionPolicy::MajorityVote);
        let record = TrendRecord::from_cycle(
            "abc",
            3,
            Utc::now(),
            "ETH/USDT",
            &output,
            PolicyInputs::ALL,
        )
        .unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let back: TrendRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn timestamp_serializes_as_iso_8601_utc() {
        let output = decided_output(FusionPolicy::RsiThreshold);
        let when = "2026-08-26T12:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let record = TrendRecord::from_cycle(
            "abc",
            1,
            when,
            "BTC/USDT",
            &output,
            PolicyInputs::ALL,
        )
        .unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("2026-08-26T12:00:00Z"));
    }
}
