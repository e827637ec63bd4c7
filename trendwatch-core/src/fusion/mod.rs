//! Signal fusion: fold an indicator snapshot into a single recommendation.
//!
//! Three policies with different appetites for evidence, all reading only the
//! snapshot and the newest price. A policy whose entire working set is
//! undefined answers `InsufficientData` rather than `Hold`: "no opinion yet"
//! and "stand aside" are different recommendations and downstream consumers
//! treat them differently.

pub mod confluence;
pub mod threshold;
pub mod vote;

use serde::{Deserialize, Serialize};

use crate::domain::Action;
use crate::indicators::IndicatorSnapshot;

/// Outcome of one fusion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The policy had enough defined inputs to take a stance.
    Action(Action),
    /// Every indicator the policy reads is still warming up.
    InsufficientData,
}

impl Decision {
    pub fn action(&self) -> Option<Action> {
        match self {
            Decision::Action(a) => Some(*a),
            Decision::InsufficientData => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Decision::Action(_))
    }
}

/// Which fusion policy folds the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FusionPolicy {
    /// RSI alone: overbought sells, oversold buys.
    RsiThreshold,
    /// RSI, Bollinger and MACD must agree; undefined indicators abstain.
    Confluence,
    /// One vote per defined indicator; three matching votes carry.
    MajorityVote,
}

impl FusionPolicy {
    /// Fold `snapshot` plus the newest price into a decision.
    pub fn decide(&self, snapshot: &IndicatorSnapshot, price: f64) -> Decision {
        match self {
            FusionPolicy::RsiThreshold => threshold::decide(snapshot),
            FusionPolicy::Confluence => confluence::decide(snapshot, price),
            FusionPolicy::MajorityVote => vote::decide(snapshot, price),
        }
    }

    /// The indicators this policy actually reads. The monitor uses this to
    /// persist only fields the decision could have depended on.
    pub fn inputs(&self) -> PolicyInputs {
        match self {
            FusionPolicy::RsiThreshold => PolicyInputs {
                rsi: true,
                ..PolicyInputs::NONE
            },
            FusionPolicy::Confluence => PolicyInputs {
                rsi: true,
                macd: true,
                bollinger: true,
                ..PolicyInputs::NONE
            },
            FusionPolicy::MajorityVote => PolicyInputs::ALL,
        }
    }
}

/// Indicator working set of a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyInputs {
    pub rsi: bool,
    pub macd: bool,
    pub bollinger: bool,
    pub stochastic: bool,
    pub sma: bool,
}

impl PolicyInputs {
    pub const NONE: Self = Self {
        rsi: false,
        macd: false,
        bollinger: false,
        stochastic: false,
        sma: false,
    };

    pub const ALL: Self = Self {
        rsi: true,
        macd: true,
        bollinger: true,
        stochastic: true,
        sma: true,
    };
}
