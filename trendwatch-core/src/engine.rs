//! Decision cycle engine.
//!
//! `observe` runs one full cycle: admit the price into the window, recompute
//! the indicator snapshot over the window contents, fold the snapshot through
//! the fusion policy. The engine moves from `Collecting` to `Ready` the
//! moment the window first fills and never moves back; a validated config
//! guarantees every indicator is defined at a full window, so a `Ready`
//! engine always produces an `Action`, never `InsufficientData`.
//!
//! Decisions can also appear during `Collecting`, as soon as the policy's own
//! working set has warmed up. Phase describes the window, not the policy.

use serde::Serialize;

use crate::config::{ConfigError, EngineConfig};
use crate::domain::PriceWindow;
use crate::fusion::{Decision, FusionPolicy};
use crate::indicators::{IndicatorBank, IndicatorSnapshot};

/// Everything one decision cycle produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleOutput {
    pub price: f64,
    pub snapshot: IndicatorSnapshot,
    pub decision: Decision,
}

/// Warmup progress of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// The window has not yet been full.
    Collecting { seen: usize, capacity: usize },
    /// The window filled at least once; every indicator is defined.
    Ready,
}

#[derive(Debug, Clone)]
pub struct TrendEngine {
    window: PriceWindow,
    bank: IndicatorBank,
    policy: FusionPolicy,
}

impl TrendEngine {
    /// Validate the config and build the engine. No price is accepted before
    /// validation passes.
    pub fn new(config: &EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: PriceWindow::new(config.capacity),
            bank: IndicatorBank::new(config),
            policy: config.policy,
        })
    }

    /// Run one decision cycle for the next observed price.
    pub fn observe(&mut self, price: f64) -> CycleOutput {
        self.window.push(price);
        let prices = self.window.snapshot();
        let snapshot = self.bank.compute(&prices);
        let decision = self.policy.decide(&snapshot, price);
        CycleOutput {
            price,
            snapshot,
            decision,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        if self.window.is_full() {
            EnginePhase::Ready
        } else {
            EnginePhase::Collecting {
                seen: self.window.len(),
                capacity: self.window.capacity(),
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase(), EnginePhase::Ready)
    }

    /// Prices still to observe before the window first fills.
    pub fn warmup_remaining(&self) -> usize {
        self.window.capacity() - self.window.len()
    }

    pub fn window(&self) -> &PriceWindow {
        &self.window
    }

    pub fn policy(&self) -> FusionPolicy {
        self.policy
    }
}
