//! Conjunctive confluence policy.
//!
//! The primary clauses demand agreement from every defined indicator in the
//! working set (RSI, Bollinger, MACD):
//! - Sell: RSI > 70, price above the upper band, MACD line below its signal.
//! - Buy:  RSI < 30, price below the lower band, MACD line above its signal.
//!
//! An undefined indicator abstains: its conditions drop out of the clause
//! instead of failing it. A clause still needs at least one surviving
//! condition to fire. When neither clause fires, a histogram/RSI secondary
//! rule breaks the tie; it needs both of its operands defined and is skipped
//! otherwise. Only a fully undefined working set yields `InsufficientData`.

use super::threshold::{OVERBOUGHT, OVERSOLD};
use super::Decision;
use crate::domain::Action;
use crate::indicators::IndicatorSnapshot;

pub fn decide(snapshot: &IndicatorSnapshot, price: f64) -> Decision {
    let rsi = snapshot.rsi;
    let macd = snapshot.macd;
    let bollinger = snapshot.bollinger;

    if rsi.is_none() && macd.is_none() && bollinger.is_none() {
        return Decision::InsufficientData;
    }

    let sell_conditions = [
        rsi.map(|r| r > OVERBOUGHT),
        bollinger.map(|b| price > b.upper),
        macd.map(|m| m.line < m.signal),
    ];
    if clause_holds(&sell_conditions) {
        return Decision::Action(Action::Sell);
    }

    let buy_conditions = [
        rsi.map(|r| r < OVERSOLD),
        bollinger.map(|b| price < b.lower),
        macd.map(|m| m.line > m.signal),
    ];
    if clause_holds(&buy_conditions) {
        return Decision::Action(Action::Buy);
    }

    if let (Some(m), Some(r)) = (macd, rsi) {
        if m.histogram > 0.0 && r < 50.0 {
            return Decision::Action(Action::Buy);
        }
        if m.histogram < 0.0 && r > 50.0 {
            return Decision::Action(Action::Sell);
        }
    }

    Decision::Action(Action::Hold)
}

/// True when at least one condition is defined and no defined condition fails.
fn clause_holds(conditions: &[Option<bool>]) -> bool {
    let mut any_defined = false;
    for c in conditions {
        match c {
            Some(true) => any_defined = true,
            Some(false) => return false,
            None => {}
        }
    }
    any_defined
}
