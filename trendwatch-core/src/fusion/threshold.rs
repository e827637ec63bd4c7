//! RSI threshold policy.
//!
//! Sell above 70, buy below 30, hold in between. Values exactly at a
//! threshold hold. RSI is the policy's only input, so an unready RSI means
//! no decision at all.

use super::Decision;
use crate::domain::Action;
use crate::indicators::IndicatorSnapshot;

pub const OVERBOUGHT: f64 = 70.0;
pub const OVERSOLD: f64 = 30.0;

pub fn decide(snapshot: &IndicatorSnapshot) -> Decision {
    match snapshot.rsi {
        Some(rsi) => Decision::Action(classify(rsi)),
        None => Decision::InsufficientData,
    }
}

/// Map an RSI reading onto the overbought/oversold bands. Shared with the
/// majority-vote policy, whose RSI voter uses the same bands.
pub(crate) fn classify(rsi: f64) -> Action {
    if rsi > OVERBOUGHT {
        Action::Sell
    } else if rsi < OVERSOLD {
        Action::Buy
    } else {
        Action::Hold
    }
}
