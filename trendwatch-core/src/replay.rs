//! RSI reversion replay over a historical series.
//!
//! Replays the entry/exit rule implied by the threshold policy: open a long
//! when RSI drops below 30 with no position held, close it when RSI rises
//! above 70. One position at a time, full closes only. This is a quick
//! sanity lens on a series, not a backtest: no fees, no sizing, no slippage.

use serde::{Deserialize, Serialize};

use crate::fusion::threshold::{OVERBOUGHT, OVERSOLD};
use crate::indicators::Rsi;

/// Aggregate outcome of one replay pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayResult {
    /// Sum of (exit - entry) across closed trades, in price units.
    pub total_return: f64,
    /// Closed trades only; a position still open at the end is not counted.
    pub trade_count: usize,
    /// Fraction of closed trades with positive return. `None` when nothing
    /// closed, so "no trades" never masquerades as "0% wins".
    pub win_rate: Option<f64>,
}

/// Fold a whole price series, oldest first, through the RSI reversion rule.
///
/// The RSI at each step reads the prefix up to and including that price, so
/// the replay sees exactly what a live engine fed the same series would have
/// seen, in the same order.
pub fn replay_rsi_strategy(prices: &[f64], rsi_period: usize) -> ReplayResult {
    let rsi = Rsi::new(rsi_period);
    let mut entry: Option<f64> = None;
    let mut trades = 0usize;
    let mut wins = 0usize;
    let mut total_return = 0.0;

    for end in 0..prices.len() {
        let value = match rsi.compute(&prices[..=end]) {
            Some(v) => v,
            None => continue,
        };
        let price = prices[end];
        match entry {
            None => {
                if value < OVERSOLD {
                    entry = Some(price);
                }
            }
            Some(entry_price) => {
                if value > OVERBOUGHT {
                    let delta = price - entry_price;
                    total_return += delta;
                    trades += 1;
                    if delta > 0.0 {
                        wins += 1;
                    }
                    entry = None;
                }
            }
        }
    }

    let win_rate = if trades > 0 {
        Some(wins as f64 / trades as f64)
    } else {
        None
    };
    ReplayResult {
        total_return,
        trade_count: trades,
        win_rate,
    }
}
