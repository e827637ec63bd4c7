//! Action — the discrete recommendation category.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading recommendation.
///
/// Serializes in lowercase ("buy", "sell", "hold"), which is the form the
/// persisted monitor records use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
            Action::Hold => "hold",
        };
        f.write_str(s)
    }
}
