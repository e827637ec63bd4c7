//! Majority vote policy.
//!
//! Each defined indicator casts one buy/sell/hold vote; three matching buy
//! or sell votes carry the decision. With five voters at most, two
//! categories can never both reach three, so the outcome is unambiguous.
//! Anything short of a majority holds. No defined voters at all means no
//! decision.

use super::threshold;
use super::Decision;
use crate::domain::Action;
use crate::indicators::{BollingerValue, IndicatorSnapshot, MacdValue, StochasticValue};

const MAJORITY: usize = 3;
const STOCH_OVERBOUGHT: f64 = 80.0;
const STOCH_OVERSOLD: f64 = 20.0;

pub fn decide(snapshot: &IndicatorSnapshot, price: f64) -> Decision {
    let votes: Vec<Action> = [
        snapshot.rsi.map(threshold::classify),
        snapshot.macd.map(macd_vote),
        snapshot.bollinger.map(|b| bollinger_vote(price, b)),
        snapshot.stochastic.map(stochastic_vote),
        snapshot.sma.map(|s| sma_vote(price, s)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if votes.is_empty() {
        return Decision::InsufficientData;
    }

    let buys = votes.iter().filter(|v| **v == Action::Buy).count();
    let sells = votes.iter().filter(|v| **v == Action::Sell).count();

    if buys >= MAJORITY {
        Decision::Action(Action::Buy)
    } else if sells >= MAJORITY {
        Decision::Action(Action::Sell)
    } else {
        Decision::Action(Action::Hold)
    }
}

fn macd_vote(m: MacdValue) -> Action {
    if m.line > m.signal {
        Action::Buy
    } else if m.line < m.signal {
        Action::Sell
    } else {
        Action::Hold
    }
}

fn bollinger_vote(price: f64, b: BollingerValue) -> Action {
    if price > b.upper {
        Action::Sell
    } else if price < b.lower {
        Action::Buy
    } else {
        Action::Hold
    }
}

fn stochastic_vote(s: StochasticValue) -> Action {
    if s.percent_k > STOCH_OVERBOUGHT {
        Action::Sell
    } else if s.percent_k < STOCH_OVERSOLD {
        Action::Buy
    } else {
        Action::Hold
    }
}

fn sma_vote(price: f64, sma: f64) -> Action {
    if price > sma {
        Action::Buy
    } else if price < sma {
        Action::Sell
    } else {
        Action::Hold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buy_macd() -> MacdValue {
        MacdValue {
            line: 1.0,
            signal: 0.5,
            histogram: 0.5,
        }
    }

    fn sell_macd() -> MacdValue {
        MacdValue {
            line: -1.0,
            signal: 0.5,
            histogram: -1.5,
        }
    }

    fn bands() -> BollingerValue {
        BollingerValue {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        }
    }

    fn stoch(k: f64) -> StochasticValue {
        StochasticValue {
            percent_k: k,
            percent_d: k,
        }
    }

    #[test]
    fn three_buy_votes_carry() {
        // RSI oversold (buy), MACD rising (buy), price under SMA would sell,
        // but price under the lower band buys too. Stochastic holds.
        let snapshot = IndicatorSnapshot {
            rsi: Some(25.0),
            macd: Some(buy_macd()),
            bollinger: Some(bands()),
            stochastic: Some(stoch(50.0)),
            sma: Some(95.0),
        };
        // price 89: bollinger buy, sma sell, rsi buy, macd buy, stoch hold
        assert_eq!(decide(&snapshot, 89.0), Decision::Action(Action::Buy));
    }

    #[test]
    fn three_sell_votes_carry() {
        let snapshot = IndicatorSnapshot {
            rsi: Some(75.0),
            macd: Some(sell_macd()),
            bollinger: Some(bands()),
            stochastic: Some(stoch(85.0)),
            sma: Some(120.0),
        };
        // price 100: rsi sell, macd sell, stoch sell, bollinger hold, sma sell
        assert_eq!(decide(&snapshot, 100.0), Decision::Action(Action::Sell));
    }

    #[test]
    fn split_vote_holds() {
        // Two buys, two sells, one hold: no majority.
        let snapshot = IndicatorSnapshot {
            rsi: Some(25.0),
            macd: Some(buy_macd()),
            bollinger: Some(bands()),
            stochastic: Some(stoch(85.0)),
            sma: Some(120.0),
        };
        // price 100: rsi buy, macd buy, bollinger hold, stoch sell, sma sell
        assert_eq!(decide(&snapshot, 100.0), Decision::Action(Action::Hold));
    }

    #[test]
    fn two_votes_cannot_carry() {
        // Only two indicators defined: even full agreement falls short.
        let snapshot = IndicatorSnapshot {
            rsi: Some(25.0),
            macd: Some(buy_macd()),
            ..IndicatorSnapshot::default()
        };
        assert_eq!(decide(&snapshot, 100.0), Decision::Action(Action::Hold));
    }

    #[test]
    fn three_of_three_defined_carry() {
        // Three defined voters all agreeing reach the majority even though
        // two indicators are still warming up.
        let snapshot = IndicatorSnapshot {
            rsi: Some(25.0),
            macd: Some(buy_macd()),
            bollinger: Some(bands()),
            ..IndicatorSnapshot::default()
        };
        assert_eq!(decide(&snapshot, 89.0), Decision::Action(Action::Buy));
    }

    #[test]
    fn no_defined_voters_is_no_decision() {
        let snapshot = IndicatorSnapshot::default();
        assert_eq!(decide(&snapshot, 100.0), Decision::InsufficientData);
    }

    #[test]
    fn hold_votes_never_carry_anything_else() {
        // All five defined, all neutral: hold wins by default, not by count.
        let snapshot = IndicatorSnapshot {
            rsi: Some(50.0),
            macd: Some(MacdValue {
                line: 1.0,
                signal: 1.0,
                histogram: 0.0,
            }),
            bollinger: Some(bands()),
            stochastic: Some(stoch(50.0)),
            sma: Some(100.0),
        };
        assert_eq!(decide(&snapshot, 100.0), Decision::Action(Action::Hold));
    }

    #[test]
    fn stochastic_bands_are_20_and_80() {
        assert_eq!(stochastic_vote(stoch(80.01)), Action::Sell);
        assert_eq!(stochastic_vote(stoch(80.0)), Action::Hold);
        assert_eq!(stochastic_vote(stoch(19.99)), Action::Buy);
        assert_eq!(stochastic_vote(stoch(20.0)), Action::Hold);
    }
}
