//! Moving-average trend classification.
//!
//! With a = price > MA20, b = price > MA200, c = MA20 > MA200:
//! - a && b && c   → Strong Bullish (golden-cross regime)
//! - a && b && !c  → Bullish
//! - !a && !b && !c → Strong Bearish (death-cross regime)
//! - !a && !b && c → Bearish
//! - anything else → Neutral
//!
//! Any input that is absent, zero or non-finite yields `NoData`.

use crate::domain::compare::{is_favorable, Direction};
use crate::domain::snapshot::PriceSnapshot;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    StrongBullish,
    Bullish,
    Neutral,
    Bearish,
    StrongBearish,
    NoData,
}

/// Colour family a renderer should use for a signal chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
    Muted,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::StrongBullish => "Strong Bullish",
            Signal::Bullish => "Bullish",
            Signal::Neutral => "Neutral",
            Signal::Bearish => "Bearish",
            Signal::StrongBearish => "Strong Bearish",
            Signal::NoData => "No Data",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Signal::StrongBullish | Signal::Bullish => Tone::Positive,
            Signal::StrongBearish | Signal::Bearish => Tone::Negative,
            Signal::Neutral => Tone::Neutral,
            Signal::NoData => Tone::Muted,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v != 0.0)
}

pub fn classify(price: Option<f64>, ma20: Option<f64>, ma200: Option<f64>) -> Signal {
    let (Some(price), Some(ma20), Some(ma200)) = (usable(price), usable(ma20), usable(ma200))
    else {
        return Signal::NoData;
    };

    signal_for(
        is_favorable(price, ma20, Direction::Above),
        is_favorable(price, ma200, Direction::Above),
        is_favorable(ma20, ma200, Direction::Above),
    )
}

/// Decision table over the three comparisons. Total over all 8 inputs.
pub fn signal_for(above_short: bool, above_long: bool, short_over_long: bool) -> Signal {
    match (above_short, above_long, short_over_long) {
        (true, true, true) => Signal::StrongBullish,
        (true, true, false) => Signal::Bullish,
        (false, false, false) => Signal::StrongBearish,
        (false, false, true) => Signal::Bearish,
        _ => Signal::Neutral,
    }
}

pub fn classify_snapshot(snapshot: &PriceSnapshot) -> Signal {
    classify(snapshot.last_close, snapshot.ma20, snapshot.ma200)
}
