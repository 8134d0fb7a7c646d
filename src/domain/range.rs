//! 52-week range positioning.
//!
//! position = clamp((current - low) / (high - low) * 100, 0, 100)
//! Missing inputs or a degenerate band (high == low): 0.

use crate::domain::snapshot::PriceSnapshot;

/// Position of `current` within `[low, high]` on a 0-100 scale.
///
/// Returns 0 when any input is absent or the band is degenerate. Use
/// [`try_position`] when "no data" must be told apart from "at the low".
pub fn position(current: Option<f64>, low: Option<f64>, high: Option<f64>) -> f64 {
    try_position(current, low, high).unwrap_or(0.0)
}

pub fn try_position(current: Option<f64>, low: Option<f64>, high: Option<f64>) -> Option<f64> {
    let (current, low, high) = (current?, low?, high?);
    let span = high - low;
    if span == 0.0 {
        return None;
    }
    let raw = (current - low) / span * 100.0;
    if raw.is_nan() {
        return None;
    }
    Some(raw.clamp(0.0, 100.0))
}

pub fn position_of(snapshot: &PriceSnapshot) -> f64 {
    position(snapshot.last_close, snapshot.low_52w, snapshot.high_52w)
}
