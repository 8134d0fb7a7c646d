//! Threshold comparison shared by trend classification and strategy scoring.

/// Which side of a threshold counts as favourable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Above,
    Below,
}

/// Strict comparison: a value equal to the threshold is never favourable.
pub fn is_favorable(value: f64, threshold: f64, direction: Direction) -> bool {
    match direction {
        Direction::Above => value > threshold,
        Direction::Below => value < threshold,
    }
}
