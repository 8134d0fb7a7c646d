//! Price snapshot for a single instrument.

/// Latest close, trailing 52-week band and moving averages.
///
/// Every field is optional: newly listed or inactive instruments routinely
/// arrive with gaps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceSnapshot {
    pub last_close: Option<f64>,
    pub low_52w: Option<f64>,
    pub high_52w: Option<f64>,
    pub ma20: Option<f64>,
    pub ma200: Option<f64>,
}

/// Snapshot plus the fundamentals strategy criteria are scored on.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSnapshot {
    pub symbol: String,
    pub prices: PriceSnapshot,
    pub pe_ratio: Option<f64>,
    pub pegy_index: Option<f64>,
}
