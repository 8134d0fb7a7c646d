//! Strategy criterion registry and default thresholds.
//!
//! Criterion names arrive as free-form strings from user-edited strategy
//! formulas. They are mapped onto a closed set of known metrics, with
//! `Unknown` carrying anything unrecognised so that it can be scored under an
//! explicit policy instead of being silently dropped.

use std::fmt;

pub const DEFAULT_PE_RATIO: f64 = 35.0;
pub const DEFAULT_PEGY_INDEX: f64 = 1.5;
/// Percent position within the 52-week band.
pub const DEFAULT_RANGE_52W: f64 = 28.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Criterion {
    PeRatio,
    PegyIndex,
    FiftyTwoWeekRange,
    Unknown(String),
}

impl Criterion {
    pub const KNOWN: [Criterion; 3] = [
        Criterion::PeRatio,
        Criterion::PegyIndex,
        Criterion::FiftyTwoWeekRange,
    ];

    pub fn parse(name: &str) -> Criterion {
        match name.trim() {
            "pe_ratio" => Criterion::PeRatio,
            "pegy_index" => Criterion::PegyIndex,
            "52w_range" => Criterion::FiftyTwoWeekRange,
            other => Criterion::Unknown(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Criterion::PeRatio => "pe_ratio",
            Criterion::PegyIndex => "pegy_index",
            Criterion::FiftyTwoWeekRange => "52w_range",
            Criterion::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Criterion::Unknown(_))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Thresholds each known criterion is compared against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRegistry {
    pub pe_ratio: f64,
    pub pegy_index: f64,
    pub range_52w: f64,
}

impl Default for ThresholdRegistry {
    fn default() -> Self {
        ThresholdRegistry {
            pe_ratio: DEFAULT_PE_RATIO,
            pegy_index: DEFAULT_PEGY_INDEX,
            range_52w: DEFAULT_RANGE_52W,
        }
    }
}

impl ThresholdRegistry {
    /// `None` for unknown criteria.
    pub fn threshold(&self, criterion: &Criterion) -> Option<f64> {
        match criterion {
            Criterion::PeRatio => Some(self.pe_ratio),
            Criterion::PegyIndex => Some(self.pegy_index),
            Criterion::FiftyTwoWeekRange => Some(self.range_52w),
            Criterion::Unknown(_) => None,
        }
    }

    /// Overrides the threshold for a known criterion. Unknown criteria are ignored.
    pub fn with_threshold(mut self, criterion: &Criterion, value: f64) -> Self {
        match criterion {
            Criterion::PeRatio => self.pe_ratio = value,
            Criterion::PegyIndex => self.pegy_index = value,
            Criterion::FiftyTwoWeekRange => self.range_52w = value,
            Criterion::Unknown(_) => {}
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_registry_names() {
        assert_eq!(Criterion::parse("pe_ratio"), Criterion::PeRatio);
        assert_eq!(Criterion::parse("pegy_index"), Criterion::PegyIndex);
        assert_eq!(Criterion::parse(" 52w_range "), Criterion::FiftyTwoWeekRange);
    }

    #[test]
    fn unrecognised_name_is_unknown() {
        let c = Criterion::parse("dividend_yield");
        assert_eq!(c, Criterion::Unknown("dividend_yield".into()));
        assert!(!c.is_known());
        assert_eq!(c.name(), "dividend_yield");
    }

    #[test]
    fn names_round_trip() {
        for c in Criterion::KNOWN {
            assert_eq!(Criterion::parse(c.name()), c);
        }
    }

    #[test]
    fn default_thresholds() {
        let r = ThresholdRegistry::default();
        assert_eq!(r.threshold(&Criterion::PeRatio), Some(35.0));
        assert_eq!(r.threshold(&Criterion::PegyIndex), Some(1.5));
        assert_eq!(r.threshold(&Criterion::FiftyTwoWeekRange), Some(28.0));
        assert_eq!(r.threshold(&Criterion::Unknown("x".into())), None);
    }

    #[test]
    fn override_threshold() {
        let r = ThresholdRegistry::default().with_threshold(&Criterion::PeRatio, 20.0);
        assert_eq!(r.threshold(&Criterion::PeRatio), Some(20.0));
        assert_eq!(r.threshold(&Criterion::PegyIndex), Some(1.5));
    }
}
