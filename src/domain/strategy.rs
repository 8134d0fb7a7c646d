//! Weighted multi-criterion strategy validation and scoring.
//!
//! A strategy is a call type (BUY or SELL) plus an ordered formula of
//! `(criterion, weight)` entries. Each criterion's metric is compared against
//! its registry threshold; for BUY a value below the threshold is favourable,
//! for SELL a value above it. A favourable criterion contributes its full
//! weight, an unfavourable one nothing. The composite score is the sum.

use crate::domain::compare::{is_favorable, Direction};
use crate::domain::criterion::{Criterion, ThresholdRegistry};
use crate::domain::range;
use crate::domain::snapshot::{InstrumentSnapshot, PriceSnapshot};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;
/// Absorbs binary rounding when a sum sits exactly on the tolerance.
const WEIGHT_SUM_SLACK: f64 = 1e-9;

/// Share of its weight an unknown criterion earns under the neutral policy.
const NEUTRAL_CREDIT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallType {
    Buy,
    Sell,
}

impl CallType {
    pub fn favorable_direction(self) -> Direction {
        match self {
            CallType::Buy => Direction::Below,
            CallType::Sell => Direction::Above,
        }
    }
}

impl FromStr for CallType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" => Ok(CallType::Buy),
            "SELL" => Ok(CallType::Sell),
            other => Err(format!("call type must be BUY or SELL, got '{}'", other)),
        }
    }
}

impl fmt::Display for CallType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallType::Buy => f.write_str("BUY"),
            CallType::Sell => f.write_str("SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormulaEntry {
    pub criterion_name: String,
    pub weight: f64,
}

impl FormulaEntry {
    pub fn new(criterion_name: impl Into<String>, weight: f64) -> Self {
        FormulaEntry {
            criterion_name: criterion_name.into(),
            weight,
        }
    }

    pub fn criterion(&self) -> Criterion {
        Criterion::parse(&self.criterion_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyDefinition {
    pub call_type: CallType,
    pub formula: Vec<FormulaEntry>,
}

impl StrategyDefinition {
    pub fn weight_sum(&self) -> f64 {
        self.formula.iter().map(|e| e.weight).sum()
    }
}

/// How criteria outside the registry are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownCriterionPolicy {
    /// Earn the same success ratio as the scored known criteria.
    #[default]
    ProRata,
    /// Earn half of their weight.
    Neutral,
    /// Fail validation; contribute nothing when evaluated anyway.
    Reject,
}

impl FromStr for UnknownCriterionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pro_rata" | "prorata" => Ok(UnknownCriterionPolicy::ProRata),
            "neutral" => Ok(UnknownCriterionPolicy::Neutral),
            "reject" | "strict" => Ok(UnknownCriterionPolicy::Reject),
            other => Err(format!(
                "unknown criteria policy must be pro_rata, neutral or reject, got '{}'",
                other
            )),
        }
    }
}

/// A rejected strategy definition, identifying the offending formula field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StrategyValidationError {
    #[error("criterion {index} has an empty name")]
    EmptyCriterionName { index: usize },

    #[error("weight for '{criterion}' must be between 0 and 1, got {weight}")]
    WeightOutOfRange {
        index: usize,
        criterion: String,
        weight: f64,
    },

    #[error("weights must sum to 1.0 (tolerance 0.01), got {sum:.4}")]
    WeightSumMismatch { sum: f64 },

    #[error("unknown criterion '{name}'")]
    UnknownCriterion { index: usize, name: String },
}

impl StrategyValidationError {
    /// Form field path the error belongs to, e.g. `formula[1].weight`.
    pub fn field(&self) -> String {
        match self {
            StrategyValidationError::EmptyCriterionName { index }
            | StrategyValidationError::UnknownCriterion { index, .. } => {
                format!("formula[{}].criterion_name", index)
            }
            StrategyValidationError::WeightOutOfRange { index, .. } => {
                format!("formula[{}].weight", index)
            }
            StrategyValidationError::WeightSumMismatch { .. } => "formula".to_string(),
        }
    }
}

pub fn validate(definition: &StrategyDefinition) -> Result<(), StrategyValidationError> {
    validate_with(definition, UnknownCriterionPolicy::default())
}

pub fn validate_with(
    definition: &StrategyDefinition,
    policy: UnknownCriterionPolicy,
) -> Result<(), StrategyValidationError> {
    for (index, entry) in definition.formula.iter().enumerate() {
        let name = entry.criterion_name.trim();
        if name.is_empty() {
            return Err(StrategyValidationError::EmptyCriterionName { index });
        }
        if !(0.0..=1.0).contains(&entry.weight) {
            return Err(StrategyValidationError::WeightOutOfRange {
                index,
                criterion: name.to_string(),
                weight: entry.weight,
            });
        }
        if policy == UnknownCriterionPolicy::Reject && !entry.criterion().is_known() {
            return Err(StrategyValidationError::UnknownCriterion {
                index,
                name: name.to_string(),
            });
        }
    }

    let sum = definition.weight_sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + WEIGHT_SUM_SLACK {
        return Err(StrategyValidationError::WeightSumMismatch { sum });
    }
    Ok(())
}

/// Metric values keyed by criterion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metrics {
    values: HashMap<Criterion, f64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `52w_range` from the snapshot's band position when computable.
    pub fn from_snapshot(snapshot: &PriceSnapshot) -> Self {
        let mut metrics = Metrics::new();
        if let Some(pos) = range::try_position(snapshot.last_close, snapshot.low_52w, snapshot.high_52w)
        {
            metrics.insert(Criterion::FiftyTwoWeekRange, pos);
        }
        metrics
    }

    pub fn from_instrument(instrument: &InstrumentSnapshot) -> Self {
        let mut metrics = Metrics::from_snapshot(&instrument.prices);
        if let Some(pe) = instrument.pe_ratio {
            metrics.insert(Criterion::PeRatio, pe);
        }
        if let Some(pegy) = instrument.pegy_index {
            metrics.insert(Criterion::PegyIndex, pegy);
        }
        metrics
    }

    pub fn with(mut self, criterion: Criterion, value: f64) -> Self {
        self.insert(criterion, value);
        self
    }

    pub fn insert(&mut self, criterion: Criterion, value: f64) {
        self.values.insert(criterion, value);
    }

    pub fn get(&self, criterion: &Criterion) -> Option<f64> {
        self.values.get(criterion).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionStatus {
    Favorable,
    Unfavorable,
    /// Known criterion with no usable metric in the input.
    MissingMetric,
    /// Criterion outside the registry, scored by policy.
    Unscored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CriterionOutcome {
    pub criterion: Criterion,
    pub weight: f64,
    pub metric: Option<f64>,
    pub threshold: Option<f64>,
    pub status: CriterionStatus,
    pub contribution: f64,
}

impl CriterionOutcome {
    pub fn passed(&self) -> bool {
        self.status == CriterionStatus::Favorable
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Weighted sum of contributions in [0, 1].
    pub composite: f64,
    pub outcomes: Vec<CriterionOutcome>,
}

impl Score {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }
}

pub fn evaluate(
    definition: &StrategyDefinition,
    metrics: &Metrics,
    thresholds: &ThresholdRegistry,
    policy: UnknownCriterionPolicy,
) -> Score {
    let direction = definition.call_type.favorable_direction();
    let mut known_weight = 0.0;
    let mut known_score = 0.0;

    let mut outcomes: Vec<CriterionOutcome> = definition
        .formula
        .iter()
        .map(|entry| {
            let criterion = entry.criterion();
            let threshold = thresholds.threshold(&criterion);
            let metric = metrics.get(&criterion).filter(|v| v.is_finite());

            let (status, contribution) = match (threshold, metric) {
                (None, _) => (CriterionStatus::Unscored, 0.0),
                (Some(_), None) => (CriterionStatus::MissingMetric, 0.0),
                (Some(t), Some(v)) => {
                    known_weight += entry.weight;
                    if is_favorable(v, t, direction) {
                        known_score += entry.weight;
                        (CriterionStatus::Favorable, entry.weight)
                    } else {
                        (CriterionStatus::Unfavorable, 0.0)
                    }
                }
            };

            CriterionOutcome {
                criterion,
                weight: entry.weight,
                metric,
                threshold,
                status,
                contribution,
            }
        })
        .collect();

    let unknown_ratio = match policy {
        UnknownCriterionPolicy::ProRata if known_weight > 0.0 => known_score / known_weight,
        UnknownCriterionPolicy::ProRata => 0.0,
        UnknownCriterionPolicy::Neutral => NEUTRAL_CREDIT,
        UnknownCriterionPolicy::Reject => 0.0,
    };

    for outcome in outcomes
        .iter_mut()
        .filter(|o| o.status == CriterionStatus::Unscored)
    {
        outcome.contribution = outcome.weight * unknown_ratio;
        debug!(
            criterion = %outcome.criterion,
            ?policy,
            contribution = outcome.contribution,
            "scored unknown criterion by policy"
        );
    }

    let composite = outcomes
        .iter()
        .map(|o| o.contribution)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    Score {
        composite,
        outcomes,
    }
}
