//! Strategy and threshold configuration.
//!
//! Reads the `[strategy]`, `[thresholds]` and `[freshness]` sections through
//! a [`ConfigPort`]. The formula is an ordered, comma-separated list of
//! `criterion:weight` pairs.

use crate::domain::criterion::{Criterion, ThresholdRegistry};
use crate::domain::error::EngineError;
use crate::domain::freshness::StalenessThreshold;
use crate::domain::strategy::{
    validate_with, CallType, FormulaEntry, StrategyDefinition, UnknownCriterionPolicy,
};
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub definition: StrategyDefinition,
    pub thresholds: ThresholdRegistry,
    pub policy: UnknownCriterionPolicy,
}

impl StrategyConfig {
    pub fn load(config: &dyn ConfigPort) -> Result<Self, EngineError> {
        Ok(StrategyConfig {
            definition: load_definition(config)?,
            thresholds: load_thresholds(config)?,
            policy: load_policy(config)?,
        })
    }
}

/// Loads the strategy and checks it against the configured policy.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<StrategyConfig, EngineError> {
    let loaded = StrategyConfig::load(config)?;
    validate_with(&loaded.definition, loaded.policy)?;
    Ok(loaded)
}

pub fn load_definition(config: &dyn ConfigPort) -> Result<StrategyDefinition, EngineError> {
    let call_type = required(config, "strategy", "call_type")?
        .parse::<CallType>()
        .map_err(|reason| EngineError::config_invalid("strategy", "call_type", reason))?;
    let formula = parse_formula(&required(config, "strategy", "formula")?)?;
    Ok(StrategyDefinition { call_type, formula })
}

pub fn parse_formula(raw: &str) -> Result<Vec<FormulaEntry>, EngineError> {
    raw.split(',')
        .map(|token| {
            let (name, weight) = token.split_once(':').ok_or_else(|| {
                EngineError::config_invalid(
                    "strategy",
                    "formula",
                    format!("expected criterion:weight, got '{}'", token.trim()),
                )
            })?;
            let weight = weight.trim().parse::<f64>().map_err(|_| {
                EngineError::config_invalid(
                    "strategy",
                    "formula",
                    format!("invalid weight '{}' for '{}'", weight.trim(), name.trim()),
                )
            })?;
            Ok(FormulaEntry::new(name.trim(), weight))
        })
        .collect()
}

pub fn load_thresholds(config: &dyn ConfigPort) -> Result<ThresholdRegistry, EngineError> {
    let mut thresholds = ThresholdRegistry::default();
    for criterion in Criterion::KNOWN {
        match config.get_double_opt("thresholds", criterion.name()) {
            None => {}
            Some(Ok(value)) if value.is_finite() => {
                thresholds = thresholds.with_threshold(&criterion, value);
            }
            Some(_) => {
                return Err(EngineError::config_invalid(
                    "thresholds",
                    criterion.name(),
                    "threshold must be a finite number",
                ));
            }
        }
    }
    Ok(thresholds)
}

pub fn load_policy(config: &dyn ConfigPort) -> Result<UnknownCriterionPolicy, EngineError> {
    match config.get_string("strategy", "unknown_criteria") {
        None => Ok(UnknownCriterionPolicy::default()),
        Some(raw) => raw
            .parse::<UnknownCriterionPolicy>()
            .map_err(|reason| EngineError::config_invalid("strategy", "unknown_criteria", reason)),
    }
}

pub fn load_staleness(
    config: &dyn ConfigPort,
    default: StalenessThreshold,
) -> Result<StalenessThreshold, EngineError> {
    match config.get_string("freshness", "stale_after_days") {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u32>().map(StalenessThreshold).map_err(|_| {
            EngineError::config_invalid(
                "freshness",
                "stale_after_days",
                "stale_after_days must be a non-negative whole number of days",
            )
        }),
    }
}

fn required(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, EngineError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(EngineError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }),
    }
}
