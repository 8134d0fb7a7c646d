//! Crate-level error type for the I/O edges around the engine.
//!
//! The calculators themselves never fail; missing data is a sentinel value
//! and invalid strategies are a [`StrategyValidationError`].

use crate::domain::portfolio::HoldingError;
use crate::domain::strategy::StrategyValidationError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid strategy: {0}")]
    Strategy(#[from] StrategyValidationError),

    #[error("invalid holding: {0}")]
    Holding(#[from] HoldingError),

    #[error("record error: {reason}")]
    Records { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EngineError {
    pub fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        EngineError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&EngineError> for std::process::ExitCode {
    fn from(err: &EngineError) -> Self {
        let code: u8 = match err {
            EngineError::Io(_) => 1,
            EngineError::ConfigParse { .. }
            | EngineError::ConfigMissing { .. }
            | EngineError::ConfigInvalid { .. } => 2,
            EngineError::Records { .. } => 3,
            EngineError::Strategy(_) | EngineError::Holding(_) => 4,
        };
        std::process::ExitCode::from(code)
    }
}
