//! Derived-metric calculators applied to price and holding data.
//!
//! Every calculator is a pure function over values it is handed.

pub mod snapshot;
pub mod currency;
pub mod compare;
pub mod range;
pub mod trend;
pub mod criterion;
pub mod strategy;
pub mod strategy_config;
pub mod portfolio;
pub mod format;
pub mod freshness;
pub mod error;
