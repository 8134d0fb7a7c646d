//! folioscope: technical signal and valuation calculators for portfolio views.
//!
//! Hexagonal architecture: pure calculators in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
