//! Port traits for configuration and upstream records.

pub mod config_port;
pub mod record_port;
