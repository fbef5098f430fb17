//! Schema module - Configuration types for network and search runs.

mod config;

pub use config::*;
