//! Side-effecting helpers: configuration loading and process execution.

pub mod config;
pub mod process;
