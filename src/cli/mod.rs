//! CLI module for MarketScout
//!
//! Command-line argument parsing and log setup.

pub mod args;

pub use args::{Args, Commands, Verbosity};
