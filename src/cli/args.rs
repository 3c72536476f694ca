//! Command-line argument parsing for MarketScout
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// MarketScout - turn an industry name into a short market report
#[derive(Parser, Debug)]
#[command(name = "marketscout")]
#[command(version)]
#[command(about = "Turn an industry name into a short, Wikipedia-grounded market report", long_about = None)]
pub struct Args {
    /// Industry to research (runs all three steps and saves the report)
    #[arg(value_name = "INDUSTRY")]
    pub industry: Option<String>,

    /// Chat model to use (overrides config file)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Sampling temperature, 0.0 to 1.0 (overrides config file)
    #[arg(short, long, value_parser = parse_temperature)]
    pub temperature: Option<f32>,

    /// Directory the report file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the report without writing a file
    #[arg(long)]
    pub no_save: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except the report)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive, step-by-step session
    Start,

    /// Display the effective configuration
    Config,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

fn parse_temperature(raw: &str) -> Result<f32, String> {
    let value: f32 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("temperature must be between 0.0 and 1.0, got {}", value))
    }
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check that an industry or a subcommand was given, not both
    pub fn validate(&self) -> Result<(), String> {
        if self.command.is_none() && self.industry.is_none() {
            return Err(
                "Industry required. Use 'marketscout <INDUSTRY>' or 'marketscout start'.".to_string(),
            );
        }

        if self.command.is_some() && self.industry.is_some() {
            return Err("Cannot specify an industry with a subcommand.".to_string());
        }

        Ok(())
    }

    /// Apply command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
    }
}

impl Verbosity {
    /// Default log filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "marketscout=info",
            Verbosity::VeryVerbose => "marketscout=debug",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
