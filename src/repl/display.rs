//! Terminal output for the interactive session and one-shot runs

use crate::pipeline::{PipelineState, Retrieval, StageReport};
use crate::types::{Report, ValidatedIndustry};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Formats stage results for the terminal
pub struct DisplayManager {
    update_interval: Duration,
    quiet: bool,
}

impl DisplayManager {
    pub fn new() -> Self {
        DisplayManager {
            update_interval: Duration::from_millis(100),
            quiet: false,
        }
    }

    /// Suppress spinners and status lines, keeping only the report
    pub fn quiet() -> Self {
        DisplayManager {
            quiet: true,
            ..Self::new()
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, model: &str) {
        let width = 64;
        let rule = "=".repeat(width);
        println!("\n{}", rule.cyan());
        println!("{}", format!("  MarketScout {} - Market Research Assistant", version).bold().cyan());
        println!("{}", format!("  Model: {} | Source: Wikipedia", model).dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "{}",
            "This report is based on Wikipedia sources and should be used for preliminary research only"
                .dimmed()
        );
        println!(
            "Type an industry (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Spinner shown while a collaborator call is in flight
    pub fn start_spinner(&self, message: &str) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.update_interval);
        pb
    }

    pub fn show_validation(&self, stage: &StageReport<ValidatedIndustry>) {
        if stage.payload.valid {
            self.show_success(&stage.status);
            if let Some(suggested) = &stage.payload.suggested_name {
                self.show_info(&format!("Also known as: {}", suggested));
            }
        } else {
            self.show_warning(&stage.status);
        }
        if let Some(warning) = &stage.warning {
            self.show_info(warning);
        }
    }

    pub fn show_retrieval(&self, stage: &StageReport<Retrieval>) {
        if stage.payload.documents.is_empty() {
            self.show_error(&stage.status);
        } else {
            self.show_success(&stage.status);
            for (i, doc) in stage.payload.documents.iter().enumerate() {
                println!(
                    "  {}. {} {}",
                    (i + 1).to_string().cyan(),
                    doc.title.bold(),
                    format!("({})", doc.source_url).dimmed()
                );
            }
        }
        if let Some(warning) = &stage.warning {
            self.show_warning(warning);
        }
    }

    pub fn show_report(&self, stage: &StageReport<Report>) {
        println!("\n{}\n", stage.payload.text);
        if self.quiet {
            return;
        }
        match &stage.warning {
            Some(warning) => self.show_warning(warning),
            None => println!("{}", stage.status.dimmed()),
        }
    }

    pub fn show_state(&self, state: &PipelineState) {
        self.show_section("Session");
        println!("  State: {}", state.display_name().bold());
        if let Some(industry) = state.industry() {
            println!("  Industry: {}", industry.name.cyan());
        }
        if let Some(documents) = state.documents() {
            println!("  Documents: {}/{}", documents.len(), documents.quota());
        }
        if let Some(report) = state.report() {
            println!("  Report: {} words (budget {})", report.word_count, report.budget);
        }
        let next = if state.report().is_some() {
            "/save"
        } else if state.can_generate() {
            "/generate"
        } else if state.can_retrieve() {
            "/retrieve"
        } else {
            "enter an industry"
        };
        println!("  Next: {}", next.green());
        println!();
    }

    pub fn show_success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", "✓".green(), message.green());
        }
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        eprintln!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        if !self.quiet {
            println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
        }
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        if !self.quiet {
            println!("{} {}", "Info:".cyan(), info);
        }
    }

    /// Show section header
    pub fn show_section(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "-".repeat(60).cyan());
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Document, DocumentSet};

    #[test]
    fn test_banner_and_state_render() {
        let display = DisplayManager::new();
        display.show_banner("0.1.0", "gpt-4o-mini");

        let mut state = PipelineState::new();
        display.show_state(&state);

        state
            .advance_validated(ValidatedIndustry::accepted("Healthcare", "ok"))
            .unwrap();
        let mut documents = DocumentSet::with_quota(5);
        documents.push(Document::new("Health care", "text", "https://example.org"));
        state.advance_retrieved(documents).unwrap();
        display.show_state(&state);
    }
}
