//! Interactive session
//!
//! Walks the user through the three pipeline stages one command at a time.
//! The session owns the [`PipelineState`]; nothing survives the process.

pub mod commands;
pub mod display;
pub mod input;

use crate::errors::PipelineError;
use crate::export::write_report;
use crate::pipeline::{Pipeline, PipelineState};
use anyhow::Result;
use std::path::PathBuf;

pub use commands::{parse, Command};
pub use display::DisplayManager;
pub use input::{InputEvent, InputHandler};

/// Pipeline plus the state of one user session
pub struct SessionController {
    pipeline: Pipeline,
    state: PipelineState,
    display: DisplayManager,
    output_dir: PathBuf,
}

impl SessionController {
    pub fn new(pipeline: Pipeline, display: DisplayManager, output_dir: PathBuf) -> Self {
        SessionController {
            pipeline,
            state: PipelineState::new(),
            display,
            output_dir,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Execute one command; returns false when the session should end
    ///
    /// Stage failures are shown to the user and do not end the session.
    pub async fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Validate { text } => {
                let spinner = self.display.start_spinner("Validating...");
                let result = self.pipeline.validate(&mut self.state, &text).await;
                spinner.finish_and_clear();
                match result {
                    Ok(stage) => self.display.show_validation(&stage),
                    Err(e) => self.show_stage_error(&e),
                }
            }
            Command::Retrieve => {
                let spinner = self.display.start_spinner("Searching Wikipedia...");
                let result = self.pipeline.retrieve(&mut self.state).await;
                spinner.finish_and_clear();
                match result {
                    Ok(stage) => self.display.show_retrieval(&stage),
                    Err(e) => self.show_stage_error(&e),
                }
            }
            Command::Generate => {
                let spinner = self.display.start_spinner("Generating report...");
                let result = self.pipeline.generate(&mut self.state).await;
                spinner.finish_and_clear();
                match result {
                    Ok(stage) => self.display.show_report(&stage),
                    Err(e) => self.show_stage_error(&e),
                }
            }
            Command::Save { dir } => {
                if let Err(e) = self.save(dir) {
                    self.display.show_error(&e.to_string());
                }
            }
            Command::Status => {
                self.display.show_state(&self.state);
                self.display.show_info(&format!(
                    "Classification calls this session: {}",
                    self.pipeline.classifier_calls()
                ));
            }
            Command::Reset => {
                self.state.reset();
                self.display.show_info("Session reset");
            }
            Command::Help => println!("{}", commands::HELP),
            Command::Exit => return false,
            Command::Unknown { input } => {
                self.display
                    .show_warning(&format!("Unknown command: {} (try /help)", input));
            }
        }
        true
    }

    /// Recoverable failures only need new input; the rest are errors
    fn show_stage_error(&self, error: &PipelineError) {
        if error.is_recoverable() {
            self.display.show_warning(&error.to_string());
        } else {
            self.display.show_error(&error.to_string());
        }
    }

    /// Write the current report; returns the path written
    pub fn save(&self, dir: Option<PathBuf>) -> Result<PathBuf> {
        let (Some(industry), Some(report)) = (self.state.industry(), self.state.report()) else {
            anyhow::bail!("No report yet: run /generate first");
        };
        let dir = dir.unwrap_or_else(|| self.output_dir.clone());
        let path = write_report(&dir, &industry.name, report)?;
        self.display
            .show_success(&format!("Report saved to {}", path.display()));
        Ok(path)
    }
}

/// Read-eval-print loop over a [`SessionController`]
pub struct ReplSession {
    input: InputHandler,
    controller: SessionController,
}

impl ReplSession {
    pub fn new(input: InputHandler, controller: SessionController) -> Self {
        ReplSession { input, controller }
    }

    pub async fn run(&mut self) -> Result<()> {
        loop {
            let line = match self.input.read()? {
                InputEvent::Line(line) => line,
                InputEvent::Interrupted => continue,
                InputEvent::Eof => break,
            };
            if line.is_empty() {
                continue;
            }
            if !self.controller.handle(parse(&line)).await {
                break;
            }
        }

        self.input.save_history()
    }
}
