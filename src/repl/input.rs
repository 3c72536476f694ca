//! Line input for the interactive session (rustyline)

use anyhow::{anyhow, Result};
use rustyline::error::ReadlineError;
use rustyline::history::History;
use rustyline::DefaultEditor;
use std::path::PathBuf;

const PROMPT: &str = "marketscout> ";

/// What the user typed, or why there is nothing to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Line(String),
    /// Ctrl-C: abandon the current line, keep the session
    Interrupted,
    /// Ctrl-D: end the session
    Eof,
}

/// Readline wrapper with optional on-disk history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        Ok(InputHandler {
            editor: DefaultEditor::new()?,
            history_path: None,
        })
    }

    /// Load history from `history_file` if it exists; saved on [`Self::save_history`]
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        if history_file.exists() {
            // A corrupt history file should not block the session
            if let Err(e) = editor.load_history(&history_file) {
                tracing::warn!(error = %e, "could not load history");
            }
        }

        Ok(InputHandler {
            editor,
            history_path: Some(history_file),
        })
    }

    pub fn read(&mut self) -> Result<InputEvent> {
        match self.editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim().to_string();
                if !trimmed.is_empty() {
                    let _ = self.editor.add_history_entry(trimmed.as_str());
                }
                Ok(InputEvent::Line(trimmed))
            }
            Err(ReadlineError::Interrupted) => Ok(InputEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(InputEvent::Eof),
            Err(err) => Err(anyhow!("Readline error: {}", err)),
        }
    }

    pub fn save_history(&mut self) -> Result<()> {
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            self.editor.save_history(path)?;
        }
        Ok(())
    }

    pub fn history_len(&self) -> usize {
        self.editor.history().len()
    }
}
