//! Built-in commands of the interactive session

use std::path::PathBuf;

/// Parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Validate { text: String },
    Retrieve,
    Generate,
    Save { dir: Option<PathBuf> },
    Status,
    Reset,
    Help,
    Exit,
    Unknown { input: String },
}

/// Parse one input line
///
/// Plain text (no leading `/`) is shorthand for `/validate <text>`.
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Validate {
            text: trimmed.to_string(),
        };
    };

    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name.to_lowercase().as_str() {
        "validate" | "v" => Command::Validate {
            text: arg.to_string(),
        },
        "retrieve" | "r" => Command::Retrieve,
        "generate" | "g" => Command::Generate,
        "save" | "s" => Command::Save {
            dir: (!arg.is_empty()).then(|| PathBuf::from(arg)),
        },
        "status" => Command::Status,
        "reset" => Command::Reset,
        "help" | "h" => Command::Help,
        "exit" | "quit" | "q" => Command::Exit,
        _ => Command::Unknown {
            input: trimmed.to_string(),
        },
    }
}

pub const HELP: &str = "\
Commands:
  <industry>            Validate an industry (same as /validate)
  /validate <industry>  Step 1: check the input names a real industry
  /retrieve             Step 2: fetch relevant Wikipedia pages
  /generate             Step 3: write the market report
  /save [dir]           Save the report as <industry>_market_report.txt
  /status               Show the current session state
  /reset                Start over
  /help                 Show this help
  /exit                 Quit";
