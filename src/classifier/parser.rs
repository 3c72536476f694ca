//! Verdict parser for classifier replies
//!
//! Accepts exactly two shapes, tried in this order:
//! - a JSON object `{"valid": .., "industry": .., "reason": ..}`, optionally
//!   wrapped in triple-backtick fences; used whenever the reply has a `{`
//! - plain text led by a `YES`/`NO` token, reason after the first colon
//!
//! Anything else is [`ProtocolError::Unparseable`]; nothing is guessed.

use serde::Deserialize;
use thiserror::Error;

/// Interpreted yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub valid: bool,
    pub reason: String,
    /// Canonical name offered by a JSON reply
    pub industry: Option<String>,
}

/// Reply did not match either accepted shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("empty reply")]
    Empty,

    #[error("unbalanced JSON object in reply")]
    UnbalancedJson,

    #[error("malformed JSON verdict: {0}")]
    MalformedJson(String),

    #[error("reply is neither YES/NO nor a JSON verdict: {0:?}")]
    Unparseable(String),
}

#[derive(Debug, Deserialize)]
struct JsonVerdict {
    valid: serde_json::Value,
    #[serde(default)]
    industry: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Parse a classifier reply into a [`Verdict`]
pub fn parse_verdict(reply: &str) -> Result<Verdict, ProtocolError> {
    let text = strip_code_fences(reply.trim());
    if text.is_empty() {
        return Err(ProtocolError::Empty);
    }

    if text.contains('{') {
        let json = find_json_object(text)?.ok_or(ProtocolError::UnbalancedJson)?;
        return parse_json(json);
    }

    parse_plain(text).ok_or_else(|| ProtocolError::Unparseable(preview(text)))
}

/// Relevance acceptance rule: the reply starts with `YES`, ignoring case
///
/// Any other reply, including garbled text, counts as not relevant.
pub fn is_affirmative(reply: &str) -> bool {
    reply.trim().to_uppercase().starts_with("YES")
}

fn parse_plain(text: &str) -> Option<Verdict> {
    let head = text.trim_start_matches(|c: char| matches!(c, '*' | '"' | '\'' | '`'));
    let valid = if starts_with_token(head, "yes") {
        true
    } else if starts_with_token(head, "no") {
        false
    } else {
        return None;
    };

    let reason = match text.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => text,
    };

    Some(Verdict {
        valid,
        reason: reason.to_string(),
        industry: None,
    })
}

/// `text` begins with `token` (case-insensitive) followed by a non-letter or end
fn starts_with_token(text: &str, token: &str) -> bool {
    let Some(prefix) = text.get(..token.len()) else {
        return false;
    };
    if !prefix.eq_ignore_ascii_case(token) {
        return false;
    }
    text[token.len()..]
        .chars()
        .next()
        .map_or(true, |c| !c.is_alphanumeric())
}

fn parse_json(json: &str) -> Result<Verdict, ProtocolError> {
    let raw: JsonVerdict =
        serde_json::from_str(json).map_err(|e| ProtocolError::MalformedJson(e.to_string()))?;

    let valid = match &raw.valid {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => match s.trim().to_lowercase().as_str() {
            "yes" | "true" => true,
            "no" | "false" => false,
            other => {
                return Err(ProtocolError::MalformedJson(format!(
                    "unrecognised \"valid\" value: {:?}",
                    other
                )))
            }
        },
        other => {
            return Err(ProtocolError::MalformedJson(format!(
                "unrecognised \"valid\" value: {}",
                other
            )))
        }
    };

    Ok(Verdict {
        valid,
        reason: raw.reason.unwrap_or_default().trim().to_string(),
        industry: raw.industry.filter(|s| !s.trim().is_empty()),
    })
}

/// Remove a surrounding ```` ``` ```` / ```` ```json ```` fence, if any
fn strip_code_fences(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the language tag line
    let inner = match inner.find('\n') {
        Some(idx) => &inner[idx + 1..],
        None => inner.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    inner.trim_end().trim_end_matches("```").trim()
}

/// First balanced `{...}` in `text`, ignoring braces inside JSON strings
fn find_json_object(text: &str) -> Result<Option<&str>, ProtocolError> {
    let mut depth: i32 = 0;
    let mut start: Option<usize> = None;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        if ch == '\\' && in_string {
            escape_next = true;
            continue;
        }

        if ch == '"' && start.is_some() {
            in_string = !in_string;
            continue;
        }

        if in_string {
            continue;
        }

        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if start.is_some() => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start {
                        return Ok(Some(&text[s..=i]));
                    }
                }
            }
            _ => {}
        }
    }

    if start.is_some() {
        return Err(ProtocolError::UnbalancedJson);
    }
    Ok(None)
}

fn preview(text: &str) -> String {
    const MAX: usize = 80;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
