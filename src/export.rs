//! Plain-text export of a finished report

use crate::errors::Result;
use crate::types::Report;
use std::fs;
use std::path::{Path, PathBuf};

/// File name for an exported report: `{industry}_market_report.txt`
///
/// Path separators and control characters in the industry name become `_`.
pub fn report_file_name(industry: &str) -> String {
    let safe: String = industry
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{}_market_report.txt", safe)
}

/// Write `report.text` verbatim into `dir`, returning the file path
pub fn write_report(dir: &Path, industry: &str, report: &Report) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(industry));
    fs::write(&path, &report.text)?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Healthcare"), "Healthcare_market_report.txt");
        assert_eq!(
            report_file_name("Oil & Gas"),
            "Oil & Gas_market_report.txt"
        );
        assert_eq!(
            report_file_name("IT/Software"),
            "IT_Software_market_report.txt"
        );
    }

    #[test]
    fn test_write_report_verbatim() {
        let dir = TempDir::new().unwrap();
        let report = Report::new("Healthcare", "## Overview\nHealth care is big.", 500);

        let path = write_report(dir.path(), "Healthcare", &report).unwrap();
        assert!(path.ends_with("Healthcare_market_report.txt"));
        assert_eq!(fs::read_to_string(path).unwrap(), report.text);
    }
}
