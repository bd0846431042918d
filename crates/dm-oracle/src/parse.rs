//! Structured checker output parsing.
//!
//! Accepts both JSON shapes the paired checkers emit: offenses listed at
//! the top level, and offenses nested under per-file entries. Only
//! offenses whose rule name matches exactly contribute line numbers.

use std::collections::BTreeSet;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CheckerOutput {
    #[serde(default)]
    offenses: Vec<Offense>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
struct FileEntry {
    #[serde(default)]
    offenses: Vec<Offense>,
}

#[derive(Debug, Deserialize)]
struct Offense {
    #[serde(default)]
    cop_name: String,
    /// Top-level shape puts the line directly on the offense.
    line: Option<u32>,
    /// Nested shape puts it under a location object.
    location: Option<Location>,
}

#[derive(Debug, Deserialize)]
struct Location {
    line: Option<u32>,
}

impl Offense {
    fn line(&self) -> Option<u32> {
        self.line
            .or_else(|| self.location.as_ref().and_then(|l| l.line))
    }
}

/// Extract the 1-based lines reported for `rule_id`, or `None` when the
/// output is not valid checker JSON.
pub fn reported_lines(rule_id: &str, stdout: &str) -> Option<BTreeSet<u32>> {
    let output: CheckerOutput = serde_json::from_str(stdout).ok()?;
    let all = output
        .offenses
        .iter()
        .chain(output.files.iter().flat_map(|f| f.offenses.iter()));

    let mut lines = BTreeSet::new();
    for offense in all {
        if offense.cop_name != rule_id {
            continue;
        }
        if let Some(line) = offense.line() {
            lines.insert(line);
        }
    }
    Some(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_offenses() {
        let stdout = r#"{"offenses": [
            {"cop_name": "Style/SymbolProc", "line": 12},
            {"cop_name": "Style/SymbolProc", "line": 40},
            {"cop_name": "Lint/Void", "line": 3}
        ]}"#;
        let lines = reported_lines("Style/SymbolProc", stdout).unwrap();
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), [12, 40]);
    }

    #[test]
    fn test_nested_file_offenses() {
        let stdout = r#"{"files": [
            {"path": "user.rb", "offenses": [
                {"cop_name": "Style/SymbolProc", "location": {"line": 7, "column": 2}},
                {"cop_name": "Other/Rule", "location": {"line": 9}}
            ]}
        ]}"#;
        let lines = reported_lines("Style/SymbolProc", stdout).unwrap();
        assert_eq!(lines.into_iter().collect::<Vec<_>>(), [7]);
    }

    #[test]
    fn test_rule_name_must_match_exactly() {
        let stdout = r#"{"offenses": [{"cop_name": "Style/Symbol", "line": 2}]}"#;
        let lines = reported_lines("Style/SymbolProc", stdout).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_unparseable_output_is_none() {
        assert!(reported_lines("Style/SymbolProc", "Segmentation fault").is_none());
        assert!(reported_lines("Style/SymbolProc", "").is_none());
    }

    #[test]
    fn test_no_offense_sections_reads_as_clean() {
        let lines = reported_lines("Style/SymbolProc", r#"{"summary": {}}"#).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_offense_without_line_is_skipped() {
        let stdout = r#"{"offenses": [{"cop_name": "Style/SymbolProc"}]}"#;
        let lines = reported_lines("Style/SymbolProc", stdout).unwrap();
        assert!(lines.is_empty());
    }
}
