//! Run reporting — summarizes a finished session into human-readable and
//! machine-readable forms.

use serde::{Deserialize, Serialize};

use crate::divergence::MismatchKind;
use crate::session::ReductionSession;

/// Summary of a completed reduction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReductionReport {
    /// Rule under investigation.
    pub rule_id: String,
    /// Divergence kind that was preserved.
    pub kind: MismatchKind,
    /// Line count of the pristine input.
    pub original_lines: usize,
    /// Line count of the surviving candidate.
    pub reduced_lines: usize,
    /// Total predicate evaluations, including rejected trials.
    pub predicate_calls: u64,
    /// Wall-clock seconds spent reducing.
    pub elapsed_secs: f64,
    /// RFC 3339 completion timestamp.
    pub finished_at: String,
    /// Final content, in order.
    pub content: Vec<String>,
}

impl ReductionReport {
    /// Summarize a session. `original_lines` is captured by the caller
    /// before reduction mutates the candidate.
    pub fn from_session(session: &ReductionSession, original_lines: usize) -> Self {
        Self {
            rule_id: session.spec().rule_id.clone(),
            kind: session.spec().kind,
            original_lines,
            reduced_lines: session.current().len(),
            predicate_calls: session.predicate_calls(),
            elapsed_secs: session.elapsed().as_secs_f64(),
            finished_at: chrono::Utc::now().to_rfc3339(),
            content: session.current().lines().to_vec(),
        }
    }

    /// Print a human-readable summary to stdout, the final content
    /// enumerated with 1-based line numbers for inspection.
    pub fn print_summary(&self) {
        println!();
        println!(
            "Reduced {} lines -> {} lines ({} checks, {:.1}s)",
            self.original_lines, self.reduced_lines, self.predicate_calls, self.elapsed_secs
        );
        println!();
        println!("--- Reduced file ---");
        for (i, line) in self.content.iter().enumerate() {
            println!("  {:>4}: {}", i + 1, line);
        }
    }

    /// Serialize to a pretty JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

/// Flatten rule-name separators so a rule id can serve as a file stem
/// (e.g. `Style/SymbolProc` -> `Style_SymbolProc`).
pub fn rule_file_stem(rule_id: &str) -> String {
    rule_id.replace(['/', ':'], "_")
}
