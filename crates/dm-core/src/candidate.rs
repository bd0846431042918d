//! Candidate line buffers for reduction trials.
//!
//! A candidate is an ordered sequence of source lines. The deletion
//! operations return a fresh buffer (or `None` when the result would be
//! empty), so an empty candidate is unrepresentable as a trial and the
//! session's current buffer stays untouched until a trial is adopted.

use std::ops::Range;

/// An ordered, never-empty sequence of source lines under reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    lines: Vec<String>,
}

impl Candidate {
    /// Build a candidate from source text, split on line endings.
    ///
    /// Returns `None` when the text contains no lines at all.
    pub fn from_text(text: &str) -> Option<Self> {
        let lines: Vec<String> = text.lines().map(str::to_owned).collect();
        Self::from_lines(lines)
    }

    /// Build a candidate from already-split lines, rejecting an empty set.
    pub fn from_lines(lines: Vec<String>) -> Option<Self> {
        if lines.is_empty() {
            None
        } else {
            Some(Self { lines })
        }
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept so the type satisfies the usual container API.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The lines, in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Render back to text with a trailing newline.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// A new candidate with the line span `[span.start, span.end)` removed,
    /// or `None` when the removal would leave nothing.
    pub fn without_span(&self, span: Range<usize>) -> Option<Self> {
        debug_assert!(span.start < span.end && span.end <= self.lines.len());
        if span.end - span.start >= self.lines.len() {
            return None;
        }
        let mut lines = Vec::with_capacity(self.lines.len() - (span.end - span.start));
        lines.extend_from_slice(&self.lines[..span.start]);
        lines.extend_from_slice(&self.lines[span.end..]);
        Some(Self { lines })
    }

    /// A new candidate with the single line at `index` removed, or `None`
    /// when that line is the last one left.
    pub fn without_line(&self, index: usize) -> Option<Self> {
        self.without_span(index..index + 1)
    }
}
