//! Fatal error taxonomy.
//!
//! Only conditions that stop a session before any mutation are errors here.
//! Non-fatal conditions (checker timeouts, malformed checker output,
//! syntactically invalid candidates) are tagged outcome values in the
//! adapter layer: the search degrades them to "not interesting" and keeps
//! going, so the reducer's loop never handles errors to make progress.

use thiserror::Error;

use crate::divergence::MismatchKind;

/// Errors that abort a reduction session.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// The subject checker executable is unavailable. Checked up front,
    /// before any file is touched.
    #[error("subject checker not found: {path}")]
    PrerequisiteMissing { path: String },

    /// The pristine input did not reproduce the divergence. Nothing is
    /// written.
    #[error("initial file does not reproduce the {kind} divergence for {rule_id}")]
    InitialReproductionFailed {
        rule_id: String,
        kind: MismatchKind,
    },

    /// The source file had no lines to reduce.
    #[error("source file is empty")]
    EmptyInput,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
