//! The divergence predicate: validity plus both oracles in one boolean.

use std::path::PathBuf;

use dm_core::candidate::Candidate;
use dm_core::divergence::MismatchKind;
use dm_core::predicate::Predicate;

use crate::oracle::{Oracle, OracleOutcome, OracleReport};
use crate::validity::Validity;

/// Decides whether a candidate still exhibits the original divergence.
///
/// Each evaluation writes the candidate to the session work file (checkers
/// and the parser consume paths, and the file keeps the source file's name
/// because some rules are path-sensitive), rejects syntactically broken
/// candidates before any checker spawn, then compares the subject and
/// reference reports according to the mismatch kind.
pub struct DivergencePredicate<S, R, V> {
    rule_id: String,
    kind: MismatchKind,
    subject: S,
    reference: R,
    validity: V,
    work_path: PathBuf,
    skip_reference: bool,
    verbose: bool,
}

impl<S: Oracle, R: Oracle, V: Validity> DivergencePredicate<S, R, V> {
    pub fn new(
        rule_id: impl Into<String>,
        kind: MismatchKind,
        subject: S,
        reference: R,
        validity: V,
        work_path: PathBuf,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            kind,
            subject,
            reference,
            validity,
            work_path,
            skip_reference: false,
            verbose: false,
        }
    }

    /// Opt in to the shrink-safety heuristic: assume that deleting content
    /// can never make a previously silent reference checker start
    /// reporting, and skip the reference spawn entirely.
    ///
    /// Only meaningful for `extra` divergences whose pristine input had an
    /// empty reference report — the caller is responsible for checking
    /// that before enabling it. This is a heuristic, not a guarantee: a
    /// reference checker whose rule logic is non-monotonic under deletion
    /// can produce an over-reduced, misleading reproduction.
    pub fn with_skip_reference(mut self, skip: bool) -> Self {
        self.skip_reference = skip && self.kind == MismatchKind::Extra;
        self
    }

    /// Log each rejection reason to stderr.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn note(&self, message: &str) {
        if self.verbose {
            eprintln!("    [skip] {message}");
        }
    }

    fn degraded(&self, which: &str, outcome: OracleOutcome) -> OracleReport {
        match outcome {
            OracleOutcome::Report(report) => report,
            OracleOutcome::TimedOut => {
                self.note(&format!("{which} timed out"));
                OracleReport::empty()
            }
            OracleOutcome::Malformed => {
                self.note(&format!("{which} output malformed"));
                OracleReport::empty()
            }
        }
    }
}

impl<S: Oracle, R: Oracle, V: Validity> Predicate for DivergencePredicate<S, R, V> {
    fn is_interesting(&mut self, candidate: &Candidate) -> bool {
        if std::fs::write(&self.work_path, candidate.text()).is_err() {
            self.note("work file write failed");
            return false;
        }

        if !self.validity.check(&self.work_path).is_valid() {
            self.note("not parseable");
            return false;
        }

        let subject = self.degraded(
            "subject",
            self.subject.evaluate(&self.rule_id, &self.work_path),
        );

        match self.kind {
            MismatchKind::Extra => {
                if subject.is_empty() {
                    self.note("subject didn't fire");
                    return false;
                }
                if self.skip_reference {
                    return true;
                }
                let reference = self.degraded(
                    "reference",
                    self.reference.evaluate(&self.rule_id, &self.work_path),
                );
                if !reference.is_empty() {
                    self.note("reference also fires");
                    return false;
                }
                true
            }
            MismatchKind::Missing => {
                if !subject.is_empty() {
                    self.note("subject fires (need it silent)");
                    return false;
                }
                let reference = self.degraded(
                    "reference",
                    self.reference.evaluate(&self.rule_id, &self.work_path),
                );
                if reference.is_empty() {
                    self.note("reference also silent");
                    return false;
                }
                true
            }
        }
    }
}
