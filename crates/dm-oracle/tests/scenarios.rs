//! Predicate and reducer behavior over scripted in-memory checkers.
//!
//! The fakes read the work file back from disk, so these tests also cover
//! the candidate-to-file plumbing the real adapters rely on.

use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dm_core::candidate::Candidate;
use dm_core::divergence::{DivergenceSpec, MismatchKind, SourceLocus};
use dm_core::reduce::reduce;
use dm_core::session::ReductionSession;
use dm_oracle::oracle::{Oracle, OracleOutcome, OracleReport};
use dm_oracle::predicate::DivergencePredicate;
use dm_oracle::validity::{Validity, ValidityOutcome};

/// Oracle whose report is computed from the candidate's content, with an
/// invocation counter the tests can inspect.
struct ScriptedOracle {
    calls: Rc<Cell<usize>>,
    respond: Box<dyn Fn(&str) -> OracleOutcome>,
}

impl ScriptedOracle {
    fn new(respond: impl Fn(&str) -> OracleOutcome + 'static) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
                respond: Box::new(respond),
            },
            calls,
        )
    }

    fn firing_when(needles: &'static [&'static str]) -> (Self, Rc<Cell<usize>>) {
        Self::new(move |content| {
            let lines: BTreeSet<u32> = content
                .lines()
                .enumerate()
                .filter(|(_, line)| needles.iter().any(|n| line.contains(n)))
                .map(|(i, _)| (i + 1) as u32)
                .collect();
            let all_present = needles.iter().all(|n| content.contains(n));
            if all_present {
                OracleOutcome::Report(OracleReport::from_lines(lines))
            } else {
                OracleOutcome::Report(OracleReport::empty())
            }
        })
    }

    fn silent() -> (Self, Rc<Cell<usize>>) {
        Self::new(|_| OracleOutcome::Report(OracleReport::empty()))
    }
}

impl Oracle for ScriptedOracle {
    fn evaluate(&self, _rule_id: &str, file: &Path) -> OracleOutcome {
        self.calls.set(self.calls.get() + 1);
        let content = fs::read_to_string(file).unwrap_or_default();
        (self.respond)(&content)
    }
}

/// Validity fake: content is well-formed when every `do` line has a
/// matching `end` line.
struct BalancedBlocks {
    calls: Rc<Cell<usize>>,
}

impl BalancedBlocks {
    fn new() -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl Validity for BalancedBlocks {
    fn check(&self, file: &Path) -> ValidityOutcome {
        self.calls.set(self.calls.get() + 1);
        let content = fs::read_to_string(file).unwrap_or_default();
        let opens = content.lines().filter(|l| l.contains("do")).count();
        let closes = content.lines().filter(|l| l.trim() == "end").count();
        if opens == closes {
            ValidityOutcome::Valid
        } else {
            ValidityOutcome::Invalid
        }
    }
}

struct AlwaysValid;

impl Validity for AlwaysValid {
    fn check(&self, _file: &Path) -> ValidityOutcome {
        ValidityOutcome::Valid
    }
}

fn session(kind: MismatchKind, lines: &[&str]) -> ReductionSession {
    let spec = DivergenceSpec {
        rule_id: "Demo/Rule".to_string(),
        kind,
        locus: SourceLocus {
            path: "app/models/user.rb".into(),
            line: 1,
        },
    };
    let candidate =
        Candidate::from_lines(lines.iter().map(|l| l.to_string()).collect()).unwrap();
    ReductionSession::new(spec, candidate)
}

fn work_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("user.rb")
}

/// Scenario A: an extra-report divergence pinned to two jointly required
/// lines reduces to exactly those lines.
#[test]
fn test_extra_divergence_reduces_to_culprits() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::firing_when(&["culprit_a", "culprit_b"]);
    let (reference, _) = ScriptedOracle::silent();

    let mut s = session(
        MismatchKind::Extra,
        &[
            "pad1", "pad2", "culprit_a", "pad3", "pad4", "pad5", "culprit_b", "pad8", "pad9",
            "pad10",
        ],
    );
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Extra,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    );

    reduce(&mut s, &mut predicate, false).unwrap();
    assert_eq!(s.current().lines(), ["culprit_a", "culprit_b"]);
}

/// Scenario C: a deletion that breaks syntax is rejected without invoking
/// either oracle, and the rejection is still a counted predicate call.
#[test]
fn test_invalid_candidate_short_circuits_before_oracles() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, subject_calls) = ScriptedOracle::firing_when(&["use(i)"]);
    let (reference, reference_calls) = ScriptedOracle::silent();
    let (validity, validity_calls) = BalancedBlocks::new();

    let mut s = session(
        MismatchKind::Extra,
        &["items.each do |i|", "  use(i)", "end"],
    );
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Extra,
        subject,
        reference,
        validity,
        work_path(&dir),
    );

    // The intact candidate is interesting: both oracles consulted.
    let intact = s.current().clone();
    assert!(s.test(&mut predicate, &intact));
    assert_eq!(subject_calls.get(), 1);
    assert_eq!(reference_calls.get(), 1);

    // Deleting the `end` leaves an unbalanced block: rejected by the
    // validity filter alone.
    let broken = s.current().without_line(2).unwrap();
    assert!(!s.test(&mut predicate, &broken));
    assert_eq!(validity_calls.get(), 2);
    assert_eq!(subject_calls.get(), 1, "subject must not run on invalid input");
    assert_eq!(reference_calls.get(), 1, "reference must not run on invalid input");
    assert_eq!(s.predicate_calls(), 2, "short-circuits still count");
}

/// Scenario D: a missing-report divergence where the reference needs two
/// lines jointly present retains both.
#[test]
fn test_missing_divergence_retains_reference_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::silent();
    let (reference, _) = ScriptedOracle::firing_when(&["alpha", "delta"]);

    let mut s = session(
        MismatchKind::Missing,
        &["alpha", "beta", "gamma", "delta", "epsilon"],
    );
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Missing,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    );

    reduce(&mut s, &mut predicate, false).unwrap();
    assert!(s.current().lines().iter().any(|l| l == "alpha"));
    assert!(s.current().lines().iter().any(|l| l == "delta"));
    assert_eq!(s.current().len(), 2);
}

/// The skip-reference optimization never spawns the reference checker.
#[test]
fn test_skip_reference_avoids_reference_calls() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::firing_when(&["culprit"]);
    let (reference, reference_calls) = ScriptedOracle::silent();

    let mut s = session(MismatchKind::Extra, &["pad1", "culprit", "pad2", "pad3"]);
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Extra,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    )
    .with_skip_reference(true);

    reduce(&mut s, &mut predicate, false).unwrap();
    assert_eq!(s.current().lines(), ["culprit"]);
    assert_eq!(reference_calls.get(), 0);
}

/// Skip-reference is an extra-only optimization; for missing divergences
/// the flag is inert and the reference is still consulted.
#[test]
fn test_skip_reference_is_ignored_for_missing() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::silent();
    let (reference, reference_calls) = ScriptedOracle::firing_when(&["alpha"]);

    let mut s = session(MismatchKind::Missing, &["alpha", "beta"]);
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Missing,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    )
    .with_skip_reference(true);

    let intact = s.current().clone();
    assert!(s.test(&mut predicate, &intact));
    assert_eq!(reference_calls.get(), 1);
}

/// A subject timeout degrades to an empty report: for an extra divergence
/// that reads as "subject didn't fire", never as an error.
#[test]
fn test_subject_timeout_degrades_to_uninteresting() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::new(|_| OracleOutcome::TimedOut);
    let (reference, reference_calls) = ScriptedOracle::silent();

    let mut s = session(MismatchKind::Extra, &["a", "b"]);
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Extra,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    );

    let intact = s.current().clone();
    assert!(!s.test(&mut predicate, &intact));
    assert_eq!(reference_calls.get(), 0);
}

/// A reference timeout during a missing-kind evaluation also degrades to
/// empty, which reads as "reference also silent".
#[test]
fn test_reference_timeout_degrades_to_uninteresting() {
    let dir = tempfile::tempdir().unwrap();
    let (subject, _) = ScriptedOracle::silent();
    let (reference, _) = ScriptedOracle::new(|_| OracleOutcome::TimedOut);

    let mut s = session(MismatchKind::Missing, &["a", "b"]);
    let mut predicate = DivergencePredicate::new(
        "Demo/Rule",
        MismatchKind::Missing,
        subject,
        reference,
        AlwaysValid,
        work_path(&dir),
    );

    let intact = s.current().clone();
    assert!(!s.test(&mut predicate, &intact));
}
