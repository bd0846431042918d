//! Reduction session state and call accounting.

use std::time::{Duration, Instant};

use crate::candidate::Candidate;
use crate::divergence::DivergenceSpec;
use crate::predicate::Predicate;

/// Mutable state of one reduction run.
///
/// The session owns the current candidate exclusively: phases rewrite it
/// destructively between trials, so nothing else may hold a long-lived
/// reference to it while reduction is active. The predicate call counter
/// lives here rather than in any shared global.
#[derive(Debug)]
pub struct ReductionSession {
    spec: DivergenceSpec,
    current: Candidate,
    predicate_calls: u64,
    started: Instant,
}

impl ReductionSession {
    /// Start a session over the pristine input.
    pub fn new(spec: DivergenceSpec, initial: Candidate) -> Self {
        Self {
            spec,
            current: initial,
            predicate_calls: 0,
            started: Instant::now(),
        }
    }

    /// The divergence being preserved.
    pub fn spec(&self) -> &DivergenceSpec {
        &self.spec
    }

    /// The surviving candidate.
    pub fn current(&self) -> &Candidate {
        &self.current
    }

    /// Total predicate evaluations so far, including rejected trials and
    /// invalid-candidate short-circuits.
    pub fn predicate_calls(&self) -> u64 {
        self.predicate_calls
    }

    /// Wall-clock time since the session started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Evaluate one trial, counting the call regardless of outcome.
    pub fn test<P: Predicate + ?Sized>(
        &mut self,
        predicate: &mut P,
        candidate: &Candidate,
    ) -> bool {
        self.predicate_calls += 1;
        predicate.is_interesting(candidate)
    }

    /// Make a successful trial the new current candidate.
    pub(crate) fn adopt(&mut self, candidate: Candidate) {
        self.current = candidate;
    }
}
