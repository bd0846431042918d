//! The interestingness seam between the reducer and the checker adapters.

use crate::candidate::Candidate;

/// Decides whether a candidate still exhibits the divergence under
/// reduction.
///
/// Implementations are free to consult external processes; the reducer only
/// sees the boolean. Call accounting is not the predicate's job — the
/// session's `test` wrapper counts every evaluation.
pub trait Predicate {
    fn is_interesting(&mut self, candidate: &Candidate) -> bool;
}

/// Closures are predicates; tests lean on this.
impl<F> Predicate for F
where
    F: FnMut(&Candidate) -> bool,
{
    fn is_interesting(&mut self, candidate: &Candidate) -> bool {
        self(candidate)
    }
}
