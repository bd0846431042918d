//! dm-core: Two-phase delta-debugging reducer for checker divergences.
//!
//! Given a source file on which a subject checker and a reference checker
//! disagree about one rule, this crate searches for the smallest variant of
//! the file that still exhibits the disagreement. The search itself knows
//! nothing about checkers: it drives an injected [`Predicate`] over an
//! exclusively owned [`Candidate`] line buffer, so it can be exercised with
//! plain closures in tests.

pub mod candidate;
pub mod divergence;
pub mod error;
pub mod predicate;
pub mod reduce;
pub mod report;
pub mod session;

pub use candidate::Candidate;
pub use divergence::{DivergenceSpec, MismatchKind, SourceLocus};
pub use error::ReduceError;
pub use predicate::Predicate;
pub use report::ReductionReport;
pub use session::ReductionSession;
