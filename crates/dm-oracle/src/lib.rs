//! dm-oracle: external checker adapters for divergence reduction.
//!
//! Wraps the two external checkers (subject under test and reference
//! ground truth) and the syntax validity probe behind narrow contracts,
//! and combines them into the interestingness predicate the reducer
//! drives. Checker invocations are bounded by timeouts; a timed-out or
//! unparseable run reads as an empty report, never as an error.

pub mod config;
pub mod oracle;
pub mod parse;
pub mod predicate;
pub mod process;
pub mod validity;

pub use config::{CheckerConfig, CommandSpec, ConfigError};
pub use oracle::{Oracle, OracleOutcome, OracleReport};
pub use predicate::DivergencePredicate;
pub use process::ProcessOracle;
pub use validity::{ProcessValidity, Validity, ValidityOutcome};
