//! Syntax validity probe.
//!
//! A candidate that does not even parse is rejected before either oracle
//! is consulted; checker spawns are the expensive step, the parse probe is
//! cheap.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::config::CommandSpec;
use crate::process::{WaitResult, wait_bounded};

/// Result of one bounded validity probe. Timeouts read as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityOutcome {
    Valid,
    Invalid,
    TimedOut,
}

impl ValidityOutcome {
    pub fn is_valid(self) -> bool {
        matches!(self, ValidityOutcome::Valid)
    }
}

/// Syntax-only well-formedness check; no rule evaluation.
pub trait Validity {
    fn check(&self, file: &Path) -> ValidityOutcome;
}

/// Probe backed by an external parser command (exit 0 = parses).
pub struct ProcessValidity {
    spec: CommandSpec,
    env: BTreeMap<String, String>,
}

impl ProcessValidity {
    pub fn new(spec: CommandSpec, env: BTreeMap<String, String>) -> Self {
        Self { spec, env }
    }
}

impl Validity for ProcessValidity {
    fn check(&self, file: &Path) -> ValidityOutcome {
        let mut command = Command::new(&self.spec.program);
        command
            .args(self.spec.render_args("", file))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for (key, value) in &self.env {
            command.env(key, value);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(_) => return ValidityOutcome::Invalid,
        };

        match wait_bounded(child, self.spec.timeout()) {
            WaitResult::Exited(status) if status.success() => ValidityOutcome::Valid,
            WaitResult::Exited(_) | WaitResult::Failed => ValidityOutcome::Invalid,
            WaitResult::TimedOut => ValidityOutcome::TimedOut,
        }
    }
}
