//! Process-backed oracle adapter.
//!
//! Spawns the configured checker with stdout redirected to a scratch file
//! (avoids pipe-buffer stalls on chatty checkers), polls the child until
//! it exits or the budget runs out, and parses whatever came back. Every
//! failure mode maps to a tagged outcome; nothing here returns `Err`.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::CommandSpec;
use crate::oracle::{Oracle, OracleOutcome, OracleReport};
use crate::parse;

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How a bounded child wait ended.
pub(crate) enum WaitResult {
    Exited(ExitStatus),
    TimedOut,
    Failed,
}

/// Poll the child until it exits or the deadline passes. On timeout the
/// child is killed and reaped before returning.
pub(crate) fn wait_bounded(mut child: Child, timeout: Duration) -> WaitResult {
    let started = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return WaitResult::Exited(status),
            Ok(None) => {
                if started.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return WaitResult::TimedOut;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(_) => return WaitResult::Failed,
        }
    }
}

/// An oracle backed by an external checker process.
pub struct ProcessOracle {
    spec: CommandSpec,
    env: BTreeMap<String, String>,
    /// Scratch file the checker's stdout is redirected into; owned by the
    /// session's output directory.
    stdout_path: PathBuf,
}

impl ProcessOracle {
    pub fn new(
        spec: CommandSpec,
        env: BTreeMap<String, String>,
        stdout_path: PathBuf,
    ) -> Self {
        Self {
            spec,
            env,
            stdout_path,
        }
    }

    /// The configured executable, for prerequisite checks and diagnostics.
    pub fn program(&self) -> &str {
        &self.spec.program
    }
}

impl Oracle for ProcessOracle {
    fn evaluate(&self, rule_id: &str, file: &Path) -> OracleOutcome {
        let Ok(stdout_file) = File::create(&self.stdout_path) else {
            return OracleOutcome::Malformed;
        };

        let mut command = Command::new(&self.spec.program);
        command
            .args(self.spec.render_args(rule_id, file))
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout_file))
            .stderr(Stdio::null());
        for (key, value) in &self.env {
            command.env(key, value);
        }

        let child = match command.spawn() {
            Ok(child) => child,
            Err(_) => return OracleOutcome::Malformed,
        };

        match wait_bounded(child, self.spec.timeout()) {
            WaitResult::Exited(status) => {
                // Checkers exit 0 (clean) or 1 (offenses found); anything
                // else is a crash.
                if !matches!(status.code(), Some(0) | Some(1)) {
                    return OracleOutcome::Malformed;
                }
                let stdout = std::fs::read_to_string(&self.stdout_path).unwrap_or_default();
                match parse::reported_lines(rule_id, &stdout) {
                    Some(lines) => OracleOutcome::Report(OracleReport::from_lines(lines)),
                    None => OracleOutcome::Malformed,
                }
            }
            WaitResult::TimedOut => OracleOutcome::TimedOut,
            WaitResult::Failed => OracleOutcome::Malformed,
        }
    }
}
