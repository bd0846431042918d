//! Checker command configuration.
//!
//! A session is configured with three external commands: the subject
//! checker, the reference checker, and the syntax validity probe. Each is
//! an argument template with `{rule}` / `{file}` placeholders substituted
//! per invocation, plus a per-call timeout. An optional environment block
//! applies to every spawn so corpus runs can match CI (the usual use is
//! pinning bundler variables).

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder replaced by the rule identifier.
pub const RULE_PLACEHOLDER: &str = "{rule}";
/// Placeholder replaced by the candidate file path.
pub const FILE_PLACEHOLDER: &str = "{file}";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// One external command template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,
    /// Arguments, with `{rule}` and `{file}` substituted per invocation.
    #[serde(default)]
    pub args: Vec<String>,
    /// Per-invocation budget; a run past this is killed and reported as a
    /// timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CommandSpec {
    /// Substitute placeholders into the argument list.
    pub fn render_args(&self, rule_id: &str, file: &Path) -> Vec<String> {
        let file = file.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(RULE_PLACEHOLDER, rule_id)
                    .replace(FILE_PLACEHOLDER, &file)
            })
            .collect()
    }

    /// The invocation budget, never below one second.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// Full checker configuration for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// The checker under test.
    pub subject: CommandSpec,
    /// The checker treated as ground truth.
    pub reference: CommandSpec,
    /// Syntax-only well-formedness probe (exit 0 = parses).
    pub validity: CommandSpec,
    /// Extra environment applied to every spawn.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl CheckerConfig {
    /// Load a configuration from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_args_substitutes_placeholders() {
        let spec = CommandSpec {
            program: "subject-check".to_string(),
            args: vec![
                "--only".to_string(),
                "{rule}".to_string(),
                "--format".to_string(),
                "json".to_string(),
                "{file}".to_string(),
            ],
            timeout_secs: 30,
        };
        let args = spec.render_args("Style/SymbolProc", Path::new("/tmp/work/user.rb"));
        assert_eq!(
            args,
            [
                "--only",
                "Style/SymbolProc",
                "--format",
                "json",
                "/tmp/work/user.rb"
            ]
        );
    }

    #[test]
    fn test_timeout_floor_is_one_second() {
        let spec = CommandSpec {
            program: "x".to_string(),
            args: vec![],
            timeout_secs: 0,
        };
        assert_eq!(spec.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_parses_with_defaults() {
        let json = r#"{
            "subject":   { "program": "subject-check", "args": ["--only", "{rule}", "{file}"] },
            "reference": { "program": "reference-check", "args": ["{file}"], "timeout_secs": 10 },
            "validity":  { "program": "parse-check", "args": ["{file}"] }
        }"#;
        let config: CheckerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.subject.timeout_secs, 30);
        assert_eq!(config.reference.timeout_secs, 10);
        assert!(config.env.is_empty());
    }
}
