//! CLI glue for the divergence minimizer: locus parsing and prerequisite
//! resolution, kept out of the binary so they stay unit-testable.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors in the `path:line` source locator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocusError {
    #[error("location must be path:line, got '{0}'")]
    MissingLine(String),

    #[error("invalid line number in '{0}'")]
    InvalidLine(String),
}

/// Split a `path:line` locus on its last colon.
pub fn parse_locus(location: &str) -> Result<(PathBuf, u32), LocusError> {
    let Some((path, line)) = location.rsplit_once(':') else {
        return Err(LocusError::MissingLine(location.to_string()));
    };
    if path.is_empty() {
        return Err(LocusError::MissingLine(location.to_string()));
    }
    let line: u32 = line
        .parse()
        .map_err(|_| LocusError::InvalidLine(location.to_string()))?;
    Ok((PathBuf::from(path), line))
}

/// Whether a configured program resolves to something runnable: explicit
/// paths are checked directly, bare names are searched on PATH.
pub fn program_available(program: &str) -> bool {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return path.exists();
    }
    let Some(paths) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&paths).any(|dir| dir.join(program).is_file())
}
