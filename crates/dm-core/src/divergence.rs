//! Divergence descriptions shared between the reducer and its collaborators.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Which way the subject checker disagrees with the reference.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MismatchKind {
    /// The subject reports where the reference is silent (a false positive
    /// from the subject's perspective).
    Extra,
    /// The subject is silent where the reference reports (a false
    /// negative from the subject's perspective).
    Missing,
}

/// Where the divergence was originally observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLocus {
    /// Path of the file within its repository.
    pub path: PathBuf,
    /// 1-based line of the original report.
    pub line: u32,
}

/// Immutable description of the divergence under reduction.
///
/// Built once at session start from collaborator input; never mutated.
#[derive(Debug, Clone)]
pub struct DivergenceSpec {
    /// Rule whose behavior is under investigation.
    pub rule_id: String,
    /// Divergence kind to preserve while shrinking.
    pub kind: MismatchKind,
    /// Original report location, kept for diagnostics.
    pub locus: SourceLocus,
}
