//! Machine-readable failure kinds shared across the pipeline

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Failure kind carried by every run-terminating error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or malformed requirement or project spec
    Input,
    /// Unknown or conflicting pattern configuration
    Config,
    /// Catalog exhausted after its fallback (implementation defect)
    Pattern,
    /// Identical override resubmitted without a requirement change
    LoopDetected,
    /// Input exceeded a configured size cap
    ResourceLimit,
}

impl ErrorKind {
    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Input => "input_error",
            ErrorKind::Config => "config_error",
            ErrorKind::Pattern => "pattern_error",
            ErrorKind::LoopDetected => "loop_detected",
            ErrorKind::ResourceLimit => "resource_limit",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
