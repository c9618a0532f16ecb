//! Validator errors
//!
//! Only bundle-level failures are errors. Problems inside an artifact are
//! reported as [`ValidationIssue`](crate::ValidationIssue) data.

use flowsmith_artifact::{ArtifactId, ErrorKind};

/// Errors that stop validation of a whole bundle
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// An artifact exceeds the line cap
    #[error("artifact {id} has {lines} lines, limit is {limit}")]
    ResourceLimit {
        /// Offending artifact
        id: ArtifactId,
        /// Its line count
        lines: usize,
        /// Configured cap
        limit: usize,
    },

    /// A Python artifact nests deeper than the depth cap
    #[error("artifact {id} nests {depth} levels deep, limit is {limit}")]
    TooDeep {
        /// Offending artifact
        id: ArtifactId,
        /// Syntax-tree depth
        depth: usize,
        /// Configured cap
        limit: usize,
    },

    /// The bundle exceeds the artifact cap
    #[error("bundle has {count} artifacts, limit is {limit}")]
    TooManyArtifacts {
        /// Artifact count
        count: usize,
        /// Configured cap
        limit: usize,
    },

    /// The Python grammar could not be loaded
    #[error("parser init failed: {0}")]
    ParserInit(String),
}

impl ValidateError {
    /// Failure kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidateError::ResourceLimit { .. }
            | ValidateError::TooDeep { .. }
            | ValidateError::TooManyArtifacts { .. } => ErrorKind::ResourceLimit,
            ValidateError::ParserInit(_) => ErrorKind::Pattern,
        }
    }
}
