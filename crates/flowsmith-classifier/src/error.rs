//! Classifier errors

use flowsmith_artifact::ErrorKind;
use flowsmith_catalog::{CatalogError, PatternType};

/// Errors raised while classifying a requirement
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Requirement text is empty or whitespace
    #[error("requirement text is empty")]
    EmptyRequirement,

    /// Requirement text exceeds the size cap
    #[error("requirement text is {size} bytes, limit is {limit}")]
    RequirementTooLarge {
        /// Actual size in bytes
        size: usize,
        /// Configured cap
        limit: usize,
    },

    /// Unknown pattern name or bad indicator table
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Forced pattern also listed as excluded
    #[error("forced pattern {0} is also excluded")]
    ForcedPatternExcluded(PatternType),

    /// Exclusions leave nothing to recommend
    #[error("every catalog pattern is excluded")]
    AllPatternsExcluded,

    /// Indicator phrase does not compile to a matcher
    #[error("invalid indicator phrase '{phrase}': {source}")]
    InvalidPhrase {
        /// Offending phrase
        phrase: String,
        /// Regex error
        #[source]
        source: regex::Error,
    },

    /// Threshold or limit out of range
    #[error("invalid classifier config: {0}")]
    InvalidConfig(String),
}

impl ClassifyError {
    /// Failure kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifyError::EmptyRequirement => ErrorKind::Input,
            ClassifyError::RequirementTooLarge { .. } => ErrorKind::ResourceLimit,
            ClassifyError::Catalog(e) => e.kind(),
            ClassifyError::ForcedPatternExcluded(_)
            | ClassifyError::AllPatternsExcluded
            | ClassifyError::InvalidPhrase { .. }
            | ClassifyError::InvalidConfig(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(ClassifyError::EmptyRequirement.kind(), ErrorKind::Input);
        assert_eq!(
            ClassifyError::RequirementTooLarge { size: 2, limit: 1 }.kind(),
            ErrorKind::ResourceLimit
        );
        assert_eq!(
            ClassifyError::from(CatalogError::UnknownPattern("X".into())).kind(),
            ErrorKind::Config
        );
        assert_eq!(
            ClassifyError::ForcedPatternExcluded(PatternType::Agent).to_string(),
            "forced pattern AGENT is also excluded"
        );
    }
}
