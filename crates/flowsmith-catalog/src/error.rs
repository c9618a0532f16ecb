//! Catalog errors

use flowsmith_artifact::ErrorKind;
use std::path::PathBuf;

/// Errors raised while resolving patterns or loading indicator tables
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Pattern name not recognized
    #[error("unknown pattern: '{0}'")]
    UnknownPattern(String),

    /// Complexity name not recognized
    #[error("unknown complexity: '{0}' (expected simple, enhanced or advanced)")]
    UnknownComplexity(String),

    /// Indicator table is not valid YAML for the expected shape
    #[error("indicator table parse error: {0}")]
    IndicatorParse(#[from] serde_yaml::Error),

    /// Indicator table parsed but violates a constraint
    #[error("invalid indicator table: {0}")]
    InvalidIndicators(String),

    /// Indicator table file could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Failure kind
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_pattern_display() {
        let err = CatalogError::UnknownPattern("PIPELINE".to_string());
        assert_eq!(err.to_string(), "unknown pattern: 'PIPELINE'");
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
