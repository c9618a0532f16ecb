//! Caller-supplied classification hints

use crate::error::ClassifyError;
use flowsmith_catalog::{Complexity, PatternType};
use serde::{Deserialize, Serialize};

/// Optional steering for one classification
///
/// Pattern names are kept as text so an unknown name surfaces as a
/// configuration error at classification time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationHints {
    /// Skip scoring and use this pattern
    pub forced_pattern: Option<String>,
    /// Patterns never to recommend
    pub excluded_patterns: Vec<String>,
    /// Requested scaffold depth
    pub complexity: Option<Complexity>,
}

impl ClassificationHints {
    /// No hints
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a pattern
    #[inline]
    #[must_use]
    pub fn with_forced(mut self, pattern: impl Into<String>) -> Self {
        self.forced_pattern = Some(pattern.into());
        self
    }

    /// Exclude a pattern
    #[inline]
    #[must_use]
    pub fn with_excluded(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_patterns.push(pattern.into());
        self
    }

    /// Set complexity
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Parsed forced pattern
    ///
    /// # Errors
    /// Returns error if the name is not a known pattern
    pub fn forced(&self) -> Result<Option<PatternType>, ClassifyError> {
        self.forced_pattern
            .as_deref()
            .map(str::parse::<PatternType>)
            .transpose()
            .map_err(ClassifyError::from)
    }

    /// Parsed exclusions, de-duplicated in order
    ///
    /// # Errors
    /// Returns error on the first unknown name
    pub fn excluded(&self) -> Result<Vec<PatternType>, ClassifyError> {
        let mut excluded = Vec::with_capacity(self.excluded_patterns.len());
        for name in &self.excluded_patterns {
            let pattern: PatternType = name.parse()?;
            if !excluded.contains(&pattern) {
                excluded.push(pattern);
            }
        }
        Ok(excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names() {
        let hints = ClassificationHints::new()
            .with_forced("agent")
            .with_excluded("rag")
            .with_excluded("RAG");
        assert_eq!(hints.forced().unwrap(), Some(PatternType::Agent));
        assert_eq!(hints.excluded().unwrap(), vec![PatternType::Rag]);
    }

    #[test]
    fn unknown_name_is_config_error() {
        let hints = ClassificationHints::new().with_excluded("pipeline");
        let err = hints.excluded().unwrap_err();
        assert_eq!(err.kind(), flowsmith_artifact::ErrorKind::Config);
    }
}
