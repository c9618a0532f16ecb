//! Validator limits and thresholds

use serde::{Deserialize, Serialize};

/// Structural validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Largest artifact accepted, in lines
    pub max_lines_per_artifact: usize,
    /// Largest bundle accepted, in artifacts
    pub max_artifacts: usize,
    /// Deepest Python syntax tree accepted
    pub max_nesting_depth: usize,
    /// Statements in a marker-free function that suggest a finished body
    pub completion_min_statements: usize,
    /// Branching constructs in a marker-free function that suggest a finished body
    pub completion_min_branches: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_lines_per_artifact: 5_000,
            max_artifacts: 256,
            max_nesting_depth: 200,
            completion_min_statements: 8,
            completion_min_branches: 3,
        }
    }
}

impl ValidatorConfig {
    /// With per-artifact line cap
    #[inline]
    #[must_use]
    pub fn with_max_lines_per_artifact(mut self, lines: usize) -> Self {
        self.max_lines_per_artifact = lines;
        self
    }

    /// With bundle artifact cap
    #[inline]
    #[must_use]
    pub fn with_max_artifacts(mut self, artifacts: usize) -> Self {
        self.max_artifacts = artifacts;
        self
    }

    /// With syntax-tree depth cap
    #[inline]
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// With completion heuristic thresholds
    #[inline]
    #[must_use]
    pub fn with_completion_thresholds(mut self, statements: usize, branches: usize) -> Self {
        self.completion_min_statements = statements;
        self.completion_min_branches = branches;
        self
    }
}
