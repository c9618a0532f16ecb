//! Classifier thresholds and limits

use crate::error::ClassifyError;
use serde::{Deserialize, Serialize};

/// Tunable classification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Largest accepted requirement text, in bytes
    pub max_requirement_bytes: usize,
    /// Minimum score for a secondary or hybrid component pattern
    pub secondary_threshold: f64,
    /// Top-two score gap under which the result is ambiguous
    pub ambiguity_epsilon: f64,
    /// Most components a HYBRID recommendation carries
    pub max_hybrid_components: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_requirement_bytes: 16 * 1024,
            secondary_threshold: 0.25,
            ambiguity_epsilon: 0.05,
            max_hybrid_components: 3,
        }
    }
}

impl ClassifierConfig {
    /// With size cap
    #[inline]
    #[must_use]
    pub fn with_max_requirement_bytes(mut self, bytes: usize) -> Self {
        self.max_requirement_bytes = bytes;
        self
    }

    /// With secondary threshold
    #[inline]
    #[must_use]
    pub fn with_secondary_threshold(mut self, threshold: f64) -> Self {
        self.secondary_threshold = threshold;
        self
    }

    /// With ambiguity epsilon
    #[inline]
    #[must_use]
    pub fn with_ambiguity_epsilon(mut self, epsilon: f64) -> Self {
        self.ambiguity_epsilon = epsilon;
        self
    }

    /// With hybrid component cap
    #[inline]
    #[must_use]
    pub fn with_max_hybrid_components(mut self, max: usize) -> Self {
        self.max_hybrid_components = max;
        self
    }

    /// Check ranges
    ///
    /// # Errors
    /// Returns [`ClassifyError::InvalidConfig`] naming the first bad value
    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.max_requirement_bytes == 0 {
            return Err(ClassifyError::InvalidConfig(
                "max_requirement_bytes must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.secondary_threshold) {
            return Err(ClassifyError::InvalidConfig(format!(
                "secondary_threshold {} is outside [0, 1]",
                self.secondary_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.ambiguity_epsilon) {
            return Err(ClassifyError::InvalidConfig(format!(
                "ambiguity_epsilon {} is outside [0, 1]",
                self.ambiguity_epsilon
            )));
        }
        if self.max_hybrid_components < 2 {
            return Err(ClassifyError::InvalidConfig(
                "max_hybrid_components must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ClassifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_requirement_bytes, 16384);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(ClassifierConfig::default()
            .with_secondary_threshold(1.5)
            .validate()
            .is_err());
        assert!(ClassifierConfig::default()
            .with_max_hybrid_components(1)
            .validate()
            .is_err());
        assert!(ClassifierConfig::default()
            .with_max_requirement_bytes(0)
            .validate()
            .is_err());
    }
}
