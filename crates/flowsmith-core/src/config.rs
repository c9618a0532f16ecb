//! Pipeline configuration
//!
//! One TOML document with a section per stage. Every section and field is
//! optional; missing values take their defaults.
//!
//! ```toml
//! indicator_table = "indicators.yaml"
//!
//! [classifier]
//! secondary_threshold = 0.3
//!
//! [controller]
//! confidence_threshold = 0.5
//! ```

use crate::error::{PipelineError, PipelineResult};
use flowsmith_catalog::{IndicatorTable, PatternCatalog};
use flowsmith_classifier::{Classifier, ClassifierConfig};
use flowsmith_composer::{ComposerConfig, GraphComposer};
use flowsmith_validator::{StructuralValidator, ValidatorConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Controller thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Minimum recommendation confidence for a run to finish without review
    pub confidence_threshold: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.3,
        }
    }
}

impl ControllerConfig {
    /// With confidence threshold
    #[inline]
    #[must_use]
    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

/// Configuration for the whole pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowsmithConfig {
    /// Classifier thresholds and limits
    pub classifier: ClassifierConfig,
    /// Composer limits
    pub composer: ComposerConfig,
    /// Validator limits
    pub validator: ValidatorConfig,
    /// Controller thresholds
    pub controller: ControllerConfig,
    /// Indicator table to use instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator_table: Option<PathBuf>,
}

impl FlowsmithConfig {
    /// Default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML text
    ///
    /// # Errors
    /// - [`PipelineError::ConfigParse`] for malformed TOML
    /// - [`PipelineError::InvalidConfig`] for an out-of-range value
    pub fn from_toml_str(text: &str) -> PipelineResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// A relative `indicator_table` path is resolved against the file's
    /// directory.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not parse
    pub fn from_path(path: impl AsRef<Path>) -> PipelineResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PipelineError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text)?;
        if let (Some(table), Some(dir)) = (config.indicator_table.as_mut(), path.parent()) {
            if table.is_relative() {
                *table = dir.join(&*table);
            }
        }
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// With classifier section
    #[inline]
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// With composer section
    #[inline]
    #[must_use]
    pub fn with_composer(mut self, composer: ComposerConfig) -> Self {
        self.composer = composer;
        self
    }

    /// With validator section
    #[inline]
    #[must_use]
    pub fn with_validator(mut self, validator: ValidatorConfig) -> Self {
        self.validator = validator;
        self
    }

    /// With controller section
    #[inline]
    #[must_use]
    pub fn with_controller(mut self, controller: ControllerConfig) -> Self {
        self.controller = controller;
        self
    }

    /// With an indicator table file
    #[inline]
    #[must_use]
    pub fn with_indicator_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.indicator_table = Some(path.into());
        self
    }

    /// Check ranges the stage constructors do not cover
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidConfig`] naming the first bad value
    pub fn validate(&self) -> PipelineResult<()> {
        let threshold = self.controller.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(PipelineError::InvalidConfig(format!(
                "confidence_threshold {threshold} is outside [0, 1]"
            )));
        }
        if self.composer.max_nodes == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_nodes must be positive".to_string(),
            ));
        }
        if self.validator.max_artifacts == 0
            || self.validator.max_lines_per_artifact == 0
            || self.validator.max_nesting_depth == 0
        {
            return Err(PipelineError::InvalidConfig(
                "validator limits must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Indicator table in effect
    ///
    /// # Errors
    /// Returns error if the configured file is missing or malformed
    pub fn load_indicators(&self) -> PipelineResult<IndicatorTable> {
        let table = match &self.indicator_table {
            Some(path) => IndicatorTable::from_path(path)?,
            None => IndicatorTable::builtin()?,
        };
        Ok(table)
    }

    /// Classifier over the built-in catalog
    ///
    /// # Errors
    /// Returns error for a bad indicator table or classifier section
    pub fn classifier(&self) -> PipelineResult<Classifier<'static>> {
        let table = self.load_indicators()?;
        Ok(Classifier::new(
            PatternCatalog::builtin(),
            &table,
            self.classifier.clone(),
        )?)
    }

    /// Composer over the built-in catalog
    #[must_use]
    pub fn composer(&self) -> GraphComposer<'static> {
        GraphComposer::new(PatternCatalog::builtin(), self.composer.clone())
    }

    /// Validator with the standard checks
    #[must_use]
    pub fn validator(&self) -> StructuralValidator {
        StructuralValidator::new(self.validator.clone())
    }
}
