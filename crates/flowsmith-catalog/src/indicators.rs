//! Versioned indicator tables
//!
//! Indicator weights live in YAML so scoring can be tuned and
//! regression-tested without touching classification control flow. The
//! built-in table is embedded at compile time; alternative tables load from
//! a string or a file.

use crate::error::CatalogError;
use crate::pattern::PatternType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUILTIN_INDICATORS: &str = include_str!("../data/indicators.yaml");

/// One weighted phrase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    /// Phrase; a trailing `*` marks a word-prefix stem
    pub phrase: String,
    /// Strictly positive weight
    pub weight: f64,
}

impl Indicator {
    /// Create an indicator
    #[inline]
    #[must_use]
    pub fn new(phrase: impl Into<String>, weight: f64) -> Self {
        Self {
            phrase: phrase.into(),
            weight,
        }
    }

    /// Whether the phrase is a word-prefix stem
    #[inline]
    #[must_use]
    pub fn is_stem(&self) -> bool {
        self.phrase.ends_with('*')
    }

    /// Phrase text without the stem marker, lowercased
    #[must_use]
    pub fn text(&self) -> String {
        self.phrase.trim_end_matches('*').trim().to_lowercase()
    }
}

/// Indicator sets for every scored pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorTable {
    /// Data revision
    pub version: u32,
    /// Coordinating cues signalling multi-capability intent
    #[serde(default)]
    pub conjunctions: Vec<String>,
    /// Weighted phrases per pattern
    pub patterns: IndexMap<PatternType, Vec<Indicator>>,
}

impl IndicatorTable {
    /// The embedded table
    ///
    /// # Errors
    /// Returns error if the embedded data is malformed
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_INDICATORS)
    }

    /// Parse and validate a table
    ///
    /// # Errors
    /// Returns error on malformed YAML or a constraint violation
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let table: IndicatorTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a table file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is invalid
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Check table constraints
    ///
    /// # Errors
    /// Returns error if a set is empty, a phrase is blank, a weight is not
    /// strictly positive, or HYBRID carries indicators
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.patterns.is_empty() {
            return Err(CatalogError::InvalidIndicators(
                "no pattern indicator sets".to_string(),
            ));
        }
        for (pattern, indicators) in &self.patterns {
            if pattern.is_hybrid() {
                return Err(CatalogError::InvalidIndicators(
                    "HYBRID is derived and cannot carry indicators".to_string(),
                ));
            }
            if indicators.is_empty() {
                return Err(CatalogError::InvalidIndicators(format!(
                    "{pattern} has an empty indicator set"
                )));
            }
            for indicator in indicators {
                if indicator.text().is_empty() {
                    return Err(CatalogError::InvalidIndicators(format!(
                        "{pattern} has a blank phrase"
                    )));
                }
                if !(indicator.weight.is_finite() && indicator.weight > 0.0) {
                    return Err(CatalogError::InvalidIndicators(format!(
                        "{pattern} phrase '{}' has non-positive weight {}",
                        indicator.phrase, indicator.weight
                    )));
                }
            }
        }
        if self.conjunctions.iter().any(|c| c.trim().is_empty()) {
            return Err(CatalogError::InvalidIndicators(
                "blank conjunction cue".to_string(),
            ));
        }
        Ok(())
    }

    /// Indicators of a pattern
    #[inline]
    #[must_use]
    pub fn indicators(&self, pattern: PatternType) -> &[Indicator] {
        self.patterns.get(&pattern).map_or(&[], Vec::as_slice)
    }

    /// Sum of all weights of a pattern's set
    #[must_use]
    pub fn total_weight(&self, pattern: PatternType) -> f64 {
        self.indicators(pattern).iter().map(|i| i.weight).sum()
    }

    /// Scored patterns in table order
    #[must_use]
    pub fn patterns(&self) -> Vec<PatternType> {
        self.patterns.keys().copied().collect()
    }
}
