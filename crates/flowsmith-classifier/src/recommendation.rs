//! Classification output

use flowsmith_catalog::{Complexity, PatternType};
use serde::{Deserialize, Serialize};

/// A non-primary pattern that scored above the secondary threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryPattern {
    /// Pattern
    pub pattern: PatternType,
    /// Normalized score in [0, 1]
    pub score: f64,
    /// Indicator phrases that matched
    pub matched: Vec<String>,
}

/// Where a recommendation should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Too uncertain to scaffold directly; write the design document first
    ToDocumentation,
    /// Several capabilities to plan together (HYBRID, MULTI_AGENT)
    ToStrategicComposition,
    /// A single clear pattern
    ToDirectGeneration,
}

/// Ranked pattern recommendation for one requirement
///
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternRecommendation {
    primary: PatternType,
    confidence: f64,
    #[serde(default)]
    secondary: Vec<SecondaryPattern>,
    #[serde(default)]
    rationale: Vec<String>,
    #[serde(default)]
    ambiguous: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    components: Vec<PatternType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    complexity: Option<Complexity>,
}

impl PatternRecommendation {
    /// Recommendation for a single pattern
    ///
    /// Confidence is clipped to [0, 1].
    #[must_use]
    pub fn direct(primary: PatternType, confidence: f64) -> Self {
        Self {
            primary,
            confidence: confidence.clamp(0.0, 1.0),
            secondary: Vec::new(),
            rationale: Vec::new(),
            ambiguous: false,
            components: Vec::new(),
            complexity: None,
        }
    }

    /// HYBRID recommendation over the given components
    #[must_use]
    pub fn hybrid(components: Vec<PatternType>, confidence: f64) -> Self {
        Self {
            components,
            ..Self::direct(PatternType::Hybrid, confidence)
        }
    }

    /// With secondary patterns
    #[inline]
    #[must_use]
    pub fn with_secondary(mut self, secondary: Vec<SecondaryPattern>) -> Self {
        self.secondary = secondary;
        self
    }

    /// With a rationale line appended
    #[inline]
    #[must_use]
    pub fn with_rationale(mut self, line: impl Into<String>) -> Self {
        self.rationale.push(line.into());
        self
    }

    /// With ambiguity flag
    #[inline]
    #[must_use]
    pub fn with_ambiguous(mut self, ambiguous: bool) -> Self {
        self.ambiguous = ambiguous;
        self
    }

    /// With complexity hint carried forward
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: Option<Complexity>) -> Self {
        self.complexity = complexity;
        self
    }

    /// Primary pattern
    #[inline]
    #[must_use]
    pub fn primary(&self) -> PatternType {
        self.primary
    }

    /// Confidence in [0, 1]
    #[inline]
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Other patterns above the secondary threshold
    #[inline]
    #[must_use]
    pub fn secondary(&self) -> &[SecondaryPattern] {
        &self.secondary
    }

    /// Human-readable reasons
    #[inline]
    #[must_use]
    pub fn rationale(&self) -> &[String] {
        &self.rationale
    }

    /// Whether the top two scores were too close to call
    #[inline]
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// HYBRID components in priority order; empty otherwise
    #[inline]
    #[must_use]
    pub fn components(&self) -> &[PatternType] {
        &self.components
    }

    /// Complexity hint, if one was given
    #[inline]
    #[must_use]
    pub fn complexity(&self) -> Option<Complexity> {
        self.complexity
    }

    /// Patterns whose templates make up the graph
    ///
    /// The components for HYBRID, otherwise the primary alone.
    #[must_use]
    pub fn effective_patterns(&self) -> Vec<PatternType> {
        if self.primary.is_hybrid() {
            self.components.clone()
        } else {
            vec![self.primary]
        }
    }

    /// Routing decision
    ///
    /// Ambiguous or below-`threshold` recommendations go to documentation
    /// first; HYBRID and MULTI_AGENT need strategic composition; anything
    /// else is generated directly.
    #[must_use]
    pub fn route(&self, threshold: f64) -> Route {
        if self.ambiguous || self.confidence < threshold {
            Route::ToDocumentation
        } else if matches!(self.primary, PatternType::Hybrid | PatternType::MultiAgent) {
            Route::ToStrategicComposition
        } else {
            Route::ToDirectGeneration
        }
    }
}
