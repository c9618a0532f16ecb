//! Per-run coordination state

use crate::state_machine::Phase;
use chrono::{DateTime, Utc};
use flowsmith_artifact::ErrorKind;
use flowsmith_catalog::Complexity;
use flowsmith_classifier::{ClassificationHints, PatternRecommendation, Route};
use flowsmith_composer::{ComposeWarning, Composition, ProjectSpec};
use flowsmith_validator::ValidationResult;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use ulid::Ulid;

/// Identifier of one coordination run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Ulid);

impl RunId {
    /// Fresh id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Wrapped ULID
    #[inline]
    #[must_use]
    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for RunId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for RunId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}

/// Caller instruction that re-enters classification
///
/// Pattern names stay textual so an unknown name fails the re-run with a
/// configuration error instead of at deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Override {
    /// Pattern to force
    pub forced_pattern: Option<String>,
    /// Patterns to add to the exclusions
    pub excluded_patterns: Vec<String>,
    /// Complexity to request
    pub complexity: Option<Complexity>,
    /// Replacement requirement text
    pub requirement: Option<String>,
}

impl Override {
    /// Empty override
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Force a pattern
    #[inline]
    #[must_use]
    pub fn force(mut self, pattern: impl Into<String>) -> Self {
        self.forced_pattern = Some(pattern.into());
        self
    }

    /// Exclude a pattern
    #[inline]
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.excluded_patterns.push(pattern.into());
        self
    }

    /// Request a complexity
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = Some(complexity);
        self
    }

    /// Replace the requirement text
    #[inline]
    #[must_use]
    pub fn with_requirement(mut self, text: impl Into<String>) -> Self {
        self.requirement = Some(text.into());
        self
    }

    /// Whether applying this override changes `current`
    #[must_use]
    pub fn changes_requirement(&self, current: &str) -> bool {
        self.requirement.as_deref().is_some_and(|text| text != current)
    }

    /// Hints after applying this override to `hints`
    ///
    /// Forced pattern and complexity replace; exclusions accumulate.
    #[must_use]
    pub fn apply(&self, hints: &ClassificationHints) -> ClassificationHints {
        let mut next = hints.clone();
        if let Some(forced) = &self.forced_pattern {
            next.forced_pattern = Some(forced.clone());
        }
        for name in &self.excluded_patterns {
            if !next.excluded_patterns.contains(name) {
                next.excluded_patterns.push(name.clone());
            }
        }
        if let Some(complexity) = self.complexity {
            next.complexity = Some(complexity);
        }
        next
    }
}

/// An accepted override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRecord {
    /// What the caller asked for
    #[serde(rename = "override")]
    pub applied: Override,
    /// When it was accepted
    pub applied_at: DateTime<Utc>,
}

/// Failure of the most recent re-run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Failure kind
    pub kind: ErrorKind,
    /// Rendered error
    pub message: String,
    /// When it happened
    pub at: DateTime<Utc>,
}

/// Everything the controller knows about one run
///
/// Only the controller mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinationContext {
    /// Run id
    pub run_id: RunId,
    /// Current phase
    pub phase: Phase,
    /// Requirement text in effect
    pub requirement: String,
    /// Hints in effect
    pub hints: ClassificationHints,
    /// Project being scaffolded
    pub project: ProjectSpec,
    /// Latest recommendation
    pub recommendation: Option<PatternRecommendation>,
    /// Latest composition
    pub composition: Option<Composition>,
    /// Latest validation result
    pub validation: Option<ValidationResult>,
    /// Accepted overrides, oldest first
    pub override_history: Vec<OverrideRecord>,
    /// Why the run waits for an override
    pub blocked_reason: Option<String>,
    /// Failure of the last re-run
    pub last_failure: Option<FailureRecord>,
}

impl CoordinationContext {
    /// Fresh context in [`Phase::Analyzing`]
    #[must_use]
    pub fn new(
        requirement: impl Into<String>,
        hints: ClassificationHints,
        project: ProjectSpec,
    ) -> Self {
        Self {
            run_id: RunId::new(),
            phase: Phase::Analyzing,
            requirement: requirement.into(),
            hints,
            project,
            recommendation: None,
            composition: None,
            validation: None,
            override_history: Vec::new(),
            blocked_reason: None,
            last_failure: None,
        }
    }

    /// Most recent accepted override
    #[inline]
    #[must_use]
    pub fn last_override(&self) -> Option<&Override> {
        self.override_history.last().map(|r| &r.applied)
    }

    /// Drop the outputs of the previous pass
    pub(crate) fn clear_outputs(&mut self) {
        self.recommendation = None;
        self.composition = None;
        self.validation = None;
        self.blocked_reason = None;
    }

    /// Move the outputs of the previous pass out, leaving none
    pub(crate) fn take_outputs(&mut self) -> PassOutputs {
        PassOutputs {
            recommendation: self.recommendation.take(),
            composition: self.composition.take(),
            validation: self.validation.take(),
            blocked_reason: self.blocked_reason.take(),
        }
    }

    /// Put back outputs taken by [`Self::take_outputs`]
    pub(crate) fn restore_outputs(&mut self, outputs: PassOutputs) {
        self.recommendation = outputs.recommendation;
        self.composition = outputs.composition;
        self.validation = outputs.validation;
        self.blocked_reason = outputs.blocked_reason;
    }

    /// Point-in-time view
    #[must_use]
    pub fn status(&self, confidence_threshold: f64) -> RunStatus {
        RunStatus {
            run_id: self.run_id,
            phase: self.phase,
            route: self
                .recommendation
                .as_ref()
                .map(|r| r.route(confidence_threshold)),
            recommendation: self.recommendation.clone(),
            validation: self.validation.clone(),
            fingerprint: self
                .composition
                .as_ref()
                .map(|c| c.bundle.fingerprint().to_string()),
            warnings: self
                .composition
                .as_ref()
                .map(|c| c.warnings.clone())
                .unwrap_or_default(),
            blocked_reason: self.blocked_reason.clone(),
            last_failure: self.last_failure.clone(),
            overrides: self.override_history.len(),
        }
    }
}

/// Outputs of one pass, held aside while another pass runs
#[derive(Debug, Clone, Default)]
pub(crate) struct PassOutputs {
    recommendation: Option<PatternRecommendation>,
    composition: Option<Composition>,
    validation: Option<ValidationResult>,
    blocked_reason: Option<String>,
}

/// Snapshot returned by `get_status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    /// Run id
    pub run_id: RunId,
    /// Phase at snapshot time
    pub phase: Phase,
    /// Routing decision for the recommendation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<Route>,
    /// Latest recommendation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<PatternRecommendation>,
    /// Latest validation result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    /// Bundle fingerprint, hex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    /// Composer warnings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ComposeWarning>,
    /// Why the run waits for an override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
    /// Failure of the last re-run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_failure: Option<FailureRecord>,
    /// Accepted overrides
    pub overrides: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_id_parses_back() {
        let id = RunId::new();
        let parsed: RunId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-ulid".parse::<RunId>().is_err());
    }

    #[test]
    fn override_apply_accumulates_exclusions() {
        let hints = ClassificationHints::new().with_excluded("RAG");
        let next = Override::new()
            .force("TOOL")
            .exclude("rag")
            .exclude("RAG")
            .exclude("AGENT")
            .with_complexity(Complexity::Advanced)
            .apply(&hints);
        assert_eq!(next.forced_pattern.as_deref(), Some("TOOL"));
        assert_eq!(next.excluded_patterns, vec!["RAG", "rag", "AGENT"]);
        assert_eq!(next.complexity, Some(Complexity::Advanced));

        // the original is untouched
        assert_eq!(hints.excluded_patterns, vec!["RAG"]);
    }

    #[test]
    fn requirement_change_detection() {
        let same = Override::new().with_requirement("Summarize tickets");
        assert!(!same.changes_requirement("Summarize tickets"));
        assert!(same.changes_requirement("Summarize emails"));
        assert!(!Override::new().changes_requirement("anything"));
    }

    #[test]
    fn override_serializes_under_its_name() {
        let record = OverrideRecord {
            applied: Override::new().force("AGENT"),
            applied_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["override"]["forced_pattern"], "AGENT");
    }

    #[test]
    fn taken_outputs_restore_in_place() {
        let mut ctx = CoordinationContext::new(
            "Summarize tickets",
            ClassificationHints::default(),
            ProjectSpec::new("demo"),
        );
        ctx.blocked_reason = Some("confidence 0.40 is below 0.60".to_string());
        let before = ctx.clone();

        let outputs = ctx.take_outputs();
        assert!(ctx.blocked_reason.is_none());
        ctx.restore_outputs(outputs);
        assert_eq!(ctx, before);
    }
}
