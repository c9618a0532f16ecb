//! Placeholder quality
//!
//! Generated stubs are meant to be finished by a person. Every artifact
//! should carry a TODO/FIXME marker, and a marker-free function that already
//! looks complete is flagged for review.

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use flowsmith_artifact::ArtifactRole;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(TODO|FIXME)\b").expect("marker pattern is valid"));

/// Whether text carries a placeholder marker
#[must_use]
pub fn has_marker(text: &str) -> bool {
    MARKER.is_match(text)
}

/// Checks for placeholder markers in every artifact
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderCheck;

impl PlaceholderCheck {
    /// Create the check
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactCheck for PlaceholderCheck {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn applies_to(&self, _role: ArtifactRole) -> bool {
        true
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let id = input.artifact.id();
        let mut issues = Vec::new();
        if !has_marker(input.artifact.source()) {
            issues.push(ValidationIssue::warning(
                IssueCategory::MissingPlaceholder,
                id.clone(),
                "no TODO or FIXME marker left for the implementer",
            ));
        }

        let Some(module) = input.parsed.python() else {
            return issues;
        };
        let config = input.config;
        for function in module.functions() {
            let looks_complete = function.statements >= config.completion_min_statements
                || function.branches >= config.completion_min_branches;
            if looks_complete && !has_marker(&function.text) {
                issues.push(
                    ValidationIssue::warning(
                        IssueCategory::PossibleCompletion,
                        id.clone(),
                        format!(
                            "{} has {} statements and {} branches but no marker; \
                             it may have been implemented rather than stubbed",
                            function.name, function.statements, function.branches
                        ),
                    )
                    .at(function.location),
                );
            }
        }
        issues
    }
}
