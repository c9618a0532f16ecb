//! Utility module rules

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use flowsmith_artifact::ArtifactRole;

/// Checks that a utility module defines a function
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityCheck;

impl ArtifactCheck for UtilityCheck {
    fn name(&self) -> &'static str {
        "utility"
    }

    fn applies_to(&self, role: ArtifactRole) -> bool {
        role == ArtifactRole::Utility
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let Some(module) = input.parsed.python() else {
            return Vec::new();
        };
        if module.top_level_functions().is_empty() {
            vec![ValidationIssue::warning(
                IssueCategory::NoFunction,
                input.artifact.id().clone(),
                "utility module defines no function",
            )]
        } else {
            Vec::new()
        }
    }
}
