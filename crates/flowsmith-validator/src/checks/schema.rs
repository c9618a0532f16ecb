//! Schema module rules

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use flowsmith_artifact::ArtifactRole;

/// Base every contract must derive
const MODEL_BASE: &str = "BaseModel";

/// Checks that every contract is a pydantic model with fields
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCheck;

impl ArtifactCheck for SchemaCheck {
    fn name(&self) -> &'static str {
        "schema"
    }

    fn applies_to(&self, role: ArtifactRole) -> bool {
        role == ArtifactRole::Schema
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let Some(module) = input.parsed.python() else {
            return Vec::new();
        };
        let id = input.artifact.id();
        let mut issues = Vec::new();
        for class in module.classes() {
            let is_model = class
                .bases
                .iter()
                .any(|b| b.rsplit('.').next() == Some(MODEL_BASE));
            if !is_model {
                issues.push(
                    ValidationIssue::error(
                        IssueCategory::SchemaBase,
                        id.clone(),
                        format!("{} does not derive {MODEL_BASE}", class.name),
                    )
                    .at(class.location),
                );
            }
            if class.fields.is_empty() {
                issues.push(
                    ValidationIssue::error(
                        IssueCategory::EmptySchema,
                        id.clone(),
                        format!("{} declares no annotated field", class.name),
                    )
                    .at(class.location),
                );
            }
        }
        issues
    }
}
