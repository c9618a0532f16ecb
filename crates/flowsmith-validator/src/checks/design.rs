//! Design document rules

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use flowsmith_artifact::ArtifactRole;

/// Sections a design document is expected to carry
pub const REQUIRED_SECTIONS: [&str; 8] = [
    "Problem Statement",
    "Pattern",
    "Node Sequence",
    "Flow Diagram",
    "Data Contracts",
    "Utilities",
    "Dependencies",
    "Open Items",
];

/// Checks design document sections and diagram
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignDocCheck;

impl ArtifactCheck for DesignDocCheck {
    fn name(&self) -> &'static str {
        "design_doc"
    }

    fn applies_to(&self, role: ArtifactRole) -> bool {
        role == ArtifactRole::DesignDoc
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let Some(outline) = input.parsed.markdown() else {
            return Vec::new();
        };
        let id = input.artifact.id();
        let mut issues: Vec<ValidationIssue> = REQUIRED_SECTIONS
            .iter()
            .filter(|section| !outline.has_heading(section))
            .map(|section| {
                ValidationIssue::warning(
                    IssueCategory::MissingSection,
                    id.clone(),
                    format!("missing section '{section}'"),
                )
            })
            .collect();

        if outline.blocks_in("mermaid").next().is_none() {
            issues.push(ValidationIssue::warning(
                IssueCategory::MissingDiagram,
                id.clone(),
                "no mermaid diagram block",
            ));
        }
        issues
    }
}
