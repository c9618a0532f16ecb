//! Node module rules

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use crate::parsers::ClassDef;
use flowsmith_artifact::{ArtifactId, ArtifactRole};

/// Base classes a node may derive
pub const CAPABILITIES: [&str; 5] = [
    "Node",
    "BatchNode",
    "AsyncNode",
    "AsyncBatchNode",
    "AsyncParallelBatchNode",
];

/// Lifecycle phases with their arity, `self` included
const PHASES: [(&str, usize); 3] = [("prep", 2), ("exec", 2), ("post", 4)];

/// Names a compute phase must not touch
const FORBIDDEN_IN_COMPUTE: [&str; 3] = ["shared", "shared_state", "globals"];

/// Checks node classes and their lifecycle phases
#[derive(Debug, Clone, Copy, Default)]
pub struct NodesCheck;

impl ArtifactCheck for NodesCheck {
    fn name(&self) -> &'static str {
        "nodes"
    }

    fn applies_to(&self, role: ArtifactRole) -> bool {
        role == ArtifactRole::Nodes
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let Some(module) = input.parsed.python() else {
            return Vec::new();
        };
        let id = input.artifact.id();
        let classes = module.classes();
        if classes.is_empty() {
            return vec![ValidationIssue::error(
                IssueCategory::NoNodes,
                id.clone(),
                "no node classes declared",
            )];
        }

        let mut issues = Vec::new();
        for class in &classes {
            match capability(class) {
                Some(capability) => check_phases(class, capability, id, &mut issues),
                None => issues.push(
                    ValidationIssue::error(
                        IssueCategory::UnknownCapability,
                        id.clone(),
                        format!(
                            "class {} derives {} instead of one of {}",
                            class.name,
                            if class.bases.is_empty() {
                                "nothing".to_string()
                            } else {
                                class.bases.join(", ")
                            },
                            CAPABILITIES.join(", ")
                        ),
                    )
                    .at(class.location),
                ),
            }
        }
        issues
    }
}

fn capability(class: &ClassDef) -> Option<&str> {
    class
        .bases
        .iter()
        .map(|base| base.rsplit('.').next().unwrap_or(base))
        .find(|base| CAPABILITIES.contains(base))
}

fn check_phases(class: &ClassDef, capability: &str, id: &ArtifactId, issues: &mut Vec<ValidationIssue>) {
    let is_async = capability.starts_with("Async");
    for (phase, arity) in PHASES {
        let expected = if is_async {
            format!("{phase}_async")
        } else {
            phase.to_string()
        };

        let Some(method) = class.method(&expected) else {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::MissingLifecyclePhase,
                    id.clone(),
                    format!("{} ({capability}) does not define {expected}", class.name),
                )
                .at(class.location),
            );
            continue;
        };

        if method.is_async != is_async {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::MissingLifecyclePhase,
                    id.clone(),
                    format!(
                        "{}.{expected} must be declared with {}",
                        class.name,
                        if is_async { "async def" } else { "def" }
                    ),
                )
                .at(method.location),
            );
        }

        if method.arity != arity {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::PhaseArity,
                    id.clone(),
                    format!(
                        "{}.{expected} takes {} parameters, expected {arity}",
                        class.name, method.arity
                    ),
                )
                .at(method.location),
            );
        }

        if phase == "exec" {
            let touched: Vec<&str> = FORBIDDEN_IN_COMPUTE
                .iter()
                .copied()
                .filter(|name| method.references.contains(*name))
                .collect();
            if !touched.is_empty() || method.uses_global {
                let what = if touched.is_empty() {
                    "a global statement".to_string()
                } else {
                    touched.join(", ")
                };
                issues.push(
                    ValidationIssue::error(
                        IssueCategory::SharedStateInCompute,
                        id.clone(),
                        format!(
                            "{}.{expected} must only use its argument but references {what}",
                            class.name
                        ),
                    )
                    .at(method.location),
                );
            }
        }
    }
}
