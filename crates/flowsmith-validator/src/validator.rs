//! Structural validator

use crate::checks::{default_checks, ArtifactCheck, CheckInput};
use crate::config::ValidatorConfig;
use crate::error::ValidateError;
use crate::issue::{IssueCategory, Location, Severity, ValidationIssue, ValidationResult};
use crate::parsers::{python_parser, MarkdownOutline, Parsed, PythonModule};
use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId, SourceLanguage};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// Validates artifact bundles without executing them
#[derive(Debug)]
pub struct StructuralValidator {
    config: ValidatorConfig,
    checks: Vec<Box<dyn ArtifactCheck>>,
}

impl Default for StructuralValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl StructuralValidator {
    /// Validator with the standard checks
    #[must_use]
    pub fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            checks: default_checks(),
        }
    }

    /// Append a check after the standard set
    #[must_use]
    pub fn with_check(mut self, check: Box<dyn ArtifactCheck>) -> Self {
        self.checks.push(check);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a bundle
    ///
    /// Every artifact of the bundle gets an entry in the result, possibly
    /// empty. An artifact with a syntax error gets exactly one syntax issue
    /// and is skipped by the remaining checks.
    ///
    /// # Errors
    /// - [`ValidateError::TooManyArtifacts`] over the artifact cap
    /// - [`ValidateError::ResourceLimit`] for an artifact over the line cap
    /// - [`ValidateError::TooDeep`] for Python nested past the depth cap
    /// - [`ValidateError::ParserInit`] if the Python grammar cannot load
    pub fn validate(&self, bundle: &ArtifactBundle) -> Result<ValidationResult, ValidateError> {
        self.check_limits(bundle)?;
        let mut parser = python_parser()?;

        let mut issues: IndexMap<ArtifactId, Vec<ValidationIssue>> = IndexMap::new();
        let mut parsed: Vec<(&Artifact, Parsed<'_>)> = Vec::with_capacity(bundle.len());

        for artifact in bundle.iter() {
            let entry = issues.entry(artifact.id().clone()).or_default();
            match artifact.language() {
                SourceLanguage::Markdown => {
                    parsed.push((artifact, Parsed::Markdown(MarkdownOutline::parse(artifact.source()))));
                }
                SourceLanguage::Python => match PythonModule::parse(&mut parser, artifact.source()) {
                    Some(module) => {
                        let depth = module.depth();
                        if depth > self.config.max_nesting_depth {
                            return Err(ValidateError::TooDeep {
                                id: artifact.id().clone(),
                                depth,
                                limit: self.config.max_nesting_depth,
                            });
                        }
                        match module.syntax_error() {
                            Some(location) => entry.push(syntax_issue(artifact, location)),
                            None => parsed.push((artifact, Parsed::Python(module))),
                        }
                    }
                    None => entry.push(syntax_issue(artifact, Location { line: 1, column: 1 })),
                },
            }
        }

        let node_classes: Option<BTreeSet<String>> = parsed
            .iter()
            .find(|(artifact, _)| artifact.id() == &ArtifactId::Nodes)
            .and_then(|(_, p)| p.python())
            .map(|module| module.classes().into_iter().map(|c| c.name).collect());

        for (artifact, parsed) in &parsed {
            let input = CheckInput {
                artifact,
                parsed,
                node_classes: node_classes.as_ref(),
                config: &self.config,
            };
            let role = artifact.id().role();
            let entry = issues.entry(artifact.id().clone()).or_default();
            for check in self.checks.iter().filter(|c| c.applies_to(role)) {
                let found = check.check(&input);
                if !found.is_empty() {
                    tracing::debug!(
                        check = check.name(),
                        artifact = %artifact.id(),
                        issues = found.len(),
                        "check reported issues"
                    );
                }
                entry.extend(found);
            }
        }

        let result = ValidationResult::new(issues);
        tracing::info!(
            project = bundle.project(),
            artifacts = bundle.len(),
            errors = result.error_count(),
            warnings = result.count(Severity::Warning),
            valid = result.is_valid(),
            "bundle validated"
        );
        Ok(result)
    }

    fn check_limits(&self, bundle: &ArtifactBundle) -> Result<(), ValidateError> {
        if bundle.len() > self.config.max_artifacts {
            return Err(ValidateError::TooManyArtifacts {
                count: bundle.len(),
                limit: self.config.max_artifacts,
            });
        }
        for artifact in bundle.iter() {
            let lines = artifact.line_count();
            if lines > self.config.max_lines_per_artifact {
                return Err(ValidateError::ResourceLimit {
                    id: artifact.id().clone(),
                    lines,
                    limit: self.config.max_lines_per_artifact,
                });
            }
        }
        Ok(())
    }
}

fn syntax_issue(artifact: &Artifact, location: Location) -> ValidationIssue {
    ValidationIssue::error(
        IssueCategory::Syntax,
        artifact.id().clone(),
        format!("{} does not parse as Python", artifact.path()),
    )
    .at(location)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(nodes: &str, flow: &str) -> ArtifactBundle {
        ArtifactBundle::new("demo")
            .with_artifact(Artifact::python(ArtifactId::Nodes, "nodes.py", nodes))
            .with_artifact(Artifact::python(ArtifactId::Flow, "flow.py", flow))
    }

    const NODES: &str = "\
from pocketflow import Node


class Load(Node):
    def prep(self, shared):
        # TODO: read input
        return shared.get(\"input\")

    def exec(self, prep_res):
        return prep_res

    def post(self, shared, prep_res, exec_res):
        shared[\"load_result\"] = exec_res
";

    const FLOW: &str = "\
from pocketflow import Flow
from nodes import Load


def create_flow():
    # TODO: wire more nodes
    load = Load()
    return Flow(start=load)
";

    #[test]
    fn minimal_bundle_is_valid() {
        let result = StructuralValidator::default().validate(&bundle(NODES, FLOW)).unwrap();
        assert!(result.is_valid(), "{:?}", result.issues().collect::<Vec<_>>());
        assert_eq!(result.issues().count(), 0);
    }

    #[test]
    fn syntax_error_skips_structural_checks() {
        let result = StructuralValidator::default()
            .validate(&bundle("class Load(Node:\n    pass\n", FLOW))
            .unwrap();
        let nodes = result.issues_for(&ArtifactId::Nodes).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].category, IssueCategory::Syntax);
        assert!(nodes[0].location.is_some());

        // flow is still validated, but without the dangling check
        assert!(result
            .with_category(IssueCategory::CheckSkipped)
            .any(|i| i.artifact_id == ArtifactId::Flow));
    }

    #[test]
    fn line_cap_fails_fast() {
        let validator = StructuralValidator::new(ValidatorConfig::default().with_max_lines_per_artifact(3));
        let err = validator.validate(&bundle(NODES, FLOW)).unwrap_err();
        assert!(matches!(err, ValidateError::ResourceLimit { .. }));
        assert_eq!(err.kind(), flowsmith_artifact::ErrorKind::ResourceLimit);
    }

    #[test]
    fn deep_nesting_fails_fast() {
        let deep = format!("x = {}1{}\n", "(".repeat(50_000), ")".repeat(50_000));
        let bundle = bundle(NODES, FLOW).with_artifact(Artifact::python(
            ArtifactId::utility("deep"),
            "utils/deep.py",
            deep,
        ));
        let err = StructuralValidator::default().validate(&bundle).unwrap_err();
        assert!(matches!(
            &err,
            ValidateError::TooDeep { id, limit: 200, .. } if *id == ArtifactId::utility("deep")
        ));
        assert_eq!(err.kind(), flowsmith_artifact::ErrorKind::ResourceLimit);
    }

    #[test]
    fn depth_cap_is_configurable() {
        let validator =
            StructuralValidator::new(ValidatorConfig::default().with_max_nesting_depth(3));
        let err = validator.validate(&bundle(NODES, FLOW)).unwrap_err();
        assert!(matches!(err, ValidateError::TooDeep { limit: 3, .. }));
    }

    #[test]
    fn artifact_cap_fails_fast() {
        let validator = StructuralValidator::new(ValidatorConfig::default().with_max_artifacts(1));
        let err = validator.validate(&bundle(NODES, FLOW)).unwrap_err();
        assert!(matches!(err, ValidateError::TooManyArtifacts { count: 2, limit: 1 }));
    }
}
