//! Structural checks
//!
//! Each [`ArtifactCheck`] inspects one parsed artifact and returns issues.
//! Checks never fail: anything they find is data.

mod design;
mod flow;
mod nodes;
mod placeholder;
mod schema;
mod utility;

pub use design::{DesignDocCheck, REQUIRED_SECTIONS};
pub use flow::FlowCheck;
pub use nodes::{NodesCheck, CAPABILITIES};
pub use placeholder::{has_marker, PlaceholderCheck};
pub use schema::SchemaCheck;
pub use utility::UtilityCheck;

use crate::config::ValidatorConfig;
use crate::issue::ValidationIssue;
use crate::parsers::Parsed;
use flowsmith_artifact::{Artifact, ArtifactRole};
use std::collections::BTreeSet;

/// Everything a check may read
#[derive(Debug, Clone, Copy)]
pub struct CheckInput<'a> {
    /// Artifact under check
    pub artifact: &'a Artifact,
    /// Its parsed form
    pub parsed: &'a Parsed<'a>,
    /// Node classes declared by the bundle's nodes artifact, if it parsed
    pub node_classes: Option<&'a BTreeSet<String>>,
    /// Validator configuration
    pub config: &'a ValidatorConfig,
}

/// One structural rule set
pub trait ArtifactCheck: Send + Sync + std::fmt::Debug {
    /// Check name (for logs)
    fn name(&self) -> &'static str;

    /// Whether the check applies to artifacts of a role
    fn applies_to(&self, role: ArtifactRole) -> bool;

    /// Inspect one artifact
    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue>;
}

/// The standard check set
#[must_use]
pub fn default_checks() -> Vec<Box<dyn ArtifactCheck>> {
    vec![
        Box::new(NodesCheck),
        Box::new(FlowCheck),
        Box::new(SchemaCheck),
        Box::new(DesignDocCheck),
        Box::new(UtilityCheck),
        Box::new(PlaceholderCheck::new()),
    ]
}
