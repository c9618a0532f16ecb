//! Validation issues and results

use flowsmith_artifact::ArtifactId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational
    Info,
    /// Should be looked at
    Warning,
    /// Makes the bundle invalid
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// What kind of problem an issue reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    /// Source does not parse
    Syntax,
    /// Node class derives an unknown base
    UnknownCapability,
    /// Node class lacks a lifecycle phase
    MissingLifecyclePhase,
    /// Lifecycle phase has the wrong number of parameters
    PhaseArity,
    /// Compute phase reaches into shared or global state
    SharedStateInCompute,
    /// Nodes module declares no node class
    NoNodes,
    /// Flow module lacks a single aggregate
    FlowAggregate,
    /// Flow module lacks an initializer
    MissingInitializer,
    /// Flow module declares no node instance
    NoNodeInstances,
    /// Flow start is not a declared instance
    InvalidStart,
    /// Edge endpoint does not resolve to a declared node class
    DanglingEdge,
    /// Instance of a class the nodes module does not declare
    UnknownNodeClass,
    /// Node cannot be reached from the start node
    UnreachableNode,
    /// A check was skipped
    CheckSkipped,
    /// Schema class does not derive `BaseModel`
    SchemaBase,
    /// Schema class declares no annotated field
    EmptySchema,
    /// Design document lacks a required section
    MissingSection,
    /// Design document lacks a mermaid diagram
    MissingDiagram,
    /// Utility module defines no function
    NoFunction,
    /// Artifact has no TODO/FIXME marker
    MissingPlaceholder,
    /// A marker-free function looks fully implemented
    PossibleCompletion,
}

impl IssueCategory {
    /// Canonical kebab-case name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Syntax => "syntax",
            IssueCategory::UnknownCapability => "unknown-capability",
            IssueCategory::MissingLifecyclePhase => "missing-lifecycle-phase",
            IssueCategory::PhaseArity => "phase-arity",
            IssueCategory::SharedStateInCompute => "shared-state-in-compute",
            IssueCategory::NoNodes => "no-nodes",
            IssueCategory::FlowAggregate => "flow-aggregate",
            IssueCategory::MissingInitializer => "missing-initializer",
            IssueCategory::NoNodeInstances => "no-node-instances",
            IssueCategory::InvalidStart => "invalid-start",
            IssueCategory::DanglingEdge => "dangling-edge",
            IssueCategory::UnknownNodeClass => "unknown-node-class",
            IssueCategory::UnreachableNode => "unreachable-node",
            IssueCategory::CheckSkipped => "check-skipped",
            IssueCategory::SchemaBase => "schema-base",
            IssueCategory::EmptySchema => "empty-schema",
            IssueCategory::MissingSection => "missing-section",
            IssueCategory::MissingDiagram => "missing-diagram",
            IssueCategory::NoFunction => "no-function",
            IssueCategory::MissingPlaceholder => "missing-placeholder",
            IssueCategory::PossibleCompletion => "possible-completion",
        }
    }
}

impl Display for IssueCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1-based source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line
    pub line: usize,
    /// Column
    pub column: usize,
}

impl Location {
    /// Location from a tree-sitter point (0-based)
    #[inline]
    #[must_use]
    pub fn from_point(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One finding in one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Severity
    pub severity: Severity,
    /// Category
    pub category: IssueCategory,
    /// Human-readable explanation
    pub message: String,
    /// Artifact the issue belongs to
    pub artifact_id: ArtifactId,
    /// Position, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ValidationIssue {
    /// Create an issue without a location
    #[must_use]
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        artifact_id: ArtifactId,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            artifact_id,
            location: None,
        }
    }

    /// Error-severity issue
    #[must_use]
    pub fn error(category: IssueCategory, artifact_id: ArtifactId, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, category, artifact_id, message)
    }

    /// Warning-severity issue
    #[must_use]
    pub fn warning(category: IssueCategory, artifact_id: ArtifactId, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, category, artifact_id, message)
    }

    /// Info-severity issue
    #[must_use]
    pub fn info(category: IssueCategory, artifact_id: ArtifactId, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, category, artifact_id, message)
    }

    /// With location
    #[inline]
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Whether this issue invalidates the bundle
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.severity, self.category, self.artifact_id)?;
        if let Some(location) = self.location {
            write!(f, ":{location}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Issues for every artifact of a bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    issues: IndexMap<ArtifactId, Vec<ValidationIssue>>,
    valid: bool,
}

impl ValidationResult {
    /// Build a result; `valid` is derived from the issues
    #[must_use]
    pub fn new(issues: IndexMap<ArtifactId, Vec<ValidationIssue>>) -> Self {
        let valid = !issues.values().flatten().any(ValidationIssue::is_error);
        Self { issues, valid }
    }

    /// True iff no error-severity issue was found
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Issues of one artifact; `None` if the artifact was not in the bundle
    #[must_use]
    pub fn issues_for(&self, id: &ArtifactId) -> Option<&[ValidationIssue]> {
        self.issues.get(id).map(Vec::as_slice)
    }

    /// Per-artifact issue lists, in bundle order
    #[inline]
    #[must_use]
    pub fn by_artifact(&self) -> &IndexMap<ArtifactId, Vec<ValidationIssue>> {
        &self.issues
    }

    /// Every issue, in bundle order
    pub fn issues(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.values().flatten()
    }

    /// Issues of one category
    pub fn with_category(&self, category: IssueCategory) -> impl Iterator<Item = &ValidationIssue> {
        self.issues().filter(move |i| i.category == category)
    }

    /// Number of issues at a severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.issues().filter(|i| i.severity == severity).count()
    }

    /// Number of error-severity issues
    #[inline]
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }
}
