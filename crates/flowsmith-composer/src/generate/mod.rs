//! Artifact generators
//!
//! Each [`ArtifactGenerator`] renders one artifact role from a shared
//! [`GenerationContext`]. Generators are pure: the same context always
//! yields the same artifacts, byte for byte.

mod design_doc;
mod flow;
mod nodes;
mod schema;
mod tests_module;
mod utilities;

pub use design_doc::{DesignDocGenerator, DESIGN_DOC_PATH, SECTIONS};
pub use flow::{FlowGenerator, FLOW_PATH, INITIALIZER};
pub use nodes::{NodesGenerator, NODES_PATH};
pub use schema::{SchemaGenerator, SCHEMA_PATH};
pub use tests_module::{TestsGenerator, TESTS_PATH};
pub use utilities::{UtilityGenerator, UTILS_DIR};

use crate::contracts::DataContract;
use crate::graph::WorkflowGraph;
use crate::project::ProjectSpec;
use flowsmith_artifact::{Artifact, ArtifactRole, DependencyManifest};
use flowsmith_catalog::{Complexity, PatternType, StateInput, UtilityTemplate};
use flowsmith_classifier::PatternRecommendation;

/// Marker written into every generated stub
pub const TODO_MARKER: &str = "TODO";

/// Everything a generator may read
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    /// Project being scaffolded
    pub project: &'a ProjectSpec,
    /// Recommendation the graph was built from
    pub recommendation: &'a PatternRecommendation,
    /// Patterns whose templates were used
    pub patterns: &'a [PatternType],
    /// Composed graph
    pub graph: &'a WorkflowGraph,
    /// Utilities after custom overrides
    pub utilities: &'a [UtilityTemplate],
    /// Inputs expected in the shared store
    pub state_inputs: &'a [StateInput],
    /// Derived data contracts
    pub contracts: &'a [DataContract],
    /// Dependency manifest
    pub dependencies: &'a DependencyManifest,
    /// Effective scaffold depth
    pub complexity: Complexity,
}

/// Renders artifacts for one role
pub trait ArtifactGenerator: Send + Sync + std::fmt::Debug {
    /// Role of the artifacts produced
    fn role(&self) -> ArtifactRole;

    /// Render artifacts; may be empty when the role does not apply
    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact>;

    /// Generator name (for logs)
    fn name(&self) -> &'static str;
}

/// The standard generator set, in bundle order
#[must_use]
pub fn default_generators() -> Vec<Box<dyn ArtifactGenerator>> {
    vec![
        Box::new(DesignDocGenerator),
        Box::new(SchemaGenerator),
        Box::new(NodesGenerator),
        Box::new(FlowGenerator),
        Box::new(UtilityGenerator),
        Box::new(TestsGenerator),
    ]
}

/// Indentation-aware text builder
#[derive(Debug, Default)]
pub(crate) struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    const INDENT: &'static str = "    ";

    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write one line at the current depth
    pub(crate) fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.depth {
                self.buf.push_str(Self::INDENT);
            }
            self.buf.push_str(text);
        }
        self.buf.push('\n');
        self
    }

    pub(crate) fn blank(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    pub(crate) fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub(crate) fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}
