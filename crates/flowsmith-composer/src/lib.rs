//! Graph composer for flowsmith
//!
//! Expands a [`PatternRecommendation`](flowsmith_classifier::PatternRecommendation)
//! into a [`WorkflowGraph`] using catalog templates, renders the graph as a
//! Mermaid diagram, and generates the artifact bundle of a node-and-flow
//! scaffold: design document, shared-state schema, node stubs, flow assembly,
//! utility stubs and (for deeper scaffolds) smoke tests.
//!
//! # Example
//!
//! ```
//! use flowsmith_artifact::ArtifactId;
//! use flowsmith_catalog::PatternType;
//! use flowsmith_classifier::PatternRecommendation;
//! use flowsmith_composer::{GraphComposer, ProjectSpec};
//!
//! let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6);
//! let composition = GraphComposer::builtin()
//!     .compose(&rec, &ProjectSpec::new("report-builder"))
//!     .unwrap();
//! assert_eq!(composition.graph.node_count(), 3);
//! assert!(composition.bundle.get(&ArtifactId::Flow).is_some());
//! ```

pub mod composer;
pub mod contracts;
pub mod diagram;
pub mod error;
pub mod generate;
pub mod graph;
pub mod heuristics;
pub mod naming;
pub mod project;

pub use composer::{
    ComposeWarning, ComposerConfig, Composition, GraphComposer, DONE_LABEL, ERROR_LABEL,
    ERROR_NODE, SUCCESS_LABEL, TERMINAL_NODE,
};
pub use contracts::{derive_contracts, ContractField, DataContract, SHARED_STATE};
pub use diagram::{render_mermaid, MERMAID_HEADER};
pub use error::{ComposeError, GraphError};
pub use generate::{
    default_generators, ArtifactGenerator, GenerationContext, DESIGN_DOC_PATH, FLOW_PATH,
    INITIALIZER, NODES_PATH, SCHEMA_PATH, SECTIONS, TESTS_PATH, TODO_MARKER, UTILS_DIR,
};
pub use graph::{Edge, WorkflowGraph};
pub use project::ProjectSpec;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
