//! Structural validator for flowsmith bundles
//!
//! Parses generated artifacts without executing them and reports
//! structural problems as [`ValidationIssue`] data: node lifecycle phases,
//! flow wiring, schema models, design document sections and placeholder
//! markers. Python sources are parsed with tree-sitter, markdown with
//! pulldown-cmark.
//!
//! # Example
//!
//! ```
//! use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId};
//! use flowsmith_validator::StructuralValidator;
//!
//! let bundle = ArtifactBundle::new("demo").with_artifact(Artifact::python(
//!     ArtifactId::utility("call_llm"),
//!     "utils/call_llm.py",
//!     "def call_llm(prompt: str) -> str:\n    # TODO: call a model\n    ...\n",
//! ));
//! let result = StructuralValidator::default().validate(&bundle).unwrap();
//! assert!(result.is_valid());
//! ```

pub mod checks;
pub mod config;
pub mod error;
pub mod issue;
pub mod parsers;
pub mod validator;

pub use checks::{ArtifactCheck, CheckInput};
pub use config::ValidatorConfig;
pub use error::ValidateError;
pub use issue::{IssueCategory, Location, Severity, ValidationIssue, ValidationResult};
pub use validator::StructuralValidator;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
