//! Pattern catalog for flowsmith
//!
//! Holds the static mapping from architectural pattern to node templates,
//! conditional edges, utilities, state inputs and dependencies, the
//! exclusion table of incompatible pattern pairs, and the versioned
//! indicator tables the classifier scores against.
//!
//! # Example
//!
//! ```
//! use flowsmith_catalog::{PatternCatalog, PatternType};
//!
//! let catalog = PatternCatalog::builtin();
//! let nodes = catalog.get_templates(PatternType::Workflow);
//! assert_eq!(nodes.len(), 3);
//! assert!(catalog.is_excluded(PatternType::MapReduce, PatternType::Agent));
//! ```

mod builtin;
pub mod catalog;
pub mod error;
pub mod indicators;
pub mod pattern;
pub mod template;

pub use catalog::{Exclusion, PatternCatalog, PatternEntry, CATALOG_VERSION, DEFAULT_PATTERN};
pub use error::CatalogError;
pub use indicators::{Indicator, IndicatorTable};
pub use pattern::{Complexity, PatternType};
pub use template::{
    EdgeTemplate, FieldType, NodeTemplate, ProcessingMode, StateInput, UtilityTemplate,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
