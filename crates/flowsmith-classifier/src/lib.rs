//! Requirement classifier for flowsmith
//!
//! Turns free-text feature requirements into a ranked
//! [`PatternRecommendation`] by scoring them against the weighted indicator
//! sets of every catalog pattern.
//!
//! # Example
//!
//! ```
//! use flowsmith_catalog::PatternType;
//! use flowsmith_classifier::{ClassificationHints, Classifier};
//!
//! let classifier = Classifier::builtin().unwrap();
//! let rec = classifier
//!     .classify(
//!         "Search internal documents and answer user questions with retrieved context",
//!         &ClassificationHints::default(),
//!     )
//!     .unwrap();
//! assert_eq!(rec.primary(), PatternType::Rag);
//! ```

pub mod classifier;
pub mod config;
pub mod error;
pub mod hints;
mod matcher;
pub mod recommendation;

pub use classifier::Classifier;
pub use config::ClassifierConfig;
pub use error::ClassifyError;
pub use hints::ClassificationHints;
pub use matcher::normalize;
pub use recommendation::{PatternRecommendation, Route, SecondaryPattern};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
