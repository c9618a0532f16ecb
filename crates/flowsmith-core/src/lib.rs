//! Flowsmith core
//!
//! Ties the pipeline together:
//! - [`CoordinationController`]: runs requirements through classification,
//!   composition and validation, and applies caller overrides
//! - [`FlowsmithConfig`]: TOML configuration for every stage
//! - [`PipelineError`]: failures of a whole run, with their [`ErrorKind`]
//!
//! # Example
//!
//! ```
//! use flowsmith_classifier::ClassificationHints;
//! use flowsmith_composer::ProjectSpec;
//! use flowsmith_core::{CoordinationController, Phase};
//!
//! let controller = CoordinationController::builtin().unwrap();
//! let run_id = controller
//!     .submit(
//!         "Search internal documents and answer user questions with retrieved context",
//!         ClassificationHints::default(),
//!         ProjectSpec::new("doc-search"),
//!     )
//!     .unwrap();
//! assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::Done);
//! ```

pub mod config;
pub mod context;
pub mod controller;
pub mod error;
pub mod state_machine;

pub use config::{ControllerConfig, FlowsmithConfig};
pub use context::{
    CoordinationContext, FailureRecord, Override, OverrideRecord, RunId, RunStatus,
};
pub use controller::CoordinationController;
pub use error::{PipelineError, PipelineResult};
pub use flowsmith_artifact::ErrorKind;
pub use state_machine::{allowed_transitions, can_transition, Phase};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
