//! Pipeline error taxonomy

use crate::context::RunId;
use crate::state_machine::Phase;
use flowsmith_artifact::ErrorKind;
use flowsmith_catalog::CatalogError;
use flowsmith_classifier::{ClassifyError, PatternRecommendation};
use flowsmith_composer::ComposeError;
use flowsmith_validator::ValidateError;
use std::path::PathBuf;

/// Errors that terminate a pipeline call
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Classification failed
    #[error("classification failed: {0}")]
    Classify(#[from] ClassifyError),

    /// Composition failed
    #[error("composition failed: {0}")]
    Compose(#[from] ComposeError),

    /// Validation could not run
    #[error("validation failed: {0}")]
    Validate(#[from] ValidateError),

    /// Indicator table or pattern lookup failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Same override resubmitted without a requirement change
    #[error("run {run_id}: override repeats the previous one without a requirement change")]
    LoopDetected {
        /// Run being overridden
        run_id: RunId,
    },

    /// A new run failed after classification; it is registered and parked
    #[error("run {run_id} failed in {phase}: {source}")]
    RunFailed {
        /// Registered run
        run_id: RunId,
        /// Phase the failure happened in
        phase: Phase,
        /// Recommendation produced before the failure
        recommendation: Box<PatternRecommendation>,
        /// Stage failure
        #[source]
        source: Box<PipelineError>,
    },

    /// No run with this id
    #[error("run not found: {0}")]
    RunNotFound(RunId),

    /// Phase change not permitted from the current phase
    #[error("run {run_id}: cannot move from {from} to {to}")]
    InvalidTransition {
        /// Run being moved
        run_id: RunId,
        /// Current phase
        from: Phase,
        /// Requested phase
        to: Phase,
    },

    /// Configuration file could not be read
    #[error("io error reading {path}: {source}")]
    ConfigFile {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Configuration is not valid TOML for the expected shape
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration value out of range
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl PipelineError {
    /// Failure kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Classify(e) => e.kind(),
            PipelineError::Compose(e) => e.kind(),
            PipelineError::Validate(e) => e.kind(),
            PipelineError::Catalog(e) => e.kind(),
            PipelineError::RunFailed { source, .. } => source.kind(),
            PipelineError::LoopDetected { .. } => ErrorKind::LoopDetected,
            PipelineError::RunNotFound(_) => ErrorKind::Input,
            PipelineError::InvalidTransition { .. }
            | PipelineError::ConfigFile { .. }
            | PipelineError::ConfigParse(_)
            | PipelineError::InvalidConfig(_) => ErrorKind::Config,
        }
    }

    /// Run the failure belongs to, when one exists
    #[must_use]
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            PipelineError::LoopDetected { run_id }
            | PipelineError::InvalidTransition { run_id, .. }
            | PipelineError::RunFailed { run_id, .. } => Some(*run_id),
            PipelineError::RunNotFound(id) => Some(*id),
            _ => None,
        }
    }
}

/// Result type for pipeline calls
pub type PipelineResult<T> = Result<T, PipelineError>;
