//! Coordination controller
//!
//! Sequences classification, composition and validation for each run and
//! parks runs in [`Phase::AwaitingOverride`] until a caller decides how to
//! proceed. Runs are independent and live in a concurrent map; each pass is
//! synchronous and works on a copy of its run's context, so no map entry
//! stays locked while a stage runs.

use crate::config::{ControllerConfig, FlowsmithConfig};
use crate::context::{
    CoordinationContext, FailureRecord, Override, OverrideRecord, RunId, RunStatus,
};
use crate::error::{PipelineError, PipelineResult};
use crate::state_machine::{can_transition, Phase};
use chrono::Utc;
use dashmap::DashMap;
use flowsmith_artifact::ArtifactBundle;
use flowsmith_classifier::{ClassificationHints, Classifier};
use flowsmith_composer::{GraphComposer, ProjectSpec};
use flowsmith_validator::StructuralValidator;

/// Drives runs through the pipeline
#[derive(Debug)]
pub struct CoordinationController {
    config: ControllerConfig,
    classifier: Classifier<'static>,
    composer: GraphComposer<'static>,
    validator: StructuralValidator,
    runs: DashMap<RunId, CoordinationContext>,
}

impl CoordinationController {
    /// Controller with the default configuration
    ///
    /// # Errors
    /// Returns error if the built-in indicator table is malformed
    pub fn builtin() -> PipelineResult<Self> {
        Self::from_config(&FlowsmithConfig::default())
    }

    /// Controller built from a configuration
    ///
    /// # Errors
    /// Returns error for an out-of-range value or a bad indicator table
    pub fn from_config(config: &FlowsmithConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self::new(
            config.controller.clone(),
            config.classifier()?,
            config.composer(),
            config.validator(),
        ))
    }

    /// Controller over explicit stages
    #[must_use]
    pub fn new(
        config: ControllerConfig,
        classifier: Classifier<'static>,
        composer: GraphComposer<'static>,
        validator: StructuralValidator,
    ) -> Self {
        Self {
            config,
            classifier,
            composer,
            validator,
            runs: DashMap::new(),
        }
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Number of registered runs
    #[inline]
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Start a run and drive it as far as it goes
    ///
    /// A run that fails during classification is not registered. A later
    /// failure parks the run in [`Phase::AwaitingOverride`] with the failure
    /// recorded, and the error carries its id and recommendation.
    ///
    /// # Errors
    /// - any classification failure
    /// - [`PipelineError::RunFailed`] wrapping a composition or validation
    ///   failure
    pub fn submit(
        &self,
        requirement: &str,
        hints: ClassificationHints,
        project: ProjectSpec,
    ) -> PipelineResult<RunId> {
        let mut ctx = CoordinationContext::new(requirement, hints, project);
        let run_id = ctx.run_id;
        tracing::info!(%run_id, phase = %ctx.phase, "run started");

        if let Err(err) = self.advance(&mut ctx) {
            tracing::warn!(
                %run_id,
                phase = %ctx.phase,
                kind = %err.kind(),
                error = %err,
                "run failed"
            );
            let Some(recommendation) = ctx.recommendation.clone() else {
                return Err(err);
            };
            let phase = ctx.phase;
            ctx.phase = Phase::AwaitingOverride;
            ctx.blocked_reason = Some(format!("{phase} failed: {err}"));
            record_failure(&mut ctx, &err);
            self.runs.insert(run_id, ctx);
            return Err(PipelineError::RunFailed {
                run_id,
                phase,
                recommendation: Box::new(recommendation),
                source: Box::new(err),
            });
        }
        self.runs.insert(run_id, ctx);
        Ok(run_id)
    }

    /// Snapshot of a run
    ///
    /// # Errors
    /// Returns [`PipelineError::RunNotFound`] for an unknown id
    pub fn get_status(&self, run_id: RunId) -> PipelineResult<RunStatus> {
        self.runs
            .get(&run_id)
            .map(|ctx| ctx.status(self.config.confidence_threshold))
            .ok_or(PipelineError::RunNotFound(run_id))
    }

    /// Full copy of a run's context
    ///
    /// # Errors
    /// Returns [`PipelineError::RunNotFound`] for an unknown id
    pub fn context(&self, run_id: RunId) -> PipelineResult<CoordinationContext> {
        self.runs
            .get(&run_id)
            .map(|ctx| ctx.value().clone())
            .ok_or(PipelineError::RunNotFound(run_id))
    }

    /// Latest bundle of a run, if it got that far
    ///
    /// # Errors
    /// Returns [`PipelineError::RunNotFound`] for an unknown id
    pub fn bundle(&self, run_id: RunId) -> PipelineResult<Option<ArtifactBundle>> {
        self.runs
            .get(&run_id)
            .map(|ctx| ctx.composition.as_ref().map(|c| c.bundle.clone()))
            .ok_or(PipelineError::RunNotFound(run_id))
    }

    /// Accepted overrides of a run, oldest first
    ///
    /// # Errors
    /// Returns [`PipelineError::RunNotFound`] for an unknown id
    pub fn override_history(&self, run_id: RunId) -> PipelineResult<Vec<OverrideRecord>> {
        self.runs
            .get(&run_id)
            .map(|ctx| ctx.override_history.clone())
            .ok_or(PipelineError::RunNotFound(run_id))
    }

    /// Apply an override and re-run from [`Phase::Analyzing`]
    ///
    /// A repeat of the previous override that leaves the requirement text
    /// unchanged is rejected before the phase is looked at. When the re-run
    /// fails the run returns to [`Phase::AwaitingOverride`] with its previous
    /// requirement, hints and outputs, records the failure and the error is
    /// returned.
    ///
    /// The map entry is released while the pipeline runs; the run sits in
    /// [`Phase::Analyzing`] meanwhile, so a concurrent override is rejected.
    ///
    /// # Errors
    /// - [`PipelineError::RunNotFound`] for an unknown id
    /// - [`PipelineError::LoopDetected`] for a repeated override
    /// - [`PipelineError::InvalidTransition`] outside
    ///   [`Phase::AwaitingOverride`]
    /// - any failure of the re-run
    pub fn submit_override(&self, run_id: RunId, change: Override) -> PipelineResult<()> {
        let mut working = {
            let mut entry = self
                .runs
                .get_mut(&run_id)
                .ok_or(PipelineError::RunNotFound(run_id))?;
            let ctx = entry.value_mut();

            if ctx.last_override() == Some(&change) && !change.changes_requirement(&ctx.requirement)
            {
                tracing::warn!(%run_id, "override loop detected");
                return Err(PipelineError::LoopDetected { run_id });
            }
            transition(ctx, Phase::Analyzing)?;
            ctx.clone()
        };

        let previous = (working.requirement.clone(), working.hints.clone());
        let outputs = working.take_outputs();
        working.hints = change.apply(&working.hints);
        if let Some(text) = &change.requirement {
            working.requirement.clone_from(text);
        }
        working.override_history.push(OverrideRecord {
            applied: change,
            applied_at: Utc::now(),
        });
        working.last_failure = None;
        tracing::info!(
            %run_id,
            history = %serde_json::to_string(&working.override_history).unwrap_or_default(),
            "override applied"
        );

        let result = self.advance(&mut working);
        if let Err(err) = &result {
            tracing::warn!(%run_id, kind = %err.kind(), error = %err, "re-run failed");
            (working.requirement, working.hints) = previous;
            working.restore_outputs(outputs);
            working.phase = Phase::AwaitingOverride;
            record_failure(&mut working, err);
        }
        self.runs.insert(run_id, working);
        result
    }

    /// Run one pass from [`Phase::Analyzing`]
    fn advance(&self, ctx: &mut CoordinationContext) -> PipelineResult<()> {
        ctx.clear_outputs();

        let recommendation = self.classifier.classify(&ctx.requirement, &ctx.hints)?;
        if recommendation.primary().is_hybrid() {
            if let Some(conflict) = self
                .classifier
                .catalog()
                .first_conflict(recommendation.components())
            {
                let reason = format!(
                    "{} and {} cannot share one graph: {}",
                    conflict.first, conflict.second, conflict.reason
                );
                tracing::warn!(run_id = %ctx.run_id, %reason, "hybrid recommendation blocked");
                ctx.recommendation = Some(recommendation);
                ctx.blocked_reason = Some(reason);
                return transition(ctx, Phase::AwaitingOverride);
            }
        }
        let confidence = recommendation.confidence();
        transition(ctx, Phase::Composing)?;

        let composed = self.composer.compose(&recommendation, &ctx.project);
        ctx.recommendation = Some(recommendation);
        let composition = composed?;
        transition(ctx, Phase::Validating)?;

        let validated = self.validator.validate(&composition.bundle);
        ctx.composition = Some(composition);
        let validation = validated?;
        let valid = validation.is_valid();
        let errors = validation.error_count();
        ctx.validation = Some(validation);

        let threshold = self.config.confidence_threshold;
        if valid && confidence >= threshold {
            transition(ctx, Phase::Done)
        } else {
            ctx.blocked_reason = Some(if valid {
                format!("confidence {confidence:.2} is below {threshold:.2}")
            } else {
                format!("validation reported {errors} error(s)")
            });
            transition(ctx, Phase::AwaitingOverride)
        }
    }
}

/// Note a pass failure on the run
fn record_failure(ctx: &mut CoordinationContext, err: &PipelineError) {
    ctx.last_failure = Some(FailureRecord {
        kind: err.kind(),
        message: err.to_string(),
        at: Utc::now(),
    });
}

/// Move a run to `to` if the table allows it
fn transition(ctx: &mut CoordinationContext, to: Phase) -> PipelineResult<()> {
    if !can_transition(ctx.phase, to) {
        return Err(PipelineError::InvalidTransition {
            run_id: ctx.run_id,
            from: ctx.phase,
            to,
        });
    }
    tracing::info!(run_id = %ctx.run_id, from = %ctx.phase, to = %to, "phase transition");
    ctx.phase = to;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CoordinationContext {
        CoordinationContext::new(
            "Validate incoming requests",
            ClassificationHints::default(),
            ProjectSpec::new("demo"),
        )
    }

    #[test]
    fn transition_follows_the_table() {
        let mut ctx = context();
        assert!(transition(&mut ctx, Phase::Composing).is_ok());
        assert_eq!(ctx.phase, Phase::Composing);

        let err = transition(&mut ctx, Phase::Done).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidTransition {
                from: Phase::Composing,
                to: Phase::Done,
                ..
            }
        ));
        assert_eq!(ctx.phase, Phase::Composing);
    }

    #[test]
    fn unknown_run_is_not_found() {
        let controller = CoordinationController::builtin().unwrap();
        let id = RunId::new();
        assert!(matches!(
            controller.get_status(id),
            Err(PipelineError::RunNotFound(found)) if found == id
        ));
        assert!(controller.bundle(id).is_err());
        assert!(controller.submit_override(id, Override::new()).is_err());
    }
}
