use flowsmith_artifact::{ArtifactId, ErrorKind};
use flowsmith_catalog::PatternType;
use flowsmith_classifier::{ClassificationHints, Route};
use flowsmith_composer::ProjectSpec;
use flowsmith_core::{
    ControllerConfig, CoordinationController, FlowsmithConfig, Override, Phase, PipelineError,
    RunId,
};
use flowsmith_test_utils::{project, CONFLICT_TEXT, RAG_TEXT, UNMATCHED_TEXT, WORKFLOW_TEXT};
use pretty_assertions::assert_eq;

fn controller() -> CoordinationController {
    CoordinationController::builtin().unwrap()
}

/// A run parked on low confidence
fn waiting_run(controller: &CoordinationController) -> RunId {
    let run_id = controller
        .submit(UNMATCHED_TEXT, ClassificationHints::default(), project("lorem"))
        .unwrap();
    assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::AwaitingOverride);
    run_id
}

#[test]
fn test_confident_valid_run_is_done() {
    let controller = controller();
    let run_id = controller
        .submit(RAG_TEXT, ClassificationHints::default(), project("doc-search"))
        .unwrap();

    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.phase, Phase::Done);
    assert_eq!(status.route, Some(Route::ToDirectGeneration));
    assert_eq!(status.recommendation.unwrap().primary(), PatternType::Rag);
    assert!(status.validation.unwrap().is_valid());
    assert!(status.blocked_reason.is_none());
    assert_eq!(status.overrides, 0);

    let bundle = controller.bundle(run_id).unwrap().unwrap();
    assert!(bundle.get(&ArtifactId::utility("get_embedding")).is_some());
    assert_eq!(status.fingerprint, Some(bundle.fingerprint().to_string()));
}

#[test]
fn test_workflow_run_has_three_nodes() {
    let controller = controller();
    let hints = ClassificationHints::new().with_complexity(flowsmith_catalog::Complexity::Simple);
    let run_id = controller
        .submit(WORKFLOW_TEXT, hints, project("request-pipeline"))
        .unwrap();

    let ctx = controller.context(run_id).unwrap();
    assert_eq!(ctx.phase, Phase::Done);
    assert_eq!(ctx.composition.unwrap().graph.node_count(), 3);
}

#[test]
fn test_low_confidence_waits_for_override() {
    let controller = controller();
    let run_id = waiting_run(&controller);

    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.route, Some(Route::ToDocumentation));
    assert!(status.validation.unwrap().is_valid());
    assert!(status.blocked_reason.unwrap().contains("below"));
    // the bundle is still available for review
    assert!(controller.bundle(run_id).unwrap().is_some());
}

#[test]
fn test_override_reruns_to_done() {
    let controller = controller();
    let run_id = waiting_run(&controller);

    controller
        .submit_override(run_id, Override::new().force("WORKFLOW"))
        .unwrap();

    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.phase, Phase::Done);
    assert_eq!(status.overrides, 1);
    let history = controller.override_history(run_id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].applied.forced_pattern.as_deref(), Some("WORKFLOW"));
}

#[test]
fn test_identical_override_twice_is_loop() {
    let controller = controller();
    let run_id = waiting_run(&controller);
    let change = Override::new().exclude("AGENT");

    controller.submit_override(run_id, change.clone()).unwrap();
    assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::AwaitingOverride);

    let err = controller.submit_override(run_id, change).unwrap_err();
    assert!(matches!(err, PipelineError::LoopDetected { run_id: id } if id == run_id));
    assert_eq!(err.kind(), ErrorKind::LoopDetected);
    assert_eq!(controller.override_history(run_id).unwrap().len(), 1);
}

#[test]
fn test_repeated_requirement_change_is_loop() {
    let controller = controller();
    let run_id = waiting_run(&controller);
    let change = Override::new().with_requirement("Lorem ipsum dolor");

    controller.submit_override(run_id, change.clone()).unwrap();
    assert_eq!(controller.context(run_id).unwrap().requirement, "Lorem ipsum dolor");

    // the text is already in effect, so nothing changes
    let err = controller.submit_override(run_id, change).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoopDetected);

    controller
        .submit_override(run_id, Override::new().with_requirement("Lorem ipsum"))
        .unwrap();
    assert_eq!(controller.override_history(run_id).unwrap().len(), 2);
}

#[test]
fn test_loop_check_precedes_phase_check() {
    let controller = controller();
    let run_id = waiting_run(&controller);
    let change = Override::new().force("WORKFLOW");
    controller.submit_override(run_id, change.clone()).unwrap();
    assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::Done);

    let err = controller.submit_override(run_id, change).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoopDetected);

    let err = controller
        .submit_override(run_id, Override::new().force("RAG"))
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::InvalidTransition {
            from: Phase::Done,
            to: Phase::Analyzing,
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_failing_rerun_stays_awaiting_override() {
    let controller = controller();
    let run_id = waiting_run(&controller);

    let err = controller
        .submit_override(run_id, Override::new().force("AGENT").exclude("AGENT"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let ctx = controller.context(run_id).unwrap();
    assert_eq!(ctx.phase, Phase::AwaitingOverride);
    assert_eq!(ctx.last_failure.as_ref().unwrap().kind, ErrorKind::Config);
    assert_eq!(ctx.hints, ClassificationHints::default());
    assert_eq!(ctx.override_history.len(), 1);

    controller
        .submit_override(run_id, Override::new().force("WORKFLOW"))
        .unwrap();
    let ctx = controller.context(run_id).unwrap();
    assert_eq!(ctx.phase, Phase::Done);
    assert!(ctx.last_failure.is_none());
}

#[test]
fn test_forced_and_excluded_fails_before_composition() {
    let controller = controller();
    let hints = ClassificationHints::new()
        .with_forced("AGENT")
        .with_excluded("AGENT");

    let err = controller.submit(RAG_TEXT, hints, project("agent")).unwrap_err();
    assert!(matches!(err, PipelineError::Classify(_)));
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(controller.run_count(), 0);
}

#[test]
fn test_invalid_project_is_input_error() {
    let controller = controller();
    let err = controller
        .submit(RAG_TEXT, ClassificationHints::default(), ProjectSpec::new("  "))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);
    let PipelineError::RunFailed {
        run_id,
        phase,
        recommendation,
        source,
    } = err
    else {
        panic!("expected a registered failure, got {err:?}");
    };
    assert_eq!(phase, Phase::Composing);
    assert_eq!(recommendation.primary(), PatternType::Rag);
    assert!(matches!(*source, PipelineError::Compose(_)));

    // the run is kept so the caller can fix it with an override
    assert_eq!(controller.run_count(), 1);
    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.phase, Phase::AwaitingOverride);
    assert_eq!(status.recommendation.unwrap().primary(), PatternType::Rag);
    assert_eq!(status.last_failure.unwrap().kind, ErrorKind::Input);
    assert!(status.blocked_reason.unwrap().starts_with("COMPOSING failed"));
    assert!(controller.bundle(run_id).unwrap().is_none());
}

#[test]
fn test_failing_rerun_keeps_previous_outputs() {
    let controller = controller();
    let run_id = waiting_run(&controller);
    let before = controller.context(run_id).unwrap();
    let bundle = controller.bundle(run_id).unwrap().unwrap();

    let err = controller
        .submit_override(run_id, Override::new().force("NOPE"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);

    let after = controller.context(run_id).unwrap();
    assert_eq!(after.phase, Phase::AwaitingOverride);
    assert_eq!(after.recommendation, before.recommendation);
    assert_eq!(after.validation, before.validation);
    assert_eq!(after.blocked_reason, before.blocked_reason);
    assert!(after.blocked_reason.unwrap().contains("below"));
    assert_eq!(controller.bundle(run_id).unwrap(), Some(bundle));
    assert!(after.last_failure.is_some());
}

#[test]
fn test_status_reads_while_an_override_runs() {
    let controller = controller();
    let run_ids: Vec<RunId> = (0..4).map(|_| waiting_run(&controller)).collect();

    std::thread::scope(|scope| {
        for &run_id in &run_ids {
            let controller = &controller;
            scope.spawn(move || {
                controller
                    .submit_override(run_id, Override::new().force("WORKFLOW"))
                    .unwrap();
            });
            scope.spawn(move || {
                for _ in 0..50 {
                    let status = controller.get_status(run_id).unwrap();
                    assert!(matches!(
                        status.phase,
                        Phase::AwaitingOverride | Phase::Analyzing | Phase::Done
                    ));
                }
            });
        }
    });

    for run_id in run_ids {
        assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::Done);
    }
}

#[test]
fn test_conflicting_hybrid_is_blocked_before_composition() {
    let controller = controller();
    let hints = ClassificationHints::new().with_forced("HYBRID");
    let run_id = controller.submit(CONFLICT_TEXT, hints, project("fanout")).unwrap();

    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.phase, Phase::AwaitingOverride);
    let reason = status.blocked_reason.unwrap();
    assert!(reason.contains("AGENT") && reason.contains("MAPREDUCE"), "{reason}");
    assert!(status.validation.is_none());
    assert_eq!(controller.bundle(run_id).unwrap(), None);

    controller
        .submit_override(run_id, Override::new().force("AGENT"))
        .unwrap();
    let status = controller.get_status(run_id).unwrap();
    assert_eq!(status.phase, Phase::Done);
    assert_eq!(status.recommendation.unwrap().primary(), PatternType::Agent);
}

#[test]
fn test_confidence_threshold_is_configurable() {
    let config = FlowsmithConfig::new()
        .with_controller(ControllerConfig::default().with_confidence_threshold(0.0));
    let controller = CoordinationController::from_config(&config).unwrap();
    let run_id = controller
        .submit(UNMATCHED_TEXT, ClassificationHints::default(), project("lorem"))
        .unwrap();
    assert_eq!(controller.get_status(run_id).unwrap().phase, Phase::Done);
}

#[test]
fn test_status_is_a_snapshot() {
    let controller = controller();
    let run_id = waiting_run(&controller);
    let before = controller.get_status(run_id).unwrap();

    controller
        .submit_override(run_id, Override::new().force("WORKFLOW"))
        .unwrap();
    assert_eq!(before.phase, Phase::AwaitingOverride);
    assert_eq!(before.overrides, 0);

    let json = serde_json::to_value(controller.get_status(run_id).unwrap()).unwrap();
    assert_eq!(json["phase"], "DONE");
    assert_eq!(json["run_id"], run_id.to_string());
    assert_eq!(json["overrides"], 1);
}

#[test]
fn test_runs_are_independent_across_threads() {
    let controller = controller();
    let ids: Vec<RunId> = std::thread::scope(|scope| {
        let handles: Vec<_> = [RAG_TEXT, WORKFLOW_TEXT, UNMATCHED_TEXT, RAG_TEXT]
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let controller = &controller;
                scope.spawn(move || {
                    controller
                        .submit(text, ClassificationHints::default(), project(&format!("p{i}")))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(controller.run_count(), 4);
    assert_eq!(controller.get_status(ids[0]).unwrap().phase, Phase::Done);
    assert_eq!(controller.get_status(ids[2]).unwrap().phase, Phase::AwaitingOverride);
    assert_eq!(controller.get_status(ids[3]).unwrap().phase, Phase::Done);
    assert_ne!(ids[0], ids[3]);
}
