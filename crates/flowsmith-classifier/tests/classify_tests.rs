use flowsmith_artifact::ErrorKind;
use flowsmith_catalog::{Complexity, PatternType};
use flowsmith_classifier::{ClassificationHints, Classifier, ClassifyError, Route};
use pretty_assertions::assert_eq;

const RAG_TEXT: &str =
    "Search internal documents and answer user questions with retrieved context";
const WORKFLOW_TEXT: &str = "Validate incoming requests, run business rules, format the response";
const HYBRID_TEXT: &str = "Retrieve relevant documents to answer questions and call external APIs through tool integrations";
const CONFLICT_TEXT: &str =
    "Split large batches in parallel and let an autonomous agent decide the next action";

fn classifier() -> Classifier<'static> {
    Classifier::builtin().unwrap()
}

#[test]
fn test_rag_requirement() {
    let rec = classifier()
        .classify(RAG_TEXT, &ClassificationHints::default())
        .unwrap();
    assert_eq!(rec.primary(), PatternType::Rag);
    assert!(rec.confidence() > 0.6, "confidence {}", rec.confidence());
    assert!(rec.secondary().len() <= 1);
    assert!(!rec.is_ambiguous());
    assert_eq!(rec.route(0.3), Route::ToDirectGeneration);
}

#[test]
fn test_workflow_requirement() {
    let hints = ClassificationHints::new().with_complexity(Complexity::Simple);
    let rec = classifier().classify(WORKFLOW_TEXT, &hints).unwrap();
    assert_eq!(rec.primary(), PatternType::Workflow);
    assert_eq!(rec.complexity(), Some(Complexity::Simple));
    assert!(rec.components().is_empty());
}

#[test]
fn test_forced_and_excluded_is_config_error() {
    let hints = ClassificationHints::new()
        .with_forced("AGENT")
        .with_excluded("AGENT");
    let err = classifier().classify(RAG_TEXT, &hints).unwrap_err();
    assert!(matches!(err, ClassifyError::ForcedPatternExcluded(PatternType::Agent)));
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_unknown_forced_pattern_is_config_error() {
    let hints = ClassificationHints::new().with_forced("PIPELINE");
    let err = classifier().classify(RAG_TEXT, &hints).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[test]
fn test_forced_pattern_skips_scoring() {
    let hints = ClassificationHints::new().with_forced("tool");
    let rec = classifier().classify(RAG_TEXT, &hints).unwrap();
    assert_eq!(rec.primary(), PatternType::Tool);
    assert_eq!(rec.confidence(), 1.0);
    assert_eq!(rec.secondary()[0].pattern, PatternType::Rag);
}

#[test]
fn test_conjunction_with_two_patterns_is_hybrid() {
    let rec = classifier()
        .classify(HYBRID_TEXT, &ClassificationHints::default())
        .unwrap();
    assert_eq!(rec.primary(), PatternType::Hybrid);
    assert_eq!(rec.components(), &[PatternType::Tool, PatternType::Rag]);
    assert!(rec.confidence() > 0.5 && rec.confidence() < 0.7);
    assert_eq!(rec.route(0.3), Route::ToStrategicComposition);
}

#[test]
fn test_simple_complexity_never_hybrid() {
    let hints = ClassificationHints::new().with_complexity(Complexity::Simple);
    let rec = classifier().classify(HYBRID_TEXT, &hints).unwrap();
    assert_eq!(rec.primary(), PatternType::Tool);
    assert_eq!(rec.secondary()[0].pattern, PatternType::Rag);
}

#[test]
fn test_excluded_pair_suppresses_hybrid() {
    let rec = classifier()
        .classify(CONFLICT_TEXT, &ClassificationHints::default())
        .unwrap();
    assert_eq!(rec.primary(), PatternType::Agent);
    assert!(rec.components().is_empty());
    assert!(rec
        .rationale()
        .iter()
        .any(|line| line.starts_with("hybrid not emitted")));
}

#[test]
fn test_forced_hybrid_takes_components_from_scores() {
    let hints = ClassificationHints::new().with_forced("HYBRID");
    let rec = classifier().classify(CONFLICT_TEXT, &hints).unwrap();
    assert_eq!(rec.primary(), PatternType::Hybrid);
    assert_eq!(rec.components(), &[PatternType::Agent, PatternType::MapReduce]);
    assert_eq!(rec.confidence(), 1.0);
}

#[test]
fn test_recommendation_serializes() {
    let rec = classifier()
        .classify(HYBRID_TEXT, &ClassificationHints::default())
        .unwrap();
    let json = serde_json::to_string(&rec).unwrap();
    assert!(json.contains("\"primary\":\"HYBRID\""));
    let back: flowsmith_classifier::PatternRecommendation = serde_json::from_str(&json).unwrap();
    assert_eq!(back, rec);
}
