use flowsmith_artifact::{ArtifactId, ArtifactRole, ErrorKind};
use flowsmith_catalog::{
    Complexity, NodeTemplate, PatternType, ProcessingMode, UtilityTemplate,
};
use flowsmith_classifier::{ClassificationHints, Classifier, PatternRecommendation};
use flowsmith_composer::{
    render_mermaid, ComposeError, ComposeWarning, Composition, GraphComposer, ProjectSpec,
    ERROR_NODE, MERMAID_HEADER,
};
use pretty_assertions::assert_eq;

const WORKFLOW_TEXT: &str = "Validate incoming requests, run business rules, format the response";
const HYBRID_TEXT: &str = "Retrieve relevant documents to answer questions and call external APIs through tool integrations";

fn compose(rec: &PatternRecommendation, project: &ProjectSpec) -> Composition {
    GraphComposer::builtin().compose(rec, project).unwrap()
}

fn classify(text: &str, hints: &ClassificationHints) -> PatternRecommendation {
    Classifier::builtin().unwrap().classify(text, hints).unwrap()
}

#[test]
fn test_workflow_requirement_composes_three_nodes() {
    let hints = ClassificationHints::new().with_complexity(Complexity::Simple);
    let rec = classify(WORKFLOW_TEXT, &hints);
    let composition = compose(&rec, &ProjectSpec::new("request-pipeline"));

    let names: Vec<&str> = composition.graph.nodes().iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["ValidateInput", "ProcessData", "FormatOutput"]);
    assert!(composition.warnings.is_empty());

    assert!(composition.bundle.get(&ArtifactId::DesignDoc).is_some());
    assert!(composition.bundle.get(&ArtifactId::Schema).is_some());
    assert!(composition.bundle.get(&ArtifactId::Nodes).is_some());
    assert!(composition.bundle.get(&ArtifactId::Flow).is_some());
    assert!(
        composition.bundle.get(&ArtifactId::Tests).is_none(),
        "simple scaffolds have no tests"
    );
    assert_eq!(composition.bundle.by_role(ArtifactRole::Utility).count(), 1);
}

#[test]
fn test_composition_is_deterministic() {
    let rec = classify(HYBRID_TEXT, &ClassificationHints::default());
    let project = ProjectSpec::new("support-bot").with_description("Answer support questions");
    let first = compose(&rec, &project);
    let second = compose(&rec, &project);

    assert_eq!(first.bundle, second.bundle);
    assert_eq!(first.bundle.fingerprint(), second.bundle.fingerprint());
    assert_eq!(first.graph, second.graph);
}

#[test]
fn test_diagram_mentions_each_node_and_edge_once() {
    let rec = PatternRecommendation::direct(PatternType::Agent, 0.8);
    let composition = compose(&rec, &ProjectSpec::new("agent"));
    let diagram = render_mermaid(&composition.graph);

    assert!(diagram.starts_with(MERMAID_HEADER));
    for node in composition.graph.nodes() {
        let declaration = format!("[\"{}\"]", node.name);
        assert_eq!(diagram.matches(&declaration).count(), 1, "{}", node.name);
    }
    let edge_lines = diagram.lines().filter(|l| l.contains("-->")).count();
    assert_eq!(edge_lines, composition.graph.edge_count());

    let doc = composition.bundle.source(&ArtifactId::DesignDoc).unwrap();
    assert!(doc.contains(&diagram));
}

#[test]
fn test_hybrid_bundle_carries_component_utilities_and_dependencies() {
    let rec = classify(HYBRID_TEXT, &ClassificationHints::default());
    assert_eq!(rec.components(), &[PatternType::Tool, PatternType::Rag]);
    let composition = compose(&rec, &ProjectSpec::new("support-bot"));

    assert_eq!(composition.graph.start().name, "PrepareToolCall");
    for utility in ["call_llm", "call_tool", "get_embedding", "search_index"] {
        assert!(
            composition.bundle.get(&ArtifactId::utility(utility)).is_some(),
            "missing {utility}"
        );
    }
    let deps = composition.bundle.dependencies();
    assert_eq!(&deps.names()[..2], &["pocketflow", "pydantic"]);
    assert!(deps.contains("requests"));
    assert!(deps.contains("faiss-cpu"));

    // InvokeTool is async, so the whole flow is
    let flow = composition.bundle.source(&ArtifactId::Flow).unwrap();
    assert!(flow.contains("from pocketflow import AsyncFlow"));
    assert!(flow.contains("return AsyncFlow(start=prepare_tool_call)"));
}

#[test]
fn test_generated_flow_wires_every_edge() {
    let rec = PatternRecommendation::direct(PatternType::StructuredOutput, 0.7);
    let composition = compose(&rec, &ProjectSpec::new("extractor"));
    let flow = composition.bundle.source(&ArtifactId::Flow).unwrap();

    assert!(flow.contains("def create_flow():"));
    for edge in composition.graph.edges() {
        let wiring = format!("- \"{}\" >> ", edge.label);
        assert!(flow.contains(&wiring), "missing {wiring}");
    }
    assert!(flow.contains("validate_output - \"retry\" >> generate_structured"));
}

#[test]
fn test_advanced_complexity_adds_error_path_and_tests() {
    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6)
        .with_complexity(Some(Complexity::Advanced));
    let composition = compose(&rec, &ProjectSpec::new("pipeline"));

    assert!(composition.graph.node(ERROR_NODE).is_some());
    let tests = composition.bundle.source(&ArtifactId::Tests).unwrap();
    assert!(tests.contains("def test_flow_builds():"));
    assert!(tests.contains("def test_shared_state_accepts_inputs():"));
    assert!(tests.contains("SharedState(request=\"example\")"));
}

#[test]
fn test_recommendation_complexity_wins_over_project() {
    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6)
        .with_complexity(Some(Complexity::Simple));
    let project = ProjectSpec::new("pipeline").with_complexity(Complexity::Advanced);
    let composition = compose(&rec, &project);
    assert!(composition.graph.node(ERROR_NODE).is_none());

    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6);
    let composition = compose(&rec, &project);
    assert!(composition.graph.node(ERROR_NODE).is_some());
}

#[test]
fn test_batch_cues_upgrade_custom_node() {
    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6);
    let project = ProjectSpec::new("scoring")
        .with_description("Score all incoming tickets in parallel")
        .with_node(NodeTemplate::new("ScoreTickets", "Score each ticket"));
    let composition = compose(&rec, &project);

    let node = composition.graph.node("ScoreTickets").unwrap();
    assert_eq!(node.processing_mode, ProcessingMode::ParallelBatch);
    assert!(composition.warnings.contains(&ComposeWarning::ModeUpgraded {
        name: "ScoreTickets".to_string(),
        mode: ProcessingMode::ParallelBatch,
    }));

    let nodes = composition.bundle.source(&ArtifactId::Nodes).unwrap();
    assert!(nodes.contains("class ScoreTickets(AsyncParallelBatchNode):"));
    assert!(nodes.contains("async def exec_async(self, item):"));
}

#[test]
fn test_custom_utility_overrides_catalog() {
    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6);
    let project = ProjectSpec::new("demo").with_utility(UtilityTemplate::new(
        "call_llm",
        "Call the hosted model with retries",
        "prompt: str, retries: int",
        "str",
    ));
    let composition = compose(&rec, &project);

    let source = composition
        .bundle
        .source(&ArtifactId::utility("call_llm"))
        .unwrap();
    assert!(source.contains("def call_llm(prompt: str, retries: int) -> str:"));
    assert!(composition.warnings.contains(&ComposeWarning::UtilityOverridden {
        name: "call_llm".to_string()
    }));
}

#[test]
fn test_invalid_custom_entries_are_input_errors() {
    let rec = PatternRecommendation::direct(PatternType::Workflow, 0.6);
    let composer = GraphComposer::builtin();

    let bad_node = ProjectSpec::new("demo").with_node(NodeTemplate::new("class", "x"));
    let err = composer.compose(&rec, &bad_node).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Input);

    let bad_utility = ProjectSpec::new("demo")
        .with_utility(UtilityTemplate::new("CallLLM", "x", "", "None"));
    let err = composer.compose(&rec, &bad_utility).unwrap_err();
    assert!(matches!(err, ComposeError::InvalidUtilityName(_)));
}
