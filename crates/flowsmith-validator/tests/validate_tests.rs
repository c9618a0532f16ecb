use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId};
use flowsmith_catalog::{Complexity, PatternType};
use flowsmith_classifier::PatternRecommendation;
use flowsmith_composer::{GraphComposer, ProjectSpec};
use flowsmith_test_utils::{compose_pattern, dangling_bundle};
use flowsmith_validator::{IssueCategory, Severity, StructuralValidator, ValidationResult};
use pretty_assertions::assert_eq;

fn validate(bundle: &ArtifactBundle) -> ValidationResult {
    StructuralValidator::default().validate(bundle).unwrap()
}

fn describe(result: &ValidationResult) -> Vec<String> {
    result.issues().map(ToString::to_string).collect()
}

#[test]
fn test_fresh_bundles_validate_for_every_pattern() {
    for pattern in PatternType::CONCRETE {
        let composition = compose_pattern(pattern);
        let result = validate(&composition.bundle);

        assert!(result.is_valid(), "{pattern}: {:#?}", describe(&result));
        assert_eq!(result.with_category(IssueCategory::DanglingEdge).count(), 0);
        assert_eq!(
            result
                .with_category(IssueCategory::MissingLifecyclePhase)
                .count(),
            0
        );
        assert_eq!(
            result.with_category(IssueCategory::MissingPlaceholder).count(),
            0,
            "{pattern}: {:#?}",
            describe(&result)
        );
        assert_eq!(
            result.with_category(IssueCategory::PossibleCompletion).count(),
            0,
            "{pattern}: {:#?}",
            describe(&result)
        );
        assert_eq!(result.by_artifact().len(), composition.bundle.len());
    }
}

#[test]
fn test_advanced_hybrid_bundle_validates() {
    let rec = PatternRecommendation::hybrid(vec![PatternType::Tool, PatternType::Rag], 0.6);
    let project = ProjectSpec::new("support-bot").with_complexity(Complexity::Advanced);
    let composition = GraphComposer::builtin().compose(&rec, &project).unwrap();

    let result = validate(&composition.bundle);
    assert!(result.is_valid(), "{:#?}", describe(&result));
    assert_eq!(result.count(Severity::Warning), 0, "{:#?}", describe(&result));
    assert!(result.issues_for(&ArtifactId::Tests).is_some());
}

#[test]
fn test_dangling_edge_is_single_error() {
    let result = validate(&dangling_bundle());

    assert!(!result.is_valid());
    assert_eq!(result.error_count(), 1, "{:#?}", describe(&result));
    let dangling: Vec<_> = result.with_category(IssueCategory::DanglingEdge).collect();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].artifact_id, ArtifactId::Flow);
    assert!(dangling[0].message.contains("summarize"));
    assert!(dangling[0].location.is_some());

    // the instantiation itself is only a warning
    assert_eq!(result.with_category(IssueCategory::UnknownNodeClass).count(), 1);
}

#[test]
fn test_missing_nodes_skips_dangling_check() {
    let flow = compose_pattern(PatternType::Workflow)
        .bundle
        .get(&ArtifactId::Flow)
        .cloned()
        .unwrap();
    let bundle = ArtifactBundle::new("flow-only").with_artifact(flow);

    let result = validate(&bundle);
    assert!(result.is_valid());
    let skipped: Vec<_> = result.with_category(IssueCategory::CheckSkipped).collect();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].severity, Severity::Info);
}

#[test]
fn test_stripped_markers_are_reported() {
    let mut bundle = compose_pattern(PatternType::Workflow).bundle;
    let nodes = bundle.get(&ArtifactId::Nodes).cloned().unwrap();
    let stripped = nodes.source().replace("# TODO", "#");
    bundle.insert(nodes.with_source(stripped));

    let result = validate(&bundle);
    assert!(result.is_valid());
    let missing: Vec<_> = result
        .with_category(IssueCategory::MissingPlaceholder)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].artifact_id, ArtifactId::Nodes);
}

#[test]
fn test_completed_function_is_flagged() {
    let source = "\
def call_llm(prompt: str) -> str:
    \"\"\"Call the model\"\"\"
    if not prompt:
        return \"\"
    elif len(prompt) > 100:
        prompt = prompt[:100]
    for attempt in range(3):
        pass
    return prompt
";
    let bundle = ArtifactBundle::new("demo").with_artifact(Artifact::python(
        ArtifactId::utility("call_llm"),
        "utils/call_llm.py",
        source,
    ));

    let result = validate(&bundle);
    assert!(result.is_valid());
    assert_eq!(result.with_category(IssueCategory::PossibleCompletion).count(), 1);
    assert_eq!(result.with_category(IssueCategory::MissingPlaceholder).count(), 1);
}

#[test]
fn test_node_rules() {
    let nodes = r#"
from pocketflow import Node, AsyncNode


class Reader(Node):
    def prep(self, shared):
        # TODO
        return None

    def exec(self, prep_res):
        return shared["x"]


class Fetcher(AsyncNode):
    async def prep_async(self, shared):
        return None

    async def exec_async(self, prep_res, extra):
        return prep_res

    async def post_async(self, shared, prep_res, exec_res):
        return None


class Helper(object):
    pass
"#;
    let bundle = ArtifactBundle::new("demo")
        .with_artifact(Artifact::python(ArtifactId::Nodes, "nodes.py", nodes));
    let result = validate(&bundle);

    let categories: Vec<IssueCategory> = result
        .issues()
        .filter(|i| i.severity == Severity::Error)
        .map(|i| i.category)
        .collect();
    assert_eq!(
        categories,
        vec![
            IssueCategory::SharedStateInCompute,
            IssueCategory::MissingLifecyclePhase,
            IssueCategory::PhaseArity,
            IssueCategory::UnknownCapability,
        ]
    );
}

#[test]
fn test_flow_rules() {
    let nodes = compose_pattern(PatternType::Workflow)
        .bundle
        .get(&ArtifactId::Nodes)
        .cloned()
        .unwrap();
    let flow = r#"
from pocketflow import Flow
from nodes import ValidateInput, ProcessData


def build():
    # TODO
    validate_input = ValidateInput()
    process_data = ProcessData()
    validate_input >> process_data
    return Flow(start=missing)
"#;
    let bundle = ArtifactBundle::new("demo")
        .with_artifact(nodes)
        .with_artifact(Artifact::python(ArtifactId::Flow, "flow.py", flow));
    let result = validate(&bundle);

    let flow_issues = result.issues_for(&ArtifactId::Flow).unwrap();
    let categories: Vec<IssueCategory> = flow_issues.iter().map(|i| i.category).collect();
    assert!(categories.contains(&IssueCategory::MissingInitializer));
    assert!(categories.contains(&IssueCategory::InvalidStart));
    assert!(!categories.contains(&IssueCategory::DanglingEdge));
}

#[test]
fn test_unreachable_node_is_warning() {
    let nodes = compose_pattern(PatternType::Workflow)
        .bundle
        .get(&ArtifactId::Nodes)
        .cloned()
        .unwrap();
    let flow = r#"
from pocketflow import Flow
from nodes import ValidateInput, ProcessData, FormatOutput


def create_flow():
    # TODO
    validate_input = ValidateInput()
    process_data = ProcessData()
    format_output = FormatOutput()
    validate_input - "success" >> format_output
    return Flow(start=validate_input)
"#;
    let bundle = ArtifactBundle::new("demo")
        .with_artifact(nodes)
        .with_artifact(Artifact::python(ArtifactId::Flow, "flow.py", flow));
    let result = validate(&bundle);

    assert!(result.is_valid());
    let unreachable: Vec<_> = result.with_category(IssueCategory::UnreachableNode).collect();
    assert_eq!(unreachable.len(), 1);
    assert!(unreachable[0].message.starts_with("process_data"));
}

#[test]
fn test_design_doc_rules() {
    let bundle = ArtifactBundle::new("demo").with_artifact(Artifact::markdown(
        ArtifactId::DesignDoc,
        "docs/design.md",
        "# Demo Design\n\n## Problem Statement\n\nTODO: describe.\n",
    ));
    let result = validate(&bundle);

    assert!(result.is_valid());
    assert_eq!(result.with_category(IssueCategory::MissingSection).count(), 7);
    assert_eq!(result.with_category(IssueCategory::MissingDiagram).count(), 1);
}

#[test]
fn test_schema_rules() {
    let schema = r#"
from pydantic import BaseModel


class SharedState(BaseModel):
    # TODO
    query: str


class Loose:
    value = 1
"#;
    let bundle = ArtifactBundle::new("demo")
        .with_artifact(Artifact::python(ArtifactId::Schema, "schema.py", schema));
    let result = validate(&bundle);

    let categories: Vec<IssueCategory> = result.issues().map(|i| i.category).collect();
    assert_eq!(
        categories,
        vec![IssueCategory::SchemaBase, IssueCategory::EmptySchema]
    );
}

#[test]
fn test_result_serializes_with_every_artifact() {
    let bundle = compose_pattern(PatternType::Rag).bundle;
    let result = validate(&bundle);
    let json = serde_json::to_value(&result).unwrap();
    let issues = json["issues"].as_object().unwrap();
    assert_eq!(issues.len(), bundle.len());
    assert!(issues.contains_key("utility:get_embedding"));
    assert_eq!(json["valid"], true);
}
