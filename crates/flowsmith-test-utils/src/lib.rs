//! Testing utilities for the flowsmith workspace
//!
//! Shared requirement texts, projects and hand-written bundles.

#![allow(missing_docs)]

use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId};
use flowsmith_catalog::PatternType;
use flowsmith_classifier::PatternRecommendation;
use flowsmith_composer::{Composition, GraphComposer, ProjectSpec};

pub const RAG_TEXT: &str =
    "Search internal documents and answer user questions with retrieved context";
pub const WORKFLOW_TEXT: &str =
    "Validate incoming requests, run business rules, format the response";
pub const HYBRID_TEXT: &str =
    "Retrieve relevant documents to answer questions and call external APIs through tool integrations";
/// Matches no indicator; classifies as WORKFLOW with zero confidence
pub const UNMATCHED_TEXT: &str = "Lorem ipsum dolor sit amet";
/// Agent and map-reduce cues; the catalog excludes that pair
pub const CONFLICT_TEXT: &str =
    "Split large batches in parallel and let an autonomous agent decide the next action";

pub fn project(name: &str) -> ProjectSpec {
    ProjectSpec::new(name).with_description(format!("Scaffold for {name}"))
}

pub fn direct(pattern: PatternType) -> PatternRecommendation {
    PatternRecommendation::direct(pattern, 0.8)
}

/// Fresh composition of a single pattern with the built-in catalog
pub fn compose_pattern(pattern: PatternType) -> Composition {
    GraphComposer::builtin()
        .compose(&direct(pattern), &project(&pattern.as_str().to_lowercase()))
        .unwrap()
}

pub const SUMMARIZER_NODES: &str = r#""""Node definitions for summarizer"""

from pocketflow import Node


class LoadText(Node):
    """Load the text to summarize"""

    def prep(self, shared):
        # TODO: read the input text
        return shared.get("text")

    def exec(self, prep_res):
        return prep_res

    def post(self, shared, prep_res, exec_res):
        shared["load_text_result"] = exec_res
        return "success"


class Summarizer(Node):
    """Summarize the text"""

    def prep(self, shared):
        return shared.get("load_text_result")

    def exec(self, prep_res):
        return prep_res

    def post(self, shared, prep_res, exec_res):
        shared["summarizer_result"] = exec_res
"#;

/// Edge points at `Summarize` while the nodes module declares `Summarizer`
pub const DANGLING_FLOW: &str = r#""""Flow assembly for summarizer"""

from pocketflow import Flow

from nodes import LoadText, Summarize


def create_flow():
    # TODO: review the transitions
    load_text = LoadText()
    summarize = Summarize()

    load_text - "success" >> summarize

    return Flow(start=load_text)
"#;

/// Nodes and flow artifacts with exactly one dangling edge
pub fn dangling_bundle() -> ArtifactBundle {
    ArtifactBundle::new("summarizer")
        .with_artifact(Artifact::python(ArtifactId::Nodes, "nodes.py", SUMMARIZER_NODES))
        .with_artifact(Artifact::python(ArtifactId::Flow, "flow.py", DANGLING_FLOW))
}
