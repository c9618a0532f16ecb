//! Flow assembly module

use super::{ArtifactGenerator, CodeWriter, GenerationContext, TODO_MARKER};
use crate::naming::{instance_name, python_text};
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};

/// Path of the flow module
pub const FLOW_PATH: &str = "flow.py";

/// Name of the generated initializer
pub const INITIALIZER: &str = "create_flow";

/// Renders `flow.py`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowGenerator;

impl ArtifactGenerator for FlowGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::Flow
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        let graph = ctx.graph;
        let aggregate = if graph.has_async() { "AsyncFlow" } else { "Flow" };
        let class_names: Vec<&str> = graph.nodes().iter().map(|n| n.name.as_str()).collect();

        let mut w = CodeWriter::new();
        w.line(format!(
            "\"\"\"Flow assembly for {}\"\"\"",
            python_text(&ctx.project.name)
        ));
        w.blank();
        w.line(format!("from pocketflow import {aggregate}"));
        w.blank();
        w.line(format!("from nodes import {}", class_names.join(", ")));
        w.blank().blank();

        w.line(format!("def {INITIALIZER}():"));
        w.indent();
        w.line(format!(
            "\"\"\"Build the {} flow\"\"\"",
            python_text(&ctx.project.name)
        ));
        w.line(format!(
            "# {TODO_MARKER}: review the transitions once node logic exists"
        ));
        for node in graph.nodes() {
            w.line(format!("{} = {}()", instance_name(&node.name), node.name));
        }
        w.blank();
        for edge in graph.edges() {
            w.line(format!(
                "{} - \"{}\" >> {}",
                instance_name(&edge.from),
                edge.label,
                instance_name(&edge.to)
            ));
        }
        if graph.edge_count() > 0 {
            w.blank();
        }
        w.line(format!(
            "return {aggregate}(start={})",
            instance_name(&graph.start().name)
        ));
        w.dedent();

        vec![Artifact::python(ArtifactId::Flow, FLOW_PATH, w.finish())]
    }

    fn name(&self) -> &'static str {
        "flow"
    }
}
