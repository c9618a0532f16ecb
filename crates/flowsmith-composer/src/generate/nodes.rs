//! Node module

use super::{ArtifactGenerator, CodeWriter, GenerationContext, TODO_MARKER};
use crate::contracts::first_collection_input;
use crate::graph::WorkflowGraph;
use crate::naming::{python_text, result_key};
use flowsmith_artifact::{Artifact, ArtifactId, ArtifactRole};
use flowsmith_catalog::{NodeTemplate, StateInput};
use std::collections::BTreeSet;

/// Path of the node module
pub const NODES_PATH: &str = "nodes.py";

/// Labels a commit phase returns by default, in preference order
const DEFAULT_ACTIONS: [&str; 2] = ["success", "done"];

/// Label reserved for failure routing
const ERROR_ACTION: &str = "error";

/// Renders `nodes.py`
#[derive(Debug, Clone, Copy, Default)]
pub struct NodesGenerator;

impl ArtifactGenerator for NodesGenerator {
    fn role(&self) -> ArtifactRole {
        ArtifactRole::Nodes
    }

    fn generate(&self, ctx: &GenerationContext<'_>) -> Vec<Artifact> {
        let graph = ctx.graph;
        let capabilities: BTreeSet<&str> = graph
            .nodes()
            .iter()
            .map(|n| n.processing_mode.capability())
            .collect();

        let mut w = CodeWriter::new();
        w.line(format!(
            "\"\"\"Node definitions for {}\"\"\"",
            python_text(&ctx.project.name)
        ));
        w.blank();
        w.line(format!(
            "from pocketflow import {}",
            capabilities.into_iter().collect::<Vec<_>>().join(", ")
        ));

        for (i, node) in graph.nodes().iter().enumerate() {
            w.blank().blank();
            let input_key = prep_key(graph, ctx.state_inputs, i);
            write_node(&mut w, graph, node, &input_key);
        }

        vec![Artifact::python(ArtifactId::Nodes, NODES_PATH, w.finish())]
    }

    fn name(&self) -> &'static str {
        "nodes"
    }
}

/// Shared-store key a node reads in its prep phase
fn prep_key(graph: &WorkflowGraph, inputs: &[StateInput], index: usize) -> String {
    if index > 0 {
        return result_key(&graph.nodes()[index - 1].name);
    }
    let node = &graph.nodes()[0];
    let input = if node.processing_mode.is_collection() {
        first_collection_input(inputs).or_else(|| inputs.first())
    } else {
        inputs.first()
    };
    input.map_or_else(|| "input".to_string(), |i| i.name.clone())
}

fn write_node(w: &mut CodeWriter, graph: &WorkflowGraph, node: &NodeTemplate, input_key: &str) {
    let mode = node.processing_mode;
    let (def, suffix) = if mode.is_async() {
        ("async def", "_async")
    } else {
        ("def", "")
    };
    let (exec_param, exec_result) = if mode.is_collection() {
        ("item", "exec_res_list")
    } else {
        ("prep_res", "exec_res")
    };

    w.line(format!("class {}({}):", node.name, mode.capability()));
    w.indent();
    w.line(format!("\"\"\"{}\"\"\"", python_text(&node.purpose)));

    w.blank();
    w.line(format!("{def} prep{suffix}(self, shared):"));
    w.indent();
    if mode.is_collection() {
        w.line(format!("# {TODO_MARKER}: return the items {} should process", node.name));
        w.line(format!("return shared.get(\"{input_key}\") or []"));
    } else {
        w.line(format!("# {TODO_MARKER}: read what {} needs from the shared store", node.name));
        w.line(format!("return shared.get(\"{input_key}\")"));
    }
    w.dedent();

    w.blank();
    w.line(format!("{def} exec{suffix}(self, {exec_param}):"));
    w.indent();
    if mode.is_collection() {
        w.line(format!("# {TODO_MARKER}: process one item"));
    } else {
        w.line(format!("# {TODO_MARKER}: implement {}", node.name));
    }
    w.line(format!("return {exec_param}"));
    w.dedent();

    w.blank();
    w.line(format!("{def} post{suffix}(self, shared, prep_res, {exec_result}):"));
    w.indent();
    w.line(format!("shared[\"{}\"] = {exec_result}", result_key(&node.name)));
    write_return(w, graph, node);
    w.dedent();

    w.dedent();
}

fn write_return(w: &mut CodeWriter, graph: &WorkflowGraph, node: &NodeTemplate) {
    let mut labels: Vec<&str> = Vec::new();
    for edge in graph.outgoing(&node.name) {
        if !labels.contains(&edge.label.as_str()) {
            labels.push(&edge.label);
        }
    }

    let action = DEFAULT_ACTIONS
        .iter()
        .copied()
        .find(|a| labels.contains(a))
        .or_else(|| labels.iter().copied().find(|l| *l != ERROR_ACTION));

    if labels.len() > 1 || (action.is_none() && !labels.is_empty()) {
        let choices: Vec<String> = labels.iter().map(|l| format!("\"{l}\"")).collect();
        w.line(format!(
            "# {TODO_MARKER}: return one of {} depending on the result",
            choices.join(", ")
        ));
    }
    match action {
        Some(action) => w.line(format!("return \"{action}\"")),
        None => w.line("return None"),
    };
}
