//! Diagram renderer
//!
//! Renders a [`WorkflowGraph`] as a mermaid flowchart. Nodes get positional
//! ids (`n0`, `n1`, ...) so each name is written exactly once, in its
//! declaration line, and edges refer to the ids.

use crate::graph::WorkflowGraph;
use std::collections::HashMap;
use std::fmt::Write;

/// First line of every rendered diagram
pub const MERMAID_HEADER: &str = "flowchart TD";

/// Render a graph as mermaid `flowchart TD` text
#[must_use]
pub fn render_mermaid(graph: &WorkflowGraph) -> String {
    let ids: HashMap<&str, String> = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(i, n)| (n.name.as_str(), format!("n{i}")))
        .collect();

    let mut out = String::from(MERMAID_HEADER);
    out.push('\n');
    for (i, node) in graph.nodes().iter().enumerate() {
        let _ = writeln!(out, "    n{i}[\"{}\"]", node.name);
    }
    for edge in graph.edges() {
        // endpoints are guaranteed by graph construction
        if let (Some(from), Some(to)) = (ids.get(edge.from.as_str()), ids.get(edge.to.as_str())) {
            let _ = writeln!(out, "    {from} -->|{}| {to}", edge.label);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Edge;
    use flowsmith_catalog::NodeTemplate;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nodes_then_edges() {
        let graph = WorkflowGraph::new(
            vec![
                NodeTemplate::new("Load", "load"),
                NodeTemplate::new("Summarize", "summarize"),
            ],
            vec![Edge::new("Load", "Summarize", "success")],
        )
        .unwrap();

        assert_eq!(
            render_mermaid(&graph),
            "flowchart TD\n    n0[\"Load\"]\n    n1[\"Summarize\"]\n    n0 -->|success| n1\n"
        );
    }
}
