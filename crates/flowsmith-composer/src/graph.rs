//! Workflow graph
//!
//! Ordered nodes plus labeled transitions. A graph is only constructed
//! through [`WorkflowGraph::new`], which enforces its structural
//! invariants, so every graph a caller holds is well formed.

use crate::error::GraphError;
use flowsmith_catalog::NodeTemplate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A labeled transition between two nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node name
    pub from: String,
    /// Target node name
    pub to: String,
    /// Action label returned by the source's commit phase
    pub label: String,
}

impl Edge {
    /// Create an edge
    #[inline]
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
        }
    }
}

/// Nodes and labeled transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    nodes: Vec<NodeTemplate>,
    edges: Vec<Edge>,
}

impl WorkflowGraph {
    /// Build a validated graph
    ///
    /// # Errors
    /// - [`GraphError::Empty`] without nodes
    /// - [`GraphError::DuplicateNode`] for repeated names
    /// - [`GraphError::UnknownEndpoint`] for an edge to or from an undeclared node
    /// - [`GraphError::DuplicateTransition`] for a repeated (from, label) pair
    /// - [`GraphError::NoTerminal`] if every node has an outgoing edge
    pub fn new(nodes: Vec<NodeTemplate>, edges: Vec<Edge>) -> Result<Self, GraphError> {
        if nodes.is_empty() {
            return Err(GraphError::Empty);
        }

        let mut names = HashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !names.insert(node.name.as_str()) {
                return Err(GraphError::DuplicateNode(node.name.clone()));
            }
        }

        let mut transitions = HashSet::with_capacity(edges.len());
        for edge in &edges {
            if !names.contains(edge.from.as_str()) || !names.contains(edge.to.as_str()) {
                return Err(GraphError::UnknownEndpoint {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
            if !transitions.insert((edge.from.as_str(), edge.label.as_str())) {
                return Err(GraphError::DuplicateTransition {
                    from: edge.from.clone(),
                    label: edge.label.clone(),
                });
            }
        }

        let graph = Self { nodes, edges };
        if graph.terminals().is_empty() {
            return Err(GraphError::NoTerminal);
        }
        Ok(graph)
    }

    /// Nodes in declaration order
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &[NodeTemplate] {
        &self.nodes
    }

    /// Edges in declaration order
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node by name
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&NodeTemplate> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Position of a node in declaration order
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Start node (the first declared)
    #[inline]
    #[must_use]
    pub fn start(&self) -> &NodeTemplate {
        &self.nodes[0]
    }

    /// Outgoing edges of a node
    pub fn outgoing<'g>(&'g self, name: &'g str) -> impl Iterator<Item = &'g Edge> + 'g {
        self.edges.iter().filter(move |e| e.from == name)
    }

    /// Nodes without outgoing edges
    #[must_use]
    pub fn terminals(&self) -> Vec<&NodeTemplate> {
        self.nodes
            .iter()
            .filter(|n| !self.edges.iter().any(|e| e.from == n.name))
            .collect()
    }

    /// Whether any node runs asynchronously
    #[must_use]
    pub fn has_async(&self) -> bool {
        self.nodes.iter().any(|n| n.processing_mode.is_async())
    }

    /// Number of nodes
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
