//! Project specification

use flowsmith_catalog::{Complexity, EdgeTemplate, NodeTemplate, UtilityTemplate};
use serde::{Deserialize, Serialize};

/// What the caller wants scaffolded
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSpec {
    /// Project name (non-empty)
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Nodes overriding or extending the catalog's
    pub custom_nodes: Vec<NodeTemplate>,
    /// Utilities overriding or extending the catalog's
    pub custom_utilities: Vec<UtilityTemplate>,
    /// Extra or replacement transitions
    pub custom_edges: Vec<EdgeTemplate>,
    /// Scaffold depth
    pub complexity: Complexity,
}

impl ProjectSpec {
    /// Named project with nothing custom
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// With description
    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a custom node
    #[inline]
    #[must_use]
    pub fn with_node(mut self, node: NodeTemplate) -> Self {
        self.custom_nodes.push(node);
        self
    }

    /// Add a custom utility
    #[inline]
    #[must_use]
    pub fn with_utility(mut self, utility: UtilityTemplate) -> Self {
        self.custom_utilities.push(utility);
        self
    }

    /// Add a custom edge
    #[inline]
    #[must_use]
    pub fn with_edge(mut self, edge: EdgeTemplate) -> Self {
        self.custom_edges.push(edge);
        self
    }

    /// With complexity
    #[inline]
    #[must_use]
    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }
}
