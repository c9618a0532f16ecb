//! Composer errors

use flowsmith_artifact::ErrorKind;
use flowsmith_catalog::PatternType;

/// Structural problems in a workflow graph
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// Graph has no nodes
    #[error("graph has no nodes")]
    Empty,

    /// Two nodes share a name
    #[error("duplicate node: {0}")]
    DuplicateNode(String),

    /// Edge endpoint is not a declared node
    #[error("edge {from} -> {to} references an undeclared node")]
    UnknownEndpoint {
        /// Source node
        from: String,
        /// Target node
        to: String,
    },

    /// Same action label used twice from one node
    #[error("node {from} has two '{label}' transitions")]
    DuplicateTransition {
        /// Source node
        from: String,
        /// Action label
        label: String,
    },

    /// Every node has an outgoing edge
    #[error("graph has no terminal node")]
    NoTerminal,
}

/// Errors raised while composing a bundle
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Project name is empty
    #[error("project name is empty")]
    EmptyProjectName,

    /// Custom node name is not a usable class name
    #[error("invalid node name '{name}': {reason}")]
    InvalidNodeName {
        /// Offending name
        name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Custom utility name is not a usable function name
    #[error("invalid utility name '{0}': expected a snake_case identifier")]
    InvalidUtilityName(String),

    /// Custom utility signature does not form a Python function header
    #[error("invalid signature for utility '{name}': {reason}")]
    InvalidUtilitySignature {
        /// Utility name
        name: String,
        /// What is wrong with it
        reason: &'static str,
    },

    /// Two nodes would share a generated Python name
    #[error("node '{name}' collides with '{other}' on its {what}")]
    NameCollision {
        /// Later node
        name: String,
        /// Earlier node or contract
        other: String,
        /// Which generated name clashes
        what: &'static str,
    },

    /// Custom edge label is not a plain action name
    #[error("invalid edge label '{0}': expected letters, digits, '_' or '-'")]
    InvalidEdgeLabel(String),

    /// Custom edge references a node not in the graph
    #[error("custom edge {from} -> {to} references an unknown node")]
    UnknownEdgeEndpoint {
        /// Source node
        from: String,
        /// Target node
        to: String,
    },

    /// Composed graph is structurally invalid
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    /// No templates even after the catalog fallback
    #[error("no templates for {0} after fallback")]
    PatternNotInCatalog(PatternType),

    /// The Python grammar could not be loaded
    #[error("parser init failed: {0}")]
    ParserInit(String),

    /// Graph exceeds the node cap
    #[error("graph has {count} nodes, limit is {limit}")]
    TooManyNodes {
        /// Node count
        count: usize,
        /// Configured cap
        limit: usize,
    },
}

impl ComposeError {
    /// Failure kind
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComposeError::EmptyProjectName
            | ComposeError::InvalidNodeName { .. }
            | ComposeError::InvalidUtilityName(_)
            | ComposeError::InvalidUtilitySignature { .. }
            | ComposeError::NameCollision { .. }
            | ComposeError::InvalidEdgeLabel(_)
            | ComposeError::UnknownEdgeEndpoint { .. }
            | ComposeError::Graph(_) => ErrorKind::Input,
            ComposeError::PatternNotInCatalog(_) | ComposeError::ParserInit(_) => {
                ErrorKind::Pattern
            }
            ComposeError::TooManyNodes { .. } => ErrorKind::ResourceLimit,
        }
    }
}
