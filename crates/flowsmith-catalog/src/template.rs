//! Template records owned by the catalog

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// How a node processes its input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// One input, one output
    #[default]
    Sequential,
    /// One call per item of a collection
    Batch,
    /// Items processed concurrently
    ParallelBatch,
    /// Single input, awaited I/O
    Async,
}

impl ProcessingMode {
    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Sequential => "sequential",
            ProcessingMode::Batch => "batch",
            ProcessingMode::ParallelBatch => "parallel_batch",
            ProcessingMode::Async => "async",
        }
    }

    /// Whether lifecycle phases are coroutines
    #[inline]
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, ProcessingMode::Async | ProcessingMode::ParallelBatch)
    }

    /// Whether the node iterates a collection
    #[inline]
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, ProcessingMode::Batch | ProcessingMode::ParallelBatch)
    }

    /// Base class implementing this mode in the generated runtime
    #[inline]
    #[must_use]
    pub fn capability(&self) -> &'static str {
        match self {
            ProcessingMode::Sequential => "Node",
            ProcessingMode::Batch => "BatchNode",
            ProcessingMode::ParallelBatch => "AsyncParallelBatchNode",
            ProcessingMode::Async => "AsyncNode",
        }
    }
}

impl Display for ProcessingMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage of a processing graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeTemplate {
    /// CamelCase class name
    pub name: String,
    /// One-line purpose
    pub purpose: String,
    /// Processing mode
    #[serde(default)]
    pub processing_mode: ProcessingMode,
}

impl NodeTemplate {
    /// Sequential node
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, purpose: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            processing_mode: ProcessingMode::Sequential,
        }
    }

    /// With processing mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = mode;
        self
    }
}

/// A labeled transition suggested by a pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeTemplate {
    /// Source node name
    pub from: String,
    /// Target node name
    pub to: String,
    /// Action label
    pub label: String,
}

impl EdgeTemplate {
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

/// A helper function stub
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtilityTemplate {
    /// snake_case function name
    pub name: String,
    /// One-line contract
    pub purpose: String,
    /// Parameter list, e.g. `prompt: str`
    pub input_signature: String,
    /// Return annotation, e.g. `str`
    pub output_signature: String,
}

impl UtilityTemplate {
    /// Create a utility template
    #[inline]
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        purpose: impl Into<String>,
        input_signature: impl Into<String>,
        output_signature: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            input_signature: input_signature.into(),
            output_signature: output_signature.into(),
        }
    }
}

/// Semantic type of a data-contract field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text
    Text,
    /// Whole number
    Integer,
    /// Real number
    Float,
    /// Flag
    Boolean,
    /// List of strings
    TextList,
    /// List of numbers (e.g. an embedding)
    FloatList,
    /// String-keyed mapping
    Mapping,
    /// List of mappings
    Records,
    /// Unconstrained
    Any,
}

impl FieldType {
    /// Python type annotation
    #[inline]
    #[must_use]
    pub fn python_annotation(&self) -> &'static str {
        match self {
            FieldType::Text => "str",
            FieldType::Integer => "int",
            FieldType::Float => "float",
            FieldType::Boolean => "bool",
            FieldType::TextList => "List[str]",
            FieldType::FloatList => "List[float]",
            FieldType::Mapping => "Dict[str, Any]",
            FieldType::Records => "List[Dict[str, Any]]",
            FieldType::Any => "Any",
        }
    }

    /// Human-readable name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::TextList => "text list",
            FieldType::FloatList => "float list",
            FieldType::Mapping => "mapping",
            FieldType::Records => "records",
            FieldType::Any => "any",
        }
    }
}

/// An input a pattern expects to find in the shared state
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StateInput {
    /// Field name
    pub name: String,
    /// Semantic type
    pub field_type: FieldType,
    /// Description
    pub description: String,
}

impl StateInput {
    /// Create a state input
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, field_type: FieldType, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: description.into(),
        }
    }
}
