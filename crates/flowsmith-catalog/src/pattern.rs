//! Pattern and complexity identifiers

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Architectural pattern for a processing graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternType {
    /// Retrieval-augmented generation
    Rag,
    /// Single agent with a decision loop
    Agent,
    /// Plain sequential workflow
    Workflow,
    /// External tool / API integration
    Tool,
    /// Parallel map followed by a reduce step
    MapReduce,
    /// Several cooperating agents
    MultiAgent,
    /// Output constrained to a schema
    StructuredOutput,
    /// Union of several patterns
    Hybrid,
}

impl PatternType {
    /// Every pattern, in catalog order
    pub const ALL: [PatternType; 8] = [
        PatternType::Rag,
        PatternType::Agent,
        PatternType::Workflow,
        PatternType::Tool,
        PatternType::MapReduce,
        PatternType::MultiAgent,
        PatternType::StructuredOutput,
        PatternType::Hybrid,
    ];

    /// Patterns that carry their own node templates (everything but HYBRID)
    pub const CONCRETE: [PatternType; 7] = [
        PatternType::Rag,
        PatternType::Agent,
        PatternType::Workflow,
        PatternType::Tool,
        PatternType::MapReduce,
        PatternType::MultiAgent,
        PatternType::StructuredOutput,
    ];

    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Rag => "RAG",
            PatternType::Agent => "AGENT",
            PatternType::Workflow => "WORKFLOW",
            PatternType::Tool => "TOOL",
            PatternType::MapReduce => "MAPREDUCE",
            PatternType::MultiAgent => "MULTI_AGENT",
            PatternType::StructuredOutput => "STRUCTURED_OUTPUT",
            PatternType::Hybrid => "HYBRID",
        }
    }

    /// Whether this is the HYBRID meta-pattern
    #[inline]
    #[must_use]
    pub fn is_hybrid(&self) -> bool {
        matches!(self, PatternType::Hybrid)
    }
}

impl Display for PatternType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternType {
    type Err = CatalogError;

    /// Case-insensitive; `-` and spaces are accepted for `_`, and
    /// `MAP_REDUCE` is accepted for `MAPREDUCE`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "RAG" => Ok(PatternType::Rag),
            "AGENT" => Ok(PatternType::Agent),
            "WORKFLOW" => Ok(PatternType::Workflow),
            "TOOL" => Ok(PatternType::Tool),
            "MAPREDUCE" | "MAP_REDUCE" => Ok(PatternType::MapReduce),
            "MULTI_AGENT" | "MULTIAGENT" => Ok(PatternType::MultiAgent),
            "STRUCTURED_OUTPUT" => Ok(PatternType::StructuredOutput),
            "HYBRID" => Ok(PatternType::Hybrid),
            _ => Err(CatalogError::UnknownPattern(s.to_string())),
        }
    }
}

impl Serialize for PatternType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PatternType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Requested scaffold depth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    /// Base templates only
    #[default]
    Simple,
    /// Adds a smoke-test artifact
    Enhanced,
    /// Adds tests and an error-handling node
    Advanced,
}

impl Complexity {
    /// Canonical name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Enhanced => "enhanced",
            Complexity::Advanced => "advanced",
        }
    }
}

impl Display for Complexity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Complexity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Complexity::Simple),
            "enhanced" => Ok(Complexity::Enhanced),
            "advanced" => Ok(Complexity::Advanced),
            _ => Err(CatalogError::UnknownComplexity(s.to_string())),
        }
    }
}
