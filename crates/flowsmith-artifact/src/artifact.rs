//! Generated artifacts and their identities

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Logical role of an artifact inside a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactRole {
    /// Design document (markdown)
    DesignDoc,
    /// Data contract declarations
    Schema,
    /// Node stubs
    Nodes,
    /// Graph assembly
    Flow,
    /// One utility stub
    Utility,
    /// Smoke tests
    Tests,
}

impl ArtifactRole {
    /// Canonical role name
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactRole::DesignDoc => "design_doc",
            ArtifactRole::Schema => "schema",
            ArtifactRole::Nodes => "nodes",
            ArtifactRole::Flow => "flow",
            ArtifactRole::Utility => "utility",
            ArtifactRole::Tests => "tests",
        }
    }
}

impl Display for ArtifactRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an artifact inside a bundle
///
/// Every role appears at most once, except utilities which are keyed by
/// name. Serialized as `design_doc`, `schema`, `nodes`, `flow`, `tests` or
/// `utility:<name>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArtifactId {
    /// `design_doc`
    DesignDoc,
    /// `schema`
    Schema,
    /// `nodes`
    Nodes,
    /// `flow`
    Flow,
    /// `utility:<name>`
    Utility(String),
    /// `tests`
    Tests,
}

impl ArtifactId {
    /// Utility artifact id
    #[inline]
    #[must_use]
    pub fn utility(name: impl Into<String>) -> Self {
        Self::Utility(name.into())
    }

    /// Role of this artifact
    #[inline]
    #[must_use]
    pub fn role(&self) -> ArtifactRole {
        match self {
            ArtifactId::DesignDoc => ArtifactRole::DesignDoc,
            ArtifactId::Schema => ArtifactRole::Schema,
            ArtifactId::Nodes => ArtifactRole::Nodes,
            ArtifactId::Flow => ArtifactRole::Flow,
            ArtifactId::Utility(_) => ArtifactRole::Utility,
            ArtifactId::Tests => ArtifactRole::Tests,
        }
    }
}

impl Display for ArtifactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactId::Utility(name) => write!(f, "utility:{name}"),
            other => f.write_str(other.role().as_str()),
        }
    }
}

impl FromStr for ArtifactId {
    type Err = ArtifactIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "design_doc" => Ok(Self::DesignDoc),
            "schema" => Ok(Self::Schema),
            "nodes" => Ok(Self::Nodes),
            "flow" => Ok(Self::Flow),
            "tests" => Ok(Self::Tests),
            other => match other.strip_prefix("utility:") {
                Some(name) if !name.is_empty() => Ok(Self::Utility(name.to_string())),
                _ => Err(ArtifactIdError(other.to_string())),
            },
        }
    }
}

impl Serialize for ArtifactId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ArtifactId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Unrecognized artifact id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown artifact id: '{0}'")]
pub struct ArtifactIdError(pub String);

/// Source language of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLanguage {
    /// Python source
    Python,
    /// Markdown document
    Markdown,
}

impl SourceLanguage {
    /// File extension (without dot)
    #[inline]
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            SourceLanguage::Python => "py",
            SourceLanguage::Markdown => "md",
        }
    }
}

/// One generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    id: ArtifactId,
    path: String,
    language: SourceLanguage,
    source: String,
}

impl Artifact {
    /// Create a new artifact
    #[inline]
    #[must_use]
    pub fn new(
        id: ArtifactId,
        path: impl Into<String>,
        language: SourceLanguage,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            language,
            source: source.into(),
        }
    }

    /// Python artifact shorthand
    #[inline]
    #[must_use]
    pub fn python(id: ArtifactId, path: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(id, path, SourceLanguage::Python, source)
    }

    /// Markdown artifact shorthand
    #[inline]
    #[must_use]
    pub fn markdown(id: ArtifactId, path: impl Into<String>, source: impl Into<String>) -> Self {
        Self::new(id, path, SourceLanguage::Markdown, source)
    }

    /// Artifact id
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// Relative path inside the generated project
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Source language
    #[inline]
    #[must_use]
    pub fn language(&self) -> SourceLanguage {
        self.language
    }

    /// Source text
    #[inline]
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Replace the source text
    #[inline]
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Number of lines in the source
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.source.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_id_display_and_parse() {
        for id in [
            ArtifactId::DesignDoc,
            ArtifactId::Schema,
            ArtifactId::Nodes,
            ArtifactId::Flow,
            ArtifactId::Tests,
            ArtifactId::utility("call_llm"),
        ] {
            let parsed: ArtifactId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn artifact_id_rejects_unknown() {
        assert!("readme".parse::<ArtifactId>().is_err());
        assert!("utility:".parse::<ArtifactId>().is_err());
    }

    #[test]
    fn utility_role() {
        assert_eq!(ArtifactId::utility("x").role(), ArtifactRole::Utility);
        assert_eq!(ArtifactId::utility("x").to_string(), "utility:x");
    }

    #[test]
    fn line_count() {
        let artifact = Artifact::python(ArtifactId::Nodes, "nodes.py", "a\nb\nc\n");
        assert_eq!(artifact.line_count(), 3);
        assert_eq!(artifact.language().extension(), "py");
    }
}
