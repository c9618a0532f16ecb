//! Artifact bundles
//!
//! An [`ArtifactBundle`] is the complete set of generated files for one
//! project, plus its abstract dependency manifest. It is produced
//! atomically by the composer and consumed atomically by the validator.
//! Iteration order is insertion order, so serializing the same bundle twice
//! yields the same bytes.

use crate::artifact::{Artifact, ArtifactId, ArtifactRole};
use crate::hash::{ContentHash, Fingerprinter};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One package requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// Package name
    pub name: String,
    /// Version requirement, e.g. `>=2.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Dependency {
    /// Unversioned dependency
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// With version requirement
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

/// Ordered, de-duplicated dependency set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencyManifest {
    dependencies: Vec<Dependency>,
}

impl DependencyManifest {
    /// Create empty manifest
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dependency; the first entry for a given name wins
    pub fn add(&mut self, dependency: Dependency) -> bool {
        if self.contains(&dependency.name) {
            return false;
        }
        self.dependencies.push(dependency);
        true
    }

    /// Add several dependencies in order
    pub fn extend<I>(&mut self, dependencies: I)
    where
        I: IntoIterator<Item = Dependency>,
    {
        for dependency in dependencies {
            self.add(dependency);
        }
    }

    /// Check membership by name
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.dependencies.iter().any(|d| d.name == name)
    }

    /// All dependency names in order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.dependencies.iter().map(|d| d.name.as_str()).collect()
    }

    /// Iterate dependencies
    pub fn iter(&self) -> impl Iterator<Item = &Dependency> {
        self.dependencies.iter()
    }

    /// Number of dependencies
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl FromIterator<Dependency> for DependencyManifest {
    fn from_iter<I: IntoIterator<Item = Dependency>>(iter: I) -> Self {
        let mut manifest = Self::new();
        manifest.extend(iter);
        manifest
    }
}

/// The complete generated file set for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactBundle {
    project: String,
    artifacts: IndexMap<ArtifactId, Artifact>,
    #[serde(default)]
    dependencies: DependencyManifest,
}

impl ArtifactBundle {
    /// Create an empty bundle for a project
    #[inline]
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            artifacts: IndexMap::new(),
            dependencies: DependencyManifest::new(),
        }
    }

    /// With dependency manifest
    #[inline]
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: DependencyManifest) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Insert an artifact, returning the one it replaced
    pub fn insert(&mut self, artifact: Artifact) -> Option<Artifact> {
        self.artifacts.insert(artifact.id().clone(), artifact)
    }

    /// Builder-style insert
    #[inline]
    #[must_use]
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.insert(artifact);
        self
    }

    /// Remove an artifact
    pub fn remove(&mut self, id: &ArtifactId) -> Option<Artifact> {
        self.artifacts.shift_remove(id)
    }

    /// Project name
    #[inline]
    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Look up an artifact
    #[inline]
    #[must_use]
    pub fn get(&self, id: &ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(id)
    }

    /// Look up an artifact's source text
    #[inline]
    #[must_use]
    pub fn source(&self, id: &ArtifactId) -> Option<&str> {
        self.artifacts.get(id).map(Artifact::source)
    }

    /// Iterate artifacts in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Artifact ids in insertion order
    #[must_use]
    pub fn ids(&self) -> Vec<&ArtifactId> {
        self.artifacts.keys().collect()
    }

    /// All artifacts having a role
    pub fn by_role(&self, role: ArtifactRole) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values().filter(move |a| a.id().role() == role)
    }

    /// Dependency manifest
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &DependencyManifest {
        &self.dependencies
    }

    /// Number of artifacts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Content fingerprint over project, artifact ids, paths, sources and
    /// dependencies, in order
    #[must_use]
    pub fn fingerprint(&self) -> ContentHash {
        let mut fp = Fingerprinter::new();
        fp.update(&self.project);
        for artifact in self.artifacts.values() {
            fp.update(&artifact.id().to_string())
                .update(artifact.path())
                .update(artifact.source());
        }
        for dependency in self.dependencies.iter() {
            fp.update(&dependency.name)
                .update(dependency.version.as_deref().unwrap_or(""));
        }
        fp.finish()
    }

    /// Serialize to pretty JSON
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    ///
    /// # Errors
    /// Returns error if the JSON is not a bundle
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
