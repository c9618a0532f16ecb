//! Pattern catalog
//!
//! Static, versioned mapping from [`PatternType`] to node templates,
//! conditional edges, utilities, state inputs and dependencies, plus the
//! exclusion table of incompatible pattern pairs.
//!
//! The catalog is immutable once built. Every accessor returns owned copies,
//! so concurrent runs can never observe each other's modifications.

use crate::builtin;
use crate::pattern::PatternType;
use crate::template::{EdgeTemplate, NodeTemplate, StateInput, UtilityTemplate};
use flowsmith_artifact::{Dependency, DependencyManifest};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Revision of the built-in catalog data
pub const CATALOG_VERSION: u32 = 4;

/// Pattern used when a lookup misses and when nothing scores
pub const DEFAULT_PATTERN: PatternType = PatternType::Workflow;

static BUILTIN: Lazy<PatternCatalog> = Lazy::new(builtin::build);

/// Everything the catalog knows about one pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEntry {
    /// Ordered node templates
    pub nodes: Vec<NodeTemplate>,
    /// Conditional edges in addition to the default chain
    pub edges: Vec<EdgeTemplate>,
    /// Utilities beyond the base set
    pub utilities: Vec<UtilityTemplate>,
    /// Inputs the pattern expects in the shared state
    pub state_inputs: Vec<StateInput>,
    /// Dependencies beyond the base set
    pub dependencies: Vec<Dependency>,
}

impl PatternEntry {
    /// Entry with the given node templates
    #[inline]
    #[must_use]
    pub fn new(nodes: Vec<NodeTemplate>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    /// Add a conditional edge
    #[inline]
    #[must_use]
    pub fn with_edge(mut self, edge: EdgeTemplate) -> Self {
        self.edges.push(edge);
        self
    }

    /// Add a utility
    #[inline]
    #[must_use]
    pub fn with_utility(mut self, utility: UtilityTemplate) -> Self {
        self.utilities.push(utility);
        self
    }

    /// Add a state input
    #[inline]
    #[must_use]
    pub fn with_state_input(mut self, input: StateInput) -> Self {
        self.state_inputs.push(input);
        self
    }

    /// Add a dependency
    #[inline]
    #[must_use]
    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

/// A known-incompatible pattern pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exclusion {
    /// First pattern
    pub first: PatternType,
    /// Second pattern
    pub second: PatternType,
    /// Why the pair cannot share one graph
    pub reason: String,
}

impl Exclusion {
    /// Whether this exclusion covers the (unordered) pair
    #[inline]
    #[must_use]
    pub fn covers(&self, a: PatternType, b: PatternType) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

/// The pattern catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCatalog {
    version: u32,
    entries: IndexMap<PatternType, PatternEntry>,
    exclusions: Vec<Exclusion>,
    base_utilities: Vec<UtilityTemplate>,
    base_dependencies: Vec<Dependency>,
}

impl PatternCatalog {
    /// Create an empty catalog
    #[inline]
    #[must_use]
    pub fn new(version: u32) -> Self {
        Self {
            version,
            entries: IndexMap::new(),
            exclusions: Vec::new(),
            base_utilities: Vec::new(),
            base_dependencies: Vec::new(),
        }
    }

    /// The built-in catalog, built once
    #[inline]
    #[must_use]
    pub fn builtin() -> &'static PatternCatalog {
        &BUILTIN
    }

    /// Register a pattern entry
    #[inline]
    #[must_use]
    pub fn with_entry(mut self, pattern: PatternType, entry: PatternEntry) -> Self {
        self.entries.insert(pattern, entry);
        self
    }

    /// Register an exclusion
    #[inline]
    #[must_use]
    pub fn with_exclusion(
        mut self,
        first: PatternType,
        second: PatternType,
        reason: impl Into<String>,
    ) -> Self {
        self.exclusions.push(Exclusion {
            first,
            second,
            reason: reason.into(),
        });
        self
    }

    /// Register a utility shared by every pattern
    #[inline]
    #[must_use]
    pub fn with_base_utility(mut self, utility: UtilityTemplate) -> Self {
        self.base_utilities.push(utility);
        self
    }

    /// Register a dependency shared by every pattern
    #[inline]
    #[must_use]
    pub fn with_base_dependency(mut self, dependency: Dependency) -> Self {
        self.base_dependencies.push(dependency);
        self
    }

    /// Data revision
    #[inline]
    #[must_use]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Patterns with an entry, in catalog order
    #[must_use]
    pub fn patterns(&self) -> Vec<PatternType> {
        self.entries.keys().copied().collect()
    }

    /// Whether the pattern has its own entry
    #[inline]
    #[must_use]
    pub fn contains(&self, pattern: PatternType) -> bool {
        self.entries.contains_key(&pattern)
    }

    /// Node templates for a pattern, without fallback
    #[must_use]
    pub fn try_templates(&self, pattern: PatternType) -> Option<Vec<NodeTemplate>> {
        self.entries.get(&pattern).map(|e| e.nodes.clone())
    }

    /// Node templates for a pattern
    ///
    /// Returns a deep copy. Falls back to [`DEFAULT_PATTERN`]'s templates when
    /// the pattern has no entry (HYBRID never has one). Returns an empty list
    /// only if the fallback entry is missing too.
    #[must_use]
    pub fn get_templates(&self, pattern: PatternType) -> Vec<NodeTemplate> {
        self.try_templates(pattern)
            .or_else(|| self.try_templates(DEFAULT_PATTERN))
            .unwrap_or_default()
    }

    /// Union of node templates across patterns
    ///
    /// Keeps first-seen order in the given priority order: later patterns
    /// contribute only names not already present. Each pattern resolves
    /// through [`Self::get_templates`].
    #[must_use]
    pub fn compose_hybrid(&self, patterns: &[PatternType]) -> Vec<NodeTemplate> {
        let mut merged: Vec<NodeTemplate> = Vec::new();
        for pattern in patterns {
            for template in self.get_templates(*pattern) {
                if !merged.iter().any(|t| t.name == template.name) {
                    merged.push(template);
                }
            }
        }
        merged
    }

    /// Conditional edges suggested by the given patterns, de-duplicated
    #[must_use]
    pub fn edges(&self, patterns: &[PatternType]) -> Vec<EdgeTemplate> {
        let mut edges: Vec<EdgeTemplate> = Vec::new();
        for entry in patterns.iter().filter_map(|p| self.entries.get(p)) {
            for edge in &entry.edges {
                if !edges.contains(edge) {
                    edges.push(edge.clone());
                }
            }
        }
        edges
    }

    /// Base utilities followed by each pattern's extras, unique by name
    #[must_use]
    pub fn utilities(&self, patterns: &[PatternType]) -> Vec<UtilityTemplate> {
        let extras = patterns
            .iter()
            .filter_map(|p| self.entries.get(p))
            .flat_map(|e| e.utilities.iter());

        let mut utilities: Vec<UtilityTemplate> = Vec::new();
        for utility in self.base_utilities.iter().chain(extras) {
            if !utilities.iter().any(|u| u.name == utility.name) {
                utilities.push(utility.clone());
            }
        }
        utilities
    }

    /// State inputs of the given patterns, unique by name
    ///
    /// Falls back to [`DEFAULT_PATTERN`]'s inputs when none of the patterns
    /// declares any.
    #[must_use]
    pub fn state_inputs(&self, patterns: &[PatternType]) -> Vec<StateInput> {
        let mut inputs: Vec<StateInput> = Vec::new();
        for entry in patterns.iter().filter_map(|p| self.entries.get(p)) {
            for input in &entry.state_inputs {
                if !inputs.iter().any(|i| i.name == input.name) {
                    inputs.push(input.clone());
                }
            }
        }
        if inputs.is_empty() {
            if let Some(entry) = self.entries.get(&DEFAULT_PATTERN) {
                inputs.clone_from(&entry.state_inputs);
            }
        }
        inputs
    }

    /// Base dependency set ∪ each pattern's extra set, first-seen order
    #[must_use]
    pub fn dependencies(&self, patterns: &[PatternType]) -> DependencyManifest {
        let extras = patterns
            .iter()
            .filter_map(|p| self.entries.get(p))
            .flat_map(|e| e.dependencies.iter().cloned());

        self.base_dependencies.iter().cloned().chain(extras).collect()
    }

    /// Whether two patterns are known to be incompatible
    #[inline]
    #[must_use]
    pub fn is_excluded(&self, a: PatternType, b: PatternType) -> bool {
        self.exclusions.iter().any(|e| e.covers(a, b))
    }

    /// Exclusion record for a pair, if any
    #[must_use]
    pub fn exclusion(&self, a: PatternType, b: PatternType) -> Option<Exclusion> {
        self.exclusions.iter().find(|e| e.covers(a, b)).cloned()
    }

    /// First excluded pair among a set of patterns
    #[must_use]
    pub fn first_conflict(&self, patterns: &[PatternType]) -> Option<Exclusion> {
        patterns.iter().enumerate().find_map(|(i, a)| {
            patterns[i + 1..]
                .iter()
                .find_map(|b| self.exclusion(*a, *b))
        })
    }

    /// All exclusion records
    #[must_use]
    pub fn exclusions(&self) -> Vec<Exclusion> {
        self.exclusions.clone()
    }
}
