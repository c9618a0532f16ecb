//! Graph composer
//!
//! Turns a [`PatternRecommendation`] and a [`ProjectSpec`] into a
//! [`WorkflowGraph`] and the artifact bundle implementing it.

use crate::contracts::{derive_contracts, DataContract};
use crate::error::ComposeError;
use crate::generate::{default_generators, ArtifactGenerator, GenerationContext};
use crate::graph::{Edge, WorkflowGraph};
use crate::heuristics::BatchCues;
use crate::naming::{
    instance_name, is_snake_identifier, is_valid_label, node_name_problem, python_parser,
    result_key, signature_problem,
};
use crate::project::ProjectSpec;
use flowsmith_artifact::ArtifactBundle;
use flowsmith_catalog::{
    Complexity, NodeTemplate, PatternCatalog, PatternType, ProcessingMode, UtilityTemplate,
    DEFAULT_PATTERN,
};
use flowsmith_classifier::PatternRecommendation;
use serde::{Deserialize, Serialize};

/// Label of the default chain transitions
pub const SUCCESS_LABEL: &str = "success";
/// Label of failure transitions
pub const ERROR_LABEL: &str = "error";
/// Label of the transition into an appended terminal
pub const DONE_LABEL: &str = "done";
/// Failure-handling node added for advanced scaffolds
pub const ERROR_NODE: &str = "HandleError";
/// Terminal appended when a graph has none
pub const TERMINAL_NODE: &str = "CompleteRun";

/// Composer limits and heuristic thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Independent cues needed to upgrade a node to batch mode
    pub min_batch_cues: usize,
    /// Largest graph the composer will build
    pub max_nodes: usize,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            min_batch_cues: 2,
            max_nodes: 64,
        }
    }
}

impl ComposerConfig {
    /// With batch cue threshold
    #[inline]
    #[must_use]
    pub fn with_min_batch_cues(mut self, cues: usize) -> Self {
        self.min_batch_cues = cues;
        self
    }

    /// With node cap
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = max;
        self
    }
}

/// Something the composer changed or assumed along the way
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComposeWarning {
    /// A custom node replaced a catalog node of the same name
    NodeOverridden {
        /// Node name
        name: String,
    },
    /// A custom utility replaced a catalog utility of the same name
    UtilityOverridden {
        /// Utility name
        name: String,
    },
    /// The collection heuristic changed a node's mode
    ModeUpgraded {
        /// Node name
        name: String,
        /// New mode
        mode: ProcessingMode,
    },
    /// HYBRID arrived without components; the default pattern was used
    HybridFallback,
    /// A pattern had no entry and the default pattern's templates were used
    PatternFallback {
        /// Requested pattern
        pattern: PatternType,
    },
}

/// Result of one composition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    /// Composed graph
    pub graph: WorkflowGraph,
    /// Generated artifacts
    pub bundle: ArtifactBundle,
    /// Overrides, upgrades and fallbacks applied
    pub warnings: Vec<ComposeWarning>,
}

/// Builds graphs and bundles from catalog templates
#[derive(Debug)]
pub struct GraphComposer<'c> {
    catalog: &'c PatternCatalog,
    config: ComposerConfig,
    generators: Vec<Box<dyn ArtifactGenerator>>,
}

impl GraphComposer<'static> {
    /// Composer over the built-in catalog
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(PatternCatalog::builtin(), ComposerConfig::default())
    }
}

impl<'c> GraphComposer<'c> {
    /// Create a composer with the standard generators
    #[must_use]
    pub fn new(catalog: &'c PatternCatalog, config: ComposerConfig) -> Self {
        Self {
            catalog,
            config,
            generators: default_generators(),
        }
    }

    /// Append a generator after the standard set
    #[must_use]
    pub fn with_generator(mut self, generator: Box<dyn ArtifactGenerator>) -> Self {
        self.generators.push(generator);
        self
    }

    /// Active configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose a graph and its artifact bundle
    ///
    /// # Errors
    /// - [`ComposeError::EmptyProjectName`] for a blank name
    /// - [`ComposeError::InvalidNodeName`], [`ComposeError::InvalidUtilityName`],
    ///   [`ComposeError::InvalidEdgeLabel`] or
    ///   [`ComposeError::UnknownEdgeEndpoint`] for bad custom entries
    /// - [`ComposeError::InvalidUtilitySignature`] for a custom utility whose
    ///   signature is not a Python function header
    /// - [`ComposeError::NameCollision`] when two nodes map to the same
    ///   variable or result key, or a node reuses a contract name
    /// - [`ComposeError::PatternNotInCatalog`] when even the fallback is missing
    /// - [`ComposeError::TooManyNodes`] over the node cap
    pub fn compose(
        &self,
        recommendation: &PatternRecommendation,
        project: &ProjectSpec,
    ) -> Result<Composition, ComposeError> {
        if project.name.trim().is_empty() {
            return Err(ComposeError::EmptyProjectName);
        }
        validate_custom_entries(project)?;

        let mut warnings = Vec::new();
        let complexity = recommendation.complexity().unwrap_or(project.complexity);
        let patterns = self.resolve_patterns(recommendation, &mut warnings);

        let nodes = self.resolve_nodes(recommendation.primary(), &patterns)?;
        let nodes = merge_custom_nodes(nodes, &project.custom_nodes, &mut warnings);
        let nodes = self.apply_heuristic(nodes, &project.description, &mut warnings);
        let graph = self.build_graph(nodes, &patterns, project, complexity)?;

        let utilities = merge_utilities(
            self.catalog.utilities(&patterns),
            &project.custom_utilities,
            &mut warnings,
        );
        let state_inputs = self.catalog.state_inputs(&patterns);
        let contracts = derive_contracts(&graph, &state_inputs);
        check_generated_names(&graph, &contracts)?;
        let dependencies = self.catalog.dependencies(&patterns);

        let ctx = GenerationContext {
            project,
            recommendation,
            patterns: &patterns,
            graph: &graph,
            utilities: &utilities,
            state_inputs: &state_inputs,
            contracts: &contracts,
            dependencies: &dependencies,
            complexity,
        };

        let mut bundle =
            ArtifactBundle::new(project.name.trim()).with_dependencies(dependencies.clone());
        for generator in &self.generators {
            let artifacts = generator.generate(&ctx);
            tracing::debug!(
                generator = generator.name(),
                count = artifacts.len(),
                "artifacts generated"
            );
            for artifact in artifacts {
                bundle.insert(artifact);
            }
        }

        tracing::info!(
            project = %project.name,
            pattern = %recommendation.primary(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            artifacts = bundle.len(),
            fingerprint = %bundle.fingerprint().short(),
            "bundle composed"
        );

        Ok(Composition {
            graph,
            bundle,
            warnings,
        })
    }

    fn resolve_patterns(
        &self,
        recommendation: &PatternRecommendation,
        warnings: &mut Vec<ComposeWarning>,
    ) -> Vec<PatternType> {
        let patterns = recommendation.effective_patterns();
        if patterns.is_empty() {
            tracing::warn!(fallback = %DEFAULT_PATTERN, "HYBRID recommendation without components");
            warnings.push(ComposeWarning::HybridFallback);
            return vec![DEFAULT_PATTERN];
        }
        patterns
            .into_iter()
            .map(|pattern| {
                if self.catalog.contains(pattern) {
                    pattern
                } else {
                    tracing::warn!(%pattern, fallback = %DEFAULT_PATTERN, "no catalog entry for pattern");
                    warnings.push(ComposeWarning::PatternFallback { pattern });
                    DEFAULT_PATTERN
                }
            })
            .fold(Vec::new(), |mut acc, p| {
                if !acc.contains(&p) {
                    acc.push(p);
                }
                acc
            })
    }

    fn resolve_nodes(
        &self,
        primary: PatternType,
        patterns: &[PatternType],
    ) -> Result<Vec<NodeTemplate>, ComposeError> {
        let nodes = match patterns {
            [single] => self.catalog.get_templates(*single),
            _ => self.catalog.compose_hybrid(patterns),
        };
        if nodes.is_empty() {
            return Err(ComposeError::PatternNotInCatalog(primary));
        }
        Ok(nodes)
    }

    fn apply_heuristic(
        &self,
        nodes: Vec<NodeTemplate>,
        description: &str,
        warnings: &mut Vec<ComposeWarning>,
    ) -> Vec<NodeTemplate> {
        nodes
            .into_iter()
            .map(|mut node| {
                let cues = BatchCues::gather(&node, description);
                let mode = cues.resolve(node.processing_mode, self.config.min_batch_cues);
                if mode != node.processing_mode {
                    tracing::debug!(node = %node.name, %mode, cues = cues.count(), "processing mode upgraded");
                    warnings.push(ComposeWarning::ModeUpgraded {
                        name: node.name.clone(),
                        mode,
                    });
                    node.processing_mode = mode;
                }
                node
            })
            .collect()
    }

    fn build_graph(
        &self,
        mut nodes: Vec<NodeTemplate>,
        patterns: &[PatternType],
        project: &ProjectSpec,
        complexity: Complexity,
    ) -> Result<WorkflowGraph, ComposeError> {
        let mut edges: Vec<Edge> = nodes
            .windows(2)
            .map(|pair| Edge::new(&pair[0].name, &pair[1].name, SUCCESS_LABEL))
            .collect();

        let declared = |nodes: &[NodeTemplate], name: &str| nodes.iter().any(|n| n.name == name);

        for template in self.catalog.edges(patterns) {
            if declared(&nodes, &template.from)
                && declared(&nodes, &template.to)
                && !edges.iter().any(|e| e.from == template.from && e.label == template.label)
            {
                edges.push(Edge::new(template.from, template.to, template.label));
            }
        }

        for custom in &project.custom_edges {
            if !declared(&nodes, &custom.from) || !declared(&nodes, &custom.to) {
                return Err(ComposeError::UnknownEdgeEndpoint {
                    from: custom.from.clone(),
                    to: custom.to.clone(),
                });
            }
            let edge = Edge::new(&custom.from, &custom.to, &custom.label);
            match edges
                .iter_mut()
                .find(|e| e.from == custom.from && e.label == custom.label)
            {
                Some(existing) => *existing = edge,
                None => edges.push(edge),
            }
        }

        if complexity == Complexity::Advanced && !declared(&nodes, ERROR_NODE) {
            for node in &nodes {
                if !edges.iter().any(|e| e.from == node.name && e.label == ERROR_LABEL) {
                    edges.push(Edge::new(&node.name, ERROR_NODE, ERROR_LABEL));
                }
            }
            nodes.push(NodeTemplate::new(
                ERROR_NODE,
                "Record the failure and decide whether the run can continue",
            ));
        }

        let has_terminal = nodes
            .iter()
            .any(|n| !edges.iter().any(|e| e.from == n.name));
        if !has_terminal && !declared(&nodes, TERMINAL_NODE) {
            if let Some(last) = nodes.last().map(|n| n.name.clone()) {
                edges.push(Edge::new(last, TERMINAL_NODE, DONE_LABEL));
                nodes.push(NodeTemplate::new(TERMINAL_NODE, "Finish the run and report the outcome"));
            }
        }

        if nodes.len() > self.config.max_nodes {
            return Err(ComposeError::TooManyNodes {
                count: nodes.len(),
                limit: self.config.max_nodes,
            });
        }
        Ok(WorkflowGraph::new(nodes, edges)?)
    }
}

fn validate_custom_entries(project: &ProjectSpec) -> Result<(), ComposeError> {
    for node in &project.custom_nodes {
        if let Some(reason) = node_name_problem(&node.name) {
            return Err(ComposeError::InvalidNodeName {
                name: node.name.clone(),
                reason,
            });
        }
    }
    for utility in &project.custom_utilities {
        if !is_snake_identifier(&utility.name) {
            return Err(ComposeError::InvalidUtilityName(utility.name.clone()));
        }
    }
    if !project.custom_utilities.is_empty() {
        let mut parser = python_parser()?;
        for utility in &project.custom_utilities {
            if let Some(reason) = signature_problem(
                &mut parser,
                &utility.name,
                &utility.input_signature,
                &utility.output_signature,
            ) {
                return Err(ComposeError::InvalidUtilitySignature {
                    name: utility.name.clone(),
                    reason,
                });
            }
        }
    }
    for edge in &project.custom_edges {
        if !is_valid_label(&edge.label) {
            return Err(ComposeError::InvalidEdgeLabel(edge.label.clone()));
        }
    }
    Ok(())
}

/// Every node needs its own flow variable and result key, and no node class
/// may shadow a generated contract
fn check_generated_names(
    graph: &WorkflowGraph,
    contracts: &[DataContract],
) -> Result<(), ComposeError> {
    let nodes = graph.nodes();
    for (i, node) in nodes.iter().enumerate() {
        for other in &nodes[..i] {
            let what = if instance_name(&node.name) == instance_name(&other.name) {
                "flow variable"
            } else if result_key(&node.name) == result_key(&other.name) {
                "result key"
            } else {
                continue;
            };
            return Err(ComposeError::NameCollision {
                name: node.name.clone(),
                other: other.name.clone(),
                what,
            });
        }
        if let Some(contract) = contracts.iter().find(|c| c.name == node.name) {
            return Err(ComposeError::NameCollision {
                name: node.name.clone(),
                other: contract.name.clone(),
                what: "contract class",
            });
        }
    }
    Ok(())
}

/// Same-named custom nodes replace catalog nodes in place; new ones append
fn merge_custom_nodes(
    mut nodes: Vec<NodeTemplate>,
    custom: &[NodeTemplate],
    warnings: &mut Vec<ComposeWarning>,
) -> Vec<NodeTemplate> {
    for node in custom {
        match nodes.iter_mut().find(|n| n.name == node.name) {
            Some(existing) => {
                tracing::warn!(node = %node.name, "custom node overrides catalog node");
                warnings.push(ComposeWarning::NodeOverridden {
                    name: node.name.clone(),
                });
                *existing = node.clone();
            }
            None => nodes.push(node.clone()),
        }
    }
    nodes
}

fn merge_utilities(
    mut utilities: Vec<UtilityTemplate>,
    custom: &[UtilityTemplate],
    warnings: &mut Vec<ComposeWarning>,
) -> Vec<UtilityTemplate> {
    for utility in custom {
        match utilities.iter_mut().find(|u| u.name == utility.name) {
            Some(existing) => {
                tracing::warn!(utility = %utility.name, "custom utility overrides catalog utility");
                warnings.push(ComposeWarning::UtilityOverridden {
                    name: utility.name.clone(),
                });
                *existing = utility.clone();
            }
            None => utilities.push(utility.clone()),
        }
    }
    utilities
}
