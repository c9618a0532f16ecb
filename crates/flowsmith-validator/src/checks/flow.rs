//! Flow module rules

use super::{ArtifactCheck, CheckInput};
use crate::issue::{IssueCategory, ValidationIssue};
use crate::parsers::{Endpoint, PythonModule, Transition};
use flowsmith_artifact::{ArtifactId, ArtifactRole};
use indexmap::IndexMap;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::BTreeSet;

/// Aggregate constructors
const AGGREGATES: [&str; 2] = ["Flow", "AsyncFlow"];

/// Checks flow assembly: aggregate, initializer, start node and edges
#[derive(Debug, Clone, Copy, Default)]
pub struct FlowCheck;

impl ArtifactCheck for FlowCheck {
    fn name(&self) -> &'static str {
        "flow"
    }

    fn applies_to(&self, role: ArtifactRole) -> bool {
        role == ArtifactRole::Flow
    }

    fn check(&self, input: &CheckInput<'_>) -> Vec<ValidationIssue> {
        let Some(module) = input.parsed.python() else {
            return Vec::new();
        };
        let id = input.artifact.id();
        let mut issues = Vec::new();

        // instance name -> class, first binding wins
        let mut instances: IndexMap<String, String> = IndexMap::new();
        for assignment in module.assignments() {
            if let Some(class) = assignment.class {
                if !AGGREGATES.contains(&class.as_str()) {
                    instances.entry(assignment.target).or_insert(class);
                }
            }
        }

        check_initializer(module, id, &mut issues);
        if instances.is_empty() {
            issues.push(ValidationIssue::error(
                IssueCategory::NoNodeInstances,
                id.clone(),
                "no node instances are declared",
            ));
        }
        let start = check_aggregate(module, &instances, input.node_classes, id, &mut issues);

        let transitions = module.transitions();
        match input.node_classes {
            Some(classes) => {
                check_instances(module, &instances, classes, id, &mut issues);
                for transition in &transitions {
                    check_endpoints(transition, &instances, classes, id, &mut issues);
                }
            }
            None => issues.push(ValidationIssue::info(
                IssueCategory::CheckSkipped,
                id.clone(),
                "dangling edge check skipped: nodes artifact unavailable",
            )),
        }

        if let Some(start) = start {
            check_reachability(&start, &instances, &transitions, id, &mut issues);
        }
        issues
    }
}

fn check_initializer(module: &PythonModule<'_>, id: &ArtifactId, issues: &mut Vec<ValidationIssue>) {
    let found = module
        .top_level_functions()
        .iter()
        .any(|f| f.name.starts_with("create_") && f.name.ends_with("flow"));
    if !found {
        issues.push(ValidationIssue::error(
            IssueCategory::MissingInitializer,
            id.clone(),
            "no create_*flow initializer function",
        ));
    }
}

/// Returns the start instance name when it is a declared instance
fn check_aggregate(
    module: &PythonModule<'_>,
    instances: &IndexMap<String, String>,
    node_classes: Option<&BTreeSet<String>>,
    id: &ArtifactId,
    issues: &mut Vec<ValidationIssue>,
) -> Option<String> {
    let calls = module.calls_to(&AGGREGATES);
    let [call] = calls.as_slice() else {
        issues.push(ValidationIssue::error(
            IssueCategory::FlowAggregate,
            id.clone(),
            format!("expected exactly one Flow/AsyncFlow aggregate, found {}", calls.len()),
        ));
        return None;
    };

    match &call.start {
        Some(Endpoint::Instance(name)) if instances.contains_key(name) => Some(name.clone()),
        Some(Endpoint::Class(class))
            if node_classes.map_or(true, |classes| classes.contains(class)) =>
        {
            None
        }
        Some(other) => {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::InvalidStart,
                    id.clone(),
                    format!("{} start '{}' is not a declared node", call.callee, other.text()),
                )
                .at(call.location),
            );
            None
        }
        None => {
            issues.push(
                ValidationIssue::error(
                    IssueCategory::InvalidStart,
                    id.clone(),
                    format!("{} has no start node", call.callee),
                )
                .at(call.location),
            );
            None
        }
    }
}

fn check_instances(
    module: &PythonModule<'_>,
    instances: &IndexMap<String, String>,
    classes: &BTreeSet<String>,
    id: &ArtifactId,
    issues: &mut Vec<ValidationIssue>,
) {
    for assignment in module.assignments() {
        let Some(class) = assignment.class.as_deref() else {
            continue;
        };
        if AGGREGATES.contains(&class) || classes.contains(class) {
            continue;
        }
        if instances.get(&assignment.target).map(String::as_str) == Some(class) {
            issues.push(
                ValidationIssue::warning(
                    IssueCategory::UnknownNodeClass,
                    id.clone(),
                    format!(
                        "{} instantiates {class}, which the nodes module does not declare",
                        assignment.target
                    ),
                )
                .at(assignment.location),
            );
        }
    }
}

fn resolves(endpoint: &Endpoint, instances: &IndexMap<String, String>, classes: &BTreeSet<String>) -> bool {
    match endpoint {
        Endpoint::Instance(name) => instances.get(name).is_some_and(|class| classes.contains(class)),
        Endpoint::Class(class) => classes.contains(class),
        Endpoint::Other(_) => false,
    }
}

fn check_endpoints(
    transition: &Transition,
    instances: &IndexMap<String, String>,
    classes: &BTreeSet<String>,
    id: &ArtifactId,
    issues: &mut Vec<ValidationIssue>,
) {
    let dangling: Vec<&str> = [&transition.from, &transition.to]
        .into_iter()
        .filter(|e| !resolves(e, instances, classes))
        .map(Endpoint::text)
        .collect();
    if dangling.is_empty() {
        return;
    }
    let arrow = match transition.label.as_deref() {
        Some(label) => format!("- \"{label}\" >>"),
        None => ">>".to_string(),
    };
    issues.push(
        ValidationIssue::error(
            IssueCategory::DanglingEdge,
            id.clone(),
            format!(
                "edge {} {arrow} {} references {}, which the nodes module does not declare",
                transition.from.text(),
                transition.to.text(),
                dangling.join(" and ")
            ),
        )
        .at(transition.location),
    );
}

fn check_reachability(
    start: &str,
    instances: &IndexMap<String, String>,
    transitions: &[Transition],
    id: &ArtifactId,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let indices: IndexMap<&str, NodeIndex> = instances
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();

    for transition in transitions {
        if let (Endpoint::Instance(from), Endpoint::Instance(to)) = (&transition.from, &transition.to) {
            if let (Some(&a), Some(&b)) = (indices.get(from.as_str()), indices.get(to.as_str())) {
                graph.add_edge(a, b, ());
            }
        }
    }

    let Some(&root) = indices.get(start) else {
        return;
    };
    let mut reached = BTreeSet::new();
    let mut dfs = Dfs::new(&graph, root);
    while let Some(index) = dfs.next(&graph) {
        reached.insert(index);
    }

    for (name, index) in &indices {
        if !reached.contains(index) {
            issues.push(ValidationIssue::warning(
                IssueCategory::UnreachableNode,
                id.clone(),
                format!("{name} is not reachable from {start}"),
            ));
        }
    }
}
