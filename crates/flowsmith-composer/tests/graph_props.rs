use flowsmith_artifact::ArtifactId;
use flowsmith_catalog::{Complexity, PatternType};
use flowsmith_classifier::PatternRecommendation;
use flowsmith_composer::{render_mermaid, GraphComposer, ProjectSpec};
use proptest::prelude::*;

fn recommendation() -> impl Strategy<Value = PatternRecommendation> {
    prop::sample::subsequence(PatternType::CONCRETE.to_vec(), 1..=3).prop_map(|patterns| {
        if patterns.len() == 1 {
            PatternRecommendation::direct(patterns[0], 0.7)
        } else {
            PatternRecommendation::hybrid(patterns, 0.5)
        }
    })
}

fn complexity() -> impl Strategy<Value = Complexity> {
    prop_oneof![
        Just(Complexity::Simple),
        Just(Complexity::Enhanced),
        Just(Complexity::Advanced),
    ]
}

proptest! {
    #[test]
    fn prop_every_composed_graph_is_well_formed(
        rec in recommendation(),
        complexity in complexity(),
    ) {
        let project = ProjectSpec::new("prop").with_complexity(complexity);
        let composition = GraphComposer::builtin().compose(&rec, &project).unwrap();
        let graph = &composition.graph;

        prop_assert!(!graph.terminals().is_empty());
        prop_assert_eq!(graph.start().name.as_str(), graph.nodes()[0].name.as_str());

        let diagram = render_mermaid(graph);
        prop_assert_eq!(diagram.lines().count(), 1 + graph.node_count() + graph.edge_count());

        let flow = composition.bundle.source(&ArtifactId::Flow).unwrap();
        let nodes = composition.bundle.source(&ArtifactId::Nodes).unwrap();
        for node in graph.nodes() {
            let class_line = format!("class {}(", node.name);
            prop_assert!(nodes.contains(&class_line));
            let call = format!("{}()", node.name);
            prop_assert!(flow.contains(&call));
        }
    }

    #[test]
    fn prop_composition_is_repeatable(rec in recommendation()) {
        let project = ProjectSpec::new("prop");
        let composer = GraphComposer::builtin();
        let first = composer.compose(&rec, &project).unwrap();
        let second = composer.compose(&rec, &project).unwrap();
        prop_assert_eq!(first.bundle.fingerprint(), second.bundle.fingerprint());
    }
}
