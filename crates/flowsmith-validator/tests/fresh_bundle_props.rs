use flowsmith_catalog::{Complexity, NodeTemplate, PatternType};
use flowsmith_classifier::PatternRecommendation;
use flowsmith_composer::{GraphComposer, ProjectSpec};
use flowsmith_validator::{IssueCategory, StructuralValidator};
use proptest::prelude::*;

const CUSTOM_NODES: [&str; 4] = ["ScoreTickets", "Notify", "RankResults", "Archive"];

fn scenario() -> impl Strategy<Value = (PatternRecommendation, ProjectSpec)> {
    (
        prop::sample::subsequence(PatternType::CONCRETE.to_vec(), 1..=2),
        prop_oneof![
            Just(Complexity::Simple),
            Just(Complexity::Enhanced),
            Just(Complexity::Advanced),
        ],
        prop::sample::subsequence(CUSTOM_NODES.to_vec(), 0..=2),
        any::<bool>(),
    )
        .prop_map(|(patterns, complexity, custom, collection_description)| {
            let rec = if patterns.len() == 1 {
                PatternRecommendation::direct(patterns[0], 0.7)
            } else {
                PatternRecommendation::hybrid(patterns, 0.5)
            };
            let description = if collection_description {
                "Process every incoming ticket in parallel"
            } else {
                "Handle one request"
            };
            let mut project = ProjectSpec::new("prop")
                .with_description(description)
                .with_complexity(complexity);
            for name in custom {
                project = project.with_node(NodeTemplate::new(name, "Handle each item"));
            }
            (rec, project)
        })
}

proptest! {
    #[test]
    fn prop_fresh_bundles_are_valid_and_marked((rec, project) in scenario()) {
        let composition = GraphComposer::builtin().compose(&rec, &project).unwrap();
        let result = StructuralValidator::default().validate(&composition.bundle).unwrap();

        prop_assert!(result.is_valid());
        prop_assert_eq!(result.with_category(IssueCategory::MissingPlaceholder).count(), 0);
        prop_assert_eq!(result.with_category(IssueCategory::DanglingEdge).count(), 0);
        prop_assert_eq!(result.with_category(IssueCategory::UnreachableNode).count(), 0);
    }
}
