use flowsmith_artifact::{Artifact, ArtifactBundle, ArtifactId, Dependency, DependencyManifest, Fingerprinter};
use proptest::prelude::*;

fn utility_bundle(sources: &[String]) -> ArtifactBundle {
    sources
        .iter()
        .enumerate()
        .fold(ArtifactBundle::new("prop"), |bundle, (i, source)| {
            bundle.with_artifact(Artifact::python(
                ArtifactId::utility(format!("util_{i}")),
                format!("utils/util_{i}.py"),
                source.clone(),
            ))
        })
}

proptest! {
    #[test]
    fn prop_part_boundaries_change_the_fingerprint(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
        let mut joined = Fingerprinter::new();
        joined.update(&format!("{a}{b}"));
        let mut split = Fingerprinter::new();
        split.update(&a).update(&b);
        prop_assert_ne!(joined.finish(), split.finish());
    }

    #[test]
    fn prop_editing_one_source_changes_the_fingerprint(
        sources in prop::collection::vec("[a-z ]{0,24}", 1..6),
        index in any::<prop::sample::Index>(),
        suffix in "[a-z]{1,4}",
    ) {
        let bundle = utility_bundle(&sources);
        let i = index.index(sources.len());
        let mut edited = sources.clone();
        edited[i].push_str(&suffix);

        prop_assert_eq!(bundle.fingerprint(), utility_bundle(&sources).fingerprint());
        prop_assert_ne!(bundle.fingerprint(), utility_bundle(&edited).fingerprint());
    }

    #[test]
    fn prop_json_keeps_order_and_fingerprint(
        sources in prop::collection::vec("[a-z\n ]{0,40}", 0..6),
        deps in prop::collection::vec("[a-z]{2,6}", 0..4),
    ) {
        let mut manifest = DependencyManifest::new();
        manifest.extend(deps.iter().map(|name| Dependency::new(name.as_str())));
        let bundle = utility_bundle(&sources).with_dependencies(manifest);

        let restored = ArtifactBundle::from_json(&bundle.to_json().unwrap()).unwrap();
        prop_assert_eq!(restored.ids(), bundle.ids());
        prop_assert_eq!(restored.fingerprint(), bundle.fingerprint());
    }
}
