//! Publishing fixture configurations through the model registry

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use hst_core::{ComponentView, EngineConfig, ModelRegistry};
use hst_meta::MetadataRegistry;
use hst_node::{HstNode, NodeStore, NodeType};
use hst_test_utils::nodes::{ConfigurationBuilder, component};
use rstest::rstest;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/configurations")
}

fn configurations() -> Vec<HstNode> {
    let folder = NodeStore::new().load(fixtures().join("sites.json")).unwrap();
    folder
        .children_of_type(NodeType::Configuration)
        .cloned()
        .collect()
}

fn registry() -> ModelRegistry {
    ModelRegistry::new(EngineConfig::default(), Arc::new(MetadataRegistry::with_builtins()))
}

#[test]
fn test_cyclic_configuration_fails_alone() {
    let registry = registry();
    let model = registry.reload(&configurations());

    let intranet = model.configuration("intranet").unwrap();
    let start = intranet.component_configuration("hst:pages/start").unwrap();
    assert_eq!(start.render_path(), Some("webfile:/ftl/start.ftl"));
    assert_eq!(start.parameter("greeting"), Some("Hello"));

    assert!(model.configuration("looping").is_none());
    let reason = &model.failures()["looping"];
    assert!(reason.contains("hst:pages/a"), "unexpected failure: {reason}");
}

#[rstest]
#[case(1)]
#[case(3)]
fn test_generations_increase(#[case] reloads: u64) {
    let registry = registry();
    let configurations = configurations();
    for _ in 0..reloads {
        registry.reload(&configurations);
    }
    assert_eq!(registry.load().generation(), reloads);
}

#[test]
fn test_readers_keep_their_snapshot() {
    let registry = Arc::new(registry());
    registry.reload(&configurations());
    let before = registry.load();

    let replacement = ConfigurationBuilder::new("intranet")
        .page(component("start").param("greeting", "Bye"))
        .build();
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let snapshot = Arc::clone(&before);
            thread::spawn(move || {
                let intranet = snapshot.configuration("intranet").unwrap();
                intranet
                    .component_configuration("hst:pages/start")
                    .and_then(|c| c.parameter("greeting").map(str::to_string))
            })
        })
        .collect();
    registry.reload(&[replacement]);

    for reader in readers {
        assert_eq!(reader.join().unwrap().as_deref(), Some("Hello"));
    }
    let after = registry.load();
    let start = after
        .configuration("intranet")
        .unwrap()
        .component_configuration("hst:pages/start")
        .unwrap();
    assert_eq!(start.parameter("greeting"), Some("Bye"));
    assert!(after.failures().is_empty());
}
