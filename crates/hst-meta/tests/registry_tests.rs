//! Integration tests for the metadata registry and caching provider

use hst_meta::{
    CachingMetadataProvider, ComponentMetadataProvider, FieldGroupDefinition, MetadataRegistry,
    ParameterDefinition, ParametersInfoDefinition,
};
use std::sync::Arc;

fn registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry.register_interface(
        ParametersInfoDefinition::new("ListInfo")
            .with_parameter(ParameterDefinition::new("pageSize"))
            .with_field_group(FieldGroupDefinition::new("paging", &["pageSize"])),
    );
    registry.bind("com.example.List", "ListInfo");
    registry
}

#[test]
fn test_lookup_through_binding() {
    let registry = registry();
    let info = registry.parameters_info("com.example.List").unwrap();
    assert_eq!(info.parameters()[0].name, "pageSize");
    assert_eq!(info.field_groups()[0].title_key, "paging");
}

#[test]
fn test_unknown_class_returns_none() {
    assert!(registry().parameters_info("com.example.Unknown").is_none());
}

#[test]
fn test_extend_merges_registries() {
    let mut base = MetadataRegistry::with_builtins();
    let before = base.len();
    base.extend(registry());
    assert_eq!(base.len(), before + 1);
    assert!(base.parameters_info("com.example.List").is_some());
}

#[test]
fn test_caching_provider_over_shared_registry() {
    let shared = Arc::new(registry());
    let provider = CachingMetadataProvider::new(Arc::clone(&shared));

    let first = provider.parameters_info("com.example.List").unwrap();
    let second = provider.parameters_info("com.example.List").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(provider.cached_len(), 1);
}

#[test]
fn test_caching_provider_is_usable_across_threads() {
    let provider = Arc::new(CachingMetadataProvider::new(registry()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = Arc::clone(&provider);
            std::thread::spawn(move || provider.parameters_info("com.example.List").is_some())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
    assert_eq!(provider.cached_len(), 1);
}
