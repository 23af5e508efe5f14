//! End-to-end resolution of the fixture configurations
//!
//! These tests exercise the complete flow: node documents on disk -> engine
//! settings and component metadata -> resolved, finalized component model.

use std::path::PathBuf;
use std::sync::Arc;

use hst_core::{ComponentView, ComponentsConfiguration, EngineConfig, ResolvedComponent};
use hst_meta::{CachingMetadataProvider, DefinitionLoader, MetadataRegistry};
use hst_node::{HstNode, NodeStore};
use pretty_assertions::assert_eq;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../test-fixtures/configurations")
}

fn load_node(name: &str) -> HstNode {
    NodeStore::new().load(fixtures().join(name)).unwrap()
}

fn engine() -> EngineConfig {
    EngineConfig::load(fixtures().join("engine.toml")).unwrap()
}

fn metadata() -> MetadataRegistry {
    let mut registry = MetadataRegistry::with_builtins();
    registry.extend(DefinitionLoader::new().load_dir(fixtures().join("metadata")).unwrap());
    registry
}

fn site() -> ComponentsConfiguration {
    ComponentsConfiguration::load(
        &load_node("site.yaml"),
        &engine(),
        Arc::new(CachingMetadataProvider::new(metadata())),
    )
    .unwrap()
}

fn names(components: &[Arc<ResolvedComponent>]) -> Vec<&str> {
    let mut names: Vec<&str> = components.iter().map(|c| c.name()).collect();
    names.sort();
    names
}

#[test]
fn test_sections_are_loaded() {
    let site = site();

    assert_eq!(site.name(), "demo");
    let roots: Vec<&str> = site.component_configurations().keys().map(String::as_str).collect();
    assert_eq!(
        roots,
        vec![
            "hst:abstractpages/base",
            "hst:components/header",
            "hst:pages/about",
            "hst:pages/home",
            "hst:prototypepages/one-column",
            "hst:xpages/article",
        ]
    );
    assert!(site.prototype_pages().contains_key("hst:prototypepages/one-column"));
    assert!(site.xpage_layouts().contains_key("hst:xpages/article"));

    let items: Vec<&str> = site.available_container_items().keys().map(String::as_str).collect();
    assert_eq!(items, vec!["hst:catalog/basic/banner", "hst:catalog/basic/text"]);
    assert_eq!(site.templates().len(), 5);
}

#[test]
fn test_page_inherits_from_abstract_page() {
    let site = site();
    let home = site.component_configuration("hst:pages/home").unwrap();

    assert_eq!(home.template(), Some("layout"));
    assert_eq!(home.render_path(), Some("webfile:/ftl/layout.ftl"));
    assert_eq!(home.parameter("title"), Some("Welcome"));
    assert_eq!(home.parameter("theme"), Some("dark"));
    assert_eq!(home.prefixed_parameter("mobile", "title", "|"), Some("Hi"));
    assert_eq!(names(home.children()), vec!["aside", "footer", "header", "main"]);

    let header = home.child("header").unwrap();
    assert!(header.is_inherited());
    assert_eq!(header.component_class_name(), Some("com.example.Header"));
    assert_eq!(header.render_path(), Some("webfile:/ftl/header.ftl"));

    let footer = home.child("footer").unwrap();
    assert_eq!(footer.render_path(), Some("jcr:/demo/hst:templates/footer"));
    assert_eq!(footer.parent().unwrap().id(), "hst:pages/home");

    let about = site.component_configuration("hst:pages/about").unwrap();
    assert_eq!(about.parameter("title"), Some("About us"));
    assert!(about.variants().is_empty());
}

#[test]
fn test_container_reference_and_catalog_definition() {
    let site = site();
    let main = site.component_configuration("hst:pages/home/main").unwrap();

    assert!(main.is_container());
    assert!(main.is_container_component_reference());
    assert_eq!(main.xtype(), Some("hst.vbox"));
    assert_eq!(main.locked_by(), Some("editor"));

    let banner = main.child("banner").unwrap();
    assert_eq!(banner.id(), "hst:pages/home/main/banner");
    assert!(banner.is_container_item());
    assert_eq!(banner.locked_by(), Some("editor"));
    assert_eq!(banner.component_class_name(), Some("com.example.Banner"));
    assert_eq!(banner.label(), Some("Banner"));
    assert_eq!(banner.render_path(), Some("webfile:/ftl/banner.ftl"));
    assert_eq!(banner.parameter("size"), Some("large"));
    assert_eq!(banner.prefixed_parameter("mobile", "size", "|"), Some("medium"));
    assert!(banner.children().is_empty());
}

#[test]
fn test_class_metadata_is_attached() {
    let site = site();
    let banner = site
        .component_configuration("hst:pages/home/main/banner")
        .unwrap();

    let declared: Vec<&str> = banner.dynamic_parameters().iter().map(|p| p.name()).collect();
    assert_eq!(declared, vec!["size", "document", "cssClass"]);
    assert!(!banner.dynamic_parameter("document").unwrap().is_residual());
    assert!(banner.dynamic_parameter("document").unwrap().definition.required);

    let groups: Vec<&str> = banner.field_groups().iter().map(|g| g.title_key.as_str()).collect();
    assert_eq!(groups, vec!["layout", "content", "styling"]);

    let header = site.component_configuration("hst:components/header").unwrap();
    assert!(header.dynamic_parameters().is_empty());
}

#[test]
fn test_async_boundary_isolates_variants_and_cacheability() {
    let site = site();
    let home = site.component_configuration("hst:pages/home").unwrap();
    let aside = home.child("aside").unwrap();

    assert!(aside.is_async());
    assert_eq!(aside.async_mode(), Some("ajax"));
    assert!(!aside.is_composite_cacheable());
    assert!(!aside.child("feed").unwrap().is_composite_cacheable());
    assert!(aside.variants().contains("professional"));
    assert!(aside.variants().contains("mobile"));

    assert!(home.is_composite_cacheable());
    assert!(!home.variants().contains("professional"));
    assert!(home.variants().contains("mobile"));

    let expected: Vec<&str> = vec!["mobile"];
    let mount: Vec<&str> = site.mount_variants().iter().map(String::as_str).collect();
    assert_eq!(mount, expected);
    assert_eq!(aside.mount_variants(), site.mount_variants());
}

#[test]
fn test_parameters_flow_to_children() {
    let site = site();
    let aside = site.component_configuration("hst:pages/home/aside").unwrap();

    assert_eq!(aside.parameter("limit"), Some("5"));
    assert_eq!(aside.prefixed_parameter("professional", "limit", "|"), Some("10"));
    assert_eq!(aside.parameter("title"), Some("Welcome"));
    assert_eq!(aside.parameter("theme"), Some("dark"));
    assert_eq!(aside.prefixed_parameter("mobile", "title", "|"), Some("Hi"));
}

#[test]
fn test_xpage_overlay_from_documents() {
    let site = site();
    let document = load_node("article-page.yaml");

    let page = site.xpage_overlay("hst:xpages/article", &document).unwrap();

    assert_eq!(page.id(), "hst:xpages/article");
    assert_eq!(page.render_path(), Some("webfile:/ftl/layout.ftl"));
    assert!(page.child("header").is_some());

    let main = page.child("main").unwrap();
    assert!(!main.is_unresolved_xpage_layout_container());
    assert_eq!(
        main.children().iter().map(|c| c.name()).collect::<Vec<_>>(),
        vec!["intro", "hero"]
    );
    let intro = main.child("intro").unwrap();
    assert!(intro.is_experience_page_component());
    assert_eq!(intro.parameter("body"), Some("Hello"));
    assert_eq!(intro.label(), Some("Text"));
    assert_eq!(intro.render_path(), Some("webfile:/ftl/text.ftl"));
    let hero = main.child("hero").unwrap();
    assert_eq!(hero.parameter("size"), Some("small"));
    assert_eq!(hero.field_groups().len(), 3);

    assert!(page.child("aside").unwrap().is_unresolved_xpage_layout_container());

    let layout = &site.xpage_layouts()["hst:xpages/article"];
    assert!(layout.child("main").unwrap().children().is_empty());
}

#[test]
fn test_documents_in_other_formats_resolve_identically() {
    let node = load_node("site.yaml");
    let temp = tempfile::TempDir::new().unwrap();
    let json = temp.path().join("site.json");
    std::fs::write(&json, serde_json::to_string_pretty(&node).unwrap()).unwrap();

    let from_json = ComponentsConfiguration::load(
        &NodeStore::new().load(&json).unwrap(),
        &engine(),
        Arc::new(metadata()),
    )
    .unwrap();
    let from_yaml = site();

    assert_eq!(from_json.component_count(), from_yaml.component_count());
    assert_eq!(from_json.mount_variants(), from_yaml.mount_variants());
    let home = from_json.component_configuration("hst:pages/home").unwrap();
    assert_eq!(home.prefixed_parameter("mobile", "title", "|"), Some("Hi"));
}
