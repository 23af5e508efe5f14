use std::sync::Arc;

use hst_core::{ComponentView, ComponentsConfiguration, EngineConfig, Error};
use hst_meta::{
    FieldGroupDefinition, MetadataRegistry, ParameterDefinition, ParametersInfoDefinition,
};
use hst_node::HstNode;
use hst_test_utils::nodes::{
    ConfigurationBuilder, component, container, container_reference, dynamic_parameter, item,
};
use pretty_assertions::assert_eq;

fn registry() -> Arc<MetadataRegistry> {
    let mut registry = MetadataRegistry::with_builtins();
    registry.register_interface(
        ParametersInfoDefinition::new("BannerInfo")
            .with_parameter(ParameterDefinition::new("document"))
            .with_parameter(ParameterDefinition::new("width"))
            .with_field_group(FieldGroupDefinition::new("content", &["document", "width"])),
    );
    registry.bind("com.example.Banner", "BannerInfo");
    Arc::new(registry)
}

fn load(configuration: &HstNode) -> hst_core::Result<ComponentsConfiguration> {
    ComponentsConfiguration::load(configuration, &EngineConfig::default(), registry())
}

fn site() -> HstNode {
    ConfigurationBuilder::new("demo")
        .abstract_page(
            component("base")
                .template("base")
                .param("theme", "light")
                .child(component("header").template("header"))
                .child(container("main")),
        )
        .page(
            component("home")
                .reference("hst:abstractpages/base")
                .param("title", "Home")
                .child(
                    container("main")
                        .child(item("banner").definition("hst:catalog/basic/banner").param("width", "50")),
                )
                .child(container_reference("left", "sidebar")),
        )
        .prototype_page(component("article").reference("hst:abstractpages/base"))
        .catalog_item(
            "basic",
            item("banner")
                .class("com.example.Banner")
                .param("width", "100")
                .param("document", "/content/banner"),
        )
        .workspace_container(container("sidebar").child(item("links")))
        .template("base", "webfile:/ftl/base.ftl")
        .inline_template("header", "<#-- header -->")
        .build()
}

#[test]
fn test_full_site_resolves() {
    let model = load(&site()).unwrap();

    assert_eq!(model.name(), "demo");
    let ids: Vec<_> = model.component_configurations().keys().cloned().collect();
    assert_eq!(
        ids,
        vec!["hst:abstractpages/base", "hst:pages/home", "hst:prototypepages/article"]
    );
    assert_eq!(model.prototype_pages().len(), 1);
    assert_eq!(model.available_container_items().len(), 1);
    assert_eq!(model.templates().len(), 2);

    let home = model.component_configuration("hst:pages/home").unwrap();
    assert_eq!(home.render_path(), Some("webfile:/ftl/base.ftl"));
    assert_eq!(home.parameter("title"), Some("Home"));
    assert_eq!(home.parameter("theme"), Some("light"));
    assert_eq!(home.local_parameter("theme"), Some("light"));

    let header = home.child("header").unwrap();
    assert_eq!(header.id(), "hst:pages/home-hst:abstractpages/base/header");
    assert!(header.is_inherited());
    assert_eq!(header.render_path(), Some("jcr:/demo/hst:templates/header"));
    assert_eq!(header.parameter("theme"), Some("light"));
    assert!(header.local_parameter("theme").is_none());
    assert_eq!(header.parent().unwrap().id(), "hst:pages/home");

    let banner = model
        .component_configuration("hst:pages/home/main/banner")
        .unwrap();
    assert_eq!(banner.component_class_name(), Some("com.example.Banner"));
    assert_eq!(banner.parameter("width"), Some("50"));
    assert_eq!(banner.parameter("document"), Some("/content/banner"));
    let names: Vec<_> = banner.dynamic_parameters().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["document", "width"]);

    let left = home.child("left").unwrap();
    assert!(left.is_container_component_reference());
    assert_eq!(left.child("links").unwrap().id(), "hst:pages/home/left/links");
}

#[test]
fn test_end_to_end_variants_and_cacheability() {
    let configuration = ConfigurationBuilder::new("demo")
        .page(
            container("root").is_async(false).cacheable(false).child(
                component("child1")
                    .is_async(true)
                    .prefixed_param("mobile", "title", "Small")
                    .child(
                        component("grandchild1")
                            .prefixed_param("tablet", "title", "Medium")
                            .cacheable(false),
                    ),
            ),
        )
        .build();
    let model = load(&configuration).unwrap();

    let root = model.component_configuration("hst:pages/root").unwrap();
    let child1 = root.child("child1").unwrap();
    let grandchild1 = child1.child("grandchild1").unwrap();

    let set = |values: &[&str]| values.iter().map(|v| v.to_string()).collect::<std::collections::BTreeSet<_>>();
    assert_eq!(child1.variants(), &set(&["mobile", "tablet"]));
    assert_eq!(root.variants(), &set(&[]));
    assert!(!root.is_composite_cacheable());
    assert!(!child1.is_composite_cacheable());
    assert!(!grandchild1.is_composite_cacheable());
    assert_eq!(model.mount_variants(), &set(&[]));
    assert_eq!(grandchild1.mount_variants(), model.mount_variants());
}

#[test]
fn test_self_reference_fails_only_that_configuration() {
    let broken = ConfigurationBuilder::new("broken")
        .page(component("loop").reference("hst:pages/loop"))
        .build();
    assert!(matches!(load(&broken), Err(Error::SelfReference { .. })));

    let fine = ConfigurationBuilder::new("fine").page(component("home")).build();
    assert!(load(&fine).is_ok());
}

#[test]
fn test_non_configuration_root_is_rejected() {
    let err = load(&HstNode::new("x", "hst:pages")).unwrap_err();
    assert!(matches!(err, Error::ModelLoading { .. }));
}

#[test]
fn test_broken_components_are_skipped() {
    let configuration = ConfigurationBuilder::new("demo")
        .page(component("home").child(container_reference("missing", "nowhere")))
        .page(component("other").reference("hst:pages/nothing"))
        .build();
    let model = load(&configuration).unwrap();

    let home = model.component_configuration("hst:pages/home").unwrap();
    assert!(home.children().is_empty());
    assert!(model.component_configuration("hst:pages/other").is_some());
    assert!(model.component_configuration("hst:pages/missing").is_none());
}

#[test]
fn test_node_declared_parameters_win() {
    let configuration = ConfigurationBuilder::new("demo")
        .page(
            component("banner")
                .class("com.example.Banner")
                .child(dynamic_parameter("width").property("hst:valuetype", "integer").property("hst:fieldgroup", "layout")),
        )
        .build();
    let model = load(&configuration).unwrap();
    let banner = model.component_configuration("hst:pages/banner").unwrap();

    assert!(banner.dynamic_parameter("width").unwrap().is_residual());
    let groups: Vec<_> = banner
        .field_groups()
        .iter()
        .map(|g| (g.title_key.clone(), g.parameters.clone()))
        .collect();
    assert_eq!(
        groups,
        vec![
            ("layout".to_string(), vec!["width".to_string()]),
            ("content".to_string(), vec!["document".to_string()]),
        ]
    );
}

#[test]
fn test_resolved_model_is_shareable() {
    let model = Arc::new(load(&site()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = Arc::clone(&model);
            std::thread::spawn(move || model.component_count())
        })
        .collect();
    let counts: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(counts.iter().all(|&c| c == counts[0]));
}
