//! Loading one configuration root into a resolved component model

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use hst_meta::ComponentMetadataProvider;
use hst_node::{HstNode, NodeType};

use crate::component::{
    BuildFlags, CacheabilityPropagator, CanonicalIndex, ComponentAttributes, ComponentConfig,
    ComponentConfigBuilder, ComponentView, ImmutabilityFinalizer, ReferenceResolver,
    ReferenceableContainers, ResolvedComponent, VariantCollector,
};
use crate::config::EngineConfig;
use crate::pipeline::Pipeline;
use crate::template::{HstComponentTemplate, TemplateResolver};
use crate::{Error, Result};

/// Sections holding root components, with the flags their components get.
const SECTIONS: [(NodeType, BuildFlags); 5] = [
    (NodeType::Pages, BuildFlags { shared: false, xpage_layout: false, catalog: false }),
    (NodeType::Components, BuildFlags { shared: true, xpage_layout: false, catalog: false }),
    (NodeType::AbstractPages, BuildFlags { shared: true, xpage_layout: false, catalog: false }),
    (NodeType::PrototypePages, BuildFlags { shared: false, xpage_layout: false, catalog: false }),
    (NodeType::XPages, BuildFlags { shared: false, xpage_layout: true, catalog: false }),
];

const CATALOG_FLAGS: BuildFlags = BuildFlags {
    shared: true,
    xpage_layout: false,
    catalog: true,
};

/// The resolved component model of one `hst:configuration` root.
///
/// Immutable once loaded and safe to share between threads. Request-scoped
/// experience page content is applied to private copies through
/// [`ComponentsConfiguration::xpage_overlay`].
pub struct ComponentsConfiguration {
    name: String,
    components: BTreeMap<String, Arc<ResolvedComponent>>,
    prototype_pages: BTreeMap<String, Arc<ResolvedComponent>>,
    xpage_layouts: BTreeMap<String, Arc<ResolvedComponent>>,
    container_items: BTreeMap<String, Arc<ResolvedComponent>>,
    templates: TemplateResolver,
    mount_variants: BTreeSet<String>,
    engine: EngineConfig,
    provider: Arc<dyn ComponentMetadataProvider>,
}

impl std::fmt::Debug for ComponentsConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentsConfiguration")
            .field("name", &self.name)
            .field("components", &self.components.len())
            .field("container_items", &self.container_items.len())
            .field("templates", &self.templates.templates().len())
            .field("mount_variants", &self.mount_variants)
            .finish()
    }
}

impl ComponentsConfiguration {
    /// Resolve every component of a configuration node.
    ///
    /// Problems with individual components are logged and the component is
    /// skipped. A self-referencing component fails the whole configuration.
    pub fn load(
        configuration: &HstNode,
        engine: &EngineConfig,
        provider: Arc<dyn ComponentMetadataProvider>,
    ) -> Result<Self> {
        if !configuration.is_type(NodeType::Configuration) {
            return Err(Error::ModelLoading {
                root: configuration.path().to_string(),
                message: format!(
                    "expected a {} node, found {}",
                    NodeType::Configuration,
                    configuration.type_tag()
                ),
            });
        }
        let name = configuration.name().to_string();
        tracing::debug!(configuration = %name, "Loading components configuration");

        let containers = ReferenceableContainers::from_configuration(configuration);
        let mut index = CanonicalIndex::new();
        let mut sections: BTreeMap<String, NodeType> = BTreeMap::new();

        for (section_type, flags) in SECTIONS {
            let Some(section) = configuration.section(section_type) else {
                continue;
            };
            let builder = ComponentConfigBuilder::new(engine, containers).with_flags(flags);
            for node in section.children() {
                if let Some(config) = build_root(&builder, node, section.name()) {
                    sections.insert(config.id().to_string(), section_type);
                    index.insert(config);
                }
            }
        }

        let mut catalog_ids = Vec::new();
        if let Some(catalog) = configuration.section(NodeType::Catalog) {
            let builder = ComponentConfigBuilder::new(engine, containers).with_flags(CATALOG_FLAGS);
            for package in catalog.children_of_type(NodeType::CatalogPackage) {
                let parent_id = format!("{}/{}", catalog.name(), package.name());
                for node in package.children() {
                    if let Some(config) = build_root(&builder, node, &parent_id) {
                        catalog_ids.push(config.id().to_string());
                        index.insert(config);
                    }
                }
            }
        }

        index.resolve_all().map_err(|e| {
            tracing::warn!(configuration = %name, error = %e, "Configuration cannot be loaded");
            e
        })?;

        let mut roots = index.into_roots();
        let mut catalog_roots: Vec<ComponentConfig> = catalog_ids
            .iter()
            .filter_map(|id| roots.remove(id))
            .collect();

        let templates = TemplateResolver::from_section(
            configuration.section(NodeType::Templates),
            &engine.inline_template_protocol,
        );
        let no_catalog = BTreeMap::new();
        let catalog_pipeline = Pipeline {
            engine,
            provider: provider.as_ref(),
            templates: &templates,
            catalog: &no_catalog,
        };
        for item in &mut catalog_roots {
            catalog_pipeline.prepare(item)?;
        }
        let catalog: BTreeMap<String, ComponentAttributes> = catalog_roots
            .iter()
            .map(|item| (item.id().to_string(), item.attributes().clone()))
            .collect();

        let pipeline = Pipeline {
            catalog: &catalog,
            ..catalog_pipeline
        };
        for root in roots.values_mut() {
            pipeline.prepare(root)?;
        }

        let mount_variants = VariantCollector::broadcast(roots.values_mut());
        for root in roots.values_mut().chain(catalog_roots.iter_mut()) {
            CacheabilityPropagator::propagate(root)?;
        }

        let mut components = BTreeMap::new();
        let mut prototype_pages = BTreeMap::new();
        let mut xpage_layouts = BTreeMap::new();
        for (id, root) in roots {
            let resolved = ImmutabilityFinalizer::finalize(root)?;
            match sections.get(&id) {
                Some(NodeType::PrototypePages) => {
                    prototype_pages.insert(id.clone(), Arc::clone(&resolved));
                }
                Some(NodeType::XPages) => {
                    xpage_layouts.insert(id.clone(), Arc::clone(&resolved));
                }
                _ => {}
            }
            components.insert(id, resolved);
        }
        let mut container_items = BTreeMap::new();
        for item in catalog_roots {
            let id = item.id().to_string();
            container_items.insert(id, ImmutabilityFinalizer::finalize(item)?);
        }

        tracing::info!(
            configuration = %name,
            components = components.len(),
            container_items = container_items.len(),
            "Loaded components configuration"
        );
        Ok(Self {
            name,
            components,
            prototype_pages,
            xpage_layouts,
            container_items,
            templates,
            mount_variants,
            engine: engine.clone(),
            provider,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a component by id, including nested components.
    pub fn component_configuration(&self, id: &str) -> Option<&ResolvedComponent> {
        if let Some(root) = self.components.get(id) {
            return Some(root);
        }
        self.components
            .iter()
            .filter(|(root_id, _)| {
                id.strip_prefix(root_id.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
            })
            .find_map(|(_, root)| root.find(id))
    }

    /// Every root component by id.
    pub fn component_configurations(&self) -> &BTreeMap<String, Arc<ResolvedComponent>> {
        &self.components
    }

    pub fn prototype_pages(&self) -> &BTreeMap<String, Arc<ResolvedComponent>> {
        &self.prototype_pages
    }

    /// Catalog items offered for placement into containers.
    pub fn available_container_items(&self) -> &BTreeMap<String, Arc<ResolvedComponent>> {
        &self.container_items
    }

    pub fn templates(&self) -> &BTreeMap<String, HstComponentTemplate> {
        self.templates.templates()
    }

    pub fn xpage_layouts(&self) -> &BTreeMap<String, Arc<ResolvedComponent>> {
        &self.xpage_layouts
    }

    pub fn mount_variants(&self) -> &BTreeSet<String> {
        &self.mount_variants
    }

    /// Total number of components in all root trees.
    pub fn component_count(&self) -> usize {
        self.components.values().map(|root| root.flatten().len()).sum()
    }

    /// Apply a document's experience page content to a private copy of the
    /// layout `layout_id`.
    ///
    /// Every layout container takes the children of the container at the same
    /// relative path in `document`. Containers the document does not provide are exposed
    /// as unresolved. Containers pulled in through a container reference
    /// belong to the workspace and are left as they are. The shared layout is
    /// never modified.
    pub fn xpage_overlay(&self, layout_id: &str, document: &HstNode) -> Result<Arc<ResolvedComponent>> {
        let layout = self
            .xpage_layouts
            .get(layout_id)
            .ok_or_else(|| Error::ComponentNotFound {
                id: layout_id.to_string(),
            })?;

        let builder = ComponentConfigBuilder::new(&self.engine, ReferenceableContainers::default());
        let doc = builder
            .build(document, document.path().parent().unwrap_or_default().as_str(), None)?
            .ok_or_else(|| Error::ComponentNotFound {
                id: document.path().to_string(),
            })?;
        let mut doc_containers = BTreeMap::new();
        doc.walk(&mut |node| {
            if node.is_container()
                && let Some(relative) = node.id().strip_prefix(doc.id())
            {
                doc_containers.insert(relative.to_string(), node);
            }
        });

        let mut page = layout.copy(layout_id, None, true);
        page.walk_mut(&mut |node| {
            if !node.is_container() || node.is_container_component_reference() {
                return;
            }
            let relative = node.id().strip_prefix(layout_id).unwrap_or_default().to_string();
            let result = match doc_containers.get(&relative) {
                Some(doc_container) => node.transform_xpage_layout_container(*doc_container),
                None => node.transform_unresolved_xpage_layout_container(),
            };
            if let Err(e) = result {
                tracing::warn!(component = %node.id(), error = %e, "Cannot overlay container");
            }
        });

        ReferenceResolver::resolve(&mut page, &mut CanonicalIndex::new())?;
        let catalog: BTreeMap<String, ComponentAttributes> = self
            .container_items
            .iter()
            .map(|(id, item)| (id.clone(), item.attributes().clone()))
            .collect();
        let pipeline = Pipeline {
            engine: &self.engine,
            provider: self.provider.as_ref(),
            templates: &self.templates,
            catalog: &catalog,
        };
        pipeline.prepare(&mut page)?;
        pipeline.complete(&mut page, &self.mount_variants)?;
        tracing::debug!(layout = layout_id, document = %document.path(), "Applied experience page overlay");
        ImmutabilityFinalizer::finalize(page)
    }
}

/// Build one root component, logging and skipping failures.
fn build_root(builder: &ComponentConfigBuilder<'_>, node: &HstNode, parent_id: &str) -> Option<ComponentConfig> {
    match builder.build(node, parent_id, None) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %node.path(), error = %e, "Skipping component");
            None
        }
    }
}
