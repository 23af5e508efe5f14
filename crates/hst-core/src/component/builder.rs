//! Building component trees from raw configuration nodes
//!
//! The builder reads one node (and, depth-first, its descendants) into a
//! [`ComponentConfig`] without following any component reference. Problems
//! with individual children are logged and the child is skipped.

use std::collections::BTreeSet;

use hst_meta::{ParameterConfig, ParameterDefinition, ParameterValueType};
use hst_node::{HstNode, NodeType, props};

use super::{
    ComponentAttributes, ComponentConfig, ComponentType, DynamicParameter, FieldGroup,
    ParameterMap, ParameterOrigin, prefixed_key,
};
use crate::config::EngineConfig;
use crate::{Error, Result};

/// Containers that container-reference nodes may point at.
///
/// Targets are addressed by their path relative to the workspace
/// `hst:containers` section.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceableContainers<'a> {
    section: Option<&'a HstNode>,
}

impl<'a> ReferenceableContainers<'a> {
    pub fn new(section: Option<&'a HstNode>) -> Self {
        Self { section }
    }

    /// Find the `hst:workspace/hst:containers` section below a configuration node.
    pub fn from_configuration(configuration: &'a HstNode) -> Self {
        let section = configuration
            .section(NodeType::Workspace)
            .and_then(|workspace| workspace.section(NodeType::Containers));
        Self::new(section)
    }

    pub fn lookup(&self, reference: &str) -> Option<&'a HstNode> {
        self.section?
            .descendant(reference)
            .filter(|node| node.is_type(NodeType::ContainerComponent))
    }
}

/// Provenance flags applied to every component a builder produces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildFlags {
    /// Built from a section whose components are shared between pages
    pub shared: bool,
    /// Built from the experience page layouts section
    pub xpage_layout: bool,
    /// Built from the catalog, where items legitimately live outside containers
    pub catalog: bool,
}

/// Builds [`ComponentConfig`] trees from raw nodes.
pub struct ComponentConfigBuilder<'a> {
    engine: &'a EngineConfig,
    containers: ReferenceableContainers<'a>,
    flags: BuildFlags,
}

impl<'a> ComponentConfigBuilder<'a> {
    pub fn new(engine: &'a EngineConfig, containers: ReferenceableContainers<'a>) -> Self {
        Self {
            engine,
            containers,
            flags: BuildFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: BuildFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Build a component for `node` with id `<parent_id>/<name>`.
    ///
    /// Roots pass their section name as `parent_id` and no parent.
    /// Returns `Ok(None)` when the node is dropped with a warning, such as
    /// an unresolved container reference.
    pub fn build(
        &self,
        node: &HstNode,
        parent_id: &str,
        parent: Option<&ComponentAttributes>,
    ) -> Result<Option<ComponentConfig>> {
        match node.node_type() {
            Some(NodeType::ContainerComponentReference) => {
                self.build_container_reference(node, parent_id, parent)
            }
            Some(NodeType::Component) => {
                self.build_node(node, node.name(), parent_id, parent, ComponentType::Component)
            }
            Some(NodeType::ContainerComponent) => self.build_node(
                node,
                node.name(),
                parent_id,
                parent,
                ComponentType::ContainerComponent,
            ),
            Some(NodeType::ContainerItemComponent) => self.build_node(
                node,
                node.name(),
                parent_id,
                parent,
                ComponentType::ContainerItemComponent,
            ),
            _ => Err(Error::UnsupportedNodeKind {
                path: node.path().to_string(),
                node_type: node.type_tag().to_string(),
            }),
        }
    }

    fn build_container_reference(
        &self,
        node: &HstNode,
        parent_id: &str,
        parent: Option<&ComponentAttributes>,
    ) -> Result<Option<ComponentConfig>> {
        let Some(reference) = node.string_property(props::REFERENCE) else {
            tracing::warn!(path = %node.path(), "Container reference without target, skipping");
            return Ok(None);
        };
        let Some(target) = self.containers.lookup(reference) else {
            tracing::warn!(
                path = %node.path(),
                reference,
                "Container reference cannot be resolved, skipping"
            );
            return Ok(None);
        };

        let mut config = self.build_node(
            target,
            node.name(),
            parent_id,
            parent,
            ComponentType::ContainerComponent,
        )?;
        if let Some(config) = config.as_mut() {
            config.attrs.container_component_reference = true;
        }
        Ok(config)
    }

    fn build_node(
        &self,
        node: &HstNode,
        name: &str,
        parent_id: &str,
        parent: Option<&ComponentAttributes>,
        component_type: ComponentType,
    ) -> Result<Option<ComponentConfig>> {
        let id = format!("{parent_id}/{name}");
        let mut attrs = ComponentAttributes::new(&id, name, component_type);
        attrs.canonical_stored_location = Some(node.path().clone());
        attrs.canonical_identifier = Some(node.identifier());
        attrs.shared = self.flags.shared;
        attrs.xpage_layout_component = self.flags.xpage_layout;

        let string = |property: &str| node.string_property(property).map(str::to_string);
        attrs.component_class_name = string(props::COMPONENT_CLASS_NAME);
        attrs.parameters_info_class_name = string(props::PARAMETERS_INFO_CLASS_NAME);
        attrs.template = string(props::TEMPLATE);
        attrs.resource_template = string(props::RESOURCE_TEMPLATE);
        attrs.reference_name = string(props::REFERENCE_NAME);
        attrs.reference_component = string(props::REFERENCE_COMPONENT);
        attrs.component_definition = string(props::COMPONENT_DEFINITION);
        attrs.async_mode = string(props::ASYNC_MODE);
        attrs.label = string(props::LABEL);
        attrs.icon_path = string(props::ICON_PATH);
        attrs.xtype = string(props::XTYPE);
        attrs.component_filter_tag = string(props::COMPONENT_FILTER_TAG);
        attrs.standalone = node.boolean_property(props::STANDALONE);
        attrs.is_async = node.boolean_property(props::ASYNC);
        attrs.cacheable = node.boolean_property(props::CACHEABLE);
        attrs.hidden = node.boolean_property(props::HIDDEN);

        attrs.locked_by = string(props::LOCKED_BY);
        attrs.locked_on = node.date_property(props::LOCKED_ON)?;
        attrs.last_modified = node.date_property(props::LAST_MODIFIED)?;
        if let Some(parent) = parent {
            if attrs.locked_by.is_none() {
                attrs.locked_by.clone_from(&parent.locked_by);
            }
            if attrs.locked_on.is_none() {
                attrs.locked_on = parent.locked_on;
            }
            if attrs.last_modified.is_none() {
                attrs.last_modified = parent.last_modified;
            }
        }

        match component_type {
            ComponentType::ContainerComponent => self.normalize_container(&mut attrs),
            ComponentType::ContainerItemComponent => self.check_item_placement(&attrs, parent),
            ComponentType::Component => {}
        }

        if let Some((parameters, prefixes)) = self.read_parameters(node) {
            attrs.local_parameters = parameters.clone();
            attrs.parameters = parameters;
            attrs.parameter_name_prefixes = prefixes;
        }

        let (dynamic_parameters, field_groups) = read_dynamic_parameters(node);
        attrs.dynamic_parameters = dynamic_parameters;
        attrs.field_groups = field_groups;

        let mut config = ComponentConfig::from_attributes(attrs);
        for child in node.children() {
            if child.is_type(NodeType::DynamicParameter) {
                continue;
            }
            match self.build(child, &id, Some(&config.attrs)) {
                Ok(Some(built)) => {
                    if let Err(e) = config.add_child(built) {
                        tracing::warn!(error = %e, "Skipping child component");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(component = %id, error = %e, "Skipping child component");
                }
            }
        }

        tracing::trace!(component = %id, children = config.children.len(), "Built component");
        Ok(Some(config))
    }

    fn normalize_container(&self, attrs: &mut ComponentAttributes) {
        if let Some(reference) = attrs.reference_component.take() {
            tracing::warn!(
                component = %attrs.id,
                reference = %reference,
                "Container components cannot reference other components, ignoring reference"
            );
        }
        match attrs.component_class_name.as_deref() {
            None => {
                attrs.component_class_name = Some(self.engine.standard_container_class.clone());
            }
            Some(class_name) if self.engine.is_legacy_container_class(class_name) => {
                tracing::warn!(
                    component = %attrs.id,
                    class_name,
                    replacement = %self.engine.standard_container_class,
                    "Replacing legacy container class"
                );
                attrs.component_class_name = Some(self.engine.standard_container_class.clone());
            }
            Some(_) => {}
        }
    }

    fn check_item_placement(&self, attrs: &ComponentAttributes, parent: Option<&ComponentAttributes>) {
        if self.flags.catalog || !self.engine.warn_misplaced_container_items {
            return;
        }
        let in_container =
            parent.is_some_and(|p| p.component_type == ComponentType::ContainerComponent);
        if !in_container {
            tracing::warn!(
                component = %attrs.id,
                "Container item is not a direct child of a container"
            );
        }
    }

    /// Read the parallel name/value/prefix arrays.
    ///
    /// Any length mismatch drops the whole set.
    fn read_parameters(&self, node: &HstNode) -> Option<(ParameterMap, BTreeSet<String>)> {
        let names = node.strings_property(props::PARAMETER_NAMES).unwrap_or_default();
        let values = node.strings_property(props::PARAMETER_VALUES).unwrap_or_default();
        if names.len() != values.len() {
            tracing::warn!(
                path = %node.path(),
                names = names.len(),
                values = values.len(),
                "Parameter names and values differ in length, dropping all parameters"
            );
            return None;
        }

        let prefixes = node.strings_property(props::PARAMETER_NAME_PREFIXES);
        if let Some(prefixes) = prefixes
            && prefixes.len() != names.len()
        {
            tracing::warn!(
                path = %node.path(),
                names = names.len(),
                prefixes = prefixes.len(),
                "Parameter prefixes and names differ in length, dropping all parameters"
            );
            return None;
        }

        let delimiter = &self.engine.parameter_prefix_delimiter;
        let mut parameters = ParameterMap::new();
        let mut registered = BTreeSet::new();
        for (i, (name, value)) in names.iter().zip(values).enumerate() {
            let prefix = prefixes.map(|p| p[i].as_str()).unwrap_or_default();
            if !prefix.is_empty() {
                registered.insert(prefix.to_string());
            }
            parameters.insert(prefixed_key(prefix, name, delimiter), value.as_str());
        }
        Some((parameters, registered))
    }
}

/// Read `hst:dynamicparameter` children into parameters and field groups.
fn read_dynamic_parameters(node: &HstNode) -> (Vec<DynamicParameter>, Vec<FieldGroup>) {
    let mut parameters = Vec::new();
    let mut groups: Vec<FieldGroup> = Vec::new();

    for child in node.children_of_type(NodeType::DynamicParameter) {
        let definition = read_parameter_definition(child);
        if let Some(title) = definition.field_group.as_deref() {
            match groups.iter_mut().find(|g| g.title_key == title) {
                Some(group) => group.parameters.push(definition.name.clone()),
                None => groups.push(FieldGroup {
                    title_key: title.to_string(),
                    parameters: vec![definition.name.clone()],
                    origin: ParameterOrigin::Node,
                }),
            }
        }
        parameters.push(DynamicParameter {
            definition,
            origin: ParameterOrigin::Node,
        });
    }
    (parameters, groups)
}

fn read_parameter_definition(node: &HstNode) -> ParameterDefinition {
    let value_type = match node.string_property(props::VALUE_TYPE) {
        None => ParameterValueType::default(),
        Some(raw) => raw.parse().unwrap_or_else(|unknown: String| {
            tracing::warn!(path = %node.path(), value_type = %unknown, "Unknown parameter type, using string");
            ParameterValueType::default()
        }),
    };

    let mut configs = node.children().iter().filter_map(read_parameter_config);
    let config = configs.next();
    if configs.next().is_some() {
        tracing::warn!(path = %node.path(), "Parameter has more than one editor configuration, using the first");
    }

    let string = |property: &str| node.string_property(property).map(str::to_string);
    ParameterDefinition {
        name: node.name().to_string(),
        value_type,
        required: node.boolean_or(props::REQUIRED, false),
        default_value: string(props::DEFAULT_VALUE),
        display_name: string(props::DISPLAY_NAME),
        hide_in_channel_manager: node.boolean_or(props::HIDE_IN_CHANNEL_MANAGER, false),
        field_group: string(props::FIELD_GROUP),
        config,
    }
}

fn read_parameter_config(node: &HstNode) -> Option<ParameterConfig> {
    let string = |property: &str| node.string_property(property).map(str::to_string);
    let strings = |property: &str| {
        node.strings_property(property)
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    };
    match node.node_type()? {
        NodeType::PathPicker => Some(ParameterConfig::PathPicker {
            picker_configuration: string(props::PICKER_CONFIGURATION),
            picker_initial_path: string(props::PICKER_INITIAL_PATH),
            picker_root_path: string(props::PICKER_ROOT_PATH),
            picker_selectable_node_types: strings(props::PICKER_SELECTABLE_NODE_TYPES),
            relative: node.boolean_or(props::RELATIVE, false),
        }),
        NodeType::ImageSetPath => Some(ParameterConfig::ImageSetPath {
            picker_configuration: string(props::PICKER_CONFIGURATION),
            picker_initial_path: string(props::PICKER_INITIAL_PATH),
            preview_variant: string(props::PREVIEW_VARIANT),
        }),
        NodeType::DropDownList => Some(ParameterConfig::DropDownList {
            value_list: strings(props::VALUE_LIST),
            value_list_provider: string(props::VALUE_LIST_PROVIDER),
        }),
        _ => None,
    }
}
