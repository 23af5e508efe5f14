//! The component configuration model and its resolution passes
//!
//! A load pass builds one mutable [`ComponentConfig`] tree per canonical
//! root and runs it through a fixed sequence of passes, each recorded as a
//! [`LifecycleState`]:
//!
//! ```text
//! Constructed -> ReferencesResolved -> ParametersInherited
//!             -> VariantsComputed -> CacheabilityComputed -> Finalized
//! ```
//!
//! Finalizing turns the tree into shared, immutable [`ResolvedComponent`]s.
//! A resolved tree can be copied back into a detached mutable tree, which
//! runs the same sequence again on its own.

mod builder;
mod cacheability;
mod copy;
mod dynamic;
mod inheritance;
mod parameters;
mod reference;
mod resolved;
mod variants;

pub use builder::{BuildFlags, ComponentConfigBuilder, ReferenceableContainers};
pub use cacheability::CacheabilityPropagator;
pub use copy::TreeCopier;
pub use dynamic::{DynamicParameterResolver, FieldGroupMerger};
pub use inheritance::ParameterInheritance;
pub use parameters::{ParameterMap, prefixed_key, split_prefixed_key};
pub use reference::{CanonicalIndex, ReferenceResolver};
pub use resolved::{ImmutabilityFinalizer, ResolvedComponent};
pub use variants::VariantCollector;

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use hst_meta::ParameterDefinition;
use hst_node::NodePath;
use uuid::Uuid;

use crate::{Error, Result};

/// Kind of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentType {
    #[default]
    Component,
    ContainerComponent,
    ContainerItemComponent,
}

impl ComponentType {
    /// Containers and container items never take part in a merge.
    pub fn supports_merge(&self) -> bool {
        matches!(self, Self::Component)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Component => write!(f, "COMPONENT"),
            Self::ContainerComponent => write!(f, "CONTAINER_COMPONENT"),
            Self::ContainerItemComponent => write!(f, "CONTAINER_ITEM_COMPONENT"),
        }
    }
}

/// Progress of a node through the resolution pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Constructed,
    ReferencesResolved,
    ParametersInherited,
    VariantsComputed,
    CacheabilityComputed,
    Finalized,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Constructed => "CONSTRUCTED",
            Self::ReferencesResolved => "REFERENCES_RESOLVED",
            Self::ParametersInherited => "PARAMETERS_INHERITED",
            Self::VariantsComputed => "VARIANTS_COMPUTED",
            Self::CacheabilityComputed => "CACHEABILITY_COMPUTED",
            Self::Finalized => "FINALIZED",
        };
        write!(f, "{label}")
    }
}

/// Where a parameter or field group declaration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterOrigin {
    /// Declared by child nodes of the component itself
    Node,
    /// Declared by the component class metadata
    Class,
}

/// A parameter the component declares, with its editor metadata
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicParameter {
    pub definition: ParameterDefinition,
    pub origin: ParameterOrigin,
}

impl DynamicParameter {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Node-declared parameters are not backed by class metadata.
    pub fn is_residual(&self) -> bool {
        self.origin == ParameterOrigin::Node
    }
}

/// A titled group of parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    pub title_key: String,
    pub parameters: Vec<String>,
    pub origin: ParameterOrigin,
}

/// Every attribute of one component.
///
/// Shared by the mutable [`ComponentConfig`] and the frozen
/// [`ResolvedComponent`]; only the former hands out mutable access.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentAttributes {
    pub id: String,
    pub name: String,
    pub component_type: ComponentType,
    pub canonical_stored_location: Option<NodePath>,
    pub canonical_identifier: Option<Uuid>,

    pub component_class_name: Option<String>,
    pub parameters_info_class_name: Option<String>,
    pub template: Option<String>,
    pub resource_template: Option<String>,
    pub render_path: Option<String>,
    pub serve_resource_path: Option<String>,
    pub reference_name: Option<String>,
    pub reference_component: Option<String>,
    pub component_definition: Option<String>,

    pub parameters: ParameterMap,
    pub local_parameters: ParameterMap,
    pub parameter_name_prefixes: BTreeSet<String>,
    pub dynamic_parameters: Vec<DynamicParameter>,
    pub field_groups: Vec<FieldGroup>,

    pub standalone: Option<bool>,
    pub is_async: Option<bool>,
    pub async_mode: Option<String>,
    pub cacheable: Option<bool>,
    pub composite_cacheable: bool,
    pub variants: BTreeSet<String>,
    pub mount_variants: BTreeSet<String>,

    pub locked_by: Option<String>,
    pub locked_on: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,

    pub shared: bool,
    pub inherited: bool,
    pub detached: bool,
    pub container_component_reference: bool,
    pub experience_page_component: bool,
    pub xpage_layout_component: bool,
    pub unresolved_xpage_layout_container: bool,

    pub label: Option<String>,
    pub icon_path: Option<String>,
    pub xtype: Option<String>,
    pub hidden: Option<bool>,
    pub component_filter_tag: Option<String>,
}

impl ComponentAttributes {
    pub fn new(id: impl Into<String>, name: impl Into<String>, component_type: ComponentType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            component_type,
            composite_cacheable: true,
            ..Default::default()
        }
    }

    /// Fill every unset scalar from `other` and add the map and set entries
    /// `self` lacks. Local values always win.
    pub(crate) fn fill_from(&mut self, other: &ComponentAttributes) {
        fn fill<T: Clone>(target: &mut Option<T>, source: &Option<T>) {
            if target.is_none() {
                target.clone_from(source);
            }
        }

        fill(&mut self.component_class_name, &other.component_class_name);
        fill(&mut self.parameters_info_class_name, &other.parameters_info_class_name);
        fill(&mut self.template, &other.template);
        fill(&mut self.resource_template, &other.resource_template);
        fill(&mut self.render_path, &other.render_path);
        fill(&mut self.serve_resource_path, &other.serve_resource_path);
        fill(&mut self.reference_name, &other.reference_name);
        fill(&mut self.component_definition, &other.component_definition);
        fill(&mut self.standalone, &other.standalone);
        fill(&mut self.is_async, &other.is_async);
        fill(&mut self.async_mode, &other.async_mode);
        fill(&mut self.cacheable, &other.cacheable);
        fill(&mut self.locked_by, &other.locked_by);
        fill(&mut self.locked_on, &other.locked_on);
        fill(&mut self.last_modified, &other.last_modified);
        fill(&mut self.label, &other.label);
        fill(&mut self.icon_path, &other.icon_path);
        fill(&mut self.xtype, &other.xtype);
        fill(&mut self.hidden, &other.hidden);
        fill(&mut self.component_filter_tag, &other.component_filter_tag);

        for (key, value) in other.parameters.iter() {
            self.parameters.insert_if_absent(key, value);
        }
        for (key, value) in other.local_parameters.iter() {
            self.local_parameters.insert_if_absent(key, value);
        }
        self.parameter_name_prefixes
            .extend(other.parameter_name_prefixes.iter().cloned());
        for parameter in &other.dynamic_parameters {
            if !self.dynamic_parameters.iter().any(|p| p.name() == parameter.name()) {
                self.dynamic_parameters.push(parameter.clone());
            }
        }
        for group in &other.field_groups {
            if !self.field_groups.iter().any(|g| g.title_key == group.title_key) {
                self.field_groups.push(group.clone());
            }
        }
    }

    /// Release spare capacity once no further mutation is expected.
    pub(crate) fn shrink_to_fit(&mut self) {
        self.parameters.shrink_to_fit();
        self.local_parameters.shrink_to_fit();
        self.dynamic_parameters.shrink_to_fit();
        self.field_groups.shrink_to_fit();
        for group in &mut self.field_groups {
            group.parameters.shrink_to_fit();
        }
    }
}

/// Read access to component attributes, shared by mutable and resolved trees.
pub trait ComponentView: Sized {
    fn attributes(&self) -> &ComponentAttributes;

    /// Direct children in order.
    fn child_views(&self) -> Vec<&Self>;

    fn lifecycle_state(&self) -> LifecycleState;

    fn id(&self) -> &str {
        &self.attributes().id
    }

    fn name(&self) -> &str {
        &self.attributes().name
    }

    fn component_type(&self) -> ComponentType {
        self.attributes().component_type
    }

    fn is_container(&self) -> bool {
        self.component_type() == ComponentType::ContainerComponent
    }

    fn is_container_item(&self) -> bool {
        self.component_type() == ComponentType::ContainerItemComponent
    }

    fn canonical_stored_location(&self) -> Option<&NodePath> {
        self.attributes().canonical_stored_location.as_ref()
    }

    fn canonical_identifier(&self) -> Option<Uuid> {
        self.attributes().canonical_identifier
    }

    fn component_class_name(&self) -> Option<&str> {
        self.attributes().component_class_name.as_deref()
    }

    fn parameters_info_class_name(&self) -> Option<&str> {
        self.attributes().parameters_info_class_name.as_deref()
    }

    fn template(&self) -> Option<&str> {
        self.attributes().template.as_deref()
    }

    fn resource_template(&self) -> Option<&str> {
        self.attributes().resource_template.as_deref()
    }

    fn render_path(&self) -> Option<&str> {
        self.attributes().render_path.as_deref()
    }

    fn serve_resource_path(&self) -> Option<&str> {
        self.attributes().serve_resource_path.as_deref()
    }

    fn reference_name(&self) -> Option<&str> {
        self.attributes().reference_name.as_deref()
    }

    fn reference_component(&self) -> Option<&str> {
        self.attributes().reference_component.as_deref()
    }

    fn component_definition(&self) -> Option<&str> {
        self.attributes().component_definition.as_deref()
    }

    fn parameters(&self) -> &ParameterMap {
        &self.attributes().parameters
    }

    fn parameter(&self, name: &str) -> Option<&str> {
        self.attributes().parameters.get(name)
    }

    /// Value of `name` for the variant `prefix`, stored under a prefixed key.
    fn prefixed_parameter(&self, prefix: &str, name: &str, delimiter: &str) -> Option<&str> {
        self.parameter(&prefixed_key(prefix, name, delimiter))
    }

    fn local_parameters(&self) -> &ParameterMap {
        &self.attributes().local_parameters
    }

    fn local_parameter(&self, name: &str) -> Option<&str> {
        self.attributes().local_parameters.get(name)
    }

    fn parameter_name_prefixes(&self) -> &BTreeSet<String> {
        &self.attributes().parameter_name_prefixes
    }

    fn dynamic_parameters(&self) -> &[DynamicParameter] {
        &self.attributes().dynamic_parameters
    }

    fn dynamic_parameter(&self, name: &str) -> Option<&DynamicParameter> {
        self.dynamic_parameters().iter().find(|p| p.name() == name)
    }

    fn field_groups(&self) -> &[FieldGroup] {
        &self.attributes().field_groups
    }

    fn standalone(&self) -> Option<bool> {
        self.attributes().standalone
    }

    /// Unset means standalone.
    fn is_standalone(&self) -> bool {
        self.standalone().unwrap_or(true)
    }

    fn async_flag(&self) -> Option<bool> {
        self.attributes().is_async
    }

    fn is_async(&self) -> bool {
        self.async_flag().unwrap_or(false)
    }

    fn async_mode(&self) -> Option<&str> {
        self.attributes().async_mode.as_deref()
    }

    fn cacheable(&self) -> Option<bool> {
        self.attributes().cacheable
    }

    /// Unset means cacheable.
    fn is_cacheable(&self) -> bool {
        self.cacheable().unwrap_or(true)
    }

    fn is_composite_cacheable(&self) -> bool {
        self.attributes().composite_cacheable
    }

    fn variants(&self) -> &BTreeSet<String> {
        &self.attributes().variants
    }

    fn mount_variants(&self) -> &BTreeSet<String> {
        &self.attributes().mount_variants
    }

    fn locked_by(&self) -> Option<&str> {
        self.attributes().locked_by.as_deref()
    }

    fn locked_on(&self) -> Option<DateTime<Utc>> {
        self.attributes().locked_on
    }

    fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.attributes().last_modified
    }

    fn is_shared(&self) -> bool {
        self.attributes().shared
    }

    fn is_inherited(&self) -> bool {
        self.attributes().inherited
    }

    fn is_detached(&self) -> bool {
        self.attributes().detached
    }

    fn is_container_component_reference(&self) -> bool {
        self.attributes().container_component_reference
    }

    fn is_experience_page_component(&self) -> bool {
        self.attributes().experience_page_component
    }

    fn is_xpage_layout_component(&self) -> bool {
        self.attributes().xpage_layout_component
    }

    fn is_unresolved_xpage_layout_container(&self) -> bool {
        self.attributes().unresolved_xpage_layout_container
    }

    fn label(&self) -> Option<&str> {
        self.attributes().label.as_deref()
    }

    fn icon_path(&self) -> Option<&str> {
        self.attributes().icon_path.as_deref()
    }

    fn xtype(&self) -> Option<&str> {
        self.attributes().xtype.as_deref()
    }

    fn hidden(&self) -> Option<bool> {
        self.attributes().hidden
    }

    /// Unset means visible.
    fn is_hidden(&self) -> bool {
        self.hidden().unwrap_or(false)
    }

    fn component_filter_tag(&self) -> Option<&str> {
        self.attributes().component_filter_tag.as_deref()
    }
}

/// A mutable component tree node, owned top-down by its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentConfig {
    pub(crate) attrs: ComponentAttributes,
    pub(crate) children: Vec<ComponentConfig>,
    pub(crate) state: LifecycleState,
}

impl ComponentConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, component_type: ComponentType) -> Self {
        Self::from_attributes(ComponentAttributes::new(id, name, component_type))
    }

    pub fn from_attributes(attrs: ComponentAttributes) -> Self {
        Self {
            attrs,
            children: Vec::new(),
            state: LifecycleState::Constructed,
        }
    }

    pub fn attributes_mut(&mut self) -> &mut ComponentAttributes {
        &mut self.attrs
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn children(&self) -> &[ComponentConfig] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&ComponentConfig> {
        self.children.iter().find(|c| c.attrs.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ComponentConfig> {
        self.children.iter_mut().find(|c| c.attrs.name == name)
    }

    /// Resolve a slash-separated path of child names.
    pub fn descendant(&self, relative: &str) -> Option<&ComponentConfig> {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, name| node.child(name))
    }

    /// Append a child, rejecting a second child with the same name.
    pub fn add_child(&mut self, child: ComponentConfig) -> Result<()> {
        if self.child(&child.attrs.name).is_some() {
            return Err(Error::DuplicateChild {
                parent: self.attrs.id.clone(),
                name: child.attrs.name.clone(),
            });
        }
        self.children.push(child);
        Ok(())
    }

    pub fn remove_child(&mut self, name: &str) -> Option<ComponentConfig> {
        let pos = self.children.iter().position(|c| c.attrs.name == name)?;
        Some(self.children.remove(pos))
    }

    /// Visit this node and every descendant, parents before children.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut ComponentConfig)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }

    /// Visit this node and every descendant, parents before children.
    pub fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s ComponentConfig)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Record that a pass is running on this node.
    ///
    /// Fails when the node has not yet reached `required`; otherwise moves
    /// the node forward to `reached` (never backwards).
    pub(crate) fn enter_pass(&mut self, required: LifecycleState, reached: LifecycleState) -> Result<()> {
        if self.state < required {
            return Err(Error::IllegalLifecycle {
                id: self.attrs.id.clone(),
                expected: required,
                actual: self.state,
            });
        }
        self.state = self.state.max(reached);
        Ok(())
    }
}

impl ComponentView for ComponentConfig {
    fn attributes(&self) -> &ComponentAttributes {
        &self.attrs
    }

    fn child_views(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn lifecycle_state(&self) -> LifecycleState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_component_defaults() {
        let config = ComponentConfig::new("hst:pages/home", "home", ComponentType::Component);
        assert_eq!(config.state(), LifecycleState::Constructed);
        assert!(config.is_composite_cacheable());
        assert!(config.is_cacheable());
        assert!(config.is_standalone());
        assert!(!config.is_async());
        assert!(config.variants().is_empty());
    }

    #[test]
    fn test_add_child_rejects_duplicates() {
        let mut parent = ComponentConfig::new("p", "p", ComponentType::Component);
        parent
            .add_child(ComponentConfig::new("p/a", "a", ComponentType::Component))
            .unwrap();
        let err = parent
            .add_child(ComponentConfig::new("p/a2", "a", ComponentType::Component))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateChild { .. }));
        assert!(parent.remove_child("a").is_some());
        assert!(parent.children().is_empty());
    }

    #[test]
    fn test_enter_pass_rejects_out_of_order() {
        let mut config = ComponentConfig::new("c", "c", ComponentType::Component);
        let err = config
            .enter_pass(LifecycleState::ParametersInherited, LifecycleState::VariantsComputed)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IllegalLifecycle {
                actual: LifecycleState::Constructed,
                ..
            }
        ));

        config
            .enter_pass(LifecycleState::Constructed, LifecycleState::ReferencesResolved)
            .unwrap();
        assert_eq!(config.state(), LifecycleState::ReferencesResolved);
        // re-entering an earlier pass never moves the state backwards
        config
            .enter_pass(LifecycleState::Constructed, LifecycleState::Constructed)
            .unwrap();
        assert_eq!(config.state(), LifecycleState::ReferencesResolved);
    }

    #[test]
    fn test_fill_from_keeps_local_values() {
        let mut local = ComponentAttributes::new("a", "a", ComponentType::Component);
        local.template = Some("local.ftl".into());
        local.parameters.insert("shared", "local");

        let mut other = ComponentAttributes::new("b", "b", ComponentType::Component);
        other.template = Some("other.ftl".into());
        other.component_class_name = Some("com.example.Other".into());
        other.parameters.insert("shared", "other");
        other.parameters.insert("extra", "other");
        other.parameter_name_prefixes.insert("mobile".into());

        local.fill_from(&other);

        assert_eq!(local.template.as_deref(), Some("local.ftl"));
        assert_eq!(local.component_class_name.as_deref(), Some("com.example.Other"));
        assert_eq!(local.parameters.get("shared"), Some("local"));
        assert_eq!(local.parameters.get("extra"), Some("other"));
        assert!(local.parameter_name_prefixes.contains("mobile"));
        assert_eq!(local.id, "a");
    }

    #[test]
    fn test_fill_from_inherits_hidden_only_when_unset() {
        let mut other = ComponentAttributes::new("b", "b", ComponentType::Component);
        other.hidden = Some(true);

        let mut unset = ComponentAttributes::new("a", "a", ComponentType::Component);
        unset.fill_from(&other);
        assert_eq!(unset.hidden, Some(true));

        let mut visible = ComponentAttributes::new("c", "c", ComponentType::Component);
        visible.hidden = Some(false);
        visible.fill_from(&other);
        assert_eq!(visible.hidden, Some(false));

        let config = ComponentConfig::from_attributes(unset);
        assert!(config.is_hidden());
        assert!(!ComponentConfig::new("d", "d", ComponentType::Component).is_hidden());
    }
}
