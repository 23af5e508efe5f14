//! Registry of parameters info interfaces and class bindings

use std::collections::HashMap;
use std::sync::Arc;

use crate::info::ParametersInfo;
use crate::provider::ComponentMetadataProvider;
use crate::schema::ParametersInfoDefinition;

/// Class name of the built-in container component.
pub const STANDARD_CONTAINER_CLASS: &str =
    "org.hippoecm.hst.builtin.components.StandardContainerComponent";

/// Registry mapping component classes to their parameters info interfaces.
///
/// A class name that is itself a registered interface id resolves to that
/// interface, so components may name the interface directly through their
/// parameters-info class name.
///
/// # Example
///
/// ```
/// use hst_meta::{ComponentMetadataProvider, MetadataRegistry, ParameterDefinition, ParametersInfoDefinition};
///
/// let mut registry = MetadataRegistry::new();
/// registry.register_interface(
///     ParametersInfoDefinition::new("BannerInfo").with_parameter(ParameterDefinition::new("document")),
/// );
/// registry.bind("com.example.Banner", "BannerInfo");
/// let info = registry.parameters_info("com.example.Banner").unwrap();
/// assert_eq!(info.parameters().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetadataRegistry {
    /// Maps class name to interface id
    bindings: HashMap<String, String>,
    /// Maps interface id to its definition
    interfaces: HashMap<String, ParametersInfoDefinition>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in classes registered.
    ///
    /// The standard container declares no parameters and is registered
    /// with an empty interface so lookups for it succeed.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let id = format!("{STANDARD_CONTAINER_CLASS}$Info");
        registry.register_interface(ParametersInfoDefinition::new(id.clone()));
        registry.bind(STANDARD_CONTAINER_CLASS, id);
        registry
    }

    /// Register an interface definition, replacing one with the same id.
    pub fn register_interface(&mut self, definition: ParametersInfoDefinition) {
        self.interfaces.insert(definition.id.clone(), definition);
    }

    /// Bind a component class to an interface id.
    pub fn bind(&mut self, class_name: impl Into<String>, interface_id: impl Into<String>) {
        self.bindings.insert(class_name.into(), interface_id.into());
    }

    pub fn interface(&self, id: &str) -> Option<&ParametersInfoDefinition> {
        self.interfaces.get(id)
    }

    pub fn interface_for<'a>(&'a self, class_name: &'a str) -> Option<&'a str> {
        self.bindings
            .get(class_name)
            .map(String::as_str)
            .or_else(|| self.interfaces.contains_key(class_name).then_some(class_name))
    }

    /// Sorted list of bound class names.
    pub fn list_classes(&self) -> Vec<String> {
        let mut classes: Vec<String> = self.bindings.keys().cloned().collect();
        classes.sort();
        classes
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    /// Merge another registry into this one; entries of `other` win.
    pub fn extend(&mut self, other: MetadataRegistry) {
        self.bindings.extend(other.bindings);
        self.interfaces.extend(other.interfaces);
    }
}

impl ComponentMetadataProvider for MetadataRegistry {
    fn parameters_info(&self, class_name: &str) -> Option<Arc<ParametersInfo>> {
        let interface_id = self.interface_for(class_name)?;
        match ParametersInfo::collect(interface_id, |id| self.interfaces.get(id)) {
            Ok(info) => Some(Arc::new(info)),
            Err(e) => {
                tracing::warn!(class = %class_name, "Cannot collect parameters info: {}", e);
                None
            }
        }
    }
}
