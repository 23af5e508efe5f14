//! Reconciling node-declared and class-declared parameter metadata

use std::collections::HashSet;

use hst_meta::ComponentMetadataProvider;

use super::{ComponentConfig, DynamicParameter, FieldGroup, LifecycleState, ParameterOrigin};
use crate::Result;

/// Adds class-declared parameters and field groups to every component.
///
/// Node-declared parameters win by name. Running the resolver again
/// replaces the class-declared entries instead of duplicating them.
pub struct DynamicParameterResolver<'a> {
    provider: &'a dyn ComponentMetadataProvider,
}

impl<'a> DynamicParameterResolver<'a> {
    pub fn new(provider: &'a dyn ComponentMetadataProvider) -> Self {
        Self { provider }
    }

    pub fn resolve(&self, config: &mut ComponentConfig) -> Result<()> {
        config.enter_pass(
            LifecycleState::ReferencesResolved,
            LifecycleState::ReferencesResolved,
        )?;
        self.resolve_node(config);
        for child in &mut config.children {
            self.resolve(child)?;
        }
        Ok(())
    }

    fn resolve_node(&self, config: &mut ComponentConfig) {
        let attrs = &mut config.attrs;
        attrs.dynamic_parameters.retain(|p| p.origin == ParameterOrigin::Node);
        attrs.field_groups.retain(|g| g.origin == ParameterOrigin::Node);

        let class_name = attrs
            .parameters_info_class_name
            .as_deref()
            .or(attrs.component_class_name.as_deref());
        let info = class_name.and_then(|class_name| self.provider.parameters_info(class_name));

        let mut class_groups = Vec::new();
        if let Some(info) = info {
            for definition in info.parameters() {
                match attrs.dynamic_parameters.iter().find(|p| p.name() == definition.name) {
                    Some(declared) => {
                        if !declared.definition.is_type_compatible(definition) {
                            tracing::warn!(
                                component = %attrs.id,
                                parameter = %definition.name,
                                node_type = %declared.definition.value_type,
                                class_type = %definition.value_type,
                                "Parameter type differs from class declaration, using node declaration"
                            );
                        }
                    }
                    None => attrs.dynamic_parameters.push(DynamicParameter {
                        definition: definition.clone(),
                        origin: ParameterOrigin::Class,
                    }),
                }
            }
            class_groups = info
                .field_groups()
                .iter()
                .map(|g| FieldGroup {
                    title_key: g.title_key.clone(),
                    parameters: g.parameters.clone(),
                    origin: ParameterOrigin::Class,
                })
                .collect();
        }

        let node_groups = std::mem::take(&mut attrs.field_groups);
        attrs.field_groups = FieldGroupMerger::merge(node_groups, class_groups);
    }
}

/// Merges node-declared and class-declared field groups.
pub struct FieldGroupMerger;

impl FieldGroupMerger {
    /// Node groups replace class groups with the same title; remaining class
    /// groups follow in order. Each parameter name then stays only in the
    /// first group listing it.
    pub fn merge(node_groups: Vec<FieldGroup>, class_groups: Vec<FieldGroup>) -> Vec<FieldGroup> {
        let mut merged = node_groups;
        for group in class_groups {
            if !merged.iter().any(|g| g.title_key == group.title_key) {
                merged.push(group);
            }
        }

        let mut seen = HashSet::new();
        for group in &mut merged {
            group.parameters.retain(|name| seen.insert(name.clone()));
        }
        merged
    }
}
