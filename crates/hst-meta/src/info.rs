//! Flattened view of a parameters info interface hierarchy

use std::collections::{HashSet, VecDeque};

use crate::schema::{FieldGroupDefinition, ParameterDefinition, ParametersInfoDefinition};
use crate::{Error, Result};

/// The parameters and field groups a component class declares, including
/// everything inherited through its interface hierarchy.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParametersInfo {
    interface_id: String,
    parameters: Vec<ParameterDefinition>,
    field_groups: Vec<FieldGroupDefinition>,
}

impl ParametersInfo {
    /// Collect the hierarchy rooted at `interface_id`.
    ///
    /// Interfaces are visited breadth-first, parents in declaration order,
    /// each interface at most once. The first declaration of a parameter
    /// name wins. Field groups sharing a title key are folded into the
    /// first one, appending parameter names it does not list yet. Unknown
    /// parent interfaces are skipped with a warning.
    pub fn collect<'a, F>(interface_id: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<&'a ParametersInfoDefinition>,
    {
        let root = lookup(interface_id).ok_or_else(|| Error::UnknownInterface {
            id: interface_id.to_string(),
        })?;

        let mut info = ParametersInfo {
            interface_id: interface_id.to_string(),
            ..Default::default()
        };
        let mut seen_parameters = HashSet::new();
        let mut visited = HashSet::from([root.id.as_str()]);
        let mut queue = VecDeque::from([root]);

        while let Some(definition) = queue.pop_front() {
            for parameter in &definition.parameters {
                if seen_parameters.insert(parameter.name.clone()) {
                    info.parameters.push(parameter.clone());
                }
            }
            for group in &definition.field_groups {
                info.add_field_group(group);
            }
            for parent_id in &definition.extends {
                if !visited.insert(parent_id.as_str()) {
                    continue;
                }
                match lookup(parent_id) {
                    Some(parent) => queue.push_back(parent),
                    None => tracing::warn!(
                        interface = %definition.id,
                        parent = %parent_id,
                        "Parent parameters info interface not found, skipping"
                    ),
                }
            }
        }

        Ok(info)
    }

    fn add_field_group(&mut self, group: &FieldGroupDefinition) {
        match self
            .field_groups
            .iter_mut()
            .find(|g| g.title_key == group.title_key)
        {
            Some(existing) => {
                for name in &group.parameters {
                    if !existing.parameters.contains(name) {
                        existing.parameters.push(name.clone());
                    }
                }
            }
            None => self.field_groups.push(group.clone()),
        }
    }

    pub fn interface_id(&self) -> &str {
        &self.interface_id
    }

    pub fn parameters(&self) -> &[ParameterDefinition] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn field_groups(&self) -> &[FieldGroupDefinition] {
        &self.field_groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ParameterValueType;
    use std::collections::HashMap;

    fn definitions() -> HashMap<String, ParametersInfoDefinition> {
        let defs = [
            ParametersInfoDefinition::new("Banner")
                .extending("Base")
                .extending("Styled")
                .with_parameter(ParameterDefinition::new("document"))
                .with_field_group(FieldGroupDefinition::new("content", &["document"])),
            ParametersInfoDefinition::new("Base")
                .extending("Root")
                .with_parameter(ParameterDefinition::new("document").with_type(ParameterValueType::Date))
                .with_parameter(ParameterDefinition::new("limit"))
                .with_field_group(FieldGroupDefinition::new("content", &["limit"])),
            ParametersInfoDefinition::new("Styled")
                .extending("Banner")
                .with_parameter(ParameterDefinition::new("color"))
                .with_field_group(FieldGroupDefinition::new("style", &["color"])),
            ParametersInfoDefinition::new("Root")
                .with_field_group(FieldGroupDefinition::new("advanced", &["cache"])),
        ];
        defs.into_iter().map(|d| (d.id.clone(), d)).collect()
    }

    #[test]
    fn test_collect_walks_breadth_first() {
        let defs = definitions();
        let info = ParametersInfo::collect("Banner", |id| defs.get(id)).unwrap();

        let names: Vec<_> = info.parameters().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["document", "limit", "color"]);
        // own declaration wins over the inherited Date one
        assert_eq!(info.parameter("document").unwrap().value_type, ParameterValueType::String);

        let groups: Vec<_> = info.field_groups().iter().map(|g| g.title_key.as_str()).collect();
        assert_eq!(groups, vec!["content", "style", "advanced"]);
        assert_eq!(info.field_groups()[0].parameters, vec!["document", "limit"]);
    }

    #[test]
    fn test_collect_unknown_root() {
        let defs = definitions();
        let err = ParametersInfo::collect("Missing", |id| defs.get(id)).unwrap_err();
        assert!(matches!(err, Error::UnknownInterface { .. }));
    }

    #[test]
    fn test_collect_skips_unknown_parent() {
        let mut defs = definitions();
        defs.insert(
            "Orphan".into(),
            ParametersInfoDefinition::new("Orphan").extending("Nowhere"),
        );
        let info = ParametersInfo::collect("Orphan", |id| defs.get(id)).unwrap();
        assert!(info.parameters().is_empty());
    }
}
