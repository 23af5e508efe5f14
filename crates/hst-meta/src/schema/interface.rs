//! Parameters info interface definitions
//!
//! # Example TOML
//!
//! ```toml
//! id = "com.example.BannerInfo"
//! extends = ["com.example.BaseInfo"]
//!
//! [[parameters]]
//! name = "document"
//!
//! [[field_groups]]
//! title_key = "content"
//! parameters = ["document"]
//! ```

use serde::{Deserialize, Serialize};

use super::parameter::ParameterDefinition;

/// A named group of parameters shown together in editing tooling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroupDefinition {
    pub title_key: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

impl FieldGroupDefinition {
    pub fn new(title_key: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            title_key: title_key.into(),
            parameters: parameters.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// One parameters info interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParametersInfoDefinition {
    /// Interface identifier (usually a fully qualified type name)
    pub id: String,
    /// Parent interfaces, in declaration order
    #[serde(default)]
    pub extends: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    #[serde(default)]
    pub field_groups: Vec<FieldGroupDefinition>,
}

impl ParametersInfoDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extends: Vec::new(),
            parameters: Vec::new(),
            field_groups: Vec::new(),
        }
    }

    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends.push(parent.into());
        self
    }

    pub fn with_parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_field_group(mut self, group: FieldGroupDefinition) -> Self {
        self.field_groups.push(group);
        self
    }
}
