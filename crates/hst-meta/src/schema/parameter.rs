//! Parameter declarations
//!
//! # Example TOML
//!
//! ```toml
//! [[parameters]]
//! name = "document"
//! type = "string"
//! required = true
//! display_name = "Document"
//!
//! [parameters.config]
//! kind = "path-picker"
//! picker_configuration = "cms-pickers/documents-only"
//! relative = true
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Value type of a component parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterValueType {
    #[default]
    String,
    Boolean,
    Integer,
    Number,
    Date,
}

impl FromStr for ParameterValueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Ok(Self::String),
            "boolean" | "bool" => Ok(Self::Boolean),
            "integer" | "long" | "int" => Ok(Self::Integer),
            "number" | "decimal" | "double" => Ok(Self::Number),
            "date" | "datetime" => Ok(Self::Date),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for ParameterValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Date => "date",
        };
        write!(f, "{label}")
    }
}

/// Editor configuration attached to a parameter.
///
/// A parameter carries at most one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParameterConfig {
    /// Pick a document or folder path
    PathPicker {
        #[serde(default)]
        picker_configuration: Option<String>,
        #[serde(default)]
        picker_initial_path: Option<String>,
        #[serde(default)]
        picker_root_path: Option<String>,
        #[serde(default)]
        picker_selectable_node_types: Vec<String>,
        #[serde(default)]
        relative: bool,
    },
    /// Pick an image set
    ImageSetPath {
        #[serde(default)]
        picker_configuration: Option<String>,
        #[serde(default)]
        picker_initial_path: Option<String>,
        #[serde(default)]
        preview_variant: Option<String>,
    },
    /// Choose from a fixed or provided list of values
    DropDownList {
        #[serde(default)]
        value_list: Vec<String>,
        #[serde(default)]
        value_list_provider: Option<String>,
    },
}

/// A single declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default, rename = "type")]
    pub value_type: ParameterValueType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub hide_in_channel_manager: bool,
    #[serde(default)]
    pub field_group: Option<String>,
    #[serde(default)]
    pub config: Option<ParameterConfig>,
}

impl ParameterDefinition {
    /// Create a plain string parameter with no editor configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: ParameterValueType::String,
            required: false,
            default_value: None,
            display_name: None,
            hide_in_channel_manager: false,
            field_group: None,
            config: None,
        }
    }

    pub fn with_type(mut self, value_type: ParameterValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Whether two declarations of the same parameter can stand for each other.
    pub fn is_type_compatible(&self, other: &ParameterDefinition) -> bool {
        self.value_type == other.value_type
    }
}
