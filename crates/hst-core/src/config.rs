//! Engine configuration
//!
//! Settings that shape how raw nodes are interpreted. Every field has a
//! default, so an empty document is a valid configuration:
//!
//! ```toml
//! parameter_prefix_delimiter = "|"
//! standard_container_class = "com.example.MyContainer"
//! legacy_container_classes = ["com.example.OldContainer"]
//! inline_template_protocol = "jcr:"
//! warn_misplaced_container_items = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Delimiter between a variant prefix and a parameter name.
pub const DEFAULT_PREFIX_DELIMITER: &str = "\u{FFFF}";

/// Class used for containers that do not name one.
pub const STANDARD_CONTAINER_CLASS: &str = hst_meta::registry::STANDARD_CONTAINER_CLASS;

/// Former class name of the standard container.
pub const LEGACY_CONTAINER_CLASS: &str =
    "org.hippoecm.hst.pagecomposer.builtin.components.StandardContainerComponent";

/// Engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Separates a variant prefix from the parameter name in merged keys
    pub parameter_prefix_delimiter: String,
    /// Class assigned to containers without an explicit class name
    pub standard_container_class: String,
    /// Class names transparently replaced by the standard container class
    pub legacy_container_classes: Vec<String>,
    /// Prefix of the virtual render path of inline template scripts
    pub inline_template_protocol: String,
    /// Warn about container items placed outside a container
    pub warn_misplaced_container_items: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parameter_prefix_delimiter: DEFAULT_PREFIX_DELIMITER.to_string(),
            standard_container_class: STANDARD_CONTAINER_CLASS.to_string(),
            legacy_container_classes: vec![LEGACY_CONTAINER_CLASS.to_string()],
            inline_template_protocol: "jcr:".to_string(),
            warn_misplaced_container_items: true,
        }
    }
}

impl EngineConfig {
    /// Parse an engine configuration from TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an engine configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "Loading engine configuration");
        Self::parse(&content).map_err(|e| match e {
            Error::InvalidConfig { message, .. } => Error::InvalidConfig {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.parameter_prefix_delimiter.is_empty() {
            return Err(Error::InvalidConfig {
                path: Default::default(),
                message: "parameter_prefix_delimiter must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Whether `class_name` is a former name of the standard container.
    pub fn is_legacy_container_class(&self, class_name: &str) -> bool {
        self.legacy_container_classes.iter().any(|c| c == class_name)
    }
}
