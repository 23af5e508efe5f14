//! Format-agnostic loading of node documents

use std::fs;
use std::path::Path;

use crate::path::NodePath;
use crate::{Error, HstNode, Result};

/// Document formats a node tree can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_extension(extension: &str) -> Result<Self> {
        match extension.to_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// Loads node trees from documents on disk.
///
/// The loaded tree is anchored at `/<root-name>` unless a different base
/// path is configured.
#[derive(Debug, Default)]
pub struct NodeStore {
    base: NodePath,
}

impl NodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor loaded trees below `base` instead of the root.
    pub fn with_base(base: impl Into<NodePath>) -> Self {
        Self { base: base.into() }
    }

    /// Load a node tree, detecting the format from the file extension.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<HstNode> {
        let path = path.as_ref();
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let format = DocumentFormat::from_extension(extension)?;
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        tracing::debug!(path = %path.display(), format = format.label(), "Loading node document");
        self.parse(&content, format).map_err(|e| match e {
            Error::Parse { format, message, .. } => Error::Parse {
                path: path.to_path_buf(),
                format,
                message,
            },
            other => other,
        })
    }

    /// Parse a node tree from an in-memory document.
    pub fn parse(&self, content: &str, format: DocumentFormat) -> Result<HstNode> {
        let parse_error = |message: String| Error::Parse {
            path: Default::default(),
            format: format.label().into(),
            message,
        };
        let mut node: HstNode = match format {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            DocumentFormat::Json => {
                serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
            DocumentFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?
            }
        };
        node.rebase(&self.base);
        Ok(node)
    }
}
