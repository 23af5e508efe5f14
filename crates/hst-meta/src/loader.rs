//! Loader for parameters info definitions from a metadata directory
//!
//! ```text
//! metadata/
//!   bindings.toml          # class name -> interface id
//!   banner-info.toml       # one interface per file
//!   base-info.toml
//! ```
//!
//! `bindings.toml` holds a single table:
//!
//! ```toml
//! [bindings]
//! "com.example.BannerComponent" = "com.example.BannerInfo"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::registry::MetadataRegistry;
use crate::schema::ParametersInfoDefinition;
use crate::{Error, Result};

/// Name of the class binding file inside a metadata directory.
pub const BINDINGS_FILE: &str = "bindings.toml";

#[derive(Debug, Default, Deserialize)]
struct BindingsFile {
    #[serde(default)]
    bindings: HashMap<String, String>,
}

/// Loads interface definitions and class bindings into a registry.
#[derive(Debug, Default)]
pub struct DefinitionLoader;

impl DefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every definition in `dir` into a fresh registry.
    ///
    /// A missing directory yields an empty registry. Interface files that
    /// fail to parse are skipped with a warning; a malformed bindings file
    /// is an error because every binding would silently disappear.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<MetadataRegistry> {
        let dir = dir.as_ref();
        let mut registry = MetadataRegistry::new();

        if !dir.is_dir() {
            return Ok(registry);
        }

        let entries = fs::read_dir(dir).map_err(|e| Error::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut paths: Vec<_> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            if path.file_name().is_some_and(|name| name == BINDINGS_FILE) {
                for (class_name, interface_id) in self.load_bindings(&path)? {
                    registry.bind(class_name, interface_id);
                }
                continue;
            }
            match self.load_interface(&path) {
                Ok(definition) => registry.register_interface(definition),
                Err(e) => tracing::warn!("Failed to load {:?}: {}", path, e),
            }
        }

        tracing::debug!(dir = %dir.display(), interfaces = registry.len(), "Loaded component metadata");
        Ok(registry)
    }

    /// Load a single interface definition file.
    pub fn load_interface(&self, path: &Path) -> Result<ParametersInfoDefinition> {
        let content = read(path)?;
        toml::from_str(&content).map_err(|e| Error::InvalidDefinition {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn load_bindings(&self, path: &Path) -> Result<HashMap<String, String>> {
        let content = read(path)?;
        let file: BindingsFile = toml::from_str(&content).map_err(|e| Error::InvalidDefinition {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(file.bindings)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_nonexistent_dir() {
        let registry = DefinitionLoader::new()
            .load_dir("/nonexistent/metadata")
            .unwrap();
        assert!(registry.is_empty());
    }
}
