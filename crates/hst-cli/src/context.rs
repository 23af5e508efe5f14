//! Engine settings and metadata shared by every command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hst_core::{EngineConfig, ModelRegistry, SiteModel};
use hst_meta::{CachingMetadataProvider, ComponentMetadataProvider, DefinitionLoader, MetadataRegistry};
use hst_node::{HstNode, NodeStore, NodeType};

use crate::error::{CliError, Result};

/// What a command needs to resolve documents.
pub struct Session {
    pub engine: EngineConfig,
    pub provider: Arc<dyn ComponentMetadataProvider>,
}

impl Session {
    /// Build a session from the global flags.
    ///
    /// Without `--engine-config` the defaults apply; without `--metadata`
    /// only the built-in container metadata is known.
    pub fn open(engine_config: Option<&Path>, metadata: Option<&Path>) -> Result<Self> {
        let engine = match engine_config {
            Some(path) => EngineConfig::load(path)?,
            None => EngineConfig::default(),
        };

        let mut registry = MetadataRegistry::with_builtins();
        if let Some(dir) = metadata {
            if !dir.is_dir() {
                return Err(CliError::user(format!(
                    "Metadata directory not found: {}",
                    dir.display()
                )));
            }
            registry.extend(DefinitionLoader::new().load_dir(dir)?);
        }
        tracing::debug!(classes = registry.list_classes().len(), "Component metadata ready");

        Ok(Self {
            engine,
            provider: Arc::new(CachingMetadataProvider::new(registry)),
        })
    }

    /// Resolve every configuration root found in `documents`.
    pub fn resolve(&self, documents: &[PathBuf]) -> Result<Arc<SiteModel>> {
        let mut roots = Vec::new();
        for document in documents {
            roots.extend(configuration_roots(load_document(document)?));
        }
        if roots.is_empty() {
            return Err(CliError::user("No hst:configuration nodes found"));
        }
        let registry = ModelRegistry::new(self.engine.clone(), Arc::clone(&self.provider));
        Ok(registry.reload(&roots))
    }
}

/// Load a node document from disk.
pub fn load_document(path: &Path) -> Result<HstNode> {
    if !path.is_file() {
        return Err(CliError::user(format!("Document not found: {}", path.display())));
    }
    Ok(NodeStore::new().load(path)?)
}

/// A document is either one configuration or a folder of them.
fn configuration_roots(document: HstNode) -> Vec<HstNode> {
    if document.is_type(NodeType::Configuration) {
        return vec![document];
    }
    document
        .children_of_type(NodeType::Configuration)
        .cloned()
        .collect()
}
