//! Publishing resolved models to concurrent readers

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use hst_meta::ComponentMetadataProvider;
use hst_node::HstNode;

use crate::config::EngineConfig;
use crate::service::ComponentsConfiguration;

/// One immutable snapshot of every loaded configuration.
#[derive(Debug, Default)]
pub struct SiteModel {
    configurations: BTreeMap<String, Arc<ComponentsConfiguration>>,
    failures: BTreeMap<String, String>,
    generation: u64,
}

impl SiteModel {
    pub fn configuration(&self, name: &str) -> Option<&Arc<ComponentsConfiguration>> {
        self.configurations.get(name)
    }

    pub fn configurations(&self) -> &BTreeMap<String, Arc<ComponentsConfiguration>> {
        &self.configurations
    }

    /// Configurations that failed to load, with the reason.
    pub fn failures(&self) -> &BTreeMap<String, String> {
        &self.failures
    }

    /// Incremented on every reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds the active [`SiteModel`] and swaps in new ones on reload.
///
/// Readers get an `Arc` snapshot and keep using it for as long as they
/// need; a reload never touches a published snapshot.
pub struct ModelRegistry {
    current: ArcSwap<SiteModel>,
    engine: EngineConfig,
    provider: Arc<dyn ComponentMetadataProvider>,
}

impl ModelRegistry {
    pub fn new(engine: EngineConfig, provider: Arc<dyn ComponentMetadataProvider>) -> Self {
        Self {
            current: ArcSwap::from_pointee(SiteModel::default()),
            engine,
            provider,
        }
    }

    /// The active snapshot.
    pub fn load(&self) -> Arc<SiteModel> {
        self.current.load_full()
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Resolve `configurations` into a new snapshot and publish it.
    ///
    /// A configuration that fails to load is recorded in
    /// [`SiteModel::failures`]; the others are unaffected.
    pub fn reload(&self, configurations: &[HstNode]) -> Arc<SiteModel> {
        let generation = self.current.load().generation + 1;
        let mut model = SiteModel {
            generation,
            ..SiteModel::default()
        };

        for node in configurations {
            let name = node.name().to_string();
            match ComponentsConfiguration::load(node, &self.engine, Arc::clone(&self.provider)) {
                Ok(configuration) => {
                    model.configurations.insert(name, Arc::new(configuration));
                }
                Err(e) => {
                    tracing::error!(configuration = %name, error = %e, "Failed to load configuration");
                    model.failures.insert(name, e.to_string());
                }
            }
        }

        let model = Arc::new(model);
        self.current.store(Arc::clone(&model));
        tracing::info!(
            generation,
            configurations = model.configurations.len(),
            failures = model.failures.len(),
            "Published component model"
        );
        model
    }
}
