//! The pass sequence run on every component tree after reference resolution

use std::collections::{BTreeMap, BTreeSet};

use hst_meta::ComponentMetadataProvider;

use crate::Result;
use crate::component::{
    CacheabilityPropagator, ComponentAttributes, ComponentConfig, DynamicParameterResolver,
    ParameterInheritance, ReferenceResolver, VariantCollector,
};
use crate::config::EngineConfig;
use crate::template::TemplateResolver;

/// Everything the post-reference passes need to read.
pub(crate) struct Pipeline<'a> {
    pub engine: &'a EngineConfig,
    pub provider: &'a dyn ComponentMetadataProvider,
    pub templates: &'a TemplateResolver,
    pub catalog: &'a BTreeMap<String, ComponentAttributes>,
}

impl Pipeline<'_> {
    /// Run catalog inheritance, parameter metadata, templates, parameter
    /// inheritance and variants on a reference-resolved tree.
    pub fn prepare(&self, config: &mut ComponentConfig) -> Result<()> {
        ReferenceResolver::resolve_component_definitions(config, |id| self.catalog.get(id));
        DynamicParameterResolver::new(self.provider).resolve(config)?;
        self.templates.apply(config);
        ParameterInheritance::new(&self.engine.parameter_prefix_delimiter).apply(config)?;
        VariantCollector::collect(config)?;
        Ok(())
    }

    /// Set mount variants and compute cacheability.
    pub fn complete(&self, config: &mut ComponentConfig, mount_variants: &BTreeSet<String>) -> Result<()> {
        config.walk_mut(&mut |node| node.attributes_mut().mount_variants.clone_from(mount_variants));
        CacheabilityPropagator::propagate(config)
    }
}
