//! The component metadata capability consumed by the engine

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::info::ParametersInfo;

/// Looks up the declared parameter metadata of a component class.
///
/// Returns `None` when the class declares no parameters info interface.
pub trait ComponentMetadataProvider: Send + Sync {
    fn parameters_info(&self, class_name: &str) -> Option<Arc<ParametersInfo>>;
}

impl<P: ComponentMetadataProvider + ?Sized> ComponentMetadataProvider for Arc<P> {
    fn parameters_info(&self, class_name: &str) -> Option<Arc<ParametersInfo>> {
        (**self).parameters_info(class_name)
    }
}

/// Caches lookups of an inner provider per class identifier.
///
/// Negative results are cached as well; a class either has metadata or it
/// does not for the lifetime of the cache.
#[derive(Debug)]
pub struct CachingMetadataProvider<P> {
    inner: P,
    cache: RwLock<HashMap<String, Option<Arc<ParametersInfo>>>>,
}

impl<P: ComponentMetadataProvider> CachingMetadataProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached class identifiers.
    pub fn cached_len(&self) -> usize {
        self.cache.read().len()
    }

    /// Drop every cached entry, e.g. after the inner definitions changed.
    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: ComponentMetadataProvider> ComponentMetadataProvider for CachingMetadataProvider<P> {
    fn parameters_info(&self, class_name: &str) -> Option<Arc<ParametersInfo>> {
        if let Some(cached) = self.cache.read().get(class_name) {
            return cached.clone();
        }
        let info = self.inner.parameters_info(class_name);
        self.cache
            .write()
            .entry(class_name.to_string())
            .or_insert(info)
            .clone()
    }
}
