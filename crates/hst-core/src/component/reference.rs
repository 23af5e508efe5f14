//! Reference resolution and prototype-style merging
//!
//! A component naming another root component in `hst:referencecomponent`
//! inherits everything it does not set itself from that component,
//! including children. References are followed depth-first: a referenced
//! component is fully resolved before anything inherits from it.

use std::collections::BTreeMap;

use super::{ComponentAttributes, ComponentConfig, LifecycleState, TreeCopier};
use crate::{Error, Result};

/// Root components addressable by reference, keyed by id.
#[derive(Debug, Default)]
pub struct CanonicalIndex {
    roots: BTreeMap<String, ComponentConfig>,
    in_progress: Vec<String>,
}

impl CanonicalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, config: ComponentConfig) {
        self.roots.insert(config.attrs.id.clone(), config);
    }

    pub fn get(&self, id: &str) -> Option<&ComponentConfig> {
        self.roots.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.roots.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn roots_mut(&mut self) -> impl Iterator<Item = &mut ComponentConfig> {
        self.roots.values_mut()
    }

    pub fn into_roots(self) -> BTreeMap<String, ComponentConfig> {
        self.roots
    }

    /// Resolve references of every root.
    ///
    /// Stops at the first self-reference; the index must then be discarded.
    pub fn resolve_all(&mut self) -> Result<()> {
        let ids: Vec<String> = self.roots.keys().cloned().collect();
        for id in ids {
            self.resolve_root(&id)?;
        }
        Ok(())
    }

    fn resolve_root(&mut self, id: &str) -> Result<()> {
        // Absent ids are either unknown or currently being resolved; the
        // caller reports both.
        let Some(mut config) = self.roots.remove(id) else {
            return Ok(());
        };
        self.in_progress.push(id.to_string());
        let result = ReferenceResolver::resolve(&mut config, self);
        self.in_progress.pop();
        self.roots.insert(id.to_string(), config);
        result
    }
}

/// Resolves `hst:referencecomponent` indirections.
pub struct ReferenceResolver;

impl ReferenceResolver {
    /// Resolve the references of `config` and its descendants.
    ///
    /// Nodes already past [`LifecycleState::ReferencesResolved`] are left
    /// alone, so diamonds and repeated runs merge each reference once.
    pub fn resolve(config: &mut ComponentConfig, index: &mut CanonicalIndex) -> Result<()> {
        if config.state >= LifecycleState::ReferencesResolved {
            return Ok(());
        }

        if let Some(target) = config.attrs.reference_component.take() {
            if index.in_progress.contains(&target) {
                let mut chain = index.in_progress.clone();
                chain.push(target);
                return Err(Error::SelfReference {
                    id: config.attrs.id.clone(),
                    chain,
                });
            }
            index.resolve_root(&target)?;
            match index.get(&target) {
                Some(referenced) => {
                    tracing::debug!(component = %config.attrs.id, reference = %target, "Merging referenced component");
                    combine(config, referenced);
                }
                None => {
                    tracing::warn!(
                        component = %config.attrs.id,
                        reference = %target,
                        "Referenced component does not exist, skipping reference"
                    );
                }
            }
        }

        for child in &mut config.children {
            Self::resolve(child, index)?;
        }
        config.enter_pass(LifecycleState::Constructed, LifecycleState::ReferencesResolved)
    }

    /// Fill container items from the catalog item named by their
    /// `hst:componentdefinition`.
    ///
    /// Only scalars and parameters are inherited, never children.
    pub fn resolve_component_definitions<'c, F>(config: &mut ComponentConfig, catalog: F)
    where
        F: Fn(&str) -> Option<&'c ComponentAttributes>,
    {
        config.walk_mut(&mut |node| {
            let Some(definition) = node.attrs.component_definition.clone() else {
                return;
            };
            match catalog(&definition) {
                Some(item) => node.attrs.fill_from(item),
                None => tracing::warn!(
                    component = %node.attrs.id,
                    definition = %definition,
                    "Catalog item does not exist, skipping component definition"
                ),
            }
        });
    }
}

/// Merge `referenced` into `receiver`. Local values always win.
///
/// Containers and container items do not support merging: when either side
/// is one, both are left unchanged and `false` is returned.
pub(crate) fn combine(receiver: &mut ComponentConfig, referenced: &ComponentConfig) -> bool {
    if !receiver.attrs.component_type.supports_merge()
        || !referenced.attrs.component_type.supports_merge()
    {
        tracing::warn!(
            component = %receiver.attrs.id,
            component_type = %receiver.attrs.component_type,
            referenced = %referenced.attrs.id,
            referenced_type = %referenced.attrs.component_type,
            "Components of this type cannot be merged, skipping"
        );
        return false;
    }

    receiver.attrs.fill_from(&referenced.attrs);

    for child in &referenced.children {
        match receiver.child_mut(&child.attrs.name) {
            Some(existing) => {
                combine(existing, child);
            }
            None => {
                let prefix = receiver.attrs.id.clone();
                let copy = TreeCopier::new(|_: Option<&str>, attrs: &ComponentAttributes| {
                    format!("{prefix}-{}", attrs.id)
                })
                .mark_inherited()
                .copy(child);
                receiver.children.push(copy);
            }
        }
    }
    true
}
