//! Frozen component trees shared across readers

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use hst_node::NodePath;

use super::copy::detached_copy;
use super::{ComponentAttributes, ComponentConfig, ComponentView, LifecycleState};
use crate::{Error, Result};

/// A finalized component.
///
/// Children are owned through `Arc`; the parent link is weak and only used
/// for upward traversal. Nothing can be mutated after finalization; use
/// [`ResolvedComponent::copy`] to get a private mutable tree.
#[derive(Debug)]
pub struct ResolvedComponent {
    attrs: ComponentAttributes,
    children: Vec<Arc<ResolvedComponent>>,
    index: HashMap<String, usize>,
    parent: Weak<ResolvedComponent>,
}

impl ResolvedComponent {
    pub fn parent(&self) -> Option<Arc<ResolvedComponent>> {
        self.parent.upgrade()
    }

    pub fn children(&self) -> &[Arc<ResolvedComponent>] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Arc<ResolvedComponent>> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    pub fn descendant(&self, relative: &str) -> Option<&ResolvedComponent> {
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |node, name| node.child(name).map(Arc::as_ref))
    }

    /// This component and all descendants, parents first.
    pub fn flatten(&self) -> Vec<&ResolvedComponent> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.flatten());
        }
        out
    }

    /// Find a component by id in this subtree.
    pub fn find(&self, id: &str) -> Option<&ResolvedComponent> {
        if self.attrs.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Deep copy into an independent, detached mutable tree rooted at
    /// `new_id`. The copy starts its own lifecycle from
    /// [`LifecycleState::Constructed`].
    pub fn copy(
        &self,
        new_id: &str,
        new_location: Option<NodePath>,
        include_container_items: bool,
    ) -> ComponentConfig {
        detached_copy(self, new_id, new_location, include_container_items)
    }
}

impl ComponentView for ResolvedComponent {
    fn attributes(&self) -> &ComponentAttributes {
        &self.attrs
    }

    fn child_views(&self) -> Vec<&Self> {
        self.children.iter().map(Arc::as_ref).collect()
    }

    fn lifecycle_state(&self) -> LifecycleState {
        LifecycleState::Finalized
    }
}

/// Freezes mutable trees into [`ResolvedComponent`]s.
pub struct ImmutabilityFinalizer;

impl ImmutabilityFinalizer {
    /// Freeze a tree whose every node has completed the cacheability pass.
    pub fn finalize(config: ComponentConfig) -> Result<Arc<ResolvedComponent>> {
        Self::check(&config)?;
        Ok(Self::freeze(config, Weak::new()))
    }

    fn check(config: &ComponentConfig) -> Result<()> {
        if config.state < LifecycleState::CacheabilityComputed {
            return Err(Error::IllegalLifecycle {
                id: config.attrs.id.clone(),
                expected: LifecycleState::CacheabilityComputed,
                actual: config.state,
            });
        }
        config.children.iter().try_for_each(Self::check)
    }

    fn freeze(config: ComponentConfig, parent: Weak<ResolvedComponent>) -> Arc<ResolvedComponent> {
        let ComponentConfig {
            mut attrs, children, ..
        } = config;
        attrs.shrink_to_fit();
        Arc::new_cyclic(|me| {
            let children: Vec<_> = children
                .into_iter()
                .map(|child| Self::freeze(child, me.clone()))
                .collect();
            let index = children
                .iter()
                .enumerate()
                .map(|(i, child)| (child.attrs.name.clone(), i))
                .collect();
            ResolvedComponent {
                attrs,
                children,
                index,
                parent,
            }
        })
    }
}
