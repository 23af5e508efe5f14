//! Composite cacheability

use super::{ComponentConfig, LifecycleState};
use crate::Result;

/// Computes `composite_cacheable` for every node.
///
/// An explicitly non-cacheable node makes itself and its strict ancestors
/// non-cacheable. Propagation stops at the first async ancestor that has no
/// async ancestor of its own; that node is still marked.
pub struct CacheabilityPropagator;

impl CacheabilityPropagator {
    pub fn propagate(config: &mut ComponentConfig) -> Result<()> {
        Self::propagate_node(config, false)?;
        Ok(())
    }

    /// Returns whether non-cacheability leaks to the parent.
    fn propagate_node(config: &mut ComponentConfig, ancestor_async: bool) -> Result<bool> {
        config.enter_pass(
            LifecycleState::VariantsComputed,
            LifecycleState::CacheabilityComputed,
        )?;
        let is_async = config.attrs.is_async.unwrap_or(false);

        let explicit = config.attrs.cacheable == Some(false);
        let mut leaked = false;
        for child in &mut config.children {
            if Self::propagate_node(child, ancestor_async || is_async)? {
                leaked = true;
            }
        }
        config.attrs.composite_cacheable = !explicit && !leaked;

        // An outermost async node absorbs what leaks from below, not its own flag.
        let boundary = is_async && !ancestor_async;
        Ok(explicit || (leaked && !boundary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentType, ComponentView};

    fn node(name: &str, is_async: Option<bool>, cacheable: Option<bool>) -> ComponentConfig {
        let mut config = ComponentConfig::new(name, name, ComponentType::Component);
        config.state = LifecycleState::VariantsComputed;
        config.attrs.is_async = is_async;
        config.attrs.cacheable = cacheable;
        config
    }

    #[test]
    fn test_unset_means_cacheable() {
        let mut root = node("root", None, None);
        root.add_child(node("child", None, None)).unwrap();
        CacheabilityPropagator::propagate(&mut root).unwrap();
        assert!(root.is_composite_cacheable());
        assert!(root.child("child").unwrap().is_composite_cacheable());
    }

    #[test]
    fn test_non_cacheable_leaks_up_to_async_boundary() {
        let mut leaf = node("leaf", None, Some(false));
        leaf.add_child(node("below", None, None)).unwrap();
        let mut middle = node("middle", Some(false), None);
        middle.add_child(leaf).unwrap();
        let mut boundary = node("boundary", Some(true), None);
        boundary.add_child(middle).unwrap();
        let mut root = node("root", None, None);
        root.add_child(boundary).unwrap();
        root.add_child(node("sibling", None, None)).unwrap();

        CacheabilityPropagator::propagate(&mut root).unwrap();

        let boundary = root.child("boundary").unwrap();
        let middle = boundary.child("middle").unwrap();
        let leaf = middle.child("leaf").unwrap();
        assert!(!leaf.is_composite_cacheable());
        assert!(leaf.child("below").unwrap().is_composite_cacheable());
        assert!(!middle.is_composite_cacheable());
        assert!(!boundary.is_composite_cacheable());
        assert!(root.is_composite_cacheable());
        assert!(root.child("sibling").unwrap().is_composite_cacheable());
    }

    #[test]
    fn test_nested_async_does_not_stop_propagation() {
        let mut inner = node("inner", Some(true), None);
        inner.add_child(node("leaf", None, Some(false))).unwrap();
        let mut outer = node("outer", Some(true), None);
        outer.add_child(inner).unwrap();
        let mut root = node("root", None, None);
        root.add_child(outer).unwrap();

        CacheabilityPropagator::propagate(&mut root).unwrap();

        let outer = root.child("outer").unwrap();
        assert!(!outer.child("inner").unwrap().is_composite_cacheable());
        assert!(!outer.is_composite_cacheable());
        assert!(root.is_composite_cacheable());
    }

    #[test]
    fn test_non_cacheable_async_node_marks_its_parent() {
        let mut root = node("root", None, None);
        root.add_child(node("child", Some(true), Some(false))).unwrap();
        let mut boundary = node("boundary", Some(true), None);
        boundary.add_child(node("leaf", None, Some(false))).unwrap();
        let mut other = node("other", None, None);
        other.add_child(boundary).unwrap();

        CacheabilityPropagator::propagate(&mut root).unwrap();
        CacheabilityPropagator::propagate(&mut other).unwrap();

        assert!(!root.child("child").unwrap().is_composite_cacheable());
        assert!(!root.is_composite_cacheable());
        assert!(!other.child("boundary").unwrap().is_composite_cacheable());
        assert!(other.is_composite_cacheable());
    }

    #[test]
    fn test_recomputation_resets_flags() {
        let mut root = node("root", None, None);
        root.add_child(node("child", None, Some(false))).unwrap();
        CacheabilityPropagator::propagate(&mut root).unwrap();
        assert!(!root.is_composite_cacheable());

        root.child_mut("child").unwrap().attrs.cacheable = None;
        CacheabilityPropagator::propagate(&mut root).unwrap();
        assert!(root.is_composite_cacheable());
    }
}
