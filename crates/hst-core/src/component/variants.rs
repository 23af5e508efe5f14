//! Variant collection with async boundary absorption

use std::collections::BTreeSet;

use super::{ComponentConfig, LifecycleState};
use crate::Result;

/// Computes `variants` bottom-up and broadcasts mount variants.
///
/// A component sees its own prefixes plus the variants of every child,
/// except async children when the component itself is outside any async
/// subtree.
pub struct VariantCollector;

impl VariantCollector {
    /// Compute the variants of one tree and return them for the root.
    pub fn collect(config: &mut ComponentConfig) -> Result<BTreeSet<String>> {
        Self::collect_node(config, false)
    }

    /// Set `mount_variants` on every node of every tree to the union of the
    /// roots' variants.
    pub fn broadcast<'a>(roots: impl IntoIterator<Item = &'a mut ComponentConfig>) -> BTreeSet<String> {
        let mut roots: Vec<&mut ComponentConfig> = roots.into_iter().collect();
        let mount_variants: BTreeSet<String> = roots
            .iter()
            .flat_map(|root| root.attrs.variants.iter().cloned())
            .collect();
        for root in &mut roots {
            root.walk_mut(&mut |node| node.attrs.mount_variants.clone_from(&mount_variants));
        }
        mount_variants
    }

    fn collect_node(config: &mut ComponentConfig, ancestor_async: bool) -> Result<BTreeSet<String>> {
        config.enter_pass(
            LifecycleState::ParametersInherited,
            LifecycleState::VariantsComputed,
        )?;
        let inside_async = ancestor_async || config.attrs.is_async.unwrap_or(false);

        let mut variants = config.attrs.parameter_name_prefixes.clone();
        for child in &mut config.children {
            let child_variants = Self::collect_node(child, inside_async)?;
            let child_async = child.attrs.is_async.unwrap_or(false);
            if !child_async || inside_async {
                variants.extend(child_variants);
            }
        }
        config.attrs.variants.clone_from(&variants);
        Ok(variants)
    }
}
