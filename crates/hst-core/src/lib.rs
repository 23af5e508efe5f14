//! Component configuration resolution engine for the HST site delivery layer
//!
//! Turns a raw, reference-laden tree of configuration nodes into a fully
//! resolved, immutable component model:
//!
//! - **Building**: one [`ComponentConfig`] per component node, depth-first
//! - **Reference resolution**: prototype-style inheritance between
//!   components with self-reference detection
//! - **Parameter inheritance**, **variants** and **cacheability**
//!   propagated through the tree with async boundaries
//! - **Parameter metadata**: node-declared and class-declared parameters
//!   and field groups reconciled
//! - **Finalization** into shared [`ResolvedComponent`] trees
//! - **Experience pages**: detached copies of layouts with per-document
//!   content applied
//!
//! # Architecture
//!
//! ```text
//!                  hst-cli
//!                     |
//!                 hst-core
//!                     |
//!            +--------+--------+
//!            |                 |
//!        hst-node          hst-meta
//! ```
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use hst_core::{ComponentView, ComponentsConfiguration, EngineConfig};
//! use hst_meta::MetadataRegistry;
//! use hst_node::HstNode;
//!
//! let configuration = HstNode::new("demo", "hst:configuration").with_child(
//!     HstNode::new("hst:pages", "hst:pages").with_child(HstNode::new("home", "hst:component")),
//! );
//! let model = ComponentsConfiguration::load(
//!     &configuration,
//!     &EngineConfig::default(),
//!     Arc::new(MetadataRegistry::with_builtins()),
//! )
//! .unwrap();
//! assert_eq!(model.component_configuration("hst:pages/home").unwrap().name(), "home");
//! ```

pub mod component;
pub mod config;
pub mod error;
pub mod model;
mod pipeline;
pub mod service;
pub mod template;

pub use component::{
    ComponentAttributes, ComponentConfig, ComponentType, ComponentView, DynamicParameter,
    FieldGroup, LifecycleState, ParameterMap, ParameterOrigin, ResolvedComponent, TreeCopier,
};
pub use config::EngineConfig;
pub use error::{Error, Result};
pub use model::{ModelRegistry, SiteModel};
pub use service::ComponentsConfiguration;
pub use template::{HstComponentTemplate, TemplateResolver};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_self_reference_displays_chain() {
        let error = Error::SelfReference {
            id: "hst:pages/a".into(),
            chain: vec!["hst:pages/a".into(), "hst:pages/b".into(), "hst:pages/a".into()],
        };
        let display = error.to_string();
        assert!(
            display.contains("hst:pages/a -> hst:pages/b -> hst:pages/a"),
            "Error display should contain the reference chain, got: {}",
            display
        );
    }

    #[test]
    fn error_illegal_lifecycle_names_both_states() {
        let error = Error::IllegalLifecycle {
            id: "hst:pages/home".into(),
            expected: LifecycleState::VariantsComputed,
            actual: LifecycleState::Constructed,
        };
        let display = error.to_string();
        assert!(display.contains("VARIANTS_COMPUTED"), "got: {}", display);
        assert!(display.contains("CONSTRUCTED"), "got: {}", display);
    }
}
