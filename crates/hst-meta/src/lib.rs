//! Component parameter metadata for the HST component engine.
//!
//! Component implementations declare their configurable parameters and the
//! field groups those parameters are shown in through "parameters info"
//! interfaces. This crate provides the declaration schema, a registry that
//! binds component classes to interfaces, a loader for definition files, and
//! the [`ComponentMetadataProvider`] capability the engine consumes.

pub mod error;
pub mod info;
pub mod loader;
pub mod provider;
pub mod registry;
pub mod schema;

pub use error::{Error, Result};
pub use info::ParametersInfo;
pub use loader::DefinitionLoader;
pub use provider::{CachingMetadataProvider, ComponentMetadataProvider};
pub use registry::MetadataRegistry;
pub use schema::{
    FieldGroupDefinition, ParameterConfig, ParameterDefinition, ParameterValueType,
    ParametersInfoDefinition,
};
