//! Schema definitions for parameters info interfaces
//!
//! Interfaces are stored as TOML files, one per interface.

pub mod interface;
pub mod parameter;

pub use interface::{FieldGroupDefinition, ParametersInfoDefinition};
pub use parameter::{ParameterConfig, ParameterDefinition, ParameterValueType};
