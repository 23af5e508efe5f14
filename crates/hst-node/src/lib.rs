//! Raw configuration nodes for the HST component engine
//!
//! Models the content-tree collaborator the resolution engine reads from:
//! typed nodes with properties and ordered children, addressed by
//! slash-separated paths, loaded from TOML, JSON or YAML documents.

pub mod constants;
pub mod error;
pub mod node;
pub mod path;
pub mod store;

pub use constants::{NodeType, props};
pub use error::{Error, Result};
pub use node::{HstNode, PropertyValue};
pub use path::NodePath;
pub use store::NodeStore;
