//! Error types for hst-core

use std::path::PathBuf;

use crate::component::LifecycleState;

/// Result type for hst-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving component configurations
///
/// Only [`Error::SelfReference`] and [`Error::ModelLoading`] abort the load
/// of a configuration root. Everything the resolution pipeline can recover
/// from is logged and skipped instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A node kind that cannot be turned into a component
    #[error("Unsupported node kind {node_type} at {path}")]
    UnsupportedNodeKind { path: String, node_type: String },

    /// A component (directly or through other components) references itself
    #[error("Component {id} references itself (chain: {})", chain.join(" -> "))]
    SelfReference { id: String, chain: Vec<String> },

    /// A configuration root cannot be loaded at all
    #[error("Cannot load configuration {root}: {message}")]
    ModelLoading { root: String, message: String },

    #[error("Component not found: {id}")]
    ComponentNotFound { id: String },

    #[error("Component {parent} already has a child named {name}")]
    DuplicateChild { parent: String, name: String },

    #[error("Component {id} is not a container")]
    NotAContainer { id: String },

    /// A pipeline pass ran before the passes it depends on
    #[error("Component {id} is {actual} but the pass requires {expected}")]
    IllegalLifecycle {
        id: String,
        expected: LifecycleState,
        actual: LifecycleState,
    },

    #[error("Invalid engine configuration at {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },

    /// Error from hst-node
    #[error(transparent)]
    Node(#[from] hst_node::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}
