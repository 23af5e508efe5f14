//! Error types for hst-node

use std::path::PathBuf;

/// Result type for hst-node operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading configuration nodes
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} node document at {path}: {message}")]
    Parse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported node document format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Node {path} has no property {property}")]
    MissingProperty { path: String, property: String },

    #[error("Property {property} on {path} is invalid: {message}")]
    InvalidProperty {
        path: String,
        property: String,
        message: String,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
