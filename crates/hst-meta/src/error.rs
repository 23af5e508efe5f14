//! Error types for hst-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid metadata definition at {path}: {message}")]
    InvalidDefinition { path: PathBuf, message: String },

    #[error("Parameters info interface not found: {id}")]
    UnknownInterface { id: String },
}
