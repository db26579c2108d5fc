//! Error type shared by the core crate.
//!
//! Domain operations are permissive and mostly return `bool`; errors only
//! come from the storage backends and from reading configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results using [`EditorError`].
pub type Result<T> = std::result::Result<T, EditorError>;


#[derive(Error, Debug)]
pub enum EditorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no parameter with id {0}")]
    UnknownParam(u32),

    #[error("no parameter id left to allocate")]
    IdsExhausted,
}
