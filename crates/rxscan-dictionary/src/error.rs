#![deny(unsafe_code)]

use std::path::PathBuf;

/// Failure to build the catalog. This is the only fatal error in the
/// pipeline: without a catalog there is nothing to resolve against.
#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset has no `results` array")]
    MissingResults,
}
