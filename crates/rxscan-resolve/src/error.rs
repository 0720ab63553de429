#![deny(unsafe_code)]

use std::path::PathBuf;
use std::time::Duration;

/// Failure of an external collaborator. Never fatal to a scan: the
/// resolver degrades similarity failures to "no match" and oracle failures
/// to "reject".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator timed out after {0:?}")]
    Timeout(Duration),

    #[error("invalid collaborator response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {message}")]
    Invalid { message: String },
}
