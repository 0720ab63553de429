//! Scan configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Distance thresholds for the similarity-backed resolution steps.
///
/// A hit is accepted when its distance is at or below the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchThresholds {
    /// Confirms a sub-token hit inside a multi-word term.
    pub partial: f32,
    /// Accepts a nearest neighbor when nothing lexical matched.
    pub approximate: f32,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            partial: 50.0,
            approximate: 50.0,
        }
    }
}

impl MatchThresholds {
    /// Admits more distant neighbors, for noisy backends.
    pub fn lenient() -> Self {
        Self {
            partial: 86.0,
            approximate: 86.0,
        }
    }

    /// Only near-identical neighbors.
    pub fn strict() -> Self {
        Self {
            partial: 20.0,
            approximate: 20.0,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("partial", self.partial), ("approximate", self.approximate)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    message: format!("threshold `{name}` must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    pub thresholds: MatchThresholds,
    pub similarity_timeout_ms: u64,
    pub oracle_timeout_ms: u64,
    /// Result count for `query_similar` when the caller does not pick one.
    pub query_top_k: usize,
    /// Longest punctuation-delimited chunk proposed as a single phrase.
    pub max_phrase_words: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            thresholds: MatchThresholds::default(),
            similarity_timeout_ms: 2_000,
            oracle_timeout_ms: 10_000,
            query_top_k: 5,
            max_phrase_words: 3,
        }
    }
}

impl ScanConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Self::parse(contents, "<inline>")
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|source| ConfigError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;
        if self.similarity_timeout_ms == 0 || self.oracle_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                message: "timeouts must be greater than zero".to_string(),
            });
        }
        if self.query_top_k == 0 {
            return Err(ConfigError::Invalid {
                message: "query_top_k must be at least 1".to_string(),
            });
        }
        if self.max_phrase_words == 0 {
            return Err(ConfigError::Invalid {
                message: "max_phrase_words must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn similarity_timeout(&self) -> Duration {
        Duration::from_millis(self.similarity_timeout_ms)
    }

    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}
