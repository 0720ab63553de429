//! Interfaces to the external capabilities the resolver consumes.
//!
//! Both ports are object safe (`Arc<dyn ...>`) and must tolerate
//! concurrent independent calls: implementations hold no per-request
//! mutable state.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::PortError;

/// One nearest-neighbor result. Lower distance means more similar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityHit {
    pub identifier: String,
    pub distance: f32,
}

impl SimilarityHit {
    pub fn new(identifier: impl Into<String>, distance: f32) -> Self {
        Self {
            identifier: identifier.into(),
            distance,
        }
    }
}

/// Nearest-neighbor lookup over the catalog.
#[async_trait]
pub trait SimilaritySearch: Send + Sync {
    /// Up to `top_k` hits in ascending distance order. An empty list means
    /// nothing qualified; errors are reserved for an unreachable backend.
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SimilarityHit>, PortError>;
}

/// Classifies ambiguous single words given the sentence they appeared in.
#[async_trait]
pub trait ValidationOracle: Send + Sync {
    /// Returns a verdict for every input word; `true` keeps the word.
    async fn validate(
        &self,
        word_contexts: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, bool>, PortError>;
}

/// Similarity backend that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSearch;

#[async_trait]
impl SimilaritySearch for NoopSearch {
    async fn query(&self, _text: &str, _top_k: usize) -> Result<Vec<SimilarityHit>, PortError> {
        Ok(Vec::new())
    }
}

/// Deterministic offline oracle: rejects every word.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectAllOracle;

#[async_trait]
impl ValidationOracle for RejectAllOracle {
    async fn validate(
        &self,
        word_contexts: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, bool>, PortError> {
        Ok(reject_all(word_contexts))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllOracle;

#[async_trait]
impl ValidationOracle for AcceptAllOracle {
    async fn validate(
        &self,
        word_contexts: &BTreeMap<String, String>,
    ) -> Result<BTreeMap<String, bool>, PortError> {
        Ok(word_contexts.keys().map(|word| (word.clone(), true)).collect())
    }
}

/// A `false` verdict for every word.
pub fn reject_all(word_contexts: &BTreeMap<String, String>) -> BTreeMap<String, bool> {
    word_contexts
        .keys()
        .map(|word| (word.clone(), false))
        .collect()
}

/// Runs a port call under a deadline, folding the elapsed case into
/// [`PortError::Timeout`].
pub async fn with_timeout<T, F>(limit: Duration, call: F) -> Result<T, PortError>
where
    F: Future<Output = Result<T, PortError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(PortError::Timeout(limit)),
    }
}
