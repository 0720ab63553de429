//! In-process similarity backend over the catalog's name keys.

use std::sync::Arc;

use async_trait::async_trait;
use rapidfuzz::distance::levenshtein;
use rxscan_dictionary::DictionaryIndex;
use rxscan_model::normalize_key;

use crate::error::PortError;
use crate::ports::{SimilarityHit, SimilaritySearch};

/// Ranks every catalog name by normalized edit distance to the query,
/// scaled to `0..=100`. Identifiers are normalized name keys, so every hit
/// resolves through [`DictionaryIndex::lookup_by_id`].
#[derive(Debug, Clone)]
pub struct FuzzyCatalogSearch {
    index: Arc<DictionaryIndex>,
    max_distance: f32,
}

impl FuzzyCatalogSearch {
    pub fn new(index: Arc<DictionaryIndex>) -> Self {
        Self {
            index,
            max_distance: 100.0,
        }
    }

    /// Drops hits farther than `max_distance`.
    #[must_use]
    pub fn with_max_distance(mut self, max_distance: f32) -> Self {
        self.max_distance = max_distance;
        self
    }

    pub fn rank(&self, text: &str, top_k: usize) -> Vec<SimilarityHit> {
        let query = normalize_key(text);
        if query.is_empty() || top_k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(f32, &str)> = self
            .index
            .names()
            .map(|name| (distance(&query, name), name))
            .filter(|(distance, _)| *distance <= self.max_distance)
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(top_k)
            .map(|(distance, name)| SimilarityHit::new(name, distance))
            .collect()
    }
}

fn distance(query: &str, name: &str) -> f32 {
    (levenshtein::normalized_distance(query.chars(), name.chars()) * 100.0) as f32
}

#[async_trait]
impl SimilaritySearch for FuzzyCatalogSearch {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SimilarityHit>, PortError> {
        Ok(self.rank(text, top_k))
    }
}
