//! Layered resolution of candidates against the catalog.
//!
//! Each candidate goes through, in order:
//!
//! 1. **Exact full**: the whole normalized term is a catalog key.
//! 2. **Exact partial**: sub-tokens are scanned in order; each one that is
//!    a catalog key triggers a similarity query for the whole term, and the
//!    first one whose answer is within the partial threshold is emitted. A
//!    rejected sub-token does not end the scan, but one that was already
//!    decided in this scan ends the candidate.
//! 3. **Approximate**: the nearest neighbor of the whole term, when within
//!    the approximate threshold and resolvable back to a catalog entry.
//!
//! Every decided key is marked seen, matched or not, so each normalized
//! term is decided at most once per scan.

use std::sync::Arc;
use std::time::Duration;

use rxscan_dictionary::DictionaryIndex;
use rxscan_model::{Candidate, MatchKind, MatchResult, normalize_key};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::config::MatchThresholds;
use crate::ports::{SimilarityHit, SimilaritySearch, with_timeout};
use crate::seen::SeenRegistry;

#[derive(Clone)]
pub struct MatchResolver {
    index: Arc<DictionaryIndex>,
    search: Arc<dyn SimilaritySearch>,
    thresholds: MatchThresholds,
    similarity_timeout: Duration,
}

impl MatchResolver {
    pub fn new(
        index: Arc<DictionaryIndex>,
        search: Arc<dyn SimilaritySearch>,
        thresholds: MatchThresholds,
        similarity_timeout: Duration,
    ) -> Self {
        Self {
            index,
            search,
            thresholds,
            similarity_timeout,
        }
    }

    pub fn thresholds(&self) -> MatchThresholds {
        self.thresholds
    }

    /// Resolves candidates with a fresh seen registry.
    pub async fn resolve(&self, candidates: &[Candidate]) -> Vec<MatchResult> {
        let mut seen = SeenRegistry::new();
        self.resolve_with(candidates, &mut seen).await
    }

    /// Resolves candidates against an existing registry, for callers that
    /// feed one scan in several batches.
    pub async fn resolve_with(
        &self,
        candidates: &[Candidate],
        seen: &mut SeenRegistry,
    ) -> Vec<MatchResult> {
        let span = info_span!("resolve", candidates = candidates.len());
        async {
            let mut results = Vec::new();
            for candidate in candidates {
                if let Some(result) = self.resolve_candidate(candidate, seen).await {
                    debug!(
                        term = %candidate.term,
                        name = %result.name,
                        kind = result.kind.as_str(),
                        confidence = result.confidence,
                        "matched candidate"
                    );
                    results.push(result);
                }
            }
            info!(
                matched = results.len(),
                decided = seen.len(),
                "resolution complete"
            );
            results
        }
        .instrument(span)
        .await
    }

    async fn resolve_candidate(
        &self,
        candidate: &Candidate,
        seen: &mut SeenRegistry,
    ) -> Option<MatchResult> {
        let term = candidate.term.trim();
        let key = normalize_key(term);
        if key.is_empty() || seen.contains(&key) {
            return None;
        }

        if let Some(entry) = self.index.lookup_key(&key) {
            seen.mark(key);
            return Some(MatchResult {
                name: term.to_string(),
                kind: MatchKind::ExactFull,
                confidence: 1.0,
                entry: entry.clone(),
            });
        }

        for token in term.split_whitespace() {
            let token_key = normalize_key(token);
            if seen.contains(&token_key) {
                debug!(term, token, "sub-token already decided, skipping candidate");
                seen.mark(key);
                return None;
            }
            let Some(entry) = self.index.lookup_key(&token_key) else {
                continue;
            };
            match self.nearest(term).await {
                Some(hit) if hit.distance <= self.thresholds.partial => {
                    seen.mark(key);
                    return Some(MatchResult {
                        name: token.to_string(),
                        kind: MatchKind::ExactPartial,
                        confidence: hit.distance,
                        entry: entry.clone(),
                    });
                }
                Some(hit) => debug!(
                    term,
                    token,
                    distance = hit.distance,
                    "partial match rejected by distance"
                ),
                None => debug!(term, token, "partial match has no similarity score"),
            }
        }

        let nearest = self.nearest(term).await;
        seen.mark(key);
        let hit = nearest?;
        if hit.distance > self.thresholds.approximate || hit.distance.is_nan() {
            debug!(
                term,
                identifier = %hit.identifier,
                distance = hit.distance,
                "nearest neighbor too distant"
            );
            return None;
        }
        let Some(entry) = self.index.lookup_by_id(&hit.identifier) else {
            debug!(term, identifier = %hit.identifier, "nearest neighbor not in catalog");
            return None;
        };
        Some(MatchResult {
            name: term.to_string(),
            kind: MatchKind::Approximate,
            confidence: hit.distance,
            entry,
        })
    }

    async fn nearest(&self, term: &str) -> Option<SimilarityHit> {
        match with_timeout(self.similarity_timeout, self.search.query(term, 1)).await {
            Ok(hits) => hits.into_iter().next(),
            Err(error) => {
                warn!(term, %error, "similarity search failed, treating as no match");
                None
            }
        }
    }
}

impl std::fmt::Debug for MatchResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchResolver")
            .field("names", &self.index.name_count())
            .field("thresholds", &self.thresholds)
            .field("similarity_timeout", &self.similarity_timeout)
            .finish()
    }
}
