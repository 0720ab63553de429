//! The scan surface shared by every caller.

use std::sync::Arc;

use rxscan_dictionary::DictionaryIndex;
use rxscan_filter::CandidateFilter;
use rxscan_model::{Candidate, CatalogEntry, MatchResult};
use tracing::{Instrument, info_span, warn};

use crate::config::ScanConfig;
use crate::extract::{self, CandidateSource, PhraseExtractor};
use crate::gate::AmbiguityGate;
use crate::ports::{
    NoopSearch, RejectAllOracle, SimilarityHit, SimilaritySearch, ValidationOracle, with_timeout,
};
use crate::resolver::MatchResolver;

/// Extraction, lookup and similarity queries over one shared catalog.
///
/// Immutable once built; every scan owns its own seen registry, so a single
/// service can serve concurrent scans.
#[derive(Clone)]
pub struct ScanService {
    index: Arc<DictionaryIndex>,
    source: Arc<dyn CandidateSource>,
    gate: AmbiguityGate,
    resolver: MatchResolver,
    search: Arc<dyn SimilaritySearch>,
    config: ScanConfig,
}

pub struct ScanServiceBuilder {
    index: Arc<DictionaryIndex>,
    config: ScanConfig,
    filter: Option<Arc<CandidateFilter>>,
    source: Option<Arc<dyn CandidateSource>>,
    search: Option<Arc<dyn SimilaritySearch>>,
    oracle: Option<Arc<dyn ValidationOracle>>,
}

impl ScanServiceBuilder {
    #[must_use]
    pub fn config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Filter used by the default extractor. Ignored when a custom
    /// candidate source is set.
    #[must_use]
    pub fn filter(mut self, filter: Arc<CandidateFilter>) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn candidate_source(mut self, source: Arc<dyn CandidateSource>) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn similarity(mut self, search: Arc<dyn SimilaritySearch>) -> Self {
        self.search = Some(search);
        self
    }

    #[must_use]
    pub fn oracle(mut self, oracle: Arc<dyn ValidationOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Unset collaborators default to the phrase extractor, a search that
    /// never matches, and an oracle that rejects every ambiguous word.
    pub fn build(self) -> ScanService {
        let config = self.config;
        let source = self.source.unwrap_or_else(|| {
            let filter = self.filter.unwrap_or_default();
            Arc::new(PhraseExtractor::new(filter, config.max_phrase_words))
        });
        let search = self.search.unwrap_or_else(|| Arc::new(NoopSearch));
        let oracle = self.oracle.unwrap_or_else(|| Arc::new(RejectAllOracle));
        ScanService {
            gate: AmbiguityGate::new(oracle, config.oracle_timeout()),
            resolver: MatchResolver::new(
                Arc::clone(&self.index),
                Arc::clone(&search),
                config.thresholds,
                config.similarity_timeout(),
            ),
            index: self.index,
            source,
            search,
            config,
        }
    }
}

impl ScanService {
    pub fn builder(index: Arc<DictionaryIndex>) -> ScanServiceBuilder {
        ScanServiceBuilder {
            index,
            config: ScanConfig::default(),
            filter: None,
            source: None,
            search: None,
            oracle: None,
        }
    }

    pub fn index(&self) -> &DictionaryIndex {
        &self.index
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Finds catalog entities mentioned in `text`, in document order.
    pub async fn extract(&self, text: &str) -> Vec<MatchResult> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let span = info_span!("extract", chars = text.len());
        async {
            let candidates = self.source.candidates(text);
            let candidates = self.gate.retain_validated(&self.index, candidates).await;
            self.resolver.resolve(&candidates).await
        }
        .instrument(span)
        .await
    }

    /// Resolves caller-supplied candidates, bypassing extraction and the
    /// ambiguity gate.
    pub async fn resolve_candidates(&self, candidates: &[Candidate]) -> Vec<MatchResult> {
        self.resolver.resolve(candidates).await
    }

    pub fn lookup_by_id(&self, identifier: &str) -> Option<CatalogEntry> {
        self.index.lookup_by_id(identifier)
    }

    /// Nearest catalog identifiers for `term`. Backend failures yield an
    /// empty list.
    pub async fn query_similar(&self, term: &str, top_k: usize) -> Vec<SimilarityHit> {
        if term.trim().is_empty() || top_k == 0 {
            return Vec::new();
        }
        match with_timeout(self.config.similarity_timeout(), self.search.query(term, top_k)).await
        {
            Ok(mut hits) => {
                hits.truncate(top_k);
                hits
            }
            Err(error) => {
                warn!(term, %error, "similarity query failed");
                Vec::new()
            }
        }
    }

    /// Trimmed lines of `text` containing `query` verbatim.
    pub fn find_lines(text: &str, query: &str) -> Vec<String> {
        extract::find_lines(text, query)
    }
}

impl std::fmt::Debug for ScanService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanService")
            .field("resolver", &self.resolver)
            .field("gate", &self.gate)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
