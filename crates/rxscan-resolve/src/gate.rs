//! Oracle screening of ambiguous single-word candidates.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use rxscan_dictionary::DictionaryIndex;
use rxscan_model::{Candidate, normalize_key};
use tracing::{debug, info, warn};

use crate::ports::{ValidationOracle, reject_all, with_timeout};

/// Sends single-word candidates that are not exact catalog keys to the
/// validation oracle in one batch and drops the ones it rejects.
///
/// Multi-word candidates and exact catalog keys pass untouched. An oracle
/// failure or timeout rejects the whole batch, and a word missing from the
/// oracle's answer counts as rejected.
#[derive(Clone)]
pub struct AmbiguityGate {
    oracle: Arc<dyn ValidationOracle>,
    timeout: Duration,
}

impl AmbiguityGate {
    pub fn new(oracle: Arc<dyn ValidationOracle>, timeout: Duration) -> Self {
        Self { oracle, timeout }
    }

    fn is_ambiguous(index: &DictionaryIndex, candidate: &Candidate) -> bool {
        !candidate.is_multi_word() && !index.contains_key(&normalize_key(&candidate.term))
    }

    /// Keeps input order.
    pub async fn retain_validated(
        &self,
        index: &DictionaryIndex,
        candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        let mut word_contexts = BTreeMap::new();
        for candidate in &candidates {
            if Self::is_ambiguous(index, candidate) {
                word_contexts
                    .entry(candidate.term.trim().to_string())
                    .or_insert_with(|| candidate.context.clone().unwrap_or_default());
            }
        }
        if word_contexts.is_empty() {
            return candidates;
        }

        let verdicts = match with_timeout(self.timeout, self.oracle.validate(&word_contexts)).await
        {
            Ok(verdicts) => verdicts,
            Err(error) => {
                warn!(words = word_contexts.len(), %error, "validation oracle failed, rejecting batch");
                reject_all(&word_contexts)
            }
        };
        let accepted: HashSet<&str> = word_contexts
            .keys()
            .filter(|word| verdicts.get(word.as_str()).copied().unwrap_or(false))
            .map(String::as_str)
            .collect();
        info!(
            ambiguous = word_contexts.len(),
            accepted = accepted.len(),
            "screened ambiguous words"
        );

        candidates
            .into_iter()
            .filter(|candidate| {
                let keep = !Self::is_ambiguous(index, candidate)
                    || accepted.contains(candidate.term.trim());
                if !keep {
                    debug!(term = %candidate.term, "rejected by validation oracle");
                }
                keep
            })
            .collect()
    }
}

impl std::fmt::Debug for AmbiguityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbiguityGate")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rxscan_model::DrugRecord;

    use super::*;
    use crate::error::PortError;
    use crate::ports::{AcceptAllOracle, RejectAllOracle};

    /// Accepts a fixed word list and records every batch it receives.
    struct ListOracle {
        accept: Vec<&'static str>,
        batches: Mutex<Vec<BTreeMap<String, String>>>,
    }

    #[async_trait]
    impl ValidationOracle for ListOracle {
        async fn validate(
            &self,
            word_contexts: &BTreeMap<String, String>,
        ) -> Result<BTreeMap<String, bool>, PortError> {
            self.batches.lock().unwrap().push(word_contexts.clone());
            // Deliberately answers only for accepted words.
            Ok(self
                .accept
                .iter()
                .filter(|word| word_contexts.contains_key(**word))
                .map(|word| ((*word).to_string(), true))
                .collect())
        }
    }

    struct BrokenOracle;

    #[async_trait]
    impl ValidationOracle for BrokenOracle {
        async fn validate(
            &self,
            _word_contexts: &BTreeMap<String, String>,
        ) -> Result<BTreeMap<String, bool>, PortError> {
            Err(PortError::Unavailable("connection refused".to_string()))
        }
    }

    struct StalledOracle;

    #[async_trait]
    impl ValidationOracle for StalledOracle {
        async fn validate(
            &self,
            word_contexts: &BTreeMap<String, String>,
        ) -> Result<BTreeMap<String, bool>, PortError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(word_contexts.keys().map(|word| (word.clone(), true)).collect())
        }
    }

    fn index() -> DictionaryIndex {
        DictionaryIndex::from_records([DrugRecord {
            brand_name: "Lipitor".to_string(),
            generic_name: "Atorvastatin".to_string(),
            ..DrugRecord::default()
        }])
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            Candidate::new("Lead").with_context("Lead investigator."),
            Candidate::new("Lipitor").with_context("Takes Lipitor."),
            Candidate::new("Ibuprofen 200mg").with_context("Ibuprofen 200mg twice."),
            Candidate::new("Lithium").with_context("Maintained on lithium."),
            Candidate::new("Lead").with_context("Lead author."),
        ]
    }

    fn terms(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|candidate| candidate.term.as_str()).collect()
    }

    #[tokio::test]
    async fn only_ambiguous_words_reach_the_oracle() {
        let oracle = Arc::new(ListOracle {
            accept: vec!["Lithium"],
            batches: Mutex::new(Vec::new()),
        });
        let gate = AmbiguityGate::new(oracle.clone(), Duration::from_secs(1));
        let kept = gate.retain_validated(&index(), candidates()).await;

        assert_eq!(terms(&kept), vec!["Lipitor", "Ibuprofen 200mg", "Lithium"]);
        let batches = oracle.batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0].keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["Lead", "Lithium"]
        );
        assert_eq!(batches[0]["Lead"], "Lead investigator.");
    }

    #[tokio::test]
    async fn default_oracles_reject_or_keep_everything() {
        let gate = AmbiguityGate::new(Arc::new(RejectAllOracle), Duration::from_secs(1));
        let kept = gate.retain_validated(&index(), candidates()).await;
        assert_eq!(terms(&kept), vec!["Lipitor", "Ibuprofen 200mg"]);

        let gate = AmbiguityGate::new(Arc::new(AcceptAllOracle), Duration::from_secs(1));
        assert_eq!(gate.retain_validated(&index(), candidates()).await.len(), 5);
    }

    #[tokio::test]
    async fn oracle_errors_reject_the_batch() {
        let gate = AmbiguityGate::new(Arc::new(BrokenOracle), Duration::from_secs(1));
        let kept = gate.retain_validated(&index(), candidates()).await;
        assert_eq!(terms(&kept), vec!["Lipitor", "Ibuprofen 200mg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn oracle_timeouts_reject_the_batch() {
        let gate = AmbiguityGate::new(Arc::new(StalledOracle), Duration::from_secs(10));
        let kept = gate.retain_validated(&index(), candidates()).await;
        assert_eq!(terms(&kept), vec!["Lipitor", "Ibuprofen 200mg"]);
    }
}
