#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rxscan_dictionary::DictionaryIndex;
use rxscan_model::{ActiveIngredient, DrugRecord, normalize_key};
use rxscan_resolve::{PortError, SimilarityHit, SimilaritySearch};

pub fn record(brand: &str, generic: &str, code: &str, ingredients: &[&str]) -> DrugRecord {
    DrugRecord {
        brand_name: brand.to_string(),
        generic_name: generic.to_string(),
        product_code: code.to_string(),
        active_ingredients: ingredients
            .iter()
            .map(|name| ActiveIngredient {
                name: (*name).to_string(),
                strength: None,
            })
            .collect(),
        ..DrugRecord::default()
    }
}

pub fn catalog() -> Arc<DictionaryIndex> {
    Arc::new(DictionaryIndex::from_records([
        record("Advil", "Ibuprofen", "0573-0164", &["IBUPROFEN"]),
        record(
            "Lipitor",
            "Atorvastatin Calcium",
            "00071-0155",
            &["ATORVASTATIN CALCIUM TRIHYDRATE"],
        ),
        record("Zestril", "Lisinopril", "0310-0130", &["LISINOPRIL"]),
        record("Coumadin", "Warfarin Sodium", "0056-0169", &["WARFARIN SODIUM"]),
    ]))
}

/// Similarity backend answering from a script keyed by normalized query
/// text, recording every query it receives. Successive queries for the same
/// text walk through its scripted answers; the last one repeats.
#[derive(Default)]
pub struct ScriptedSearch {
    answers: Mutex<HashMap<String, VecDeque<SimilarityHit>>>,
    delay: Option<Duration>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl ScriptedSearch {
    pub fn answer(mut self, query: &str, identifier: &str, distance: f32) -> Self {
        self.answers
            .get_mut()
            .unwrap()
            .entry(normalize_key(query))
            .or_default()
            .push_back(SimilarityHit::new(identifier, distance));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SimilaritySearch for ScriptedSearch {
    async fn query(&self, text: &str, top_k: usize) -> Result<Vec<SimilarityHit>, PortError> {
        self.calls.lock().unwrap().push(text.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(PortError::Unavailable("index offline".to_string()));
        }
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let mut answers = self.answers.lock().unwrap();
        let Some(script) = answers.get_mut(&normalize_key(text)) else {
            return Ok(Vec::new());
        };
        let hit = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        Ok(hit.into_iter().collect())
    }
}
