//! The catalog index.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use regex::Regex;
use rxscan_model::{CatalogEntry, DrugRecord, EntrySource, normalize_key};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::DictionaryError;
use crate::record::parse_record;

/// Digits, optionally separated by dashes (`00071-0155`).
static PRODUCT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[-\d]*$").expect("Invalid product code regex"));

/// True when an identifier has the shape of a product code rather than a name.
pub fn looks_like_product_code(identifier: &str) -> bool {
    PRODUCT_CODE_REGEX.is_match(identifier)
}

/// Immutable name and product-code index over a catalog dataset.
///
/// Brand name, generic name and every active-ingredient name of each
/// product are indexed under their normalized key; product codes are
/// indexed verbatim. Later records overwrite earlier ones on key
/// collisions. The index is never mutated after [`DictionaryIndex::build`]
/// returns, so it can be shared freely across concurrent scans.
#[derive(Debug, Default)]
pub struct DictionaryIndex {
    names: HashMap<String, CatalogEntry>,
    codes: HashMap<String, Arc<DrugRecord>>,
    record_count: usize,
}

impl DictionaryIndex {
    /// Reads and indexes a dataset file.
    pub fn load(path: &Path) -> Result<Self, DictionaryError> {
        info!(path = %path.display(), "building drug dictionary");
        let contents = std::fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document: Value =
            serde_json::from_str(&contents).map_err(|source| DictionaryError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Self::build(&document)
    }

    /// Indexes a parsed dataset: an object with a `results` array, or a bare array.
    pub fn build(document: &Value) -> Result<Self, DictionaryError> {
        let results = match document {
            Value::Array(items) => items,
            Value::Object(object) => object
                .get("results")
                .and_then(Value::as_array)
                .ok_or(DictionaryError::MissingResults)?,
            _ => return Err(DictionaryError::MissingResults),
        };
        let index = Self::from_records(results.iter().enumerate().filter_map(|(position, value)| {
            let record = parse_record(value);
            if record.is_none() {
                warn!(position, "skipping dataset entry that is not an object");
            }
            record
        }));
        info!(
            records = index.record_count,
            names = index.names.len(),
            codes = index.codes.len(),
            "loaded drug/ingredient entries"
        );
        Ok(index)
    }

    /// Indexes already-parsed records in order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = DrugRecord>,
    {
        let mut index = Self::default();
        for record in records {
            index.insert(Arc::new(record));
        }
        index
    }

    fn insert(&mut self, record: Arc<DrugRecord>) {
        self.record_count += 1;
        self.insert_name(&record.brand_name, &record, EntrySource::Brand);
        self.insert_name(&record.generic_name, &record, EntrySource::Generic);
        for name in record.ingredient_names() {
            self.insert_name(name, &record, EntrySource::Ingredient);
        }
        if !record.product_code.is_empty() {
            self.codes
                .insert(record.product_code.clone(), Arc::clone(&record));
        }
    }

    fn insert_name(&mut self, name: &str, record: &Arc<DrugRecord>, source: EntrySource) {
        let key = normalize_key(name);
        if key.is_empty() {
            return;
        }
        let entry = CatalogEntry::new(Arc::clone(record), source);
        if let Some(previous) = self.names.insert(key, entry) {
            debug!(
                name,
                replaced = previous.record.display_name(),
                "name key collision, keeping later record"
            );
        }
    }

    /// Looks up a name after normalizing it.
    pub fn lookup_by_name(&self, term: &str) -> Option<&CatalogEntry> {
        self.names.get(&normalize_key(term))
    }

    /// Looks up an already-normalized key without re-normalizing.
    pub fn lookup_key(&self, key: &str) -> Option<&CatalogEntry> {
        self.names.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.names.contains_key(key)
    }

    /// Looks up a product code verbatim.
    pub fn lookup_by_code(&self, code: &str) -> Option<&Arc<DrugRecord>> {
        self.codes.get(code)
    }

    /// Resolves an external identifier: product-code shaped identifiers go
    /// to the code index, everything else to the name index.
    pub fn lookup_by_id(&self, identifier: &str) -> Option<CatalogEntry> {
        if looks_like_product_code(identifier) {
            self.lookup_by_code(identifier)
                .map(|record| CatalogEntry::new(Arc::clone(record), EntrySource::ProductCode))
        } else {
            self.lookup_by_name(identifier).cloned()
        }
    }

    /// Normalized name keys, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.codes.is_empty()
    }
}
