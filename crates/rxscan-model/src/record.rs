//! Catalog records.
//!
//! A [`DrugRecord`] is one product from the source dataset. The name index
//! stores it several times (brand, generic and each active ingredient), so
//! records are shared behind an `Arc` and each index slot is a
//! [`CatalogEntry`] that remembers which identifier produced it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// One active ingredient of a product, in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveIngredient {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
}

/// A product from the catalog dataset. Immutable once built.
///
/// Fields that are absent from the source are empty strings; the raw
/// source object is kept in `raw` for callers that need fields the index
/// does not model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugRecord {
    pub brand_name: String,
    pub brand_name_base: String,
    pub generic_name: String,
    /// Product code (NDC), kept verbatim.
    pub product_code: String,
    pub labeler_name: String,
    pub active_ingredients: Vec<ActiveIngredient>,
    pub dosage_form: String,
    pub product_type: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub raw: serde_json::Value,
}

impl DrugRecord {
    /// Human-readable label: brand name, falling back to the generic name.
    pub fn display_name(&self) -> &str {
        if self.brand_name.is_empty() {
            &self.generic_name
        } else {
            &self.brand_name
        }
    }

    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.active_ingredients
            .iter()
            .map(|ingredient| ingredient.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Which of a record's identifiers produced an index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Brand,
    Generic,
    Ingredient,
    ProductCode,
}

/// An index slot: the shared record plus the identifier kind that keyed it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub record: Arc<DrugRecord>,
    pub source: EntrySource,
}

impl CatalogEntry {
    pub fn new(record: Arc<DrugRecord>, source: EntrySource) -> Self {
        Self { record, source }
    }

    /// True when the entry was keyed by an active-ingredient name.
    pub fn is_ingredient(&self) -> bool {
        self.source == EntrySource::Ingredient
    }
}
