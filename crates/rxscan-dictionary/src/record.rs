//! Lenient conversion of dataset JSON objects into [`DrugRecord`]s.
//!
//! The dataset follows the openFDA drug NDC layout. Fields are read one by
//! one so that a missing or mistyped field only blanks that field instead
//! of discarding the product.

use rxscan_model::{ActiveIngredient, DrugRecord};
use serde_json::{Map, Value};

/// Returns `None` when the value is not a JSON object.
pub fn parse_record(value: &Value) -> Option<DrugRecord> {
    let object = value.as_object()?;
    Some(DrugRecord {
        brand_name: text(object, "brand_name"),
        brand_name_base: text(object, "brand_name_base"),
        generic_name: text(object, "generic_name"),
        product_code: text(object, "product_ndc"),
        labeler_name: text(object, "labeler_name"),
        active_ingredients: ingredients(object),
        dosage_form: text(object, "dosage_form"),
        product_type: text(object, "product_type"),
        raw: value.clone(),
    })
}

fn text(object: &Map<String, Value>, key: &str) -> String {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default()
        .to_string()
}

fn ingredients(object: &Map<String, Value>) -> Vec<ActiveIngredient> {
    let Some(items) = object.get("active_ingredients").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|item| {
            let strength = text(item, "strength");
            ActiveIngredient {
                name: text(item, "name"),
                strength: (!strength.is_empty()).then_some(strength),
            }
        })
        .collect()
}
