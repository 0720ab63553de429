use std::fs;
use std::path::PathBuf;

use rxscan_dictionary::{DictionaryError, DictionaryIndex};
use rxscan_model::EntrySource;
use serde_json::json;

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "rxscan-dictionary-{}-{}-{}",
        name,
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_dataset() -> serde_json::Value {
    json!({
        "meta": {"results": {"total": 4}},
        "results": [
            {
                "product_ndc": "0573-0164",
                "brand_name": "Advil",
                "generic_name": "Ibuprofen",
                "labeler_name": "Haleon US Holdings LLC",
                "active_ingredients": [{"name": "IBUPROFEN", "strength": "200 mg/1"}],
                "dosage_form": "TABLET, COATED",
                "product_type": "HUMAN OTC DRUG"
            },
            "not a record",
            {
                "product_ndc": "00071-0155",
                "brand_name": "Lipitor",
                "generic_name": "atorvastatin calcium",
                "active_ingredients": [{"name": "ATORVASTATIN CALCIUM TRIHYDRATE", "strength": "10 mg/1"}]
            },
            {
                "generic_name": "Acetaminophen",
                "active_ingredients": null
            }
        ]
    })
}

#[test]
fn builds_from_openfda_document_and_skips_malformed_entries() {
    let index = DictionaryIndex::build(&sample_dataset()).expect("build index");

    assert_eq!(index.record_count(), 3);
    assert_eq!(index.code_count(), 2);
    assert!(index.lookup_by_name("advil").is_some());
    assert!(index.lookup_by_name("Acetaminophen").is_some());
    assert_eq!(
        index.lookup_by_name("ATORVASTATIN CALCIUM TRIHYDRATE").unwrap().source,
        EntrySource::Ingredient
    );
}

#[test]
fn product_code_identifier_resolves_through_code_index() {
    let index = DictionaryIndex::build(&sample_dataset()).unwrap();

    let entry = index.lookup_by_id("00071-0155").expect("code present");
    assert_eq!(entry.record.brand_name, "Lipitor");
    assert!(index.lookup_by_id("00071-0156").is_none());

    let entry = index.lookup_by_id("IBUPROFEN").expect("name present");
    assert_eq!(entry.record.product_code, "0573-0164");
}

#[test]
fn bare_array_datasets_are_accepted() {
    let index = DictionaryIndex::build(&json!([
        {"brand_name": "Zestril", "generic_name": "Lisinopril"}
    ]))
    .unwrap();
    assert!(index.lookup_by_name("LISINOPRIL").is_some());
}

#[test]
fn documents_without_results_fail() {
    let err = DictionaryIndex::build(&json!({"meta": {}})).unwrap_err();
    assert!(matches!(err, DictionaryError::MissingResults));
    let err = DictionaryIndex::build(&json!("results")).unwrap_err();
    assert!(matches!(err, DictionaryError::MissingResults));
}

#[test]
fn load_reads_dataset_file() {
    let dir = unique_temp_dir("load");
    let path = dir.join("drug-ndc.json");
    fs::write(&path, serde_json::to_vec(&sample_dataset()).unwrap()).unwrap();

    let index = DictionaryIndex::load(&path).expect("load dataset");
    assert_eq!(index.record_count(), 3);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn load_reports_missing_and_invalid_files() {
    let dir = unique_temp_dir("errors");

    let err = DictionaryIndex::load(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, DictionaryError::Io { .. }));

    let broken = dir.join("broken.json");
    fs::write(&broken, b"{\"results\": [").unwrap();
    let err = DictionaryIndex::load(&broken).unwrap_err();
    assert!(matches!(err, DictionaryError::Json { .. }));
    assert!(err.to_string().contains("broken.json"));

    fs::remove_dir_all(&dir).ok();
}
