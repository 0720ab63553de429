//! Integration tests for service setup.

use std::fs;
use std::path::{Path, PathBuf};

use insta::assert_json_snapshot;
use rxscan_cli::setup::{
    OracleChoice, ServiceOptions, SimilarityChoice, build_service, load_config, load_filter,
    read_document,
};
use rxscan_model::MatchKind;
use serde_json::{Value, json};

fn unique_temp_dir(name: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "rxscan-cli-{}-{}-{}",
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

fn write_dataset(dir: &Path) -> PathBuf {
    let path = dir.join("drug-ndc.json");
    let dataset = json!({
        "results": [
            {
                "product_ndc": "0573-0164",
                "brand_name": "Advil",
                "generic_name": "Ibuprofen",
                "active_ingredients": [{"name": "IBUPROFEN", "strength": "200 mg/1"}]
            },
            {
                "product_ndc": "00071-0155",
                "brand_name": "Lipitor",
                "generic_name": "Atorvastatin Calcium",
                "active_ingredients": [{"name": "ATORVASTATIN CALCIUM TRIHYDRATE", "strength": "10 mg/1"}]
            }
        ]
    });
    fs::write(&path, serde_json::to_vec(&dataset).unwrap()).unwrap();
    path
}

#[tokio::test]
async fn built_service_scans_documents() {
    let dir = unique_temp_dir("scan");
    let options = ServiceOptions {
        dataset: write_dataset(&dir),
        ..ServiceOptions::default()
    };
    let service = build_service(&options).expect("build service");

    let results = service
        .extract("Medications: Advil, Lipitor 10 mg.\nDr. Smith, MD")
        .await;
    let summary: Vec<Value> = results
        .iter()
        .map(|result| {
            json!({
                "code": result.entry.record.product_code,
                "kind": result.kind.as_str(),
                "name": result.name,
            })
        })
        .collect();
    assert_json_snapshot!(summary, @r###"
    [
      {
        "code": "0573-0164",
        "kind": "exact_full",
        "name": "Advil"
      },
      {
        "code": "00071-0155",
        "kind": "exact_partial",
        "name": "Lipitor"
      }
    ]
    "###);
    assert!(results[1].confidence < 50.0);

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn without_similarity_partials_are_not_confirmed() {
    let dir = unique_temp_dir("nosim");
    let options = ServiceOptions {
        dataset: write_dataset(&dir),
        similarity: SimilarityChoice::None,
        oracle: OracleChoice::AcceptAll,
        ..ServiceOptions::default()
    };
    let service = build_service(&options).unwrap();
    let results = service.extract("Medications: Advil, Lipitor 10 mg.").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, MatchKind::ExactFull);

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn threshold_overrides_apply_after_presets() {
    let dir = unique_temp_dir("config");
    let config_path = dir.join("rxscan.toml");
    fs::write(&config_path, "query_top_k = 8\n[thresholds]\npartial = 40.0\n").unwrap();

    let options = ServiceOptions {
        config: Some(config_path),
        lenient: true,
        approximate_threshold: Some(70.0),
        ..ServiceOptions::default()
    };
    let config = load_config(&options).unwrap();
    assert_eq!(config.query_top_k, 8);
    assert_eq!(config.thresholds.partial, 86.0);
    assert_eq!(config.thresholds.approximate, 70.0);

    let invalid = ServiceOptions {
        partial_threshold: Some(-5.0),
        ..ServiceOptions::default()
    };
    assert!(load_config(&invalid).is_err());

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_inputs_report_their_path() {
    let dir = unique_temp_dir("missing");
    let options = ServiceOptions {
        dataset: dir.join("absent.json"),
        ..ServiceOptions::default()
    };
    let error = build_service(&options).unwrap_err();
    assert!(format!("{error:#}").contains("absent.json"));

    let error = read_document(&dir.join("note.txt")).unwrap_err();
    assert!(error.to_string().contains("note.txt"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn custom_lexicon_replaces_builtin_words() {
    let dir = unique_temp_dir("lexicon");
    let path = dir.join("lexicon.toml");
    fs::write(
        &path,
        "[[category]]\nname = \"sponsors\"\nwords = [\"Acme\"]\n",
    )
    .unwrap();

    let filter = load_filter(Some(&path), &[]).unwrap();
    assert_eq!(filter.exclusion_reason("ACME"), Some("category:sponsors"));
    assert!(!filter.should_exclude("Pfizer"));
    assert!(load_filter(Some(&dir.join("absent.toml")), &[]).is_err());

    fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn exclude_words_extend_the_lexicon() {
    let words = vec!["Lipitor".to_string()];
    let filter = load_filter(None, &words).unwrap();
    assert_eq!(
        filter.exclusion_reason("LIPITOR"),
        Some("category:command_line")
    );
    assert_eq!(filter.exclusion_reason("pfizer"), Some("category:companies"));

    let dir = unique_temp_dir("exclude");
    let options = ServiceOptions {
        dataset: write_dataset(&dir),
        exclude_words: words,
        ..ServiceOptions::default()
    };
    let service = build_service(&options).unwrap();
    let results = service.extract("Medications: Advil, Lipitor.").await;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "Advil");

    fs::remove_dir_all(&dir).ok();
}
