//! Builds a [`ScanService`] from command-line choices.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rxscan_dictionary::DictionaryIndex;
use rxscan_filter::{CandidateFilter, Lexicon};
use rxscan_resolve::{
    AcceptAllOracle, FuzzyCatalogSearch, MatchThresholds, NoopSearch, RejectAllOracle,
    ScanConfig, ScanService, SimilaritySearch, ValidationOracle,
};
use tracing::info;

const COMMAND_LINE_CATEGORY: &str = "command_line";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OracleChoice {
    #[default]
    RejectAll,
    AcceptAll,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SimilarityChoice {
    /// Edit distance over catalog names, in process.
    #[default]
    Fuzzy,
    None,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceOptions {
    pub dataset: PathBuf,
    pub lexicon: Option<PathBuf>,
    /// Extra words excluded on top of the lexicon.
    pub exclude_words: Vec<String>,
    pub config: Option<PathBuf>,
    pub lenient: bool,
    pub partial_threshold: Option<f32>,
    pub approximate_threshold: Option<f32>,
    pub max_distance: Option<f32>,
    pub oracle: OracleChoice,
    pub similarity: SimilarityChoice,
}

/// Config file (or defaults), then the lenient preset, then explicit
/// threshold overrides.
pub fn load_config(options: &ServiceOptions) -> Result<ScanConfig> {
    let mut config = match &options.config {
        Some(path) => ScanConfig::load(path)
            .with_context(|| format!("load scan config {}", path.display()))?,
        None => ScanConfig::default(),
    };
    if options.lenient {
        config.thresholds = MatchThresholds::lenient();
    }
    if let Some(partial) = options.partial_threshold {
        config.thresholds.partial = partial;
    }
    if let Some(approximate) = options.approximate_threshold {
        config.thresholds.approximate = approximate;
    }
    config.validate().context("validate scan config")?;
    Ok(config)
}

/// Extra words land in a case-insensitive `command_line` category.
pub fn load_filter(lexicon: Option<&Path>, exclude_words: &[String]) -> Result<CandidateFilter> {
    if lexicon.is_none() && exclude_words.is_empty() {
        return Ok(CandidateFilter::default());
    }
    let mut lexicon = match lexicon {
        Some(path) => Lexicon::load(path)
            .with_context(|| format!("load lexicon {}", path.display()))?,
        None => Lexicon::builtin().clone(),
    };
    if !exclude_words.is_empty() {
        lexicon.extend_category(COMMAND_LINE_CATEGORY, exclude_words.iter().cloned());
    }
    Ok(CandidateFilter::new(&lexicon))
}

pub fn load_index(dataset: &Path) -> Result<Arc<DictionaryIndex>> {
    let index = DictionaryIndex::load(dataset)
        .with_context(|| format!("build drug dictionary from {}", dataset.display()))?;
    Ok(Arc::new(index))
}

pub fn build_service(options: &ServiceOptions) -> Result<ScanService> {
    let config = load_config(options)?;
    let filter = load_filter(options.lexicon.as_deref(), &options.exclude_words)?;
    let index = load_index(&options.dataset)?;

    let search: Arc<dyn SimilaritySearch> = match options.similarity {
        SimilarityChoice::Fuzzy => {
            let mut search = FuzzyCatalogSearch::new(Arc::clone(&index));
            if let Some(max_distance) = options.max_distance {
                search = search.with_max_distance(max_distance);
            }
            Arc::new(search)
        }
        SimilarityChoice::None => Arc::new(NoopSearch),
    };
    let oracle: Arc<dyn ValidationOracle> = match options.oracle {
        OracleChoice::RejectAll => Arc::new(RejectAllOracle),
        OracleChoice::AcceptAll => Arc::new(AcceptAllOracle),
    };
    info!(
        names = index.name_count(),
        codes = index.code_count(),
        partial = config.thresholds.partial,
        approximate = config.thresholds.approximate,
        "scan service ready"
    );

    Ok(ScanService::builder(index)
        .config(config)
        .filter(Arc::new(filter))
        .similarity(search)
        .oracle(oracle)
        .build())
}

/// Reads a UTF-8 document; `-` reads standard input.
pub fn read_document(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read document {}", path.display()))
}
