#![deny(unsafe_code)]

//! Catalog matching for free text.
//!
//! [`ScanService`] ties together candidate extraction ([`PhraseExtractor`]),
//! oracle screening of ambiguous words ([`AmbiguityGate`]) and layered
//! resolution ([`MatchResolver`]). The similarity backend and the
//! validation oracle are ports ([`SimilaritySearch`], [`ValidationOracle`]);
//! their failures never abort a scan.

pub mod config;
pub mod error;
pub mod extract;
pub mod fuzzy;
pub mod gate;
pub mod ports;
pub mod resolver;
pub mod seen;
pub mod service;

pub use crate::config::{MatchThresholds, ScanConfig};
pub use crate::error::{ConfigError, PortError};
pub use crate::extract::{CandidateSource, PhraseExtractor, find_lines, split_sentences};
pub use crate::fuzzy::FuzzyCatalogSearch;
pub use crate::gate::AmbiguityGate;
pub use crate::ports::{
    AcceptAllOracle, NoopSearch, RejectAllOracle, SimilarityHit, SimilaritySearch,
    ValidationOracle,
};
pub use crate::resolver::MatchResolver;
pub use crate::seen::SeenRegistry;
pub use crate::service::{ScanService, ScanServiceBuilder};
