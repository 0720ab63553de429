//! Candidate terms and the results emitted for them.

use serde::{Deserialize, Serialize};

use crate::record::CatalogEntry;

/// A term proposed for resolution, with the sentence it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Candidate {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            context: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// True when the term holds more than one whitespace-separated token.
    pub fn is_multi_word(&self) -> bool {
        self.term.split_whitespace().nth(1).is_some()
    }
}

/// How a candidate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The whole term is a catalog key.
    ExactFull,
    /// One sub-token is a catalog key, confirmed by similarity of the whole term.
    ExactPartial,
    /// No lexical hit; accepted from nearest-neighbor search.
    Approximate,
}

impl MatchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactFull => "exact_full",
            Self::ExactPartial => "exact_partial",
            Self::Approximate => "approximate",
        }
    }
}

/// A resolved candidate.
///
/// `confidence` is `1.0` for exact matches and the similarity distance
/// (lower is closer) for partial and approximate matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub name: String,
    pub kind: MatchKind,
    pub confidence: f32,
    pub entry: CatalogEntry,
}
