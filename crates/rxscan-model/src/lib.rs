#![deny(unsafe_code)]

pub mod matching;
pub mod record;

pub use matching::{Candidate, MatchKind, MatchResult};
pub use record::{ActiveIngredient, CatalogEntry, DrugRecord, EntrySource};

/// Normalizes a term into the key shared by the name index and the
/// per-scan seen registry: surrounding whitespace removed, uppercased.
pub fn normalize_key(term: &str) -> String {
    term.trim().to_uppercase()
}
