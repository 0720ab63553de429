//! Candidate term filtering.
//!
//! [`CandidateFilter`] decides whether a raw candidate is worth sending to
//! the resolver. It holds an ordered list of [`ExclusionRule`]s:
//!
//! 1. `blank` - nothing left after cleanup
//! 2. `category:<name>` - one rule per lexicon category, in lexicon order;
//!    one- or two-letter uppercase terms must match a listed word as written
//! 3. `trial_code` - clinical-trial and protocol identifiers
//! 4. `date` - date and year-range shapes
//! 5. `short_token` - one or two characters that are not uppercase letters
//! 6. `mostly_symbols` - more punctuation than letters and digits
//!
//! All rules see the output of [`clean`], never the raw term.

#![deny(unsafe_code)]

pub mod clean;
pub mod error;
pub mod lexicon;
pub mod rules;

use std::fmt;
use std::sync::LazyLock;

pub use crate::clean::clean;
pub use crate::error::FilterError;
pub use crate::lexicon::{Category, Lexicon};
pub use crate::rules::{
    BlankRule, CategoryRule, DateRule, ExclusionRule, MostlySymbolsRule, ShortTokenRule,
    TrialCodeRule,
};

static DEFAULT_FILTER: LazyLock<CandidateFilter> =
    LazyLock::new(|| CandidateFilter::new(Lexicon::builtin()));

/// Checks a term against the filter built from the embedded lexicon.
pub fn should_exclude(term: &str) -> bool {
    DEFAULT_FILTER.should_exclude(term)
}

pub struct CandidateFilter {
    rules: Vec<Box<dyn ExclusionRule>>,
}

impl CandidateFilter {
    /// Builds the standard rule order over the given lexicon.
    pub fn new(lexicon: &Lexicon) -> Self {
        let mut rules: Vec<Box<dyn ExclusionRule>> = vec![Box::new(BlankRule)];
        for category in &lexicon.categories {
            rules.push(Box::new(CategoryRule::new(category)));
        }
        rules.push(Box::new(TrialCodeRule));
        rules.push(Box::new(DateRule));
        rules.push(Box::new(ShortTokenRule));
        rules.push(Box::new(MostlySymbolsRule));
        Self { rules }
    }

    /// Uses exactly the given rules, in the given order.
    pub fn with_rules(rules: Vec<Box<dyn ExclusionRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.rule_name()).collect()
    }

    /// Name of the first rule that excludes `term`, if any.
    pub fn exclusion_reason(&self, term: &str) -> Option<&str> {
        let cleaned = clean(term);
        self.rules
            .iter()
            .find(|rule| rule.excludes(&cleaned))
            .map(|rule| rule.rule_name())
    }

    pub fn should_exclude(&self, term: &str) -> bool {
        self.exclusion_reason(term).is_some()
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

impl fmt::Debug for CandidateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CandidateFilter")
            .field("rules", &self.rule_names())
            .finish()
    }
}
