//! Exclusion rules.
//!
//! Every rule sees the cleaned term (see [`crate::clean`]). Rules are
//! evaluated in the order the filter holds them; the first rule that
//! fires decides.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::lexicon::Category;

/// Clinical-trial registry numbers and sponsor protocol codes.
static TRIAL_CODE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:NCT\d{8}|ISRCTN\d{8}|(?:EudraCT\s*(?:No\.?\s*)?)?\d{4}-\d{6}-\d{2}|CTRI/\d{4}/\d{2,3}/\d+|[A-Z]{2,5}-?\d{3,6}(?:-\d{1,4})?)$",
    )
    .expect("Invalid trial code regex")
});

/// Numeric dates, month-name dates, bare years and year ranges.
static DATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:",
        r"\d{1,2}[/.\-]\d{1,2}[/.\-]\d{2,4}",
        r"|\d{4}[/.\-]\d{1,2}(?:[/.\-]\d{1,2})?",
        r"|\d{1,2}[/.\-]\d{4}",
        r"|(?:19|20)\d{2}",
        r"|(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?(?:\s+\d{1,2}(?:st|nd|rd|th)?,?)?\s+\d{4}",
        r"|\d{1,2}\s+(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?,?\s+\d{4}",
        r"|(?:19|20)\d{2}\s*[-–—]\s*(?:(?:19|20)\d{2}|present|current|now|today)",
        r")$"
    ))
    .expect("Invalid date regex")
});

/// A named predicate over a cleaned candidate term.
pub trait ExclusionRule: Send + Sync {
    /// Stable name used in logs and diagnostics.
    fn rule_name(&self) -> &str;

    /// True when the cleaned term must not be resolved.
    fn excludes(&self, cleaned: &str) -> bool;
}

/// Empty after cleanup.
pub struct BlankRule;

impl ExclusionRule for BlankRule {
    fn rule_name(&self) -> &str {
        "blank"
    }

    fn excludes(&self, cleaned: &str) -> bool {
        cleaned.trim().is_empty()
    }
}

/// Membership in one lexicon category.
///
/// Case-insensitive categories still compare one- and two-letter uppercase
/// terms as written, so `CO` and `AS` survive a list holding `Co` and `as`.
pub struct CategoryRule {
    name: String,
    case_sensitive: bool,
    folded: HashSet<String>,
    written: HashSet<String>,
}

impl CategoryRule {
    pub fn new(category: &Category) -> Self {
        let written: HashSet<String> = category
            .words
            .iter()
            .map(|word| word.trim().to_string())
            .filter(|word| !word.is_empty())
            .collect();
        let folded = if category.case_sensitive {
            HashSet::new()
        } else {
            written.iter().map(|word| word.to_uppercase()).collect()
        };
        Self {
            name: format!("category:{}", category.name),
            case_sensitive: category.case_sensitive,
            folded,
            written,
        }
    }
}

/// One or two uppercase letters, the shape of a chemical symbol.
fn is_symbol_shaped(term: &str) -> bool {
    let mut count = 0;
    for ch in term.chars() {
        if !(ch.is_alphabetic() && ch.is_uppercase()) {
            return false;
        }
        count += 1;
    }
    (1..=2).contains(&count)
}

impl ExclusionRule for CategoryRule {
    fn rule_name(&self) -> &str {
        &self.name
    }

    fn excludes(&self, cleaned: &str) -> bool {
        if self.case_sensitive || is_symbol_shaped(cleaned) {
            self.written.contains(cleaned)
        } else {
            self.folded.contains(&cleaned.to_uppercase())
        }
    }
}

/// Clinical-trial / study identifier shapes (`NCT01234567`, `ABC-1234`).
pub struct TrialCodeRule;

impl ExclusionRule for TrialCodeRule {
    fn rule_name(&self) -> &str {
        "trial_code"
    }

    fn excludes(&self, cleaned: &str) -> bool {
        TRIAL_CODE_REGEX.is_match(cleaned)
    }
}

pub struct DateRule;

impl ExclusionRule for DateRule {
    fn rule_name(&self) -> &str {
        "date"
    }

    fn excludes(&self, cleaned: &str) -> bool {
        DATE_REGEX.is_match(cleaned)
    }
}

/// One or two characters, unless fully uppercase letters (`K`, `FE`).
pub struct ShortTokenRule;

impl ExclusionRule for ShortTokenRule {
    fn rule_name(&self) -> &str {
        "short_token"
    }

    fn excludes(&self, cleaned: &str) -> bool {
        cleaned.chars().count() <= 2 && !is_symbol_shaped(cleaned)
    }
}

/// More symbols than letters and digits, ignoring whitespace.
pub struct MostlySymbolsRule;

impl ExclusionRule for MostlySymbolsRule {
    fn rule_name(&self) -> &str {
        "mostly_symbols"
    }

    fn excludes(&self, cleaned: &str) -> bool {
        let mut alphanumeric = 0usize;
        let mut symbols = 0usize;
        for ch in cleaned.chars().filter(|ch| !ch.is_whitespace()) {
            if ch.is_alphanumeric() {
                alphanumeric += 1;
            } else {
                symbols += 1;
            }
        }
        alphanumeric == 0 || symbols > alphanumeric
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_codes() {
        for code in [
            "NCT12345678",
            "nct00000001",
            "ISRCTN12345678",
            "2004-000123-45",
            "ABC-1234",
            "BMS986165",
        ] {
            assert!(TrialCodeRule.excludes(code), "{code} should be a trial code");
        }
        for term in ["Atorvastatin", "Lipitor", "insulin glargine", "B12"] {
            assert!(!TrialCodeRule.excludes(term), "{term} should not be a trial code");
        }
    }

    #[test]
    fn dates() {
        for date in [
            "12/31/2020",
            "2020-12-31",
            "31.12.20",
            "03/2021",
            "2019",
            "Jan 2020",
            "January 5, 2020",
            "5 March 2019",
            "2018 - Present",
            "2019–2021",
        ] {
            assert!(DateRule.excludes(date), "{date} should be a date");
        }
        for term in ["Metformin", "500", "May", "2019 study"] {
            assert!(!DateRule.excludes(term), "{term} should not be a date");
        }
    }

    #[test]
    fn short_tokens_keep_uppercase_symbols() {
        assert!(!ShortTokenRule.excludes("K"));
        assert!(!ShortTokenRule.excludes("FE"));
        assert!(ShortTokenRule.excludes("Fe"));
        assert!(ShortTokenRule.excludes("x1"));
        assert!(ShortTokenRule.excludes("%"));
        assert!(!ShortTokenRule.excludes("NaCl"));
    }

    #[test]
    fn mostly_symbols() {
        assert!(MostlySymbolsRule.excludes("***"));
        assert!(MostlySymbolsRule.excludes("(-/-)a"));
        assert!(!MostlySymbolsRule.excludes("5-HT3"));
        assert!(!MostlySymbolsRule.excludes("co-trimoxazole"));
    }

    #[test]
    fn category_rule_honours_case_sensitivity() {
        let insensitive = CategoryRule::new(&Category {
            name: "companies".to_string(),
            case_sensitive: false,
            words: vec!["Pfizer".to_string()],
        });
        assert_eq!(insensitive.rule_name(), "category:companies");
        assert!(insensitive.excludes("PFIZER"));
        assert!(insensitive.excludes("pfizer"));

        let sensitive = CategoryRule::new(&Category {
            name: "credentials".to_string(),
            case_sensitive: true,
            words: vec!["PharmD".to_string()],
        });
        assert!(sensitive.excludes("PharmD"));
        assert!(!sensitive.excludes("PHARMD"));
    }

    #[test]
    fn case_insensitive_categories_keep_symbol_shaped_terms() {
        let rule = CategoryRule::new(&Category {
            name: "filler".to_string(),
            case_sensitive: false,
            words: vec!["as".to_string(), "Co".to_string(), "VP".to_string()],
        });
        assert!(rule.excludes("as"));
        assert!(rule.excludes("As"));
        assert!(rule.excludes("co"));
        assert!(!rule.excludes("AS"));
        assert!(!rule.excludes("CO"));
        assert!(rule.excludes("VP"));
    }
}
