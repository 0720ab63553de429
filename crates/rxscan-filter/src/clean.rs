//! Text cleanup applied before any exclusion rule.

use std::sync::LazyLock;

use regex::Regex;

/// Zero-width and typographic spaces, line/paragraph separators and bullet glyphs.
static FORMATTING_ARTIFACTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\u{200B}\u{00A0}\u{2000}-\u{200F}\u{2028}-\u{202F}●•▪▫○◦■□▲△▼▽]+")
        .expect("Invalid formatting artifact regex")
});

/// Strips formatting artifacts, collapses internal whitespace and trims.
pub fn clean(term: &str) -> String {
    if term.is_empty() {
        return String::new();
    }
    let stripped = FORMATTING_ARTIFACTS.replace_all(term, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
