//! Candidate extraction from free text.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use rxscan_filter::CandidateFilter;
use rxscan_model::Candidate;
use tracing::{debug, trace};

/// Two or more line breaks separated only by whitespace.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t\r\f]*\n\s*").expect("Invalid paragraph regex"));

/// Characters that end a phrase within a sentence.
const CHUNK_DELIMITERS: &[char] = &[
    ',', ';', ':', '(', ')', '[', ']', '{', '}', '|', '/', '"', '\u{201C}', '\u{201D}', '\u{2022}',
    '\u{25CF}', '\u{25AA}',
];

/// Produces the ordered candidate list for a document.
pub trait CandidateSource: Send + Sync {
    fn candidates(&self, text: &str) -> Vec<Candidate>;
}

/// Splits text into paragraphs, sentences and punctuation-delimited
/// chunks. Short chunks become phrase candidates; longer ones contribute
/// their individual words. Candidates without letters, and those rejected
/// by the filter, are dropped. Each candidate carries its sentence.
#[derive(Debug, Clone)]
pub struct PhraseExtractor {
    filter: Arc<CandidateFilter>,
    max_phrase_words: usize,
}

impl PhraseExtractor {
    pub fn new(filter: Arc<CandidateFilter>, max_phrase_words: usize) -> Self {
        Self {
            filter,
            max_phrase_words: max_phrase_words.max(1),
        }
    }

    fn push_candidate(&self, term: String, sentence: &str, out: &mut Vec<Candidate>) {
        if !term.chars().any(char::is_alphabetic) {
            trace!(term = %term, "dropping numeric token");
            return;
        }
        if let Some(rule) = self.filter.exclusion_reason(&term) {
            trace!(term = %term, rule, "dropping excluded token");
            return;
        }
        out.push(Candidate::new(term).with_context(sentence));
    }
}

impl CandidateSource for PhraseExtractor {
    fn candidates(&self, text: &str) -> Vec<Candidate> {
        let mut out = Vec::new();
        for paragraph in PARAGRAPH_BREAK.split(text) {
            for sentence in split_sentences(paragraph) {
                for chunk in sentence.split(CHUNK_DELIMITERS) {
                    let words: Vec<&str> = chunk.split_whitespace().filter_map(trim_word).collect();
                    if words.is_empty() {
                        continue;
                    }
                    if words.len() <= self.max_phrase_words {
                        self.push_candidate(words.join(" "), sentence, &mut out);
                    } else {
                        for word in words {
                            self.push_candidate(word.to_string(), sentence, &mut out);
                        }
                    }
                }
            }
        }
        debug!(candidates = out.len(), "extracted candidates");
        out
    }
}

/// Strips leading and trailing punctuation, keeping inner hyphens and dots.
fn trim_word(word: &str) -> Option<&str> {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Sentences end at a line break, or at `.`, `!` or `?` followed by
/// whitespace or the end of the paragraph.
pub fn split_sentences(paragraph: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = paragraph.char_indices().peekable();
    while let Some((position, c)) = chars.next() {
        let boundary = match c {
            '\n' => true,
            '.' | '!' | '?' => chars.peek().is_none_or(|(_, next)| next.is_whitespace()),
            _ => false,
        };
        if boundary {
            let end = position + c.len_utf8();
            push_sentence(&paragraph[start..end], &mut sentences);
            start = end;
        }
    }
    push_sentence(&paragraph[start..], &mut sentences);
    sentences
}

fn push_sentence<'a>(sentence: &'a str, sentences: &mut Vec<&'a str>) {
    let sentence = sentence.trim();
    if !sentence.is_empty() {
        sentences.push(sentence);
    }
}

/// Trimmed lines of `text` containing `query` verbatim.
pub fn find_lines(text: &str, query: &str) -> Vec<String> {
    text.lines()
        .filter(|line| line.contains(query))
        .map(|line| line.trim().to_string())
        .collect()
}
