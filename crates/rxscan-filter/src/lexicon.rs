//! Closed word lists driving the category exclusion rules.
//!
//! A lexicon is an ordered list of named categories. The crate embeds a
//! default lexicon (`data/lexicon.toml`); deployments can load their own
//! file with the same shape:
//!
//! ```toml
//! [[category]]
//! name = "companies"
//! words = ["Pfizer", "Novartis"]
//!
//! [[category]]
//! name = "credentials"
//! case_sensitive = true
//! words = ["MD", "PharmD"]
//! ```

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::Deserialize;

use crate::error::FilterError;

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.toml");

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::from_toml_str(BUILTIN_LEXICON).expect("Invalid embedded lexicon")
});

/// One named word list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub name: String,
    /// Compare terms as written instead of uppercased.
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub words: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Lexicon {
    #[serde(default, rename = "category")]
    pub categories: Vec<Category>,
}

impl Lexicon {
    /// The lexicon embedded in this crate.
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, FilterError> {
        Self::parse(contents, "<inline>")
    }

    /// Loads a lexicon file from disk.
    pub fn load(path: &Path) -> Result<Self, FilterError> {
        let contents = std::fs::read_to_string(path).map_err(|e| FilterError::io(path, e))?;
        Self::parse(&contents, &path.display().to_string())
    }

    fn parse(contents: &str, origin: &str) -> Result<Self, FilterError> {
        let lexicon: Lexicon = toml::from_str(contents).map_err(|source| FilterError::Toml {
            origin: origin.to_string(),
            source,
        })?;
        lexicon.validate()?;
        Ok(lexicon)
    }

    fn validate(&self) -> Result<(), FilterError> {
        let mut names = BTreeSet::new();
        for category in &self.categories {
            let name = category.name.trim();
            if name.is_empty() {
                return Err(FilterError::InvalidLexicon {
                    message: "category name must not be empty".to_string(),
                });
            }
            if !names.insert(name) {
                return Err(FilterError::InvalidLexicon {
                    message: format!("duplicate category: {name}"),
                });
            }
        }
        Ok(())
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Appends words to a category, creating it (case-insensitive) if absent.
    pub fn extend_category<I, S>(&mut self, name: &str, words: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words = words.into_iter().map(Into::into);
        if let Some(category) = self.categories.iter_mut().find(|c| c.name == name) {
            category.words.extend(words);
            return;
        }
        self.categories.push(Category {
            name: name.to_string(),
            case_sensitive: false,
            words: words.collect(),
        });
    }
}
