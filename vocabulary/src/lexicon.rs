//! Word lists steering the extraction: stop words, whitelist and multi-word phrases.
//!
//! Lexicon files hold one entry per line. Blank lines and lines starting with `#` are ignored.

use std::{collections::HashSet, fs, path::Path};

use stop_words::LANGUAGE;
use tracing::debug;

use crate::{config::Language, Config, Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    /// Tokens dropped by the tokeniser.
    pub stopwords: HashSet<String>,

    /// Tokens always kept, whatever their document frequency.
    pub whitelist: HashSet<String>,

    /// Space separated phrases merged into one token, in configured order.
    pub multiwords: Vec<String>,
}

impl Lexicon {
    /// Load the lexicon files named in the configuration.
    ///
    /// With `builtin_stopwords` the configured stop words are merged with the stop word list
    /// shipped for the configured language.
    pub fn load(config: &Config) -> Result<Self> {
        let paths = &config.lexicon;
        let mut lexicon = Lexicon::default();

        if config.builtin_stopwords {
            lexicon.stopwords.extend(builtin_stopwords(config.language));
        }
        if let Some(path) = &paths.stopwords {
            lexicon.stopwords.extend(read_word_list(path)?);
        }
        if let Some(path) = &paths.whitelist {
            lexicon.whitelist.extend(read_word_list(path)?);
        }
        if let Some(path) = &paths.multiwords {
            lexicon = lexicon.with_multiwords(read_word_list(path)?);
        }

        debug!(
            stopwords = lexicon.stopwords.len(),
            whitelist = lexicon.whitelist.len(),
            multiwords = lexicon.multiwords.len(),
            "lexicon loaded"
        );

        Ok(lexicon)
    }

    /// Set the multi-word phrases. Inner white space is collapsed and duplicates are dropped.
    pub fn with_multiwords<I>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut seen = HashSet::new();
        self.multiwords = phrases
            .into_iter()
            .map(|phrase| phrase.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|phrase| !phrase.is_empty() && seen.insert(phrase.clone()))
            .collect();
        self
    }
}

/// Stop words shipped for the language.
pub fn builtin_stopwords(language: Language) -> Vec<String> {
    let language = match language {
        Language::German => LANGUAGE::German,
        Language::French => LANGUAGE::French,
    };

    stop_words::get(language)
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Read a word list file.
pub fn read_word_list(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).map_err(|source| Error::Lexicon {
        path: path.to_owned(),
        source,
    })?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect())
}
