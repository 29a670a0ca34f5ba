//! This module defines tokenising facilities to split the given text into tokens.
//!
//! Tokeniser is any type that implements [`Tokeniser`] trait. The predefined [`WordTokeniser`]
//! splits text on unicode word boundaries and applies the rules of the configured language.
//!
//! A raw token stream is then post-processed by:
//!  * [`PhraseMerger`] - merges configured multi-word phrases into one compound token
//!  * [`TokenFilter`] - drops stop words, punctuation, integers and short tokens
use std::collections::HashSet;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::{config::Language, Config, Result};

/// Joins the words of a merged phrase inside a compound token.
pub const PHRASE_JOINER: char = '_';

const HYPHENS: &[&str] = &["-", "\u{2010}", "\u{2011}"];

/// Token produced by a [`Tokeniser`].
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token {
    /// Token's string value.
    pub value: String,

    /// Whether the token is a merged multi-word phrase.
    pub compound: bool,
}

impl Token {
    /// Create a new single-word token.
    pub fn new(value: String) -> Self {
        Self {
            value,
            compound: false,
        }
    }

    /// Create a compound token out of phrase words.
    pub fn compound<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            value: words
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(&PHRASE_JOINER.to_string()),
            compound: true,
        }
    }
}

/// Tokeniser knows how to split an incoming text in distinct tokens.
pub trait Tokeniser: Send + Sync {
    /// Split `text` into tokens in source order.
    fn tokenise(&self, text: &str) -> Vec<Token>;
}

/// Tokeniser that splits the input on unicode word boundaries.
///
/// White space is discarded, punctuation is kept as single tokens and hyphenated words
/// (`Magen-Darm`, `3-fach`) stay one token. For French, elided articles and pronouns (`l'`,
/// `d'`, `qu'`, ...) are cut off their host word.
pub struct WordTokeniser {
    elision: Option<Regex>,
}

impl WordTokeniser {
    pub fn new(language: Language) -> Result<Self> {
        let elision = match language {
            Language::French => Some(Regex::new(
                r"^(?i:jusqu|lorsqu|puisqu|qu|[cdjlmnst])['’](.+)$",
            )?),
            Language::German => None,
        };

        Ok(Self { elision })
    }

    fn strip_elision<'a>(&self, word: &'a str) -> &'a str {
        self.elision
            .as_ref()
            .and_then(|elision| elision.captures(word))
            .and_then(|captures| captures.get(1))
            .map_or(word, |host| host.as_str())
    }
}

impl Tokeniser for WordTokeniser {
    fn tokenise(&self, text: &str) -> Vec<Token> {
        text.split_whitespace()
            .flat_map(hyphenated_words)
            .map(|word| Token::new(self.strip_elision(&word).to_owned()))
            .collect()
    }
}

/// Word boundary segments of a white space free chunk, with hyphenated words kept whole.
fn hyphenated_words(chunk: &str) -> Vec<String> {
    let segments = chunk.split_word_bounds().collect::<Vec<_>>();
    let mut words: Vec<String> = Vec::with_capacity(segments.len());
    let mut glue_next = false;

    for (i, segment) in segments.iter().enumerate() {
        if glue_next {
            if let Some(word) = words.last_mut() {
                word.push_str(segment);
            }
            glue_next = false;
            continue;
        }

        let after_word = words
            .last()
            .and_then(|w| w.chars().last())
            .map_or(false, char::is_alphanumeric);
        let before_word = segments
            .get(i + 1)
            .and_then(|s| s.chars().next())
            .map_or(false, char::is_alphanumeric);

        match words.last_mut() {
            Some(word) if HYPHENS.contains(segment) && after_word && before_word => {
                word.push_str(segment);
                glue_next = true;
            }
            _ => words.push((*segment).to_owned()),
        }
    }

    words
}

struct Phrase {
    /// Lower-cased words used for matching.
    words: Vec<String>,
    /// Words as configured, used to build the compound token.
    spelling: Vec<String>,
}

/// Merges multi-word phrases into compound tokens.
///
/// Phrases are tried longest first at every position of the token stream; a match replaces the
/// matched run by one [`Token::compound`] and matching resumes after it. Matching ignores case,
/// the compound token uses the configured spelling.
#[derive(Default)]
pub struct PhraseMerger {
    phrases: Vec<Phrase>,
}

impl PhraseMerger {
    /// Create a merger out of space separated phrases. Single words are ignored.
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut phrases = phrases
            .into_iter()
            .map(|phrase| {
                phrase
                    .as_ref()
                    .split_whitespace()
                    .map(str::to_owned)
                    .collect::<Vec<_>>()
            })
            .filter(|words| words.len() > 1)
            .map(|spelling| Phrase {
                words: spelling.iter().map(|w| w.to_lowercase()).collect(),
                spelling,
            })
            .collect::<Vec<_>>();

        // Stable sort keeps the configured order among phrases of equal length.
        phrases.sort_by(|a, b| b.words.len().cmp(&a.words.len()));

        Self { phrases }
    }

    pub fn merge(&self, tokens: Vec<Token>) -> Vec<Token> {
        if self.phrases.is_empty() {
            return tokens;
        }

        let lowered = tokens
            .iter()
            .map(|t| t.value.to_lowercase())
            .collect::<Vec<_>>();
        let mut merged = Vec::with_capacity(tokens.len());
        let mut tokens = tokens.into_iter().map(Some).collect::<Vec<_>>();
        let mut i = 0;

        while i < tokens.len() {
            let matched = self.phrases.iter().find(|phrase| {
                lowered
                    .get(i..i + phrase.words.len())
                    .map_or(false, |window| window == &phrase.words[..])
            });

            match matched {
                Some(phrase) => {
                    merged.push(Token::compound(&phrase.spelling));
                    i += phrase.words.len();
                }
                None => {
                    if let Some(token) = tokens[i].take() {
                        merged.push(token);
                    }
                    i += 1;
                }
            }
        }

        merged
    }
}

/// Drops tokens that cannot be keywords.
///
/// In order: stop words (not applied to compound tokens), single punctuation characters,
/// integers with an optional sign and tokens shorter than the minimum length.
pub struct TokenFilter {
    stopwords: HashSet<String>,
    case_insensitive: bool,
    min_chars: usize,
}

impl TokenFilter {
    pub fn new<I>(stopwords: I, case_insensitive: bool, min_chars: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let stopwords = stopwords
            .into_iter()
            .map(|s| if case_insensitive { s.to_lowercase() } else { s })
            .collect();

        Self {
            stopwords,
            case_insensitive,
            min_chars,
        }
    }

    pub fn from_config(config: &Config, stopwords: &HashSet<String>) -> Self {
        Self::new(
            stopwords.iter().cloned(),
            config.stopwords_case_insensitive,
            config.min_token_chars,
        )
    }

    pub fn keep(&self, token: &Token) -> bool {
        let value = token.value.as_str();

        (token.compound || !self.is_stopword(value))
            && !is_punctuation(value)
            && !is_integer(value)
            && value.chars().count() >= self.min_chars
    }

    fn is_stopword(&self, value: &str) -> bool {
        if self.case_insensitive {
            self.stopwords.contains(&value.to_lowercase())
        } else {
            self.stopwords.contains(value)
        }
    }
}

fn is_punctuation(value: &str) -> bool {
    let mut chars = value.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if !c.is_alphanumeric())
}

fn is_integer(value: &str) -> bool {
    let digits = value
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(value);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
