//! Run configuration.
//!
//! Every field has a default, so a configuration file only has to name the keys it overrides.

use std::{fmt, fs, path::Path, path::PathBuf, str::FromStr};

use serde::Deserialize;

use crate::{strip::RemovalRule, Error, Result};

/// Language of the corpus. Selects locale specific tokenisation, stop words and suffix rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    German,
    French,
}

impl Language {
    pub fn tag(self) -> &'static str {
        match self {
            Language::German => "de",
            Language::French => "fr",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::German
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "de" | "german" | "deutsch" => Ok(Language::German),
            "fr" | "french" | "français" | "francais" => Ok(Language::French),
            other => Err(Error::Config(format!("unsupported language tag {:?}", other))),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Locations of the lexicon files. Each one is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexiconPaths {
    pub stopwords: Option<PathBuf>,
    pub whitelist: Option<PathBuf>,
    pub multiwords: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub language: Language,

    /// Tokens with fewer characters are dropped by the tokeniser.
    pub min_token_chars: usize,

    /// Normalised tokens with at most this many characters are blanked.
    pub short_token_max_chars: usize,

    /// Tokens found in more documents than this become auto-stopwords.
    pub stopword_threshold: usize,

    pub stopwords_case_insensitive: bool,

    /// Drop repeated chapter ids of a token within one document.
    pub dedup_chapter_ids: bool,

    /// Letter prefixes of codes (e.g. `CYP3A4`, `E110`) that numeric cleanup leaves alone.
    pub code_prefixes: Vec<String>,

    /// Merge the built-in stop word list of the language with the configured one.
    pub builtin_stopwords: bool,

    /// Documents extracted in parallel between two merge rounds.
    pub batch_size: usize,

    /// Write the digest keyed lookup table.
    pub lookup: bool,

    pub removal: Vec<RemovalRule>,

    pub lexicon: LexiconPaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            min_token_chars: 4,
            short_token_max_chars: 3,
            stopword_threshold: 400,
            stopwords_case_insensitive: true,
            dedup_chapter_ids: false,
            code_prefixes: ["CYP", "UGT", "HLA", "E"]
                .iter()
                .map(|&s| s.to_owned())
                .collect(),
            builtin_stopwords: true,
            batch_size: 256,
            lookup: false,
            removal: RemovalRule::defaults(),
            lexicon: LexiconPaths::default(),
        }
    }
}

impl Config {
    /// Read a TOML configuration file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be positive".to_owned()));
        }
        if self.min_token_chars == 0 {
            return Err(Error::Config("min_token_chars must be positive".to_owned()));
        }
        if self.code_prefixes.iter().any(|p| p.is_empty()) {
            return Err(Error::Config("code_prefixes must not be empty strings".to_owned()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            language = "fr"
            stopword_threshold = 600

            [lexicon]
            whitelist = "input/whitelist.txt"
            "#,
        )
        .unwrap();

        assert_eq!(config.language, Language::French);
        assert_eq!(config.stopword_threshold, 600);
        assert_eq!(config.min_token_chars, 4);
        assert_eq!(config.removal, RemovalRule::defaults());
        assert_eq!(
            config.lexicon.whitelist,
            Some(PathBuf::from("input/whitelist.txt"))
        );
    }

    #[test]
    fn removal_policy_can_be_replaced() {
        let config: Config = toml::from_str(
            r#"
            [[removal]]
            selector = "div.header"
            required = true
            "#,
        )
        .unwrap();

        assert_eq!(config.removal, vec![RemovalRule::required("div.header")]);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(toml::from_str::<Config>(r#"language = "xx""#).is_err());
        assert_eq!("German".parse::<Language>().unwrap(), Language::German);
    }

    #[test]
    fn zero_batch_size_is_invalid() {
        let config = Config {
            batch_size: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
