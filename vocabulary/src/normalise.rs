//! This module defines a [`TokenNormaliser`] trait that facilitates token normalisation.
//!
//! A normaliser is a single cleanup rule. Rules are composed into a [`RuleChain`], which applies
//! them in order, each one on the output of the previous. A rule returning `None` blanks the token
//! and ends the chain.
//!
//! The predefined rules, in the order [`RuleChain::from_config`] applies them:
//!  * [`Unicode`] - unicode normalisation
//!  * [`StripChars`] - removes typographic characters
//!  * [`Replace`] with [`multiplier_suffix`] - removes `3-fach`, `2-wöchig` and similar suffixes
//!  * [`Replace`] - removes ordinal and dash prefixes (`1.Drehen` -> `Drehen`)
//!  * [`Blank`] - drops times of day
//!  * [`Replace`] - comma decimal separators become dots
//!  * [`Replace`] - drops apostrophe thousands separators
//!  * [`Exempt`] + [`Replace`]/[`Blank`] - strips numeric prefixes and leftovers
//!  * [`Replace`] - strips leading punctuation from words
//!  * [`Blank`] - drops sample sizes (`12n=46`)
//!  * [`Exempt`] + [`Blank`] - drops ellipsis and digit runs
//!  * [`SlashAndLowQuote`]
//!  * [`Blank`] - drops starred numbers (`-60**`)
//!  * [`GluedAbbreviations`] - removes `z.B.`, `o.ä.`, ... and resolves phrase joiners
//!  * [`ShortToken`] - drops what is left if it is too short
//!
//! Additionally, arbitrary rules can be defined by implementing [`TokenNormaliser`] trait.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::{config::Language, tokenise::PHRASE_JOINER, Config, Result};

/// Passes granted to [`RuleChain::normalise`] on top of one per character of the token.
const EXTRA_PASSES: usize = 8;

/// Token normaliser.
pub trait TokenNormaliser: Send + Sync {
    /// Returns the cleaned token, or `None` if the token is to be dropped.
    fn normalise(&self, token: String) -> Option<String>;
}

/// Unicode normaliser.
///
/// Performs NFC, NFD, NFKC and NFKD unicode normalization as defined by the unicode standard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unicode {
    NFC,
    NFD,
    NFKC,
    NFKD,
}

impl TokenNormaliser for Unicode {
    fn normalise(&self, token: String) -> Option<String> {
        Some(match self {
            Unicode::NFC => token.nfc().collect(),
            Unicode::NFD => token.nfd().collect(),
            Unicode::NFKC => token.nfkc().collect(),
            Unicode::NFKD => token.nfkd().collect(),
        })
    }
}

/// Removes every occurrence of the given characters.
pub struct StripChars {
    chars: Vec<char>,
}

impl StripChars {
    pub fn new(chars: &str) -> Self {
        Self {
            chars: chars.chars().collect(),
        }
    }

    /// Quotes, arrows, bullets, dagger signs and similar characters found in package inserts.
    pub fn typographic() -> Self {
        Self::new("\\`♠↔↓↑«»„“”®×'¹³’§‘≡✶•≙≤≥,·†‡‹›ˆ¶*")
    }
}

impl TokenNormaliser for StripChars {
    fn normalise(&self, token: String) -> Option<String> {
        if token.contains(&self.chars[..]) {
            Some(token.chars().filter(|c| !self.chars.contains(c)).collect())
        } else {
            Some(token)
        }
    }
}

/// Replaces every match of a pattern. Replacement syntax is that of [`Regex::replace_all`].
pub struct Replace {
    pattern: Regex,
    replacement: &'static str,
}

impl Replace {
    pub fn new(pattern: &str, replacement: &'static str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }
}

impl TokenNormaliser for Replace {
    fn normalise(&self, token: String) -> Option<String> {
        if self.pattern.is_match(&token) {
            Some(self.pattern.replace_all(&token, self.replacement).into_owned())
        } else {
            Some(token)
        }
    }
}

/// Drops tokens matching a pattern.
pub struct Blank {
    pattern: Regex,
}

impl Blank {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl TokenNormaliser for Blank {
    fn normalise(&self, token: String) -> Option<String> {
        if self.pattern.is_match(&token) {
            None
        } else {
            Some(token)
        }
    }
}

/// Skips the wrapped rules for tokens that look like codes (`CYP3A4`, `E110`, `HLA-B`).
///
/// A token is a code if it starts with one of the prefixes followed by a digit or a dash.
pub struct Exempt {
    prefixes: Vec<String>,
    inner: RuleChain,
}

impl Exempt {
    pub fn new(prefixes: &[String], inner: RuleChain) -> Self {
        Self {
            prefixes: prefixes.to_vec(),
            inner,
        }
    }

    fn is_code(&self, token: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            token
                .strip_prefix(prefix.as_str())
                .and_then(|rest| rest.chars().next())
                .map_or(false, |c| c.is_ascii_digit() || c == '-')
        })
    }
}

impl TokenNormaliser for Exempt {
    fn normalise(&self, token: String) -> Option<String> {
        if self.is_code(&token) {
            Some(token)
        } else {
            self.inner.apply(token)
        }
    }
}

/// Drops tokens starting with `/` and removes one leading low quotation mark.
pub struct SlashAndLowQuote;

impl TokenNormaliser for SlashAndLowQuote {
    fn normalise(&self, token: String) -> Option<String> {
        if token.starts_with('/') {
            None
        } else if let Some(rest) = token.strip_prefix('‚') {
            Some(rest.to_owned())
        } else {
            Some(token)
        }
    }
}

/// Removes abbreviations that the tokeniser glues to words and turns phrase joiners into spaces.
pub struct GluedAbbreviations {
    glued: Vec<&'static str>,
}

impl GluedAbbreviations {
    pub fn new(glued: Vec<&'static str>) -> Self {
        Self { glued }
    }
}

impl Default for GluedAbbreviations {
    fn default() -> Self {
        Self::new(vec!["o.ä.", "z.B.", "u.a.", "d.h.", "’’"])
    }
}

impl TokenNormaliser for GluedAbbreviations {
    fn normalise(&self, mut token: String) -> Option<String> {
        for glued in &self.glued {
            if token.contains(glued) {
                token = token.replace(glued, "");
            }
        }
        if token.contains(PHRASE_JOINER) {
            token = token.replace(PHRASE_JOINER, " ");
        }
        Some(token)
    }
}

/// Drops tokens of at most `max_chars` characters.
pub struct ShortToken {
    pub max_chars: usize,
}

impl TokenNormaliser for ShortToken {
    fn normalise(&self, token: String) -> Option<String> {
        if token.chars().count() <= self.max_chars {
            None
        } else {
            Some(token)
        }
    }
}

/// Pattern removing multiplier and duration suffixes that follow a number or a dash.
pub fn multiplier_suffix(language: Language) -> &'static str {
    match language {
        Language::German => {
            r"(?:-|[0-9]+-?)(?:[Ff]ach(?:e[nrs]?)?|stündig(?:e[nrs]?)?|tägig(?:e[nrs]?)?|wöchig(?:e[nrs]?)?|monatig(?:e[nrs]?)?|jährig(?:e[nrs]?)?)"
        }
        Language::French => {
            r"(?:-|[0-9]+-?)(?:fois|quotidien(?:ne)?s?|hebdomadaires?|mensuel(?:le)?s?|annuel(?:le)?s?)"
        }
    }
}

/// Ordered list of [`TokenNormaliser`]s.
#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn TokenNormaliser>>,
}

impl RuleChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule to the chain.
    pub fn with_rule<T>(mut self, rule: T) -> Self
    where
        T: 'static + TokenNormaliser,
    {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The package insert cleanup chain for the configured language.
    pub fn from_config(config: &Config) -> Result<Self> {
        let codes = &config.code_prefixes;

        Ok(Self::new()
            .with_rule(Unicode::NFC)
            .with_rule(StripChars::typographic())
            .with_rule(Replace::new(multiplier_suffix(config.language), "")?)
            .with_rule(Replace::new(r"^(?:[0-9]+\.|-|−)(\p{L}+)$", "$1")?)
            .with_rule(Blank::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}$")?)
            .with_rule(Replace::new(r"([+-]?[0-9]+),([0-9]+)", "$1.$2")?)
            .with_rule(Replace::new(r"([+-]?[0-9]+)'([0-9]+)", "$1$2")?)
            .with_rule(Exempt::new(
                codes,
                Self::new()
                    .with_rule(Replace::new(r"^[-+−–]?[0-9]+(?:[.:/][0-9]+)*-?", "")?)
                    .with_rule(Blank::new(r"^[-–]?.?[0-9]+$")?),
            ))
            .with_rule(Replace::new(r"^[-–./*+,](\D+)$", "$1")?)
            .with_rule(Blank::new(r"(?:^|\*|-?[0-9]+)n=[0-9]+")?)
            .with_rule(Exempt::new(
                codes,
                Self::new().with_rule(Blank::new(r"^(?:.{3}|…)[0-9]+$|^-[0-9]+")?),
            ))
            .with_rule(SlashAndLowQuote)
            .with_rule(Blank::new(r"^[-+−.]?[0-9]+\*+$")?)
            .with_rule(GluedAbbreviations::default())
            .with_rule(ShortToken {
                max_chars: config.short_token_max_chars,
            }))
    }

    /// Normalise a token. Returns an empty string for a dropped token.
    ///
    /// The chain is re-applied until the token stops changing, so normalising an already
    /// normalised token is a no-op. Predefined rules never grow a token, so the pass limit
    /// only stops custom rules that keep rewriting each other.
    pub fn normalise(&self, token: &str) -> String {
        let limit = 2 * token.chars().count() + EXTRA_PASSES;
        let mut current = token.to_owned();
        for _ in 0..limit {
            match self.apply(current.clone()) {
                Some(next) if next == current => return current,
                Some(next) => current = next,
                None => return String::new(),
            }
        }
        current
    }

    /// One pass over all rules.
    fn apply(&self, token: String) -> Option<String> {
        self.rules.iter().try_fold(token, |token, rule| {
            rule.normalise(token).filter(|t| !t.is_empty())
        })
    }
}

impl TokenNormaliser for RuleChain {
    fn normalise(&self, token: String) -> Option<String> {
        self.apply(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> RuleChain {
        RuleChain::from_config(&Config::default()).unwrap()
    }

    fn french() -> RuleChain {
        RuleChain::from_config(&Config {
            language: Language::French,
            ..Config::default()
        })
        .unwrap()
    }

    fn apply<T: TokenNormaliser>(rule: &T, token: &str) -> Option<String> {
        rule.normalise(token.to_owned())
    }

    const TRICKY: &[&str] = &[
        "1.Drehen",
        "o.ä.",
        "z.B.Tabletten",
        "„Filmtabletten“",
        "3-fach",
        "2-wöchigen",
        "Einfachheit",
        "12:30:00",
        "0,001",
        "10'000",
        "10mg",
        "CYP3A4",
        "E110",
        "HLA-B5701",
        "x12",
        "-Leukämie",
        "--Leukämie",
        ".Tabletten",
        "12n=46",
        "*n=12",
        "...123",
        "abc123",
        "/Tag",
        "‚Vorsicht",
        "-60**",
        "Kopf_schmerzen",
        "akute_myeloische_Leukämie",
        "Übelkeit",
        "Ü",
        "5-HT3-Antagonisten",
        "",
        "Zahl1,2,3,4",
        "−Wirkstoff",
        "ein‚‚zwei",
        "o.ä.o.ä.Text",
        "..........Tabletten",
        "-----------------Leukämie",
        "12-Monats-Kontrolle",
    ];

    #[test]
    fn worked_examples() {
        let chain = chain();
        assert_eq!(chain.normalise("1.Drehen"), "Drehen");
        assert_eq!(chain.normalise("o.ä."), "");
        assert_eq!(chain.normalise("Kopfschmerzen"), "Kopfschmerzen");
    }

    #[test]
    fn normalise_is_idempotent() {
        for chain in [chain(), french()] {
            for &token in TRICKY {
                let once = chain.normalise(token);
                assert_eq!(chain.normalise(&once), once, "token {:?}", token);
            }
        }
    }

    #[test]
    fn output_is_blank_or_long_enough() {
        let chain = chain();
        for &token in TRICKY {
            let out = chain.normalise(token);
            assert!(out.is_empty() || out.chars().count() > 3, "{:?} -> {:?}", token, out);
        }
    }

    #[test]
    fn typographic_characters_are_removed() {
        assert_eq!(chain().normalise("„Filmtabletten“"), "Filmtabletten");
        assert_eq!(apply(&StripChars::typographic(), "a,b*c"), Some("abc".to_owned()));
    }

    #[test]
    fn multiplier_suffixes_depend_on_language() {
        let german = Replace::new(multiplier_suffix(Language::German), "").unwrap();
        assert_eq!(apply(&german, "3-fach"), Some(String::new()));
        assert_eq!(apply(&german, "2-wöchigen"), Some(String::new()));
        assert_eq!(apply(&german, "Einfachheit"), Some("Einfachheit".to_owned()));
        assert_eq!(apply(&german, "3-fois"), Some("3-fois".to_owned()));

        let french = Replace::new(multiplier_suffix(Language::French), "").unwrap();
        assert_eq!(apply(&french, "3fois"), Some(String::new()));
        assert_eq!(apply(&french, "3-fach"), Some("3-fach".to_owned()));
    }

    #[test]
    fn numeric_separators() {
        let comma = Replace::new(r"([+-]?[0-9]+),([0-9]+)", "$1.$2").unwrap();
        assert_eq!(apply(&comma, "0,001"), Some("0.001".to_owned()));

        let apostrophe = Replace::new(r"([+-]?[0-9]+)'([0-9]+)", "$1$2").unwrap();
        assert_eq!(apply(&apostrophe, "10'000"), Some("10000".to_owned()));
    }

    #[test]
    fn numbers_and_times_are_dropped() {
        let chain = chain();
        assert_eq!(chain.normalise("12:30:00"), "");
        assert_eq!(chain.normalise("0,001"), "");
        assert_eq!(chain.normalise("10'000"), "");
        assert_eq!(chain.normalise("12n=46"), "");
        assert_eq!(chain.normalise("...123"), "");
        assert_eq!(chain.normalise("-60**"), "");
        assert_eq!(chain.normalise("10mg"), "");
    }

    #[test]
    fn codes_keep_their_digits() {
        let chain = chain();
        assert_eq!(chain.normalise("CYP3A4"), "CYP3A4");
        assert_eq!(chain.normalise("E110"), "E110");
        assert_eq!(chain.normalise("abc123"), "");
    }

    #[test]
    fn leading_punctuation_and_quotes() {
        let chain = chain();
        assert_eq!(chain.normalise("-Leukämie"), "Leukämie");
        assert_eq!(chain.normalise("--Leukämie"), "Leukämie");
        assert_eq!(chain.normalise(".Tabletten"), "Tabletten");
        assert_eq!(chain.normalise("‚Vorsicht"), "Vorsicht");
        assert_eq!(chain.normalise("/Tag"), "");
    }

    #[test]
    fn long_punctuation_runs_are_removed_completely() {
        let chain = chain();
        assert_eq!(chain.normalise("..........Tabletten"), "Tabletten");
        assert_eq!(chain.normalise("-----------------Leukämie"), "Leukämie");
    }

    #[test]
    fn numeric_prefix_takes_its_hyphen() {
        let chain = chain();
        assert_eq!(chain.normalise("5-HT3-Antagonisten"), "HT3-Antagonisten");
        assert_eq!(chain.normalise("12-Monats-Kontrolle"), "Monats-Kontrolle");
    }

    #[test]
    fn phrase_joiner_becomes_space() {
        assert_eq!(
            chain().normalise("akute_myeloische_Leukämie"),
            "akute myeloische Leukämie"
        );
    }

    #[test]
    fn decomposed_umlauts_are_composed() {
        assert_eq!(chain().normalise("U\u{308}belkeit"), "Übelkeit");
    }

    #[test]
    fn short_token_threshold_is_configurable() {
        let chain = RuleChain::from_config(&Config {
            short_token_max_chars: 2,
            ..Config::default()
        })
        .unwrap();
        assert_eq!(chain.normalise("Arm"), "Arm");
        assert_eq!(chain.normalise("Ei"), "");
    }

    #[test]
    fn custom_chain() {
        let chain = RuleChain::new()
            .with_rule(Replace::new("ph", "f").unwrap())
            .with_rule(ShortToken { max_chars: 3 });
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.normalise("Phase"), "Phase");
        assert_eq!(chain.normalise("Morphin"), "Morfin");
        assert_eq!(chain.normalise("phi"), "");
    }
}
