use std::collections::HashSet;

use crate::{
    normalise::RuleChain,
    tokenise::{PhraseMerger, Token, TokenFilter, Tokeniser, WordTokeniser},
    Config, Lexicon, Result,
};

/// Turns text into normalised terms: tokenise, merge phrases, filter, normalise.
///
/// The same analyzer is used for the whole document text and for every chapter, so that chapter
/// terms compare equal to document terms.
pub struct Analyzer {
    tokeniser: Box<dyn Tokeniser>,
    merger: PhraseMerger,
    filter: TokenFilter,
    normaliser: RuleChain,
}

impl Analyzer {
    pub fn new<T>(
        tokeniser: T,
        merger: PhraseMerger,
        filter: TokenFilter,
        normaliser: RuleChain,
    ) -> Self
    where
        T: 'static + Tokeniser,
    {
        Self {
            tokeniser: Box::new(tokeniser),
            merger,
            filter,
            normaliser,
        }
    }

    pub fn from_config(config: &Config, lexicon: &Lexicon) -> Result<Self> {
        Ok(Self::new(
            WordTokeniser::new(config.language)?,
            PhraseMerger::new(&lexicon.multiwords),
            TokenFilter::from_config(config, &lexicon.stopwords),
            RuleChain::from_config(config)?,
        ))
    }

    /// Terms of `text` in source order, duplicates included. Blanked tokens are dropped.
    pub fn analyse(&self, text: &str) -> Vec<String> {
        self.merger
            .merge(self.tokeniser.tokenise(text))
            .into_iter()
            .filter(|token| self.filter.keep(token))
            .map(|token| self.normaliser.normalise(&token.value))
            .filter(|term| !term.is_empty())
            .collect()
    }

    /// The terms configured phrases turn into: the compound token of each phrase, normalised.
    ///
    /// Phrases the normaliser blanks are left out.
    pub fn phrase_terms<S: AsRef<str>>(&self, phrases: &[S]) -> HashSet<String> {
        phrases
            .iter()
            .map(|phrase| {
                let words = phrase.as_ref().split_whitespace().collect::<Vec<_>>();
                self.normaliser.normalise(&Token::compound(&words).value)
            })
            .filter(|term| !term.is_empty())
            .collect()
    }
}
