use std::{
    collections::{HashMap, HashSet},
    time::Instant,
};

use tracing::{instrument, trace};

use crate::{
    analyse::Analyzer,
    chapter::{ChapterLocator, ChapterMap},
    error::ExtractionError,
    strip::HtmlSectionStripper,
    Config, Document, Error, Lexicon, Result,
};

/// What one document contributes to the corpus index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTerms {
    /// Registration identifier of the document.
    pub id: String,

    /// Occurrences of every retained term in the document.
    pub frequencies: HashMap<String, usize>,

    /// Chapters every retained term was found in.
    pub chapters: ChapterMap,
}

impl DocumentTerms {
    /// Distinct terms, most frequent first, ties in ascending order.
    pub fn ranked(&self) -> Vec<(&str, usize)> {
        let mut ranked = self
            .frequencies
            .iter()
            .map(|(term, &count)| (term.as_str(), count))
            .collect::<Vec<_>>();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Extractor turns one [`Document`] into its [`DocumentTerms`].
///
/// The body is stripped of boilerplate by [`HtmlSectionStripper`], analysed into normalised
/// terms by [`Analyzer`] and the retained terms are located in chapters by [`ChapterLocator`].
///
/// Extractor holds no state across documents and can be shared between threads.
pub struct Extractor {
    stripper: HtmlSectionStripper,
    analyzer: Analyzer,
    locator: ChapterLocator,
    phrases: HashSet<String>,
}

impl Extractor {
    pub fn new(
        stripper: HtmlSectionStripper,
        analyzer: Analyzer,
        locator: ChapterLocator,
        phrases: HashSet<String>,
    ) -> Self {
        Self {
            stripper,
            analyzer,
            locator,
            phrases,
        }
    }

    pub fn from_config(config: &Config, lexicon: &Lexicon) -> Result<Self> {
        let analyzer = Analyzer::from_config(config, lexicon)?;
        let phrases = analyzer.phrase_terms(&lexicon.multiwords);

        Ok(Self::new(
            HtmlSectionStripper::new(&config.removal)?,
            analyzer,
            ChapterLocator::new(config.dedup_chapter_ids)?,
            phrases,
        ))
    }

    /// Normalised terms of the configured phrases.
    pub fn phrases(&self) -> &HashSet<String> {
        &self.phrases
    }

    /// Extract the terms of a document.
    ///
    /// Returns `Ok(None)` for a document without body or without terms. A document that cannot
    /// be extracted yields [`Error::Extraction`] and must contribute nothing.
    #[instrument(skip(self, document), fields(document = %document.id))]
    pub fn extract(&self, document: &Document) -> Result<Option<DocumentTerms>> {
        let fail = |source| Error::Extraction {
            document: document.id.clone(),
            source,
        };

        let id = document
            .registration_id()
            .ok_or_else(|| fail(ExtractionError::MissingId))?;

        let start = Instant::now();

        let stripped = match self.stripper.strip(document.html.as_deref()).map_err(fail)? {
            Some(stripped) => stripped,
            None => return Ok(None),
        };

        let terms = self.analyzer.analyse(&stripped.text());
        if terms.is_empty() {
            return Ok(None);
        }

        let words_count = terms.len();
        let mut frequencies = HashMap::new();
        for term in terms {
            *frequencies.entry(term).or_insert(0) += 1;
        }

        let retained = frequencies.keys().map(String::as_str).collect::<HashSet<_>>();
        let chapters = self
            .locator
            .locate(&stripped, &retained, &self.phrases, &self.analyzer);

        trace!(
            duration = ?start.elapsed(),
            %words_count,
            distinct = frequencies.len(),
            "extracted a document"
        );

        Ok(Some(DocumentTerms {
            id: id.to_owned(),
            frequencies,
            chapters,
        }))
    }
}
