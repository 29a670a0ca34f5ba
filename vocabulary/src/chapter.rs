//! Localisation of a document's terms within its chapters.
//!
//! Chapters are elements whose `id` follows one of the chapter naming conventions
//! (`section7`, `Section7050`). The chapter id is the numeric part of the element id.

use std::collections::{HashMap, HashSet};

use scraper::Selector;

use crate::{analyse::Analyzer, strip::flatten, strip::StrippedDocument, Error, Result};

/// Element id prefixes marking a chapter.
pub const CHAPTER_PREFIXES: &[&str] = &["section", "Section"];

/// Clean chapter id of an element id, or `None` if the element is not a chapter.
pub fn chapter_id(element_id: &str) -> Option<&str> {
    CHAPTER_PREFIXES.iter().find_map(|prefix| {
        element_id
            .strip_prefix(prefix)
            .filter(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
    })
}

/// Chapters a term of one document was found in, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterMap {
    chapters: HashMap<String, Vec<String>>,
}

impl ChapterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, term: &str, chapter: &str, dedup: bool) {
        let chapters = self.chapters.entry(term.to_owned()).or_default();
        if !(dedup && chapters.iter().any(|c| c == chapter)) {
            chapters.push(chapter.to_owned());
        }
    }

    pub fn chapters(&self, term: &str) -> &[String] {
        self.chapters.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Comma separated chapter ids of `term`, `None` if it was not found in any chapter.
    pub fn joined(&self, term: &str) -> Option<String> {
        self.chapters
            .get(term)
            .filter(|chapters| !chapters.is_empty())
            .map(|chapters| chapters.join(","))
    }

    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

pub struct ChapterLocator {
    with_id: Selector,
    dedup: bool,
}

impl ChapterLocator {
    pub fn new(dedup: bool) -> Result<Self> {
        let with_id = Selector::parse("[id]")
            .map_err(|e| Error::Config(format!("invalid chapter selector: {}", e)))?;

        Ok(Self { with_id, dedup })
    }

    /// Map every retained term to the chapters it occurs in.
    ///
    /// Each chapter is analysed on its own. A term is attributed to a chapter if it is among the
    /// chapter's terms or among the configured `phrases`, and the document retained it. Nested
    /// chapters are visited separately, so a term of an inner chapter is attributed to the
    /// outer one as well. Chapters inside stripped sections are not visited.
    pub fn locate(
        &self,
        document: &StrippedDocument,
        retained: &HashSet<&str>,
        phrases: &HashSet<String>,
        analyzer: &Analyzer,
    ) -> ChapterMap {
        let mut map = ChapterMap::new();

        for element in document.html().root_element().select(&self.with_id) {
            let chapter = match element.value().id().and_then(chapter_id) {
                Some(chapter) => chapter,
                None => continue,
            };

            let terms = analyzer.analyse(&flatten(element));
            let found = terms
                .iter()
                .map(String::as_str)
                .chain(phrases.iter().map(String::as_str))
                .filter(|term| retained.contains(term))
                .collect::<HashSet<_>>();

            for term in found {
                map.append(term, chapter, self.dedup);
            }
        }

        map
    }
}
