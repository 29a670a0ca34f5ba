//! Corpus wide association index.
//!
//! For every term the index holds an association string listing the documents the term occurs
//! in, one entry per document, separated by [`ENTRY_DELIMITER`]. An entry is the document id,
//! followed by the comma separated chapter ids in parentheses if the term was located in
//! chapters: `12345|67890(4,7)|13579`.

use std::collections::{btree_map, BTreeMap};

use tracing::trace;

use crate::extract::DocumentTerms;

pub const ENTRY_DELIMITER: char = '|';

/// Number of documents listed in an association string.
pub fn document_frequency(association: &str) -> usize {
    if association.is_empty() {
        0
    } else {
        association.split(ENTRY_DELIMITER).count()
    }
}

/// Term to association string index, built one document at a time.
///
/// Terms are kept in ascending order. Merging takes `&mut self`: extraction may run in parallel,
/// merging is serialised by the owner of the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    associations: BTreeMap<String, String>,
    documents: usize,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the contribution of one document. Must be called at most once per document.
    pub fn merge(&mut self, terms: &DocumentTerms) {
        for (term, _) in terms.ranked() {
            let entry = match terms.chapters.joined(term) {
                Some(chapters) => format!("{}({})", terms.id, chapters),
                None => terms.id.clone(),
            };

            match self.associations.get_mut(term) {
                Some(association) => {
                    association.push(ENTRY_DELIMITER);
                    association.push_str(&entry);
                }
                None => {
                    self.associations.insert(term.to_owned(), entry);
                }
            }
        }

        self.documents += 1;
        trace!(document = %terms.id, terms = terms.frequencies.len(), "merged a document");
    }

    pub fn association(&self, term: &str) -> Option<&str> {
        self.associations.get(term).map(String::as_str)
    }

    /// Number of documents `term` occurs in.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.association(term).map_or(0, document_frequency)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }

    /// Number of merged documents.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Terms with their association strings in ascending term order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.associations.iter(),
        }
    }
}

pub struct Iter<'a> {
    inner: btree_map::Iter<'a, String, String>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(term, association)| (term.as_str(), association.as_str()))
    }
}

impl<'a> IntoIterator for &'a CorpusIndex {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
