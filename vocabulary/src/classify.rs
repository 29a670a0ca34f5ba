//! Split of the corpus vocabulary into keywords and automatically discovered stop words.

use std::collections::HashSet;

use crate::{aggregate::document_frequency, digest::lookup_key, CorpusIndex, ResultSink, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    AutoStopword,
}

/// Classifies terms by document frequency.
///
/// A term found in more than `threshold` documents is an auto-stopword, unless it is
/// whitelisted or a configured multi-word phrase.
#[derive(Debug, Clone)]
pub struct StopwordClassifier {
    threshold: usize,
    whitelist: HashSet<String>,
    phrases: HashSet<String>,
}

impl StopwordClassifier {
    pub fn new(threshold: usize, whitelist: HashSet<String>, phrases: HashSet<String>) -> Self {
        Self {
            threshold,
            whitelist,
            phrases,
        }
    }

    pub fn verdict(&self, term: &str, document_frequency: usize) -> Verdict {
        if self.whitelist.contains(term) || self.phrases.contains(term) {
            Verdict::Keep
        } else if document_frequency > self.threshold {
            Verdict::AutoStopword
        } else {
            Verdict::Keep
        }
    }

    /// Classify every term of a complete index.
    pub fn classify(&self, index: &CorpusIndex) -> Classification {
        let mut classification = Classification::default();

        for (term, association) in index {
            let frequency = document_frequency(association);
            match self.verdict(term, frequency) {
                Verdict::Keep => classification
                    .keep
                    .push((term.to_owned(), association.to_owned())),
                Verdict::AutoStopword => classification
                    .auto_stopwords
                    .push((term.to_owned(), frequency)),
            }
        }

        classification
    }
}

/// Result of [`StopwordClassifier::classify`], both lists in ascending term order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    /// Kept terms with their association strings.
    pub keep: Vec<(String, String)>,

    /// Auto-stopwords with their document frequency.
    pub auto_stopwords: Vec<(String, usize)>,
}

impl Classification {
    /// Write both lists, and the lookup table of kept terms if `lookup` is set.
    pub fn write_to<S>(&self, sink: &mut S, lookup: bool) -> Result<()>
    where
        S: ResultSink + ?Sized,
    {
        for (term, association) in &self.keep {
            sink.write_keep(term, association)?;
        }
        for (term, frequency) in &self.auto_stopwords {
            sink.write_auto_stopword(term, *frequency)?;
        }
        if lookup {
            for (term, association) in &self.keep {
                sink.write_lookup(&lookup_key(term), term, association)?;
            }
        }
        Ok(())
    }
}
