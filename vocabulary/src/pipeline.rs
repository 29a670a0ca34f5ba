use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};

use crate::{
    classify::{Classification, StopwordClassifier},
    loader::DocumentLoader,
    sink::ResultSink,
    Config, CorpusIndex, Document, Extractor, Lexicon, Result,
};

/// Summary of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Documents delivered by the loader.
    pub documents: usize,

    /// Documents that contributed to the index.
    pub processed: usize,

    /// Documents without body or without any retained term.
    pub empty: usize,

    /// Documents skipped because extraction failed.
    pub skipped: usize,

    /// Distinct terms in the index.
    pub tokens: usize,

    pub kept: usize,
    pub auto_stopwords: usize,
    pub elapsed: Duration,
}

/// Pipeline drives a corpus from a [`DocumentLoader`] to a [`ResultSink`].
///
/// Documents are extracted in parallel, `batch_size` at a time. The contributions of a batch
/// are merged into the [`CorpusIndex`] on the calling thread in loader order, so the result
/// does not depend on scheduling.
pub struct Pipeline {
    extractor: Extractor,
    classifier: StopwordClassifier,
    batch_size: usize,
    lookup: bool,
}

impl Pipeline {
    pub fn new(config: &Config, lexicon: Lexicon) -> Result<Self> {
        config.validate()?;

        let extractor = Extractor::from_config(config, &lexicon)?;
        let phrases = extractor.phrases().clone();
        let classifier =
            StopwordClassifier::new(config.stopword_threshold, lexicon.whitelist, phrases);

        Ok(Self {
            extractor,
            classifier,
            batch_size: config.batch_size,
            lookup: config.lookup,
        })
    }

    /// Build the corpus index. A loader error aborts, failing documents are skipped.
    #[instrument(skip_all, fields(batch_size = self.batch_size))]
    pub fn index<L>(&self, loader: L) -> Result<(CorpusIndex, RunReport)>
    where
        L: DocumentLoader,
    {
        let start = Instant::now();
        let mut index = CorpusIndex::new();
        let mut report = RunReport::default();
        let mut batch = Vec::with_capacity(self.batch_size);

        for document in loader {
            batch.push(document?);
            if batch.len() >= self.batch_size {
                self.merge_batch(&mut batch, &mut index, &mut report)?;
            }
        }
        self.merge_batch(&mut batch, &mut index, &mut report)?;

        report.tokens = index.len();
        report.elapsed = start.elapsed();

        debug!(
            documents = report.documents,
            tokens = report.tokens,
            duration = ?report.elapsed,
            "index built"
        );

        Ok((index, report))
    }

    fn merge_batch(
        &self,
        batch: &mut Vec<Document>,
        index: &mut CorpusIndex,
        report: &mut RunReport,
    ) -> Result<()> {
        let results = batch
            .par_iter()
            .map(|document| self.extractor.extract(document))
            .collect::<Vec<_>>();

        for (document, result) in batch.drain(..).zip(results) {
            report.documents += 1;

            match result {
                Ok(Some(terms)) => {
                    index.merge(&terms);
                    report.processed += 1;
                }
                Ok(None) => {
                    debug!(document = %document.id, "document has no terms");
                    report.empty += 1;
                }
                Err(e) if e.is_document_level() => {
                    let reason = std::error::Error::source(&e)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    warn!(
                        document = %document.id,
                        title = %document.title,
                        %reason,
                        "skipping document"
                    );
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    pub fn classify(&self, index: &CorpusIndex) -> Classification {
        self.classifier.classify(index)
    }

    /// Index the corpus, classify its terms and write the result.
    ///
    /// The sink is finished even if writing failed; the first error is returned.
    #[instrument(skip_all)]
    pub fn run<L, S>(&self, loader: L, sink: &mut S) -> Result<RunReport>
    where
        L: DocumentLoader,
        S: ResultSink + ?Sized,
    {
        let start = Instant::now();

        let (index, mut report) = self.index(loader)?;
        let classification = self.classify(&index);
        report.kept = classification.keep.len();
        report.auto_stopwords = classification.auto_stopwords.len();

        let written = classification.write_to(sink, self.lookup);
        let finished = sink.finish();
        written.and(finished)?;

        report.elapsed = start.elapsed();

        info!(
            documents = report.documents,
            processed = report.processed,
            empty = report.empty,
            skipped = report.skipped,
            tokens = report.tokens,
            kept = report.kept,
            auto_stopwords = report.auto_stopwords,
            duration = ?report.elapsed,
            "run finished"
        );

        Ok(report)
    }
}
