//! Destinations of the classification results.

use std::{fs::File, path::Path};

use csv::{QuoteStyle, Writer, WriterBuilder};
use tracing::debug;

use crate::{Error, Result};

pub const KEEP_FILE: &str = "frequency.csv";
pub const AUTO_STOPWORDS_FILE: &str = "auto_stopwords.csv";
pub const LOOKUP_FILE: &str = "lookup.csv";

/// Receives the rows of a finished run, in ascending term order.
pub trait ResultSink {
    fn write_keep(&mut self, term: &str, association: &str) -> Result<()>;

    fn write_auto_stopword(&mut self, term: &str, document_frequency: usize) -> Result<()>;

    fn write_lookup(&mut self, key: &str, term: &str, association: &str) -> Result<()>;

    /// Flush and close. Called once, also after a failed write.
    fn finish(&mut self) -> Result<()>;
}

/// Writes `;` separated, unquoted files into an existing directory.
pub struct CsvSink {
    keep: Writer<File>,
    auto_stopwords: Writer<File>,
    lookup: Option<Writer<File>>,
}

impl CsvSink {
    /// Create the output files in `dir`. The lookup file is only created if `lookup` is set.
    pub fn create(dir: &Path, lookup: bool) -> Result<Self> {
        fn writer(path: &Path) -> Result<Writer<File>> {
            debug!(path = %path.display(), "creating output file");
            WriterBuilder::new()
                .delimiter(b';')
                .quote_style(QuoteStyle::Never)
                .has_headers(false)
                .flexible(true)
                .from_path(path)
                .map_err(Error::sink)
        }

        Ok(Self {
            keep: writer(&dir.join(KEEP_FILE))?,
            auto_stopwords: writer(&dir.join(AUTO_STOPWORDS_FILE))?,
            lookup: if lookup {
                Some(writer(&dir.join(LOOKUP_FILE))?)
            } else {
                None
            },
        })
    }
}

impl ResultSink for CsvSink {
    fn write_keep(&mut self, term: &str, association: &str) -> Result<()> {
        self.keep
            .write_record([term, association])
            .map_err(Error::sink)
    }

    fn write_auto_stopword(&mut self, term: &str, document_frequency: usize) -> Result<()> {
        self.auto_stopwords
            .write_record([term, &document_frequency.to_string()])
            .map_err(Error::sink)
    }

    fn write_lookup(&mut self, key: &str, term: &str, association: &str) -> Result<()> {
        match &mut self.lookup {
            Some(writer) => writer
                .write_record([key, term, association])
                .map_err(Error::sink),
            None => Ok(()),
        }
    }

    fn finish(&mut self) -> Result<()> {
        let keep = self.keep.flush();
        let auto_stopwords = self.auto_stopwords.flush();
        let lookup = self.lookup.as_mut().map_or(Ok(()), |writer| writer.flush());

        keep.and(auto_stopwords).and(lookup).map_err(Error::sink)
    }
}

/// Collects rows in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorySink {
    pub keep: Vec<(String, String)>,
    pub auto_stopwords: Vec<(String, usize)>,
    pub lookup: Vec<(String, String, String)>,
    pub finished: bool,
}

impl ResultSink for MemorySink {
    fn write_keep(&mut self, term: &str, association: &str) -> Result<()> {
        self.keep.push((term.to_owned(), association.to_owned()));
        Ok(())
    }

    fn write_auto_stopword(&mut self, term: &str, document_frequency: usize) -> Result<()> {
        self.auto_stopwords
            .push((term.to_owned(), document_frequency));
        Ok(())
    }

    fn write_lookup(&mut self, key: &str, term: &str, association: &str) -> Result<()> {
        self.lookup
            .push((key.to_owned(), term.to_owned(), association.to_owned()));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
