//! Sources of [`Document`]s.
//!
//! A loader is an iterator of documents. Any error it yields aborts the run, in contrast to
//! extraction errors which only skip the affected document.

use std::{
    fs::{self, File},
    io::{BufRead, BufReader, Lines},
    path::Path,
};

use thiserror::Error;
use walkdir::WalkDir;

use crate::{Document, Error, Result};

pub trait DocumentLoader: Iterator<Item = Result<Document>> {}

impl<T> DocumentLoader for T where T: Iterator<Item = Result<Document>> {}

#[derive(Debug, Error)]
#[error("malformed record on line {line}")]
struct RecordError {
    line: usize,
    #[source]
    source: serde_json::Error,
}

/// Reads one JSON object per line: `{"id": "...", "title": "...", "html": "..."}`.
///
/// Blank lines are skipped.
pub struct JsonLinesLoader<R> {
    lines: Lines<R>,
    line: usize,
}

impl JsonLinesLoader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(Error::loader)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> JsonLinesLoader<R> {
    pub fn from_reader(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesLoader<R> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(Error::loader(e))),
            };
            self.line += 1;

            if text.trim().is_empty() {
                continue;
            }

            return Some(serde_json::from_str(&text).map_err(|source| {
                Error::loader(RecordError {
                    line: self.line,
                    source,
                })
            }));
        }
    }
}

/// Reads every `.html`/`.htm` file below a directory, in file name order.
///
/// The file stem serves as identifier and title.
pub struct DirectoryLoader {
    entries: walkdir::IntoIter,
}

impl DirectoryLoader {
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(Error::loader(format!("{} is not a directory", dir.display())));
        }

        Ok(Self {
            entries: WalkDir::new(dir).sort_by_file_name().into_iter(),
        })
    }

    fn is_html(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| {
                ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm")
            })
    }
}

impl Iterator for DirectoryLoader {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(Error::loader(e))),
            };

            let path = entry.path();
            if !entry.file_type().is_file() || !Self::is_html(path) {
                continue;
            }

            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            return Some(
                fs::read_to_string(path)
                    .map(|html| Document::new(stem.clone(), stem, Some(html)))
                    .map_err(Error::loader),
            );
        }
    }
}
