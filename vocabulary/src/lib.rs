//! This library extracts the informative vocabulary of a corpus of drug package inserts.
//!
//! Every document is stripped of its boilerplate sections, split into tokens (see [`tokenise`]
//! module documentation) and cleaned by an ordered chain of normalisation rules (see
//! [`normalise`] module documentation). The surviving terms are located in the chapters of the
//! document and merged into a corpus wide [`CorpusIndex`] that lists, for every term, the
//! documents and chapters it occurs in.
//!
//! Once the corpus is indexed, terms found in too many documents are classified as
//! automatically discovered stop words; the rest are kept as keywords. [`Pipeline`] drives a
//! whole run from a [`loader::DocumentLoader`] to a [`sink::ResultSink`].

pub mod aggregate;
pub mod analyse;
pub mod chapter;
pub mod classify;
pub mod config;
pub mod digest;
pub mod extract;
pub mod lexicon;
pub mod loader;
pub mod normalise;
pub mod pipeline;
pub mod sink;
pub mod strip;
pub mod tokenise;

mod document;
mod error;

pub use aggregate::CorpusIndex;
pub use chapter::ChapterMap;
pub use classify::{Classification, StopwordClassifier};
pub use config::{Config, Language};
pub use document::Document;
pub use error::{BoxError, Error, ExtractionError, Result};
pub use extract::{DocumentTerms, Extractor};
pub use lexicon::Lexicon;
pub use pipeline::{Pipeline, RunReport};
pub use sink::ResultSink;
