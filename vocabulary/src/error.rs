use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed cause of a loader or sink failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error that can be returned by the extraction pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    /// A single document could not be processed. The pipeline skips such documents.
    #[error("failed to extract document {document:?}")]
    Extraction {
        document: String,
        #[source]
        source: ExtractionError,
    },

    /// The document loader failed. Aborts the run.
    #[error("document loader failed")]
    Loader(#[source] BoxError),

    /// The result sink failed. Aborts the run.
    #[error("result sink failed")]
    Sink(#[source] BoxError),

    /// Configuration values that cannot be used.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Configuration file that cannot be parsed.
    #[error("failed to parse configuration file")]
    ConfigFile(#[from] toml::de::Error),

    /// Lexicon file that cannot be read.
    #[error("failed to read lexicon {}", path.display())]
    Lexicon {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O errors.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Regex compilation errors.
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    pub fn loader<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Loader(error.into())
    }

    pub fn sink<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Error::Sink(error.into())
    }

    /// Whether the error only concerns one document.
    pub fn is_document_level(&self) -> bool {
        matches!(self, Error::Extraction { .. })
    }
}

/// Reason a document was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A node the removal policy marks as required is absent.
    #[error("required node `{selector}` is missing")]
    MissingNode { selector: String },

    /// The document carries no usable identifier.
    #[error("document has no identifier")]
    MissingId,
}
