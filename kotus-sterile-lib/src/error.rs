use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The common error type used by this crate
#[derive(Error, Debug)]
pub enum SterileError {
    /// An entry lacks its headword or carries unusable category data
    #[error("Malformed entry #{index}: {reason}")]
    MalformedEntry { index: usize, reason: String },

    /// A corpus, report or taxonomy file could not be read or written
    #[error("I/O failed on {}: {source}", .path.display())]
    CorpusIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The corpus document is not a well-formed word list
    #[error("Invalid corpus document {}: {message}", .path.display())]
    CorpusFormat { path: PathBuf, message: String },

    /// The taxonomy defines no excluded, noun or verb codes at all
    #[error("Category taxonomy is empty: no excluded, noun or verb codes configured")]
    EmptyCategoryList,

    /// A category code was assigned to more than one set
    #[error("Category code {code} appears in more than one category set")]
    OverlappingCategories { code: u16 },

    /// The threshold sequence cannot drive a run
    #[error("Invalid thresholds: {0}")]
    InvalidThresholds(String),

    /// A run would write one of its artifacts over its own source corpus
    #[error("Refusing to overwrite source corpus {} with its filtered copy", .path.display())]
    SourceOverwrite { path: PathBuf },

    /// A taxonomy file could not be parsed
    #[error("Invalid taxonomy file {}: {message}", .path.display())]
    Taxonomy { path: PathBuf, message: String },
}

impl SterileError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SterileError::CorpusIo {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SterileError> = std::result::Result<T, E>;
