//! Error types for the genemodel library.

use thiserror::Error;

/// Errors that can occur while building gene models.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A parse error occurred while reading input data.
    #[error("{0}")]
    Parse(String),

    /// A validation constraint was violated.
    #[error("{0}")]
    Validation(String),

    /// A record arrived without the record it depends on (e.g. an exon with no
    /// open transcript). The assembler cannot resume after this.
    #[error("malformed record order: {0}")]
    MalformedRecordOrder(String),
}
