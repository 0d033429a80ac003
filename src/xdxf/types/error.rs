//! Custom error types for the xdxf-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum XdxfError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The input is not well-formed markup.
    #[error("XML syntax error at byte {position:?}: {message}")]
    Syntax {
        message: String,
        position: Option<u64>,
    },

    /// The stream ended while elements were still open.
    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    /// The stream contained no root element at all.
    #[error("Document has no root element")]
    EmptyDocument,

    /// Data could not be decoded or rendered.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// The storage collaborator refused a tag or an article.
    #[error("Sink rejected record: {0}")]
    Sink(String),
}

/// A convenience `Result` type alias using the crate's `XdxfError` type.
pub type Result<T> = std::result::Result<T, XdxfError>;
