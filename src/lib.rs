//! # xdxf-reader
//!
//! A streaming reader for XDXF dictionaries. It turns a dictionary into
//! metadata tags and HTML articles keyed by every spelling of their title,
//! ready to be handed to a dictionary storage layer.
//!
//! Memory use is bounded by the largest article: elements are released as
//! soon as they have been converted.
pub mod xdxf;

// Re-export the main types for convenience
pub use xdxf::{
    format::abbreviations::AbbreviationTable,
    format::transform::ElementTransformer,
    sink::{convert, ConvertSummary, DictionarySink, MemorySink, SourceMeta},
    types::{
        element::Element,
        models::{Content, ConvertOptions, Record, Tag, ARTICLE_CONTENT_TYPE},
    },
    Result, XdxfError, XdxfReader,
};
