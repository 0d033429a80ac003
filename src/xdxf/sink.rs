//! Hand-off of records to a dictionary storage layer.
//!
//! The storage container itself (compression, indexing, bin packing) lives
//! outside this crate. [`DictionarySink`] is the seam it plugs into;
//! [`MemorySink`] is a simple in-process implementation.

use std::collections::HashMap;
use std::io::BufRead;

use log::{debug, info};

use super::reader::XdxfReader;
use super::types::error::{Result, XdxfError};
use super::types::models::{Content, Record};

const PROGRESS_INTERVAL: usize = 5000;

/// Receiver of converted records.
pub trait DictionarySink {
    /// Stores a metadata tag. Repeated names overwrite earlier values.
    fn tag(&mut self, name: &str, value: &str) -> Result<()>;

    /// Stores an article, indexed under every one of its keys.
    fn add(&mut self, content: Content) -> Result<()>;
}

/// Tags supplied by the caller rather than read from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMeta {
    /// Base name of the input file.
    pub source: String,
    pub created_by: String,
    pub license_name: String,
    pub license_url: String,
}

/// Counts reported by [`convert`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Tags read from the document.
    pub tags: u64,
    pub articles: u64,
    /// Articles dropped because they had no title.
    pub skipped: u64,
}

/// Streams a whole dictionary into `sink`.
///
/// The caller-provided tags are written first, with empty placeholders for
/// the ones the document may override later.
pub fn convert<R, S>(mut reader: XdxfReader<R>, sink: &mut S, meta: &SourceMeta) -> Result<ConvertSummary>
where
    R: BufRead,
    S: DictionarySink + ?Sized,
{
    info!("Converting XDXF dictionary: source={}", meta.source);
    let defaults = [
        ("label", ""),
        ("license.name", meta.license_name.as_str()),
        ("license.url", meta.license_url.as_str()),
        ("source", meta.source.as_str()),
        ("uri", ""),
        ("copyright", ""),
        ("created.by", meta.created_by.as_str()),
    ];
    for (name, value) in defaults {
        sink.tag(name, value)?;
    }

    let mut summary = ConvertSummary::default();
    for (i, record) in reader.by_ref().enumerate() {
        if i > 0 && i % PROGRESS_INTERVAL == 0 {
            info!("Processed {} records", i);
        }
        match record? {
            Record::Tag(tag) => {
                sink.tag(&tag.name, &tag.value)?;
                summary.tags += 1;
            }
            Record::Content(content) => {
                sink.add(content)?;
                summary.articles += 1;
            }
        }
    }
    summary.skipped = reader.skipped_articles();

    info!(
        "Conversion done: {} tags, {} articles, {} skipped",
        summary.tags, summary.articles, summary.skipped
    );
    Ok(summary)
}

/// Keeps everything in memory. Useful for inspection and tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    tags: HashMap<String, String>,
    contents: Vec<Content>,
    index: HashMap<String, Vec<usize>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.tags.get(name).map(String::as_str)
    }

    pub fn tags(&self) -> &HashMap<String, String> {
        &self.tags
    }

    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// All articles indexed under `key`, in insertion order.
    pub fn lookup<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Content> + 'a {
        self.index
            .get(key)
            .into_iter()
            .flatten()
            .map(move |&i| &self.contents[i])
    }

    /// Total number of keys over all articles, duplicates included.
    pub fn key_count(&self) -> usize {
        self.contents.iter().map(|c| c.keys.len()).sum()
    }
}

impl DictionarySink for MemorySink {
    fn tag(&mut self, name: &str, value: &str) -> Result<()> {
        self.tags.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn add(&mut self, content: Content) -> Result<()> {
        if content.keys.is_empty() {
            return Err(XdxfError::Sink("article has no keys".to_string()));
        }
        let position = self.contents.len();
        for key in &content.keys {
            let slots = self.index.entry(key.clone()).or_default();
            // Identical variants of one article are indexed once.
            if slots.last() != Some(&position) {
                slots.push(position);
            }
        }
        debug!("Stored article {:?} under {} keys", content.keys[0], content.keys.len());
        self.contents.push(content);
        Ok(())
    }
}
