//! Streaming XDXF reader.
//!
//! The reader pulls markup events from the input one at a time and builds
//! a tree only for the element currently open. When a recognized element
//! closes it is handled and released immediately, so peak memory stays
//! around the size of the largest article.
//!
//! Recognized elements:
//! - `description` -> `copyright` tag
//! - `full_name` -> `label` and `uri` tags
//! - `abbreviations` -> replaces the abbreviation table
//! - `ar` -> one [`Content`] record (or a warning when it has no title)
//! - the document root -> `lang_to` and `lang_from` tags, when it closes

use std::collections::VecDeque;
use std::io::BufRead;
use std::iter::FusedIterator;

use log::{debug, info, trace, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::format::abbreviations::AbbreviationTable;
use super::format::entities::EntityTable;
use super::format::serialize;
use super::format::titles;
use super::format::transform::ElementTransformer;
use super::types::element::Element;
use super::types::error::{Result, XdxfError};
use super::types::models::{Content, ConvertOptions, Record, Tag, ARTICLE_CONTENT_TYPE};
use super::utils;

/// Pull-based reader yielding [`Record`]s in document order.
///
/// Iteration is lazy: no input is consumed until the next record is
/// requested. The first error ends the stream.
pub struct XdxfReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open elements, outermost first.
    stack: Vec<Element>,
    /// Records produced by the last event but not yet handed out.
    pending: VecDeque<Record>,
    abbreviations: AbbreviationTable,
    /// Entities declared in the DOCTYPE, if any.
    entities: EntityTable,
    transformer: ElementTransformer,
    seen_root: bool,
    /// Set after a handled element is released; drops its trailing text.
    discard_tail: bool,
    finished: bool,
    articles: u64,
    skipped_articles: u64,
}

impl<R: BufRead> XdxfReader<R> {
    /// Creates a reader over a buffered byte stream holding one document.
    pub fn new(input: R, options: ConvertOptions) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(false);

        Self {
            reader,
            buf: Vec::with_capacity(8192),
            stack: Vec::new(),
            pending: VecDeque::new(),
            abbreviations: AbbreviationTable::default(),
            entities: EntityTable::default(),
            transformer: ElementTransformer::new(options),
            seen_root: false,
            discard_tail: false,
            finished: false,
            articles: 0,
            skipped_articles: 0,
        }
    }

    /// Rendering options the reader was created with.
    pub fn options(&self) -> ConvertOptions {
        self.transformer.options()
    }

    /// The abbreviation table currently in effect.
    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    /// Number of articles emitted so far.
    pub fn articles(&self) -> u64 {
        self.articles
    }

    /// Number of articles dropped so far because they had no title.
    pub fn skipped_articles(&self) -> u64 {
        self.skipped_articles
    }

    /// Reads and handles exactly one markup event.
    fn advance(&mut self) -> Result<()> {
        let mut buf = std::mem::take(&mut self.buf);
        let result = self.handle_next_event(&mut buf);
        buf.clear();
        self.buf = buf;
        result
    }

    fn handle_next_event(&mut self, buf: &mut Vec<u8>) -> Result<()> {
        let event = self
            .reader
            .read_event_into(buf)
            .map_err(|e| XdxfError::Syntax {
                message: e.to_string(),
                position: Some(self.reader.error_position()),
            })?;

        match event {
            Event::Start(e) => {
                let element = self.open_element(&e)?;
                self.discard_tail = false;
                self.stack.push(element);
            }
            Event::Empty(e) => {
                let element = self.open_element(&e)?;
                self.discard_tail = false;
                self.close_element(element)?;
            }
            Event::End(e) => {
                let element = self.stack.pop().ok_or_else(|| XdxfError::Syntax {
                    message: format!(
                        "Unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ),
                    position: Some(self.reader.buffer_position()),
                })?;
                self.discard_tail = false;
                self.close_element(element)?;
            }
            Event::Text(e) => {
                let entities = &self.entities;
                let text = e
                    .unescape_with(|name| entities.resolve(name))
                    .map_err(|err| self.syntax_error(err))?
                    .into_owned();
                self.append_text(&text)?;
            }
            Event::CData(e) => {
                let text = self
                    .reader
                    .decoder()
                    .decode(&*e)
                    .map_err(|err| self.syntax_error(err))?
                    .into_owned();
                self.append_text(&text)?;
            }
            Event::DocType(e) => {
                let doctype = self
                    .reader
                    .decoder()
                    .decode(&*e)
                    .map_err(|err| self.syntax_error(err))?;
                self.entities = EntityTable::from_doctype(&doctype);
            }
            Event::Comment(_) | Event::PI(_) | Event::Decl(_) => {}
            Event::Eof => self.finish()?,
        }
        Ok(())
    }

    fn open_element(&mut self, start: &BytesStart<'_>) -> Result<Element> {
        if self.stack.is_empty() {
            if self.seen_root {
                return Err(self.syntax_error("junk after document element"));
            }
            self.seen_root = true;
        }

        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.map_err(|e| self.syntax_error(e))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .decode_and_unescape_value_with(self.reader.decoder(), |name| {
                    self.entities.resolve(name)
                })
                .map_err(|e| self.syntax_error(e))?
                .into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    /// Handles a completed element, then either releases it or attaches it
    /// to its parent.
    fn close_element(&mut self, element: Element) -> Result<()> {
        let released = match element.name.as_str() {
            "description" => {
                self.emit_tag("copyright", element.text.clone());
                true
            }
            "full_name" => {
                let label = element.text.clone();
                let uri = utils::encode_uri_component(&label);
                self.emit_tag("label", label);
                self.emit_tag("uri", uri);
                true
            }
            "abbreviations" => {
                self.abbreviations = AbbreviationTable::from_element(&element);
                true
            }
            "ar" => {
                self.finish_article(&element)?;
                true
            }
            _ => false,
        };

        if self.stack.is_empty() {
            self.finish_root(&element);
        } else if released {
            self.discard_tail = true;
        } else if let Some(parent) = self.stack.last_mut() {
            parent.children.push(element);
        }
        Ok(())
    }

    fn finish_root(&mut self, root: &Element) {
        let lang_to = root.get("lang_to").unwrap_or_default().to_string();
        let lang_from = root.get("lang_from").unwrap_or_default().to_string();
        self.emit_tag("lang_to", lang_to);
        self.emit_tag("lang_from", lang_from);
    }

    fn finish_article(&mut self, article: &Element) -> Result<()> {
        let keys = titles::expand_article(article);
        if keys.is_empty() {
            let raw = serialize::to_markup(article)?;
            warn!(
                "No title found in article:\n{}",
                String::from_utf8_lossy(&raw)
            );
            self.skipped_articles += 1;
            return Ok(());
        }

        let body = self.transformer.render(article.clone(), &self.abbreviations)?;
        trace!(
            "Article {:?}: {} keys, {} bytes",
            keys[0],
            keys.len(),
            body.len()
        );
        self.articles += 1;
        self.pending.push_back(Record::Content(Content {
            body,
            keys,
            content_type: ARTICLE_CONTENT_TYPE,
        }));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(open) = self.stack.last() {
            return Err(XdxfError::UnexpectedEof {
                expected: format!("closing tag </{}>", open.name),
            });
        }
        if !self.seen_root {
            return Err(XdxfError::EmptyDocument);
        }
        self.finished = true;
        info!(
            "XDXF stream finished: {} articles, {} skipped without title",
            self.articles, self.skipped_articles
        );
        Ok(())
    }

    /// Attaches character data to the open element. Outside the document
    /// element only whitespace is allowed.
    fn append_text(&mut self, text: &str) -> Result<()> {
        if self.stack.is_empty() {
            if text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n')) {
                return Ok(());
            }
            let message = if self.seen_root {
                "junk after document element"
            } else {
                "text before document element"
            };
            return Err(self.syntax_error(message));
        }
        if self.discard_tail {
            return Ok(());
        }
        if let Some(current) = self.stack.last_mut() {
            current.append_text(text);
        }
        Ok(())
    }

    fn emit_tag(&mut self, name: &str, value: String) {
        debug!("Tag {} = {:?}", name, value);
        self.pending.push_back(Record::Tag(Tag::new(name, value)));
    }

    fn syntax_error(&self, e: impl std::fmt::Display) -> XdxfError {
        XdxfError::Syntax {
            message: e.to_string(),
            position: Some(self.reader.buffer_position()),
        }
    }
}

impl<R: BufRead> Iterator for XdxfReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if self.finished {
                return None;
            }
            if let Err(e) = self.advance() {
                self.finished = true;
                self.stack.clear();
                return Some(Err(e));
            }
        }
    }
}

impl<R: BufRead> FusedIterator for XdxfReader<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn read_all(xml: &str) -> Vec<Record> {
        XdxfReader::new(xml.as_bytes(), ConvertOptions::default())
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn released_articles_are_not_kept_in_parent() {
        let xml = "<xdxf><lexicon>\n<ar><k>a</k></ar>\n<ar><k>b</k></ar>\n</lexicon></xdxf>";
        let mut reader = XdxfReader::new(xml.as_bytes(), ConvertOptions::default());
        let first = reader.next().unwrap().unwrap();
        assert!(matches!(first, Record::Content(_)));
        assert_eq!(reader.stack.len(), 2);
        assert!(reader.stack[1].children.is_empty());
        assert_eq!(reader.stack[1].text, "\n");
        let rest: Vec<_> = reader.by_ref().collect();
        assert_eq!(rest.len(), 3);
        assert!(reader.stack.is_empty());
    }

    #[test]
    fn root_tags_come_when_root_closes() {
        let records = read_all(r#"<xdxf lang_from="ENG" lang_to="RUS"><ar><k>x</k></ar></xdxf>"#);
        assert!(matches!(records[0], Record::Content(_)));
        assert_eq!(records[1], Record::Tag(Tag::new("lang_to", "RUS")));
        assert_eq!(records[2], Record::Tag(Tag::new("lang_from", "ENG")));
    }

    #[test]
    fn missing_language_attributes_are_empty() {
        let records = read_all("<xdxf/>");
        assert_eq!(
            records,
            vec![
                Record::Tag(Tag::new("lang_to", "")),
                Record::Tag(Tag::new("lang_from", "")),
            ]
        );
    }

    #[test]
    fn unrecognized_elements_stay_in_article() {
        let records = read_all("<xdxf><ar><k>x</k> <b>bold</b> &amp; more</ar></xdxf>");
        match &records[0] {
            Record::Content(content) => {
                let body = content.body_text();
                assert!(body.contains("<b>bold</b> &amp; more"), "{}", body);
            }
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn cdata_is_text() {
        let records = read_all("<xdxf><ar><k><![CDATA[a<b]]></k></ar></xdxf>");
        match &records[0] {
            Record::Content(content) => assert_eq!(content.keys, vec!["a<b"]),
            other => panic!("expected content, got {:?}", other),
        }
    }

    fn first_error(xml: &str) -> Option<XdxfError> {
        XdxfReader::new(xml.as_bytes(), ConvertOptions::default()).find_map(|r| r.err())
    }

    #[test]
    fn text_after_root_is_an_error() {
        let mut reader = XdxfReader::new(
            "<xdxf><ar><k>a</k></ar></xdxf>trailing junk".as_bytes(),
            ConvertOptions::default(),
        );
        let results: Vec<_> = reader.by_ref().collect();
        match results.last() {
            Some(Err(XdxfError::Syntax { message, .. })) => {
                assert!(message.contains("junk after document element"), "{}", message)
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn text_before_root_is_an_error() {
        let error = first_error("stray <xdxf><ar><k>a</k></ar></xdxf>");
        assert!(matches!(error, Some(XdxfError::Syntax { .. })), "{:?}", error);
    }

    #[test]
    fn whitespace_around_root_is_allowed() {
        let records = read_all("<?xml version=\"1.0\"?>\n<xdxf><ar><k>a</k></ar></xdxf>\n\n");
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn doctype_entities_are_expanded() {
        let records = read_all(concat!(
            r#"<!DOCTYPE xdxf [<!ENTITY rarr "->"> <!ENTITY src "OED">]>"#,
            r#"<xdxf><ar><k>a&rarr;b</k><kref title="&src;">c</kref> &amp; d</ar></xdxf>"#,
        ));
        match &records[0] {
            Record::Content(content) => {
                assert_eq!(content.keys, vec!["a->b"]);
                let body = content.body_text();
                assert!(body.contains("title=\"OED\""), "{}", body);
                assert!(body.contains("&amp; d"), "{}", body);
            }
            other => panic!("expected content, got {:?}", other),
        }
    }

    #[test]
    fn undeclared_entity_is_an_error() {
        let error = first_error("<xdxf><ar><k>a&rarr;b</k></ar></xdxf>");
        assert!(matches!(error, Some(XdxfError::Syntax { .. })), "{:?}", error);
    }

    #[test]
    fn second_root_is_an_error() {
        let results: Vec<_> =
            XdxfReader::new("<a/><b/>".as_bytes(), ConvertOptions::default()).collect();
        assert!(results.iter().any(|r| matches!(r, Err(XdxfError::Syntax { .. }))));
    }
}
