//! Records produced by the reader and the settings that shape them.

/// Content type attached to every rendered article.
pub const ARTICLE_CONTENT_TYPE: &str = "text/html;charset=utf-8";

/// Markup placed in front of every rendered article.
///
/// The script and stylesheets are referenced by the `~/` prefix under which
/// the storage layer bundles its static assets.
pub const ARTICLE_TEMPLATE_PREFIX: &str = concat!(
    r#"<script src="~/js/styleswitcher.js"></script>"#,
    r#"<link rel="stylesheet" href="~/css/default.css" type="text/css">"#,
    r#"<link rel="alternate stylesheet" href="~/css/night.css" type="text/css" title="Night">"#,
);

/// Whole-document metadata (label, uri, languages, copyright).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One rendered article together with every key it can be looked up by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    /// UTF-8 encoded HTML.
    pub body: Vec<u8>,
    /// Never empty.
    pub keys: Vec<String>,
    pub content_type: &'static str,
}

impl Content {
    /// Returns the body as text. Bodies are always produced as UTF-8.
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// A record of the stream, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Tag(Tag),
    Content(Content),
}

/// Rendering switches for articles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Move the article's `k` elements out of the rendered body.
    ///
    /// Some dictionaries already repeat the headword in the article text.
    pub skip_article_title: bool,
    /// Replace every newline in the rendered body with a space.
    pub remove_newline: bool,
}

impl ConvertOptions {
    pub fn with_skip_article_title(mut self, skip: bool) -> Self {
        self.skip_article_title = skip;
        self
    }

    pub fn with_remove_newline(mut self, remove: bool) -> Self {
        self.remove_newline = remove;
        self
    }
}
