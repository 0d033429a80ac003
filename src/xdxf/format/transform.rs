//! Rewriting of XDXF article markup into HTML.
//!
//! Each element is handed to a handler chosen by its lower-cased tag name.
//! Tags without a dedicated handler fall back to [`default_handler`], which
//! turns the visual XDXF tags into class-bearing `div`/`span` containers
//! and leaves everything else untouched.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::abbreviations::AbbreviationTable;
use super::serialize;
use crate::xdxf::types::element::Element;
use crate::xdxf::types::error::Result;
use crate::xdxf::types::models::{ConvertOptions, ARTICLE_TEMPLATE_PREFIX};

/// XDXF tags rendered as generic containers carrying their name as class.
pub const VISUAL_TAGS: &[&str] = &[
    "ar", "k", "opt", "nu", "def", "pos", "tense", "tr", "dtrn", "kref", "rref", "iref", "abr",
    "c", "ex", "co", "su",
];

/// Visual tags rendered as `div` instead of `span`.
pub const BLOCK_TAGS: &[&str] = &["k"];

type TagHandler = fn(&mut Element, &AbbreviationTable);

static TAG_HANDLERS: Lazy<HashMap<&'static str, TagHandler>> = Lazy::new(|| {
    HashMap::from([
        ("ar", handle_ar as TagHandler),
        ("c", handle_c as TagHandler),
        ("iref", handle_iref as TagHandler),
        ("kref", handle_kref as TagHandler),
        ("su", handle_su as TagHandler),
        ("def", handle_def as TagHandler),
        ("abr", handle_abr as TagHandler),
    ])
});

/// Renders articles according to the configured [`ConvertOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementTransformer {
    options: ConvertOptions,
}

impl ElementTransformer {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Rewrites an article in place.
    ///
    /// Every element, the root included, is visited exactly once in
    /// pre-order.
    pub fn transform(&self, article: &mut Element, abbreviations: &AbbreviationTable) {
        if self.options.skip_article_title {
            strip_titles(article);
        }
        transform_tree(article, abbreviations);
    }

    /// Rewrites an article and renders it into the article template.
    ///
    /// Takes ownership so the caller must pass an independent copy when the
    /// original tree is still needed.
    pub fn render(&self, mut article: Element, abbreviations: &AbbreviationTable) -> Result<Vec<u8>> {
        self.transform(&mut article, abbreviations);
        let markup = serialize::to_markup(&article)?;

        let mut body = Vec::with_capacity(ARTICLE_TEMPLATE_PREFIX.len() + markup.len());
        body.extend_from_slice(ARTICLE_TEMPLATE_PREFIX.as_bytes());
        if self.options.remove_newline {
            body.extend(markup.iter().map(|&b| if b == b'\n' { b' ' } else { b }));
        } else {
            body.extend_from_slice(&markup);
        }
        Ok(body)
    }
}

/// Removes the article's `k` children, moving their tails to the front of
/// the article's leading text.
fn strip_titles(article: &mut Element) {
    let mut tails = String::new();
    article.children.retain(|child| {
        if child.name == "k" {
            tails.push_str(&child.tail);
            false
        } else {
            true
        }
    });
    article.text = format!("{}{}", tails.trim_start(), article.text);
}

fn transform_tree(element: &mut Element, abbreviations: &AbbreviationTable) {
    dispatch(element, abbreviations);
    for child in &mut element.children {
        transform_tree(child, abbreviations);
    }
}

fn dispatch(element: &mut Element, abbreviations: &AbbreviationTable) {
    let handler = TAG_HANDLERS
        .get(element.name.to_ascii_lowercase().as_str())
        .copied()
        .unwrap_or(default_handler as TagHandler);
    handler(element, abbreviations);
}

fn handle_ar(e: &mut Element, _: &AbbreviationTable) {
    let class = std::mem::replace(&mut e.name, "div".to_string());
    e.set("class", class);
}

fn handle_c(e: &mut Element, _: &AbbreviationTable) {
    e.name = "span".to_string();
    let color = e.get("c").unwrap_or_default().to_string();
    e.attributes.clear();
    if !color.is_empty() {
        e.set("style", format!("color: {};", color));
    }
}

fn handle_iref(e: &mut Element, _: &AbbreviationTable) {
    e.name = "a".to_string();
}

fn handle_kref(e: &mut Element, _: &AbbreviationTable) {
    e.name = "a".to_string();
    let target = e.text.clone();
    e.set("href", target);
}

fn handle_su(e: &mut Element, _: &AbbreviationTable) {
    e.name = "div".to_string();
    e.set("class", "su");
}

fn handle_def(e: &mut Element, _: &AbbreviationTable) {
    e.name = "blockquote".to_string();
}

fn handle_abr(e: &mut Element, abbreviations: &AbbreviationTable) {
    e.name = "abbr".to_string();
    if let Some(expansion) = abbreviations.get(&e.text) {
        e.set("title", expansion);
    }
}

fn default_handler(e: &mut Element, _: &AbbreviationTable) {
    if !VISUAL_TAGS.contains(&e.name.as_str()) {
        return;
    }
    let container = if BLOCK_TAGS.contains(&e.name.as_str()) { "div" } else { "span" };
    let class = std::mem::replace(&mut e.name, container.to_string());
    e.set("class", class);
}
