//! Abbreviation lookup built from `<abbreviations>` blocks.

use std::collections::HashMap;

use log::debug;

use crate::xdxf::types::element::Element;

/// Maps an abbreviation keyword to its expansion.
///
/// Each `<abbreviations>` block in a document replaces the table wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbbreviationTable {
    entries: HashMap<String, String>,
}

impl AbbreviationTable {
    /// Builds a table from an `<abbreviations>` element.
    ///
    /// Every `abr_def` child contributes `k` text -> `v` text. Definitions
    /// without a `v` element, or with an empty one, register nothing.
    pub fn from_element(block: &Element) -> Self {
        let mut entries = HashMap::new();
        for def in block
            .children
            .iter()
            .filter(|c| c.name.eq_ignore_ascii_case("abr_def"))
        {
            let value = match def.child_named("v") {
                Some(v) if !v.text.is_empty() => &v.text,
                _ => continue,
            };
            for key in def.children_named("k") {
                entries.insert(key.text.clone(), value.clone());
            }
        }
        debug!("Built abbreviation table with {} entries", entries.len());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
