//! General entities declared in a document's internal DTD subset.

use std::collections::HashMap;

use log::debug;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};

/// Replacement text for `&name;` references, keyed by entity name.
///
/// Only internal general entities are collected. Parameter entities and
/// external (`SYSTEM`/`PUBLIC`) entities are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityTable {
    entries: HashMap<String, String>,
}

impl EntityTable {
    /// Scans the content of a `<!DOCTYPE ...>` declaration for
    /// `<!ENTITY name "value">` declarations.
    ///
    /// Character references in a value are expanded, and so are references
    /// to entities declared earlier. The first declaration of a name wins.
    pub fn from_doctype(doctype: &str) -> Self {
        let mut table = Self::default();
        let mut rest = doctype;

        while let Some(start) = rest.find("<!ENTITY") {
            rest = &rest[start + "<!ENTITY".len()..];
            let decl = rest.trim_start();

            if decl.starts_with('%') {
                continue;
            }
            let name_len = decl
                .find(|c: char| c.is_whitespace() || c == '"' || c == '\'')
                .unwrap_or(decl.len());
            let (name, after_name) = decl.split_at(name_len);
            let after_name = after_name.trim_start();

            let quote = match after_name.chars().next() {
                Some(q @ ('"' | '\'')) => q,
                _ => continue,
            };
            let body = &after_name[1..];
            let Some(end) = body.find(quote) else {
                break;
            };
            table.declare(name, &body[..end]);
            rest = &body[end + 1..];
        }

        if !table.is_empty() {
            debug!("Collected {} DTD entities", table.len());
        }
        table
    }

    fn declare(&mut self, name: &str, raw: &str) {
        if name.is_empty() || self.entries.contains_key(name) {
            return;
        }
        let value = unescape_with(raw, |n| self.resolve(n))
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        self.entries.insert(name.to_string(), value);
    }

    /// Replacement text for `name`, including the five predefined entities.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        resolve_predefined_entity(name).or_else(|| self.entries.get(name).map(String::as_str))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_entities_are_collected() {
        let table = EntityTable::from_doctype(
            r#" xdxf [ <!ENTITY rarr "->"> <!ENTITY  nbsp '&#160;'> ]"#,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("rarr"), Some("->"));
        assert_eq!(table.resolve("nbsp"), Some("\u{a0}"));
        assert_eq!(table.resolve("amp"), Some("&"));
        assert_eq!(table.resolve("missing"), None);
    }

    #[test]
    fn parameter_and_external_entities_are_skipped() {
        let table = EntityTable::from_doctype(
            r#" xdxf [ <!ENTITY % common "x"> <!ENTITY ext SYSTEM "ext.xml"> <!ENTITY ok "y"> ]"#,
        );
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve("ok"), Some("y"));
        assert_eq!(table.resolve("ext"), None);
    }

    #[test]
    fn earlier_entities_expand_in_later_values() {
        let table = EntityTable::from_doctype(
            r#" d [ <!ENTITY a "A"> <!ENTITY b "&a;&a;"> <!ENTITY a "ignored"> ]"#,
        );
        assert_eq!(table.resolve("a"), Some("A"));
        assert_eq!(table.resolve("b"), Some("AA"));
    }

    #[test]
    fn doctype_without_subset_is_empty() {
        assert!(EntityTable::from_doctype(" xdxf SYSTEM \"xdxf.dtd\"").is_empty());
    }
}
