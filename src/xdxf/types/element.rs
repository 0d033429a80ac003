//! Owned markup tree for a single completed element.

/// A generic markup node.
///
/// `text` is the character data before the first child; every child carries
/// the character data that follows it in `tail`. Cloning produces a fully
/// independent copy of the subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub tail: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder helper that sets the leading text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Builder helper that sets the trailing text.
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = tail.into();
        self
    }

    /// Builder helper that sets an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder helper that appends a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Value of the attribute `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing the value if the key already exists.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Direct children with the given tag name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First direct child with the given tag name.
    pub fn child_named(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Appends character data at the current end of this element's content.
    pub(crate) fn append_text(&mut self, data: &str) {
        match self.children.last_mut() {
            Some(last) => last.tail.push_str(data),
            None => self.text.push_str(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let original = Element::new("ar")
            .with_child(Element::new("k").with_text("cat").with_tail("\n"));
        let mut copy = original.clone();
        copy.children[0].name = "div".to_string();
        copy.children[0].set("class", "k");
        copy.text.push_str("changed");

        assert_eq!(original.children[0].name, "k");
        assert_eq!(original.children[0].get("class"), None);
        assert_eq!(original.text, "");
    }

    #[test]
    fn child_named_finds_first_match() {
        let e = Element::new("abr_def")
            .with_child(Element::new("k").with_text("n."))
            .with_child(Element::new("v").with_text("noun"))
            .with_child(Element::new("v").with_text("second"));
        let name = String::from("v");
        assert_eq!(e.child_named(&name).map(|v| v.text.as_str()), Some("noun"));
        assert!(e.child_named("missing").is_none());
    }

    #[test]
    fn set_replaces_existing_attribute() {
        let mut e = Element::new("span").with_attribute("class", "a");
        e.set("class", "b");
        assert_eq!(e.attributes, vec![("class".to_string(), "b".to_string())]);
    }

    #[test]
    fn text_goes_to_last_child_tail() {
        let mut e = Element::new("k");
        e.append_text("cat");
        e.children.push(Element::new("opt"));
        e.append_text("s");
        assert_eq!(e.text, "cat");
        assert_eq!(e.children[0].tail, "s");
    }
}
