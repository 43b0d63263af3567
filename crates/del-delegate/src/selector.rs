//! Selector Matching
//!
//! Only three predicates exist: `#id`, a tag name, and a set of classes
//! (`tag.class.class`, `*.class`, `.class`). Anything else is read with the
//! same rules and simply fails to match.

use del_dom::{Document, NodeId};

/// Parsed binding selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `#name`: exact id match, tag and classes are ignored
    Id(String),
    /// `tag.a.b`: optional upper-cased tag plus required classes
    Element {
        tag: Option<String>,
        classes: Vec<String>,
    },
}

impl Selector {
    /// Parse a selector. Never fails; whitespace is removed first.
    pub fn parse(text: &str) -> Self {
        let text = clean(text);

        if let Some(id) = text.strip_prefix('#') {
            return Selector::Id(id.to_string());
        }

        let mut parts = text.split('.');
        let tag = parts.next()
            .filter(|t| !t.is_empty() && *t != "*")
            .map(str::to_ascii_uppercase);
        let classes = parts
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        Selector::Element { tag, classes }
    }

    /// Selector matching every element
    pub fn any() -> Self {
        Selector::Element { tag: None, classes: Vec::new() }
    }

    /// Check whether this selector matches every element
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Selector::Element { tag: None, classes } if classes.is_empty())
    }

    /// Check whether `node` is an element matching this selector
    pub fn matches(&self, document: &Document, node: NodeId) -> bool {
        let Some(elem) = document.tree().get(node).and_then(|n| n.as_element()) else {
            return false;
        };

        match self {
            Selector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
            Selector::Element { tag, classes } => {
                if let Some(tag) = tag {
                    if !elem.tag_name.eq_ignore_ascii_case(tag) {
                        return false;
                    }
                }
                classes.iter().all(|class| elem.has_class(class))
            }
        }
    }
}

/// Remove all whitespace from selector text
pub(crate) fn clean(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
