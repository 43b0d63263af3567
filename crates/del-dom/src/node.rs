//! DOM Node
//!
//! Nodes link to their relatives by `NodeId` instead of pointers, so the
//! whole tree lives in one arena.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::with_data(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::with_data(NodeData::Text(content.to_string()))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::with_data(NodeData::Comment(content.to_string()))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_data(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
}

/// Scroll and border offsets of an element.
///
/// Only the document element and the body are consulted when deriving page
/// coordinates from client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub client_left: f64,
    pub client_top: f64,
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Tag name, upper-cased like HTML `tagName`
    pub tag_name: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute
    pub id: Option<String>,
    /// Cached class attribute (raw, space separated)
    pub class_name: String,
    /// Scroll metrics
    pub metrics: ScrollMetrics,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag_name: tag.to_ascii_uppercase(),
            attrs: Vec::new(),
            id: None,
            class_name: String::new(),
            metrics: ScrollMetrics::default(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping the id/class caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = Some(value.to_string()),
            "class" => self.class_name = value.to_string(),
            _ => {}
        }

        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
            return;
        }
        self.attrs.push(Attribute { name, value: value.to_string() });
    }

    /// Check whether `class` is one of the whitespace-delimited class tokens
    pub fn has_class(&self, class: &str) -> bool {
        !class.is_empty() && self.class_name.split_whitespace().any(|t| t == class)
    }
}

/// Attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
