//! Document - High-level document API
//!
//! Owns the tree, the well-known `<html>`/`<body>` elements and the native
//! listener table. Listener attachment goes through `&self`, the way script
//! can add listeners while the host is delivering an event.

use std::cell::{Cell, RefCell};

use crate::{DomResult, DomTree, ListenerId, NativeEvent, NodeId, ScrollMetrics};

/// Counters of native listener calls that changed the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub added: usize,
    pub removed: usize,
}

#[derive(Debug)]
struct NativeListener {
    node: NodeId,
    event_type: String,
    id: ListenerId,
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    listeners: RefCell<Vec<NativeListener>>,
    stats: Cell<ListenerStats>,
}

impl Document {
    /// Create a document with `<html>`, `<head>` and `<body>`
    pub fn new() -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes under the document node cannot fail
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html_element: html,
            head_element: head,
            body_element: body,
            listeners: RefCell::new(Vec::new()),
            stats: Cell::new(ListenerStats::default()),
        }
    }

    /// Create an empty document (no structure)
    pub fn empty() -> Self {
        Self {
            tree: DomTree::new(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            listeners: RefCell::new(Vec::new()),
            stats: Cell::new(ListenerStats::default()),
        }
    }

    /// Document node
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get `<head>` element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get `<body>` element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Create an element and append it to `parent`
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> DomResult<NodeId> {
        let id = self.tree.create_element(tag);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Create a text node and append it to `parent`
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> DomResult<NodeId> {
        let id = self.tree.create_text(content);
        self.tree.append_child(parent, id)?;
        Ok(id)
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.set_attribute(id, name, value)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_element_with_id(self.tree.root(), id)
    }

    fn find_element_with_id(&self, start: NodeId, target_id: &str) -> Option<NodeId> {
        for (node_id, node) in self.tree.children(start) {
            if let Some(elem) = node.as_element() {
                if elem.id.as_deref() == Some(target_id) {
                    return Some(node_id);
                }
            }
            if let Some(found) = self.find_element_with_id(node_id, target_id) {
                return Some(found);
            }
        }
        None
    }

    /// Scroll metrics of an element (zero for anything else)
    pub fn metrics(&self, id: NodeId) -> ScrollMetrics {
        self.tree.get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.metrics)
            .unwrap_or_default()
    }

    /// Update the scroll metrics of an element
    pub fn set_metrics(&mut self, id: NodeId, metrics: ScrollMetrics) {
        if let Some(elem) = self.tree.get_mut(id).and_then(|n| n.as_element_mut()) {
            elem.metrics = metrics;
        }
    }

    // === Native listeners ===

    /// Attach a native listener. Returns `false` if the same
    /// (node, type, listener) triple is already attached.
    pub fn add_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let exists = listeners.iter()
            .any(|l| l.node == node && l.id == id && l.event_type == event_type);
        if exists {
            return false;
        }

        listeners.push(NativeListener { node, event_type: event_type.to_string(), id });
        self.bump(|s| s.added += 1);
        tracing::trace!("addEventListener({:?}, {}, {:?})", node, event_type, id);
        true
    }

    /// Detach a native listener. Returns `false` if it was not attached.
    pub fn remove_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|l| !(l.node == node && l.id == id && l.event_type == event_type));
        if listeners.len() == before {
            return false;
        }

        self.bump(|s| s.removed += 1);
        tracing::trace!("removeEventListener({:?}, {}, {:?})", node, event_type, id);
        true
    }

    /// Check if a specific listener is attached
    pub fn has_event_listener(&self, node: NodeId, event_type: &str, id: ListenerId) -> bool {
        self.listeners.borrow().iter()
            .any(|l| l.node == node && l.id == id && l.event_type == event_type)
    }

    /// Number of listeners attached for (node, type)
    pub fn listener_count(&self, node: NodeId, event_type: &str) -> usize {
        self.listeners.borrow().iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .count()
    }

    /// Counters of effective add/remove calls
    pub fn listener_stats(&self) -> ListenerStats {
        self.stats.get()
    }

    fn bump(&self, f: impl FnOnce(&mut ListenerStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn listeners_for(&self, node: NodeId, event_type: &str) -> Vec<ListenerId> {
        self.listeners.borrow().iter()
            .filter(|l| l.node == node && l.event_type == event_type)
            .map(|l| l.id)
            .collect()
    }

    /// Deliver a native event from its target up to the document node.
    ///
    /// `deliver` is called for every attached listener with the node it is
    /// attached to. Delivery stops after the current node once propagation
    /// is stopped. Non-bubbling events only reach the target. Returns
    /// `false` if the default action was prevented.
    pub fn dispatch_event<F>(&self, event: &mut NativeEvent, mut deliver: F) -> bool
    where
        F: FnMut(NodeId, ListenerId, &mut NativeEvent),
    {
        let start = event.target
            .or(event.src_element)
            .unwrap_or_else(|| self.tree.root());

        let mut path: Vec<NodeId> = self.tree.ancestors(start).collect();
        if event.bubbles == Some(false) {
            path.truncate(1);
        }
        tracing::trace!("Dispatching native {} through {} nodes", event.event_type, path.len());

        for node in path {
            event.current_target = Some(node);
            event.event_phase = if node == start { 2 } else { 3 };

            // Listeners added during delivery wait for the next event
            for id in self.listeners_for(node, &event.event_type) {
                deliver(node, id, event);
            }

            if event.is_propagation_stopped() {
                break;
            }
        }

        event.current_target = None;
        event.event_phase = 0;
        !event.is_default_prevented()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_structure() {
        let doc = Document::new();
        assert_eq!(doc.tree().parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.tree().parent(doc.document_element()), Some(doc.root()));
        assert_eq!(doc.tree().len(), 4);
    }

    #[test]
    fn test_get_element_by_id() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "div").unwrap();
        let span = doc.append_element(div, "span").unwrap();
        doc.set_attribute(span, "id", "deep").unwrap();

        assert_eq!(doc.get_element_by_id("deep"), Some(span));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }

    #[test]
    fn test_listener_table_is_idempotent() {
        let doc = Document::new();
        let body = doc.body();

        assert!(doc.add_event_listener(body, "click", ListenerId(1)));
        assert!(!doc.add_event_listener(body, "click", ListenerId(1)));
        assert_eq!(doc.listener_count(body, "click"), 1);

        assert!(doc.remove_event_listener(body, "click", ListenerId(1)));
        assert!(!doc.remove_event_listener(body, "click", ListenerId(1)));
        assert_eq!(doc.listener_stats(), ListenerStats { added: 1, removed: 1 });
    }

    #[test]
    fn test_dispatch_bubbles_to_root() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "div").unwrap();
        doc.add_event_listener(div, "click", ListenerId(1));
        doc.add_event_listener(doc.body(), "click", ListenerId(2));

        let mut seen = Vec::new();
        let mut event = NativeEvent::new("click").with_target(div);
        doc.dispatch_event(&mut event, |node, id, _| seen.push((node, id)));

        assert_eq!(seen, vec![(div, ListenerId(1)), (doc.body(), ListenerId(2))]);
    }

    #[test]
    fn test_dispatch_stops_on_cancel_bubble() {
        let mut doc = Document::new();
        let div = doc.append_element(doc.body(), "div").unwrap();
        doc.add_event_listener(div, "click", ListenerId(1));
        doc.add_event_listener(doc.body(), "click", ListenerId(2));

        let mut seen = Vec::new();
        let mut event = NativeEvent::new("click").with_target(div).legacy();
        doc.dispatch_event(&mut event, |_, id, ev| {
            seen.push(id);
            ev.cancel_bubble = true;
        });

        assert_eq!(seen, vec![ListenerId(1)]);
    }

    #[test]
    fn test_non_bubbling_reaches_target_only() {
        let mut doc = Document::new();
        let input = doc.append_element(doc.body(), "input").unwrap();
        doc.add_event_listener(doc.body(), "focus", ListenerId(9));

        let mut calls = 0;
        let mut event = NativeEvent::new("focus").with_target(input).non_bubbling();
        doc.dispatch_event(&mut event, |_, _, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
