//! Binding Registry
//!
//! One entry per container node. An entry owns the node's native listener
//! handle and, per canonical event, the ordered bindings registered on it.
//! A canonical event has a list exactly while its native listener is
//! attached.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use del_dom::{Document, ListenerId, NodeId};

use crate::selector::clean;
use crate::{Handler, Selector, Taxonomy};

static NEXT_LISTENER: AtomicU64 = AtomicU64::new(1);

/// One registered (event, selector, handler) rule on a container
#[derive(Debug)]
pub(crate) struct Binding {
    /// Name as registered, before canonicalization
    pub event_name: String,
    /// Selector text with whitespace removed
    pub selector_text: String,
    pub selector: Selector,
    pub handler: Handler,
    enabled: Cell<bool>,
    removed: Cell<bool>,
}

impl Binding {
    pub fn new(event_name: String, selector_text: String, handler: Handler) -> Self {
        Self {
            selector: Selector::parse(&selector_text),
            event_name,
            selector_text,
            handler,
            enabled: Cell::new(true),
            removed: Cell::new(false),
        }
    }

    /// Enabled and still registered
    pub fn is_live(&self) -> bool {
        self.enabled.get() && !self.removed.get()
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

/// Per-container registry entry
#[derive(Debug)]
pub(crate) struct Entry {
    listener: ListenerId,
    categories: HashMap<String, Vec<Rc<Binding>>>,
    attached: Vec<String>,
}

impl Entry {
    fn new() -> Self {
        Self {
            listener: ListenerId(NEXT_LISTENER.fetch_add(1, Ordering::Relaxed)),
            categories: HashMap::new(),
            attached: Vec::new(),
        }
    }

    pub fn listener(&self) -> ListenerId {
        self.listener
    }

    pub fn push(&mut self, canonical: &str, binding: Binding) {
        self.categories
            .entry(canonical.to_string())
            .or_default()
            .push(Rc::new(binding));
    }

    /// Copy of one category's list, for iteration that may outlive changes
    pub fn snapshot(&self, canonical: &str) -> Vec<Rc<Binding>> {
        self.categories.get(canonical).cloned().unwrap_or_default()
    }

    pub fn bindings(&self, canonical: &str) -> &[Rc<Binding>] {
        self.categories.get(canonical).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Attach or detach the native listener for `canonical` so that it is
    /// attached exactly when the category has bindings.
    pub fn reconcile(&mut self, document: &Document, node: NodeId, canonical: &str) {
        let occupied = self.categories.get(canonical).is_some_and(|list| !list.is_empty());
        let attached = self.attached.iter().any(|c| c == canonical);

        if occupied && !attached {
            document.add_event_listener(node, canonical, self.listener);
            self.attached.push(canonical.to_string());
            tracing::debug!("Attached {} listener on {:?}", canonical, node);
        } else if !occupied {
            self.categories.remove(canonical);
            if attached {
                document.remove_event_listener(node, canonical, self.listener);
                self.attached.retain(|c| c != canonical);
                tracing::debug!("Detached {} listener from {:?}", canonical, node);
            }
        }
    }

    /// Detach every native listener
    pub fn detach_all(&mut self, document: &Document, node: NodeId) {
        for canonical in self.attached.drain(..) {
            document.remove_event_listener(node, &canonical, self.listener);
        }
        for binding in self.categories.values().flatten() {
            binding.removed.set(true);
        }
        self.categories.clear();
    }

    /// Apply `filter` to every binding. Returns how many matched.
    pub fn apply(&mut self, document: &Document, node: NodeId, filter: &Filter, taxonomy: &Taxonomy) -> usize {
        let names = filter.event_names.as_deref()
            .map(|n| taxonomy.expand(n))
            .filter(|n| !n.is_empty());
        let selector = filter.selector.as_deref()
            .map(clean)
            .filter(|s| !s.is_empty());

        let mut affected = 0;
        let mut touched = Vec::new();

        for (canonical, list) in &mut self.categories {
            let before = affected;
            for binding in list.iter() {
                let matches = names.as_ref().is_none_or(|n| n.contains(&binding.event_name))
                    && filter.handler.as_ref().is_none_or(|h| h.ptr_eq(&binding.handler))
                    && selector.as_ref().is_none_or(|s| s.eq_ignore_ascii_case(&binding.selector_text));
                if !matches {
                    continue;
                }

                affected += 1;
                match filter.pause {
                    Some(pause) => binding.enabled.set(!pause),
                    None => binding.removed.set(true),
                }
            }

            if filter.pause.is_none() && affected > before {
                list.retain(|b| !b.removed.get());
                touched.push(canonical.clone());
            }
        }

        for canonical in touched {
            self.reconcile(document, node, &canonical);
        }
        affected
    }
}

/// Per-node registry
#[derive(Debug, Default)]
pub(crate) struct Registry {
    entries: HashMap<NodeId, Entry>,
}

impl Registry {
    pub fn get(&self, node: NodeId) -> Option<&Entry> {
        self.entries.get(&node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Entry> {
        self.entries.get_mut(&node)
    }

    /// Entry for `node`, created (with a fresh listener id) on first use
    pub fn entry(&mut self, node: NodeId) -> &mut Entry {
        self.entries.entry(node).or_insert_with(Entry::new)
    }

    pub fn remove(&mut self, node: NodeId) -> Option<Entry> {
        self.entries.remove(&node)
    }

    pub fn nodes(&self) -> Vec<NodeId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Selection of bindings for removal, pause or resume
///
/// Every unset or empty field matches everything. Event names are expanded through
/// the taxonomy and compared with the name each binding was registered
/// with; selectors compare case-insensitively against the registered text.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    pub event_names: Option<String>,
    pub selector: Option<String>,
    pub handler: Option<Handler>,
    /// `Some(true)` pauses, `Some(false)` resumes, `None` removes
    pub pause: Option<bool>,
}

impl Filter {
    /// Filter matching every binding
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(mut self, names: &str) -> Self {
        self.event_names = Some(names.to_string());
        self
    }

    pub fn selector(mut self, selector: &str) -> Self {
        self.selector = Some(selector.to_string());
        self
    }

    pub fn handler(mut self, handler: &Handler) -> Self {
        self.handler = Some(handler.clone());
        self
    }

    pub fn pause(mut self, pause: bool) -> Self {
        self.pause = Some(pause);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(event: &str, selector: &str, handler: &Handler) -> Binding {
        Binding::new(event.to_string(), selector.to_string(), handler.clone())
    }

    #[test]
    fn test_listener_ids_are_unique() {
        let a = Entry::new();
        let b = Entry::new();
        assert_ne!(a.listener(), b.listener());
    }

    #[test]
    fn test_entry_is_idempotent() {
        let mut registry = Registry::default();
        let first = registry.entry(NodeId::ROOT).listener();
        let second = registry.entry(NodeId::ROOT).listener();
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_reconcile_attaches_once() {
        let doc = Document::new();
        let body = doc.body();
        let h = Handler::new(|_| ());
        let mut entry = Entry::new();

        entry.push("click", binding("click", "a", &h));
        entry.reconcile(&doc, body, "click");
        entry.push("click", binding("click", "b", &h));
        entry.reconcile(&doc, body, "click");

        assert_eq!(doc.listener_stats().added, 1);
        assert!(doc.has_event_listener(body, "click", entry.listener()));
    }

    #[test]
    fn test_apply_removes_and_detaches() {
        let doc = Document::new();
        let body = doc.body();
        let taxonomy = Taxonomy::new();
        let h = Handler::new(|_| ());
        let other = Handler::new(|_| ());
        let mut entry = Entry::new();

        entry.push("click", binding("click", "a", &h));
        entry.push("click", binding("click", "A", &other));
        entry.reconcile(&doc, body, "click");

        let removed = entry.apply(&doc, body, &Filter::new().selector("a").handler(&h), &taxonomy);
        assert_eq!(removed, 1);
        assert_eq!(entry.bindings("click").len(), 1);
        assert_eq!(doc.listener_count(body, "click"), 1);

        let removed = entry.apply(&doc, body, &Filter::new().selector(" a "), &taxonomy);
        assert_eq!(removed, 1);
        assert!(entry.bindings("click").is_empty());
        assert!(entry.is_empty());
        assert_eq!(doc.listener_count(body, "click"), 0);
    }

    #[test]
    fn test_empty_filter_fields_match_everything() {
        let doc = Document::new();
        let body = doc.body();
        let taxonomy = Taxonomy::new();
        let h = Handler::new(|_| ());
        let other = Handler::new(|_| ());
        let mut entry = Entry::new();

        entry.push("click", binding("click", "a", &h));
        entry.push("click", binding("click", "li", &h));
        entry.push("click", binding("click", "a", &other));
        entry.reconcile(&doc, body, "click");

        assert_eq!(entry.apply(&doc, body, &Filter::new().selector(" ").handler(&h), &taxonomy), 2);
        assert_eq!(entry.apply(&doc, body, &Filter::new().events("").selector(""), &taxonomy), 1);
        assert!(entry.is_empty());
    }

    #[test]
    fn test_apply_pause_keeps_attachment() {
        let doc = Document::new();
        let body = doc.body();
        let taxonomy = Taxonomy::new();
        let h = Handler::new(|_| ());
        let mut entry = Entry::new();

        entry.push("mouseover", binding("mouseenter", "a", &h));
        entry.reconcile(&doc, body, "mouseover");

        assert_eq!(entry.apply(&doc, body, &Filter::new().events("hover").pause(true), &taxonomy), 1);
        assert!(!entry.bindings("mouseover")[0].is_enabled());
        assert_eq!(doc.listener_count(body, "mouseover"), 1);

        assert_eq!(entry.apply(&doc, body, &Filter::new().pause(false), &taxonomy), 1);
        assert!(entry.bindings("mouseover")[0].is_live());
    }
}
