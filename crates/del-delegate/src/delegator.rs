//! Registration API
//!
//! The `Delegator` owns the taxonomy and the binding registry. All
//! operations take `&self`: handlers may hold an `Rc<Delegator>` and
//! register or remove bindings while an event is being dispatched.

use std::cell::{Ref, RefCell};

use del_dom::{Document, ListenerId, NodeId};

use crate::registry::{Binding, Registry};
use crate::{Config, Filter, Handler, NormalizedEvent, Rules, Taxonomy};

/// Event delegation service
#[derive(Debug, Default)]
pub struct Delegator {
    config: Config,
    pub(crate) taxonomy: RefCell<Taxonomy>,
    pub(crate) registry: RefCell<Registry>,
}

impl Delegator {
    /// Create a delegator with the default configuration and taxonomy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a delegator with a custom configuration
    pub fn with_config(config: Config) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Borrow the taxonomy tables
    pub fn taxonomy(&self) -> Ref<'_, Taxonomy> {
        self.taxonomy.borrow()
    }

    // === Taxonomy extension ===

    /// Map a virtual event name to a canonical one
    pub fn define_alias(&self, name: &str, canonical: &str) {
        self.taxonomy.borrow_mut().define_alias(name, canonical);
    }

    /// Make `name` expand to the space-separated `members`
    pub fn define_group(&self, name: &str, members: &str) {
        self.taxonomy.borrow_mut().define_group(name, members);
    }

    /// Gate an event name
    pub fn define_gate<G>(&self, name: &str, gate: G)
    where
        G: Fn(&NormalizedEvent<'_>, NodeId, &Document) -> bool + 'static,
    {
        self.taxonomy.borrow_mut().define_gate(name, gate);
    }

    /// Alias and gate an event name in one go
    pub fn define_gated<G>(&self, name: &str, canonical: &str, gate: G)
    where
        G: Fn(&NormalizedEvent<'_>, NodeId, &Document) -> bool + 'static,
    {
        self.taxonomy.borrow_mut().define_gated(name, canonical, gate);
    }

    // === Registration ===

    /// Register `rules` on every element in `nodes`.
    ///
    /// Non-element nodes are skipped. Returns the number of bindings added.
    pub fn register<I>(&self, document: &Document, nodes: I, rules: &Rules) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let expanded = {
            let taxonomy = self.taxonomy.borrow();
            rules.expand(&taxonomy, &self.config.default_event)
                .into_iter()
                .map(|e| (taxonomy.canonicalize(&e.event_name).to_string(), e))
                .collect::<Vec<_>>()
        };

        let mut added = 0;
        for node in nodes {
            if !document.tree().is_element(node) {
                tracing::debug!("Skipping registration on non-element {:?}", node);
                continue;
            }

            let mut registry = self.registry.borrow_mut();
            let entry = registry.entry(node);
            let mut touched: Vec<&str> = Vec::new();

            for (canonical, e) in &expanded {
                entry.push(canonical, Binding::new(e.event_name.clone(), e.selector.clone(), e.handler.clone()));
                if !touched.contains(&canonical.as_str()) {
                    touched.push(canonical);
                }
                added += 1;
            }
            for canonical in touched {
                entry.reconcile(document, node, canonical);
            }

            tracing::debug!("Registered {} bindings on {:?}", expanded.len(), node);
        }
        added
    }

    /// Register one handler for `events` on `selector`
    pub fn on<I>(&self, document: &Document, nodes: I, events: &str, selector: &str, handler: Handler) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let key = if events.trim().is_empty() {
            selector.to_string()
        } else {
            format!("[{}] {}", events, selector)
        };
        self.register(document, nodes, &Rules::new().rule(&key, handler))
    }

    /// Register `rules` on the document body
    pub fn listen(&self, document: &Document, rules: &Rules) -> usize {
        self.register(document, [document.body()], rules)
    }

    // === Removal ===

    /// Remove, pause or resume the bindings selected by `filter`.
    ///
    /// Nodes without registrations are ignored. Returns the number of
    /// bindings affected.
    pub fn unregister<I>(&self, document: &Document, nodes: I, filter: &Filter) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        let taxonomy = self.taxonomy.borrow();
        let mut registry = self.registry.borrow_mut();
        let mut affected = 0;

        for node in nodes {
            let Some(entry) = registry.get_mut(node) else {
                continue;
            };

            let count = entry.apply(document, node, filter, &taxonomy);
            affected += count;

            if self.config.prune_empty_entries && entry.is_empty() {
                registry.remove(node);
                tracing::debug!("Pruned empty entry for {:?}", node);
            }
            if count > 0 {
                tracing::debug!("{} {} bindings on {:?}", action(filter.pause), count, node);
            }
        }
        affected
    }

    /// `unregister` on the document body
    pub fn off(&self, document: &Document, filter: &Filter) -> usize {
        self.unregister(document, [document.body()], filter)
    }

    /// Disable matching bindings without removing them
    pub fn pause<I>(&self, document: &Document, nodes: I, filter: Filter) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.unregister(document, nodes, &filter.pause(true))
    }

    /// Re-enable paused bindings
    pub fn resume<I>(&self, document: &Document, nodes: I, filter: Filter) -> usize
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.unregister(document, nodes, &filter.pause(false))
    }

    // === Lifecycle ===

    /// Drop a node's entry and detach all its native listeners
    pub fn dispose(&self, document: &Document, node: NodeId) -> bool {
        let Some(mut entry) = self.registry.borrow_mut().remove(node) else {
            return false;
        };
        entry.detach_all(document, node);
        tracing::debug!("Disposed registry entry for {:?}", node);
        true
    }

    /// Dispose every entry whose node is no longer in the document
    pub fn prune_detached(&self, document: &Document) -> usize {
        let stale: Vec<NodeId> = self.registry.borrow()
            .nodes()
            .into_iter()
            .filter(|&node| !document.tree().is_connected(node))
            .collect();

        stale.into_iter()
            .filter(|&node| self.dispose(document, node))
            .count()
    }

    // === Introspection ===

    /// Check whether `node` has a registry entry
    pub fn has_entry(&self, node: NodeId) -> bool {
        self.registry.borrow().get(node).is_some()
    }

    /// Native listener handle of `node`'s entry
    pub fn listener_id(&self, node: NodeId) -> Option<ListenerId> {
        self.registry.borrow().get(node).map(|e| e.listener())
    }

    /// Number of bindings (paused included) for a canonical event on `node`
    pub fn binding_count(&self, node: NodeId, canonical: &str) -> usize {
        self.registry.borrow().get(node).map_or(0, |e| e.bindings(canonical).len())
    }

    /// Number of nodes with a registry entry
    pub fn entry_count(&self) -> usize {
        self.registry.borrow().len()
    }
}

fn action(pause: Option<bool>) -> &'static str {
    match pause {
        Some(true) => "Paused",
        Some(false) => "Resumed",
        None => "Removed",
    }
}
