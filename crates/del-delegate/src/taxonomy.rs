//! Event Taxonomy
//!
//! Static-ish tables describing how event names relate to each other:
//!
//! - an *alias* maps a virtual name to the canonical native event actually
//!   listened for (`mouseenter` -> `mouseover`),
//! - a *group* expands into several names (`hover` -> `mouseenter mouseleave`),
//! - a *gate* filters candidates for a name during dispatch.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use del_dom::{Document, NodeId};

use crate::NormalizedEvent;

/// Gate predicate: should a matched candidate receive the event?
pub type Gate = Rc<dyn Fn(&NormalizedEvent<'_>, NodeId, &Document) -> bool>;

/// Alias, group and gate tables
#[derive(Clone)]
pub struct Taxonomy {
    aliases: HashMap<String, String>,
    groups: HashMap<String, Vec<String>>,
    gates: HashMap<String, Gate>,
}

impl Taxonomy {
    /// Tables with the built-in focus, enter/leave and hover definitions
    pub fn new() -> Self {
        let mut taxonomy = Self::empty();

        taxonomy.define_alias("blur", "focusout");
        taxonomy.define_alias("focus", "focusin");
        taxonomy.define_gated("mouseenter", "mouseover", within_element);
        taxonomy.define_gated("mouseleave", "mouseout", within_element);

        taxonomy.define_group("hover", "mouseenter mouseleave");
        taxonomy.define_group("mouseclick", "mouseup mousedown");

        taxonomy
    }

    /// Tables with no definitions at all
    pub fn empty() -> Self {
        Self {
            aliases: HashMap::new(),
            groups: HashMap::new(),
            gates: HashMap::new(),
        }
    }

    /// Resolve an alias to the event that is actually listened for
    pub fn canonicalize<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map_or(name, String::as_str)
    }

    /// Split a space-separated name list, replacing group names by their
    /// members. Unknown names pass through; duplicates keep the first slot.
    pub fn expand(&self, names: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for token in names.split_whitespace() {
            let members = match self.groups.get(token) {
                Some(members) => members.iter().map(String::as_str).collect(),
                None => vec![token],
            };
            for name in members {
                if !out.iter().any(|n| n == name) {
                    out.push(name.to_string());
                }
            }
        }
        out
    }

    /// Gate for an event name, if one is defined
    pub fn gate(&self, name: &str) -> Option<Gate> {
        self.gates.get(name).cloned()
    }

    /// Check whether `name` is a group
    pub fn is_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Map `name` to `canonical`
    pub fn define_alias(&mut self, name: &str, canonical: &str) {
        self.aliases.insert(name.to_string(), canonical.to_string());
    }

    /// Map `name` to `canonical` and gate it
    pub fn define_gated<G>(&mut self, name: &str, canonical: &str, gate: G)
    where
        G: Fn(&NormalizedEvent<'_>, NodeId, &Document) -> bool + 'static,
    {
        self.define_alias(name, canonical);
        self.define_gate(name, gate);
    }

    /// Gate `name` without aliasing it
    pub fn define_gate<G>(&mut self, name: &str, gate: G)
    where
        G: Fn(&NormalizedEvent<'_>, NodeId, &Document) -> bool + 'static,
    {
        self.gates.insert(name.to_string(), Rc::new(gate));
    }

    /// Make `name` expand to the space-separated `members`
    pub fn define_group(&mut self, name: &str, members: &str) {
        let members = members.split_whitespace().map(str::to_string).collect();
        self.groups.insert(name.to_string(), members);
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut gated: Vec<_> = self.gates.keys().collect();
        gated.sort();
        f.debug_struct("Taxonomy")
            .field("aliases", &self.aliases)
            .field("groups", &self.groups)
            .field("gates", &gated)
            .finish()
    }
}

/// Enter/leave gate over bubbling over/out events.
///
/// Suppresses the candidate when the pointer came from (or went to) the
/// candidate itself or one of its descendants, i.e. it never really left.
/// The related chain is followed up to, not including, `<body>`.
pub fn within_element(event: &NormalizedEvent<'_>, candidate: NodeId, document: &Document) -> bool {
    let Some(related) = event.related_target else {
        return true;
    };
    if related == candidate {
        return false;
    }

    let body = document.body();
    let inside = document.tree()
        .ancestors(related)
        .take_while(|&node| node != body)
        .any(|node| node == candidate);
    !inside
}
