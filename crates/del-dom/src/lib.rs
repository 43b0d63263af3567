//! DEL DOM - Host document tree
//!
//! Arena-based document tree that plays the host for the delegation engine:
//! elements, text, native listener attachment and native event delivery.

mod node;
mod tree;
mod document;
mod events;

pub use node::{Node, NodeData, ElementData, Attribute, ScrollMetrics};
pub use tree::{DomTree, DomError, DomResult, Ancestors};
pub use document::{Document, ListenerStats};
pub use events::NativeEvent;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw arena index
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle of a native listener callback attached to a node.
///
/// The host only stores and hands back the handle; the owner of the
/// callback decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);
