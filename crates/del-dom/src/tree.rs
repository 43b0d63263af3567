//! DOM Tree (arena-based allocation)

use crate::{Node, NodeData, NodeId};

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} not found")]
    NotFound(NodeId),

    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },

    #[error("node {0:?} cannot have children")]
    InvalidNodeType(NodeId),
}

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Nodes are never freed; a removed
/// node is just detached from its parent.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self { nodes: vec![Node::document()] }
    }

    /// Document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content))
    }

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> DomResult<()> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        let elem = node.as_element_mut().ok_or(DomError::InvalidNodeType(id))?;
        elem.set_attr(name, value);
        Ok(())
    }

    /// Parent of a node, if attached
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(|p| p.is_valid())
    }

    /// Check whether a node exists and is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_element)
    }

    /// Append `child` as the last child of `parent`, detaching it first
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let parent_node = self.get(parent).ok_or(DomError::NotFound(parent))?;
        if matches!(parent_node.data, NodeData::Text(_) | NodeData::Comment(_)) {
            return Err(DomError::InvalidNodeType(parent));
        }
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if child == NodeId::ROOT || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);

        let last = self.nodes[parent.index()].last_child;
        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }
        if last.is_valid() {
            self.nodes[last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        Ok(())
    }

    /// Remove `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let node = self.get(child).ok_or(DomError::NotFound(child))?;
        if node.parent != parent {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = {
            let node = &self.nodes[id.index()];
            (node.parent, node.prev_sibling, node.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.nodes[prev.index()].next_sibling = next;
        } else {
            self.nodes[parent.index()].first_child = next;
        }
        if next.is_valid() {
            self.nodes[next.index()].prev_sibling = prev;
        } else {
            self.nodes[parent.index()].last_child = prev;
        }

        let node = &mut self.nodes[id.index()];
        node.parent = NodeId::NONE;
        node.prev_sibling = NodeId::NONE;
        node.next_sibling = NodeId::NONE;
    }

    /// Iterate over the children of a node
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        let first = self.get(id).map_or(NodeId::NONE, |n| n.first_child);
        std::iter::successors(Some(first), move |cur| self.get(*cur).map(|n| n.next_sibling))
            .take_while(|id| id.is_valid())
            .filter_map(move |id| self.get(id).map(|n| (id, n)))
    }

    /// Iterate from `id` up to the topmost ancestor, `id` included
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let next = if self.get(id).is_some() { id } else { NodeId::NONE };
        Ancestors { tree: self, next }
    }

    /// Check whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.ancestors(node).any(|id| id == ancestor)
    }

    /// Check whether a node is attached to the document node
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(NodeId::ROOT, id)
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Inclusive ancestor iterator
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if !self.next.is_valid() {
            return None;
        }
        let current = self.next;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_siblings() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let a = tree.create_element("p");
        let b = tree.create_element("p");

        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, a).unwrap();
        tree.append_child(div, b).unwrap();

        let kids: Vec<_> = tree.children(div).map(|(id, _)| id).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.parent(a), Some(div));
        assert_eq!(tree.get(a).unwrap().next_sibling, b);
    }

    #[test]
    fn test_reparent_detaches_first() {
        let mut tree = DomTree::new();
        let one = tree.create_element("div");
        let two = tree.create_element("div");
        let child = tree.create_element("span");
        tree.append_child(tree.root(), one).unwrap();
        tree.append_child(tree.root(), two).unwrap();
        tree.append_child(one, child).unwrap();

        tree.append_child(two, child).unwrap();
        assert_eq!(tree.children(one).count(), 0);
        assert_eq!(tree.parent(child), Some(two));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut tree = DomTree::new();
        let outer = tree.create_element("div");
        let inner = tree.create_element("div");
        tree.append_child(outer, inner).unwrap();

        let err = tree.append_child(inner, outer).unwrap_err();
        assert_eq!(err, DomError::HierarchyRequest { parent: inner, child: outer });
    }

    #[test]
    fn test_text_cannot_have_children() {
        let mut tree = DomTree::new();
        let text = tree.create_text("hi");
        let span = tree.create_element("span");
        assert_eq!(tree.append_child(text, span), Err(DomError::InvalidNodeType(text)));
    }

    #[test]
    fn test_remove_child_disconnects() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        let span = tree.create_element("span");
        tree.append_child(tree.root(), div).unwrap();
        tree.append_child(div, span).unwrap();
        assert!(tree.is_connected(span));

        tree.remove_child(div, span).unwrap();
        assert!(!tree.is_connected(span));
        assert_eq!(
            tree.remove_child(div, span),
            Err(DomError::NotAChild { parent: div, child: span })
        );
    }

    #[test]
    fn test_ancestors_inclusive() {
        let mut tree = DomTree::new();
        let a = tree.create_element("ul");
        let b = tree.create_element("li");
        tree.append_child(tree.root(), a).unwrap();
        tree.append_child(a, b).unwrap();

        let path: Vec<_> = tree.ancestors(b).collect();
        assert_eq!(path, vec![b, a, NodeId::ROOT]);
        assert_eq!(tree.ancestors(NodeId::NONE).count(), 0);
    }
}
