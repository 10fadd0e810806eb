//! Arena-based tree storage
//!
//! Every node of a document lives in one `Vec` of slots. Parent/child links
//! are handles, never pointers, so there are no reference cycles and a
//! deleted node can't dangle: its slot generation moves on and old handles
//! simply stop resolving.
//!
//! ```text
//! Document: Vec<Slot>
//!           [Doc][Elem][Text][free][Elem]...
//!             ↑ NodeId { index, generation }
//! ```

use crate::error::{Result, SoupError};
use crate::types::{Attribute, Attributes, Node, NodeData, NodeId};
use ahash::AHashSet;
use std::ops::Index;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A markup tree: owns all its nodes and their structural links
///
/// The document node itself is allocated up front and is returned by
/// [`Document::root`]. Nodes created with the `create_*` constructors start
/// detached and join the tree through the mutation operations.
///
/// Not thread-safe for mutation; share behind your own lock if needed.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
    live: usize,
}

impl Document {
    /// Create a new document holding only its root node
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create document with specific node capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let mut doc = Self {
            slots: Vec::with_capacity(capacity.max(1)),
            free: Vec::new(),
            root: NodeId::new(0, 0),
            live: 0,
        };
        doc.root = doc.alloc(NodeData::Document);
        doc
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(Node::new(data));
            return NodeId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(Node::new(data)),
        });
        NodeId::new(index, 0)
    }

    /// The document node (parent of all top-level nodes)
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get node by ID, `None` if the handle is stale
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Get node by ID, failing with `StaleNode`
    pub(crate) fn require(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(SoupError::StaleNode(id))
    }

    /// Mutable access for nodes already validated by the caller
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {id}"),
        }
    }

    /// Does this handle still name a live node?
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes (attached or detached), the document node included
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if only the document node exists
    pub fn is_empty(&self) -> bool {
        self.live <= 1
    }

    /// Create a detached element; the name is lowercased and repeated
    /// attribute names keep their first occurrence
    pub fn create_element<I, K, V>(&mut self, name: &str, attributes: I) -> NodeId
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let attributes = dedup_attributes(
            attributes
                .into_iter()
                .map(|(k, v)| Attribute::new(k, v)),
        );
        self.alloc(NodeData::Element {
            name: name.to_lowercase(),
            attributes,
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Create a detached document-kind node, usable as a fragment container
    pub fn create_document(&mut self) -> NodeId {
        self.alloc(NodeData::Document)
    }

    /// Get parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Child handles in order (empty for stale handles)
    pub fn child_ids(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|node| node.children()).unwrap_or(&[])
    }

    /// Parent and 0-based position among all siblings
    pub(crate) fn position(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let pos = self.child_ids(parent).iter().position(|&c| c == id)?;
        Some((parent, pos))
    }

    /// True if `ancestor` is `node` or lies on its parent chain
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    // ------------------------------------------------------------------
    // Raw linkage primitives. Callers validate; these only keep the two
    // link directions in agreement.
    // ------------------------------------------------------------------

    /// Remove `id` from its parent's child list (no-op when detached)
    pub(crate) fn unlink(&mut self, id: NodeId) {
        if let Some((parent, pos)) = self.position(id) {
            self.node_mut(parent).children.remove(pos);
        }
        self.node_mut(id).parent = None;
    }

    /// Insert detached `child` at 0-based `pos` (clamped to the end)
    pub(crate) fn link_at(&mut self, parent: NodeId, pos: usize, child: NodeId) {
        debug_assert!(self.parent(child).is_none(), "child must be detached");
        let children = &mut self.node_mut(parent).children;
        let pos = pos.min(children.len());
        children.insert(pos, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Detach every child of `id`, returning them in order
    pub(crate) fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        let children: Vec<NodeId> = std::mem::take(&mut self.node_mut(id).children).into_vec();
        for &child in &children {
            self.node_mut(child).parent = None;
        }
        children
    }

    /// Reclaim a detached subtree (iterative, no recursion)
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        debug_assert!(self.parent(id).is_none(), "subtree must be detached");
        let mut stack = vec![id];

        while let Some(node_id) = stack.pop() {
            let slot = &mut self.slots[node_id.index as usize];
            if slot.generation != node_id.generation {
                continue;
            }
            if let Some(node) = slot.node.take() {
                stack.extend(node.children.iter().copied());
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node_id.index);
                self.live -= 1;
            }
        }
    }

    // ------------------------------------------------------------------
    // Traversal primitives over handles. The node-level views in
    // `node.rs` wrap these into lazy sequences.
    // ------------------------------------------------------------------

    /// Proper descendants of `id` in document order (pre-order)
    pub fn descendant_ids(&self, id: NodeId) -> DescendantIds<'_> {
        let mut stack: Vec<NodeId> = Vec::new();
        stack.extend(self.child_ids(id).iter().rev().copied());
        DescendantIds { doc: self, stack }
    }

    /// Parent chain of `id`, nearest first
    pub fn ancestor_ids(&self, id: NodeId) -> AncestorIds<'_> {
        AncestorIds {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Siblings after `id` in document order
    pub fn following_sibling_ids(&self, id: NodeId) -> &[NodeId] {
        match self.position(id) {
            Some((parent, pos)) => &self.child_ids(parent)[pos + 1..],
            None => &[],
        }
    }

    /// Siblings before `id` in document order (reverse it for nearest-first)
    pub fn preceding_sibling_ids(&self, id: NodeId) -> &[NodeId] {
        match self.position(id) {
            Some((parent, pos)) => &self.child_ids(parent)[..pos],
            None => &[],
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for Document {
    type Output = Node;

    /// Panics on a stale handle, like slice indexing out of bounds
    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {id}"),
        }
    }
}

/// Keep the first occurrence of every attribute name
pub(crate) fn dedup_attributes(attributes: impl Iterator<Item = Attribute>) -> Attributes {
    let mut seen = AHashSet::new();
    let mut out = Attributes::new();
    for attribute in attributes {
        if seen.insert(attribute.name.clone()) {
            out.push(attribute);
        } else {
            tracing::warn!("Dropping duplicate attribute '{}'", attribute.name);
        }
    }
    out
}

/// Pre-order walk below a node; see [`Document::descendant_ids`]
pub struct DescendantIds<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.doc.child_ids(id).iter().rev().copied());
        Some(id)
    }
}

/// Parent chain; see [`Document::ancestor_ids`]
pub struct AncestorIds<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for AncestorIds<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.doc.parent(id);
        Some(id)
    }
}
