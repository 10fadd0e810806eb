//! Read-only node views
//!
//! [`NodeRef`] pairs a document borrow with a handle so queries read
//! naturally (`li.parent()`, `div.select("p")`). [`ElementRef`] is the same
//! thing narrowed to elements; it derefs to `NodeRef`, so every traversal
//! is available on both.
//!
//! All traversals return lazy [`Nodes`] sequences. Tree-descent sequences
//! (`children`, `descendants`, `select`) are in document order; `ancestors`
//! and `previous_siblings` run nearest-first.

use crate::arena::Document;
use crate::error::Result;
use crate::select::Selector;
use crate::sequence::Nodes;
use crate::signals::Signals;
use crate::types::{Attribute, Node, NodeData, NodeId, NodeType};
use crate::utils;
use std::fmt;
use std::ops::Deref;

/// Borrowed view of any node
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

/// Borrowed view of an element node
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ElementRef<'a> {
    node: NodeRef<'a>,
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.node().data {
            NodeData::Document => write!(f, "Document({})", self.id),
            NodeData::Element { name, .. } => write!(f, "Element({}, <{}>)", self.id, name),
            NodeData::Text(text) => write!(f, "Text({}, {:?})", self.id, text),
        }
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

impl Document {
    /// View a node; panics on a stale handle
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        self.try_node_ref(id)
            .unwrap_or_else(|| panic!("stale node handle {id}"))
    }

    pub fn try_node_ref(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.get(id).map(|_| NodeRef { doc: self, id })
    }

    /// View of the document node
    pub fn root_ref(&self) -> NodeRef<'_> {
        NodeRef {
            doc: self,
            id: self.root(),
        }
    }

    /// Narrow a handle to an element view; `None` for other kinds
    pub fn element_ref(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.try_node_ref(id).and_then(|n| n.element())
    }
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// The underlying arena node
    pub fn node(&self) -> &'a Node {
        &self.doc[self.id]
    }

    pub fn node_type(&self) -> NodeType {
        self.node().node_type()
    }

    pub fn is_element(&self) -> bool {
        self.node().is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node().is_text()
    }

    pub fn is_document(&self) -> bool {
        self.node().is_document()
    }

    /// Narrow to an element; `None` on mismatch
    pub fn element(self) -> Option<ElementRef<'a>> {
        self.is_element().then_some(ElementRef { node: self })
    }

    /// Text payload; `None` unless this is a text node
    pub fn as_text(&self) -> Option<&'a str> {
        self.node().text()
    }

    fn wrap(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { doc: self.doc, id }
    }

    // ------------------------------------------------------------------
    // Structure
    // ------------------------------------------------------------------

    /// Parent node of any kind (the document node for top-level nodes)
    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.node().parent.map(|id| self.wrap(id))
    }

    pub fn parent_element(&self) -> Option<ElementRef<'a>> {
        self.parent().and_then(NodeRef::element)
    }

    /// Element whose parent is a document node, or that has no parent
    pub fn is_root(&self) -> bool {
        self.is_element() && self.parent().map_or(true, |p| p.is_document())
    }

    pub fn children(&self) -> Nodes<'a, NodeRef<'a>> {
        let this = *self;
        Nodes::new(self.node().children.iter().map(move |&id| this.wrap(id)))
    }

    pub fn child_elements(&self) -> Nodes<'a, ElementRef<'a>> {
        self.children().filter_map(NodeRef::element)
    }

    /// `k`-th child, 1-based
    pub fn child(&self, k: usize) -> Option<NodeRef<'a>> {
        self.children().nth(k)
    }

    /// `k`-th child element, 1-based
    pub fn child_element(&self, k: usize) -> Option<ElementRef<'a>> {
        self.child_elements().nth(k)
    }

    /// Proper descendants in document order
    pub fn descendants(&self) -> Nodes<'a, NodeRef<'a>> {
        let this = *self;
        Nodes::new(self.doc.descendant_ids(self.id).map(move |id| this.wrap(id)))
    }

    /// Element ancestors, nearest first
    pub fn ancestors(&self) -> Nodes<'a, ElementRef<'a>> {
        let this = *self;
        Nodes::new(self.doc.ancestor_ids(self.id).map(move |id| this.wrap(id)))
            .filter_map(NodeRef::element)
    }

    /// All other children of the parent, in document order
    pub fn siblings(&self) -> Nodes<'a, NodeRef<'a>> {
        let this = *self;
        match self.parent() {
            Some(parent) => parent.children().filter(move |n| n.id != this.id),
            None => Nodes::empty(),
        }
    }

    /// Later siblings in document order
    pub fn next_siblings(&self) -> Nodes<'a, NodeRef<'a>> {
        let this = *self;
        Nodes::new(
            self.doc
                .following_sibling_ids(self.id)
                .iter()
                .map(move |&id| this.wrap(id)),
        )
    }

    /// Earlier siblings, nearest first
    pub fn previous_siblings(&self) -> Nodes<'a, NodeRef<'a>> {
        let this = *self;
        Nodes::new(
            self.doc
                .preceding_sibling_ids(self.id)
                .iter()
                .rev()
                .map(move |&id| this.wrap(id)),
        )
    }

    pub fn next_element(&self) -> Option<ElementRef<'a>> {
        self.next_siblings().filter_map(NodeRef::element).first()
    }

    pub fn previous_element(&self) -> Option<ElementRef<'a>> {
        self.previous_siblings().filter_map(NodeRef::element).first()
    }

    /// 1-based position among all siblings; 1 without a parent
    pub fn index_of(&self) -> usize {
        self.doc.preceding_sibling_ids(self.id).len() + 1
    }

    // ------------------------------------------------------------------
    // Text
    // ------------------------------------------------------------------

    /// Every text node at or below this node, in document order
    pub fn texts(&self) -> Nodes<'a, &'a str> {
        if let Some(text) = self.as_text() {
            return Nodes::new(std::iter::once(text));
        }
        self.descendants().filter_map(|n| n.as_text())
    }

    /// Like `texts`, trimmed, with blank entries dropped
    pub fn trimmed_texts(&self) -> Nodes<'a, &'a str> {
        self.texts().map(str::trim).filter(|t| !t.is_empty())
    }

    /// All descendant text concatenated
    pub fn text_content(&self) -> String {
        self.texts().fold(String::new(), |mut acc, t| {
            acc.push_str(t);
            acc
        })
    }

    /// Text of the single leaf below a chain of only-children
    ///
    /// Whitespace-only text is ignored when counting children. Returns `""`
    /// for a node with no meaningful children and `None` as soon as some
    /// level has more than one.
    pub fn leaf_text(&self) -> Option<&'a str> {
        if let Some(text) = self.as_text() {
            return Some(text);
        }
        let mut meaningful = self
            .children()
            .filter(|c| c.as_text().map_or(true, |t| !utils::is_blank(t)));
        match (meaningful.pull(), meaningful.pull()) {
            (None, _) => Some(""),
            (Some(only), None) => only.leaf_text(),
            (Some(_), Some(_)) => None,
        }
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Compile `selector` and select matching elements below this node
    pub fn select(&self, selector: &str) -> Result<Nodes<'a, ElementRef<'a>>> {
        let selector = Selector::parse(selector)?;
        Ok(self.select_with(&selector))
    }

    /// First match of `selector`, if any
    pub fn select_one(&self, selector: &str) -> Result<Option<ElementRef<'a>>> {
        Ok(self.select(selector)?.first())
    }

    /// Select with an already compiled selector
    pub fn select_with(&self, selector: &Selector) -> Nodes<'a, ElementRef<'a>> {
        crate::select::matcher::select(self.doc, selector.shared_alternatives(), self.id)
    }

    /// Descendant elements with tag `name`
    pub fn tags(&self, name: &str) -> Nodes<'a, ElementRef<'a>> {
        let name = name.to_lowercase();
        self.descendants()
            .filter_map(NodeRef::element)
            .filter(move |e| e.name() == name)
    }

    /// First descendant element with tag `name`
    pub fn tag(&self, name: &str) -> Option<ElementRef<'a>> {
        self.tags(name).first()
    }

    /// Signal stream for this subtree, see [`Document::signals`]
    pub fn signals(&self) -> Signals<'a> {
        self.doc.signals(self.id)
    }
}

impl<'a> Deref for ElementRef<'a> {
    type Target = NodeRef<'a>;

    fn deref(&self) -> &NodeRef<'a> {
        &self.node
    }
}

impl<'a> From<ElementRef<'a>> for NodeRef<'a> {
    fn from(element: ElementRef<'a>) -> Self {
        element.node
    }
}

impl<'a> ElementRef<'a> {
    /// Widen back to a general node view
    pub fn as_node(&self) -> NodeRef<'a> {
        self.node
    }

    /// Lowercase tag name
    pub fn name(&self) -> &'a str {
        self.node.node().name().unwrap_or_default()
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.node.node().attr(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Attributes in stored order
    pub fn attributes(&self) -> &'a [Attribute] {
        self.node.node().attributes()
    }

    /// Tokens of the `class` attribute, first occurrence order
    pub fn classes(&self) -> Vec<&'a str> {
        self.attribute("class")
            .map(utils::unique_tokens)
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map_or(false, |v| utils::has_token(v, class))
    }

    /// Value of the `id` attribute
    pub fn id_attr(&self) -> Option<&'a str> {
        self.attribute("id")
    }

    /// 1-based position among sibling elements; 1 without a parent
    pub fn index_of_element(&self) -> usize {
        self.node
            .previous_siblings()
            .filter(|n| n.is_element())
            .count()
            + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::Signal;

    fn doc(signals: Vec<Signal>) -> Document {
        Document::from_signals(signals).unwrap()
    }

    fn start(name: &str) -> Signal {
        Signal::start(name, Vec::<(String, String)>::new())
    }

    fn end(name: &str) -> Signal {
        Signal::EndTag(name.to_string())
    }

    fn text(t: &str) -> Signal {
        Signal::Text(t.to_string())
    }

    /// <ul><li>One</li> <li class="b a b">Two<b>!</b></li></ul>
    fn sample() -> Document {
        doc(vec![
            start("ul"),
            start("li"),
            text("One"),
            end("li"),
            text(" "),
            Signal::start("LI", vec![("class", "b a b"), ("id", "two")]),
            text("Two"),
            start("b"),
            text("!"),
            end("b"),
            end("li"),
            end("ul"),
        ])
    }

    #[test]
    fn test_children_and_narrowing() {
        let d = sample();
        let ul = d.root_ref().child_element(1).unwrap();
        assert_eq!(ul.name(), "ul");
        assert!(ul.is_root());
        assert_eq!(ul.children().count(), 3);
        assert_eq!(ul.child_elements().count(), 2);

        let space = ul.child(2).unwrap();
        assert!(space.element().is_none());
        assert_eq!(space.as_text(), Some(" "));
        assert_eq!(space.index_of(), 2);
    }

    #[test]
    fn test_element_attributes() {
        let d = sample();
        let li = d.root_ref().tags("li").nth(2).unwrap();
        assert_eq!(li.id_attr(), Some("two"));
        assert_eq!(li.classes(), vec!["b", "a"]);
        assert!(li.has_class("a"));
        assert!(!li.has_attribute("title"));
        assert_eq!(li.attributes()[0].value, "b a b");
        assert_eq!(li.index_of_element(), 2);
        assert_eq!(li.index_of(), 3);
    }

    #[test]
    fn test_ancestors_and_siblings_order() {
        let d = sample();
        let b = d.root_ref().tag("b").unwrap();
        let names: Vec<&str> = b.ancestors().map(|e| e.name()).to_list();
        assert_eq!(names, vec!["li", "ul"]);

        let second = d.root_ref().tags("li").last().unwrap();
        let prev: Vec<Option<&str>> = second
            .previous_siblings()
            .map(|n| n.element().map(|e| e.name()))
            .to_list();
        assert_eq!(prev, vec![None, Some("li")]);
        assert_eq!(second.previous_element().unwrap().leaf_text(), Some("One"));
        assert_eq!(second.siblings().count(), 2);

        let first = d.root_ref().tag("li").unwrap();
        assert_eq!(first.next_element(), Some(second));
        assert_eq!(first.next_siblings().count(), 2);
    }

    #[test]
    fn test_texts() {
        let d = sample();
        let ul = d.root_ref().tag("ul").unwrap();
        assert_eq!(ul.texts().to_list(), vec!["One", " ", "Two", "!"]);
        assert_eq!(ul.trimmed_texts().to_list(), vec!["One", "Two", "!"]);
        assert_eq!(ul.text_content(), "One Two!");

        assert_eq!(ul.tag("li").unwrap().leaf_text(), Some("One"));
        assert_eq!(ul.tag("b").unwrap().leaf_text(), Some("!"));
        assert_eq!(ul.tags("li").last().unwrap().leaf_text(), None);
        assert_eq!(ul.leaf_text(), None);
    }

    #[test]
    fn test_select_from_node() {
        let d = sample();
        let root = d.root_ref();
        let items: Vec<&str> = root
            .select("li")
            .unwrap()
            .map(|li| li.trimmed_texts().first().unwrap_or_default())
            .to_list();
        assert_eq!(items, vec!["One", "Two"]);
        assert_eq!(root.select_one("#two b").unwrap().unwrap().name(), "b");
        assert!(root.select_one("table").unwrap().is_none());
        assert!(root.select("li:hover").is_err());
    }
}
