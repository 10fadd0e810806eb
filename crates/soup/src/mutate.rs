//! Structural and content edits
//!
//! Every operation checks all of its preconditions first and only then
//! touches the arena, so an `Err` leaves the document exactly as it was.
//!
//! Nodes that an operation unlinks fall into two groups:
//! - `delete` and `replace` free the removed subtree. Its handles go stale.
//! - `detach`, `clear`, `wrap` and `unwrap` leave removed nodes alive and
//!   detached, ready to be inserted again.

use crate::arena::Document;
use crate::error::{Result, SoupError};
use crate::types::{Attribute, Attributes, NodeData, NodeId, NodeType};
use crate::utils;

impl Document {
    // ------------------------------------------------------------------
    // Precondition checks
    // ------------------------------------------------------------------

    fn require_parent(&self, id: NodeId, op: &str) -> Result<NodeId> {
        self.require(id)?;
        self.parent(id)
            .ok_or_else(|| SoupError::invalid(format!("{op}: node {id} has no parent")))
    }

    fn require_kind(&self, id: NodeId, expected: NodeType) -> Result<()> {
        let actual = self.require(id)?.node_type();
        if actual != expected {
            return Err(SoupError::InvalidNodeType {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
        Ok(())
    }

    /// Can `node` become a child of `parent`?
    fn check_insert(&self, parent: NodeId, node: NodeId) -> Result<()> {
        let parent_type = self.require(parent)?.node_type();
        let node_type = self.require(node)?.node_type();

        if parent_type == NodeType::Text {
            return Err(SoupError::InvalidNodeType {
                expected: "element or document".to_string(),
                actual: parent_type.to_string(),
            });
        }
        if node_type == NodeType::Document {
            return Err(SoupError::InvalidNodeType {
                expected: "element or text".to_string(),
                actual: node_type.to_string(),
            });
        }
        if self.is_ancestor_or_self(node, parent) {
            return Err(SoupError::invalid(format!(
                "cannot insert node {node} into its own subtree"
            )));
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------

    /// Link `node` as the last child of `parent`, unlinking it first if it
    /// is attached elsewhere
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.check_insert(parent, node)?;
        tracing::trace!("append_child {} -> {}", node, parent);
        self.unlink(node);
        let end = self.child_ids(parent).len();
        self.link_at(parent, end, node);
        Ok(())
    }

    /// Link `node` as the first child of `parent`
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) -> Result<()> {
        self.check_insert(parent, node)?;
        tracing::trace!("prepend_child {} -> {}", node, parent);
        self.unlink(node);
        self.link_at(parent, 0, node);
        Ok(())
    }

    /// Insert `node` as the `k`-th child of `parent` (1-based)
    ///
    /// `k <= 0` inserts at the front; `k` past the end appends.
    pub fn insert_at_index(&mut self, k: i64, parent: NodeId, node: NodeId) -> Result<()> {
        self.check_insert(parent, node)?;
        tracing::trace!("insert_at_index {} {} -> {}", k, node, parent);
        self.unlink(node);
        let pos = usize::try_from(k.saturating_sub(1)).unwrap_or(0);
        self.link_at(parent, pos, node);
        Ok(())
    }

    /// Splice `new_node` into `node`'s parent just before `node`
    pub fn insert_before(&mut self, node: NodeId, new_node: NodeId) -> Result<()> {
        self.insert_beside(node, new_node, 0, "insert_before")
    }

    /// Splice `new_node` into `node`'s parent just after `node`
    pub fn insert_after(&mut self, node: NodeId, new_node: NodeId) -> Result<()> {
        self.insert_beside(node, new_node, 1, "insert_after")
    }

    fn insert_beside(&mut self, node: NodeId, new_node: NodeId, offset: usize, op: &str) -> Result<()> {
        let parent = self.require_parent(node, op)?;
        self.check_insert(parent, new_node)?;
        if new_node == node {
            return Ok(());
        }
        tracing::trace!("{} {} beside {}", op, new_node, node);

        self.unlink(new_node);
        let pos = self.position(node).map_or(0, |(_, pos)| pos);
        self.link_at(parent, pos + offset, new_node);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------

    /// Unlink `node` from its parent, keeping it alive (no-op if detached)
    pub fn detach(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        tracing::trace!("detach {}", node);
        self.unlink(node);
        Ok(())
    }

    /// Unlink `node` and free its whole subtree
    ///
    /// Handles into the subtree become stale. The document node itself
    /// cannot be deleted.
    pub fn delete(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        if node == self.root() {
            return Err(SoupError::invalid("cannot delete the document node"));
        }
        tracing::trace!("delete {}", node);
        self.unlink(node);
        self.free_subtree(node);
        Ok(())
    }

    /// Detach every child of `node`; the children stay alive
    pub fn clear(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        tracing::trace!("clear {}", node);
        self.take_children(node);
        Ok(())
    }

    /// Put `new_node` where `node` is and free `node`'s subtree
    pub fn replace(&mut self, node: NodeId, new_node: NodeId) -> Result<()> {
        let parent = self.require_parent(node, "replace")?;
        self.check_insert(parent, new_node)?;
        if new_node == node {
            return Ok(());
        }
        if self.is_ancestor_or_self(node, new_node) {
            return Err(SoupError::invalid(format!(
                "replace: node {new_node} lies inside the replaced node {node}"
            )));
        }
        tracing::trace!("replace {} with {}", node, new_node);

        self.unlink(new_node);
        let pos = self.position(node).map_or(0, |(_, pos)| pos);
        self.unlink(node);
        self.link_at(parent, pos, new_node);
        self.free_subtree(node);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Restructuring
    // ------------------------------------------------------------------

    /// Exchange the tree positions and the child lists of two elements
    ///
    /// Afterwards `a` sits where `b` was and holds `b`'s former children,
    /// and vice versa.
    pub fn swap(&mut self, a: NodeId, b: NodeId) -> Result<()> {
        self.require_kind(a, NodeType::Element)?;
        self.require_kind(b, NodeType::Element)?;
        let parent_a = self.require_parent(a, "swap")?;
        let parent_b = self.require_parent(b, "swap")?;
        if a == b {
            return Ok(());
        }
        if self.is_ancestor_or_self(a, b) || self.is_ancestor_or_self(b, a) {
            return Err(SoupError::invalid(format!(
                "swap: {a} and {b} are in an ancestor relation"
            )));
        }
        tracing::trace!("swap {} <-> {}", a, b);

        let pos_a = self.position(a).map_or(0, |(_, pos)| pos);
        let pos_b = self.position(b).map_or(0, |(_, pos)| pos);
        self.node_mut(parent_a).children[pos_a] = b;
        self.node_mut(parent_b).children[pos_b] = a;
        self.node_mut(a).parent = Some(parent_b);
        self.node_mut(b).parent = Some(parent_a);

        let children_a = self.take_children(a);
        let children_b = self.take_children(b);
        self.adopt(a, children_b);
        self.adopt(b, children_a);
        Ok(())
    }

    /// Put `element` at `node`'s position with `node` as its only child
    ///
    /// `element`'s previous children are detached (kept alive). A
    /// parentless `node` still ends up inside `element`, which is then
    /// detached as well.
    pub fn wrap(&mut self, node: NodeId, element: NodeId) -> Result<()> {
        self.require_kind(element, NodeType::Element)?;
        if self.require(node)?.is_document() {
            return Err(SoupError::InvalidNodeType {
                expected: "element or text".to_string(),
                actual: NodeType::Document.to_string(),
            });
        }
        if self.is_ancestor_or_self(element, node) {
            return Err(SoupError::invalid(format!(
                "wrap: wrapper {element} contains node {node}"
            )));
        }
        tracing::trace!("wrap {} in {}", node, element);

        self.take_children(element);
        self.unlink(element);
        if let Some((parent, pos)) = self.position(node) {
            self.unlink(node);
            self.link_at(parent, pos, element);
        }
        self.link_at(element, 0, node);
        Ok(())
    }

    /// Replace `node` by its own children, in order; `node` stays alive
    pub fn unwrap(&mut self, node: NodeId) -> Result<()> {
        let parent = self.require_parent(node, "unwrap")?;
        tracing::trace!("unwrap {}", node);

        let pos = self.position(node).map_or(0, |(_, pos)| pos);
        let children = self.take_children(node);
        self.unlink(node);
        for (offset, child) in children.into_iter().enumerate() {
            self.link_at(parent, pos + offset, child);
        }
        Ok(())
    }

    fn adopt(&mut self, parent: NodeId, children: Vec<NodeId>) {
        for child in children {
            let end = self.child_ids(parent).len();
            self.link_at(parent, end, child);
        }
    }

    // ------------------------------------------------------------------
    // Positions
    // ------------------------------------------------------------------

    /// 1-based position among all siblings; 1 without a parent
    pub fn index_of(&self, node: NodeId) -> Result<usize> {
        self.require(node)?;
        Ok(self.preceding_sibling_ids(node).len() + 1)
    }

    /// 1-based position among sibling elements; 1 without a parent
    pub fn index_of_element(&self, element: NodeId) -> Result<usize> {
        self.require_kind(element, NodeType::Element)?;
        let before = self
            .preceding_sibling_ids(element)
            .iter()
            .filter(|&&id| self[id].is_element())
            .count();
        Ok(before + 1)
    }

    // ------------------------------------------------------------------
    // Content edits
    // ------------------------------------------------------------------

    fn attributes_mut(&mut self, element: NodeId) -> Result<&mut Attributes> {
        let actual = self.require(element)?.node_type();
        match &mut self.node_mut(element).data {
            NodeData::Element { attributes, .. } => Ok(attributes),
            _ => Err(SoupError::InvalidNodeType {
                expected: NodeType::Element.to_string(),
                actual: actual.to_string(),
            }),
        }
    }

    /// Set an attribute, replacing the value in place if the name exists
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        let value = value.into();
        tracing::trace!("set_attribute {} {}={:?}", element, name, value);
        let attributes = self.attributes_mut(element)?;
        match attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => attributes.push(Attribute::new(name, value)),
        }
        Ok(())
    }

    /// Remove an attribute, returning its old value
    pub fn delete_attribute(&mut self, element: NodeId, name: &str) -> Result<Option<String>> {
        let attributes = self.attributes_mut(element)?;
        let removed = attributes
            .iter()
            .position(|a| a.name == name)
            .map(|pos| attributes.remove(pos).value);
        if removed.is_some() {
            tracing::trace!("delete_attribute {} {}", element, name);
        }
        Ok(removed)
    }

    /// Add one class token unless it is already present
    pub fn add_class(&mut self, element: NodeId, class: &str) -> Result<()> {
        check_class_token(class)?;
        let current = self.require(element)?.attr("class").map(str::to_string);
        match current {
            Some(value) if utils::has_token(&value, class) => Ok(()),
            Some(value) if !utils::is_blank(&value) => {
                self.set_attribute(element, "class", format!("{value} {class}"))
            }
            _ => self.set_attribute(element, "class", class),
        }
    }

    /// Remove every occurrence of a class token; drops `class` when the
    /// last token goes
    pub fn remove_class(&mut self, element: NodeId, class: &str) -> Result<()> {
        check_class_token(class)?;
        let Some(value) = self.require(element)?.attr("class").map(str::to_string) else {
            return self.require_kind(element, NodeType::Element);
        };
        if !utils::has_token(&value, class) {
            return Ok(());
        }

        let remaining: Vec<&str> = utils::split_tokens(&value).filter(|t| *t != class).collect();
        if remaining.is_empty() {
            self.delete_attribute(element, "class").map(|_| ())
        } else {
            self.set_attribute(element, "class", remaining.join(" "))
        }
    }

    /// Rename an element (lowercased)
    pub fn set_name(&mut self, element: NodeId, name: &str) -> Result<()> {
        self.require_kind(element, NodeType::Element)?;
        if name.is_empty() {
            return Err(SoupError::invalid("set_name: empty element name"));
        }
        tracing::trace!("set_name {} -> {}", element, name);
        if let NodeData::Element { name: current, .. } = &mut self.node_mut(element).data {
            *current = name.to_lowercase();
        }
        Ok(())
    }

    /// Replace a text node's payload
    pub fn set_text(&mut self, node: NodeId, text: impl Into<String>) -> Result<()> {
        self.require_kind(node, NodeType::Text)?;
        if let NodeData::Text(current) = &mut self.node_mut(node).data {
            *current = text.into();
        }
        Ok(())
    }

    /// Merge adjacent text children and drop empty ones, throughout the
    /// subtree of `node`
    ///
    /// Merged-away and dropped text nodes are freed.
    pub fn normalize_children(&mut self, node: NodeId) -> Result<()> {
        self.require(node)?;
        let containers: Vec<NodeId> = std::iter::once(node)
            .chain(self.descendant_ids(node))
            .filter(|&id| !self[id].is_text())
            .collect();

        let mut freed = 0;
        for container in containers {
            let mut kept: Vec<NodeId> = Vec::new();
            for child in self.take_children(container) {
                let Some(text) = self[child].text().map(str::to_string) else {
                    kept.push(child);
                    continue;
                };
                let previous_text = kept.last().copied().filter(|&prev| self[prev].is_text());
                match previous_text {
                    _ if text.is_empty() => {}
                    Some(prev) => {
                        if let NodeData::Text(merged) = &mut self.node_mut(prev).data {
                            merged.push_str(&text);
                        }
                    }
                    None => {
                        kept.push(child);
                        continue;
                    }
                }
                self.free_subtree(child);
                freed += 1;
            }
            self.adopt(container, kept);
        }

        tracing::trace!("normalize_children {}: freed {} text node(s)", node, freed);
        Ok(())
    }
}

fn check_class_token(class: &str) -> Result<()> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(SoupError::invalid(format!("not a single class token: {class:?}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::parse;

    fn names(doc: &Document, parent: NodeId) -> Vec<String> {
        doc.node_ref(parent)
            .children()
            .map(|n| match n.element() {
                Some(e) => e.name().to_string(),
                None => format!("'{}'", n.as_text().unwrap_or_default()),
            })
            .to_list()
    }

    fn find(doc: &Document, selector: &str) -> NodeId {
        doc.root_ref().select_one(selector).unwrap().unwrap().id()
    }

    fn no_attrs() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_append_prepend_insert() {
        let mut doc = parse("<ul><li>b</li></ul>");
        let ul = find(&doc, "ul");
        let a = doc.create_element("a", no_attrs());
        let c = doc.create_element("c", no_attrs());
        let d = doc.create_element("d", no_attrs());

        doc.append_child(ul, c).unwrap();
        doc.prepend_child(ul, a).unwrap();
        doc.insert_at_index(99, ul, d).unwrap();
        assert_eq!(names(&doc, ul), vec!["a", "li", "c", "d"]);

        doc.insert_at_index(-3, ul, d).unwrap();
        assert_eq!(names(&doc, ul), vec!["d", "a", "li", "c"]);
        doc.insert_at_index(3, ul, d).unwrap();
        assert_eq!(names(&doc, ul), vec!["a", "li", "d", "c"]);
        assert_eq!(doc.parent(d), Some(ul));
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut doc = parse("<div><p></p></div><section></section>");
        let div = find(&doc, "div");
        let p = find(&doc, "p");
        let section = find(&doc, "section");

        doc.append_child(section, p).unwrap();
        assert!(doc.child_ids(div).is_empty());
        assert_eq!(doc.child_ids(section), &[p]);
        assert_eq!(doc.parent(p), Some(section));
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut doc = parse("<ul><li id=\"x\"></li></ul>");
        let ul = find(&doc, "ul");
        let x = find(&doc, "#x");
        let before = doc.create_text("<");
        let after = doc.create_text(">");

        doc.insert_before(x, before).unwrap();
        doc.insert_after(x, after).unwrap();
        assert_eq!(names(&doc, ul), vec!["'<'", "li", "'>'"]);

        let orphan = doc.create_element("p", no_attrs());
        let err = doc.insert_before(orphan, before).unwrap_err();
        assert!(matches!(err, SoupError::InvalidOperation(_)));
        assert_eq!(names(&doc, ul), vec!["'<'", "li", "'>'"]);
    }

    #[test]
    fn test_cycles_and_kinds_are_rejected() {
        let mut doc = parse("<div><p><b></b></p></div>");
        let div = find(&doc, "div");
        let b = find(&doc, "b");
        let text = doc.create_text("t");

        assert!(matches!(
            doc.append_child(b, div),
            Err(SoupError::InvalidOperation(_))
        ));
        assert!(matches!(
            doc.append_child(div, div),
            Err(SoupError::InvalidOperation(_))
        ));
        assert!(matches!(
            doc.append_child(text, b),
            Err(SoupError::InvalidNodeType { .. })
        ));
        let root = doc.root();
        assert!(matches!(
            doc.append_child(div, root),
            Err(SoupError::InvalidNodeType { .. })
        ));
        assert_eq!(doc.parent(div), Some(root));
        assert_eq!(doc.parent(b).and_then(|p| doc.parent(p)), Some(div));
    }

    #[test]
    fn test_delete_frees_subtree() {
        let mut doc = parse("<ul><li>One</li><li>Two</li></ul>");
        let ul = find(&doc, "ul");
        let first = find(&doc, "li");
        let text = doc.child_ids(first)[0];
        let before = doc.len();

        doc.delete(first).unwrap();
        assert!(!doc.contains(first));
        assert!(!doc.contains(text));
        assert_eq!(doc.len(), before - 2);
        assert_eq!(doc.node_ref(ul).children().count(), 1);
        assert!(matches!(doc.delete(first), Err(SoupError::StaleNode(_))));

        let root = doc.root();
        assert!(doc.delete(root).is_err());
    }

    #[test]
    fn test_clear_keeps_children_alive() {
        let mut doc = parse("<p>a<b>b</b></p>");
        let p = find(&doc, "p");
        let b = find(&doc, "b");

        doc.clear(p).unwrap();
        assert!(doc.child_ids(p).is_empty());
        assert!(doc.contains(b));
        assert_eq!(doc.parent(b), None);
    }

    #[test]
    fn test_replace() {
        let mut doc = parse("<ul><li>1</li><li id=\"two\">2</li><li>3</li></ul>");
        let ul = find(&doc, "ul");
        let two = find(&doc, "#two");
        let new = doc.create_element("hr", no_attrs());

        doc.replace(two, new).unwrap();
        assert_eq!(names(&doc, ul), vec!["li", "hr", "li"]);
        assert!(!doc.contains(two));

        let orphan = doc.create_element("p", no_attrs());
        assert!(matches!(
            doc.replace(orphan, new),
            Err(SoupError::InvalidOperation(_))
        ));

        // replacing with a node from inside the replaced subtree is refused
        let inner = doc.node_ref(ul).child(1).unwrap().id();
        let inner_text = doc.child_ids(inner)[0];
        assert!(doc.replace(inner, inner_text).is_err());
        assert!(doc.contains(inner_text));
    }

    #[test]
    fn test_replace_with_earlier_sibling() {
        let mut doc = parse("<ul><li id=\"a\"></li><li id=\"b\"></li><li id=\"c\"></li></ul>");
        let ul = find(&doc, "ul");
        let a = find(&doc, "#a");
        let c = find(&doc, "#c");

        doc.replace(c, a).unwrap();
        let ids: Vec<&str> = doc
            .node_ref(ul)
            .child_elements()
            .filter_map(|e| e.id_attr())
            .to_list();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_swap_exchanges_positions_and_children() {
        let mut doc = parse("<div><p id=\"a\"><i>1</i><i>2</i></p><span></span></div><ol><li id=\"b\"><u>3</u></li></ol>");
        let div = find(&doc, "div");
        let ol = find(&doc, "ol");
        let a = find(&doc, "#a");
        let b = find(&doc, "#b");
        let a_children = doc.child_ids(a).to_vec();
        let b_children = doc.child_ids(b).to_vec();

        doc.swap(a, b).unwrap();
        assert_eq!(doc.child_ids(div)[0], b);
        assert_eq!(doc.child_ids(ol)[0], a);
        assert_eq!(doc.child_ids(a), b_children.as_slice());
        assert_eq!(doc.child_ids(b), a_children.as_slice());
        assert!(b_children.iter().all(|&c| doc.parent(c) == Some(a)));
        assert!(a_children.iter().all(|&c| doc.parent(c) == Some(b)));
    }

    #[test]
    fn test_swap_preconditions() {
        let mut doc = parse("<div><p>x</p></div>");
        let div = find(&doc, "div");
        let p = find(&doc, "p");
        let text = doc.child_ids(p)[0];
        let orphan = doc.create_element("em", no_attrs());

        assert!(matches!(doc.swap(div, p), Err(SoupError::InvalidOperation(_))));
        assert!(matches!(doc.swap(p, orphan), Err(SoupError::InvalidOperation(_))));
        assert!(matches!(doc.swap(p, text), Err(SoupError::InvalidNodeType { .. })));
    }

    #[test]
    fn test_wrap_then_unwrap_restores_position() {
        let mut doc = parse("<ul><li>1</li><li id=\"two\">2</li><li>3</li></ul>");
        let ul = find(&doc, "ul");
        let two = find(&doc, "#two");
        let before = doc.child_ids(ul).to_vec();
        let wrapper = doc.create_element("div", no_attrs());

        doc.wrap(two, wrapper).unwrap();
        assert_eq!(names(&doc, ul), vec!["li", "div", "li"]);
        assert_eq!(doc.child_ids(wrapper), &[two]);

        doc.unwrap(wrapper).unwrap();
        assert_eq!(doc.child_ids(ul), before.as_slice());
        assert!(doc.contains(wrapper));
        assert_eq!(doc.parent(wrapper), None);
    }

    #[test]
    fn test_wrap_discards_wrapper_children() {
        let mut doc = parse("<p id=\"t\">text</p><div><b>old</b></div>");
        let p = find(&doc, "#t");
        let div = find(&doc, "div");
        let b = find(&doc, "b");

        doc.wrap(p, div).unwrap();
        assert_eq!(doc.child_ids(div), &[p]);
        assert_eq!(doc.parent(b), None);
        assert_eq!(doc.child_ids(doc.root()), &[div]);
        assert!(matches!(doc.wrap(p, div), Err(SoupError::InvalidOperation(_))));

        // a detached node can be wrapped too; the wrapper leaves its old place
        let inner = doc.create_text("x");
        doc.wrap(inner, p).unwrap();
        assert_eq!(doc.child_ids(p), &[inner]);
        assert_eq!(doc.parent(p), None);
        assert!(doc.child_ids(div).is_empty());
    }

    #[test]
    fn test_unwrap_splices_children() {
        let mut doc = parse("<p>a<b>b<i>c</i></b>d</p>");
        let p = find(&doc, "p");
        let b = find(&doc, "b");

        doc.unwrap(b).unwrap();
        assert_eq!(names(&doc, p), vec!["'a'", "'b'", "i", "'d'"]);
        assert!(doc.child_ids(b).is_empty());

        let orphan = doc.create_element("x", no_attrs());
        assert!(matches!(doc.unwrap(orphan), Err(SoupError::InvalidOperation(_))));
    }

    #[test]
    fn test_index_of() {
        let doc = parse("<ul><li>1</li> <li id=\"two\">2</li></ul>");
        let two = find(&doc, "#two");
        let ul = find(&doc, "ul");
        assert_eq!(doc.index_of(two).unwrap(), 3);
        assert_eq!(doc.index_of_element(two).unwrap(), 2);
        assert_eq!(doc.index_of(ul).unwrap(), 1);
    }

    #[test]
    fn test_attribute_edits() {
        let mut doc = parse("<a href=\"/x\" class=\"btn\"></a>");
        let a = find(&doc, "a");

        doc.set_attribute(a, "href", "/y").unwrap();
        doc.set_attribute(a, "title", "t").unwrap();
        let names: Vec<&str> = doc[a].attributes().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["href", "class", "title"]);
        assert_eq!(doc[a].attr("href"), Some("/y"));

        assert_eq!(doc.delete_attribute(a, "title").unwrap(), Some("t".to_string()));
        assert_eq!(doc.delete_attribute(a, "title").unwrap(), None);

        doc.add_class(a, "big").unwrap();
        doc.add_class(a, "btn").unwrap();
        assert_eq!(doc[a].attr("class"), Some("btn big"));
        doc.remove_class(a, "btn").unwrap();
        assert_eq!(doc[a].attr("class"), Some("big"));
        doc.remove_class(a, "big").unwrap();
        assert_eq!(doc[a].attr("class"), None);
        assert!(doc.add_class(a, "two words").is_err());

        doc.set_name(a, "BUTTON").unwrap();
        assert_eq!(doc[a].name(), Some("button"));

        let text = doc.create_text("x");
        assert!(matches!(
            doc.set_attribute(text, "a", "b"),
            Err(SoupError::InvalidNodeType { .. })
        ));
        doc.set_text(text, "y").unwrap();
        assert_eq!(doc[text].text(), Some("y"));
    }

    #[test]
    fn test_normalize_children() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.create_element("p", no_attrs());
        doc.append_child(root, p).unwrap();
        for part in ["a", "", "b"] {
            let t = doc.create_text(part);
            doc.append_child(p, t).unwrap();
        }
        let b = doc.create_element("b", no_attrs());
        doc.append_child(p, b).unwrap();
        let empty = doc.create_text("");
        doc.append_child(b, empty).unwrap();
        let tail = doc.create_text("c");
        doc.append_child(p, tail).unwrap();

        doc.normalize_children(root).unwrap();
        assert_eq!(names(&doc, p), vec!["'ab'", "b", "'c'"]);
        assert!(doc.child_ids(b).is_empty());
        assert!(!doc.contains(empty));
    }
}
