//! Structural tree equality
//!
//! Children are compared after normalization: runs of adjacent text nodes
//! count as one text, and texts that end up empty are ignored. Elements
//! match on name plus attribute set (name -> literal value, order
//! independent); `class="a b"` and `class="b a"` differ.

use crate::node::NodeRef;
use crate::types::{Attribute, NodeData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Verbatim,
    Trimmed,
}

impl TextMode {
    fn apply(self, text: &str) -> &str {
        match self {
            TextMode::Verbatim => text,
            TextMode::Trimmed => text.trim(),
        }
    }
}

/// One normalized child: a merged text run or a non-text node
enum Item<'a> {
    Text(String),
    Node(NodeRef<'a>),
}

/// Are the two subtrees equal after text normalization?
pub fn equal(a: NodeRef<'_>, b: NodeRef<'_>) -> bool {
    compare(a, b, TextMode::Verbatim)
}

/// Like [`equal`], but every text node is trimmed before merging, so
/// whitespace around and between texts does not matter
pub fn equal_modulo_whitespace(a: NodeRef<'_>, b: NodeRef<'_>) -> bool {
    compare(a, b, TextMode::Trimmed)
}

fn compare(a: NodeRef<'_>, b: NodeRef<'_>, mode: TextMode) -> bool {
    match (a.node().data(), b.node().data()) {
        (NodeData::Text(x), NodeData::Text(y)) => mode.apply(x) == mode.apply(y),
        (
            NodeData::Element {
                name: name_a,
                attributes: attrs_a,
            },
            NodeData::Element {
                name: name_b,
                attributes: attrs_b,
            },
        ) => name_a == name_b && same_attributes(attrs_a, attrs_b) && same_children(a, b, mode),
        (NodeData::Document, NodeData::Document) => same_children(a, b, mode),
        _ => false,
    }
}

fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len()
        && a.iter()
            .all(|x| b.iter().any(|y| y.name == x.name && y.value == x.value))
}

fn same_children(a: NodeRef<'_>, b: NodeRef<'_>, mode: TextMode) -> bool {
    let left = normalized(a, mode);
    let right = normalized(b, mode);
    left.len() == right.len()
        && left.iter().zip(&right).all(|pair| match pair {
            (Item::Text(x), Item::Text(y)) => x == y,
            (Item::Node(x), Item::Node(y)) => compare(*x, *y, mode),
            _ => false,
        })
}

fn normalized<'a>(node: NodeRef<'a>, mode: TextMode) -> Vec<Item<'a>> {
    let mut items: Vec<Item<'a>> = Vec::new();
    for child in node.children() {
        let Some(text) = child.as_text() else {
            items.push(Item::Node(child));
            continue;
        };
        let text = mode.apply(text);
        match items.last_mut() {
            Some(Item::Text(run)) => run.push_str(text),
            _ => items.push(Item::Text(text.to_string())),
        }
    }
    items.retain(|item| !matches!(item, Item::Text(text) if text.is_empty()));
    items
}
