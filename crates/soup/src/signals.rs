//! Structural signal stream
//!
//! Signals are the tree's boundary with the outside: a tokenizer produces
//! them for [`TreeBuilder`](crate::builder::TreeBuilder), and
//! [`Document::signals`] replays any subtree as the same shape for a
//! serializer to render.
//!
//! ```text
//! <ul><li>One</li></ul>
//!   => StartTag(ul) StartTag(li) Text("One") EndTag(li) EndTag(ul)
//! ```
//!
//! JSON form (externally tagged):
//!
//! ```json
//! [{"start_tag": {"name": "li", "attributes": [{"name": "id", "value": "a"}]}},
//!  {"text": "One"},
//!  {"end_tag": "li"}]
//! ```

use crate::arena::Document;
use crate::error::Result;
use crate::types::{Attribute, NodeData, NodeId};
use serde::{Deserialize, Serialize};

/// One structural event of a markup stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    StartTag {
        name: String,
        #[serde(default)]
        attributes: Vec<Attribute>,
    },
    EndTag(String),
    Text(String),
    /// Passed through by tokenizers; not represented in the tree
    Comment(String),
    Doctype(String),
    ProcessingInstruction(String),
}

impl Signal {
    /// `StartTag` from (name, value) pairs
    pub fn start<I, K, V>(name: &str, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Signal::StartTag {
            name: name.to_string(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| Attribute::new(k, v))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        Signal::EndTag(name.to_string())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Signal::Text(text.into())
    }
}

enum Frame {
    Enter(NodeId),
    Exit(NodeId),
}

/// Lazy pre-order signal emission; see [`Document::signals`]
pub struct Signals<'a> {
    doc: &'a Document,
    stack: Vec<Frame>,
}

impl Iterator for Signals<'_> {
    type Item = Signal;

    fn next(&mut self) -> Option<Signal> {
        let doc = self.doc;
        loop {
            match self.stack.pop()? {
                Frame::Enter(id) => {
                    let Some(node) = doc.get(id) else {
                        continue;
                    };
                    let children = node.children().iter().rev().map(|&c| Frame::Enter(c));
                    match node.data() {
                        NodeData::Document => self.stack.extend(children),
                        NodeData::Element { name, attributes } => {
                            self.stack.push(Frame::Exit(id));
                            self.stack.extend(children);
                            return Some(Signal::StartTag {
                                name: name.clone(),
                                attributes: attributes.to_vec(),
                            });
                        }
                        NodeData::Text(text) => return Some(Signal::Text(text.clone())),
                    }
                }
                Frame::Exit(id) => {
                    let name = doc.get(id).and_then(|n| n.name()).unwrap_or_default();
                    return Some(Signal::EndTag(name.to_string()));
                }
            }
        }
    }
}

impl Document {
    /// Signals for the subtree at `node`, in document order
    ///
    /// A document-kind node emits only its children. Attributes come out
    /// in stored order and text verbatim. A stale handle yields nothing.
    pub fn signals(&self, node: NodeId) -> Signals<'_> {
        Signals {
            doc: self,
            stack: vec![Frame::Enter(node)],
        }
    }

    /// The subtree's signals as a JSON array
    pub fn signals_to_json(&self, node: NodeId) -> Result<String> {
        self.require(node)?;
        let signals: Vec<Signal> = self.signals(node).collect();
        Ok(serde_json::to_string(&signals)?)
    }
}
