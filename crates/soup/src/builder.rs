//! Tree construction from a signal stream
//!
//! The builder keeps a stack of open elements and appends every new node
//! to the innermost one. It is forgiving by default, the way markup in the
//! wild needs it to be:
//! - an end tag closes the nearest open element with that name, closing
//!   anything opened after it as well
//! - an end tag with no open match is ignored
//! - elements still open at the end of the stream are closed
//!
//! `strict` turns each of these into an `UnbalancedSignal` error.

use crate::arena::Document;
use crate::error::{Result, SoupError};
use crate::signals::Signal;
use crate::types::NodeId;
use crate::utils;
use serde::{Deserialize, Serialize};

/// Tree builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Reject unbalanced streams instead of repairing them
    pub strict: bool,
    /// Maximum depth of nested open elements
    pub max_depth: usize,
    /// Skip text signals that are empty or only whitespace
    pub drop_whitespace_text: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            strict: false,
            max_depth: 512,
            drop_whitespace_text: false,
        }
    }
}

/// Incremental signal consumer producing a [`Document`]
pub struct TreeBuilder {
    doc: Document,
    open: Vec<NodeId>,
    config: BuilderConfig,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self {
            doc: Document::new(),
            open: Vec::new(),
            config,
        }
    }

    /// Number of currently open elements
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or_else(|| self.doc.root())
    }

    fn append(&mut self, node: NodeId) {
        let parent = self.current();
        let end = self.doc.child_ids(parent).len();
        self.doc.link_at(parent, end, node);
    }

    /// Consume one signal
    pub fn push(&mut self, signal: Signal) -> Result<()> {
        match signal {
            Signal::StartTag { name, attributes } => {
                if self.open.len() >= self.config.max_depth {
                    return Err(SoupError::MaxDepthExceeded {
                        current: self.open.len() + 1,
                        max: self.config.max_depth,
                    });
                }
                let element = self.doc.create_element(
                    &name,
                    attributes.into_iter().map(|a| (a.name, a.value)),
                );
                self.append(element);
                self.open.push(element);
            }
            Signal::EndTag(name) => self.close(&name.to_lowercase())?,
            Signal::Text(text) => {
                if text.is_empty() || (self.config.drop_whitespace_text && utils::is_blank(&text)) {
                    return Ok(());
                }
                let node = self.doc.create_text(text);
                self.append(node);
            }
            Signal::Comment(_) => tracing::trace!("Dropping comment signal"),
            Signal::Doctype(doctype) => tracing::trace!("Dropping doctype signal '{}'", doctype),
            Signal::ProcessingInstruction(_) => {
                tracing::trace!("Dropping processing instruction signal")
            }
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<()> {
        let doc = &self.doc;
        let Some(pos) = self.open.iter().rposition(|&id| doc[id].name() == Some(name)) else {
            if self.config.strict {
                return Err(SoupError::UnbalancedSignal(format!(
                    "end tag </{name}> has no open element"
                )));
            }
            tracing::warn!("Ignoring unmatched end tag </{}>", name);
            return Ok(());
        };

        let implicit = self.open.len() - pos - 1;
        if implicit > 0 {
            if self.config.strict {
                return Err(SoupError::UnbalancedSignal(format!(
                    "end tag </{name}> would close {implicit} other open element(s)"
                )));
            }
            tracing::warn!(
                "End tag </{}> implicitly closes {} open element(s)",
                name,
                implicit
            );
        }
        self.open.truncate(pos);
        Ok(())
    }

    /// End of stream: close what is still open and hand out the document
    pub fn finish(self) -> Result<Document> {
        if !self.open.is_empty() {
            if self.config.strict {
                return Err(SoupError::UnbalancedSignal(format!(
                    "{} element(s) still open at end of stream",
                    self.open.len()
                )));
            }
            tracing::debug!(
                "Closing {} element(s) left open at end of stream",
                self.open.len()
            );
        }
        tracing::debug!("Built document with {} nodes", self.doc.len());
        Ok(self.doc)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Build a document from signals with the default (lenient) config
    pub fn from_signals<I>(signals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Signal>,
    {
        Self::from_signals_with(BuilderConfig::default(), signals)
    }

    pub fn from_signals_with<I>(config: BuilderConfig, signals: I) -> Result<Self>
    where
        I: IntoIterator<Item = Signal>,
    {
        let mut builder = TreeBuilder::with_config(config);
        for signal in signals {
            builder.push(signal)?;
        }
        builder.finish()
    }

    /// Build a document from a JSON array of signals
    pub fn from_json_signals(json: &str) -> Result<Self> {
        let signals: Vec<Signal> = serde_json::from_str(json)?;
        Self::from_signals(signals)
    }
}
