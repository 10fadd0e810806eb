//! CSS selector engine
//!
//! ```text
//! "ul > li.x" ──parser──▶ Vec<ComplexSelector> ──matcher──▶ Nodes<ElementRef>
//!                          (compiled once)         (lazy, document order)
//! ```
//!
//! Compilation is the only fallible step; matching never errors.

pub mod ast;
pub mod matcher;
pub mod parser;

use crate::error::Result;
use crate::node::ElementRef;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub use ast::{
    AttrOp, AttrSelector, Combinator, ComplexSelector, CompoundSelector, Nth, PseudoClass,
    SimpleSelector,
};

/// A compiled selector list
///
/// The alternatives are shared, so handing a compiled selector to a lazy
/// selection does not copy it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Arc<[ComplexSelector]>,
}

impl Selector {
    /// Compile selector text; fails with `SelectorSyntax`
    pub fn parse(text: &str) -> Result<Self> {
        let alternatives = parser::parse(text)?;
        tracing::debug!(
            "Compiled selector '{}' into {} alternative(s)",
            text,
            alternatives.len()
        );
        Ok(Self {
            source: text.to_string(),
            alternatives: alternatives.into(),
        })
    }

    /// The comma-separated alternatives, left to right
    pub fn alternatives(&self) -> &[ComplexSelector] {
        &self.alternatives
    }

    pub(crate) fn shared_alternatives(&self) -> Arc<[ComplexSelector]> {
        Arc::clone(&self.alternatives)
    }

    /// Original selector text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Does `element` match any alternative, with no context restriction?
    ///
    /// Leading combinators are ignored here; the leftmost compound may sit
    /// anywhere in the document.
    pub fn matches(&self, element: ElementRef<'_>) -> bool {
        self.alternatives
            .iter()
            .any(|complex| matcher::matches_complex(complex, element, matcher::Anchor::Free))
    }
}

impl FromStr for Selector {
    type Err = crate::error::SoupError;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
