//! Soup: markup tree querying and surgery
//!
//! An in-memory document tree with CSS-selector queries, lazy traversal
//! and structural edits, for scraping and rewriting markup.
//!
//! ## Design
//!
//! - **Data structures first**: one arena per document, nodes named by
//!   generation-checked handles, parent links that never own
//! - **Nothing eager**: every traversal and selection is a pull-based
//!   [`Nodes`] cursor; `first()` on a huge subtree touches one node
//! - **All-or-nothing edits**: mutations validate before they write
//!
//! ```text
//! Signal stream ─▶ TreeBuilder ─▶ Document (arena) ─▶ Document::signals ─▶ serializer
//!                                     │  ▲
//!                        NodeRef/select  │ mutate (append, wrap, swap, ...)
//!                                     ▼  │
//!                                Nodes<ElementRef>
//! ```
//!
//! ## Example
//!
//! ```
//! use soup::{Document, Signal};
//!
//! let doc = Document::from_signals(vec![
//!     Signal::start("ul", Vec::<(String, String)>::new()),
//!     Signal::start("li", Vec::<(String, String)>::new()),
//!     Signal::text("One"),
//!     Signal::end("li"),
//!     Signal::start("li", Vec::<(String, String)>::new()),
//!     Signal::text("Two"),
//!     Signal::end("li"),
//!     Signal::end("ul"),
//! ])?;
//!
//! let items: Vec<&str> = doc
//!     .root_ref()
//!     .select("ul > li")?
//!     .filter_map(|li| li.leaf_text())
//!     .to_list();
//! assert_eq!(items, vec!["One", "Two"]);
//! # Ok::<(), soup::SoupError>(())
//! ```

pub mod arena;
pub mod builder;
pub mod equality;
pub mod error;
pub mod mutate;
pub mod node;
pub mod select;
pub mod sequence;
pub mod signals;
pub mod types;
pub mod utils;

pub use arena::Document;
pub use builder::{BuilderConfig, TreeBuilder};
pub use equality::{equal, equal_modulo_whitespace};
pub use error::{Result, SoupError};
pub use node::{ElementRef, NodeRef};
pub use select::Selector;
pub use sequence::{with_stop, Nodes, Stop};
pub use signals::{Signal, Signals};
pub use types::*;

/// Tiny markup-to-signals reader for unit tests
///
/// Understands tags, quoted attributes, `<x/>` and raw text. No entities,
/// comments, or `>` inside attribute values.
#[cfg(test)]
pub(crate) mod test_support {
    use crate::{Document, Signal};

    pub(crate) fn signals(markup: &str) -> Vec<Signal> {
        let mut out = Vec::new();
        let mut rest = markup;
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').expect("unterminated end tag");
                out.push(Signal::end(after[..end].trim()));
                rest = &after[end + 1..];
            } else if let Some(after) = rest.strip_prefix('<') {
                let end = after.find('>').expect("unterminated start tag");
                let tag = &after[..end];
                let (tag, self_closing) = match tag.strip_suffix('/') {
                    Some(inner) => (inner, true),
                    None => (tag, false),
                };
                let (name, attrs) = tag.split_once(char::is_whitespace).unwrap_or((tag, ""));
                out.push(Signal::start(name, attributes(attrs)));
                if self_closing {
                    out.push(Signal::end(name));
                }
                rest = &after[end + 1..];
            } else {
                let end = rest.find('<').unwrap_or(rest.len());
                out.push(Signal::text(&rest[..end]));
                rest = &rest[end..];
            }
        }
        out
    }

    fn attributes(mut rest: &str) -> Vec<(String, String)> {
        let mut out = Vec::new();
        rest = rest.trim_start();
        while !rest.is_empty() {
            let name_end = rest
                .find(|c: char| c == '=' || c.is_whitespace())
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = &rest[name_end..];
            match rest.strip_prefix('=') {
                Some(quoted) => {
                    let quote = quoted.chars().next().expect("missing attribute value");
                    let body = &quoted[quote.len_utf8()..];
                    let close = body.find(quote).expect("unterminated attribute value");
                    out.push((name.to_string(), body[..close].to_string()));
                    rest = &body[close + quote.len_utf8()..];
                }
                None => out.push((name.to_string(), String::new())),
            }
            rest = rest.trim_start();
        }
        out
    }

    pub(crate) fn parse(markup: &str) -> Document {
        Document::from_signals(signals(markup)).expect("test markup builds")
    }
}
