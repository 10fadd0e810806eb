//! Compiled selector representation
//!
//! A [`ComplexSelector`] is stored left-to-right. Each part carries the
//! combinator that relates it to the part on its left; for the first part
//! that combinator relates it to the context node instead (descendant when
//! the selector text has no leading combinator).
//!
//! ```text
//! "> ul li.x"  =>  [(Child, ul), (Descendant, li.x)]
//! ```

/// Structural relationship between two compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
    /// `+`: previous + next
    Adjacent,
    /// `~`: previous ~ later
    General,
}

/// Attribute selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=v]`
    Equals,
    /// `[attr~=v]`
    Includes,
    /// `[attr|=v]`
    DashMatch,
    /// `[attr^=v]`
    Prefix,
    /// `[attr$=v]`
    Suffix,
    /// `[attr*=v]`
    Substring,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttrSelector {
    pub name: String,
    pub op: AttrOp,
    /// Empty for `Exists`
    pub value: String,
}

impl AttrSelector {
    pub fn matches(&self, actual: &str) -> bool {
        let v = self.value.as_str();
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == v,
            AttrOp::Includes => crate::utils::has_token(actual, v),
            AttrOp::DashMatch => {
                actual == v || (actual.starts_with(v) && actual[v.len()..].starts_with('-'))
            }
            AttrOp::Prefix => !v.is_empty() && actual.starts_with(v),
            AttrOp::Suffix => !v.is_empty() && actual.ends_with(v),
            AttrOp::Substring => !v.is_empty() && actual.contains(v),
        }
    }
}

/// `an+b` coefficients of the `:nth-*` pseudo-classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nth {
    pub a: i32,
    pub b: i32,
}

impl Nth {
    pub fn new(a: i32, b: i32) -> Self {
        Self { a, b }
    }

    /// Is there an `n >= 0` with `a*n + b == position`? (1-based position)
    pub fn matches(&self, position: usize) -> bool {
        let position = position as i64;
        let (a, b) = (self.a as i64, self.b as i64);
        if a == 0 {
            return position == b;
        }
        let diff = position - b;
        diff % a == 0 && diff / a >= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    NthChild(Nth),
    NthLastChild(Nth),
    FirstOfType,
    LastOfType,
    OnlyOfType,
    NthOfType(Nth),
    NthLastOfType(Nth),
    Empty,
    Root,
    /// Matches when none of the alternatives match
    Not(Vec<ComplexSelector>),
    /// The concatenated descendant text contains the literal substring
    Contains(String),
}

/// One constraint inside a compound selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    Class(String),
    Id(String),
    Attribute(AttrSelector),
    Pseudo(PseudoClass),
}

/// Type/universal plus constraints, no combinator inside
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompoundSelector {
    /// Lowercase tag name; `None` for `*` or an omitted type
    pub tag: Option<String>,
    pub simples: Vec<SimpleSelector>,
}

/// A chain of compound selectors joined by combinators
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplexSelector {
    pub parts: Vec<(Combinator, CompoundSelector)>,
}

impl ComplexSelector {
    /// The empty selector, which selects the context element itself
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Relation of the leftmost compound to the context node
    pub fn leading(&self) -> Option<Combinator> {
        self.parts.first().map(|(combinator, _)| *combinator)
    }
}
