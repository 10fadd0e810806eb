//! Lazy node sequences and scoped early exit
//!
//! A [`Nodes`] value is a pull-based cursor: nothing is visited until
//! something pulls, and a pull visits exactly one more item. Combinators
//! wrap the cursor without forcing it, so `first()` on the descendants of a
//! huge subtree touches one node, not the subtree.
//!
//! ```text
//! descendants ─▶ filter ─▶ map ─▶ first()
//!      ▲            ▲        ▲       │
//!      └────────────┴────────┴── pull┘   (one node at a time)
//! ```
//!
//! [`with_stop`] gives a closure a one-shot escape: calling [`Stop::stop`]
//! abandons every frame between it and the `with_stop` call (including
//! `iter`/`fold` callbacks in progress) and makes `with_stop` return the
//! value. It is implemented with unwinding, so it needs `panic = "unwind"`.

use crate::node::{ElementRef, NodeRef};
use std::cell::Cell;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use uuid::Uuid;

/// Lazy, single-pass, ordered sequence
///
/// `Nodes` is deliberately not an `Iterator` itself: its `nth` is 1-based
/// and several combinators are terminal. Use `into_iter()` to hand it to
/// std adapters or a `for` loop.
pub struct Nodes<'a, T> {
    inner: Box<dyn Iterator<Item = T> + 'a>,
}

impl<'a, T: 'a> Nodes<'a, T> {
    /// Wrap any iterator as a lazy sequence
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self {
            inner: Box::new(iter.into_iter()),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Pull the next item, `None` when exhausted
    pub fn pull(&mut self) -> Option<T> {
        self.inner.next()
    }

    pub fn map<U: 'a, F>(self, f: F) -> Nodes<'a, U>
    where
        F: FnMut(T) -> U + 'a,
    {
        Nodes::new(self.inner.map(f))
    }

    pub fn filter<F>(self, f: F) -> Self
    where
        F: FnMut(&T) -> bool + 'a,
    {
        Nodes::new(self.inner.filter(f))
    }

    pub fn filter_map<U: 'a, F>(self, f: F) -> Nodes<'a, U>
    where
        F: FnMut(T) -> Option<U> + 'a,
    {
        Nodes::new(self.inner.filter_map(f))
    }

    /// Concatenate `f(item)` for every item; a sub-sequence is only started
    /// once the cursor reaches its source item
    pub fn flatten<U: 'a, F>(self, f: F) -> Nodes<'a, U>
    where
        F: FnMut(T) -> Nodes<'a, U> + 'a,
    {
        Nodes::new(self.inner.flat_map(f))
    }

    /// Call `f` on every item in order (terminal)
    pub fn iter<F>(self, f: F)
    where
        F: FnMut(T),
    {
        self.inner.for_each(f)
    }

    /// Strict left fold (terminal)
    pub fn fold<A, F>(self, init: A, f: F) -> A
    where
        F: FnMut(A, T) -> A,
    {
        self.inner.fold(init, f)
    }

    /// Reverse the sequence; forces full evaluation
    pub fn rev(self) -> Self {
        let mut items = self.to_list();
        items.reverse();
        Nodes::new(items)
    }

    pub fn to_list(self) -> Vec<T> {
        self.inner.collect()
    }

    pub fn count(self) -> usize {
        self.inner.count()
    }

    pub fn last(self) -> Option<T> {
        self.inner.last()
    }

    /// The `k`-th item, 1-based; pulls at most `k` items
    pub fn nth(mut self, k: usize) -> Option<T> {
        if k == 0 {
            return None;
        }
        self.inner.nth(k - 1)
    }

    /// Pulls at most one item
    pub fn first(mut self) -> Option<T> {
        self.inner.next()
    }
}

impl<'a, T: 'a> IntoIterator for Nodes<'a, T> {
    type Item = T;
    type IntoIter = Box<dyn Iterator<Item = T> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner
    }
}

impl<'a, T: 'a> FromIterator<T> for Nodes<'a, T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Nodes::new(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> Nodes<'a, T>
where
    T: Into<NodeRef<'a>> + 'a,
{
    /// Keep only element nodes, narrowed to [`ElementRef`]
    pub fn elements(self) -> Nodes<'a, ElementRef<'a>> {
        self.filter_map(|item| {
            let node: NodeRef<'a> = item.into();
            node.element()
        })
    }

    /// Keep elements named `name` (compared lowercased)
    pub fn with_tag(self, name: &str) -> Nodes<'a, ElementRef<'a>> {
        let name = name.to_lowercase();
        self.elements().filter(move |e| e.name() == name)
    }

    /// Keep elements whose name is any of `names`
    pub fn with_tags(self, names: &[&str]) -> Nodes<'a, ElementRef<'a>> {
        let names: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
        self.elements()
            .filter(move |e| names.iter().any(|n| n == e.name()))
    }
}

/// Unwind payload: only the token travels, the value waits in the frame
struct Escape(Uuid);

/// One-shot escape capability handed out by [`with_stop`]
///
/// Borrowed for the duration of the `with_stop` call only, so it cannot be
/// stored or invoked after that call returns.
pub struct Stop<'s, T> {
    token: Uuid,
    slot: &'s Cell<Option<T>>,
    _not_send: PhantomData<*const ()>,
}

impl<T> Stop<'_, T> {
    /// Abandon the enclosing `with_stop` call, making it return `value`
    pub fn stop(&self, value: T) -> ! {
        self.slot.set(Some(value));
        panic::resume_unwind(Box::new(Escape(self.token)))
    }
}

/// Run `f` with a scoped [`Stop`]; returns `f`'s result, or the value
/// passed to `stop` if it was invoked
///
/// Escapes belonging to other (outer) `with_stop` frames and real panics
/// pass through untouched.
pub fn with_stop<T, F>(f: F) -> T
where
    F: FnOnce(&Stop<'_, T>) -> T,
{
    let slot = Cell::new(None);
    let stop = Stop {
        token: Uuid::new_v4(),
        slot: &slot,
        _not_send: PhantomData,
    };

    match panic::catch_unwind(AssertUnwindSafe(|| f(&stop))) {
        Ok(value) => value,
        Err(payload) => {
            let ours = matches!(payload.downcast_ref::<Escape>(), Some(Escape(token)) if *token == stop.token);
            match slot.take() {
                Some(value) if ours => value,
                _ => panic::resume_unwind(payload),
            }
        }
    }
}
