//! Selector matching
//!
//! Candidates are generated depth-first in document order, scoped by the
//! leading combinator of each alternative, and every candidate is tested
//! right-to-left against the compound/combinator chain by walking parent
//! and sibling links. There is no index and nothing is cached: `:nth-*`
//! counts siblings on every test.
//!
//! Each candidate is visited once, so the output is duplicate-free even
//! when several alternatives match the same element.

use super::ast::{Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector};
use crate::arena::Document;
use crate::node::{ElementRef, NodeRef};
use crate::sequence::Nodes;
use crate::types::NodeId;
use std::iter;
use std::sync::Arc;

/// What the leftmost compound of a chain must be related to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Related to this context node by the chain's leading combinator
    Context(NodeId),
    /// Anywhere in the document (used by `:not` and `Selector::matches`)
    Free,
}

/// Lazily select the elements matching any of `alternatives` relative to
/// `context`
pub fn select<'a>(
    doc: &'a Document,
    alternatives: Arc<[ComplexSelector]>,
    context: NodeId,
) -> Nodes<'a, ElementRef<'a>> {
    let Some(ctx) = doc.try_node_ref(context) else {
        return Nodes::empty();
    };

    let wants_self = alternatives.iter().any(ComplexSelector::is_empty);
    let wants_descendants = alternatives.iter().any(|c| {
        matches!(
            c.leading(),
            Some(Combinator::Descendant) | Some(Combinator::Child)
        )
    });
    let wants_siblings = alternatives.iter().any(|c| {
        matches!(
            c.leading(),
            Some(Combinator::Adjacent) | Some(Combinator::General)
        )
    });

    // ctx, then its subtree, then later siblings' subtrees: document order
    let mut candidates: Box<dyn Iterator<Item = NodeRef<'a>> + 'a> = Box::new(iter::empty());
    if wants_self {
        candidates = Box::new(candidates.chain(iter::once(ctx)));
    }
    if wants_descendants {
        candidates = Box::new(candidates.chain(ctx.descendants()));
    }
    if wants_siblings {
        let following = ctx
            .next_siblings()
            .flatten(|sibling| Nodes::new(iter::once(sibling).chain(sibling.descendants())));
        candidates = Box::new(candidates.chain(following));
    }

    Nodes::new(candidates)
        .filter_map(NodeRef::element)
        .filter(move |element| {
            alternatives
                .iter()
                .any(|complex| matches_complex(complex, *element, Anchor::Context(context)))
        })
}

/// Test one element against one alternative
pub fn matches_complex(complex: &ComplexSelector, element: ElementRef<'_>, anchor: Anchor) -> bool {
    if complex.is_empty() {
        return anchor == Anchor::Context(element.id());
    }
    match_part(&complex.parts, complex.parts.len() - 1, element, anchor)
}

/// Does `element` match `parts[idx]`, with everything to its left matching
/// somewhere along the combinator's direction?
fn match_part(
    parts: &[(Combinator, CompoundSelector)],
    idx: usize,
    element: ElementRef<'_>,
    anchor: Anchor,
) -> bool {
    let (combinator, compound) = &parts[idx];
    if !matches_compound(compound, element) {
        return false;
    }

    if idx == 0 {
        return match anchor {
            Anchor::Free => true,
            Anchor::Context(ctx) => related_to_context(*combinator, ctx, element),
        };
    }

    let left = |candidate: ElementRef<'_>| match_part(parts, idx - 1, candidate, anchor);
    match combinator {
        Combinator::Descendant => element.ancestors().into_iter().any(left),
        Combinator::Child => element.parent_element().is_some_and(left),
        Combinator::Adjacent => element.previous_element().is_some_and(left),
        Combinator::General => element
            .previous_siblings()
            .filter_map(NodeRef::element)
            .into_iter()
            .any(left),
    }
}

fn related_to_context(combinator: Combinator, ctx: NodeId, element: ElementRef<'_>) -> bool {
    let doc = element.document();
    let id = element.id();
    match combinator {
        Combinator::Descendant => id != ctx && doc.is_ancestor_or_self(ctx, id),
        Combinator::Child => doc.parent(id) == Some(ctx),
        Combinator::Adjacent => doc
            .try_node_ref(ctx)
            .and_then(|c| c.next_element())
            .is_some_and(|next| next.id() == id),
        Combinator::General => doc.following_sibling_ids(ctx).contains(&id),
    }
}

fn matches_compound(compound: &CompoundSelector, element: ElementRef<'_>) -> bool {
    if let Some(tag) = &compound.tag {
        if element.name() != tag {
            return false;
        }
    }
    compound
        .simples
        .iter()
        .all(|simple| matches_simple(simple, element))
}

fn matches_simple(simple: &SimpleSelector, element: ElementRef<'_>) -> bool {
    match simple {
        SimpleSelector::Class(class) => element.has_class(class),
        SimpleSelector::Id(id) => element.id_attr() == Some(id.as_str()),
        SimpleSelector::Attribute(attr) => element
            .attribute(&attr.name)
            .is_some_and(|value| attr.matches(value)),
        SimpleSelector::Pseudo(pseudo) => matches_pseudo(pseudo, element),
    }
}

fn matches_pseudo(pseudo: &PseudoClass, element: ElementRef<'_>) -> bool {
    match pseudo {
        PseudoClass::FirstChild => element.previous_element().is_none(),
        PseudoClass::LastChild => element.next_element().is_none(),
        PseudoClass::OnlyChild => {
            element.previous_element().is_none() && element.next_element().is_none()
        }
        PseudoClass::NthChild(nth) => nth.matches(element.index_of_element()),
        PseudoClass::NthLastChild(nth) => {
            let after = element.next_siblings().filter(|n| n.is_element()).count();
            nth.matches(after + 1)
        }
        PseudoClass::FirstOfType => same_type_before(element) == 0,
        PseudoClass::LastOfType => same_type_after(element) == 0,
        PseudoClass::OnlyOfType => same_type_before(element) == 0 && same_type_after(element) == 0,
        PseudoClass::NthOfType(nth) => nth.matches(same_type_before(element) + 1),
        PseudoClass::NthLastOfType(nth) => nth.matches(same_type_after(element) + 1),
        PseudoClass::Empty => element
            .children()
            .into_iter()
            .all(|child| child.as_text().is_some_and(str::is_empty)),
        PseudoClass::Root => element.parent().is_some_and(|p| p.is_document()),
        PseudoClass::Not(alternatives) => !alternatives
            .iter()
            .any(|complex| matches_complex(complex, element, Anchor::Free)),
        PseudoClass::Contains(needle) => element.text_content().contains(needle.as_str()),
    }
}

fn same_type_before(element: ElementRef<'_>) -> usize {
    let name = element.name();
    element
        .previous_siblings()
        .filter(move |n| n.element().is_some_and(|e| e.name() == name))
        .count()
}

fn same_type_after(element: ElementRef<'_>) -> usize {
    let name = element.name();
    element
        .next_siblings()
        .filter(move |n| n.element().is_some_and(|e| e.name() == name))
        .count()
}
