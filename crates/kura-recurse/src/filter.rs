//! Admission-filtered view over a recursive node.

use kura_types::{Key, Value};

use crate::node::{Node, RecursiveNode};
use crate::TraverseResult;

/// The admission predicate a [`FilterNode`] applies.
///
/// `accept` is evaluated against the inner node's current position.
/// Policies must be `Clone` because descending re-wraps the inner
/// node's children in a new filter carrying the same policy.
pub trait Admission: Clone {
    /// True if the inner node's current position should be visible.
    fn accept(&self, node: &dyn RecursiveNode) -> bool;
}

/// Admission policy that accepts only positions which themselves have
/// children — the parent-only view.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParentsOnly;

impl Admission for ParentsOnly {
    fn accept(&self, node: &dyn RecursiveNode) -> bool {
        node.has_children()
    }
}

/// Adapter turning a cloneable closure into an [`Admission`] policy.
#[derive(Clone)]
pub struct AcceptFn<F>(pub F)
where
    F: Fn(&dyn RecursiveNode) -> bool + Clone;

impl<F> Admission for AcceptFn<F>
where
    F: Fn(&dyn RecursiveNode) -> bool + Clone,
{
    fn accept(&self, node: &dyn RecursiveNode) -> bool {
        (self.0)(node)
    }
}

/// Wraps one recursive node behind an admission policy.
///
/// Positioning always leaves the filter either exhausted or parked on
/// an accepted position: rejected positions are stepped over inside
/// `rewind`/`next` and are never observable through `valid`/`current`.
/// `has_children` and `get_children` delegate to the inner node — a
/// filter changes which siblings are visible, not what has children —
/// and `get_children` re-wraps the child node in a new filter of the
/// same kind, so the view holds at every depth.
pub struct FilterNode<A: Admission> {
    inner: Box<dyn RecursiveNode>,
    policy: A,
}

impl<A: Admission> FilterNode<A> {
    /// Wrap a node behind the given policy.
    pub fn new(inner: Box<dyn RecursiveNode>, policy: A) -> Self {
        Self { inner, policy }
    }

    /// Step the inner node forward until it is exhausted or parked on
    /// an accepted position.
    fn settle(&mut self) -> TraverseResult<()> {
        while self.inner.valid() && !self.policy.accept(self.inner.as_ref()) {
            self.inner.next()?;
        }
        Ok(())
    }
}

impl<A: Admission> Node for FilterNode<A> {
    fn valid(&self) -> bool {
        self.inner.valid()
    }

    fn current(&self) -> Option<Value> {
        self.inner.current()
    }

    fn key(&self) -> Option<Key> {
        self.inner.key()
    }

    fn next(&mut self) -> TraverseResult<()> {
        // Always advance at least once, then settle on the next accept.
        self.inner.next()?;
        self.settle()
    }

    fn rewind(&mut self) -> TraverseResult<()> {
        self.inner.rewind()?;
        self.settle()
    }
}

impl<A: Admission + 'static> RecursiveNode for FilterNode<A> {
    fn has_children(&self) -> bool {
        self.inner.has_children()
    }

    fn get_children(&self) -> TraverseResult<Box<dyn RecursiveNode>> {
        let children = self.inner.get_children()?;
        Ok(Box::new(FilterNode::new(children, self.policy.clone())))
    }
}
