//! The cursor protocol traversable containers implement.

use kura_types::{Key, Value};

use crate::TraverseResult;

/// A flat, resettable cursor over keyed positions.
///
/// `valid()` is idempotent and side-effect-free. `current()` and `key()`
/// return `None` when the cursor is not valid; when it is valid they
/// return the element and key at the current position. `next()` advances
/// exactly one logical position and may invalidate the cursor; `rewind()`
/// resets it to the first position.
///
/// Positioning is fallible so that implementations backed by external
/// collaborators (the filesystem) can surface their errors unchanged.
/// In-memory implementations never fail.
pub trait Node {
    /// True if the cursor is parked on a position.
    fn valid(&self) -> bool;

    /// The element at the current position, or `None` when invalid.
    fn current(&self) -> Option<Value>;

    /// The key at the current position, or `None` when invalid.
    fn key(&self) -> Option<Key>;

    /// Advance one position. Past-the-end calls are no-ops.
    fn next(&mut self) -> TraverseResult<()>;

    /// Reset to the first position.
    fn rewind(&mut self) -> TraverseResult<()>;
}

/// A [`Node`] whose positions may themselves hold nested containers.
///
/// This is the sole boundary of the traversal engine: anything
/// implementing it can be handed to [`Traversal`] as a root, wrapped in
/// a [`FilterNode`], or composed arbitrarily deep.
///
/// [`Traversal`]: crate::Traversal
/// [`FilterNode`]: crate::FilterNode
pub trait RecursiveNode: Node {
    /// True if the current position holds a container that can be
    /// descended into. Must be callable at any valid position without
    /// moving the cursor.
    fn has_children(&self) -> bool;

    /// A new, independently positioned node rooted at the current
    /// position's nested content. The child never aliases this cursor.
    ///
    /// Calling this where `has_children()` is false is a contract
    /// violation and returns [`TraverseError::NotAContainer`].
    ///
    /// [`TraverseError::NotAContainer`]: crate::TraverseError::NotAContainer
    fn get_children(&self) -> TraverseResult<Box<dyn RecursiveNode>>;
}
