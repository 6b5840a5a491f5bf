//! The orchestrator's private frame stack.

use crate::node::RecursiveNode;

/// One active depth level: the node being consumed there, plus whether
/// the children of its current position have already been emitted
/// (used by child-first ordering).
pub(crate) struct Frame {
    pub(crate) node: Box<dyn RecursiveNode>,
    pub(crate) expanded: bool,
}

impl Frame {
    pub(crate) fn new(node: Box<dyn RecursiveNode>) -> Self {
        Self {
            node,
            expanded: false,
        }
    }
}

/// Stack of child frames opened by descent.
///
/// The traversal root is not a frame here; it lives on the orchestrator
/// itself, so depth equals the number of open child frames and the
/// stack being empty means the cursor is at the root level. Frames are
/// created by `get_children` and destroyed by being popped on
/// backtrack; they are never reused across positions.
#[derive(Default)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, node: Box<dyn RecursiveNode>) {
        self.frames.push(Frame::new(node));
    }

    pub(crate) fn pop(&mut self) -> Option<Frame> {
        self.frames.pop()
    }

    pub(crate) fn top_mut(&mut self) -> Option<&mut Frame> {
        self.frames.last_mut()
    }

    pub(crate) fn top(&self) -> Option<&Frame> {
        self.frames.last()
    }

    /// Number of open child frames; the root level is depth 0.
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}
