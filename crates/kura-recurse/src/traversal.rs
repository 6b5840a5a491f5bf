//! The traversal orchestrator: drives a frame stack over any
//! [`RecursiveNode`] in one of three visit orders.

use kura_types::{Key, Value};

use crate::node::{Node, RecursiveNode};
use crate::stack::FrameStack;
use crate::{TraverseError, TraverseResult};

/// Which positions a traversal surfaces, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Only positions without children (or cut off by the depth limit),
    /// left to right. Containers are descended through, never emitted.
    #[default]
    LeavesOnly = 0,
    /// Every position at every depth, pre-order: a container is emitted
    /// before its first child subtree, then its next sibling follows.
    SelfFirst = 1,
    /// Every position at every depth, post-order: a container is
    /// emitted only after all of its descendants have been exhausted.
    ChildFirst = 2,
}

/// Orchestrator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No `rewind` yet; nothing is visible.
    Uninitialized,
    /// Parked on an externally visible position.
    Positioned,
    /// Ran out of positions. Only a fresh `rewind` leaves this state.
    Exhausted,
}

/// What the seek loop does before testing the deepest frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Settle,
    Advance,
    Descend,
}

/// Depth-driving traversal over a tree of [`RecursiveNode`]s.
///
/// The root node is handed over at construction and re-used by every
/// `rewind`; child nodes opened by descent live on an internal frame
/// stack and are released on backtrack. The three [`TraversalMode`]s
/// share one advance routine; only the emit-order decisions differ.
///
/// `current()` and `key()` report whatever the deepest frame's node
/// reports, and `depth()` is that frame's level (the root level is 0).
/// Exhaustion is not an error: `valid()` turning false is the sole
/// signal that traversal has ended. Collaborator errors (for example a
/// filesystem node failing to read a child directory) propagate
/// unchanged out of `rewind`/`next`.
///
/// A `Traversal` implements [`Node`] itself, so it can be consumed as
/// a flat iteration source or wrapped like any other node.
pub struct Traversal {
    root: Box<dyn RecursiveNode>,
    /// Children-emitted flag for the root frame's current position;
    /// child frames carry their own flag.
    root_expanded: bool,
    stack: FrameStack,
    mode: TraversalMode,
    max_depth: Option<usize>,
    /// Reserved for node-specific display flags; the orchestrator does
    /// not interpret them.
    flags: u32,
    state: State,
}

impl Traversal {
    /// Create a traversal over `root`. Nothing is visible until the
    /// first `rewind`.
    pub fn new(root: Box<dyn RecursiveNode>, mode: TraversalMode) -> Self {
        Self {
            root,
            root_expanded: false,
            stack: FrameStack::new(),
            mode,
            max_depth: None,
            flags: 0,
            state: State::Uninitialized,
        }
    }

    /// Set the depth limit (`None` = unlimited).
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Attach behavior flags. They are carried for node implementations
    /// to consult and are not interpreted by the orchestrator.
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// The traversal mode.
    pub fn mode(&self) -> TraversalMode {
        self.mode
    }

    /// The behavior flags handed in at construction.
    pub fn flags(&self) -> u32 {
        self.flags
    }

    /// The depth limit (`None` = unlimited).
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Change the depth limit. Takes effect on the next descent
    /// decision; frames already open stay open.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) {
        self.max_depth = max_depth;
    }

    /// Depth of the currently selected frame; the root level is 0.
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// True while parked on an externally visible position.
    pub fn valid(&self) -> bool {
        self.state == State::Positioned
    }

    /// The selected frame's current element, or `None` when the
    /// traversal is not positioned.
    pub fn current(&self) -> Option<Value> {
        if self.valid() {
            self.top_node_ref().current()
        } else {
            None
        }
    }

    /// The selected frame's current key, or `None` when the traversal
    /// is not positioned.
    pub fn key(&self) -> Option<Key> {
        if self.valid() {
            self.top_node_ref().key()
        } else {
            None
        }
    }

    /// Seed the stack with the root node and park on the first
    /// position the mode admits. Re-rewinding after exhaustion starts
    /// the traversal over on the same root object.
    pub fn rewind(&mut self) -> TraverseResult<()> {
        self.stack.clear();
        self.root_expanded = false;
        self.state = State::Uninitialized;
        self.root.rewind()?;
        tracing::debug!(mode = ?self.mode, max_depth = ?self.max_depth, "rewind traversal");
        self.seek(Step::Settle)
    }

    /// Advance to the next position the mode admits. A no-op unless
    /// currently positioned.
    pub fn next(&mut self) -> TraverseResult<()> {
        if self.state != State::Positioned {
            return Ok(());
        }
        // Pre-order surfaces a container before its subtree, so the
        // descent from an emitted container happens here, on the call
        // after it was surfaced.
        let step = if self.mode == TraversalMode::SelfFirst && self.can_descend() {
            Step::Descend
        } else {
            Step::Advance
        };
        self.seek(step)
    }

    /// Drain the whole traversal into key/value pairs, rewinding first.
    pub fn collect_entries(&mut self) -> TraverseResult<Vec<(Key, Value)>> {
        self.rewind()?;
        let mut out = Vec::new();
        while self.valid() {
            if let (Some(key), Some(value)) = (self.key(), self.current()) {
                out.push((key, value));
            }
            self.next()?;
        }
        Ok(out)
    }

    /// The single advance routine all three modes share.
    ///
    /// Runs the pre-step, then loops: an exhausted frame backtracks
    /// (emitting the parent container in child-first order), a valid
    /// position either triggers a descent or becomes the visible
    /// position, per mode. Descents blocked by the depth limit count as
    /// "no children". Containers whose child node is immediately empty
    /// are popped straight back out, so they are never emitted as
    /// leaves.
    fn seek(&mut self, mut step: Step) -> TraverseResult<()> {
        loop {
            match step {
                Step::Advance => {
                    self.top_node_mut().next()?;
                    self.set_top_expanded(false);
                }
                Step::Descend => {
                    let child = self.top_node_ref().get_children()?;
                    self.stack.push(child);
                    tracing::trace!(depth = self.stack.depth(), "descend");
                    self.top_node_mut().rewind()?;
                }
                Step::Settle => {}
            }
            step = Step::Settle;

            if !self.top_node_ref().valid() {
                if self.stack.is_empty() {
                    // The root frame never pops; its exhaustion ends
                    // the traversal.
                    self.state = State::Exhausted;
                    return Ok(());
                }
                self.stack.pop();
                tracing::trace!(depth = self.stack.depth(), "backtrack");
                if self.mode == TraversalMode::ChildFirst {
                    // All descendants are out; the container itself is
                    // the next visible position.
                    self.set_top_expanded(true);
                    self.state = State::Positioned;
                    return Ok(());
                }
                step = Step::Advance;
                continue;
            }

            let descend = match self.mode {
                TraversalMode::LeavesOnly => self.can_descend(),
                TraversalMode::SelfFirst => false,
                TraversalMode::ChildFirst => !self.top_expanded() && self.can_descend(),
            };
            if descend {
                step = Step::Descend;
                continue;
            }

            self.state = State::Positioned;
            return Ok(());
        }
    }

    /// True if the current position has children and opening them would
    /// not exceed the depth limit. Checked before every descent; a
    /// blocked descent makes the position a leaf, never an error.
    fn can_descend(&self) -> bool {
        !self.exceeds_max_depth() && self.top_node_ref().has_children()
    }

    fn exceeds_max_depth(&self) -> bool {
        matches!(self.max_depth, Some(max) if self.stack.depth() >= max)
    }

    fn top_node_mut(&mut self) -> &mut dyn RecursiveNode {
        match self.stack.top_mut() {
            Some(frame) => frame.node.as_mut(),
            None => self.root.as_mut(),
        }
    }

    fn top_node_ref(&self) -> &dyn RecursiveNode {
        match self.stack.top() {
            Some(frame) => frame.node.as_ref(),
            None => self.root.as_ref(),
        }
    }

    fn top_expanded(&self) -> bool {
        match self.stack.top() {
            Some(frame) => frame.expanded,
            None => self.root_expanded,
        }
    }

    fn set_top_expanded(&mut self, expanded: bool) {
        match self.stack.top_mut() {
            Some(frame) => frame.expanded = expanded,
            None => self.root_expanded = expanded,
        }
    }
}

impl Node for Traversal {
    fn valid(&self) -> bool {
        Traversal::valid(self)
    }

    fn current(&self) -> Option<Value> {
        Traversal::current(self)
    }

    fn key(&self) -> Option<Key> {
        Traversal::key(self)
    }

    fn next(&mut self) -> TraverseResult<()> {
        Traversal::next(self)
    }

    fn rewind(&mut self) -> TraverseResult<()> {
        Traversal::rewind(self)
    }
}

impl RecursiveNode for Traversal {
    /// A traversal is a flat source; its positions are never descended
    /// into again.
    fn has_children(&self) -> bool {
        false
    }

    fn get_children(&self) -> TraverseResult<Box<dyn RecursiveNode>> {
        Err(TraverseError::NotAContainer(
            "a traversal is a flat source".into(),
        ))
    }
}
