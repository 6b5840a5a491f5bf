//! Snapshot cursor over a nested in-memory container.

use kura_types::{Key, Value};

use crate::node::{Node, RecursiveNode};
use crate::{TraverseError, TraverseResult};

/// Cursor over a [`Value::Map`] snapshot.
///
/// The key/value pairs are copied out of the source container at
/// construction time and sorted once: integer keys ascending, then
/// string keys lexicographically, regardless of the container's
/// insertion order. Every nested child node reproduces the same
/// ordering, so two traversals of the same container always visit
/// positions identically.
pub struct ArrayNode {
    entries: Vec<(Key, Value)>,
    pos: usize,
}

impl ArrayNode {
    /// Snapshot a container value.
    ///
    /// Returns [`TraverseError::NotAContainer`] for scalar values.
    pub fn new(value: &Value) -> TraverseResult<Self> {
        match value.as_map() {
            Some(pairs) => Ok(Self::from_pairs(pairs.to_vec())),
            None => Err(TraverseError::NotAContainer(format!("{value:?}"))),
        }
    }

    /// Snapshot explicit key/value pairs.
    pub fn from_pairs(mut entries: Vec<(Key, Value)>) -> Self {
        // Key's Ord is exactly the required ordering; the sort is stable,
        // so duplicate keys keep their insertion order.
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        Self { entries, pos: 0 }
    }

    /// Number of positions in the snapshot.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the snapshot holds no positions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Node for ArrayNode {
    fn valid(&self) -> bool {
        self.pos < self.entries.len()
    }

    fn current(&self) -> Option<Value> {
        self.entries.get(self.pos).map(|(_, v)| v.clone())
    }

    fn key(&self) -> Option<Key> {
        self.entries.get(self.pos).map(|(k, _)| k.clone())
    }

    fn next(&mut self) -> TraverseResult<()> {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
        Ok(())
    }

    fn rewind(&mut self) -> TraverseResult<()> {
        self.pos = 0;
        Ok(())
    }
}

impl RecursiveNode for ArrayNode {
    fn has_children(&self) -> bool {
        self.entries
            .get(self.pos)
            .is_some_and(|(_, v)| v.is_container())
    }

    fn get_children(&self) -> TraverseResult<Box<dyn RecursiveNode>> {
        let (key, value) = self
            .entries
            .get(self.pos)
            .ok_or_else(|| TraverseError::NotAContainer("cursor is not valid".into()))?;
        match value.as_map() {
            Some(pairs) => Ok(Box::new(Self::from_pairs(pairs.to_vec()))),
            None => Err(TraverseError::NotAContainer(format!("key {key}"))),
        }
    }
}
