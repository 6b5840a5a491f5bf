//! kura-recurse: Recursive traversal over tree-shaped collections.
//!
//! Provides:
//! - **Node / RecursiveNode**: The cursor protocol any container implements
//!   to become traversable
//! - **ArrayNode**: Snapshot cursor over a nested [`Value`] container with
//!   deterministic key ordering
//! - **DirNode**: Snapshot cursor over a directory, with behavior flags
//! - **FilterNode**: Admission-predicate wrapper that composes with descent
//! - **Traversal**: The depth-driving orchestrator with three visit orders
//!
//! The engine is fully synchronous. Nodes are consumed through the cursor
//! protocol alone; the orchestrator never depends on a concrete node kind.
//!
//! [`Value`]: kura_types::Value

mod array;
mod dir;
mod filter;
mod node;
mod stack;
mod traversal;

pub use array::ArrayNode;
pub use dir::{DirEntry, DirFlags, DirNode};
pub use filter::{AcceptFn, Admission, FilterNode, ParentsOnly};
pub use node::{Node, RecursiveNode};
pub use traversal::{Traversal, TraversalMode};

use thiserror::Error;

/// Errors from node construction and traversal.
#[derive(Debug, Error)]
pub enum TraverseError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not a directory: {0}")]
    NotADirectory(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// Protocol contract violation: `get_children` was called at a
    /// position that `has_children` does not admit.
    #[error("not a container: {0}")]
    NotAContainer(String),
    #[error("io error: {0}")]
    Io(String),
}

/// Result type for traversal operations.
pub type TraverseResult<T> = Result<T, TraverseError>;
