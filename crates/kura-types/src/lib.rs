//! Pure data types for kura — runtime values and container keys.
//!
//! This crate is a leaf dependency with no I/O and no traversal logic.
//! It exists so that consumers can work with kura's value model without
//! pulling in the collection library's dependencies.

pub mod value;

// Flat re-exports for convenience
pub use value::*;
