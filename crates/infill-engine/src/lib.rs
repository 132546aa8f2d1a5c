//! Traversal engine for infill.
//!
//! Walks a nested [`Value`](infill_types::Value) depth-first, hands every
//! string, integer, and floating point leaf to the matching callback in a
//! [`Callbacks`] registry, and writes the result back. Two strategies:
//!
//! - [`apply_in_place`] rewrites leaves through the value's own storage.
//!   The whole value is validated before the first write, so a failed call
//!   leaves it untouched.
//! - [`apply_copy`] leaves the input alone and returns a structurally
//!   identical copy with substitutions applied.
//!
//! Neither strategy changes shape: record fields, sequence lengths, and
//! mapping key sets are preserved. Cyclic values are not detected and
//! recursion depth is unbounded.
//!
//! # Key Types
//!
//! - [`Callbacks`]: Optional per-scalar-kind callbacks plus the mapping tier
//! - [`MappingTier`]: Which mapping value shapes the engine accepts
//! - [`TraverseError`]: Fatal shape and addressability failures

pub mod callbacks;
pub mod error;
pub mod traverse;

pub use callbacks::{Callbacks, FloatFn, IntFn, MappingTier, StringFn};
pub use error::{TraverseError, TraverseResult};
pub use traverse::{apply_copy, apply_in_place, walk_leaves};
