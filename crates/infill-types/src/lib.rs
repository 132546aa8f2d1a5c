//! Value model for infill.
//!
//! This crate describes the nested data that the traversal engine walks:
//! records with named fields, sequences, key-value mappings, optional
//! references, tagged unions, and scalar leaves. Every other infill crate
//! depends on `infill-types`.
//!
//! # Key Types
//!
//! - [`Value`]: A node in a nested document
//! - [`Kind`] / [`ScalarKind`]: Total classification of a node
//! - [`Record`] / [`Field`]: Fixed named fields with a per-field mutability flag
//! - [`Mapping`] / [`Key`]: Key-value entries whose keys are never rewritten
//! - [`Union`]: A named wrapper holding exactly one concrete value
//! - [`Opaque`]: Leaves that are carried through untouched
//! - [`Path`]: Location of a node, used in error reports

pub mod convert;
pub mod error;
pub mod kind;
pub mod mapping;
pub mod path;
pub mod serde_impl;
pub mod value;

pub use convert::{from_value, to_value};
pub use error::TypeError;
pub use kind::{Kind, ScalarKind};
pub use mapping::{Key, Mapping};
pub use path::{Path, Segment};
pub use value::{Field, Opaque, Record, Union, Value};
