//! Document loading for infill.
//!
//! Reads JSON, YAML, or TOML into a [`Value`](infill_types::Value), fills
//! placeholders from the environment, and hands the result back either as a
//! value or as a typed configuration struct.
//!
//! # Key Types
//!
//! - [`Format`]: Supported document formats, detected from file extensions
//! - [`Strategy`]: In-place or copying traversal
//! - [`LoadError`]: Read, parse, and traversal failures

pub mod error;
pub mod format;
pub mod load;

pub use error::{LoadError, LoadResult};
pub use format::{parse_document, render, Format};
pub use load::{apply, infill, infill_document, load_config, load_document, parse_config, Strategy};
