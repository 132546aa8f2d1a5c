//! Environment substitution for infill.
//!
//! A leaf string that starts with the configured delimiter is a placeholder:
//! the delimiter is stripped, the prefix prepended, and the resulting key
//! looked up in an [`EnvLookup`]. Every other string passes through
//! unchanged. This is the only place environment policy lives; the engine
//! itself never reads the environment.
//!
//! # Key Types
//!
//! - [`EnvConfig`] / [`MissPolicy`]: Delimiter, prefix, and lookup-miss policy
//! - [`EnvLookup`] / [`ProcessEnv`]: The environment-state collaborator
//! - [`EnvMapper`]: The string callback, and its [`Placeholder`] report

pub mod config;
pub mod error;
pub mod lookup;
pub mod mapper;

pub use config::{EnvConfig, MissPolicy};
pub use error::{EnvError, EnvResult};
pub use lookup::{EnvLookup, ProcessEnv};
pub use mapper::{EnvMapper, Placeholder};
