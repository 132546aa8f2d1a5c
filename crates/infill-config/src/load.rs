use std::fs;
use std::path::Path;

use infill_engine::{apply_copy, apply_in_place, Callbacks};
use infill_env::{EnvConfig, EnvLookup, EnvMapper};
use infill_types::{from_value, to_value, Value};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::format::{parse_document, Format};

/// Which traversal entry point to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Rewrite leaves through the document's own storage.
    #[default]
    InPlace,
    /// Build a new document and leave the input untouched.
    Copy,
}

/// Read and parse a document, detecting the format from its extension.
pub fn load_document(path: impl AsRef<Path>) -> LoadResult<Value> {
    let path = path.as_ref();
    let format = Format::from_path(path)?;
    let input = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), %format, bytes = input.len(), "read document");
    parse_document(&input, format)
}

/// Run `callbacks` over `value` with the chosen strategy.
pub fn apply(callbacks: &Callbacks, mut value: Value, strategy: Strategy) -> LoadResult<Value> {
    match strategy {
        Strategy::InPlace => {
            apply_in_place(callbacks, &mut value)?;
            Ok(value)
        }
        Strategy::Copy => Ok(apply_copy(callbacks, &value)?),
    }
}

/// Fill the placeholders in `value` from `lookup`.
pub fn infill_document<E>(
    value: Value,
    env: &EnvConfig,
    lookup: E,
    strategy: Strategy,
) -> LoadResult<Value>
where
    E: EnvLookup + Send + Sync + 'static,
{
    let callbacks = EnvMapper::new(env, lookup)?.callbacks();
    apply(&callbacks, value, strategy)
}

/// Fill the placeholders of a typed configuration, returning a new one.
pub fn infill<T, E>(config: &T, env: &EnvConfig, lookup: E) -> LoadResult<T>
where
    T: Serialize + DeserializeOwned,
    E: EnvLookup + Send + Sync + 'static,
{
    let value = to_value(config)?;
    let value = infill_document(value, env, lookup, Strategy::Copy)?;
    Ok(from_value(value)?)
}

/// Parse a document, fill its placeholders, and deserialize it into `T`.
pub fn parse_config<T, E>(input: &str, format: Format, env: &EnvConfig, lookup: E) -> LoadResult<T>
where
    T: DeserializeOwned,
    E: EnvLookup + Send + Sync + 'static,
{
    let value = parse_document(input, format)?;
    let value = infill_document(value, env, lookup, Strategy::InPlace)?;
    Ok(from_value(value)?)
}

/// Load a configuration file, fill its placeholders, and deserialize it
/// into `T`.
pub fn load_config<T, E>(path: impl AsRef<Path>, env: &EnvConfig, lookup: E) -> LoadResult<T>
where
    T: DeserializeOwned,
    E: EnvLookup + Send + Sync + 'static,
{
    let value = load_document(path)?;
    let value = infill_document(value, env, lookup, Strategy::InPlace)?;
    Ok(from_value(value)?)
}
