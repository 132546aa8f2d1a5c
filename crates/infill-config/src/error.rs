//! Error types for document loading.

use std::path::PathBuf;

use infill_engine::TraverseError;
use infill_env::EnvError;
use infill_types::TypeError;

/// Errors that can occur while loading and filling a document.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension does not name a supported format.
    #[error("unknown document format for {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("toml render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error(transparent)]
    Traverse(#[from] TraverseError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Convenience alias for loading results.
pub type LoadResult<T> = Result<T, LoadError>;
