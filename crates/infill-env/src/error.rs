//! Error types for environment substitution.

/// Errors raised while configuring environment substitution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EnvError {
    /// An empty delimiter would turn every string into a placeholder.
    #[error("placeholder delimiter must not be empty")]
    EmptyDelimiter,
}

/// Convenience alias for environment results.
pub type EnvResult<T> = Result<T, EnvError>;
