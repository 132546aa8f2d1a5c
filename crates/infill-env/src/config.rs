use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};

/// What a placeholder becomes when its key is not set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissPolicy {
    /// Substitute an empty string, as an unset variable reads.
    #[default]
    Empty,
    /// Leave the placeholder text as it was.
    KeepPlaceholder,
}

/// Configuration for environment substitution.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    /// Leading token that marks a placeholder.
    pub delimiter: String,
    /// Prepended to the placeholder name to form the lookup key.
    pub prefix: String,
    /// Behaviour when the lookup key is not set.
    pub on_missing: MissPolicy,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            delimiter: "$".into(),
            prefix: String::new(),
            on_missing: MissPolicy::Empty,
        }
    }
}

impl EnvConfig {
    pub fn new(delimiter: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn with_miss_policy(mut self, on_missing: MissPolicy) -> Self {
        self.on_missing = on_missing;
        self
    }

    pub fn validate(&self) -> EnvResult<()> {
        if self.delimiter.is_empty() {
            return Err(EnvError::EmptyDelimiter);
        }
        Ok(())
    }
}
