use infill_engine::{walk_leaves, Callbacks};
use infill_types::{Path, Value};
use tracing::debug;

use crate::config::{EnvConfig, MissPolicy};
use crate::error::EnvResult;
use crate::lookup::EnvLookup;

/// A placeholder found in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    /// Where the placeholder sits.
    pub path: Path,
    /// The leaf text, delimiter included.
    pub raw: String,
    /// The derived lookup key.
    pub key: String,
    /// Whether the lookup currently has a value for `key`.
    pub resolved: bool,
}

/// Resolves placeholder strings against an environment lookup.
#[derive(Clone, Debug)]
pub struct EnvMapper<E> {
    config: EnvConfig,
    lookup: E,
}

impl<E: EnvLookup> EnvMapper<E> {
    /// Create a mapper. Fails if the configuration is invalid.
    pub fn new(config: &EnvConfig, lookup: E) -> EnvResult<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            lookup,
        })
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn is_placeholder(&self, line: &str) -> bool {
        line.starts_with(self.config.delimiter.as_str())
    }

    /// The lookup key for a placeholder: prefix followed by the text with
    /// every occurrence of the delimiter removed. `None` for plain strings.
    pub fn key_for(&self, line: &str) -> Option<String> {
        if !self.is_placeholder(line) {
            return None;
        }
        let name = line.replace(self.config.delimiter.as_str(), "");
        Some(format!("{}{}", self.config.prefix, name))
    }

    /// Resolve one leaf string.
    pub fn map_string(&self, line: &str) -> String {
        let Some(key) = self.key_for(line) else {
            return line.to_owned();
        };
        match self.lookup.lookup(&key) {
            Some(value) => value,
            None => {
                debug!(key = %key, policy = ?self.config.on_missing, "environment key not set");
                match self.config.on_missing {
                    MissPolicy::Empty => String::new(),
                    MissPolicy::KeepPlaceholder => line.to_owned(),
                }
            }
        }
    }

    /// Every placeholder a traversal would reach, in traversal order.
    pub fn placeholders(&self, value: &Value) -> Vec<Placeholder> {
        let mut found = Vec::new();
        walk_leaves(value, |path, leaf| {
            let Some(raw) = leaf.as_str() else {
                return;
            };
            if let Some(key) = self.key_for(raw) {
                let resolved = self.lookup.lookup(&key).is_some();
                found.push(Placeholder {
                    path: path.clone(),
                    raw: raw.to_owned(),
                    key,
                    resolved,
                });
            }
        });
        found
    }
}

impl<E: EnvLookup + Send + Sync + 'static> EnvMapper<E> {
    /// A registry with this mapper in the string slot and every other slot
    /// empty.
    pub fn callbacks(self) -> Callbacks {
        Callbacks::new().on_string(move |line| self.map_string(line))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use infill_engine::{apply_copy, apply_in_place};
    use infill_types::Record;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapper(pairs: &[(&str, &str)]) -> EnvMapper<HashMap<String, String>> {
        EnvMapper::new(&EnvConfig::new("$", "TEST_"), env(pairs)).unwrap()
    }

    #[test]
    fn placeholder_resolves_with_prefix() {
        let m = mapper(&[("TEST_PORT", "9009")]);
        assert_eq!(m.map_string("$PORT"), "9009");
        assert_eq!(m.key_for("$PORT").as_deref(), Some("TEST_PORT"));
    }

    #[test]
    fn plain_string_passes_through() {
        let m = mapper(&[("TEST_plain", "nope"), ("TEST_", "nope")]);
        assert_eq!(m.map_string("plain"), "plain");
        assert_eq!(m.map_string(""), "");
        assert_eq!(m.map_string("a$b"), "a$b");
    }

    #[test]
    fn every_delimiter_occurrence_is_removed() {
        let m = mapper(&[("TEST_AB", "joined")]);
        assert_eq!(m.key_for("$A$B").as_deref(), Some("TEST_AB"));
        assert_eq!(m.map_string("$A$B"), "joined");
    }

    #[test]
    fn multi_character_delimiter() {
        let m = EnvMapper::new(&EnvConfig::new("%%", ""), env(&[("HOME_DIR", "/home")])).unwrap();
        assert_eq!(m.map_string("%%HOME_DIR"), "/home");
        assert_eq!(m.map_string("%HOME_DIR"), "%HOME_DIR");
    }

    #[test]
    fn miss_defaults_to_empty() {
        let m = mapper(&[]);
        assert_eq!(m.map_string("$MISSING"), "");
    }

    #[test]
    fn miss_can_keep_placeholder() {
        let config = EnvConfig::new("$", "TEST_").with_miss_policy(MissPolicy::KeepPlaceholder);
        let m = EnvMapper::new(&config, env(&[])).unwrap();
        assert_eq!(m.map_string("$MISSING"), "$MISSING");
    }

    #[test]
    fn set_but_empty_is_not_a_miss() {
        let config = EnvConfig::new("$", "TEST_").with_miss_policy(MissPolicy::KeepPlaceholder);
        let m = EnvMapper::new(&config, env(&[("TEST_BLANK", "")])).unwrap();
        assert_eq!(m.map_string("$BLANK"), "");
    }

    #[test]
    fn invalid_config_rejected() {
        assert!(EnvMapper::new(&EnvConfig::new("", ""), env(&[])).is_err());
    }

    #[test]
    fn callbacks_fill_only_the_string_slot() {
        let callbacks = mapper(&[]).callbacks();
        assert!(callbacks.handles(infill_types::ScalarKind::String));
        assert!(!callbacks.handles(infill_types::ScalarKind::Int));
        assert!(!callbacks.handles(infill_types::ScalarKind::Float));
    }

    #[test]
    fn nested_mapping_substitution() {
        let callbacks = mapper(&[("TEST_KEY", "VALUE")]).callbacks();
        let mut value = Value::mapping([("a", Value::mapping([("b", "$KEY")]))]);
        apply_in_place(&callbacks, &mut value).unwrap();
        assert_eq!(value, Value::mapping([("a", Value::mapping([("b", "VALUE")]))]));
    }

    fn example() -> Value {
        Value::Record(
            Record::new("ConfigExample").field("Name", "$NAME").field(
                "Host",
                Record::new("HostExample")
                    .field("Name", "$HOSTNAME")
                    .field("Port", "$PORT"),
            ),
        )
    }

    fn example_env() -> HashMap<String, String> {
        env(&[
            ("TEST_NAME", "APP_NAME"),
            ("TEST_HOSTNAME", "localhost"),
            ("TEST_PORT", "9009"),
        ])
    }

    #[test]
    fn end_to_end_record() {
        let callbacks = EnvMapper::new(&EnvConfig::new("$", "TEST_"), example_env())
            .unwrap()
            .callbacks();
        let expected = Value::Record(
            Record::new("ConfigExample").field("Name", "APP_NAME").field(
                "Host",
                Record::new("HostExample")
                    .field("Name", "localhost")
                    .field("Port", "9009"),
            ),
        );

        assert_eq!(apply_copy(&callbacks, &example()).unwrap(), expected);

        let mut value = example();
        apply_in_place(&callbacks, &mut value).unwrap();
        assert_eq!(value, expected);
    }

    #[test]
    fn placeholders_report_paths_and_resolution() {
        let m = EnvMapper::new(
            &EnvConfig::new("$", "TEST_"),
            env(&[("TEST_NAME", "APP_NAME"), ("TEST_PORT", "9009")]),
        )
        .unwrap();
        let found = m.placeholders(&example());
        assert_eq!(found.len(), 3);

        assert_eq!(found[0].path.to_string(), "$.Name");
        assert_eq!(found[0].key, "TEST_NAME");
        assert!(found[0].resolved);

        assert_eq!(found[1].path.to_string(), "$.Host.Name");
        assert_eq!(found[1].raw, "$HOSTNAME");
        assert!(!found[1].resolved);

        assert_eq!(found[2].path.to_string(), "$.Host.Port");
        assert!(found[2].resolved);
    }

    #[test]
    fn placeholders_skip_private_fields() {
        let m = mapper(&[]);
        let value = Value::Record(Record::new("C").private_field("token", "$TOKEN"));
        assert!(m.placeholders(&value).is_empty());
    }
}
