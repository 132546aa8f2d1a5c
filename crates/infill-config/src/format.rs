use std::fmt;
use std::path::Path;

use infill_types::{Opaque, Value};
use serde::ser::{Error as _, SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, LoadResult};

/// A structured document format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Detect the format from a file extension (`.json`, `.yaml`, `.yml`,
    /// `.toml`, case-insensitive).
    pub fn from_path(path: &Path) -> LoadResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(LoadError::UnknownFormat(path.to_path_buf())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Parse a document. Parse errors are returned as the format crate
/// reported them.
pub fn parse_document(input: &str, format: Format) -> LoadResult<Value> {
    let value = match format {
        Format::Json => serde_json::from_str(input)?,
        Format::Yaml => serde_yaml::from_str(input)?,
        Format::Toml => toml::from_str(input)?,
    };
    Ok(value)
}

/// Serialize a value in the given format.
pub fn render(value: &Value, format: Format) -> LoadResult<String> {
    let out = match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(value)?;
            out.push('\n');
            out
        }
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Toml => toml::to_string_pretty(&TomlDocument(value))?,
    };
    Ok(out)
}

/// Serializes like [`Value`], except datetime leaves go out as native TOML
/// datetimes instead of strings.
struct TomlDocument<'a>(&'a Value);

impl Serialize for TomlDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Value::Reference(None) => serializer.serialize_none(),
            Value::Reference(Some(target)) => serializer.serialize_some(&TomlDocument(target)),
            Value::Union(union) => TomlDocument(union.value()).serialize(serializer),
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for field in record.fields() {
                    map.serialize_entry(field.name(), &TomlDocument(field.value()))?;
                }
                map.end()
            }
            Value::Sequence(items) => serializer.collect_seq(items.iter().map(TomlDocument)),
            Value::Mapping(entries) => {
                serializer.collect_map(entries.iter().map(|(key, value)| (key, TomlDocument(value))))
            }
            Value::Opaque(opaque @ (Opaque::Timestamp(_) | Opaque::Datetime(_))) => {
                let text = opaque.datetime_text().unwrap_or_default();
                let datetime: toml::value::Datetime = text.parse().map_err(S::Error::custom)?;
                datetime.serialize(serializer)
            }
            other => other.serialize(serializer),
        }
    }
}
