//! Conversions between typed Rust data and [`Value`].
//!
//! Typed structures go through `serde_json`: structs arrive as mappings with
//! string keys, `Option::None` as an absent reference.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::TypeError;
use crate::mapping::{Key, Mapping};
use crate::value::{Opaque, Value};

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::null(),
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Opaque(Opaque::Unsigned(u))
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    Value::String(n.to_string())
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Key::String(k), Value::from(v)))
                    .collect::<Mapping>(),
            ),
        }
    }
}

/// Convert any serializable value into the value model.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, TypeError> {
    Ok(Value::from(serde_json::to_value(value)?))
}

/// Rebuild a typed value from the value model.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, TypeError> {
    let json = serde_json::to_value(&value)?;
    Ok(serde_json::from_value(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Kind;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Host {
        name: String,
        port: u16,
        tls: Option<bool>,
    }

    #[test]
    fn typed_struct_round_trip() {
        let host = Host {
            name: "$HOSTNAME".into(),
            port: 9009,
            tls: None,
        };
        let value = to_value(&host).unwrap();
        assert_eq!(value.kind(), Kind::Mapping);
        assert_eq!(value.get("port").and_then(Value::as_int), Some(9009));
        assert_eq!(value.get("tls").map(Value::kind), Some(Kind::Reference { present: false }));

        let back: Host = from_value(value).unwrap();
        assert_eq!(back, host);
    }

    #[test]
    fn from_value_reports_shape_mismatch() {
        let err = from_value::<Host>(Value::from("not a host")).unwrap_err();
        assert!(matches!(err, TypeError::Serialization(_)));
    }

    #[test]
    fn json_numbers_classify() {
        assert_eq!(Value::from(serde_json::json!(-3)), Value::Int(-3));
        assert_eq!(Value::from(serde_json::json!(2.5)), Value::Float(2.5));
        assert_eq!(
            Value::from(serde_json::json!(u64::MAX)),
            Value::Opaque(Opaque::Unsigned(u64::MAX))
        );
    }
}
