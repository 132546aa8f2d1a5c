//! Serde support for [`Value`].
//!
//! Deserialization accepts any self-describing format. Nulls become absent
//! references, booleans and oversized unsigned integers become opaque
//! leaves, maps become mappings, and externally tagged values (YAML
//! `!Tag value`) become unions. TOML datetimes become opaque datetime
//! leaves.
//!
//! Serialization writes records as maps in field order, unions as their
//! inner value, and datetimes as RFC 3339 strings.

use std::fmt;
use std::sync::Arc;

use chrono::SecondsFormat;
use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::mapping::{Key, Mapping};
use crate::value::{Opaque, Union, Value};

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Reference(None) => serializer.serialize_none(),
            Value::Reference(Some(target)) => serializer.serialize_some(target.as_ref()),
            Value::Union(union) => union.value().serialize(serializer),
            Value::Record(record) => {
                let mut map = serializer.serialize_map(Some(record.len()))?;
                for field in record.fields() {
                    map.serialize_entry(field.name(), field.value())?;
                }
                map.end()
            }
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(entries) => serializer.collect_map(entries),
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Opaque(opaque) => opaque.serialize(serializer),
        }
    }
}

impl Serialize for Opaque {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Opaque::Bool(b) => serializer.serialize_bool(*b),
            Opaque::Unsigned(u) => serializer.serialize_u64(*u),
            Opaque::Bytes(bytes) => serializer.serialize_bytes(bytes),
            Opaque::Timestamp(ts) => serializer.collect_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Opaque::Datetime(text) => serializer.serialize_str(text),
            Opaque::Duration(d) => d.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// The single key `toml` uses to hand a datetime to `deserialize_any`.
const TOML_DATETIME_KEY: &str = "$__toml_private_datetime";

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any document value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::from(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Value, E> {
        Ok(Value::Opaque(Opaque::Bytes(v.to_vec())))
    }

    fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> Result<Value, E> {
        Ok(Value::Opaque(Opaque::Bytes(v)))
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        let target = Value::deserialize(deserializer)?;
        Ok(Value::Reference(Some(Arc::new(target))))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries = Mapping::new();
        while let Some(key) = map.next_key::<Key>()? {
            if entries.is_empty() && key.as_str() == Some(TOML_DATETIME_KEY) {
                let text = map.next_value::<String>()?;
                return Ok(Value::Opaque(Opaque::datetime(text)));
            }
            let value = map.next_value::<Value>()?;
            entries.insert(key, value);
        }
        Ok(Value::Mapping(entries))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        let value = variant.newtype_variant::<Value>()?;
        Ok(Value::Union(Union::new(tag, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;
    use crate::Kind;

    #[test]
    fn deserialize_nested_json() {
        let value: Value = serde_json::from_str(
            r#"{"name": "$NAME", "host": {"name": "$HOSTNAME", "port": 9009}, "tags": ["a", 1.5, true, null]}"#,
        )
        .unwrap();

        assert_eq!(value.kind(), Kind::Mapping);
        assert_eq!(value.get("name").and_then(Value::as_str), Some("$NAME"));
        assert_eq!(value.get("host").and_then(|h| h.get("port")).and_then(Value::as_int), Some(9009));

        let tags = value.get("tags").unwrap();
        assert_eq!(tags.index(1).and_then(Value::as_float), Some(1.5));
        assert_eq!(tags.index(2).map(Value::kind), Some(Kind::Opaque));
        assert_eq!(tags.index(3).map(Value::kind), Some(Kind::Reference { present: false }));
    }

    #[test]
    fn oversized_unsigned_is_opaque() {
        let value: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(value, Value::Opaque(Opaque::Unsigned(u64::MAX)));
    }

    #[test]
    fn datetime_map_becomes_opaque() {
        let value: Value =
            serde_json::from_str(r#"{"created": {"$__toml_private_datetime": "1979-05-27T07:32:00Z"}}"#)
                .unwrap();
        let created = value.get("created").unwrap();
        assert_eq!(created.kind(), Kind::Opaque);
        assert!(matches!(created, Value::Opaque(Opaque::Timestamp(_))));
        assert_eq!(serde_json::to_string(created).unwrap(), r#""1979-05-27T07:32:00Z""#);
    }

    #[test]
    fn local_datetimes_keep_their_text() {
        assert_eq!(Opaque::datetime("1979-05-27"), Opaque::Datetime("1979-05-27".into()));
        assert_eq!(
            Opaque::datetime("1979-05-27T00:32:00-07:00"),
            Opaque::Datetime("1979-05-27T00:32:00-07:00".into())
        );
        assert_eq!(
            Opaque::datetime("07:32:00").datetime_text().as_deref(),
            Some("07:32:00")
        );
    }

    #[test]
    fn record_serializes_in_field_order() {
        let record = Record::new("Host").field("port", "9009").field("name", "localhost");
        let json = serde_json::to_string(&Value::Record(record)).unwrap();
        assert_eq!(json, r#"{"port":"9009","name":"localhost"}"#);
    }

    #[test]
    fn union_serializes_as_inner_value() {
        let value = Value::union("Port", 8080);
        assert_eq!(serde_json::to_string(&value).unwrap(), "8080");
    }

    #[test]
    fn references_serialize_transparently() {
        let value = Value::mapping([("a", Value::reference("x")), ("b", Value::null())]);
        assert_eq!(serde_json::to_string(&value).unwrap(), r#"{"a":"x","b":null}"#);
    }
}
