use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::mapping::{Key, Mapping};

/// A node in a nested document.
///
/// Containers hold further values; scalar leaves (`String`, `Int`, `Float`)
/// are the only nodes a traversal rewrites. `Opaque` leaves pass through
/// untouched.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An optional reference. `None` means "no value present".
    ///
    /// The target is reference-counted: a shared target cannot be written
    /// through in place.
    Reference(Option<Arc<Value>>),
    /// A dynamically-typed wrapper around one concrete value.
    Union(Union),
    /// Fixed named fields.
    Record(Record),
    /// Ordered elements.
    Sequence(Vec<Value>),
    /// Key-value entries.
    Mapping(Mapping),
    String(String),
    Int(i64),
    Float(f64),
    /// Leaves outside the three scalar kinds.
    Opaque(Opaque),
}

impl Value {
    /// An absent reference.
    pub fn null() -> Self {
        Self::Reference(None)
    }

    /// A present reference holding `value`.
    pub fn reference(value: impl Into<Value>) -> Self {
        Self::Reference(Some(Arc::new(value.into())))
    }

    /// A union named `type_name` holding `value`.
    pub fn union(type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Union(Union::new(type_name, value))
    }

    /// A mapping with string keys.
    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<Key>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.resolve() {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.resolve() {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.resolve() {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Look up a record field or string-keyed mapping entry by name,
    /// following references and unions.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.resolve() {
            Value::Record(record) => record.get(name),
            Value::Mapping(entries) => entries.get(&Key::from(name)),
            _ => None,
        }
    }

    /// Look up a sequence element, following references and unions.
    pub fn index(&self, i: usize) -> Option<&Value> {
        match self.resolve() {
            Value::Sequence(items) => items.get(i),
            _ => None,
        }
    }

    /// Follow present references and unions down to the first other node.
    pub fn resolve(&self) -> &Value {
        let mut current = self;
        loop {
            current = match current {
                Value::Reference(Some(target)) => target.as_ref(),
                Value::Union(union) => union.value(),
                other => return other,
            };
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => Self::Int(i),
            Err(_) => Self::Opaque(Opaque::Unsigned(u)),
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Opaque(Opaque::Bool(b))
    }
}

impl From<Opaque> for Value {
    fn from(o: Opaque) -> Self {
        Self::Opaque(o)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Self {
        Self::Record(r)
    }
}

impl From<Union> for Value {
    fn from(u: Union) -> Self {
        Self::Union(u)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(entries: Mapping) -> Self {
        Self::Mapping(entries)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Self::reference(v),
            None => Self::null(),
        }
    }
}

/// Leaf values that are neither strings, integers, nor floats.
#[derive(Clone, Debug, PartialEq)]
pub enum Opaque {
    Bool(bool),
    /// An integer above `i64::MAX`.
    Unsigned(u64),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    /// A date, a time of day, or a datetime with a non-UTC offset, kept as
    /// written.
    Datetime(String),
    Duration(Duration),
}

impl Opaque {
    /// Classify datetime text: a UTC instant becomes a [`Opaque::Timestamp`],
    /// anything else is kept verbatim.
    pub fn datetime(text: impl Into<String>) -> Self {
        let text = text.into();
        match DateTime::parse_from_rfc3339(&text) {
            Ok(ts) if ts.offset().local_minus_utc() == 0 => Opaque::Timestamp(ts.with_timezone(&Utc)),
            _ => Opaque::Datetime(text),
        }
    }

    /// RFC 3339 text for datetime leaves, `None` for everything else.
    pub fn datetime_text(&self) -> Option<String> {
        match self {
            Opaque::Timestamp(ts) => Some(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Opaque::Datetime(text) => Some(text.clone()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A named field of a [`Record`].
///
/// Name and mutability are fixed at construction; only a mutable field hands
/// out `&mut` access to its value.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    name: String,
    value: Value,
    mutable: bool,
}

impl Field {
    /// A settable field.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mutable: true,
        }
    }

    /// A field that cannot be set, such as an unexported member.
    pub fn private(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            mutable: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Mutable access to the value, or `None` for a private field.
    pub fn value_mut(&mut self) -> Option<&mut Value> {
        if self.mutable {
            Some(&mut self.value)
        } else {
            None
        }
    }

    /// The same field (name and mutability) holding `value`.
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            name: self.name.clone(),
            value,
            mutable: self.mutable,
        }
    }
}

/// Fixed, ordered, named fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    type_name: Option<String>,
    fields: Vec<Field>,
}

impl Record {
    /// An empty record of the named type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            fields: Vec::new(),
        }
    }

    /// An empty record without a type name.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Builder: append a settable field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field::new(name, value));
        self
    }

    /// Builder: append a private field.
    pub fn private_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field::private(name, value));
        self
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The fields as a slice, so a caller can rewrite values but not add or
    /// remove fields.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build a record of the same type and field layout, taking each value
    /// from `f`. Stops at the first error.
    pub fn try_map_fields<E, F>(&self, mut f: F) -> Result<Record, E>
    where
        F: FnMut(&Field) -> Result<Value, E>,
    {
        let fields = self
            .fields
            .iter()
            .map(|field| Ok(field.with_value(f(field)?)))
            .collect::<Result<Vec<_>, E>>()?;
        Ok(Record {
            type_name: self.type_name.clone(),
            fields,
        })
    }
}

// ---------------------------------------------------------------------------
// Union
// ---------------------------------------------------------------------------

/// A dynamically-typed container holding exactly one concrete value.
#[derive(Clone, Debug, PartialEq)]
pub struct Union {
    type_name: String,
    value: Box<Value>,
}

impl Union {
    pub fn new(type_name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            type_name: type_name.into(),
            value: Box::new(value.into()),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// A union of the same type holding `value`.
    pub fn with_value(&self, value: Value) -> Self {
        Self {
            type_name: self.type_name.clone(),
            value: Box::new(value),
        }
    }
}
