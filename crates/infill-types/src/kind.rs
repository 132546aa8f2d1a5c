//! Node classification.
//!
//! [`Value::kind`] is a total function: every value maps to exactly one
//! [`Kind`]. Unions classify as [`Kind::Union`]; [`Value::concrete_kind`]
//! looks through them to the value they hold.

use std::fmt;

use crate::value::Value;

/// The scalar leaf kinds eligible for callback substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Int,
    Float,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// Structural classification of a [`Value`] at one traversal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// An optional reference. `present` is `false` when it holds nothing.
    Reference { present: bool },
    /// A dynamically-typed wrapper around one concrete value.
    Union,
    /// Fixed named fields.
    Record,
    /// Ordered elements.
    Sequence,
    /// Key-value entries.
    Mapping,
    /// A string, integer, or floating point leaf.
    Scalar(ScalarKind),
    /// Anything else. Never recursed into, never rewritten.
    Opaque,
}

impl Kind {
    /// Returns `true` for kinds that hold other values.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Self::Reference { present: true }
                | Self::Union
                | Self::Record
                | Self::Sequence
                | Self::Mapping
        )
    }

    /// The scalar kind, if this is a scalar leaf.
    pub fn scalar(&self) -> Option<ScalarKind> {
        match self {
            Self::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns `true` for a reference that holds nothing.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Reference { present: false })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference { present: true } => write!(f, "reference"),
            Self::Reference { present: false } => write!(f, "absent reference"),
            Self::Union => write!(f, "union"),
            Self::Record => write!(f, "record"),
            Self::Sequence => write!(f, "sequence"),
            Self::Mapping => write!(f, "mapping"),
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Opaque => write!(f, "opaque"),
        }
    }
}

impl Value {
    /// Classify this node.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Reference(target) => Kind::Reference {
                present: target.is_some(),
            },
            Value::Union(_) => Kind::Union,
            Value::Record(_) => Kind::Record,
            Value::Sequence(_) => Kind::Sequence,
            Value::Mapping(_) => Kind::Mapping,
            Value::String(_) => Kind::Scalar(ScalarKind::String),
            Value::Int(_) => Kind::Scalar(ScalarKind::Int),
            Value::Float(_) => Kind::Scalar(ScalarKind::Float),
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    /// Classify the value held by this node, unwrapping any unions first.
    pub fn concrete_kind(&self) -> Kind {
        self.concrete().kind()
    }

    /// The innermost non-union value.
    pub fn concrete(&self) -> &Value {
        let mut current = self;
        while let Value::Union(union) = current {
            current = union.value();
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Record, Union};
    use crate::Mapping;

    #[test]
    fn scalars_classify_by_content() {
        assert_eq!(Value::from("x").kind(), Kind::Scalar(ScalarKind::String));
        assert_eq!(Value::Int(3).kind(), Kind::Scalar(ScalarKind::Int));
        assert_eq!(Value::Float(0.5).kind(), Kind::Scalar(ScalarKind::Float));
    }

    #[test]
    fn booleans_are_opaque() {
        assert_eq!(Value::from(true).kind(), Kind::Opaque);
    }

    #[test]
    fn absent_reference_is_distinct() {
        let absent = Value::null();
        let present = Value::reference(Value::Int(1));
        assert!(absent.kind().is_absent());
        assert!(!present.kind().is_absent());
        assert!(present.kind().is_container());
        assert!(!absent.kind().is_container());
    }

    #[test]
    fn concrete_kind_unwraps_nested_unions() {
        let inner = Value::Union(Union::new("Inner", Value::Record(Record::new("Host"))));
        let outer = Value::Union(Union::new("Outer", inner));
        assert_eq!(outer.kind(), Kind::Union);
        assert_eq!(outer.concrete_kind(), Kind::Record);
    }

    #[test]
    fn containers_classify_structurally() {
        assert_eq!(Value::Sequence(vec![]).kind(), Kind::Sequence);
        assert_eq!(Value::Mapping(Mapping::new()).kind(), Kind::Mapping);
        assert_eq!(Value::Record(Record::anonymous()).kind(), Kind::Record);
    }

    #[test]
    fn display_names() {
        assert_eq!(Kind::Scalar(ScalarKind::Float).to_string(), "float");
        assert_eq!(Kind::Reference { present: false }.to_string(), "absent reference");
    }
}
