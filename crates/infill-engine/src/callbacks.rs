use std::fmt;
use std::sync::Arc;

use infill_types::{ScalarKind, Value};
use serde::{Deserialize, Serialize};

/// Rewrites a string leaf.
pub type StringFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Rewrites an integer leaf.
pub type IntFn = Arc<dyn Fn(i64) -> i64 + Send + Sync>;
/// Rewrites a floating point leaf.
pub type FloatFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Which mapping value shapes a traversal accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingTier {
    /// Records are rejected under mapping keys with
    /// [`crate::TraverseError::UnsupportedShape`], whether held directly, as
    /// a sequence element, or behind references and unions. Scalars,
    /// sequences of non-records, and nested mappings are traversed.
    Flat,
    /// Every mapping value is traversed.
    #[default]
    Nested,
}

impl fmt::Display for MappingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat => write!(f, "flat"),
            Self::Nested => write!(f, "nested"),
        }
    }
}

/// Scalar callback registry: at most one callback per scalar kind.
///
/// An empty slot leaves matching leaves unchanged, so `Callbacks::new()` is
/// a shape-preserving identity transform. The registry is read-only during
/// a traversal and can be shared across threads.
#[derive(Clone, Default)]
pub struct Callbacks {
    string: Option<StringFn>,
    int: Option<IntFn>,
    float: Option<FloatFn>,
    tier: MappingTier,
}

impl Callbacks {
    /// An empty registry using the [`MappingTier::Nested`] tier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the string callback.
    pub fn on_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.string = Some(Arc::new(f));
        self
    }

    /// Register the integer callback.
    pub fn on_int<F>(mut self, f: F) -> Self
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        self.int = Some(Arc::new(f));
        self
    }

    /// Register the floating point callback.
    pub fn on_float<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.float = Some(Arc::new(f));
        self
    }

    pub fn with_mapping_tier(mut self, tier: MappingTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn mapping_tier(&self) -> MappingTier {
        self.tier
    }

    /// Returns `true` if a callback is registered for `kind`.
    pub fn handles(&self, kind: ScalarKind) -> bool {
        match kind {
            ScalarKind::String => self.string.is_some(),
            ScalarKind::Int => self.int.is_some(),
            ScalarKind::Float => self.float.is_some(),
        }
    }

    /// Returns `true` if no callback is registered.
    pub fn is_empty(&self) -> bool {
        self.string.is_none() && self.int.is_none() && self.float.is_none()
    }

    /// The replacement for a scalar leaf, or `None` when the leaf is not a
    /// scalar or its slot is empty.
    pub(crate) fn substitute(&self, leaf: &Value) -> Option<Value> {
        match leaf {
            Value::String(s) => self.string.as_ref().map(|f| Value::String(f(s))),
            Value::Int(i) => self.int.as_ref().map(|f| Value::Int(f(*i))),
            Value::Float(x) => self.float.as_ref().map(|f| Value::Float(f(*x))),
            _ => None,
        }
    }

    /// Rewrite a scalar leaf through its own storage. Returns `true` if a
    /// callback ran.
    pub(crate) fn substitute_in_place(&self, leaf: &mut Value) -> bool {
        match leaf {
            Value::String(s) => match &self.string {
                Some(f) => {
                    let replaced = f(s.as_str());
                    *s = replaced;
                    true
                }
                None => false,
            },
            Value::Int(i) => match &self.int {
                Some(f) => {
                    *i = f(*i);
                    true
                }
                None => false,
            },
            Value::Float(x) => match &self.float {
                Some(f) => {
                    *x = f(*x);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("string", &self.string.is_some())
            .field("int", &self.int.is_some())
            .field("float", &self.float.is_some())
            .field("tier", &self.tier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_handles_nothing() {
        let callbacks = Callbacks::new();
        assert!(callbacks.is_empty());
        assert!(!callbacks.handles(ScalarKind::String));
        assert_eq!(callbacks.mapping_tier(), MappingTier::Nested);
        assert_eq!(callbacks.substitute(&Value::from("x")), None);
    }

    #[test]
    fn slots_are_independent() {
        let callbacks = Callbacks::new().on_int(|i| i * 2);
        assert!(callbacks.handles(ScalarKind::Int));
        assert!(!callbacks.handles(ScalarKind::Float));
        assert_eq!(callbacks.substitute(&Value::Int(4)), Some(Value::Int(8)));
        assert_eq!(callbacks.substitute(&Value::Float(4.0)), None);
        assert_eq!(callbacks.substitute(&Value::from(true)), None);
    }

    #[test]
    fn substitute_in_place_rewrites_leaf() {
        let callbacks = Callbacks::new().on_string(|s| s.to_uppercase()).on_float(|x| x + 0.5);
        let mut leaf = Value::from("abc");
        assert!(callbacks.substitute_in_place(&mut leaf));
        assert_eq!(leaf, Value::from("ABC"));

        let mut leaf = Value::Float(1.0);
        assert!(callbacks.substitute_in_place(&mut leaf));
        assert_eq!(leaf, Value::Float(1.5));

        let mut leaf = Value::Int(1);
        assert!(!callbacks.substitute_in_place(&mut leaf));
    }

    #[test]
    fn debug_shows_populated_slots() {
        let callbacks = Callbacks::new().on_string(str::to_owned).with_mapping_tier(MappingTier::Flat);
        let debug = format!("{callbacks:?}");
        assert!(debug.contains("string: true"));
        assert!(debug.contains("int: false"));
        assert!(debug.contains("Flat"));
    }

    #[test]
    fn registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Callbacks>();
    }

    #[test]
    fn tier_display_and_default() {
        assert_eq!(MappingTier::Flat.to_string(), "flat");
        assert_eq!(MappingTier::default(), MappingTier::Nested);
    }
}
