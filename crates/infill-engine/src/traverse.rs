//! Depth-first traversal.
//!
//! Per node kind:
//!
//! - absent reference, opaque leaf: nothing to do
//! - present reference, union: recurse into the held value, re-wrap
//! - record: recurse into each mutable field; private fields are skipped in
//!   place and carried over unchanged by the copy
//! - sequence: recurse into each element, preserving order and length
//! - mapping: check the tier, then recurse into each value; keys are never
//!   touched
//! - scalar: run the registered callback, if any

use std::sync::Arc;

use infill_types::{Kind, Mapping, Path, Segment, Value};
use tracing::debug;

use crate::callbacks::{Callbacks, MappingTier};
use crate::error::{TraverseError, TraverseResult};

/// Rewrite the scalar leaves of `value` through its own storage.
///
/// The whole value is validated first: tier violations and leaves behind
/// shared references are reported before anything is written, so on error
/// `value` is unchanged.
pub fn apply_in_place(callbacks: &Callbacks, value: &mut Value) -> TraverseResult<()> {
    let mut walker = Walker::new(callbacks);
    walker.validate(value)?;
    walker.mutate(value)?;
    debug!(
        strategy = "in_place",
        visited = walker.visited,
        substituted = walker.substituted,
        "traversal complete"
    );
    Ok(())
}

/// Build a structurally identical copy of `value` with substitutions
/// applied. The input is never modified.
pub fn apply_copy(callbacks: &Callbacks, value: &Value) -> TraverseResult<Value> {
    let mut walker = Walker::new(callbacks);
    let copy = walker.copy(value)?;
    debug!(
        strategy = "copy",
        visited = walker.visited,
        substituted = walker.substituted,
        "traversal complete"
    );
    Ok(copy)
}

/// Visit every scalar leaf a traversal would reach, with its path.
///
/// Follows the same rules as the traversal itself: private fields, absent
/// references, and opaque leaves are not visited. The mapping tier is not
/// enforced.
pub fn walk_leaves<F>(value: &Value, mut visit: F)
where
    F: FnMut(&Path, &Value),
{
    let mut path = Path::root();
    walk(value, &mut path, &mut visit);
}

fn walk<F>(value: &Value, path: &mut Path, visit: &mut F)
where
    F: FnMut(&Path, &Value),
{
    match value {
        Value::Reference(None) | Value::Opaque(_) => {}
        Value::Reference(Some(target)) => walk(target, path, visit),
        Value::Union(union) => walk(union.value(), path, visit),
        Value::Record(record) => {
            for field in record.fields().iter().filter(|f| f.is_mutable()) {
                path.push(Segment::Field(field.name().to_owned()));
                walk(field.value(), path, visit);
                path.pop();
            }
        }
        Value::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(Segment::Index(i));
                walk(item, path, visit);
                path.pop();
            }
        }
        Value::Mapping(entries) => {
            for (key, entry) in entries {
                path.push(Segment::Key(key.clone()));
                walk(entry, path, visit);
                path.pop();
            }
        }
        Value::String(_) | Value::Int(_) | Value::Float(_) => visit(path, value),
    }
}

fn is_exclusive(target: &Arc<Value>) -> bool {
    Arc::strong_count(target) == 1 && Arc::weak_count(target) == 0
}

struct Walker<'a> {
    callbacks: &'a Callbacks,
    path: Path,
    visited: usize,
    substituted: usize,
}

impl<'a> Walker<'a> {
    fn new(callbacks: &'a Callbacks) -> Self {
        Self {
            callbacks,
            path: Path::root(),
            visited: 0,
            substituted: 0,
        }
    }

    fn descend<T>(&mut self, segment: Segment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment);
        let out = f(self);
        self.path.pop();
        out
    }

    fn check_tier(&mut self, entry: &Value) -> TraverseResult<()> {
        match self.callbacks.mapping_tier() {
            MappingTier::Flat => self.reject_records(entry),
            MappingTier::Nested => Ok(()),
        }
    }

    /// Flat tier: a record may not sit under a mapping key, directly or as a
    /// sequence element. References and unions are seen through; nested
    /// mappings are checked when the traversal reaches them.
    fn reject_records(&mut self, entry: &Value) -> TraverseResult<()> {
        match entry.resolve() {
            Value::Record(_) => Err(TraverseError::UnsupportedShape {
                path: self.path.clone(),
                kind: Kind::Record,
                tier: MappingTier::Flat,
            }),
            Value::Sequence(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.descend(Segment::Index(i), |w| w.reject_records(item))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn unaddressable(&self) -> TraverseError {
        TraverseError::Unaddressable {
            path: self.path.clone(),
            kind: Kind::Reference { present: true },
        }
    }

    /// Read-only pass. Returns whether the subtree holds a leaf that a
    /// registered callback would rewrite.
    fn validate(&mut self, value: &Value) -> TraverseResult<bool> {
        match value {
            Value::Reference(None) | Value::Opaque(_) => Ok(false),
            Value::Reference(Some(target)) => {
                let writes = self.validate(target)?;
                if writes && !is_exclusive(target) {
                    return Err(self.unaddressable());
                }
                Ok(writes)
            }
            Value::Union(union) => self.validate(union.value()),
            Value::Record(record) => {
                let mut writes = false;
                for field in record.fields().iter().filter(|f| f.is_mutable()) {
                    let segment = Segment::Field(field.name().to_owned());
                    writes |= self.descend(segment, |w| w.validate(field.value()))?;
                }
                Ok(writes)
            }
            Value::Sequence(items) => {
                let mut writes = false;
                for (i, item) in items.iter().enumerate() {
                    writes |= self.descend(Segment::Index(i), |w| w.validate(item))?;
                }
                Ok(writes)
            }
            Value::Mapping(entries) => {
                let mut writes = false;
                for (key, entry) in entries {
                    writes |= self.descend(Segment::Key(key.clone()), |w| {
                        w.check_tier(entry)?;
                        w.validate(entry)
                    })?;
                }
                Ok(writes)
            }
            Value::String(_) | Value::Int(_) | Value::Float(_) => Ok(value
                .kind()
                .scalar()
                .is_some_and(|kind| self.callbacks.handles(kind))),
        }
    }

    fn mutate(&mut self, value: &mut Value) -> TraverseResult<()> {
        self.visited += 1;
        match value {
            Value::Reference(None) | Value::Opaque(_) => Ok(()),
            Value::Reference(Some(target)) => match Arc::get_mut(target) {
                Some(inner) => self.mutate(inner),
                // Shared: only an error if something below needs writing.
                None => {
                    if self.validate(target)? {
                        Err(self.unaddressable())
                    } else {
                        Ok(())
                    }
                }
            },
            Value::Union(union) => self.mutate(union.value_mut()),
            Value::Record(record) => {
                for field in record.fields_mut() {
                    let segment = Segment::Field(field.name().to_owned());
                    if let Some(target) = field.value_mut() {
                        self.descend(segment, |w| w.mutate(target))?;
                    }
                }
                Ok(())
            }
            Value::Sequence(items) => {
                for (i, item) in items.iter_mut().enumerate() {
                    self.descend(Segment::Index(i), |w| w.mutate(item))?;
                }
                Ok(())
            }
            Value::Mapping(entries) => {
                for (key, entry) in entries.iter_mut() {
                    self.descend(Segment::Key(key.clone()), |w| {
                        w.check_tier(entry)?;
                        w.mutate(entry)
                    })?;
                }
                Ok(())
            }
            Value::String(_) | Value::Int(_) | Value::Float(_) => {
                if self.callbacks.substitute_in_place(value) {
                    self.substituted += 1;
                }
                Ok(())
            }
        }
    }

    fn copy(&mut self, value: &Value) -> TraverseResult<Value> {
        self.visited += 1;
        let copied = match value {
            Value::Reference(None) => Value::null(),
            Value::Reference(Some(target)) => {
                Value::Reference(Some(Arc::new(self.copy(target)?)))
            }
            Value::Union(union) => {
                let replaced = self.copy(union.value())?;
                if replaced.kind() == union.value().kind() {
                    Value::Union(union.with_value(replaced))
                } else {
                    replaced
                }
            }
            Value::Record(record) => Value::Record(record.try_map_fields(|field| {
                if field.is_mutable() {
                    let segment = Segment::Field(field.name().to_owned());
                    self.descend(segment, |w| w.copy(field.value()))
                } else {
                    Ok(field.value().clone())
                }
            })?),
            Value::Sequence(items) => Value::Sequence(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.descend(Segment::Index(i), |w| w.copy(item)))
                    .collect::<TraverseResult<Vec<_>>>()?,
            ),
            Value::Mapping(entries) => Value::Mapping(
                entries
                    .iter()
                    .map(|(key, entry)| {
                        let copied = self.descend(Segment::Key(key.clone()), |w| {
                            w.check_tier(entry)?;
                            w.copy(entry)
                        })?;
                        Ok((key.clone(), copied))
                    })
                    .collect::<TraverseResult<Mapping>>()?,
            ),
            Value::String(_) | Value::Int(_) | Value::Float(_) => {
                match self.callbacks.substitute(value) {
                    Some(replaced) => {
                        self.substituted += 1;
                        replaced
                    }
                    None => value.clone(),
                }
            }
            Value::Opaque(opaque) => Value::Opaque(opaque.clone()),
        };
        Ok(copied)
    }
}
