use std::fmt;

use crate::mapping::Key;

/// One step from a container to a child node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named record field.
    Field(String),
    /// A sequence index.
    Index(usize),
    /// A mapping entry.
    Key(Key),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => write!(f, ".{name}"),
            Self::Index(i) => write!(f, "[{i}]"),
            Self::Key(key) => write!(f, "[{key}]"),
        }
    }
}

/// Location of a node relative to the traversal root.
///
/// References and unions are transparent: they add no segment. Displays as
/// `$`, `$.host.port`, `$.servers[2]`, `$.labels["tier"]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// The traversal root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns `true` at the root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Descend one step.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Return to the parent.
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// A new path one step below this one.
    pub fn child(&self, segment: Segment) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_display() {
        assert_eq!(Path::root().to_string(), "$");
        assert!(Path::root().is_root());
    }

    #[test]
    fn nested_display() {
        let path = Path::root()
            .child(Segment::Field("servers".into()))
            .child(Segment::Index(2))
            .child(Segment::Key(Key::from("tier")));
        assert_eq!(path.to_string(), "$.servers[2][\"tier\"]");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn push_and_pop() {
        let mut path = Path::root();
        path.push(Segment::Field("host".into()));
        assert_eq!(path.pop(), Some(Segment::Field("host".into())));
        assert!(path.is_root());
        assert_eq!(path.pop(), None);
    }
}
