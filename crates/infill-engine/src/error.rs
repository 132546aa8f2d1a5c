//! Error types for the traversal engine.

use infill_types::{Kind, Path};

use crate::callbacks::MappingTier;

/// Fatal conditions that abort a traversal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TraverseError {
    /// A mapping holds a value shape the active tier does not traverse.
    #[error("unsupported shape at {path}: {kind} mapping value is not traversable under the {tier} mapping tier")]
    UnsupportedShape {
        path: Path,
        kind: Kind,
        tier: MappingTier,
    },

    /// A leaf that must be rewritten sits behind storage that cannot be
    /// mutated in place. Use [`crate::apply_copy`] for such input.
    #[error("cannot write through shared {kind} at {path}")]
    Unaddressable { path: Path, kind: Kind },
}

impl TraverseError {
    /// Location of the node that failed.
    pub fn path(&self) -> &Path {
        match self {
            Self::UnsupportedShape { path, .. } | Self::Unaddressable { path, .. } => path,
        }
    }
}

/// Convenience alias for traversal results.
pub type TraverseResult<T> = Result<T, TraverseError>;
