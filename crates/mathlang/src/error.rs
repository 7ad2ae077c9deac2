use std::fmt;

use crate::kind::{CompositeKind, LeafKind};

/// A fixed-arity composite was given the wrong number of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArityError {
    pub kind: CompositeKind,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for ArityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` requires exactly {} children, got {}",
            self.kind, self.expected, self.found
        )
    }
}

impl std::error::Error for ArityError {}

/// The typesetting renderer met a node kind that has no typesetting form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedRenderError {
    pub kind: CompositeKind,
}

impl fmt::Display for UnsupportedRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` cannot be rendered in typesetting notation",
            self.kind
        )
    }
}

impl std::error::Error for UnsupportedRenderError {}

/// A child could not be appended to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendError {
    /// Leaves hold content, not children.
    Leaf(LeafKind),
    Arity(ArityError),
}

impl fmt::Display for AppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppendError::Leaf(kind) => write!(f, "`{kind}` holds content and cannot have children"),
            AppendError::Arity(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AppendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppendError::Leaf(_) => None,
            AppendError::Arity(err) => Some(err),
        }
    }
}

impl From<ArityError> for AppendError {
    fn from(err: ArityError) -> Self {
        AppendError::Arity(err)
    }
}
