use std::fmt;

use serde::Deserialize;

use crate::ast::{Composite, Leaf, Node};
use crate::attribute::AttributeMap;
use crate::error::ArityError;
use crate::kind::{CompositeKind, LeafKind, NodeKind};

/// A node as written in a tree file, before the constructors have checked it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawNode {
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    children: Vec<Node>,
    #[serde(default, with = "tuple_vec_map")]
    attributes: Vec<(String, String)>,
}

/// A tree file describes a node that cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    UnknownKind(String),
    LeafWithChildren(LeafKind),
    CompositeWithContent(CompositeKind),
    Arity(ArityError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::UnknownKind(kind) => write!(f, "unknown node kind \"{kind}\""),
            TreeError::LeafWithChildren(kind) => {
                write!(f, "`{kind}` holds content and cannot have children")
            }
            TreeError::CompositeWithContent(kind) => {
                write!(f, "`{kind}` holds children and cannot have content")
            }
            TreeError::Arity(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TreeError::Arity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ArityError> for TreeError {
    fn from(err: ArityError) -> Self {
        TreeError::Arity(err)
    }
}

impl TryFrom<RawNode> for Node {
    type Error = TreeError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let kind: NodeKind = raw
            .kind
            .parse()
            .map_err(|_| TreeError::UnknownKind(raw.kind.clone()))?;
        let attributes: AttributeMap = raw.attributes.into_iter().collect();
        match kind {
            NodeKind::Leaf(kind) => {
                if !raw.children.is_empty() {
                    return Err(TreeError::LeafWithChildren(kind));
                }
                Ok(Leaf::new(kind, raw.content.unwrap_or_default(), attributes).into())
            }
            NodeKind::Composite(kind) => {
                if raw.content.is_some() {
                    return Err(TreeError::CompositeWithContent(kind));
                }
                Ok(Composite::new(kind, raw.children, attributes)?.into())
            }
        }
    }
}
