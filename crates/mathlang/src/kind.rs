use std::fmt;
use std::str::FromStr;

use strum_macros::{Display, EnumString, IntoStaticStr};

/// Kinds of nodes that carry text content instead of children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum LeafKind {
    Identifier,
    Operator,
    Number,
    Text,
    /// Renders as nothing in markup and as its (usually empty) content in typesetting output.
    Empty,
}

/// Kinds of nodes that hold an ordered sequence of child nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum CompositeKind {
    Row,
    /// A row whose children are enclosed in `(` and `)` operators.
    RowParenthesized,
    /// A row whose children are enclosed in `[` and `]` operators.
    RowBracketed,
    Fraction,
    /// Stacked decoration: a base with something placed over it.
    Over,
    Subscript,
    Superscript,
    SubSuperscript,
    SquareRoot,
    TableCell,
    TableRow,
    Table,
    MathBlock,
    MathInline,
}

impl LeafKind {
    /// Markup tag name. Empty leaves have no tag.
    pub fn tag(self) -> &'static str {
        match self {
            LeafKind::Identifier => "mi",
            LeafKind::Operator => "mo",
            LeafKind::Number => "mn",
            LeafKind::Text => "mtext",
            LeafKind::Empty => "",
        }
    }

    /// Typesetting command wrapping the content, if any.
    pub fn command(self) -> Option<&'static str> {
        match self {
            LeafKind::Text => Some("textnormal"),
            LeafKind::Identifier | LeafKind::Operator | LeafKind::Number | LeafKind::Empty => {
                None
            }
        }
    }
}

impl CompositeKind {
    pub fn tag(self) -> &'static str {
        match self {
            CompositeKind::Row | CompositeKind::RowParenthesized | CompositeKind::RowBracketed => {
                "mrow"
            }
            CompositeKind::Fraction => "mfrac",
            CompositeKind::Over => "mover",
            CompositeKind::Subscript => "msub",
            CompositeKind::Superscript => "msup",
            CompositeKind::SubSuperscript => "msubsup",
            CompositeKind::SquareRoot => "msqrt",
            CompositeKind::TableCell => "mtd",
            CompositeKind::TableRow => "mtr",
            CompositeKind::Table => "mtable",
            CompositeKind::MathBlock | CompositeKind::MathInline => "math",
        }
    }

    pub fn command(self) -> Option<&'static str> {
        match self {
            CompositeKind::Fraction => Some("frac"),
            CompositeKind::SquareRoot => Some("sqrt"),
            _ => None,
        }
    }

    /// The exact number of children this kind requires, or `None` for variable arity.
    pub fn arity(self) -> Option<usize> {
        match self {
            CompositeKind::Fraction
            | CompositeKind::Over
            | CompositeKind::Subscript
            | CompositeKind::Superscript => Some(2),
            CompositeKind::SubSuperscript => Some(3),
            _ => None,
        }
    }

    /// Whether the typesetting notation has a form for this kind.
    pub fn is_typesettable(self) -> bool {
        !matches!(
            self,
            CompositeKind::Over
                | CompositeKind::Table
                | CompositeKind::TableRow
                | CompositeKind::TableCell
        )
    }

    /// The opening and closing delimiter injected at construction time.
    pub(crate) fn delimiters(self) -> Option<(&'static str, &'static str)> {
        match self {
            CompositeKind::RowParenthesized => Some(("(", ")")),
            CompositeKind::RowBracketed => Some(("[", "]")),
            _ => None,
        }
    }

    /// Value of the reserved `display` attribute for math environments.
    pub(crate) fn display(self) -> Option<&'static str> {
        match self {
            CompositeKind::MathBlock => Some("block"),
            CompositeKind::MathInline => Some("inline"),
            _ => None,
        }
    }
}

/// Any of the node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf(LeafKind),
    Composite(CompositeKind),
}

impl NodeKind {
    #[inline]
    pub fn tag(self) -> &'static str {
        match self {
            NodeKind::Leaf(kind) => kind.tag(),
            NodeKind::Composite(kind) => kind.tag(),
        }
    }

    #[inline]
    pub fn command(self) -> Option<&'static str> {
        match self {
            NodeKind::Leaf(kind) => kind.command(),
            NodeKind::Composite(kind) => kind.command(),
        }
    }
}

impl From<LeafKind> for NodeKind {
    fn from(kind: LeafKind) -> Self {
        NodeKind::Leaf(kind)
    }
}

impl From<CompositeKind> for NodeKind {
    fn from(kind: CompositeKind) -> Self {
        NodeKind::Composite(kind)
    }
}

impl FromStr for NodeKind {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(NodeKind::Leaf)
            .or_else(|_| s.parse().map(NodeKind::Composite))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Leaf(kind) => write!(f, "{kind}"),
            NodeKind::Composite(kind) => write!(f, "{kind}"),
        }
    }
}
