use std::fmt;

use log::{debug, warn};
#[cfg(feature = "serde")]
use serde::Deserialize;
use static_assertions::assert_impl_all;

use crate::attribute::AttributeMap;
use crate::error::{AppendError, ArityError, UnsupportedRenderError};
use crate::kind::{CompositeKind, LeafKind, NodeKind};

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "crate::de::RawNode"))]
pub enum Node {
    Leaf(Leaf),
    Composite(Composite),
}

assert_impl_all!(Node: Send, Sync, Clone);

/// A node with opaque text content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    kind: LeafKind,
    content: String,
    attributes: AttributeMap,
}

/// A node with an ordered sequence of children.
///
/// Variable-arity composites can be extended with [`Composite::append`] (or [`Node::append`]);
/// nothing else changes a tree after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composite {
    kind: CompositeKind,
    children: Vec<Node>,
    attributes: AttributeMap,
}

impl Leaf {
    pub fn new(kind: LeafKind, content: impl Into<String>, attributes: AttributeMap) -> Self {
        Self {
            kind,
            content: content.into(),
            attributes,
        }
    }

    #[inline]
    pub fn kind(&self) -> LeafKind {
        self.kind
    }

    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

impl Composite {
    /// Create a composite node of the given kind.
    ///
    /// Fails if `kind` has a fixed arity that `children` does not match. Structural kinds are
    /// normalized here: delimited rows gain their delimiter operators, table rows box bare
    /// children into cells, tables box bare children into rows, and math environments get
    /// their `display` attribute.
    pub fn new(
        kind: CompositeKind,
        children: impl IntoIterator<Item = Node>,
        attributes: AttributeMap,
    ) -> Result<Self, ArityError> {
        let children: Vec<Node> = children.into_iter().collect();
        if let Some(expected) = kind.arity()
            && children.len() != expected
        {
            debug!(
                "rejecting `{kind}` with {} children (expected {expected})",
                children.len()
            );
            return Err(ArityError {
                kind,
                expected,
                found: children.len(),
            });
        }
        Ok(Self::build(kind, children, attributes))
    }

    /// Like `new`, but the caller guarantees the arity.
    fn build(kind: CompositeKind, mut children: Vec<Node>, attributes: AttributeMap) -> Self {
        if let Some((open, close)) = kind.delimiters() {
            children.insert(0, Node::operator(open));
            children.push(Node::operator(close));
        }
        let children = match kind {
            CompositeKind::TableRow => children.into_iter().map(into_cell).collect(),
            CompositeKind::Table => children.into_iter().map(into_table_row).collect(),
            _ => children,
        };
        let mut composite = Self {
            kind,
            children,
            attributes: AttributeMap::new(),
        };
        if let Some(display) = kind.display() {
            composite.attributes.insert("display", display);
        }
        for (name, value) in attributes {
            composite.set_attribute(name, value);
        }
        composite
    }

    /// Append one child at the end.
    ///
    /// Fixed-arity kinds are always full, so appending to them fails. Table rows and tables
    /// box the new child the same way the constructor does.
    pub fn append(&mut self, child: Node) -> Result<(), ArityError> {
        if let Some(expected) = self.kind.arity() {
            debug!("rejecting append to `{}`", self.kind);
            return Err(ArityError {
                kind: self.kind,
                expected,
                found: self.children.len() + 1,
            });
        }
        let child = match self.kind {
            CompositeKind::TableRow => into_cell(child),
            CompositeKind::Table => into_table_row(child),
            _ => child,
        };
        self.children.push(child);
        Ok(())
    }

    #[inline]
    pub fn kind(&self) -> CompositeKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    fn set_attribute(&mut self, name: String, value: String) {
        if name == "display" && self.kind.display().is_some() {
            warn!(
                "ignoring `display=\"{value}\"` on `{}`: it is fixed by the node kind",
                self.kind
            );
            return;
        }
        self.attributes.insert(name, value);
    }
}

fn into_cell(node: Node) -> Node {
    if node.is_composite_of(CompositeKind::TableCell) {
        node
    } else {
        Composite::build(CompositeKind::TableCell, vec![node], AttributeMap::new()).into()
    }
}

fn into_table_row(node: Node) -> Node {
    if node.is_composite_of(CompositeKind::TableRow) {
        node
    } else {
        Composite::build(CompositeKind::TableRow, vec![node], AttributeMap::new()).into()
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<Composite> for Node {
    fn from(composite: Composite) -> Self {
        Node::Composite(composite)
    }
}

impl Node {
    #[inline]
    pub fn leaf(kind: LeafKind, content: impl Into<String>) -> Self {
        Leaf::new(kind, content, AttributeMap::new()).into()
    }

    /// Generic composite constructor. See [`Composite::new`].
    pub fn composite(
        kind: CompositeKind,
        children: impl IntoIterator<Item = Node>,
    ) -> Result<Self, ArityError> {
        Composite::new(kind, children, AttributeMap::new()).map(Node::from)
    }

    #[inline]
    fn build(kind: CompositeKind, children: impl IntoIterator<Item = Node>) -> Self {
        Composite::build(kind, children.into_iter().collect(), AttributeMap::new()).into()
    }

    pub fn identifier(content: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Identifier, content)
    }

    pub fn operator(content: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Operator, content)
    }

    pub fn number(value: impl fmt::Display) -> Self {
        Self::leaf(LeafKind::Number, value.to_string())
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::leaf(LeafKind::Text, content)
    }

    pub fn empty() -> Self {
        Self::leaf(LeafKind::Empty, "")
    }

    pub fn row(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::Row, children)
    }

    /// A row enclosed in `(` and `)`.
    pub fn parenthesized(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::RowParenthesized, children)
    }

    /// A row enclosed in `[` and `]`.
    pub fn bracketed(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::RowBracketed, children)
    }

    pub fn fraction(num: Node, denom: Node) -> Self {
        Self::build(CompositeKind::Fraction, [num, denom])
    }

    pub fn over(base: Node, over: Node) -> Self {
        Self::build(CompositeKind::Over, [base, over])
    }

    pub fn subscript(base: Node, sub: Node) -> Self {
        Self::build(CompositeKind::Subscript, [base, sub])
    }

    pub fn superscript(base: Node, sup: Node) -> Self {
        Self::build(CompositeKind::Superscript, [base, sup])
    }

    pub fn sub_superscript(base: Node, sub: Node, sup: Node) -> Self {
        Self::build(CompositeKind::SubSuperscript, [base, sub, sup])
    }

    pub fn sqrt(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::SquareRoot, children)
    }

    pub fn table_cell(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::TableCell, children)
    }

    /// Children that are not table cells are wrapped in one.
    pub fn table_row(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::TableRow, children)
    }

    /// Children that are not table rows are wrapped in a row of one cell.
    pub fn table(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::Table, children)
    }

    /// A table with one row per inner sequence.
    pub fn table_from_rows<R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = Node>,
    {
        Self::table(rows.into_iter().map(Self::table_row))
    }

    pub fn math_block(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::MathBlock, children)
    }

    pub fn math_inline(children: impl IntoIterator<Item = Node>) -> Self {
        Self::build(CompositeKind::MathInline, children)
    }

    /// Set an attribute while building the tree.
    ///
    /// The `display` attribute of math environments is fixed by their kind; attempts to set it
    /// are ignored.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Node::Leaf(leaf) => {
                leaf.attributes.insert(name, value);
            }
            Node::Composite(composite) => composite.set_attribute(name.into(), value.into()),
        }
        self
    }

    /// Append one child to a composite. See [`Composite::append`].
    pub fn append(&mut self, child: Node) -> Result<(), AppendError> {
        match self {
            Node::Leaf(leaf) => {
                debug!("rejecting append to leaf `{}`", leaf.kind);
                Err(AppendError::Leaf(leaf.kind))
            }
            Node::Composite(composite) => Ok(composite.append(child)?),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Leaf(leaf) => NodeKind::Leaf(leaf.kind),
            Node::Composite(composite) => NodeKind::Composite(composite.kind),
        }
    }

    pub fn attributes(&self) -> &AttributeMap {
        match self {
            Node::Leaf(leaf) => &leaf.attributes,
            Node::Composite(composite) => &composite.attributes,
        }
    }

    /// The children of a composite; leaves have none.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Leaf(_) => &[],
            Node::Composite(composite) => &composite.children,
        }
    }

    /// The content of a leaf.
    pub fn content(&self) -> Option<&str> {
        match self {
            Node::Leaf(leaf) => Some(&leaf.content),
            Node::Composite(_) => None,
        }
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    #[inline]
    fn is_composite_of(&self, kind: CompositeKind) -> bool {
        matches!(self, Node::Composite(composite) if composite.kind == kind)
    }

    /// Render to markup with the default configuration.
    pub fn to_markup(&self) -> String {
        crate::render_markup(self)
    }

    /// Render to typesetting notation with the default configuration.
    pub fn to_typeset(&self) -> Result<String, UnsupportedRenderError> {
        crate::render_typeset(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{Composite, Leaf, Node};
    use crate::attribute::AttributeMap;
    use crate::error::{AppendError, ArityError};
    use crate::kind::{CompositeKind, LeafKind, NodeKind};

    fn x_plus_3() -> Vec<Node> {
        vec![
            Node::identifier("x"),
            Node::operator("+"),
            Node::number(3),
        ]
    }

    #[test]
    fn fixed_arity_is_checked() {
        for kind in [
            CompositeKind::Fraction,
            CompositeKind::Over,
            CompositeKind::Subscript,
            CompositeKind::Superscript,
        ] {
            assert_eq!(
                Node::composite(kind, [Node::number(1)]),
                Err(ArityError {
                    kind,
                    expected: 2,
                    found: 1
                })
            );
            assert_eq!(
                Node::composite(kind, x_plus_3()),
                Err(ArityError {
                    kind,
                    expected: 2,
                    found: 3
                })
            );
            assert!(Node::composite(kind, [Node::text("a"), Node::row([])]).is_ok());
        }
        assert_eq!(
            Node::composite(CompositeKind::SubSuperscript, [Node::number(1), Node::number(2)]),
            Err(ArityError {
                kind: CompositeKind::SubSuperscript,
                expected: 3,
                found: 2
            })
        );
        assert!(Node::composite(CompositeKind::SubSuperscript, x_plus_3()).is_ok());
    }

    #[test]
    fn variable_arity_accepts_zero_children() {
        let row = Node::composite(CompositeKind::Row, []).unwrap();
        assert!(row.children().is_empty());
        assert!(Node::composite(CompositeKind::MathInline, []).is_ok());
    }

    #[test]
    fn delimiters_are_injected_once() {
        let row = Node::parenthesized(x_plus_3());
        assert_eq!(row.children().len(), 5);
        assert_eq!(row.children()[0], Node::operator("("));
        assert_eq!(row.children()[4], Node::operator(")"));

        let row = Node::bracketed([]);
        assert_eq!(row.children(), [Node::operator("["), Node::operator("]")]);
    }

    #[test]
    fn table_row_boxes_bare_children() {
        let row = Node::table_row([Node::number(1), Node::table_cell([Node::number(2)])]);
        assert_eq!(
            row.children(),
            [
                Node::table_cell([Node::number(1)]),
                Node::table_cell([Node::number(2)]),
            ]
        );
    }

    #[test]
    fn table_boxes_rows_and_cells() {
        let boxed = Node::table_from_rows([
            [Node::number(1), Node::number(2), Node::number(3)],
            [Node::number(4), Node::number(5), Node::number(6)],
        ]);
        let explicit = Node::table([
            Node::table_row([
                Node::table_cell([Node::number(1)]),
                Node::table_cell([Node::number(2)]),
                Node::table_cell([Node::number(3)]),
            ]),
            Node::table_row([
                Node::table_cell([Node::number(4)]),
                Node::table_cell([Node::number(5)]),
                Node::table_cell([Node::number(6)]),
            ]),
        ]);
        assert_eq!(boxed, explicit);

        let single = Node::table([Node::identifier("x")]);
        assert_eq!(
            single,
            Node::table([Node::table_row([Node::table_cell([Node::identifier("x")])])])
        );
    }

    #[test]
    fn math_environment_display_is_reserved() {
        let block = Node::math_block([Node::row(x_plus_3())]);
        assert_eq!(block.attributes().get("display"), Some("block"));

        let inline = Node::math_inline([])
            .with_attribute("display", "block")
            .with_attribute("class", "eq");
        assert_eq!(inline.attributes().get("display"), Some("inline"));
        assert_eq!(inline.attributes().get("class"), Some("eq"));

        let composite = Composite::new(
            CompositeKind::MathBlock,
            [],
            AttributeMap::from([("display", "inline")]),
        )
        .unwrap();
        assert_eq!(composite.attributes().get("display"), Some("block"));
        assert_eq!(composite.attributes().len(), 1);
    }

    #[test]
    fn append_to_variable_arity() {
        let mut row = Composite::new(CompositeKind::Row, x_plus_3(), AttributeMap::new()).unwrap();
        row.append(Node::operator("=")).unwrap();
        row.append(Node::number(5)).unwrap();
        assert_eq!(row.children().len(), 5);
        assert_eq!(row.children()[4], Node::number(5));

        let mut table = Composite::new(CompositeKind::Table, [], AttributeMap::new()).unwrap();
        table.append(Node::number(1)).unwrap();
        assert_eq!(
            table.children(),
            [Node::table_row([Node::table_cell([Node::number(1)])])]
        );
    }

    #[test]
    fn append_to_fixed_arity_fails() {
        let mut frac = Composite::new(
            CompositeKind::Fraction,
            [Node::number(1), Node::number(2)],
            AttributeMap::new(),
        )
        .unwrap();
        assert_eq!(
            frac.append(Node::number(3)),
            Err(ArityError {
                kind: CompositeKind::Fraction,
                expected: 2,
                found: 3
            })
        );
        assert_eq!(frac.children().len(), 2);
    }

    #[test]
    fn append_through_node() {
        let mut leaf = Node::identifier("x");
        assert_eq!(
            leaf.append(Node::number(1)),
            Err(AppendError::Leaf(LeafKind::Identifier))
        );
        assert_eq!(leaf, Node::identifier("x"));

        let mut block = Node::math_block([Node::row([Node::identifier("y")])]);
        let mut row = Node::row([Node::identifier("x")]);
        row.append(Node::operator("=")).unwrap();
        row.append(Node::number(1)).unwrap();
        assert_eq!(
            row,
            Node::row([Node::identifier("x"), Node::operator("="), Node::number(1)])
        );
        block.append(row).unwrap();
        assert_eq!(block.children().len(), 2);

        let mut table = Node::table([]);
        table.append(Node::number(1)).unwrap();
        assert_eq!(
            table,
            Node::table([Node::table_row([Node::table_cell([Node::number(1)])])])
        );

        let mut sub = Node::subscript(Node::identifier("x"), Node::number(1));
        assert_eq!(
            sub.append(Node::number(2)),
            Err(AppendError::Arity(ArityError {
                kind: CompositeKind::Subscript,
                expected: 2,
                found: 3
            }))
        );
    }

    #[test]
    fn leaf_equality() {
        let a = Node::identifier("x").with_attribute("mathvariant", "bold");
        let b = Node::identifier("x").with_attribute("mathvariant", "bold");
        let c = Node::identifier("x").with_attribute("mathvariant", "italic");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(Node::identifier("x"), Node::operator("x"));
        assert_ne!(Node::identifier("x"), Node::identifier("y"));
    }

    #[test]
    fn composite_equality_is_deep_and_ordered() {
        assert_eq!(Node::row(x_plus_3()), Node::row(x_plus_3()));
        let mut reversed = x_plus_3();
        reversed.reverse();
        assert_ne!(Node::row(x_plus_3()), Node::row(reversed));
        assert_ne!(Node::row(x_plus_3()), Node::sqrt(x_plus_3()));
    }

    #[test]
    fn accessors() {
        let leaf = Leaf::new(LeafKind::Text, "hi", AttributeMap::new());
        assert_eq!(leaf.kind(), LeafKind::Text);
        assert_eq!(leaf.content(), "hi");

        let node = Node::from(leaf);
        assert!(node.is_leaf());
        assert_eq!(node.kind(), NodeKind::Leaf(LeafKind::Text));
        assert_eq!(node.content(), Some("hi"));
        assert!(node.children().is_empty());

        let frac = Node::fraction(Node::number(1), Node::number(2));
        assert_eq!(frac.kind(), NodeKind::Composite(CompositeKind::Fraction));
        assert_eq!(frac.content(), None);
    }
}
