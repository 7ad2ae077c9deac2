use std::fmt::Write;

use log::trace;

use crate::ast::Node;
use crate::fmt::new_line_and_indent;
use crate::kind::LeafKind;

const XML_NAMESPACE: &str = " xmlns=\"http://www.w3.org/1998/Math/MathML\"";

/// Serializes a tree into MathML-style markup.
///
/// Content and attribute values are written verbatim; nothing is escaped.
pub struct MarkupEmitter {
    s: String,
    pretty: bool,
    xml_namespace: bool,
}

impl MarkupEmitter {
    #[inline]
    pub fn new(pretty: bool, xml_namespace: bool) -> Self {
        Self {
            s: String::new(),
            pretty,
            xml_namespace,
        }
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.s
    }

    /// Emit `node`, which sits `depth` levels below the root.
    pub fn emit(&mut self, node: &Node, depth: usize) -> std::fmt::Result {
        trace!("emitting {} at depth {depth}", node.kind());
        match node {
            Node::Leaf(leaf) => {
                if matches!(leaf.kind(), LeafKind::Empty) {
                    return Ok(());
                }
                self.start_line(depth);
                let tag = leaf.kind().tag();
                write!(self.s, "<{tag}")?;
                leaf.attributes().write_markup(&mut self.s)?;
                write!(self.s, ">{}</{tag}>", leaf.content())?;
            }
            Node::Composite(composite) => {
                self.start_line(depth);
                let tag = composite.kind().tag();
                write!(self.s, "<{tag}")?;
                if self.xml_namespace && composite.kind().display().is_some() {
                    self.s.push_str(XML_NAMESPACE);
                }
                composite.attributes().write_markup(&mut self.s)?;
                self.s.push('>');
                let children_start = self.s.len();
                for child in composite.children() {
                    self.emit(child, depth + 1)?;
                }
                if self.pretty && self.s.len() > children_start {
                    new_line_and_indent(&mut self.s, depth);
                }
                write!(self.s, "</{tag}>")?;
            }
        }
        Ok(())
    }

    fn start_line(&mut self, depth: usize) {
        if self.pretty && depth > 0 {
            new_line_and_indent(&mut self.s, depth);
        }
    }
}

impl Default for MarkupEmitter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

#[cfg(test)]
mod tests {
    use super::MarkupEmitter;
    use crate::ast::Node;

    fn render(node: &Node) -> String {
        let mut emitter = MarkupEmitter::default();
        emitter.emit(node, 0).unwrap();
        emitter.into_inner()
    }

    fn render_pretty(node: &Node) -> String {
        let mut emitter = MarkupEmitter::new(true, false);
        emitter.emit(node, 0).unwrap();
        emitter.into_inner()
    }

    #[test]
    fn render_leaves() {
        assert_eq!(render(&Node::identifier("x")), "<mi>x</mi>");
        assert_eq!(render(&Node::operator("+")), "<mo>+</mo>");
        assert_eq!(render(&Node::number("3.14")), "<mn>3.14</mn>");
        assert_eq!(render(&Node::text("if")), "<mtext>if</mtext>");
    }

    #[test]
    fn render_empty_leaf() {
        assert_eq!(render(&Node::empty()), "");
        assert_eq!(render(&Node::empty().with_attribute("width", "1em")), "");
        assert_eq!(
            render(&Node::row([Node::empty(), Node::number(1)])),
            "<mrow><mn>1</mn></mrow>"
        );
    }

    #[test]
    fn content_is_not_escaped() {
        assert_eq!(render(&Node::operator("&lt;")), "<mo>&lt;</mo>");
        assert_eq!(render(&Node::operator("<")), "<mo><</mo>");
    }

    #[test]
    fn render_attributes_in_order() {
        let node = Node::identifier("x")
            .with_attribute("mathvariant", "bold")
            .with_attribute("class", "var");
        assert_eq!(
            render(&node),
            r#"<mi mathvariant="bold" class="var">x</mi>"#
        );
    }

    #[test]
    fn render_empty_composites() {
        assert_eq!(render(&Node::row([])), "<mrow></mrow>");
        assert_eq!(render(&Node::table([])), "<mtable></mtable>");
        assert_eq!(
            render(&Node::math_inline([])),
            r#"<math display="inline"></math>"#
        );
    }

    #[test]
    fn render_fraction() {
        let node = Node::fraction(
            Node::identifier("x"),
            Node::row([Node::identifier("p"), Node::operator("-"), Node::identifier("q")]),
        );
        assert_eq!(
            render(&node),
            "<mfrac><mi>x</mi><mrow><mi>p</mi><mo>-</mo><mi>q</mi></mrow></mfrac>"
        );
    }

    #[test]
    fn render_scripts() {
        assert_eq!(
            render(&Node::sub_superscript(
                Node::identifier("x"),
                Node::number(1),
                Node::number(2)
            )),
            "<msubsup><mi>x</mi><mn>1</mn><mn>2</mn></msubsup>"
        );
        assert_eq!(
            render(&Node::over(Node::identifier("x"), Node::operator("‾"))),
            "<mover><mi>x</mi><mo>‾</mo></mover>"
        );
    }

    #[test]
    fn render_parenthesized() {
        assert_eq!(
            render(&Node::parenthesized([Node::identifier("a")])),
            "<mrow><mo>(</mo><mi>a</mi><mo>)</mo></mrow>"
        );
    }

    #[test]
    fn render_xml_namespace() {
        let mut emitter = MarkupEmitter::new(false, true);
        let node = Node::math_block([Node::number(1)]).with_attribute("class", "eq");
        emitter.emit(&node, 0).unwrap();
        assert_eq!(
            emitter.into_inner(),
            r#"<math xmlns="http://www.w3.org/1998/Math/MathML" display="block" class="eq"><mn>1</mn></math>"#
        );
    }

    #[test]
    fn render_pretty_nested() {
        let node = Node::math_block([Node::row([
            Node::identifier("x"),
            Node::operator("+"),
            Node::number(3),
        ])]);
        assert_eq!(
            render_pretty(&node),
            "<math display=\"block\">\n    <mrow>\n        <mi>x</mi>\n        <mo>+</mo>\n        <mn>3</mn>\n    </mrow>\n</math>"
        );
    }

    #[test]
    fn render_pretty_empty_children() {
        assert_eq!(render_pretty(&Node::row([])), "<mrow></mrow>");
        assert_eq!(render_pretty(&Node::row([Node::empty()])), "<mrow></mrow>");
        assert_eq!(render_pretty(&Node::identifier("x")), "<mi>x</mi>");
    }
}
