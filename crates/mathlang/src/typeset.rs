use log::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::Node;
use crate::error::UnsupportedRenderError;
use crate::kind::CompositeKind;

/// When to put braces around the operands of subscripts and superscripts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScriptGrouping {
    /// Group an operand whose rendering is longer than one character.
    ///
    /// This looks at the output, not at the tree: a two-letter identifier is grouped, while a
    /// single non-ASCII symbol is not.
    #[default]
    RenderedLength,
    /// Group an operand that is a composite with more than one child.
    MultiChildComposite,
}

/// Serializes a tree into LaTeX-style typesetting notation.
pub struct TypesetEmitter {
    s: String,
    grouping: ScriptGrouping,
}

impl TypesetEmitter {
    #[inline]
    pub fn new(grouping: ScriptGrouping) -> Self {
        Self {
            s: String::new(),
            grouping,
        }
    }

    #[inline]
    pub fn into_inner(self) -> String {
        self.s
    }

    pub fn emit(&mut self, node: &Node) -> Result<(), UnsupportedRenderError> {
        trace!("typesetting {}", node.kind());
        let composite = match node {
            Node::Leaf(leaf) => {
                match leaf.kind().command() {
                    Some(command) => self.push_braced_command(command, leaf.content()),
                    None => self.s.push_str(leaf.content()),
                }
                return Ok(());
            }
            Node::Composite(composite) => composite,
        };
        let kind = composite.kind();
        let children = composite.children();
        match kind {
            CompositeKind::Row
            | CompositeKind::RowParenthesized
            | CompositeKind::RowBracketed
            | CompositeKind::SquareRoot => match kind.command() {
                Some(command) => {
                    self.push_command(command);
                    self.s.push('{');
                    self.emit_all(children)?;
                    self.s.push('}');
                }
                None => self.emit_all(children)?,
            },
            CompositeKind::Fraction => {
                if let Some(command) = kind.command() {
                    self.push_command(command);
                }
                for child in children {
                    self.s.push('{');
                    self.emit(child)?;
                    self.s.push('}');
                }
            }
            // The following kinds join their operands with `_` and `^`.
            CompositeKind::Subscript
            | CompositeKind::Superscript
            | CompositeKind::SubSuperscript => {
                let separators: &[char] = match kind {
                    CompositeKind::Subscript => &['_'],
                    CompositeKind::Superscript => &['^'],
                    _ => &['_', '^'],
                };
                for (idx, child) in children.iter().enumerate() {
                    if let Some(sep) = idx.checked_sub(1).and_then(|i| separators.get(i)) {
                        self.s.push(*sep);
                    }
                    self.emit_script_operand(child)?;
                }
            }
            CompositeKind::MathBlock => {
                self.s.push_str(r"\[");
                self.emit_all(children)?;
                self.s.push_str(r"\]");
            }
            CompositeKind::MathInline => {
                self.s.push_str(r"\(");
                self.emit_all(children)?;
                self.s.push_str(r"\)");
            }
            CompositeKind::Over
            | CompositeKind::Table
            | CompositeKind::TableRow
            | CompositeKind::TableCell => {
                debug!("`{kind}` has no typesetting form");
                return Err(UnsupportedRenderError { kind });
            }
        }
        Ok(())
    }

    fn emit_all(&mut self, nodes: &[Node]) -> Result<(), UnsupportedRenderError> {
        for node in nodes {
            self.emit(node)?;
        }
        Ok(())
    }

    fn emit_script_operand(&mut self, node: &Node) -> Result<(), UnsupportedRenderError> {
        let start = self.s.len();
        self.emit(node)?;
        let group = match self.grouping {
            ScriptGrouping::RenderedLength => self.s[start..].chars().nth(1).is_some(),
            ScriptGrouping::MultiChildComposite => node.children().len() > 1,
        };
        if group {
            self.s.insert(start, '{');
            self.s.push('}');
        }
        Ok(())
    }

    #[inline]
    fn push_command(&mut self, command: &str) {
        self.s.push('\\');
        self.s.push_str(command);
    }

    fn push_braced_command(&mut self, command: &str, content: &str) {
        self.push_command(command);
        self.s.push('{');
        self.s.push_str(content);
        self.s.push('}');
    }
}

impl Default for TypesetEmitter {
    fn default() -> Self {
        Self::new(ScriptGrouping::default())
    }
}
