//! Build math expression trees and render them to MathML-style markup or LaTeX-style
//! typesetting notation.
//!
//! # Usage
//!
//! Trees are built from the constructors on [`Node`]. Fixed-arity kinds such as fractions take
//! their operands as separate arguments; the generic [`Node::composite`] constructor checks the
//! arity at run time instead and returns an [`ArityError`] on mismatch.
//!
//! ```rust
//! use mathlang::{Node, render_markup, render_typeset};
//!
//! let sum = Node::row([Node::identifier("x"), Node::operator("+"), Node::number(3)]);
//! let eq = Node::math_block([sum]);
//!
//! assert_eq!(
//!     render_markup(&eq),
//!     r#"<math display="block"><mrow><mi>x</mi><mo>+</mo><mn>3</mn></mrow></math>"#
//! );
//! assert_eq!(render_typeset(&eq).unwrap(), r"\[x+3\]");
//! ```
//!
//! Table kinds and the "over" decoration have no typesetting form; [`render_typeset`] returns an
//! [`UnsupportedRenderError`] for them.
//!
//! # Features
//!
//! - `serde`: `RenderConfig` implements `Deserialize`, and so does `Node`, going through the
//!   same constructors (and checks) as code-built trees.
//!
mod ast;
mod attribute;
#[cfg(feature = "serde")]
mod de;
mod error;
mod fmt;
mod kind;
mod markup;
mod typeset;

use log::trace;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use self::ast::{Composite, Leaf, Node};
pub use self::attribute::AttributeMap;
#[cfg(feature = "serde")]
pub use self::de::TreeError;
pub use self::error::{AppendError, ArityError, UnsupportedRenderError};
pub use self::kind::{CompositeKind, LeafKind, NodeKind};
pub use self::markup::MarkupEmitter;
pub use self::typeset::{ScriptGrouping, TypesetEmitter};

/// Configuration for pretty-printing the markup output.
///
/// Pretty-printing puts every nested node on its own line, indented by its depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum PrettyPrint {
    /// Never pretty print.
    #[default]
    Never,
    /// Always pretty print.
    Always,
    /// Pretty print when the root is a block math environment.
    Auto,
}

/// Configuration object for rendering.
///
/// # Example usage
///
/// ```rust
/// use mathlang::{PrettyPrint, RenderConfig, ScriptGrouping};
///
/// // Default values
/// let config = RenderConfig::default();
///
/// let config = RenderConfig {
///     pretty_print: PrettyPrint::Auto,
///     script_grouping: ScriptGrouping::MultiChildComposite,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct RenderConfig {
    /// See [`PrettyPrint`]. Only affects markup.
    pub pretty_print: PrettyPrint,
    /// If `true`, include `xmlns="http://www.w3.org/1998/Math/MathML"` in `<math>` tags.
    pub xml_namespace: bool,
    /// See [`ScriptGrouping`]. Only affects typesetting output.
    pub script_grouping: ScriptGrouping,
}

/// Renders trees with a fixed configuration.
#[derive(Debug, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `node` to markup. This never fails.
    pub fn markup(&self, node: &Node) -> String {
        trace!("rendering {} to markup", node.kind());
        let pretty = match self.config.pretty_print {
            PrettyPrint::Never => false,
            PrettyPrint::Always => true,
            PrettyPrint::Auto => node.kind() == NodeKind::Composite(CompositeKind::MathBlock),
        };
        let mut emitter = MarkupEmitter::new(pretty, self.config.xml_namespace);
        // Writing to a `String` cannot fail, so the result of `emit` carries no information.
        let _ = emitter.emit(node, 0);
        emitter.into_inner()
    }

    /// Render `node` to typesetting notation.
    ///
    /// Fails on the first node, in depth-first order, whose kind has no typesetting form.
    pub fn typeset(&self, node: &Node) -> Result<String, UnsupportedRenderError> {
        trace!("rendering {} to typesetting notation", node.kind());
        let mut emitter = TypesetEmitter::new(self.config.script_grouping);
        emitter.emit(node)?;
        Ok(emitter.into_inner())
    }
}

/// Render `node` to markup with the default configuration.
pub fn render_markup(node: &Node) -> String {
    Renderer::default().markup(node)
}

/// Render `node` to typesetting notation with the default configuration.
pub fn render_typeset(node: &Node) -> Result<String, UnsupportedRenderError> {
    Renderer::default().typeset(node)
}
