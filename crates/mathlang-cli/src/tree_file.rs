//! Expression trees written as TOML.
//!
//! The document itself is the root node. Every node is a table with a `kind`, plus `content`
//! for leaves or `children` for composites, and optionally an `attributes` table:
//!
//! ```toml
//! kind = "math-block"
//! children = [
//!     { kind = "fraction", children = [
//!         { kind = "identifier", content = "x" },
//!         { kind = "number", content = "2" },
//!     ] },
//! ]
//! ```
use std::ops::Range;

use ariadne::{Label, Report, ReportKind};
use mathlang::Node;

pub fn parse_tree(source: &str) -> Result<Node, toml::de::Error> {
    toml::from_str(source)
}

/// Convert a tree file error into an [`ariadne::Report`] for pretty-printing.
pub fn to_report<'name>(
    err: &toml::de::Error,
    source_name: &'name str,
    with_color: bool,
) -> Report<'static, (&'name str, Range<usize>)> {
    let span = err.span().unwrap_or(0..0);
    let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
    if !with_color {
        config = config.with_color(false);
    }
    Report::build(ReportKind::Error, (source_name, span.start..span.start))
        .with_config(config)
        .with_message("invalid expression tree")
        .with_label(Label::new((source_name, span)).with_message(err.message()))
        .finish()
}
