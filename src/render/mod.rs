//! Wiki markup rendering for document trees.
//!
//! Rendering runs in two phases. [`prepare`] normalizes spacing and assigns
//! node ids in place; the returned [`PreparedTree`] is then rendered by a
//! single post-order walk that hands every node, with its rendered children,
//! to the formatter for its kind.
//!
//! # Example
//!
//! ```
//! use wikidown::model::Node;
//! use wikidown::render::{prepare, render, DocumentInfo, RenderOptions};
//!
//! let mut tree = Node::document(vec![Node::headline(
//!     2,
//!     "Hi",
//!     vec![Node::paragraph(vec![Node::text("Hello")])],
//! )]);
//!
//! let options = RenderOptions::default();
//! let prepared = prepare(&mut tree);
//! let info = DocumentInfo::new(prepared, &options);
//!
//! assert_eq!(render(prepared, &options, &info), "== Hi ==\nHello\n\n");
//! ```

mod block;
mod context;
mod footnote;
mod info;
mod inline;
mod link;
mod options;
mod table;
mod template;
mod walker;

use tracing::debug_span;

pub use context::RenderContext;
pub use footnote::{FootnoteKey, FootnoteRegistry};
pub use info::{CrossReference, DocumentInfo, ExportInfo, Ordinal};
pub use options::{HeadlineStyle, RenderOptions};
pub use template::fill_template;
pub use walker::{normalize_spacing, prepare, PreparedTree};

/// Render a prepared tree to wiki markup, footnotes section included.
pub fn render(tree: PreparedTree<'_>, options: &RenderOptions, info: &dyn ExportInfo) -> String {
    let span = debug_span!("render", nodes = tracing::field::Empty);
    let _enter = span.enter();

    let mut ctx = RenderContext::new(tree, options, info);
    span.record("nodes", ctx.index.len());

    let body = walker::export_data(tree.root(), &mut ctx);
    let contents = inner_template(&body, &mut ctx);
    outer_template(&contents, &ctx)
}

/// Render a prepared tree without the footnotes section or templates.
pub fn render_body(
    tree: PreparedTree<'_>,
    options: &RenderOptions,
    info: &dyn ExportInfo,
) -> String {
    let mut ctx = RenderContext::new(tree, options, info);
    walker::export_data(tree.root(), &mut ctx)
}

/// Append the footnotes section to the rendered body.
///
/// Footnotes referenced so far through `ctx` are numbered; the body is
/// returned unchanged when there are none.
pub fn inner_template(contents: &str, ctx: &mut RenderContext<'_>) -> String {
    let section = footnote::section(ctx);
    if section.is_empty() {
        return contents.to_string();
    }
    format!("{}\n\n{}", contents.trim_end(), section)
}

/// Document-level wrapping; markup documents need none.
pub fn outer_template(contents: &str, _ctx: &RenderContext<'_>) -> String {
    contents.to_string()
}
