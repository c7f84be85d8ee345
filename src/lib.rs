//! # wikidown
//!
//! Transcode parsed outline-markup document trees into MediaWiki-style markup.
//!
//! The input is an already-parsed document tree (headlines, paragraphs,
//! lists, tables, links, footnotes, inline emphasis), usually produced by an
//! external parser and handed over as JSON. The output is wiki markup text.
//!
//! ## Quick Start
//!
//! ```
//! use wikidown::model::Node;
//! use wikidown::render::RenderOptions;
//!
//! let mut tree = Node::document(vec![
//!     Node::headline(1, "Intro", vec![Node::paragraph(vec![Node::text("Hello")])]),
//! ]);
//!
//! let wiki = wikidown::to_wiki(&mut tree, &RenderOptions::default());
//! assert_eq!(wiki, "= Intro =\nHello\n\n");
//! ```
//!
//! ## From JSON
//!
//! ```no_run
//! use wikidown::render::RenderOptions;
//!
//! let options = RenderOptions::from_file("wikidown.json")?;
//! let wiki = wikidown::convert_file("notes.tree.json", &options)?;
//! std::fs::write("notes.wiki", wiki)?;
//! # Ok::<(), wikidown::Error>(())
//! ```
//!
//! ## Hosts
//!
//! Renderers consult an [`render::ExportInfo`] for everything the tree alone
//! cannot answer. [`render::DocumentInfo`] answers from the tree; export
//! drivers with more knowledge implement the trait themselves and call
//! [`render::render`] directly.

pub mod error;
pub mod model;
pub mod render;

// Re-exports
pub use error::{Error, Result};
pub use model::{Node, NodeKind};
pub use render::{DocumentInfo, ExportInfo, HeadlineStyle, RenderOptions};

use std::path::Path;

use tracing::debug;

/// Render a tree to wiki markup, footnotes section included.
///
/// The spacing pre-pass runs on `tree` in place.
pub fn to_wiki(tree: &mut Node, options: &RenderOptions) -> String {
    let prepared = render::prepare(tree);
    let info = DocumentInfo::new(prepared, options);
    render::render(prepared, options, &info)
}

/// Decode a JSON document tree.
///
/// # Example
///
/// ```
/// let tree = wikidown::parse_tree(r#"{"type": "document", "children": []}"#)?;
/// assert!(tree.children.is_empty());
/// # Ok::<(), wikidown::Error>(())
/// ```
pub fn parse_tree(json: &str) -> Result<Node> {
    let tree: Node = serde_json::from_str(json)?;
    if tree.kind == NodeKind::Unknown {
        return Err(Error::InvalidTree(
            "root node has an unknown type".to_string(),
        ));
    }
    Ok(tree)
}

/// Read and decode a JSON document tree file.
pub fn load_tree(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading tree");
    let json = std::fs::read_to_string(path)?;
    parse_tree(&json)
}

/// Convert a JSON document tree file to wiki markup.
///
/// # Example
///
/// ```no_run
/// use wikidown::{convert_file, RenderOptions};
///
/// let options = RenderOptions::default().with_table_class(None::<String>);
/// let wiki = convert_file("notes.tree.json", &options)?;
/// # Ok::<(), wikidown::Error>(())
/// ```
pub fn convert_file(path: impl AsRef<Path>, options: &RenderOptions) -> Result<String> {
    let mut tree = load_tree(path)?;
    Ok(to_wiki(&mut tree, options))
}
