//! Spacing pre-pass and the post-order dispatcher.

use tracing::debug;

use crate::model::{Node, NodeId, NodeKind};

use super::context::RenderContext;
use super::{block, footnote, inline, link, table};

/// A tree that went through [`prepare`] and is now read-only.
#[derive(Debug, Clone, Copy)]
pub struct PreparedTree<'a> {
    root: &'a Node,
}

impl<'a> PreparedTree<'a> {
    /// Root node of the tree.
    pub fn root(&self) -> &'a Node {
        self.root
    }
}

/// Run the pre-pass: normalize inter-element spacing and assign node ids.
///
/// The returned handle borrows the tree immutably, so rendering cannot start
/// before the pre-pass is complete.
pub fn prepare(tree: &mut Node) -> PreparedTree<'_> {
    normalize_spacing(tree);
    let mut next = 0;
    assign_ids(tree, &mut next);
    PreparedTree { root: tree }
}

/// Raise the trailing blank lines of every non-root block to at least one.
///
/// List items and table rows are left alone: their layout is line based.
pub fn normalize_spacing(tree: &mut Node) {
    for list in tree.child_lists_mut() {
        for node in list.iter_mut() {
            separate_elements(node);
        }
    }
}

fn separate_elements(node: &mut Node) {
    let spaced = node.kind.is_block()
        && !matches!(
            node.kind,
            NodeKind::ListItem { .. } | NodeKind::TableRow { .. }
        );
    if spaced {
        node.post_blank = Some(node.post_blank.unwrap_or(0).max(1));
    }
    for list in node.child_lists_mut() {
        for child in list.iter_mut() {
            separate_elements(child);
        }
    }
}

fn assign_ids(node: &mut Node, next: &mut u32) {
    node.id = NodeId(*next);
    *next += 1;
    for list in node.child_lists_mut() {
        for child in list.iter_mut() {
            assign_ids(child, next);
        }
    }
}

/// Render a node and its trailing space.
pub(crate) fn export_data<'a>(node: &'a Node, ctx: &mut RenderContext<'a>) -> String {
    let contents = if descends(&node.kind) {
        export_nodes(&node.children, ctx)
    } else {
        String::new()
    };
    let output = transcode(node, &contents, ctx);
    with_post_blank(node, output)
}

/// Render a sequence of sibling nodes.
pub(crate) fn export_nodes<'a>(nodes: &'a [Node], ctx: &mut RenderContext<'a>) -> String {
    let mut out = String::new();
    for node in nodes {
        out.push_str(&export_data(node, ctx));
    }
    out
}

/// Whether children are rendered before the node's own formatter runs.
///
/// Footnote contents are rendered by the footnotes section, never in place.
/// List items render their own children to tell nested lists apart.
fn descends(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::FootnoteReference { .. }
            | NodeKind::FootnoteDefinition { .. }
            | NodeKind::ListItem { .. }
            | NodeKind::Headline {
                footnote_section: true,
                ..
            }
            | NodeKind::Comment
            | NodeKind::Unknown
    )
}

fn transcode<'a>(node: &'a Node, contents: &str, ctx: &mut RenderContext<'a>) -> String {
    match &node.kind {
        NodeKind::Document | NodeKind::Section | NodeKind::PlainList { .. } => {
            contents.to_string()
        }
        NodeKind::Headline { .. } => block::headline(node, contents, ctx),
        NodeKind::Paragraph => block::paragraph(node, contents),
        NodeKind::ListItem { .. } => block::item(node, ctx),
        NodeKind::QuoteBlock => block::quote_block(contents),
        NodeKind::ExampleBlock { value }
        | NodeKind::SrcBlock { value, .. }
        | NodeKind::FixedWidth { value } => block::example_block(value),
        NodeKind::Table { .. } => table::table(node, contents, ctx),
        NodeKind::TableRow { .. } => table::table_row(contents),
        NodeKind::TableCell => table::table_cell(node, contents, ctx),
        NodeKind::Link { .. } => link::link(node, contents, ctx),
        NodeKind::FootnoteReference { .. } => footnote::reference(node, ctx),
        NodeKind::Bold => inline::bold(contents),
        NodeKind::Italic => inline::italic(contents),
        NodeKind::Code { value } | NodeKind::Verbatim { value } => inline::code(value),
        NodeKind::LineBreak => inline::line_break(),
        NodeKind::HorizontalRule => inline::horizontal_rule(),
        NodeKind::RadioTarget => contents.to_string(),
        NodeKind::PlainText { value } => inline::plain_text(value, ctx.options),
        NodeKind::FootnoteDefinition { .. } | NodeKind::Comment | NodeKind::Unknown => {
            debug!(kind = node.kind.name(), "dropping node");
            String::new()
        }
    }
}

fn with_post_blank(node: &Node, output: String) -> String {
    if output.is_empty() || matches!(node.kind, NodeKind::Document) {
        return output;
    }
    let blank = node.post_blank.unwrap_or(0) as usize;
    if node.kind.is_block() {
        let mut out = normalize_block_end(output);
        out.extend(std::iter::repeat('\n').take(blank));
        out
    } else {
        let mut out = output;
        out.extend(std::iter::repeat(' ').take(blank));
        out
    }
}

/// Collapse trailing newline runs (and indentation after them) into one newline.
fn normalize_block_end(mut s: String) -> String {
    loop {
        let trimmed = s.trim_end_matches([' ', '\t']);
        match trimmed.strip_suffix('\n') {
            Some(rest) => {
                let len = rest.len();
                s.truncate(len);
            }
            None => break,
        }
    }
    s.push('\n');
    s
}
