//! Footnote numbering, reference markers and the footnotes section.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::model::{Node, NodeId, NodeKind};

use super::context::RenderContext;
use super::template::fill_template;
use super::walker;

/// Identity of a footnote across references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FootnoteKey {
    /// Labeled footnote, shared by every reference with the label
    Label(String),
    /// Anonymous inline footnote, owned by a single reference
    Anonymous(NodeId),
}

impl FootnoteKey {
    /// Key of a footnote reference node.
    pub fn of(reference: &Node) -> Option<Self> {
        match &reference.kind {
            NodeKind::FootnoteReference { label: Some(label) } => {
                Some(FootnoteKey::Label(label.clone()))
            }
            NodeKind::FootnoteReference { label: None } => {
                Some(FootnoteKey::Anonymous(reference.id()))
            }
            _ => None,
        }
    }
}

/// Footnote numbers assigned during one export, in first-reference order.
#[derive(Debug, Default)]
pub struct FootnoteRegistry<'a> {
    numbers: HashMap<FootnoteKey, usize>,
    first_references: Vec<&'a Node>,
}

impl<'a> FootnoteRegistry<'a> {
    /// Number of a footnote reference, assigning the next one on first sight.
    pub fn number(&mut self, reference: &'a Node) -> Option<usize> {
        let key = FootnoteKey::of(reference)?;
        if let Some(number) = self.numbers.get(&key) {
            return Some(*number);
        }
        let number = self.first_references.len() + 1;
        trace!(?key, number, "assigned footnote number");
        self.numbers.insert(key, number);
        self.first_references.push(reference);
        Some(number)
    }

    /// Number already assigned to a footnote, if any.
    pub fn get(&self, key: &FootnoteKey) -> Option<usize> {
        self.numbers.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.first_references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first_references.is_empty()
    }

    /// First reference of the footnote numbered `index + 1`.
    pub fn reference_at(&self, index: usize) -> Option<&'a Node> {
        self.first_references.get(index).copied()
    }
}

/// Render a reference marker, preceded by the separator when it directly
/// follows another reference.
pub fn reference<'a>(node: &'a Node, ctx: &mut RenderContext<'a>) -> String {
    let Some(number) = ctx.footnotes.number(node) else {
        return String::new();
    };

    let options = ctx.options;
    let mut output = String::new();
    if matches!(
        ctx.index.previous_sibling(node).map(|previous| &previous.kind),
        Some(NodeKind::FootnoteReference { .. })
    ) {
        output.push_str(&options.footnote_separator);
    }
    output.push_str(&fill_template(
        &options.footnote_reference_format,
        &[number.to_string().as_str()],
    ));
    output
}

/// Render the footnotes section, or nothing when no footnote was referenced.
///
/// Definitions may reference further footnotes; those are numbered while
/// the section renders and appended in turn.
pub fn section<'a>(ctx: &mut RenderContext<'a>) -> String {
    let mut definitions = Vec::new();
    let mut index = 0;
    while let Some(reference) = ctx.footnotes.reference_at(index) {
        index += 1;
        let Some(body) = definition_body(reference, ctx) else {
            debug!(number = index, "footnote without definition");
            continue;
        };
        let text = walker::export_nodes(body, ctx);
        definitions.push(format!("[{}] {}\n", index, text.trim()));
    }

    if definitions.is_empty() {
        return String::new();
    }

    let info = ctx.info;
    let title = info.localize("Footnotes");
    fill_template(
        &ctx.options.footnotes_section_template,
        &[title.as_str(), definitions.join("\n").as_str()],
    )
}

/// Contents defining the footnote a reference points to.
fn definition_body<'a>(reference: &'a Node, ctx: &RenderContext<'a>) -> Option<&'a [Node]> {
    match &reference.kind {
        NodeKind::FootnoteReference { label: Some(label) } => ctx
            .index
            .footnote_definition(label)
            .map(|definition| definition.children.as_slice()),
        NodeKind::FootnoteReference { label: None } if !reference.children.is_empty() => {
            Some(reference.children.as_slice())
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{prepare, render, render_body, DocumentInfo, RenderOptions};

    fn render_full(mut tree: Node, options: &RenderOptions) -> String {
        let prepared = prepare(&mut tree);
        let info = DocumentInfo::new(prepared, options);
        render(prepared, options, &info)
    }

    fn note(label: &str, text: &str) -> Node {
        Node::footnote_def(label, vec![Node::paragraph(vec![Node::text(text)])])
    }

    #[test]
    fn test_numbers_follow_first_reference() {
        let tree = Node::document(vec![
            Node::paragraph(vec![
                Node::text("a"),
                Node::footnote_ref("A"),
                Node::text(" b"),
                Node::footnote_ref("B"),
                Node::text(" c"),
                Node::footnote_ref("A"),
                Node::text(" d"),
                Node::footnote_ref("C"),
            ]),
            note("A", "note A"),
            note("B", "note B"),
            note("C", "note C"),
        ]);

        let md = render_full(tree, &RenderOptions::default());
        assert_eq!(
            md,
            "a<sup>1</sup> b<sup>2</sup> c<sup>1</sup> d<sup>3</sup>\n\n\
             == Footnotes ==\n\n\
             [1] note A\n\n\
             [2] note B\n\n\
             [3] note C\n"
        );
    }

    #[test]
    fn test_separator_only_between_adjacent_references() {
        let mut tree = Node::document(vec![
            Node::paragraph(vec![
                Node::text("x"),
                Node::footnote_ref("1"),
                Node::footnote_ref("2"),
                Node::text(" y"),
                Node::footnote_ref("3"),
            ]),
            note("1", "one"),
            note("2", "two"),
            note("3", "three"),
        ]);

        let options = RenderOptions::default();
        let prepared = prepare(&mut tree);
        let info = DocumentInfo::new(prepared, &options);
        let body = render_body(prepared, &options, &info);
        assert_eq!(body, "x<sup>1</sup><sup>, </sup><sup>2</sup> y<sup>3</sup>\n\n");
    }

    #[test]
    fn test_no_section_without_footnotes() {
        let tree = Node::document(vec![Node::paragraph(vec![Node::text("plain")])]);
        assert_eq!(render_full(tree, &RenderOptions::default()), "plain\n\n");
    }

    #[test]
    fn test_unreferenced_definitions_are_omitted() {
        let tree = Node::document(vec![
            Node::paragraph(vec![Node::text("x"), Node::footnote_ref("used")]),
            note("used", "kept"),
            note("unused", "dropped"),
        ]);
        let md = render_full(tree, &RenderOptions::default());
        assert!(md.contains("[1] kept\n"));
        assert!(!md.contains("dropped"));
    }

    #[test]
    fn test_inline_and_anonymous_definitions() {
        let mut labeled = Node::footnote_ref("inline");
        labeled.children.push(Node::text("labeled body"));
        let mut anonymous = Node::new(NodeKind::FootnoteReference { label: None });
        anonymous.children.push(Node::text("anonymous body"));

        let tree = Node::document(vec![Node::paragraph(vec![
            Node::text("x").with_post_blank(1),
            labeled,
            Node::text(" y"),
            anonymous,
        ])]);
        let md = render_full(tree, &RenderOptions::default());
        assert!(md.contains("[1] labeled body\n\n[2] anonymous body\n"), "got: {}", md);
        // inline definitions are not rendered in place
        assert!(md.starts_with("x <sup>1</sup> y<sup>2</sup>\n\n"), "got: {}", md);
    }

    #[test]
    fn test_nested_references_are_numbered() {
        let tree = Node::document(vec![
            Node::paragraph(vec![Node::text("x"), Node::footnote_ref("outer")]),
            Node::footnote_def(
                "outer",
                vec![Node::paragraph(vec![
                    Node::text("see"),
                    Node::footnote_ref("inner"),
                ])],
            ),
            note("inner", "deep"),
        ]);
        let md = render_full(tree, &RenderOptions::default());
        assert!(md.contains("[1] see<sup>2</sup>\n\n[2] deep\n"), "got: {}", md);
    }

    #[test]
    fn test_custom_formats_and_localized_title() {
        let tree = Node::document(vec![
            Node::paragraph(vec![Node::text("x"), Node::footnote_ref("a")]),
            note("a", "body"),
        ]);
        let options = RenderOptions::default()
            .with_footnote_format("[%s]", ",")
            .with_footnotes_section("<h2>%s</h2>\n%s")
            .with_language("de");
        let md = render_full(tree, &options);
        assert_eq!(md, "x[1]\n\n<h2>Fußnoten</h2>\n[1] body\n");
    }

    #[test]
    fn test_registry_reuses_numbers() {
        let mut tree = Node::document(vec![Node::paragraph(vec![
            Node::footnote_ref("a"),
            Node::footnote_ref("b"),
            Node::footnote_ref("a"),
        ])]);
        let prepared = prepare(&mut tree);
        let para = &prepared.root().children[0];

        let mut registry = FootnoteRegistry::default();
        assert_eq!(registry.number(&para.children[0]), Some(1));
        assert_eq!(registry.number(&para.children[1]), Some(2));
        assert_eq!(registry.number(&para.children[2]), Some(1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(&FootnoteKey::Label("b".to_string())), Some(2));
        assert!(registry.number(para).is_none());
    }
}
