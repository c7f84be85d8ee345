//! Document tree nodes.

use serde::{Deserialize, Serialize};

/// Identifier assigned to every node by [`crate::render::prepare`].
///
/// Ids follow pre-order over captions, secondary contents (headline titles,
/// item tags) and then children, starting at 0 for the root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in pre-order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a plain list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// Bulleted list
    #[default]
    Unordered,
    /// Numbered list
    Ordered,
    /// Term/description list
    Descriptive,
}

/// Checkbox state of a list item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Checkbox {
    #[default]
    None,
    On,
    Off,
    /// Partially checked
    Trans,
}

/// Type of a table row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    #[default]
    Standard,
    /// Horizontal separator row
    Rule,
}

/// Origin of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    /// Native pipe table with parsed rows and cells
    #[default]
    Org,
    /// Legacy grid-drawing table kept as raw text
    TableEl,
}

/// Type tag of a link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkType {
    CustomId,
    Id,
    File,
    Http,
    Https,
    Ftp,
    Mailto,
    Coderef,
    Radio,
    Fuzzy,
    Image,
    /// Any other scheme, kept verbatim
    Other(String),
}

impl LinkType {
    /// The tag as it appears in source links.
    pub fn as_str(&self) -> &str {
        match self {
            LinkType::CustomId => "custom-id",
            LinkType::Id => "id",
            LinkType::File => "file",
            LinkType::Http => "http",
            LinkType::Https => "https",
            LinkType::Ftp => "ftp",
            LinkType::Mailto => "mailto",
            LinkType::Coderef => "coderef",
            LinkType::Radio => "radio",
            LinkType::Fuzzy => "fuzzy",
            LinkType::Image => "image",
            LinkType::Other(scheme) => scheme,
        }
    }

    /// Whether the link is rendered as `scheme:path`.
    pub fn is_url(&self) -> bool {
        matches!(
            self,
            LinkType::Http | LinkType::Https | LinkType::Ftp | LinkType::Mailto
        )
    }
}

impl From<String> for LinkType {
    fn from(tag: String) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "custom-id" => LinkType::CustomId,
            "id" => LinkType::Id,
            "file" => LinkType::File,
            "http" => LinkType::Http,
            "https" => LinkType::Https,
            "ftp" => LinkType::Ftp,
            "mailto" => LinkType::Mailto,
            "coderef" => LinkType::Coderef,
            "radio" => LinkType::Radio,
            "fuzzy" => LinkType::Fuzzy,
            "image" => LinkType::Image,
            _ => LinkType::Other(tag),
        }
    }
}

impl From<&str> for LinkType {
    fn from(tag: &str) -> Self {
        LinkType::from(tag.to_string())
    }
}

impl From<LinkType> for String {
    fn from(link_type: LinkType) -> Self {
        link_type.as_str().to_string()
    }
}

/// Kind-specific attributes of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Section,
    Headline {
        /// Level relative to the export root
        level: u8,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        todo: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<char>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        title: Vec<Node>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        custom_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        /// Placeholder headline generated for the footnotes section
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        footnote_section: bool,
    },
    Paragraph,
    PlainList {
        #[serde(default)]
        list_type: ListType,
    },
    ListItem {
        #[serde(default, skip_serializing_if = "is_default_checkbox")]
        checkbox: Checkbox,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<Vec<Node>>,
    },
    Table {
        #[serde(default)]
        table_type: TableType,
        /// Raw source of grid tables
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    TableRow {
        #[serde(default)]
        row_type: RowType,
    },
    TableCell,
    /// A link; children form the description.
    Link { link_type: LinkType, path: String },
    /// A footnote reference; children, when present, are its inline definition.
    FootnoteReference {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    FootnoteDefinition { label: String },
    Bold,
    Italic,
    Code { value: String },
    Verbatim { value: String },
    LineBreak,
    HorizontalRule,
    QuoteBlock,
    ExampleBlock { value: String },
    SrcBlock {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
        value: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        number_lines: bool,
    },
    FixedWidth { value: String },
    RadioTarget,
    Comment,
    PlainText { value: String },
    /// Any kind this crate does not know about
    #[serde(other)]
    Unknown,
}

fn is_default_checkbox(checkbox: &Checkbox) -> bool {
    *checkbox == Checkbox::None
}

impl NodeKind {
    /// Short name of the kind, as used in serialized trees.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Section => "section",
            NodeKind::Headline { .. } => "headline",
            NodeKind::Paragraph => "paragraph",
            NodeKind::PlainList { .. } => "plain_list",
            NodeKind::ListItem { .. } => "list_item",
            NodeKind::Table { .. } => "table",
            NodeKind::TableRow { .. } => "table_row",
            NodeKind::TableCell => "table_cell",
            NodeKind::Link { .. } => "link",
            NodeKind::FootnoteReference { .. } => "footnote_reference",
            NodeKind::FootnoteDefinition { .. } => "footnote_definition",
            NodeKind::Bold => "bold",
            NodeKind::Italic => "italic",
            NodeKind::Code { .. } => "code",
            NodeKind::Verbatim { .. } => "verbatim",
            NodeKind::LineBreak => "line_break",
            NodeKind::HorizontalRule => "horizontal_rule",
            NodeKind::QuoteBlock => "quote_block",
            NodeKind::ExampleBlock { .. } => "example_block",
            NodeKind::SrcBlock { .. } => "src_block",
            NodeKind::FixedWidth { .. } => "fixed_width",
            NodeKind::RadioTarget => "radio_target",
            NodeKind::Comment => "comment",
            NodeKind::PlainText { .. } => "plain_text",
            NodeKind::Unknown => "unknown",
        }
    }

    /// Whether the kind is a block-level element.
    ///
    /// Block trailing space counts blank lines, inline trailing space counts spaces.
    pub fn is_block(&self) -> bool {
        match self {
            NodeKind::Document
            | NodeKind::Section
            | NodeKind::Headline { .. }
            | NodeKind::Paragraph
            | NodeKind::PlainList { .. }
            | NodeKind::ListItem { .. }
            | NodeKind::Table { .. }
            | NodeKind::TableRow { .. }
            | NodeKind::FootnoteDefinition { .. }
            | NodeKind::HorizontalRule
            | NodeKind::QuoteBlock
            | NodeKind::ExampleBlock { .. }
            | NodeKind::SrcBlock { .. }
            | NodeKind::FixedWidth { .. }
            | NodeKind::Comment => true,
            NodeKind::TableCell
            | NodeKind::Link { .. }
            | NodeKind::FootnoteReference { .. }
            | NodeKind::Bold
            | NodeKind::Italic
            | NodeKind::Code { .. }
            | NodeKind::Verbatim { .. }
            | NodeKind::LineBreak
            | NodeKind::RadioTarget
            | NodeKind::PlainText { .. }
            | NodeKind::Unknown => false,
        }
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,

    /// Child nodes in document order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    /// Trailing blank lines (blocks) or spaces (inline objects)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_blank: Option<u32>,

    /// Affiliated name, used as a link target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Affiliated caption
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<Vec<Node>>,

    #[serde(skip)]
    pub(crate) id: NodeId,
}

impl Node {
    /// Create a childless node.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            post_blank: None,
            name: None,
            caption: None,
            id: NodeId::default(),
        }
    }

    /// Create a node with children.
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    /// Create a text run.
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::PlainText {
            value: value.into(),
        })
    }

    /// Create a document root.
    pub fn document(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Document, children)
    }

    /// Create a paragraph.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Paragraph, children)
    }

    /// Create a headline with a plain text title.
    pub fn headline(level: u8, title: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_children(
            NodeKind::Headline {
                level,
                todo: None,
                priority: None,
                tags: Vec::new(),
                title: vec![Node::text(title)],
                custom_id: None,
                id: None,
                footnote_section: false,
            },
            children,
        )
    }

    /// Create a link with an optional plain text description.
    pub fn link(link_type: impl Into<LinkType>, path: impl Into<String>, description: Option<&str>) -> Self {
        Self::with_children(
            NodeKind::Link {
                link_type: link_type.into(),
                path: path.into(),
            },
            description.map(|d| vec![Node::text(d)]).unwrap_or_default(),
        )
    }

    /// Create a footnote reference to a labeled definition.
    pub fn footnote_ref(label: impl Into<String>) -> Self {
        Self::new(NodeKind::FootnoteReference {
            label: Some(label.into()),
        })
    }

    /// Create a footnote definition.
    pub fn footnote_def(label: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_children(
            NodeKind::FootnoteDefinition {
                label: label.into(),
            },
            children,
        )
    }

    /// Set the trailing space count.
    pub fn with_post_blank(mut self, post_blank: u32) -> Self {
        self.post_blank = Some(post_blank);
        self
    }

    /// Set the affiliated name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set a plain text caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(vec![Node::text(caption)]);
        self
    }

    /// Id assigned by the pre-pass.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Concatenated text of the node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::PlainText { value }
            | NodeKind::Code { value }
            | NodeKind::Verbatim { value } => out.push_str(value),
            NodeKind::Headline { title, .. } => {
                for node in title {
                    node.collect_text(out);
                }
            }
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
        if !self.kind.is_block() {
            for _ in 0..self.post_blank.unwrap_or(0) {
                out.push(' ');
            }
        }
    }

    /// Every owned node list, in id order: caption, secondary contents, children.
    pub fn child_lists(&self) -> Vec<&[Node]> {
        let mut lists: Vec<&[Node]> = Vec::with_capacity(3);
        if let Some(caption) = &self.caption {
            lists.push(caption);
        }
        match &self.kind {
            NodeKind::Headline { title, .. } => lists.push(title),
            NodeKind::ListItem { tag: Some(tag), .. } => lists.push(tag),
            _ => {}
        }
        lists.push(&self.children);
        lists
    }

    pub(crate) fn child_lists_mut(&mut self) -> Vec<&mut Vec<Node>> {
        let Node {
            kind,
            children,
            caption,
            ..
        } = self;
        let mut lists = Vec::with_capacity(3);
        if let Some(caption) = caption {
            lists.push(caption);
        }
        match kind {
            NodeKind::Headline { title, .. } => lists.push(title),
            NodeKind::ListItem { tag: Some(tag), .. } => lists.push(tag),
            _ => {}
        }
        lists.push(children);
        lists
    }

    /// Visit the node and all descendants in id order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for list in self.child_lists() {
            for node in list {
                node.walk(visit);
            }
        }
    }
}
