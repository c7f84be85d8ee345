//! Export information consulted by the renderer.
//!
//! The host system knows things the tree alone does not: where ids live,
//! how headlines are numbered, how fixed strings are localized. The renderer
//! asks through [`ExportInfo`]; [`DocumentInfo`] answers from the tree itself.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::model::{Node, NodeId, NodeKind, RowType};

use super::options::RenderOptions;
use super::walker::PreparedTree;

/// Characters allowed in the first column of a table with a special column.
const SPECIAL_MARKERS: &[&str] = &["", "#", "!", "$", "*", "_", "^", "/"];

/// Built-in translations of fixed strings.
const TRANSLATIONS: &[(&str, &str, &str)] = &[
    ("de", "Footnotes", "Fußnoten"),
    ("de", "See section %s", "siehe Abschnitt %s"),
    ("es", "Footnotes", "Notas al pie de página"),
    ("es", "See section %s", "Véase la sección %s"),
    ("fr", "Footnotes", "Notes de bas de page"),
    ("fr", "See section %s", "cf. section %s"),
];

/// Resolution of an `id` or `custom-id` link.
#[derive(Debug, Clone, PartialEq)]
pub enum CrossReference<'a> {
    /// Target lives in another file
    External(String),
    /// Target is a node of this document
    Internal(&'a Node),
}

/// Number of an element among its peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ordinal {
    Single(usize),
    /// Hierarchical number, such as a section number
    Dotted(Vec<usize>),
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ordinal::Single(n) => write!(f, "{}", n),
            Ordinal::Dotted(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}

/// Queries the renderer delegates to the export host.
///
/// Methods with default bodies implement the usual behavior from the tree
/// alone; hosts override them when they know better.
pub trait ExportInfo {
    /// Resolve an `id` or `custom-id` link.
    fn resolve_cross_reference(&self, link: &Node) -> Option<CrossReference<'_>>;

    /// Radio target a `radio` link points to.
    fn resolve_radio_target(&self, link: &Node) -> Option<&Node>;

    /// Best-effort target of a `fuzzy` link.
    fn resolve_fuzzy_target(&self, link: &Node) -> Option<&Node>;

    /// Number of a link target.
    fn ordinal_of(&self, node: &Node) -> Option<Ordinal>;

    /// Code reference lookup: returns the format template and the value
    /// substituted into it.
    ///
    /// The template is the description with its first `(label)`, or failing
    /// that its first bare `label`, replaced by `%s`.
    fn resolve_code_reference(
        &self,
        label: &str,
        description: Option<&str>,
    ) -> Option<(String, String)>;

    /// Whether a link path points to an inline image.
    fn is_inline_image(&self, path: &str, extensions: &[String]) -> bool {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Caption attached to an element.
    fn caption_of<'n>(&self, node: &'n Node) -> Option<&'n [Node]> {
        node.caption.as_deref().filter(|caption| !caption.is_empty())
    }

    /// Localized form of a fixed string.
    fn localize(&self, key: &str) -> String {
        key.to_string()
    }

    /// Whether the first column of a table only holds row markers.
    fn has_special_column(&self, table: &Node) -> bool {
        let mut marked = false;
        for row in standard_rows(table) {
            let Some(cell) = row.children.first() else {
                continue;
            };
            let text = cell.plain_text();
            let text = text.trim();
            if !SPECIAL_MARKERS.contains(&text) {
                return false;
            }
            marked |= !text.is_empty();
        }
        marked
    }

    /// First row holding data rather than a rule.
    fn first_data_row<'n>(&self, table: &'n Node) -> Option<&'n Node> {
        standard_rows(table).next()
    }

    /// Convert a legacy grid table.
    fn convert_grid_table(&self, table: &Node) -> String {
        match &table.kind {
            NodeKind::Table {
                value: Some(value), ..
            } => format!("<pre>\n{}\n</pre>", value.trim_end()),
            _ => String::new(),
        }
    }
}

fn standard_rows(table: &Node) -> impl Iterator<Item = &Node> {
    table.children.iter().filter(|row| {
        matches!(
            row.kind,
            NodeKind::TableRow {
                row_type: RowType::Standard
            }
        )
    })
}

#[derive(Debug, Clone)]
struct CodeRef {
    line: usize,
    numbered: bool,
}

/// [`ExportInfo`] answered from the document tree.
#[derive(Debug)]
pub struct DocumentInfo<'t> {
    ids: HashMap<&'t str, &'t Node>,
    custom_ids: HashMap<&'t str, &'t Node>,
    external_ids: HashMap<String, String>,
    headline_numbers: HashMap<NodeId, Vec<usize>>,
    element_numbers: HashMap<NodeId, usize>,
    names: HashMap<&'t str, &'t Node>,
    headlines: Vec<(String, &'t Node)>,
    radio_targets: Vec<(String, &'t Node)>,
    code_refs: HashMap<String, CodeRef>,
    language: String,
    translations: HashMap<String, String>,
}

impl<'t> DocumentInfo<'t> {
    /// Collect targets, numbers and code references from a prepared tree.
    pub fn new(tree: PreparedTree<'t>, options: &RenderOptions) -> Self {
        let mut info = Self {
            ids: HashMap::new(),
            custom_ids: HashMap::new(),
            external_ids: HashMap::new(),
            headline_numbers: HashMap::new(),
            element_numbers: HashMap::new(),
            names: HashMap::new(),
            headlines: Vec::new(),
            radio_targets: Vec::new(),
            code_refs: HashMap::new(),
            language: options.language.clone(),
            translations: options.translations.clone(),
        };

        let mut counters: Vec<usize> = Vec::new();
        let mut captioned: HashMap<&'static str, usize> = HashMap::new();

        tree.root().walk(&mut |node: &'t Node| {
            if let Some(name) = node.name.as_deref() {
                info.names.entry(name).or_insert(node);
            }
            if node.caption.is_some() {
                let count = captioned.entry(node.kind.name()).or_insert(0);
                *count += 1;
                info.element_numbers.insert(node.id(), *count);
            }

            match &node.kind {
                NodeKind::Headline {
                    level,
                    title,
                    custom_id,
                    id,
                    footnote_section: false,
                    ..
                } => {
                    let depth = usize::from((*level).max(1));
                    if counters.len() < depth {
                        counters.resize(depth, 0);
                    }
                    counters.truncate(depth);
                    counters[depth - 1] += 1;
                    info.headline_numbers.insert(node.id(), counters.clone());

                    if let Some(custom_id) = custom_id.as_deref() {
                        info.custom_ids.entry(custom_id).or_insert(node);
                    }
                    if let Some(id) = id.as_deref() {
                        info.ids.entry(id).or_insert(node);
                    }
                    let text: String = title.iter().map(Node::plain_text).collect();
                    info.headlines.push((normalize_title(&text), node));
                }
                NodeKind::RadioTarget => {
                    info.radio_targets
                        .push((node.plain_text().trim().to_lowercase(), node));
                }
                NodeKind::SrcBlock {
                    value,
                    number_lines,
                    ..
                } => info.collect_code_refs(value, *number_lines),
                NodeKind::ExampleBlock { value } => info.collect_code_refs(value, false),
                _ => {}
            }
        });

        info
    }

    /// Map ids that live in other files to those files.
    pub fn with_external_ids(mut self, ids: HashMap<String, String>) -> Self {
        self.external_ids = ids;
        self
    }

    fn collect_code_refs(&mut self, value: &str, numbered: bool) {
        for (i, line) in value.lines().enumerate() {
            if let Some(label) = coderef_label(line) {
                self.code_refs.entry(label.to_string()).or_insert(CodeRef {
                    line: i + 1,
                    numbered,
                });
            }
        }
    }
}

/// Label of a trailing `(ref:label)` marker.
pub(crate) fn coderef_label(line: &str) -> Option<&str> {
    let line = line.trim_end();
    let start = line.rfind("(ref:")?;
    let label = line[start + 5..].strip_suffix(')')?;
    (!label.is_empty() && !label.contains(char::is_whitespace)).then_some(label)
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl ExportInfo for DocumentInfo<'_> {
    fn resolve_cross_reference(&self, link: &Node) -> Option<CrossReference<'_>> {
        let NodeKind::Link { link_type, path } = &link.kind else {
            return None;
        };
        let local = match link_type.as_str() {
            "custom-id" => self.custom_ids.get(path.as_str()),
            _ => self.ids.get(path.as_str()),
        };
        if let Some(node) = local {
            return Some(CrossReference::Internal(*node));
        }
        self.external_ids
            .get(path)
            .map(|file| CrossReference::External(file.clone()))
    }

    fn resolve_radio_target(&self, link: &Node) -> Option<&Node> {
        let NodeKind::Link { path, .. } = &link.kind else {
            return None;
        };
        let wanted = path.trim().to_lowercase();
        self.radio_targets
            .iter()
            .find(|(text, _)| *text == wanted)
            .map(|(_, node)| *node)
    }

    fn resolve_fuzzy_target(&self, link: &Node) -> Option<&Node> {
        let NodeKind::Link { path, .. } = &link.kind else {
            return None;
        };
        if let Some(title) = path.strip_prefix('*') {
            let title = normalize_title(title);
            return self
                .headlines
                .iter()
                .find(|(text, _)| *text == title)
                .map(|(_, node)| *node);
        }
        if let Some(node) = self.names.get(path.as_str()) {
            return Some(*node);
        }
        let title = normalize_title(path);
        self.headlines
            .iter()
            .find(|(text, _)| *text == title)
            .map(|(_, node)| *node)
    }

    fn ordinal_of(&self, node: &Node) -> Option<Ordinal> {
        if let Some(number) = self.headline_numbers.get(&node.id()) {
            return Some(Ordinal::Dotted(number.clone()));
        }
        self.element_numbers
            .get(&node.id())
            .map(|n| Ordinal::Single(*n))
    }

    fn resolve_code_reference(
        &self,
        label: &str,
        description: Option<&str>,
    ) -> Option<(String, String)> {
        let code_ref = self.code_refs.get(label)?;
        let value = if code_ref.numbered {
            code_ref.line.to_string()
        } else {
            label.to_string()
        };
        let format = match description {
            Some(desc) => {
                let wrapped = format!("({})", label);
                if desc.contains(&wrapped) {
                    desc.replacen(&wrapped, "%s", 1)
                } else {
                    desc.replacen(label, "%s", 1)
                }
            }
            None => "%s".to_string(),
        };
        Some((format, value))
    }

    fn localize(&self, key: &str) -> String {
        if let Some(value) = self.translations.get(key) {
            return value.clone();
        }
        TRANSLATIONS
            .iter()
            .find(|(lang, k, _)| lang.eq_ignore_ascii_case(&self.language) && *k == key)
            .map(|(_, _, value)| value.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
