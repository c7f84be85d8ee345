//! Read-only navigation index over a prepared tree.

use std::collections::HashMap;

use super::{Node, NodeId, NodeKind};

#[derive(Debug, Clone, Copy)]
struct Entry<'a> {
    node: &'a Node,
    parent: Option<NodeId>,
    group: usize,
    position: usize,
}

/// Parent, sibling and footnote-definition lookups, built once per export.
///
/// Lookups are keyed by [`NodeId`] and checked against node identity, so a
/// node that does not belong to the indexed tree simply has no parent or
/// siblings.
#[derive(Debug, Default)]
pub struct TreeIndex<'a> {
    entries: Vec<Entry<'a>>,
    groups: Vec<Vec<NodeId>>,
    definitions: HashMap<&'a str, &'a Node>,
}

impl<'a> TreeIndex<'a> {
    /// Index a tree whose ids were assigned by the pre-pass.
    pub fn build(root: &'a Node) -> Self {
        let mut index = Self {
            groups: vec![Vec::new()],
            ..Self::default()
        };
        index.visit(root, None, 0, 0);
        index
    }

    fn visit(&mut self, node: &'a Node, parent: Option<NodeId>, group: usize, position: usize) {
        let id = NodeId(self.entries.len() as u32);
        self.entries.push(Entry {
            node,
            parent,
            group,
            position,
        });
        self.groups[group].push(id);

        match &node.kind {
            NodeKind::FootnoteDefinition { label } => {
                self.definitions.entry(label.as_str()).or_insert(node);
            }
            NodeKind::FootnoteReference { label: Some(label) } if !node.children.is_empty() => {
                self.definitions.entry(label.as_str()).or_insert(node);
            }
            _ => {}
        }

        for list in node.child_lists() {
            let group = self.groups.len();
            self.groups.push(Vec::with_capacity(list.len()));
            for (position, child) in list.iter().enumerate() {
                self.visit(child, Some(id), group, position);
            }
        }
    }

    fn entry(&self, node: &Node) -> Option<&Entry<'a>> {
        self.entries
            .get(node.id().index())
            .filter(|entry| std::ptr::eq(entry.node, node))
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node with the given id.
    pub fn get(&self, id: NodeId) -> Option<&'a Node> {
        self.entries.get(id.index()).map(|entry| entry.node)
    }

    /// Owning node.
    pub fn parent(&self, node: &Node) -> Option<&'a Node> {
        let parent = self.entry(node)?.parent?;
        self.get(parent)
    }

    /// Nearest block-level ancestor.
    pub fn parent_element(&self, node: &Node) -> Option<&'a Node> {
        let mut current = self.parent(node)?;
        while !current.kind.is_block() {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// Position of the node within its owning list.
    pub fn position(&self, node: &Node) -> Option<usize> {
        self.entry(node).map(|entry| entry.position)
    }

    /// Sibling immediately before the node in document order.
    pub fn previous_sibling(&self, node: &Node) -> Option<&'a Node> {
        let entry = self.entry(node)?;
        let previous = entry.position.checked_sub(1)?;
        self.get(self.groups[entry.group][previous])
    }

    /// Definition for a footnote label: a definition element, or the first
    /// labeled reference carrying an inline definition.
    pub fn footnote_definition(&self, label: &str) -> Option<&'a Node> {
        self.definitions.get(label).copied()
    }
}
