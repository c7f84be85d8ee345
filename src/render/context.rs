//! Per-export rendering state.

use crate::model::TreeIndex;

use super::footnote::FootnoteRegistry;
use super::info::ExportInfo;
use super::options::RenderOptions;
use super::walker::PreparedTree;

/// State threaded through every formatter during one export.
///
/// A context is owned by exactly one export; concurrent exports each build
/// their own, so the footnote registry is never shared.
pub struct RenderContext<'a> {
    /// Export options
    pub options: &'a RenderOptions,
    /// Host queries
    pub info: &'a dyn ExportInfo,
    /// Parent/sibling navigation
    pub index: TreeIndex<'a>,
    /// Footnote numbering for this export
    pub footnotes: FootnoteRegistry<'a>,
}

impl<'a> RenderContext<'a> {
    /// Create a fresh context for one export of `tree`.
    pub fn new(tree: PreparedTree<'a>, options: &'a RenderOptions, info: &'a dyn ExportInfo) -> Self {
        Self {
            options,
            info,
            index: TreeIndex::build(tree.root()),
            footnotes: FootnoteRegistry::default(),
        }
    }
}
