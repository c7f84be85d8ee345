//! Table layout.

use tracing::debug;

use crate::model::{Node, NodeKind, TableType};

use super::context::RenderContext;
use super::walker;

/// Render a table block.
///
/// Grid tables are handed to the host converter untouched.
pub fn table<'a>(node: &'a Node, contents: &str, ctx: &mut RenderContext<'a>) -> String {
    if let NodeKind::Table {
        table_type: TableType::TableEl,
        ..
    } = node.kind
    {
        return ctx.info.convert_grid_table(node);
    }

    let class = ctx
        .options
        .default_table_class
        .as_deref()
        .map(|class| format!("class={}", class))
        .unwrap_or_default();

    let caption = match ctx.info.caption_of(node) {
        Some(caption) => format!("|+ {}\n", walker::export_nodes(caption, ctx).trim()),
        None => String::new(),
    };

    let column_spec = column_spec(node, ctx);

    format!(
        "{{| {}\n{}\n{}\n{}\n|}}",
        class, caption, column_spec, contents
    )
}

/// Column description line, one entry per rendered column of the first data row.
///
/// This dialect carries neither alignment nor width per column, so every
/// entry is empty; the row is still walked so the special column is skipped
/// consistently with cell rendering.
fn column_spec(node: &Node, ctx: &RenderContext<'_>) -> String {
    let Some(row) = ctx.info.first_data_row(node) else {
        return String::new();
    };
    let skip = usize::from(ctx.info.has_special_column(node));
    let columns = row.children.iter().skip(skip).map(|_| "").collect::<Vec<_>>();
    debug!(columns = columns.len(), special = skip == 1, "table layout");
    columns.concat()
}

pub fn table_row(contents: &str) -> String {
    format!("|-\n{}", contents)
}

/// Render a cell; cells of a special marker column render empty.
pub fn table_cell<'a>(node: &'a Node, contents: &str, ctx: &mut RenderContext<'a>) -> String {
    if is_special_cell(node, ctx) {
        return String::new();
    }
    format!("|{}\n", contents)
}

fn is_special_cell(cell: &Node, ctx: &RenderContext<'_>) -> bool {
    if ctx.index.position(cell) != Some(0) {
        return false;
    }
    ctx.index
        .parent(cell)
        .and_then(|row| ctx.index.parent(row))
        .is_some_and(|table| ctx.info.has_special_column(table))
}
