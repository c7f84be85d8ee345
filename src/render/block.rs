//! Block-level formatters: headlines, paragraphs, list items, blocks.

use unicode_width::UnicodeWidthStr;

use crate::model::{Checkbox, ListType, Node, NodeKind};

use super::context::RenderContext;
use super::info::coderef_label;
use super::options::HeadlineStyle;
use super::walker;

/// Width of literal block indentation.
const LITERAL_INDENT: &str = "    ";

/// Render a headline and its section contents.
pub fn headline<'a>(node: &'a Node, contents: &str, ctx: &mut RenderContext<'a>) -> String {
    let NodeKind::Headline {
        level,
        todo,
        priority,
        tags,
        title,
        footnote_section,
        ..
    } = &node.kind
    else {
        return String::new();
    };
    if *footnote_section {
        return String::new();
    }

    let options = ctx.options;
    let mut heading = String::new();
    if options.with_todo_keywords {
        if let Some(todo) = todo {
            heading.push_str(todo);
            heading.push(' ');
        }
    }
    if options.with_priority {
        if let Some(priority) = priority {
            heading.push_str(&format!("[#{}] ", priority));
        }
    }
    heading.push_str(walker::export_nodes(title, ctx).trim_end());

    let tags = if options.with_tags && !tags.is_empty() {
        format!("     :{}:", tags.join(":"))
    } else {
        String::new()
    };

    match options.headline_style {
        HeadlineStyle::Setext => {
            let rule = if *level <= 1 { "=" } else { "-" };
            format!(
                "{}{}\n{}\n\n{}",
                heading,
                tags,
                rule.repeat(heading.width()),
                contents
            )
        }
        HeadlineStyle::Atx => {
            let marks = "=".repeat(usize::from((*level).max(1)));
            format!("{} {}{} {}\n{}", marks, heading, tags, marks, contents)
        }
    }
}

/// Render a paragraph, escaping a paragraph-initial `#`.
pub fn paragraph(node: &Node, contents: &str) -> String {
    let starts_with_hash = matches!(
        node.children.first().map(|child| &child.kind),
        Some(NodeKind::PlainText { value }) if value.starts_with('#')
    );
    match contents.strip_prefix('#') {
        Some(rest) if starts_with_hash => format!("\\#{}", rest),
        _ => contents.to_string(),
    }
}

/// Render a list item, one bulleted line per non-blank line of its text.
///
/// Lines of nested lists keep their own bullets and only gain the parent's.
pub fn item<'a>(node: &'a Node, ctx: &mut RenderContext<'a>) -> String {
    let NodeKind::ListItem { checkbox, tag } = &node.kind else {
        return String::new();
    };

    let list_type = match ctx.index.parent(node).map(|parent| &parent.kind) {
        Some(NodeKind::PlainList { list_type }) => *list_type,
        _ => ListType::Unordered,
    };
    let bullet = match list_type {
        ListType::Ordered => '#',
        ListType::Unordered | ListType::Descriptive => '*',
    };

    let mut prefix = String::from(match checkbox {
        Checkbox::On => "☑ ",
        Checkbox::Trans => "<code>[-]</code> ",
        Checkbox::Off => "☐ ",
        Checkbox::None => "",
    });
    if let Some(tag) = tag {
        prefix.push_str(&format!("**{}:** ", walker::export_nodes(tag, ctx).trim()));
    }
    let mut prefix = Some(prefix).filter(|prefix| !prefix.is_empty());

    let mut output = String::new();
    for child in &node.children {
        let rendered = walker::export_data(child, ctx);
        let nested = matches!(child.kind, NodeKind::PlainList { .. });
        if nested {
            if let Some(prefix) = prefix.take() {
                push_line(&mut output, bullet, prefix.trim_end());
            }
        }
        for line in rendered.lines().filter(|line| !line.trim().is_empty()) {
            if nested {
                output.push(bullet);
                output.push_str(line.trim_end());
                output.push('\n');
            } else {
                match prefix.take() {
                    Some(prefix) => {
                        push_line(&mut output, bullet, &format!("{}{}", prefix, line.trim()))
                    }
                    None => push_line(&mut output, bullet, line.trim_end()),
                }
            }
        }
    }
    if let Some(prefix) = prefix {
        push_line(&mut output, bullet, prefix.trim_end());
    }
    output
}

fn push_line(output: &mut String, bullet: char, line: &str) {
    output.push(bullet);
    output.push(' ');
    output.push_str(line);
    output.push('\n');
}

pub fn quote_block(contents: &str) -> String {
    format!(
        "<blockquote>\n{}\n</blockquote>",
        contents.trim_end_matches('\n')
    )
}

/// Render a literal block indented by four spaces.
pub fn example_block(value: &str) -> String {
    let value = strip_coderefs(value);
    let mut output = String::with_capacity(value.len() + 16);
    for line in remove_indentation(&value).lines() {
        if !line.trim().is_empty() {
            output.push_str(LITERAL_INDENT);
            output.push_str(line);
        }
        output.push('\n');
    }
    output
}

fn strip_coderefs(value: &str) -> String {
    value
        .lines()
        .map(|line| match coderef_label(line) {
            Some(label) => {
                let marker = format!("(ref:{})", label);
                line.trim_end()
                    .strip_suffix(&marker)
                    .unwrap_or(line)
                    .trim_end()
                    .to_string()
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove the indentation shared by all non-blank lines.
fn remove_indentation(value: &str) -> String {
    let common = value
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    value
        .lines()
        .map(|line| line.get(common..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}
