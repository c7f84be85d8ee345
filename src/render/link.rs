//! Link resolution and markup.

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::model::{LinkType, Node, NodeKind};

use super::context::RenderContext;
use super::info::CrossReference;
use super::template::fill_template;
use super::walker;

/// Render a link node; `contents` is its rendered description.
pub fn link<'a>(node: &'a Node, contents: &str, ctx: &mut RenderContext<'a>) -> String {
    let NodeKind::Link { link_type, path } = &node.kind else {
        return String::new();
    };
    let description = Some(contents.trim()).filter(|desc| !desc.is_empty());

    match link_type {
        LinkType::CustomId | LinkType::Id => cross_reference(node, description, ctx),
        LinkType::Coderef => coderef(path, description, ctx),
        LinkType::Radio => radio(node, description, ctx),
        LinkType::Fuzzy => fuzzy(node, description, ctx),
        _ if is_image(link_type, path, description, ctx) => image(node, link_type, path, ctx),
        _ => external(link_type, path, description, ctx),
    }
}

fn cross_reference(node: &Node, description: Option<&str>, ctx: &RenderContext<'_>) -> String {
    let info = ctx.info;
    match info.resolve_cross_reference(node) {
        Some(CrossReference::External(file)) => {
            let path = rewrite_extension(&file, &ctx.options.output_extension);
            match description {
                Some(desc) => format!("[{}]({})", desc, path),
                None => format!("<{}>", path),
            }
        }
        Some(CrossReference::Internal(target)) => match info.ordinal_of(target) {
            Some(ordinal) => {
                let number = ordinal.to_string();
                let reference = fill_template(&info.localize("See section %s"), &[number.as_str()]);
                match description {
                    Some(desc) => format!("{} ({})", desc, reference),
                    None => format!("({})", reference),
                }
            }
            None => description.unwrap_or_default().to_string(),
        },
        None => {
            debug!(link = ?node.kind, "unresolved cross reference");
            description.unwrap_or_default().to_string()
        }
    }
}

fn coderef(label: &str, description: Option<&str>, ctx: &RenderContext<'_>) -> String {
    match ctx.info.resolve_code_reference(label, description) {
        Some((format, value)) => fill_template(&format, &[value.as_str()]),
        None => {
            debug!(label, "unresolved code reference");
            description.unwrap_or_default().to_string()
        }
    }
}

fn radio<'a>(node: &'a Node, description: Option<&str>, ctx: &mut RenderContext<'a>) -> String {
    let info = ctx.info;
    match info.resolve_radio_target(node) {
        Some(target) => walker::export_nodes(&target.children, ctx),
        None => {
            debug!(link = ?node.kind, "unresolved radio target");
            description.unwrap_or_default().to_string()
        }
    }
}

fn fuzzy(node: &Node, description: Option<&str>, ctx: &RenderContext<'_>) -> String {
    if let Some(desc) = description {
        return desc.to_string();
    }
    let info = ctx.info;
    match info
        .resolve_fuzzy_target(node)
        .and_then(|target| info.ordinal_of(target))
    {
        Some(ordinal) => ordinal.to_string(),
        None => {
            debug!(link = ?node.kind, "unresolved fuzzy link");
            String::new()
        }
    }
}

fn is_image(
    link_type: &LinkType,
    path: &str,
    description: Option<&str>,
    ctx: &RenderContext<'_>,
) -> bool {
    match link_type {
        LinkType::Image => true,
        LinkType::File | LinkType::Http | LinkType::Https | LinkType::Ftp => {
            description.is_none()
                && ctx
                    .info
                    .is_inline_image(path, &ctx.options.inline_image_extensions)
        }
        _ => false,
    }
}

/// Render an inline image, captioned by its enclosing element.
fn image<'a>(
    node: &'a Node,
    link_type: &LinkType,
    path: &str,
    ctx: &mut RenderContext<'a>,
) -> String {
    let source = if link_type.is_url() {
        format!("{}:{}", link_type.as_str(), path)
    } else if is_absolute(path) {
        normalize_path(path)
    } else {
        path.to_string()
    };

    let info = ctx.info;
    let caption = match ctx
        .index
        .parent_element(node)
        .and_then(|element| info.caption_of(element))
    {
        Some(caption) => walker::export_nodes(caption, ctx).trim().to_string(),
        None => String::new(),
    };

    format!("![{}]({})", caption, source)
}

fn external(
    link_type: &LinkType,
    path: &str,
    description: Option<&str>,
    ctx: &RenderContext<'_>,
) -> String {
    let target = if *link_type == LinkType::File {
        let path = rewrite_extension(path, &ctx.options.output_extension);
        if is_absolute(&path) {
            format!("file://{}", normalize_path(&path))
        } else {
            path
        }
    } else {
        path.to_string()
    };

    match description {
        Some(desc) => format!("[{} {}]", target, desc),
        None if link_type.is_url() => format!("{}:{}", link_type.as_str(), target),
        None => target,
    }
}

/// Replace a trailing `.org` with the output extension.
fn rewrite_extension(path: &str, extension: &str) -> String {
    let split = path.len().saturating_sub(4);
    match path.get(split..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(".org") => {
            format!("{}.{}", &path[..split], extension)
        }
        _ => path.to_string(),
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || Path::new(path).is_absolute()
}

/// Resolve `.` and `..` components without touching the file system.
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last(), Some(Component::Normal(_))) {
                    parts.pop();
                }
            }
            other => parts.push(other),
        }
    }
    parts
        .iter()
        .collect::<PathBuf>()
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::render::{prepare, render_body, DocumentInfo, RenderOptions};

    fn render_tree(mut tree: Node) -> String {
        let options = RenderOptions::default();
        let prepared = prepare(&mut tree);
        let info = DocumentInfo::new(prepared, &options);
        render_body(prepared, &options, &info)
    }

    fn render_link(link: Node) -> String {
        render_tree(Node::document(vec![Node::paragraph(vec![link])]))
    }

    fn setup_headline() -> Node {
        let mut headline = Node::headline(1, "Setup", vec![]);
        if let NodeKind::Headline { custom_id, .. } = &mut headline.kind {
            *custom_id = Some("setup".to_string());
        }
        headline
    }

    #[test]
    fn test_url_links() {
        assert_eq!(
            render_link(Node::link("http", "example.com", None)),
            "http:example.com\n\n"
        );
        assert_eq!(
            render_link(Node::link("http", "example.com", Some("X"))),
            "[example.com X]\n\n"
        );
        assert_eq!(
            render_link(Node::link("mailto", "me@example.com", None)),
            "mailto:me@example.com\n\n"
        );
        assert_eq!(
            render_link(Node::link("mailto", "me@example.com", Some("Mail me"))),
            "[me@example.com Mail me]\n\n"
        );
        assert_eq!(
            render_link(Node::link("ftp", "//ftp.example.com/pub/", Some("Mirror"))),
            "[//ftp.example.com/pub/ Mirror]\n\n"
        );
    }

    #[test]
    fn test_file_links() {
        assert_eq!(
            render_link(Node::link("file", "notes/todo.ORG", None)),
            "notes/todo.wiki\n\n"
        );
        assert_eq!(
            render_link(Node::link("file", "/home/me/./a/../notes.org", None)),
            "file:///home/me/notes.wiki\n\n"
        );
        assert_eq!(
            render_link(Node::link("file", "report.pdf", None)),
            "report.pdf\n\n"
        );
        assert_eq!(
            render_link(Node::link("file", "/home/me/notes.org", Some("Notes"))),
            "[file:///home/me/notes.wiki Notes]\n\n"
        );
        assert_eq!(
            render_link(Node::link("file", "notes/todo.org", Some("Todo"))),
            "[notes/todo.wiki Todo]\n\n"
        );
    }

    #[test]
    fn test_internal_cross_reference() {
        let md = render_tree(Node::document(vec![
            setup_headline(),
            Node::paragraph(vec![Node::link("custom-id", "setup", Some("the setup"))]),
        ]));
        assert_eq!(md, "= Setup =\n\nthe setup (See section 1)\n\n");

        let md = render_tree(Node::document(vec![
            setup_headline(),
            Node::paragraph(vec![Node::link("custom-id", "setup", None)]),
        ]));
        assert!(md.ends_with("(See section 1)\n\n"), "got: {}", md);
    }

    #[test]
    fn test_localized_cross_reference() {
        let mut tree = Node::document(vec![
            setup_headline(),
            Node::paragraph(vec![Node::link("custom-id", "setup", None)]),
        ]);
        let options = RenderOptions::default().with_language("fr");
        let prepared = prepare(&mut tree);
        let info = DocumentInfo::new(prepared, &options);
        let md = render_body(prepared, &options, &info);
        assert!(md.ends_with("(cf. section 1)\n\n"), "got: {}", md);
    }

    #[test]
    fn test_external_cross_reference() {
        let mut tree = Node::document(vec![Node::paragraph(vec![
            Node::link("id", "abc", None).with_post_blank(1),
            Node::link("id", "abc", Some("Other")),
        ])]);
        let options = RenderOptions::default();
        let prepared = prepare(&mut tree);
        let info = DocumentInfo::new(prepared, &options).with_external_ids(HashMap::from([(
            "abc".to_string(),
            "notes/Other.org".to_string(),
        )]));
        let md = render_body(prepared, &options, &info);
        assert_eq!(md, "<notes/Other.wiki> [Other](notes/Other.wiki)\n\n");
    }

    #[test]
    fn test_unresolved_links_degrade_to_description() {
        assert_eq!(
            render_link(Node::link("id", "missing", Some("fallback"))),
            "fallback\n\n"
        );
        assert_eq!(render_link(Node::link("id", "missing", None)), "");
        assert_eq!(render_link(Node::link("coderef", "nope", None)), "");
        assert_eq!(render_link(Node::link("radio", "nothing", None)), "");
    }

    #[test]
    fn test_inline_images() {
        let md = render_tree(Node::document(vec![Node::paragraph(vec![Node::link(
            "file",
            "img/diagram.png",
            None,
        )])
        .with_caption("Architecture")]));
        assert_eq!(md, "![Architecture](img/diagram.png)\n\n");

        assert_eq!(
            render_link(Node::link("file", "/srv/img/../pics/a.jpg", None)),
            "![](/srv/pics/a.jpg)\n\n"
        );
        assert_eq!(
            render_link(Node::link("https", "//example.com/a.svg", None)),
            "![](https://example.com/a.svg)\n\n"
        );
        assert_eq!(
            render_link(Node::link("ftp", "//ftp.example.com/a.png", None)),
            "![](ftp://ftp.example.com/a.png)\n\n"
        );
        // described links to images stay links
        assert_eq!(
            render_link(Node::link("https", "//example.com/a.svg", Some("logo"))),
            "[//example.com/a.svg logo]\n\n"
        );
    }

    #[test]
    fn test_fuzzy_links() {
        let md = render_tree(Node::document(vec![
            Node::headline(1, "Intro", vec![]),
            Node::headline(1, "Usage", vec![]),
            Node::paragraph(vec![Node::link("fuzzy", "Usage", None)]),
        ]));
        assert!(md.ends_with("2\n\n"), "got: {}", md);

        assert_eq!(
            render_link(Node::link("fuzzy", "Usage", Some("see usage"))),
            "see usage\n\n"
        );
        assert_eq!(render_link(Node::link("fuzzy", "Nowhere", None)), "");
    }

    #[test]
    fn test_coderef_link() {
        let md = render_tree(Node::document(vec![
            Node::new(NodeKind::SrcBlock {
                language: None,
                value: "setup();\nrun(); (ref:run)\n".to_string(),
                number_lines: true,
            }),
            Node::paragraph(vec![Node::link("coderef", "run", Some("line (run)"))]),
        ]));
        assert!(md.ends_with("line 2\n\n"), "got: {}", md);

        let md = render_tree(Node::document(vec![
            Node::new(NodeKind::SrcBlock {
                language: None,
                value: "setup();\nrun(); (ref:run)\n".to_string(),
                number_lines: true,
            }),
            Node::paragraph(vec![Node::link("coderef", "run", Some("line run"))]),
        ]));
        assert!(md.ends_with("line 2\n\n"), "got: {}", md);
    }

    #[test]
    fn test_radio_link_renders_target() {
        let md = render_tree(Node::document(vec![
            Node::paragraph(vec![Node::with_children(
                NodeKind::RadioTarget,
                vec![Node::with_children(NodeKind::Bold, vec![Node::text("Rust")])],
            )]),
            Node::paragraph(vec![Node::link("radio", "rust", Some("rust"))]),
        ]));
        assert_eq!(md, "'''Rust'''\n\n'''Rust'''\n\n");
    }

    #[test]
    fn test_rewrite_extension() {
        assert_eq!(rewrite_extension("a/b.org", "wiki"), "a/b.wiki");
        assert_eq!(rewrite_extension("a/b.Org", "txt"), "a/b.txt");
        assert_eq!(rewrite_extension("a/borg", "wiki"), "a/borg");
        assert_eq!(rewrite_extension("org", "wiki"), "org");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/a/./b/../c"), "/a/c");
        assert_eq!(normalize_path("/../a"), "/a");
    }
}
