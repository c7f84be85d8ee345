//! End-to-end export of JSON document trees.
//!
//! Run with: cargo test --test render_document

use std::fs;

use wikidown::model::Node;
use wikidown::render::{prepare, render_body, DocumentInfo};
use wikidown::{convert_file, load_tree, parse_tree, to_wiki, Error, HeadlineStyle, RenderOptions};

const SAMPLE_TREE: &str = r#"{
  "type": "document",
  "children": [
    {
      "type": "headline",
      "level": 1,
      "todo": "TODO",
      "tags": ["draft"],
      "custom_id": "intro",
      "title": [{"type": "plain_text", "value": "Introduction"}],
      "children": [
        {
          "type": "paragraph",
          "children": [
            {"type": "plain_text", "value": "Uses "},
            {"type": "bold", "post_blank": 1, "children": [{"type": "plain_text", "value": "wiki"}]},
            {"type": "plain_text", "value": "markup"},
            {"type": "footnote_reference", "label": "1"},
            {"type": "footnote_reference", "label": "2"}
          ]
        },
        {
          "type": "plain_list",
          "list_type": "unordered",
          "children": [
            {
              "type": "list_item",
              "checkbox": "on",
              "children": [
                {"type": "paragraph", "children": [{"type": "plain_text", "value": "Done"}]}
              ]
            }
          ]
        }
      ]
    },
    {
      "type": "headline",
      "level": 1,
      "title": [{"type": "plain_text", "value": "Usage"}],
      "children": [
        {
          "type": "table",
          "children": [
            {"type": "table_row", "children": [
              {"type": "table_cell", "children": [{"type": "plain_text", "value": "a"}]},
              {"type": "table_cell", "children": [{"type": "plain_text", "value": "b"}]}
            ]},
            {"type": "table_row", "row_type": "rule"},
            {"type": "table_row", "children": [
              {"type": "table_cell", "children": [{"type": "plain_text", "value": "1"}]},
              {"type": "table_cell", "children": [{"type": "plain_text", "value": "2"}]}
            ]}
          ]
        },
        {
          "type": "paragraph",
          "children": [
            {"type": "link", "link_type": "custom-id", "path": "intro",
             "children": [{"type": "plain_text", "value": "Back"}]},
            {"type": "plain_text", "value": " or "},
            {"type": "link", "link_type": "http", "path": "example.com"}
          ]
        }
      ]
    },
    {"type": "footnote_definition", "label": "1", "children": [
      {"type": "paragraph", "children": [{"type": "plain_text", "value": "First note."}]}
    ]},
    {"type": "footnote_definition", "label": "2", "children": [
      {"type": "paragraph", "children": [{"type": "plain_text", "value": "Second note."}]}
    ]},
    {"type": "drawer", "children": [{"type": "plain_text", "value": "hidden"}]}
  ]
}"#;

const EXPECTED_WIKI: &str = "= TODO Introduction     :draft: =\n\
Uses '''wiki''' markup<sup>1</sup><sup>, </sup><sup>2</sup>\n\
\n\
* ☑ Done\n\
\n\
= Usage =\n\
{| \n\
\n\
\n\
|-\n\
|a\n\
|b\n\
|-\n\
|-\n\
|1\n\
|2\n\
\n\
|}\n\
\n\
Back (See section 1) or http:example.com\n\
\n\
== Footnotes ==\n\
\n\
[1] First note.\n\
\n\
[2] Second note.\n";

fn no_class() -> RenderOptions {
    RenderOptions::default().with_table_class(None::<String>)
}

#[test]
fn test_full_export() {
    let mut tree = parse_tree(SAMPLE_TREE).unwrap();
    assert_eq!(to_wiki(&mut tree, &no_class()), EXPECTED_WIKI);
}

#[test]
fn test_export_is_deterministic() {
    let mut tree = parse_tree(SAMPLE_TREE).unwrap();
    let options = no_class();
    let first = to_wiki(&mut tree, &options);
    let second = to_wiki(&mut tree, &options);
    assert_eq!(first, second);
}

#[test]
fn test_body_only_export() {
    let mut tree = parse_tree(SAMPLE_TREE).unwrap();
    let options = no_class();
    let prepared = prepare(&mut tree);
    let info = DocumentInfo::new(prepared, &options);
    let body = render_body(prepared, &options, &info);

    assert!(!body.contains("Footnotes"));
    assert!(body.ends_with("http:example.com\n\n"));
}

#[test]
fn test_setext_export() {
    let mut tree = parse_tree(SAMPLE_TREE).unwrap();
    let options = no_class().with_headline_style(HeadlineStyle::Setext);
    let wiki = to_wiki(&mut tree, &options);

    assert!(wiki.starts_with(
        "TODO Introduction     :draft:\n=================\n\n"
    ));
    assert!(wiki.contains("Usage\n=====\n\n"));
}

#[test]
fn test_options_file() {
    let dir = tempfile::tempdir().unwrap();
    let tree_path = dir.path().join("doc.tree.json");
    let options_path = dir.path().join("wikidown.json");
    fs::write(&tree_path, SAMPLE_TREE).unwrap();
    fs::write(
        &options_path,
        r#"{"with-todo-keywords": false, "with-tags": false, "default-table-class": "sortable"}"#,
    )
    .unwrap();

    let options = RenderOptions::from_file(&options_path).unwrap();
    let wiki = convert_file(&tree_path, &options).unwrap();

    assert!(wiki.starts_with("= Introduction =\n"));
    assert!(wiki.contains("{| class=sortable\n"));
}

#[test]
fn test_load_tree_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");

    let tree = Node::document(vec![Node::paragraph(vec![Node::text("saved")])]);
    fs::write(&path, serde_json::to_string_pretty(&tree).unwrap()).unwrap();

    let loaded = load_tree(&path).unwrap();
    assert_eq!(loaded, tree);
}

#[test]
fn test_invalid_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"type\": \"document\", \"children\": [").unwrap();

    assert!(matches!(load_tree(&path), Err(Error::Json(_))));
    assert!(matches!(
        parse_tree(r#"{"type": "spreadsheet"}"#),
        Err(Error::InvalidTree(_))
    ));
    assert!(matches!(
        RenderOptions::from_json(r#"{"with-tags": "yes"}"#),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_escaping_in_export() {
    let mut tree = parse_tree(
        r##"{"type": "document", "children": [
            {"type": "paragraph", "children": [
                {"type": "plain_text", "value": "#1 is *not* bold\n#2 neither"}
            ]}
        ]}"##,
    )
    .unwrap();
    let wiki = to_wiki(&mut tree, &RenderOptions::default());
    assert_eq!(wiki, "\\#1 is \\*not\\* bold\n\\#2 neither\n\n");
}
