//! End-to-end parsing scenarios over the public API.

use mmark::{Block, Document, ErrorKind, HeadingLevel, Inline, parse};

fn parsed(input: &str) -> Document {
    match parse("test.md", input) {
        Ok(doc) => doc,
        Err(errs) => panic!("expected success for {input:?}, got {errs:#?}"),
    }
}

fn plain(text: &str) -> Inline {
    Inline::Plain(text.to_string())
}

#[test]
fn test_empty_document_is_valid() {
    let doc = parsed("");
    assert!(doc.yaml.is_none());
    assert!(doc.blocks.is_empty());
}

#[test]
fn test_front_matter_and_paragraph() {
    let doc = parsed("---\nfoo: 1\n---\nhi");
    assert_eq!(doc.yaml, Some(serde_json::json!({ "foo": 1 })));
    similar_asserts::assert_eq!(doc.blocks, vec![Block::Paragraph(vec![plain("hi")])]);
}

#[test]
fn test_heading_with_closing_sequence() {
    let doc = parsed("# Heading #");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::Heading {
            level: HeadingLevel::H1,
            content: vec![plain("Heading")],
        }]
    );
}

#[test]
fn test_fenced_code_block() {
    let doc = parsed("```ruby\nputs 1\n```\n");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::CodeBlock {
            info: Some("ruby".to_string()),
            body: "puts 1\n".to_string(),
        }]
    );
}

#[test]
fn test_indented_code_block() {
    let doc = parsed("    fn main() {}\n");
    assert_eq!(
        doc.blocks,
        vec![Block::CodeBlock {
            info: None,
            body: "fn main() {}\n".to_string(),
        }]
    );
}

#[test]
fn test_tight_list_uses_naked_paragraphs() {
    let doc = parsed("* a\n* b\n");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::UnorderedList {
            items: vec![
                vec![Block::Naked(vec![plain("a")])],
                vec![Block::Naked(vec![plain("b")])],
            ],
        }]
    );
}

#[test]
fn test_loose_list_uses_paragraphs() {
    let doc = parsed("* a\n\n* b\n");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::UnorderedList {
            items: vec![
                vec![Block::Paragraph(vec![plain("a")])],
                vec![Block::Paragraph(vec![plain("b")])],
            ],
        }]
    );
}

#[test]
fn test_shortcut_reference_link() {
    let doc = parsed("[x]: http://e\n\n[x]");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![Inline::Link {
            inner: vec![plain("x")],
            uri: "http://e".to_string(),
            title: None,
        }])]
    );
}

#[test]
fn test_reference_forms_resolve_identically() {
    let doc = parsed("[l]: /u '题 title'\n\nsee [l] and [l][] and [text][l]");
    let links: Vec<(&str, Option<&str>)> = match &doc.blocks[..] {
        [Block::Paragraph(inlines)] => inlines
            .iter()
            .filter_map(|inline| match inline {
                Inline::Link { uri, title, .. } => {
                    Some((uri.as_str(), title.as_deref()))
                }
                _ => None,
            })
            .collect(),
        other => panic!("expected one paragraph, got {other:?}"),
    };
    assert_eq!(links.len(), 3);
    assert!(links.iter().all(|l| *l == ("/u", Some("题 title"))));
}

#[test]
fn test_nested_emphasis_in_strong() {
    let doc = parsed("**bold *and* italic**");
    similar_asserts::assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![Inline::Strong(vec![
            plain("bold "),
            Inline::Emphasis(vec![plain("and")]),
            plain(" italic"),
        ])])]
    );
}

#[test]
fn test_missing_reference_is_an_error() {
    let errs = parse("test.md", "[oops]").unwrap_err();
    assert_eq!(errs.len(), 1);
    match &errs[0].kind {
        ErrorKind::CouldNotFindReferenceDefinition { label, candidates } => {
            assert_eq!(label, "oops");
            assert!(candidates.is_empty());
        }
        other => panic!("expected reference error, got {other:?}"),
    }
}

#[test]
fn test_blockquote_with_list() {
    let doc = parsed("> - a\n  - b\n");
    match &doc.blocks[..] {
        [Block::Blockquote(inner)] => match &inner[..] {
            [Block::UnorderedList { items }] => assert_eq!(items.len(), 2),
            other => panic!("expected a list in the quote, got {other:?}"),
        },
        other => panic!("expected blockquote, got {other:?}"),
    }
}

#[test]
fn test_ordered_list() {
    let doc = parsed("1. one\n2. two\n");
    match &doc.blocks[..] {
        [Block::OrderedList { start, items }] => {
            assert_eq!(*start, 1);
            assert_eq!(items.len(), 2);
        }
        other => panic!("expected ordered list, got {other:?}"),
    }
}

#[test]
fn test_crlf_input_is_normalised() {
    let doc = parsed("# Title\r\n\r\nbody\r\n");
    assert_eq!(doc.blocks.len(), 2);
    assert_eq!(
        doc.blocks[1],
        Block::Paragraph(vec![plain("body")])
    );
}

#[test]
fn test_hard_break_in_paragraph() {
    let doc = parsed("one\\\ntwo\n");
    assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![
            plain("one"),
            Inline::LineBreak,
            plain("two"),
        ])]
    );
}

#[test]
fn test_entities_decode_in_text() {
    let doc = parsed("Tom &amp; Jerry &#33;\n");
    assert_eq!(
        doc.blocks,
        vec![Block::Paragraph(vec![plain("Tom & Jerry !")])]
    );
}

#[test]
fn test_mixed_document() {
    let doc = parsed(
        "---\ntitle: Mixed\n---\n\
         # Top\n\n\
         Intro with ~~strike~~ and ^sup^.\n\n\
         > quoted\n\n\
         - item one\n- item two\n\n\
         ```rust\nlet x = 1;\n```\n\n\
         ---\n",
    );
    assert_eq!(doc.yaml, Some(serde_json::json!({ "title": "Mixed" })));
    assert_eq!(doc.blocks.len(), 6);
    assert!(matches!(doc.blocks[0], Block::Heading { .. }));
    assert!(matches!(doc.blocks[1], Block::Paragraph(_)));
    assert!(matches!(doc.blocks[2], Block::Blockquote(_)));
    assert!(matches!(doc.blocks[3], Block::UnorderedList { .. }));
    assert!(matches!(doc.blocks[4], Block::CodeBlock { .. }));
    assert!(matches!(doc.blocks[5], Block::ThematicBreak));
}

#[test]
fn test_termination_on_awkward_inputs() {
    // every input must settle to Ok or a non-empty Err, never panic
    let inputs = [
        "",
        "\n\n\n",
        "****",
        "[",
        "]",
        "![",
        "> > >",
        "- - -",
        "-",
        "1.",
        "`",
        "\\",
        "&",
        "&#xFFFFFFFFFF;",
        "# \n#\n",
        "--- \n",
        "~~~\n",
        "    \t mixed \t indents\n\tmore",
        "* \n* \n\n* ",
        "[a]: \n",
        "<not an autolink",
        "***a**",
        "a_b_c",
        "~x~~y~~",
    ];
    for input in inputs {
        match parse("fuzz.md", input) {
            Ok(_) => {}
            Err(errs) => assert!(!errs.is_empty(), "empty error list for {input:?}"),
        }
    }
}

#[test]
fn test_deep_blockquote_nesting_terminates() {
    let mut input = String::new();
    for _ in 0..64 {
        input.push_str("> ");
    }
    input.push_str("deep\n");
    let doc = parsed(&input);
    let mut block = &doc.blocks[0];
    let mut depth = 0;
    while let Block::Blockquote(inner) = block {
        depth += 1;
        block = &inner[0];
    }
    assert_eq!(depth, 64);
    assert_eq!(block, &Block::Paragraph(vec![plain("deep")]));
}
