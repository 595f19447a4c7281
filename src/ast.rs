//! The document tree produced by the parser.
//!
//! [`Block`] is generic over its inline carrier: the block pass produces
//! blocks whose inline runs are still raw text, the inline pass maps them to
//! `Block<Vec<Inline>>`. [`Document`] is the fully parsed result.

use serde::Serialize;

/// ATX heading level, `#` through `######`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
}

impl HeadingLevel {
    /// Maps a `#` run length to a level.
    pub fn from_hashes(count: usize) -> Option<Self> {
        match count {
            1 => Some(Self::H1),
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            5 => Some(Self::H5),
            6 => Some(Self::H6),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            Self::H1 => 1,
            Self::H2 => 2,
            Self::H3 => 3,
            Self::H4 => 4,
            Self::H5 => 5,
            Self::H6 => 6,
        }
    }
}

/// A block-level element, generic over the inline carrier `T`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Block<T> {
    /// `***`, `---` or `___` on a line of its own.
    ThematicBreak,
    /// An ATX heading.
    Heading { level: HeadingLevel, content: T },
    /// A fenced or indented code block. `info` is the fence info string,
    /// `body` the verbatim contents, LF-terminated.
    CodeBlock { info: Option<String>, body: String },
    /// A paragraph inside a tight list, rendered without wrappers downstream.
    Naked(T),
    Paragraph(T),
    Blockquote(Vec<Block<T>>),
    /// `start` is the index of the first item; each item is a block sequence.
    OrderedList { start: u32, items: Vec<Vec<Block<T>>> },
    UnorderedList { items: Vec<Vec<Block<T>>> },
}

/// An inline element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Inline {
    Plain(String),
    /// A hard line break (`\` before the end of line).
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Strikeout(Vec<Inline>),
    Subscript(Vec<Inline>),
    Superscript(Vec<Inline>),
    CodeSpan(String),
    Link {
        inner: Vec<Inline>,
        uri: String,
        title: Option<String>,
    },
    Image {
        alt: Vec<Inline>,
        uri: String,
        title: Option<String>,
    },
}

/// Flattens inlines to their plain-text rendering.
///
/// Used to turn the inner inlines of a collapsed or shortcut reference link
/// into a lookup label; frames and links flatten to their contents, line
/// breaks to a single space.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut out = String::new();
    collect_plain_text(inlines, &mut out);
    out
}

fn collect_plain_text(inlines: &[Inline], out: &mut String) {
    for inline in inlines {
        match inline {
            Inline::Plain(text) | Inline::CodeSpan(text) => out.push_str(text),
            Inline::LineBreak => out.push(' '),
            Inline::Emphasis(xs)
            | Inline::Strong(xs)
            | Inline::Strikeout(xs)
            | Inline::Subscript(xs)
            | Inline::Superscript(xs)
            | Inline::Link { inner: xs, .. }
            | Inline::Image { alt: xs, .. } => collect_plain_text(xs, out),
        }
    }
}

/// A fully parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    /// Decoded YAML front matter, if the document had any.
    pub yaml: Option<serde_json::Value>,
    pub blocks: Vec<Block<Vec<Inline>>>,
}
