//! Parser module: the block pass, the inline pass, and the driver that
//! composes them.
//!
//! The block pass builds a skeleton whose inline runs stay unparsed while it
//! gathers reference definitions; the inline pass then reparses every run
//! with the full table in hand. Diagnostics from both passes are collated
//! into one list sorted by source position, and a single failure anywhere
//! makes the overall result `Err`; the caller never sees a partially
//! parsed document.

use crate::ast::{Block, Document, Inline};
use crate::diagnostics::{Diagnostic, SourcePos};

pub(crate) mod block_parser;
pub(crate) mod cursor;
pub(crate) mod inline_parser;
pub(crate) mod scanners;

use block_parser::{BlockParser, ReferenceRegistry};
use inline_parser::InlineParser;

/// An inline run deferred for the second pass: either the anchored raw text,
/// or an error produced while the block was built that must surface when the
/// block is inlined.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Isp {
    Span(SourcePos, String),
    Error(Diagnostic),
}

/// Parses a document. Returns the fully inlined [`Document`], or every
/// diagnostic collected across both passes (never empty), sorted by
/// position.
///
/// `filename` is only used to report positions; it may be empty.
pub fn parse(filename: &str, input: &str) -> Result<Document, Vec<Diagnostic>> {
    #[cfg(debug_assertions)]
    crate::init_logger();

    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let skeleton = match BlockParser::new(filename, &normalized).parse() {
        Ok(skeleton) => skeleton,
        Err(errs) => return Err(sorted(errs)),
    };
    log::debug!(
        "block pass done: {} block(s), {} registered diagnostic(s)",
        skeleton.blocks.len(),
        skeleton.registered.len()
    );

    let mut errs = skeleton.registered;
    let blocks: Vec<Block<Vec<Inline>>> = skeleton
        .blocks
        .into_iter()
        .map(|block| inline_block(block, filename, &skeleton.defs, &mut errs))
        .collect();

    if errs.is_empty() {
        Ok(Document {
            yaml: skeleton.yaml,
            blocks,
        })
    } else {
        Err(sorted(errs))
    }
}

/// Runs the inline pass over one block, recursing into containers. Failed
/// runs leave an empty placeholder and push their diagnostic; the document
/// is discarded at the end if any diagnostics were pushed.
fn inline_block(
    block: Block<Isp>,
    file: &str,
    defs: &ReferenceRegistry,
    errs: &mut Vec<Diagnostic>,
) -> Block<Vec<Inline>> {
    match block {
        Block::ThematicBreak => Block::ThematicBreak,
        Block::CodeBlock { info, body } => Block::CodeBlock { info, body },
        Block::Heading { level, content } => Block::Heading {
            level,
            content: run_isp(content, file, defs, errs),
        },
        Block::Naked(isp) => Block::Naked(run_isp(isp, file, defs, errs)),
        Block::Paragraph(isp) => Block::Paragraph(run_isp(isp, file, defs, errs)),
        Block::Blockquote(inner) => Block::Blockquote(
            inner
                .into_iter()
                .map(|b| inline_block(b, file, defs, errs))
                .collect(),
        ),
        Block::OrderedList { start, items } => Block::OrderedList {
            start,
            items: inline_items(items, file, defs, errs),
        },
        Block::UnorderedList { items } => Block::UnorderedList {
            items: inline_items(items, file, defs, errs),
        },
    }
}

fn inline_items(
    items: Vec<Vec<Block<Isp>>>,
    file: &str,
    defs: &ReferenceRegistry,
    errs: &mut Vec<Diagnostic>,
) -> Vec<Vec<Block<Vec<Inline>>>> {
    items
        .into_iter()
        .map(|item| {
            item.into_iter()
                .map(|b| inline_block(b, file, defs, errs))
                .collect()
        })
        .collect()
}

fn run_isp(
    isp: Isp,
    file: &str,
    defs: &ReferenceRegistry,
    errs: &mut Vec<Diagnostic>,
) -> Vec<Inline> {
    match isp {
        Isp::Error(diag) => {
            errs.push(diag);
            Vec::new()
        }
        Isp::Span(pos, text) => match InlineParser::new(file, &text, &pos, defs).parse() {
            Ok(inlines) => inlines,
            Err(diag) => {
                errs.push(diag);
                Vec::new()
            }
        },
    }
}

fn sorted(mut errs: Vec<Diagnostic>) -> Vec<Diagnostic> {
    errs.sort_by(|a, b| {
        (a.position.line, a.position.column).cmp(&(b.position.line, b.position.column))
    });
    errs
}
