//! Ordered and unordered list parsing, plus tight/loose normalisation.

use crate::ast::Block;
use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::Isp;

use super::{BlockParser, slevel};

/// The largest permitted ordered-list start index.
const MAX_START_INDEX: u64 = 999_999_999;

/// An unordered bullet: `-`, `+` or `*` followed by whitespace or the end of
/// the line.
pub(super) fn try_parse_bullet(line: &str) -> Option<char> {
    let mut chars = line.chars();
    let ch = chars.next()?;
    if !matches!(ch, '-' | '+' | '*') {
        return None;
    }
    matches!(chars.next(), None | Some(' ' | '\t')).then_some(ch)
}

/// An ordered-list marker: a decimal index, `.` or `)`, then whitespace or
/// the end of the line. The index saturates well above the permitted range
/// so oversized starts can still be diagnosed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct IndexMarker {
    pub value: u64,
    pub delim: char,
    /// Marker length in characters, digits plus delimiter.
    pub width: u32,
}

pub(super) fn try_parse_index(line: &str) -> Option<IndexMarker> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let mut chars = line[digits..].chars();
    let delim = chars.next()?;
    if !matches!(delim, '.' | ')') {
        return None;
    }
    if !matches!(chars.next(), None | Some(' ' | '\t')) {
        return None;
    }
    let mut value: u64 = 0;
    for c in line[..digits].chars() {
        value = value
            .saturating_mul(10)
            .saturating_add(u64::from(c as u8 - b'0'));
    }
    Some(IndexMarker {
        value,
        delim,
        width: (digits + 1) as u32,
    })
}

impl<'a> BlockParser<'a> {
    pub(super) fn parse_unordered_list(&mut self, bullet: char) -> Result<Block<Isp>, Diagnostic> {
        let bullet_col = self.cursor.column();
        log::debug!("unordered list ({bullet}) at column {bullet_col}");
        let mut items = Vec::new();
        loop {
            self.cursor.eat(bullet);
            items.push(self.parse_list_item(bullet_col, 1)?);
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() || self.cursor.column() < bullet_col {
                break;
            }
            match try_parse_bullet(self.cursor.rest_of_line()) {
                Some(next) if next == bullet => {}
                _ => break,
            }
        }
        Ok(Block::UnorderedList {
            items: normalize_list_items(items),
        })
    }

    pub(super) fn parse_ordered_list(&mut self, first: IndexMarker) -> Result<Block<Isp>, Diagnostic> {
        let bullet_col = self.cursor.column();
        log::debug!("ordered list ({}{}) at column {bullet_col}", first.value, first.delim);
        if first.value > MAX_START_INDEX {
            let pos = self.pos_here();
            self.register(Diagnostic::new(
                pos,
                ErrorKind::ListStartIndexTooBig(saturate(first.value)),
            ));
        }
        let mut items = Vec::new();
        let mut marker = first;
        loop {
            let expected = first.value.saturating_add(items.len() as u64);
            if marker.value != expected {
                let pos = self.pos_here();
                self.register(Diagnostic::new(
                    pos,
                    ErrorKind::ListIndexOutOfOrder {
                        actual: saturate(marker.value),
                        expected: saturate(expected),
                    },
                ));
            }
            for _ in 0..marker.width {
                self.cursor.bump();
            }
            items.push(self.parse_list_item(bullet_col, marker.width)?);
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() || self.cursor.column() < bullet_col {
                break;
            }
            match try_parse_index(self.cursor.rest_of_line()) {
                Some(next) if next.delim == first.delim => marker = next,
                _ => break,
            }
        }
        Ok(Block::OrderedList {
            start: saturate(first.value),
            items: normalize_list_items(items),
        })
    }

    /// Parses one item's blocks; the cursor sits just past the marker. An
    /// item with no content yields a placeholder whose flavour depends on
    /// how far below the next content sits.
    fn parse_list_item(
        &mut self,
        marker_col: u32,
        marker_width: u32,
    ) -> Result<Vec<Block<Isp>>, Diagnostic> {
        let bullet_line = self.cursor.line();
        let min_level = marker_col + marker_width + 1;
        self.cursor.skip_spaces();
        let empty_start = self.cursor.at_eol() || self.cursor.is_at_end();
        let level = if empty_start {
            min_level
        } else {
            slevel(min_level, self.cursor.column())
        };
        let pos = self.pos_here();
        let blocks = self.sub_env(true, level, |p| p.parse_blocks())?;
        if !blocks.is_empty() {
            return Ok(blocks);
        }
        // visually empty item: tight placeholder when the next content is
        // close, a paragraph when the gap spans blank lines
        let placeholder = if self.cursor.is_at_end() || self.cursor.line() - bullet_line <= 1 {
            Block::Naked(Isp::Span(pos, String::new()))
        } else {
            Block::Paragraph(Isp::Span(pos, String::new()))
        };
        Ok(vec![placeholder])
    }
}

fn saturate(value: u64) -> u32 {
    value.min(u64::from(u32::MAX)) as u32
}

fn is_paragraph_like(block: &Block<Isp>) -> bool {
    matches!(
        block,
        Block::Paragraph(_)
            | Block::Naked(_)
            | Block::Heading { .. }
            | Block::Blockquote(_)
            | Block::CodeBlock { .. }
    )
}

/// Decides whether a list is loose and rewrites its items accordingly: a
/// loose list has every `Naked` promoted to `Paragraph`, a tight list has a
/// trailing `Paragraph` of the last item (produced by the blank line that
/// separates the list from what follows) demoted back to `Naked`.
pub(super) fn normalize_list_items(mut items: Vec<Vec<Block<Isp>>>) -> Vec<Vec<Block<Isp>>> {
    let last = items.len().saturating_sub(1);
    let loose = items.iter().enumerate().any(|(ix, item)| {
        item.iter().skip(1).any(is_paragraph_like)
            || (ix < last && matches!(item.last(), Some(Block::Paragraph(_))))
    });
    if loose {
        for item in &mut items {
            for block in item.iter_mut() {
                if matches!(block, Block::Naked(_)) {
                    let Block::Naked(isp) = std::mem::replace(block, Block::ThematicBreak)
                    else {
                        unreachable!()
                    };
                    *block = Block::Paragraph(isp);
                }
            }
        }
    } else if let Some(block) = items.last_mut().and_then(|item| item.last_mut())
        && matches!(block, Block::Paragraph(_))
    {
        let Block::Paragraph(isp) = std::mem::replace(block, Block::ThematicBreak) else {
            unreachable!()
        };
        *block = Block::Naked(isp);
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::block_parser::BlockParser;

    fn blocks(input: &str) -> Vec<Block<Isp>> {
        BlockParser::new("", input)
            .parse()
            .expect("block pass")
            .blocks
    }

    fn unordered_items(input: &str) -> Vec<Vec<Block<Isp>>> {
        match blocks(input).into_iter().next() {
            Some(Block::UnorderedList { items }) => items,
            other => panic!("expected unordered list, got {other:?}"),
        }
    }

    fn span_text(isp: &Isp) -> &str {
        match isp {
            Isp::Span(_, text) => text,
            Isp::Error(diag) => panic!("unexpected deferred error: {diag}"),
        }
    }

    #[test]
    fn test_marker_scanners() {
        assert_eq!(try_parse_bullet("- x"), Some('-'));
        assert_eq!(try_parse_bullet("*"), Some('*'));
        assert_eq!(try_parse_bullet("-x"), None);
        assert_eq!(
            try_parse_index("12. x"),
            Some(IndexMarker {
                value: 12,
                delim: '.',
                width: 3
            })
        );
        assert_eq!(try_parse_index("3)"), Some(IndexMarker { value: 3, delim: ')', width: 2 }));
        assert_eq!(try_parse_index("12.x"), None);
        assert_eq!(try_parse_index(".x"), None);
    }

    #[test]
    fn test_tight_list() {
        let items = unordered_items("* a\n* b\n");
        assert_eq!(items.len(), 2);
        for (item, text) in items.iter().zip(["a", "b"]) {
            match &item[..] {
                [Block::Naked(isp)] => assert_eq!(span_text(isp), text),
                other => panic!("expected naked paragraph, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_loose_list() {
        let items = unordered_items("* a\n\n* b\n");
        assert_eq!(items.len(), 2);
        for item in &items {
            assert!(matches!(item[..], [Block::Paragraph(_)]));
        }
    }

    #[test]
    fn test_trailing_blank_keeps_list_tight() {
        let items = unordered_items("- a\n- b\n\n");
        assert!(matches!(items[0][..], [Block::Naked(_)]));
        assert!(matches!(items[1][..], [Block::Naked(_)]));
    }

    #[test]
    fn test_multi_paragraph_item_is_loose() {
        let items = unordered_items("- a\n\n  b\n");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].len(), 2);
        assert!(items[0].iter().all(|b| matches!(b, Block::Paragraph(_))));
    }

    #[test]
    fn test_nested_list_stays_tight() {
        let items = unordered_items("- a\n  - b\n");
        assert_eq!(items.len(), 1);
        match &items[0][..] {
            [first, Block::UnorderedList { items: nested }] => {
                // the nested bullet interrupts the paragraph
                assert!(matches!(first, Block::Paragraph(_)));
                assert!(matches!(nested[0][..], [Block::Naked(_)]));
            }
            other => panic!("expected paragraph + nested list, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_item_next_line_is_tight_naked() {
        let items = unordered_items("-\n- b\n");
        assert!(matches!(&items[0][..], [Block::Naked(Isp::Span(_, text))] if text.is_empty()));
    }

    #[test]
    fn test_empty_item_with_gap_makes_list_loose() {
        let items = unordered_items("-\n\n\n- b\n");
        assert!(matches!(&items[0][..], [Block::Paragraph(Isp::Span(_, text))] if text.is_empty()));
        assert!(matches!(items[1][..], [Block::Paragraph(_)]));
    }

    #[test]
    fn test_item_indentation_binds_content() {
        let items = unordered_items("- a\n  continued\n");
        match &items[0][..] {
            [Block::Naked(isp)] => assert_eq!(span_text(isp), "a\ncontinued"),
            other => panic!("expected naked paragraph, got {other:?}"),
        }
    }

    #[test]
    fn test_bullet_change_starts_new_list() {
        let parsed = blocks("- a\n+ b\n");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|b| matches!(b, Block::UnorderedList { .. })));
    }

    #[test]
    fn test_ordered_list_start_and_order() {
        let parsed = blocks("3. a\n4. b\n");
        match &parsed[..] {
            [Block::OrderedList { start, items }] => {
                assert_eq!(*start, 3);
                assert_eq!(items.len(), 2);
            }
            other => panic!("expected ordered list, got {other:?}"),
        }
    }

    #[test]
    fn test_ordered_list_out_of_order_registers_diagnostic() {
        let errs = BlockParser::new("", "1. a\n3. b\n")
            .parse()
            .map(|skeleton| skeleton.registered)
            .expect("skeleton should still build");
        assert_eq!(
            errs.iter()
                .filter(|d| matches!(
                    d.kind,
                    ErrorKind::ListIndexOutOfOrder {
                        actual: 3,
                        expected: 2
                    }
                ))
                .count(),
            1
        );
    }

    #[test]
    fn test_ordered_list_start_index_too_big() {
        let skeleton = BlockParser::new("", "1000000000. a\n")
            .parse()
            .expect("skeleton should still build");
        assert!(matches!(
            skeleton.registered[..],
            [Diagnostic {
                kind: ErrorKind::ListStartIndexTooBig(1000000000),
                ..
            }]
        ));
    }

    #[test]
    fn test_delimiter_change_starts_new_list() {
        let parsed = blocks("1. a\n2) b\n");
        assert_eq!(parsed.len(), 2);
    }
}
