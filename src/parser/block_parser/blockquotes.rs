//! Blockquote parsing.

use crate::ast::Block;
use crate::diagnostics::Diagnostic;
use crate::parser::Isp;

use super::{BlockParser, slevel};

impl<'a> BlockParser<'a> {
    /// Parses `>` followed by the quote's inner blocks. The space after `>`
    /// is absorbed by the reference-level computation, so `> foo` and
    /// `>foo` anchor their content where it actually sits.
    pub(super) fn parse_blockquote(&mut self) -> Result<Block<Isp>, Diagnostic> {
        let marker_col = self.cursor.column();
        self.cursor.eat('>');
        self.cursor.skip_spaces();
        let min_level = marker_col + 2;
        let ind_level = if self.cursor.at_eol() || self.cursor.is_at_end() {
            min_level
        } else {
            self.cursor.column()
        };
        let level = slevel(min_level, ind_level);
        log::debug!("blockquote at column {marker_col}, inner level {level}");
        let inner = self.sub_env(false, level, |p| p.parse_blocks())?;
        Ok(Block::Blockquote(inner))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::Block;
    use crate::parser::Isp;
    use crate::parser::block_parser::BlockParser;

    fn blocks(input: &str) -> Vec<Block<Isp>> {
        BlockParser::new("", input)
            .parse()
            .expect("block pass")
            .blocks
    }

    fn span_text(isp: &Isp) -> &str {
        match isp {
            Isp::Span(_, text) => text,
            Isp::Error(diag) => panic!("unexpected deferred error: {diag}"),
        }
    }

    #[test]
    fn test_continuation_by_indentation() {
        let parsed = blocks("> first\n  second\n");
        match &parsed[..] {
            [Block::Blockquote(inner)] => match &inner[..] {
                [Block::Paragraph(isp)] => assert_eq!(span_text(isp), "first\nsecond"),
                other => panic!("expected one paragraph, got {other:?}"),
            },
            other => panic!("expected one blockquote, got {other:?}"),
        }
    }

    #[test]
    fn test_marker_on_every_line_makes_sibling_quotes() {
        let parsed = blocks("> a\n> b\n");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.iter().all(|b| matches!(b, Block::Blockquote(_))));
    }

    #[test]
    fn test_quote_can_hold_several_blocks() {
        let parsed = blocks("> # Title\n\n  body\n");
        match &parsed[..] {
            [Block::Blockquote(inner)] => {
                assert_eq!(inner.len(), 2);
                assert!(matches!(inner[0], Block::Heading { .. }));
                assert!(matches!(inner[1], Block::Paragraph(_)));
            }
            other => panic!("expected one blockquote, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_quote() {
        let parsed = blocks(">\n");
        assert_eq!(parsed, vec![Block::Blockquote(Vec::new())]);
    }
}
