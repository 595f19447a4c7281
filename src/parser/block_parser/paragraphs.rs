//! Paragraph parsing.
//!
//! A paragraph accumulates non-blank lines until a blank line, the end of the
//! container, or a line that opens another block construct. How it ends
//! decides whether a list item renders it naked or wrapped.

use crate::ast::Block;
use crate::diagnostics::Diagnostic;
use crate::parser::Isp;
use crate::parser::cursor::indent_columns;

use super::{BlockParser, code_blocks, ilevel, lists, thematic_breaks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ending {
    /// Blank line.
    Blank,
    /// A peer block construct opens on the next line.
    Broken,
    /// Indentation fell below the reference level.
    ContainerEnd,
    Eof,
}

impl<'a> BlockParser<'a> {
    pub(super) fn parse_paragraph(&mut self) -> Result<Block<Isp>, Diagnostic> {
        let pos = self.pos_here();
        let mut text = self.cursor.consume_line().trim_end().to_string();
        let ending = loop {
            if self.cursor.is_at_end() {
                break Ending::Eof;
            }
            let line = self.cursor.rest_of_line();
            if line.chars().all(|c| matches!(c, ' ' | '\t')) {
                break Ending::Blank;
            }
            let (cols, rest) = indent_columns(line);
            if cols + 1 < self.ref_level {
                break Ending::ContainerEnd;
            }
            if cols + 1 < ilevel(self.ref_level) && opens_other_block(rest) {
                break Ending::Broken;
            }
            text.push('\n');
            text.push_str(rest.trim_end());
            self.cursor.consume_line();
        };
        let naked =
            self.allow_naked && matches!(ending, Ending::Eof | Ending::ContainerEnd);
        let isp = Isp::Span(pos, text);
        Ok(if naked {
            Block::Naked(isp)
        } else {
            Block::Paragraph(isp)
        })
    }
}

/// Whether a continuation line instead opens another block construct.
fn opens_other_block(rest: &str) -> bool {
    thematic_breaks::try_parse_thematic_break(rest).is_some()
        || rest.starts_with('#')
        || code_blocks::try_parse_fence_open(rest).is_some()
        || lists::try_parse_bullet(rest).is_some()
        || lists::try_parse_index(rest).is_some()
        || rest.starts_with('>')
}
