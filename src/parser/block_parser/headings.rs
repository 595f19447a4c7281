//! ATX heading parsing.
//!
//! Headings commit as soon as a line opens with `#`. A malformed heading
//! (seven hashes, missing space) recovers by consuming the line and emitting
//! a level-one heading that carries the diagnostic, so the rest of the
//! document still parses.

use crate::ast::{Block, HeadingLevel};
use crate::diagnostics::Diagnostic;
use crate::parser::Isp;

use super::BlockParser;

impl<'a> BlockParser<'a> {
    pub(super) fn parse_atx_heading(&mut self) -> Result<Block<Isp>, Diagnostic> {
        match self.try_atx_heading() {
            Ok(block) => Ok(block),
            Err(diag) => {
                // recovery point: keep the document structure
                log::debug!("recovering from heading failure: {diag}");
                self.cursor.consume_line();
                Ok(Block::Heading {
                    level: HeadingLevel::H1,
                    content: Isp::Error(diag),
                })
            }
        }
    }

    fn try_atx_heading(&mut self) -> Result<Block<Isp>, Diagnostic> {
        let mut hashes = 0;
        while self.cursor.eat('#') {
            hashes += 1;
        }
        let Some(level) = HeadingLevel::from_hashes(hashes) else {
            return Err(self.unexpected_here(&["1 to 6 '#' characters"]));
        };
        if !matches!(self.cursor.peek(), Some(' ' | '\t')) {
            return Err(self.unexpected_here(&["space or tab after the opening hashes"]));
        }
        self.cursor.skip_spaces();
        let pos = self.pos_here();
        let raw = self.cursor.consume_line();
        let mut content = raw.trim_end();
        if let Some(stripped) = strip_closing_sequence(content) {
            content = stripped;
        }
        Ok(Block::Heading {
            level,
            content: Isp::Span(pos, content.to_string()),
        })
    }
}

/// Strips a trailing `space+ #+` closing sequence, if present.
fn strip_closing_sequence(content: &str) -> Option<&str> {
    let without_hashes = content.trim_end_matches('#');
    if without_hashes.len() == content.len() {
        return None;
    }
    if without_hashes.is_empty() {
        return Some("");
    }
    let trimmed = without_hashes.trim_end_matches([' ', '\t']);
    if trimmed.len() == without_hashes.len() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorKind;
    use crate::parser::block_parser::BlockParser;

    fn heading(input: &str) -> (HeadingLevel, Isp) {
        let skeleton = BlockParser::new("", input).parse().expect("block pass");
        match skeleton.blocks.into_iter().next() {
            Some(Block::Heading { level, content }) => (level, content),
            other => panic!("expected heading, got {other:?}"),
        }
    }

    #[test]
    fn test_simple_heading() {
        let (level, content) = heading("### Three\n");
        assert_eq!(level, HeadingLevel::H3);
        assert!(matches!(content, Isp::Span(_, text) if text == "Three"));
    }

    #[test]
    fn test_closing_sequence_is_stripped() {
        let (_, content) = heading("# Heading #\n");
        assert!(matches!(content, Isp::Span(_, text) if text == "Heading"));
        let (_, content) = heading("## Sub ###  \n");
        assert!(matches!(content, Isp::Span(_, text) if text == "Sub"));
    }

    #[test]
    fn test_hash_glued_to_text_is_kept() {
        let (_, content) = heading("# issue#12\n");
        assert!(matches!(content, Isp::Span(_, text) if text == "issue#12"));
    }

    #[test]
    fn test_seven_hashes_recovers_with_diagnostic() {
        let (level, content) = heading("####### nope\n");
        assert_eq!(level, HeadingLevel::H1);
        match content {
            Isp::Error(diag) => {
                assert!(matches!(diag.kind, ErrorKind::Unexpected { .. }));
            }
            other => panic!("expected deferred error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_space_recovers_with_diagnostic() {
        let (_, content) = heading("#nope\n");
        assert!(matches!(content, Isp::Error(_)));
    }

    #[test]
    fn test_strip_closing_sequence() {
        assert_eq!(strip_closing_sequence("Heading #"), Some("Heading"));
        assert_eq!(strip_closing_sequence("Heading ###"), Some("Heading"));
        assert_eq!(strip_closing_sequence("Heading#"), None);
        assert_eq!(strip_closing_sequence("###"), Some(""));
        assert_eq!(strip_closing_sequence("plain"), None);
    }
}
