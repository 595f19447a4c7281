//! Indented code block parsing.
//!
//! Lines indented to `ilevel(ref_level)` or deeper form a code block. The
//! code's shared indentation prefix (`ref_level + 3` columns) is stripped;
//! anything beyond it is preserved.

use crate::ast::Block;
use crate::diagnostics::Diagnostic;
use crate::parser::Isp;
use crate::parser::cursor::{indent_columns, strip_indent_columns};

use super::{BlockParser, ilevel};

impl<'a> BlockParser<'a> {
    pub(super) fn parse_indented_code_block(&mut self) -> Result<Block<Isp>, Diagnostic> {
        let alevel = self.cursor.column();
        let code_col = ilevel(self.ref_level);
        let strip = self.ref_level + 3;
        log::debug!("indented code block at column {alevel}");

        // The dispatch already consumed the first line's indentation; re-pad
        // it so over-indentation survives the shared strip below.
        let first = format!(
            "{}{}",
            " ".repeat((alevel - 1) as usize),
            self.cursor.consume_line()
        );
        let mut lines: Vec<String> = vec![strip_indent_columns(&first, strip).to_string()];

        let mut pending_blanks = 0usize;
        while !self.cursor.is_at_end() {
            let line = self.cursor.rest_of_line();
            if line.chars().all(|c| matches!(c, ' ' | '\t')) {
                pending_blanks += 1;
                self.cursor.consume_line();
                continue;
            }
            let (cols, _) = indent_columns(line);
            if cols + 1 < code_col {
                break;
            }
            for _ in 0..pending_blanks {
                lines.push(String::new());
            }
            pending_blanks = 0;
            lines.push(strip_indent_columns(line, strip).to_string());
            self.cursor.consume_line();
        }

        let mut body = lines.join("\n");
        body.push('\n');
        Ok(Block::CodeBlock { info: None, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::block_parser::BlockParser;

    fn code_body(input: &str) -> String {
        let skeleton = BlockParser::new("", input).parse().expect("block pass");
        match skeleton.blocks.into_iter().next() {
            Some(Block::CodeBlock { info, body }) => {
                assert_eq!(info, None);
                body
            }
            other => panic!("expected code block, got {other:?}"),
        }
    }

    #[test]
    fn test_four_space_indent() {
        assert_eq!(code_body("    code\n"), "code\n");
        assert_eq!(code_body("    a\n    b\n"), "a\nb\n");
    }

    #[test]
    fn test_tab_counts_as_four_columns() {
        assert_eq!(code_body("\tcode\n"), "code\n");
    }

    #[test]
    fn test_over_indentation_is_preserved() {
        assert_eq!(code_body("      six\n"), "  six\n");
        assert_eq!(code_body("        eight\n    four\n"), "    eight\nfour\n");
    }

    #[test]
    fn test_interior_blank_lines_kept() {
        assert_eq!(code_body("    a\n\n    b\n"), "a\n\nb\n");
    }

    #[test]
    fn test_trailing_blank_lines_dropped() {
        let skeleton = BlockParser::new("", "    a\n\n\nafter\n")
            .parse()
            .expect("block pass");
        assert_eq!(skeleton.blocks.len(), 2);
        assert!(matches!(
            &skeleton.blocks[0],
            Block::CodeBlock { body, .. } if body == "a\n"
        ));
        assert!(matches!(skeleton.blocks[1], Block::Paragraph(_)));
    }
}
