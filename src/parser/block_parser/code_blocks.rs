//! Fenced code block parsing.

use crate::ast::Block;
use crate::diagnostics::Diagnostic;
use crate::parser::Isp;
use crate::parser::cursor::{indent_columns, strip_indent_columns};
use crate::parser::scanners::scan_escaped;

use super::{BlockParser, ilevel};

/// A validated opening fence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct FenceOpen {
    pub ch: char,
    pub count: usize,
    pub info: Option<String>,
}

/// Validates an opening fence line: three or more backticks or tildes,
/// optionally followed by an escape-aware info string. A backtick fence may
/// not carry a stray backtick in its info string.
pub(super) fn try_parse_fence_open(line: &str) -> Option<FenceOpen> {
    let ch = line.chars().next()?;
    if !matches!(ch, '`' | '~') {
        return None;
    }
    let count = line.chars().take_while(|&c| c == ch).count();
    if count < 3 {
        return None;
    }
    let mut rest = &line[count..];
    let mut info = String::new();
    while !rest.is_empty() {
        if let Some((c, len)) = scan_escaped(rest) {
            info.push(c);
            rest = &rest[len..];
            continue;
        }
        let c = rest.chars().next()?;
        if c == '`' && ch == '`' {
            return None;
        }
        info.push(c);
        rest = &rest[c.len_utf8()..];
    }
    let info = info.trim();
    Some(FenceOpen {
        ch,
        count,
        info: (!info.is_empty()).then(|| info.to_string()),
    })
}

/// A closing fence: indented to a column below the indented-code threshold,
/// at least as many fence characters as the opening, nothing but whitespace
/// after.
fn is_fence_close(line: &str, ch: char, min_count: usize, code_col: u32) -> bool {
    let (cols, rest) = indent_columns(line);
    if cols + 1 >= code_col {
        return false;
    }
    let count = rest.chars().take_while(|&c| c == ch).count();
    count >= min_count && rest[count..].chars().all(|c| matches!(c, ' ' | '\t'))
}

impl<'a> BlockParser<'a> {
    pub(super) fn parse_fenced_code_block(
        &mut self,
        open: FenceOpen,
    ) -> Result<Block<Isp>, Diagnostic> {
        let alevel = self.cursor.column();
        self.cursor.consume_line();
        log::debug!(
            "fenced code block ({} x {}) at column {alevel}",
            open.ch,
            open.count
        );
        let mut lines: Vec<&str> = Vec::new();
        loop {
            if self.cursor.is_at_end() {
                let fence: String = std::iter::repeat(open.ch).take(open.count).collect();
                return Err(self.unexpected_here(&[&format!("closing fence `{fence}`")]));
            }
            let line = self.cursor.rest_of_line();
            if is_fence_close(line, open.ch, open.count, ilevel(self.ref_level)) {
                self.cursor.consume_line();
                break;
            }
            lines.push(strip_indent_columns(line, alevel - 1));
            self.cursor.consume_line();
        }
        let mut body = lines.join("\n");
        if !lines.is_empty() {
            body.push('\n');
        }
        Ok(Block::CodeBlock {
            info: open.info,
            body,
        })
    }
}
