//! Inline code span parsing.

use crate::ast::Inline;
use crate::diagnostics::Diagnostic;

use super::{InlineParser, LastChar};

impl InlineParser<'_> {
    /// An opening run of backticks, content that may contain backtick runs
    /// of any other length, and a closing run of exactly the opening length.
    pub(super) fn parse_code_span(&mut self) -> Result<Inline, Diagnostic> {
        let mut opening = 0usize;
        while self.cursor.eat('`') {
            opening += 1;
        }
        let mut content = String::new();
        loop {
            match self.cursor.peek() {
                None => {
                    let fence = "`".repeat(opening);
                    return Err(Diagnostic::unexpected(
                        self.pos_here(),
                        None,
                        vec![format!("closing `{fence}`")],
                    ));
                }
                Some('`') => {
                    let mut run = 0usize;
                    while self.cursor.eat('`') {
                        run += 1;
                    }
                    if run == opening {
                        break;
                    }
                    content.push_str(&"`".repeat(run));
                }
                Some(c) => {
                    content.push(c);
                    self.cursor.bump();
                }
            }
        }
        self.last_char = LastChar::Other;
        Ok(Inline::CodeSpan(collapse_whitespace(&content)))
    }
}

/// Trims the contents and collapses interior space/tab/newline runs to
/// single spaces.
fn collapse_whitespace(s: &str) -> String {
    s.split([' ', '\t', '\n'])
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(" a  b "), "a b");
        assert_eq!(collapse_whitespace("a\t\nb"), "a b");
        assert_eq!(collapse_whitespace("plain"), "plain");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
