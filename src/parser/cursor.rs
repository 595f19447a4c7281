//! A position-tracking character cursor over normalised (LF-only) input.
//!
//! Columns are 1-based; a tab advances to the next multiple-of-4 tab stop,
//! which is the arithmetic every indentation decision in the block parser
//! relies on.

pub(crate) const TAB_WIDTH: u32 = 4;

#[derive(Debug, Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

/// A saved cursor state for backtracking.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_position(input, 1, 1)
    }

    /// Starts the cursor at an arbitrary position, used when reparsing an
    /// inline run anchored somewhere inside the original source.
    pub fn with_position(input: &'a str, line: u32, column: u32) -> Self {
        Self {
            input,
            pos: 0,
            line,
            column,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Everything from the cursor to the end of input.
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => {
                self.line += 1;
                self.column = 1;
            }
            '\t' => {
                self.column += TAB_WIDTH - (self.column - 1) % TAB_WIDTH;
            }
            _ => self.column += 1,
        }
        Some(c)
    }

    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            for _ in s.chars() {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    /// Consumes an end of line. Returns false at end of input or mid-line.
    pub fn eat_eol(&mut self) -> bool {
        self.eat('\n')
    }

    pub fn at_eol(&self) -> bool {
        self.peek() == Some('\n')
    }

    /// Skips spaces and tabs, returning how many characters were consumed.
    pub fn skip_spaces(&mut self) -> usize {
        let mut n = 0;
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.bump();
            n += 1;
        }
        n
    }

    /// Skips spaces, tabs and newlines.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n')) {
            self.bump();
        }
    }

    /// The current line from the cursor up to (not including) its newline.
    pub fn rest_of_line(&self) -> &'a str {
        let rest = self.rest();
        match rest.find('\n') {
            Some(ix) => &rest[..ix],
            None => rest,
        }
    }

    /// Consumes through the end of the current line (including the newline,
    /// if any) and returns the line contents.
    pub fn consume_line(&mut self) -> &'a str {
        let line = self.rest_of_line();
        for _ in line.chars() {
            self.bump();
        }
        self.eat_eol();
        line
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.line = cp.line;
        self.column = cp.column;
    }
}

/// Measures the indentation of a line in columns (tab stops every 4, counted
/// from column 1) and returns the measured width together with the text after
/// the indentation.
pub(crate) fn indent_columns(line: &str) -> (u32, &str) {
    let mut cols = 0;
    for (ix, c) in line.char_indices() {
        match c {
            ' ' => cols += 1,
            '\t' => cols += TAB_WIDTH - cols % TAB_WIDTH,
            _ => return (cols, &line[ix..]),
        }
    }
    (cols, "")
}

/// Strips leading whitespace worth at most `cols` columns from a line. A tab
/// that would overshoot the budget is kept.
pub(crate) fn strip_indent_columns(line: &str, cols: u32) -> &str {
    let mut used = 0;
    for (ix, c) in line.char_indices() {
        let width = match c {
            ' ' => 1,
            '\t' => TAB_WIDTH - used % TAB_WIDTH,
            _ => return &line[ix..],
        };
        if used + width > cols {
            return &line[ix..];
        }
        used += width;
    }
    ""
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_tracking_with_tabs() {
        let mut cursor = Cursor::new("\ta");
        cursor.bump();
        assert_eq!(cursor.column(), 5);
        cursor.bump();
        assert_eq!(cursor.column(), 6);
    }

    #[test]
    fn test_tab_advances_to_next_stop() {
        let mut cursor = Cursor::new("ab\tc");
        cursor.bump();
        cursor.bump();
        assert_eq!(cursor.column(), 3);
        cursor.bump(); // tab from column 3 lands on column 5
        assert_eq!(cursor.column(), 5);
    }

    #[test]
    fn test_newline_resets_column() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.consume_line();
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.rest(), "cd");
    }

    #[test]
    fn test_checkpoint_restores_position() {
        let mut cursor = Cursor::new("hello");
        let cp = cursor.checkpoint();
        cursor.bump();
        cursor.bump();
        cursor.restore(cp);
        assert_eq!(cursor.rest(), "hello");
        assert_eq!(cursor.column(), 1);
    }

    #[test]
    fn test_indent_columns() {
        assert_eq!(indent_columns("    x"), (4, "x"));
        assert_eq!(indent_columns("\tx"), (4, "x"));
        assert_eq!(indent_columns("  \tx"), (4, "x"));
        assert_eq!(indent_columns(""), (0, ""));
    }

    #[test]
    fn test_strip_indent_columns() {
        assert_eq!(strip_indent_columns("      x", 4), "  x");
        assert_eq!(strip_indent_columns("\t  x", 4), "  x");
        assert_eq!(strip_indent_columns("  x", 4), "x");
        // a tab that would overshoot the budget stays
        assert_eq!(strip_indent_columns(" \tx", 3), "\tx");
    }
}
