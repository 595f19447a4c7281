//! Inline-level parsing.
//!
//! Each unparsed run from the block pass is reparsed here into a non-empty
//! inline sequence: text, code spans, emphasis-family frames, links, images,
//! autolinks and hard breaks. The parser carries the frame-nesting
//! permissions and the class of the last emitted character, which drives the
//! flanking rules.

use crate::ast::Inline;
use crate::diagnostics::{Diagnostic, SourcePos};
use crate::parser::block_parser::ReferenceRegistry;
use crate::parser::cursor::Cursor;
use crate::parser::scanners::{EntityScan, is_frame_constituent, is_transparent, scan_entity, scan_escaped};

mod code_spans;
mod emphasis;
mod links;

/// Class of the character last consumed, as the flanking rules see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LastChar {
    /// Start of the run, or just inside an opening delimiter or bracket.
    None,
    /// Whitespace or transparent punctuation.
    Space,
    Other,
}

pub(crate) struct InlineParser<'a> {
    cursor: Cursor<'a>,
    file: &'a str,
    defs: &'a ReferenceRegistry,
    /// Whether an empty run is permissible (only at the top of a run).
    allow_empty: bool,
    /// Disabled inside link text to forbid nested links.
    allow_links: bool,
    /// Disabled inside image alt text.
    allow_images: bool,
    /// Inside link text or image alt, where `]` ends the inner run. A `]`
    /// anywhere else is literal text.
    in_brackets: bool,
    last_char: LastChar,
    /// Why the last dispatch declined to start an inline, kept so stop
    /// positions report the real reason instead of a generic error.
    pending: Option<Diagnostic>,
}

impl<'a> InlineParser<'a> {
    pub fn new(
        file: &'a str,
        text: &'a str,
        start: &SourcePos,
        defs: &'a ReferenceRegistry,
    ) -> Self {
        Self {
            cursor: Cursor::with_position(text, start.line, start.column),
            file,
            defs,
            allow_empty: true,
            allow_links: true,
            allow_images: true,
            in_brackets: false,
            last_char: LastChar::None,
            pending: None,
        }
    }

    /// Parses the whole run and requires it to be consumed.
    pub fn parse(mut self) -> Result<Vec<Inline>, Diagnostic> {
        log::trace!(
            "inline run at {}:{}",
            self.cursor.line(),
            self.cursor.column()
        );
        let inlines = self.parse_inlines()?;
        if !self.cursor.is_at_end() {
            let diag = self
                .pending
                .take()
                .unwrap_or_else(|| self.unexpected_here(&["end of inline block"]));
            return Err(diag);
        }
        Ok(inlines)
    }

    /// One or more inlines; an immediately empty run is only permitted under
    /// `allow_empty`, where it yields a single empty `Plain`.
    fn parse_inlines(&mut self) -> Result<Vec<Inline>, Diagnostic> {
        let mut inlines = Vec::new();
        while !self.cursor.is_at_end() {
            match self.parse_inline()? {
                Some(inline) => {
                    self.pending = None;
                    push_merged(&mut inlines, inline);
                }
                None => break,
            }
        }
        if inlines.is_empty() {
            if self.allow_empty {
                inlines.push(Inline::Plain(String::new()));
            } else if let Some(diag) = self.pending.take() {
                return Err(diag);
            } else {
                return Err(self.unexpected_here(&["inline content"]));
            }
        }
        Ok(inlines)
    }

    /// Zero or more inlines, used between the two closers of a double frame.
    fn parse_optional_inlines(&mut self) -> Result<Vec<Inline>, Diagnostic> {
        let mut inlines = Vec::new();
        while !self.cursor.is_at_end() {
            match self.parse_inline()? {
                Some(inline) => {
                    self.pending = None;
                    push_merged(&mut inlines, inline);
                }
                None => break,
            }
        }
        Ok(inlines)
    }

    /// Dispatches on the next character. `Ok(None)` means no inline can
    /// start here (closing delimiter, forbidden construct); the reason is
    /// left in `pending`.
    fn parse_inline(&mut self) -> Result<Option<Inline>, Diagnostic> {
        let Some(c) = self.cursor.peek() else {
            return Ok(None);
        };
        match c {
            '`' => self.parse_code_span().map(Some),
            '[' if self.allow_links => self.parse_link().map(Some),
            '[' | ']' if self.in_brackets => {
                self.pending = Some(self.unexpected_here(&["inline content"]));
                Ok(None)
            }
            '!' if self.allow_images && self.cursor.peek_second() == Some('[') => {
                self.parse_image().map(Some)
            }
            '<' if self.allow_links => match self.try_parse_autolink() {
                Some(link) => Ok(Some(link)),
                None => self.parse_plain().map(Some),
            },
            '\\' if self.cursor.peek_second() == Some('\n') && self.cursor.rest().len() > 2 => {
                self.parse_hard_break().map(Some)
            }
            c if is_frame_constituent(c) => self.parse_enclosed(),
            _ => self.parse_plain().map(Some),
        }
    }

    /// `\` at the end of a line, with more input following.
    fn parse_hard_break(&mut self) -> Result<Inline, Diagnostic> {
        self.cursor.bump();
        self.cursor.eat_eol();
        self.cursor.skip_spaces();
        self.last_char = LastChar::Space;
        Ok(Inline::LineBreak)
    }

    /// Accumulates plain text up to the next construct boundary, decoding
    /// escapes and entity references and softening line breaks to spaces.
    fn parse_plain(&mut self) -> Result<Inline, Diagnostic> {
        let mut text = String::new();
        loop {
            let Some(c) = self.cursor.peek() else { break };
            match c {
                '`' => break,
                '[' => {
                    if self.allow_links || self.in_brackets {
                        break;
                    }
                    self.cursor.bump();
                    text.push('[');
                }
                ']' => {
                    if self.in_brackets {
                        break;
                    }
                    self.cursor.bump();
                    text.push(']');
                }
                c if is_frame_constituent(c) => break,
                '<' => {
                    if self.allow_links && !text.is_empty() {
                        break;
                    }
                    // an autolink attempt already failed here
                    self.cursor.bump();
                    text.push('<');
                }
                '!' if self.allow_images
                    && self.cursor.peek_second() == Some('[')
                    && !text.is_empty() =>
                {
                    break;
                }
                '\\' => {
                    if self.cursor.peek_second() == Some('\n') {
                        if text.is_empty() {
                            self.cursor.bump();
                            text.push('\\');
                        } else {
                            break;
                        }
                    } else if let Some((decoded, len)) = scan_escaped(self.cursor.rest()) {
                        for _ in 0..len {
                            self.cursor.bump();
                        }
                        text.push(decoded);
                    } else {
                        self.cursor.bump();
                        text.push('\\');
                    }
                }
                '&' => match scan_entity(self.cursor.rest()) {
                    EntityScan::Replacement { text: decoded, len } => {
                        for _ in 0..len {
                            self.cursor.bump();
                        }
                        text.push_str(&decoded);
                    }
                    EntityScan::Invalid { kind } => {
                        return Err(Diagnostic::new(self.pos_here(), kind));
                    }
                    EntityScan::NoMatch => {
                        self.cursor.bump();
                        text.push('&');
                    }
                },
                '\n' => {
                    // soft break: a single space, blanks stripped both sides
                    while text.ends_with([' ', '\t']) {
                        text.pop();
                    }
                    self.cursor.bump();
                    self.cursor.skip_spaces();
                    text.push(' ');
                }
                _ => {
                    self.cursor.bump();
                    text.push(c);
                }
            }
        }
        if let Some(c) = text.chars().last() {
            self.last_char = if is_transparent(c) {
                LastChar::Space
            } else {
                LastChar::Other
            };
        }
        Ok(Inline::Plain(text))
    }

    /// Runs an inner inline parse with the given permissions; non-empty
    /// content is required and the flanking state is reset so nested frames
    /// can open right after the delimiter.
    fn parse_scoped_inlines(
        &mut self,
        allow_links: bool,
        allow_images: bool,
    ) -> Result<Vec<Inline>, Diagnostic> {
        let saved = (self.allow_empty, self.allow_links, self.allow_images);
        self.allow_empty = false;
        self.allow_links = allow_links;
        self.allow_images = allow_images;
        self.last_char = LastChar::None;
        let result = self.parse_inlines();
        (self.allow_empty, self.allow_links, self.allow_images) = saved;
        result
    }

    /// Like [`Self::parse_scoped_inlines`], for link text and image alt:
    /// `]` additionally becomes a terminator for the inner run.
    fn parse_bracketed_inlines(
        &mut self,
        allow_links: bool,
        allow_images: bool,
    ) -> Result<Vec<Inline>, Diagnostic> {
        let saved = self.in_brackets;
        self.in_brackets = true;
        let result = self.parse_scoped_inlines(allow_links, allow_images);
        self.in_brackets = saved;
        result
    }

    fn pos_here(&self) -> SourcePos {
        SourcePos::new(self.file, self.cursor.line(), self.cursor.column())
    }

    fn unexpected_here(&self, expected: &[&str]) -> Diagnostic {
        Diagnostic::unexpected(
            self.pos_here(),
            self.cursor.peek().map(|c| c.to_string()),
            expected.iter().map(|s| s.to_string()).collect(),
        )
    }
}

/// Appends an inline, merging adjacent plain-text pieces.
fn push_merged(inlines: &mut Vec<Inline>, inline: Inline) {
    if let Inline::Plain(tail) = &inline
        && let Some(Inline::Plain(head)) = inlines.last_mut()
    {
        head.push_str(tail);
        return;
    }
    inlines.push(inline);
}
