//! Emphasis-family frames: emphasis, strong, strikeout, subscript and
//! superscript, driven by the flanking rules.
//!
//! An opening delimiter run is matched longest-first against the thirteen
//! opener states. Two adjacent nestable delimiters (`**_`, `~~^`, …) open a
//! double frame that accepts its closers in either order.

use crate::ast::Inline;
use crate::diagnostics::{Diagnostic, ErrorKind, SourcePos};
use crate::parser::scanners::{is_markup_char, is_transparent};

use super::{InlineParser, LastChar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Frame {
    Emphasis,
    EmphasisUnderscore,
    Strong,
    StrongUnderscore,
    Strikeout,
    Subscript,
    Superscript,
}

impl Frame {
    pub(super) fn delimiter(self) -> &'static str {
        match self {
            Self::Emphasis => "*",
            Self::EmphasisUnderscore => "_",
            Self::Strong => "**",
            Self::StrongUnderscore => "__",
            Self::Strikeout => "~~",
            Self::Subscript => "~",
            Self::Superscript => "^",
        }
    }

    pub(super) fn lift(self, inner: Vec<Inline>) -> Inline {
        match self {
            Self::Emphasis | Self::EmphasisUnderscore => Inline::Emphasis(inner),
            Self::Strong | Self::StrongUnderscore => Inline::Strong(inner),
            Self::Strikeout => Inline::Strikeout(inner),
            Self::Subscript => Inline::Subscript(inner),
            Self::Superscript => Inline::Superscript(inner),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Opener {
    Single(Frame),
    Double(Frame, Frame),
}

/// The thirteen opener states, longest match first.
const OPENERS: [(&str, Opener); 13] = [
    ("***", Opener::Double(Frame::Strong, Frame::Emphasis)),
    ("___", Opener::Double(Frame::StrongUnderscore, Frame::EmphasisUnderscore)),
    ("**_", Opener::Double(Frame::Strong, Frame::EmphasisUnderscore)),
    ("__*", Opener::Double(Frame::StrongUnderscore, Frame::Emphasis)),
    ("~~~", Opener::Double(Frame::Strikeout, Frame::Subscript)),
    ("~~^", Opener::Double(Frame::Strikeout, Frame::Superscript)),
    ("**", Opener::Single(Frame::Strong)),
    ("__", Opener::Single(Frame::StrongUnderscore)),
    ("~~", Opener::Single(Frame::Strikeout)),
    ("*", Opener::Single(Frame::Emphasis)),
    ("_", Opener::Single(Frame::EmphasisUnderscore)),
    ("~", Opener::Single(Frame::Subscript)),
    ("^", Opener::Single(Frame::Superscript)),
];

fn non_flanking(position: SourcePos, delimiter: &str) -> Diagnostic {
    Diagnostic::new(
        position,
        ErrorKind::NonFlankingDelimiterRun(delimiter.to_string()),
    )
}

impl InlineParser<'_> {
    /// Attempts a frame at the cursor. `Ok(None)` with a pending diagnostic
    /// means the delimiter run is not left-flanking here.
    pub(super) fn parse_enclosed(&mut self) -> Result<Option<Inline>, Diagnostic> {
        let rest = self.cursor.rest();
        let Some(&(delim, opener)) = OPENERS.iter().find(|(d, _)| rest.starts_with(d)) else {
            // dispatch guarantees a frame constituent
            return self.parse_plain().map(Some);
        };
        let pos = self.pos_here();
        if self.last_char == LastChar::Other {
            self.pending = Some(non_flanking(pos, delim));
            return Ok(None);
        }
        match rest[delim.len()..].chars().next() {
            Some(c) if !is_transparent(c) => {}
            _ => {
                self.pending = Some(non_flanking(pos, delim));
                return Ok(None);
            }
        }
        self.cursor.eat_str(delim);
        self.last_char = LastChar::None;
        log::trace!("opened frame {delim:?}");
        match opener {
            Opener::Single(frame) => {
                let inner = self.parse_scoped_inlines(self.allow_links, self.allow_images)?;
                self.close_frame(frame)?;
                Ok(Some(frame.lift(inner)))
            }
            Opener::Double(first, second) => {
                let inner = self.parse_scoped_inlines(self.allow_links, self.allow_images)?;
                let this = if self.try_close_frame(first) {
                    first
                } else if self.try_close_frame(second) {
                    second
                } else {
                    return Err(self.unexpected_here(&[
                        &format!("`{}`", first.delimiter()),
                        &format!("`{}`", second.delimiter()),
                    ]));
                };
                let other = if this == first { second } else { first };
                let mut outer = vec![this.lift(inner)];
                outer.extend(self.parse_optional_inlines()?);
                self.close_frame(other)?;
                Ok(Some(other.lift(outer)))
            }
        }
    }

    /// A right-flanking closer: the exact delimiter, not preceded by
    /// whitespace, followed by something transparent, markup, or the end.
    fn close_frame(&mut self, frame: Frame) -> Result<(), Diagnostic> {
        let delim = frame.delimiter();
        let pos = self.pos_here();
        if !self.cursor.rest().starts_with(delim) {
            return Err(Diagnostic::unexpected(
                pos,
                self.cursor.peek().map(|c| c.to_string()),
                vec![format!("`{delim}`")],
            ));
        }
        if self.last_char == LastChar::Space {
            return Err(non_flanking(pos, delim));
        }
        self.cursor.eat_str(delim);
        if let Some(c) = self.cursor.peek()
            && !is_transparent(c)
            && !is_markup_char(c)
        {
            return Err(non_flanking(pos, delim));
        }
        self.last_char = LastChar::Other;
        Ok(())
    }

    fn try_close_frame(&mut self, frame: Frame) -> bool {
        let cp = self.cursor.checkpoint();
        let saved = self.last_char;
        if self.close_frame(frame).is_ok() {
            true
        } else {
            self.cursor.restore(cp);
            self.last_char = saved;
            false
        }
    }
}
