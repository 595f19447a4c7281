//! Links, images and autolinks.
//!
//! A bracketed link or image is followed by one of four location forms:
//! inline `(uri "title")`, full reference `[label]`, collapsed `[]`, or
//! nothing at all (shortcut), the last two looking the inner text up in the
//! reference table.

use crate::ast::{Inline, plain_text};
use crate::diagnostics::{Diagnostic, ErrorKind, SourcePos};
use crate::parser::block_parser::reference_definitions::normalize_label;
use crate::parser::scanners::scan_escaped;

use super::{InlineParser, LastChar};

impl InlineParser<'_> {
    pub(super) fn parse_link(&mut self) -> Result<Inline, Diagnostic> {
        let open_pos = self.pos_here();
        self.cursor.eat('[');
        let inner = self.parse_bracketed_inlines(false, self.allow_images)?;
        self.expect_bracket_close()?;
        let (uri, title) = self.parse_location(&inner, &open_pos)?;
        self.last_char = LastChar::Other;
        Ok(Inline::Link { inner, uri, title })
    }

    pub(super) fn parse_image(&mut self) -> Result<Inline, Diagnostic> {
        let open_pos = self.pos_here();
        self.cursor.eat('!');
        self.cursor.eat('[');
        let alt = if self.cursor.peek() == Some(']') {
            vec![Inline::Plain(String::new())]
        } else {
            self.parse_bracketed_inlines(self.allow_links, false)?
        };
        self.expect_bracket_close()?;
        let (uri, title) = self.parse_location(&alt, &open_pos)?;
        self.last_char = LastChar::Other;
        Ok(Inline::Image { alt, uri, title })
    }

    /// `<uri>`, atomic: any failure leaves the cursor where it was and the
    /// `<` falls back to plain text. A scheme-less single-segment address
    /// that validates as an email becomes a `mailto:` link displaying the
    /// raw address.
    pub(super) fn try_parse_autolink(&mut self) -> Option<Inline> {
        let cp = self.cursor.checkpoint();
        self.cursor.eat('<');
        let mut uri = String::new();
        loop {
            match self.cursor.peek() {
                Some('>') => break,
                Some(c) if c.is_whitespace() || c == '<' => {
                    self.cursor.restore(cp);
                    return None;
                }
                Some(c) => {
                    uri.push(c);
                    self.cursor.bump();
                }
                None => {
                    self.cursor.restore(cp);
                    return None;
                }
            }
        }
        if uri.is_empty() {
            self.cursor.restore(cp);
            return None;
        }
        self.cursor.eat('>');
        self.last_char = LastChar::Other;
        log::trace!("autolink <{uri}>");
        let display = vec![Inline::Plain(uri.clone())];
        let uri = if is_email_address(&uri) {
            format!("mailto:{uri}")
        } else {
            uri
        };
        Some(Inline::Link {
            inner: display,
            uri,
            title: None,
        })
    }

    fn expect_bracket_close(&mut self) -> Result<(), Diagnostic> {
        if self.cursor.eat(']') {
            Ok(())
        } else {
            Err(self
                .pending
                .take()
                .unwrap_or_else(|| self.unexpected_here(&["']'"])))
        }
    }

    fn parse_location(
        &mut self,
        inner: &[Inline],
        open_pos: &SourcePos,
    ) -> Result<(String, Option<String>), Diagnostic> {
        match self.cursor.peek() {
            Some('(') => self.parse_inline_location(),
            Some('[') => {
                let label_pos = self.pos_here();
                self.cursor.eat('[');
                if self.cursor.eat(']') {
                    // collapsed: the inner text is the label
                    self.lookup_reference(&plain_text(inner), open_pos)
                } else {
                    let label = self.scan_location_label()?;
                    self.lookup_reference(&label, &label_pos)
                }
            }
            _ => self.lookup_reference(&plain_text(inner), open_pos),
        }
    }

    fn parse_inline_location(&mut self) -> Result<(String, Option<String>), Diagnostic> {
        self.cursor.eat('(');
        self.cursor.skip_spaces();
        let uri = self.parse_inline_uri()?;
        let title = self.parse_optional_inline_title()?;
        self.cursor.skip_spaces();
        if !self.cursor.eat(')') {
            return Err(self.unexpected_here(&["')'"]));
        }
        Ok((uri, title))
    }

    /// `<…>`-wrapped, or bare up to the first whitespace or `)`.
    fn parse_inline_uri(&mut self) -> Result<String, Diagnostic> {
        if self.cursor.eat('<') {
            let mut uri = String::new();
            loop {
                match self.cursor.peek() {
                    Some('>') => {
                        self.cursor.bump();
                        return Ok(uri);
                    }
                    None | Some('<' | '\n') => return Err(self.unexpected_here(&["'>'"])),
                    Some(c) => {
                        uri.push(c);
                        self.cursor.bump();
                    }
                }
            }
        }
        let mut uri = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_whitespace() || c == ')' {
                break;
            }
            uri.push(c);
            self.cursor.bump();
        }
        if uri.is_empty() {
            return Err(self.unexpected_here(&["URI"]));
        }
        Ok(uri)
    }

    /// An optional `"…"`, `'…'` or `(…)` title after the destination.
    fn parse_optional_inline_title(&mut self) -> Result<Option<String>, Diagnostic> {
        let cp = self.cursor.checkpoint();
        self.cursor.skip_spaces();
        if self.cursor.eat_eol() {
            self.cursor.skip_spaces();
        }
        let closer = match self.cursor.peek() {
            Some('"') => '"',
            Some('\'') => '\'',
            Some('(') => ')',
            _ => {
                self.cursor.restore(cp);
                return Ok(None);
            }
        };
        self.cursor.bump();
        let mut title = String::new();
        loop {
            if let Some((c, len)) = scan_escaped(self.cursor.rest()) {
                title.push(c);
                for _ in 0..len {
                    self.cursor.bump();
                }
                continue;
            }
            match self.cursor.peek() {
                Some(c) if c == closer => {
                    self.cursor.bump();
                    return Ok(Some(title));
                }
                Some(c) => {
                    title.push(c);
                    self.cursor.bump();
                }
                None => {
                    return Err(self.unexpected_here(&[&format!("closing '{closer}'")]));
                }
            }
        }
    }

    /// The `label` part of a full reference, up to `]` on the same line.
    fn scan_location_label(&mut self) -> Result<String, Diagnostic> {
        let mut label = String::new();
        loop {
            if let Some((c, len)) = scan_escaped(self.cursor.rest()) {
                label.push(c);
                for _ in 0..len {
                    self.cursor.bump();
                }
                continue;
            }
            match self.cursor.peek() {
                Some(']') => {
                    self.cursor.bump();
                    return Ok(label);
                }
                Some('\n') | None => return Err(self.unexpected_here(&["']'"])),
                Some(c) => {
                    label.push(c);
                    self.cursor.bump();
                }
            }
        }
    }

    fn lookup_reference(
        &self,
        label: &str,
        pos: &SourcePos,
    ) -> Result<(String, Option<String>), Diagnostic> {
        match self.defs.get(label) {
            Some(def) => Ok((def.uri.clone(), def.title.clone())),
            None => Err(Diagnostic::new(
                pos.clone(),
                ErrorKind::CouldNotFindReferenceDefinition {
                    label: normalize_label(label),
                    candidates: self.defs.candidates_for(label),
                },
            )),
        }
    }
}

/// A scanning-level email check for autolinks: a plausible local part, `@`,
/// and dot-separated alphanumeric-or-hyphen labels.
fn is_email_address(candidate: &str) -> bool {
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ".!#$%&'*+=?^_`{|}~-".contains(c))
    {
        return false;
    }
    if domain.is_empty() {
        return false;
    }
    domain.split('.').all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
