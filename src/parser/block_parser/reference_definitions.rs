//! Reference definitions: the document-global label table and
//! `[label]: uri "title"` parsing.
//!
//! Labels are normalised by trimming and collapsing internal whitespace;
//! matching is case-sensitive. The first definition of a label wins, later
//! conflicting definitions are diagnosed and dropped.

use std::collections::HashMap;

use crate::diagnostics::{Diagnostic, ErrorKind};
use crate::parser::scanners::scan_escaped;

use super::BlockParser;

/// How far a label may be from a known one to be suggested as a candidate.
const CANDIDATE_DISTANCE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReferenceDefinition {
    pub uri: String,
    pub title: Option<String>,
}

/// All reference definitions of a document, keyed by normalised label.
#[derive(Debug, Clone, Default)]
pub(crate) struct ReferenceRegistry {
    definitions: HashMap<String, ReferenceDefinition>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a definition. Returns false (and stores nothing) when the
    /// normalised label is already taken.
    pub fn insert(&mut self, label: &str, uri: String, title: Option<String>) -> bool {
        let key = normalize_label(label);
        if self.definitions.contains_key(&key) {
            return false;
        }
        self.definitions.insert(key, ReferenceDefinition { uri, title });
        true
    }

    pub fn get(&self, label: &str) -> Option<&ReferenceDefinition> {
        self.definitions.get(&normalize_label(label))
    }

    /// Labels close to `label` by edit distance, sorted, for "perhaps you
    /// meant" suggestions.
    pub fn candidates_for(&self, label: &str) -> Vec<String> {
        let wanted = normalize_label(label);
        let mut candidates: Vec<String> = self
            .definitions
            .keys()
            .filter(|key| edit_distance(&wanted, key) <= CANDIDATE_DISTANCE)
            .cloned()
            .collect();
        candidates.sort();
        candidates
    }
}

/// Trims a label and collapses internal whitespace runs to single spaces.
pub(crate) fn normalize_label(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Classic two-row Levenshtein distance over characters.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

impl<'a> BlockParser<'a> {
    /// Attempts a reference definition at the cursor. The attempt is atomic
    /// up to the `[label]:` prefix; after that the definition is committed
    /// and malformed input is a hard error. Returns false (cursor untouched)
    /// when the prefix does not match.
    pub(super) fn try_parse_reference_definition(&mut self) -> Result<bool, Diagnostic> {
        let cp = self.cursor.checkpoint();
        let label_pos = self.pos_here();
        let Some(label) = self.scan_reference_label() else {
            self.cursor.restore(cp);
            return Ok(false);
        };
        if !self.cursor.eat(':') {
            self.cursor.restore(cp);
            return Ok(false);
        }
        self.skip_spaces_one_eol();
        let uri = self.parse_definition_uri()?;
        let title = self.parse_optional_title()?;
        self.cursor.skip_spaces();
        if !(self.cursor.is_at_end() || self.cursor.eat_eol()) {
            return Err(self.unexpected_here(&["end of line"]));
        }
        log::debug!("reference definition [{label}] -> {uri}");
        if !self.defs.insert(&label, uri, title) {
            self.register(Diagnostic::new(
                label_pos,
                ErrorKind::DuplicateReferenceDefinition(normalize_label(&label)),
            ));
        }
        Ok(true)
    }

    /// `[` then escape-aware characters up to `]` on the same line.
    fn scan_reference_label(&mut self) -> Option<String> {
        if !self.cursor.eat('[') {
            return None;
        }
        let mut label = String::new();
        loop {
            if let Some((c, len)) = scan_escaped(self.cursor.rest()) {
                label.push(c);
                for _ in 0..len {
                    self.cursor.bump();
                }
                continue;
            }
            match self.cursor.peek()? {
                ']' => break,
                '[' | '\n' => return None,
                c => {
                    label.push(c);
                    self.cursor.bump();
                }
            }
        }
        self.cursor.eat(']');
        (!label.trim().is_empty()).then_some(label)
    }

    /// The destination of a committed definition: `<…>`-wrapped or bare up
    /// to the next whitespace.
    fn parse_definition_uri(&mut self) -> Result<String, Diagnostic> {
        if self.cursor.eat('<') {
            let mut uri = String::new();
            loop {
                match self.cursor.peek() {
                    Some('>') => {
                        self.cursor.bump();
                        return Ok(uri);
                    }
                    Some('<' | '\n') | None => {
                        return Err(self.unexpected_here(&["'>'"]));
                    }
                    Some(c) => {
                        uri.push(c);
                        self.cursor.bump();
                    }
                }
            }
        }
        let mut uri = String::new();
        while let Some(c) = self.cursor.peek() {
            if c.is_whitespace() {
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

    /// An optional `"…"`, `'…'` or `(…)` title; the separator before it may
    /// contain one end of line. No title leaves the cursor untouched.
    fn parse_optional_title(&mut self) -> Result<Option<String>, Diagnostic> {
        let cp = self.cursor.checkpoint();
        self.skip_spaces_one_eol();
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

    /// Spaces and tabs, at most one end of line, then more spaces and tabs.
    fn skip_spaces_one_eol(&mut self) {
        self.cursor.skip_spaces();
        if self.cursor.eat_eol() {
            self.cursor.skip_spaces();
        }
    }
}
