//! Source positions and parse diagnostics.
//!
//! Parse failures are values, never panics. Every diagnostic carries the
//! 1-based position it was raised at, tied to the filename given to
//! [`parse`](crate::parse).

use std::fmt;

/// A 1-based position in the parsed source.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourcePos {
    /// Filename the position refers to. May be empty.
    pub name: String,
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub fn new(name: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            name: name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.name, self.line, self.column)
        }
    }
}

/// What went wrong at a particular position.
///
/// `Unexpected` covers low-level scanner failures; the remaining variants are
/// the domain diagnostics this flavour of markdown is strict about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// An unexpected token where one of `expected` should have appeared.
    /// `found` is `None` at end of input.
    Unexpected {
        found: Option<String>,
        expected: Vec<String>,
    },
    /// The YAML front matter could not be decoded.
    YamlParseError(String),
    /// Ordered lists may not start above 999999999.
    ListStartIndexTooBig(u32),
    /// An ordered list item whose index breaks the consecutive sequence.
    ListIndexOutOfOrder { actual: u32, expected: u32 },
    /// A reference definition whose normalised label is already taken.
    DuplicateReferenceDefinition(String),
    /// A reference link or image whose label has no definition.
    CouldNotFindReferenceDefinition {
        label: String,
        candidates: Vec<String>,
    },
    /// `&name;` where `name` is not an HTML5 entity.
    UnknownHtmlEntityName(String),
    /// A numeric character reference outside the valid code point range.
    InvalidNumericCharacter(u32),
    /// A `*`/`_`/`~`/`^` run that can neither open nor close a frame here.
    NonFlankingDelimiterRun(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unexpected { found, expected } => {
                match found {
                    Some(tok) => write!(f, "unexpected {tok:?}")?,
                    None => write!(f, "unexpected end of input")?,
                }
                if !expected.is_empty() {
                    write!(f, ", expected {}", expected.join(" or "))?;
                }
                Ok(())
            }
            Self::YamlParseError(msg) => write!(f, "YAML parse error: {msg}"),
            Self::ListStartIndexTooBig(n) => {
                write!(f, "ordered list start index {n} is too big")
            }
            Self::ListIndexOutOfOrder { actual, expected } => {
                write!(f, "list index {actual} is out of order, expected {expected}")
            }
            Self::DuplicateReferenceDefinition(label) => {
                write!(f, "duplicate reference definition: [{label}]")
            }
            Self::CouldNotFindReferenceDefinition { label, candidates } => {
                write!(f, "could not find a reference definition for [{label}]")?;
                if !candidates.is_empty() {
                    let names: Vec<String> =
                        candidates.iter().map(|c| format!("[{c}]")).collect();
                    write!(f, ", perhaps you meant {}?", names.join(" or "))?;
                }
                Ok(())
            }
            Self::UnknownHtmlEntityName(name) => {
                write!(f, "unknown HTML5 entity name: &{name};")
            }
            Self::InvalidNumericCharacter(n) => {
                write!(f, "invalid numeric character: #{n}")
            }
            Self::NonFlankingDelimiterRun(run) => {
                write!(f, "non-flanking delimiter run: {run}")
            }
        }
    }
}

/// A single parse diagnostic: an [`ErrorKind`] anchored at a [`SourcePos`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub position: SourcePos,
    pub kind: ErrorKind,
}

impl Diagnostic {
    pub fn new(position: SourcePos, kind: ErrorKind) -> Self {
        Self { position, kind }
    }

    /// Builds a scanner-level "unexpected token" diagnostic.
    pub fn unexpected(
        position: SourcePos,
        found: Option<String>,
        expected: Vec<String>,
    ) -> Self {
        Self {
            position,
            kind: ErrorKind::Unexpected { found, expected },
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

impl std::error::Error for Diagnostic {}
