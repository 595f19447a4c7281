//! Character classification and shared low-level scanners.

use std::collections::HashMap;
use std::sync::OnceLock;

use entities::ENTITIES;

use crate::diagnostics::ErrorKind;

/// Characters that can open or close an emphasis-family frame.
pub(crate) fn is_frame_constituent(c: char) -> bool {
    matches!(c, '*' | '_' | '~' | '^')
}

/// Frame constituents plus brackets and backticks.
pub(crate) fn is_markup_char(c: char) -> bool {
    is_frame_constituent(c) || matches!(c, '[' | ']' | '`')
}

/// Punctuation that does not affect flanking decisions.
pub(crate) fn is_transparent_punctuation(c: char) -> bool {
    matches!(
        c,
        '!' | '"' | '(' | ')' | ',' | '-' | '.' | ':' | ';' | '?' | '{' | '}' | '–' | '—'
    )
}

/// Whitespace or transparent punctuation.
pub(crate) fn is_transparent(c: char) -> bool {
    c.is_whitespace() || is_transparent_punctuation(c)
}

/// `\` followed by ASCII punctuation decodes to that character. Backslash
/// before anything else is not an escape.
pub(crate) fn scan_escaped(rest: &str) -> Option<(char, usize)> {
    let mut chars = rest.chars();
    if chars.next() != Some('\\') {
        return None;
    }
    let c = chars.next()?;
    c.is_ascii_punctuation().then(|| (c, 1 + c.len_utf8()))
}

/// Outcome of scanning `&…` for an entity or numeric character reference.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum EntityScan {
    /// Not entity-shaped at all; the `&` is literal text.
    NoMatch,
    /// A valid reference and the replacement text it decodes to.
    Replacement { text: String, len: usize },
    /// Entity-shaped but invalid; the caller should raise `kind`.
    Invalid { kind: ErrorKind },
}

/// Scans a numeric (`&#60;`, `&#x3C;`) or named (`&amp;`) character
/// reference at the start of `rest`. The caller guarantees `rest` starts
/// with `&`.
pub(crate) fn scan_entity(rest: &str) -> EntityScan {
    let bytes = rest.as_bytes();
    if bytes.len() < 2 {
        return EntityScan::NoMatch;
    }
    if bytes[1] == b'#' {
        scan_numeric_reference(rest)
    } else {
        scan_named_reference(rest)
    }
}

fn scan_numeric_reference(rest: &str) -> EntityScan {
    let bytes = rest.as_bytes();
    let mut end = 2;
    let hex = end < bytes.len() && bytes[end] | 0x20 == b'x';
    if hex {
        end += 1;
    }
    let radix = if hex { 16 } else { 10 };
    let digits_start = end;
    let mut value: u32 = 0;
    while end < bytes.len() {
        let digit = match (bytes[end] as char).to_digit(radix) {
            Some(d) => d,
            None => break,
        };
        // saturate above the code point range, enough to reject
        value = value.saturating_mul(radix).saturating_add(digit);
        end += 1;
    }
    if end == digits_start || bytes.get(end) != Some(&b';') {
        return EntityScan::NoMatch;
    }
    if value == 0 || value > 0x10FFFF {
        return EntityScan::Invalid {
            kind: ErrorKind::InvalidNumericCharacter(value),
        };
    }
    match char::from_u32(value) {
        Some(c) => EntityScan::Replacement {
            text: c.to_string(),
            len: end + 1,
        },
        None => EntityScan::Invalid {
            kind: ErrorKind::InvalidNumericCharacter(value),
        },
    }
}

fn scan_named_reference(rest: &str) -> EntityScan {
    let bytes = rest.as_bytes();
    let mut end = 1;
    while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
        end += 1;
    }
    if end == 1 || bytes.get(end) != Some(&b';') {
        return EntityScan::NoMatch;
    }
    let name = &rest[1..end];
    match lookup_entity(name) {
        Some(replacement) => EntityScan::Replacement {
            text: replacement.to_string(),
            len: end + 1,
        },
        None => EntityScan::Invalid {
            kind: ErrorKind::UnknownHtmlEntityName(name.to_string()),
        },
    }
}

/// Looks up an HTML5 entity name (without `&` and `;`) in the registry,
/// returning its replacement text.
pub(crate) fn lookup_entity(name: &str) -> Option<&'static str> {
    static TABLE: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    let table = TABLE.get_or_init(|| {
        let mut table = HashMap::with_capacity(ENTITIES.len());
        for entity in ENTITIES.iter() {
            if let Some(name) = entity
                .entity
                .strip_prefix('&')
                .and_then(|e| e.strip_suffix(';'))
            {
                table.insert(name, entity.characters);
            }
        }
        table
    });
    table.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escaped_punctuation() {
        assert_eq!(scan_escaped("\\*x"), Some(('*', 2)));
        assert_eq!(scan_escaped("\\["), Some(('[', 2)));
        assert_eq!(scan_escaped("\\a"), None);
        assert_eq!(scan_escaped("\\"), None);
    }

    #[test]
    fn test_named_entity() {
        assert_eq!(
            scan_entity("&amp;x"),
            EntityScan::Replacement {
                text: "&".to_string(),
                len: 5
            }
        );
    }

    #[test]
    fn test_unknown_entity_name() {
        assert_eq!(
            scan_entity("&bogus;"),
            EntityScan::Invalid {
                kind: ErrorKind::UnknownHtmlEntityName("bogus".to_string())
            }
        );
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(
            scan_entity("&#60;"),
            EntityScan::Replacement {
                text: "<".to_string(),
                len: 5
            }
        );
        assert_eq!(
            scan_entity("&#x3C;"),
            EntityScan::Replacement {
                text: "<".to_string(),
                len: 6
            }
        );
    }

    #[test]
    fn test_numeric_reference_out_of_range() {
        assert_eq!(
            scan_entity("&#0;"),
            EntityScan::Invalid {
                kind: ErrorKind::InvalidNumericCharacter(0)
            }
        );
        assert!(matches!(
            scan_entity("&#1114112;"),
            EntityScan::Invalid {
                kind: ErrorKind::InvalidNumericCharacter(_)
            }
        ));
    }

    #[test]
    fn test_bare_ampersand_is_not_a_reference() {
        assert_eq!(scan_entity("& x"), EntityScan::NoMatch);
        assert_eq!(scan_entity("&amp x"), EntityScan::NoMatch);
        assert_eq!(scan_entity("&#;"), EntityScan::NoMatch);
    }

    #[test]
    fn test_transparent_classes() {
        assert!(is_transparent(' '));
        assert!(is_transparent('('));
        assert!(is_transparent('—'));
        assert!(!is_transparent('*'));
        assert!(is_markup_char('`'));
        assert!(is_frame_constituent('^'));
    }
}
