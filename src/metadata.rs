//! YAML front matter parsing with position tracking.

use crate::diagnostics::{Diagnostic, ErrorKind, SourcePos};
use crate::parser::cursor::Cursor;

/// Consumes optional YAML front matter at the very start of the document:
/// a line trimming to `---`, content lines, and a line trimming to `---`
/// (or end of input). Returns the decoded value, or the diagnostic to attach
/// to the document when decoding fails.
///
/// A lone unterminated `---` with no content is left for the block parser,
/// which reads it as a thematic break.
pub(crate) fn parse_front_matter(
    cursor: &mut Cursor<'_>,
    file: &str,
) -> (Option<serde_json::Value>, Option<Diagnostic>) {
    let cp = cursor.checkpoint();
    if cursor.rest_of_line().trim_end() != "---" {
        return (None, None);
    }
    cursor.consume_line();

    let mut lines: Vec<String> = Vec::new();
    let mut closed = false;
    while !cursor.is_at_end() {
        let line = cursor.rest_of_line();
        if line.trim() == "---" {
            cursor.consume_line();
            closed = true;
            break;
        }
        lines.push(line.to_string());
        cursor.consume_line();
    }
    if !closed && lines.iter().all(|l| l.trim().is_empty()) {
        cursor.restore(cp);
        return (None, None);
    }

    let content = lines.join("\n");
    if content.trim().is_empty() {
        return (None, None);
    }
    log::debug!("decoding {} line(s) of YAML front matter", lines.len());
    match serde_saphyr::from_str::<serde_json::Value>(&content) {
        Ok(value) => (Some(value), None),
        Err(err) => {
            // the opening `---` occupies line 1, content starts on line 2
            let position = match err.location() {
                Some(location) => SourcePos::new(
                    file,
                    location.line() as u32 + 1,
                    (location.column() as u32).max(1),
                ),
                None => SourcePos::new(file, 1, 1),
            };
            let diag = Diagnostic::new(position, ErrorKind::YamlParseError(err.to_string()));
            (None, Some(diag))
        }
    }
}
