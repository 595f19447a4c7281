//! Strict markdown parsing with positioned diagnostics.
//!
//! This crate parses a CommonMark-flavoured dialect (YAML front matter,
//! strikeout, subscript, superscript, and strictly validated reference
//! definitions) into a typed document tree. Unlike lenient markdown
//! parsers it does not silently fall back to literal text on malformed
//! input: problems are reported as diagnostics with 1-based source
//! positions, and a single pass carries every error it finds.
//!
//! ```rust
//! let doc = mmark::parse("intro.md", "# Hello *world*\n").unwrap();
//! assert_eq!(doc.blocks.len(), 1);
//! ```
//!
//! Failures collect into a non-empty, position-sorted list:
//!
//! ```rust
//! use mmark::ErrorKind;
//!
//! let errs = mmark::parse("x.md", "[missing]").unwrap_err();
//! assert!(matches!(
//!     errs[0].kind,
//!     ErrorKind::CouldNotFindReferenceDefinition { .. }
//! ));
//! ```

pub mod ast;
pub mod diagnostics;
mod metadata;
mod parser;

pub use ast::{Block, Document, HeadingLevel, Inline};
pub use diagnostics::{Diagnostic, ErrorKind, SourcePos};
pub use parser::parse;

#[cfg(debug_assertions)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
