//! Block-level parsing.
//!
//! The block pass recognises block constructs under the reference-indentation
//! discipline, registers reference definitions, and emits blocks whose inline
//! content is preserved as unparsed [`Isp`] runs for the second pass.

use crate::ast::Block;
use crate::diagnostics::{Diagnostic, SourcePos};
use crate::metadata;
use crate::parser::Isp;
use crate::parser::cursor::Cursor;

mod blockquotes;
mod code_blocks;
mod headings;
mod indented_code;
mod lists;
mod paragraphs;
pub(crate) mod reference_definitions;
mod thematic_breaks;

pub(crate) use reference_definitions::ReferenceRegistry;

/// The column at which indented code starts inside reference column `r`.
pub(crate) fn ilevel(ref_level: u32) -> u32 {
    ref_level + 4
}

/// The reference level for the inner content of a list item or blockquote:
/// the actual indentation, unless it is deep enough to be indented code.
pub(crate) fn slevel(min_level: u32, ind_level: u32) -> u32 {
    if ind_level >= ilevel(min_level) {
        min_level
    } else {
        ind_level
    }
}

/// Everything the block pass produces: the (possibly absent) front matter
/// value, the block skeleton with unparsed inline runs, the document-global
/// reference table, and the diagnostics registered along the way.
#[derive(Debug)]
pub(crate) struct Skeleton {
    pub yaml: Option<serde_json::Value>,
    pub blocks: Vec<Block<Isp>>,
    pub defs: ReferenceRegistry,
    pub registered: Vec<Diagnostic>,
}

pub(crate) struct BlockParser<'a> {
    cursor: Cursor<'a>,
    file: &'a str,
    /// Column below which content is outside the current container.
    ref_level: u32,
    /// Whether paragraphs in this container may be emitted as `Naked`.
    allow_naked: bool,
    defs: ReferenceRegistry,
    /// Non-fatal diagnostics registered during the pass.
    registered: Vec<Diagnostic>,
}

impl<'a> BlockParser<'a> {
    pub fn new(file: &'a str, input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            file,
            ref_level: 1,
            allow_naked: false,
            defs: ReferenceRegistry::new(),
            registered: Vec::new(),
        }
    }

    /// Runs the whole block pass: optional YAML front matter, then blocks
    /// until end of input.
    pub fn parse(mut self) -> Result<Skeleton, Vec<Diagnostic>> {
        let (yaml, yaml_diag) = metadata::parse_front_matter(&mut self.cursor, self.file);
        match self.parse_blocks() {
            Ok(mut blocks) => {
                if let Some(diag) = yaml_diag {
                    blocks.insert(0, Block::Naked(Isp::Error(diag)));
                }
                Ok(Skeleton {
                    yaml,
                    blocks,
                    defs: self.defs,
                    registered: self.registered,
                })
            }
            Err(fatal) => {
                let mut errs = self.registered;
                errs.extend(yaml_diag);
                errs.push(fatal);
                Err(errs)
            }
        }
    }

    /// Parses blocks until end of input or until the indentation falls below
    /// the current reference level (which ends the enclosing container).
    fn parse_blocks(&mut self) -> Result<Vec<Block<Isp>>, Diagnostic> {
        let mut blocks = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_at_end() || self.cursor.column() < self.ref_level {
                break;
            }
            if let Some(block) = self.parse_block()? {
                blocks.push(block);
            }
        }
        Ok(blocks)
    }

    /// Dispatches on the construct opening at the cursor. Returns `None` for
    /// a reference definition, which produces no block.
    fn parse_block(&mut self) -> Result<Option<Block<Isp>>, Diagnostic> {
        let alevel = self.cursor.column();
        log::debug!(
            "block at {}:{} (ref level {})",
            self.cursor.line(),
            alevel,
            self.ref_level
        );
        if alevel >= ilevel(self.ref_level) {
            return self.parse_indented_code_block().map(Some);
        }
        let line = self.cursor.rest_of_line();
        if thematic_breaks::try_parse_thematic_break(line).is_some() {
            self.cursor.consume_line();
            return Ok(Some(Block::ThematicBreak));
        }
        if line.starts_with('#') {
            return self.parse_atx_heading().map(Some);
        }
        if let Some(open) = code_blocks::try_parse_fence_open(line) {
            return self.parse_fenced_code_block(open).map(Some);
        }
        if let Some(bullet) = lists::try_parse_bullet(line) {
            return self.parse_unordered_list(bullet).map(Some);
        }
        if let Some(index) = lists::try_parse_index(line) {
            return self.parse_ordered_list(index).map(Some);
        }
        if line.starts_with('>') {
            return self.parse_blockquote().map(Some);
        }
        if self.try_parse_reference_definition()? {
            return Ok(None);
        }
        self.parse_paragraph().map(Some)
    }

    /// Runs `f` with the given scope, restoring the surrounding reference
    /// level and naked-paragraph permission afterwards. The reference table
    /// is document-global and not restored.
    fn sub_env<T>(
        &mut self,
        allow_naked: bool,
        ref_level: u32,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = (self.allow_naked, self.ref_level);
        self.allow_naked = allow_naked;
        self.ref_level = ref_level;
        let out = f(self);
        (self.allow_naked, self.ref_level) = saved;
        out
    }

    fn pos_here(&self) -> SourcePos {
        SourcePos::new(self.file, self.cursor.line(), self.cursor.column())
    }

    /// Registers a non-fatal diagnostic; the pass keeps going, the overall
    /// parse result becomes `Err`.
    fn register(&mut self, diagnostic: Diagnostic) {
        log::debug!("registered diagnostic: {diagnostic}");
        self.registered.push(diagnostic);
    }

    fn unexpected_here(&self, expected: &[&str]) -> Diagnostic {
        Diagnostic::unexpected(
            self.pos_here(),
            self.cursor.peek().map(|c| c.to_string()),
            expected.iter().map(|s| s.to_string()).collect(),
        )
    }
}
