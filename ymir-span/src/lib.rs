//! Source location model shared by tokens, diagnostics, and AST nodes.
//!
//! `FileId` is a cheap, `Copy` handle into a [`FileRegistry`] rather than an
//! owned path threaded through every token. `SourceSpan` stores a byte offset
//! and length (derived end offset); `SourcePosition` additionally carries the
//! line/column range a span covers plus the file it came from.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// Interned handle to a source file. `None`-able sites use `Option<FileId>`
/// rather than a sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(u32);

/// Registers source files and hands out stable [`FileId`]s.
///
/// The registry only tracks paths; it does not cache file contents. Callers
/// that need to reload text (diagnostic rendering) do so on demand through a
/// `SourceReader`-shaped collaborator so this crate stays free of I/O.
#[derive(Debug, Default)]
pub struct FileRegistry {
    paths: Vec<PathBuf>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `path`, returning its existing id if already registered.
    pub fn intern(&mut self, path: impl AsRef<Path>) -> FileId {
        let path = path.as_ref();
        if let Some(idx) = self.paths.iter().position(|p| p == path) {
            return FileId(idx as u32);
        }
        self.paths.push(path.to_path_buf());
        FileId((self.paths.len() - 1) as u32)
    }

    pub fn path(&self, id: FileId) -> &Path {
        &self.paths[id.0 as usize]
    }
}

/// Byte-offset span within a single source file: a start offset and a
/// length. The end offset is derived, never stored redundantly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    pub start: u32,
    pub len: u32,
}

impl SourceSpan {
    pub fn new(start: u32, len: u32) -> Self {
        Self { start, len }
    }

    pub fn end(&self) -> u32 {
        self.start + self.len
    }

    /// Merges two spans in the same file into their enclosing span.
    pub fn merge(a: SourceSpan, b: SourceSpan) -> SourceSpan {
        let start = a.start.min(b.start);
        let end = a.end().max(b.end());
        SourceSpan::new(start, end - start)
    }
}

/// Full positional information for a token/diagnostic/AST node: the file it
/// belongs to (if known), the byte span, and the line/column range that span
/// occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: Option<FileId>,
    pub span: SourceSpan,
    /// 1-based inclusive start line.
    pub line_start: u32,
    /// 1-based inclusive end line.
    pub line_end: u32,
    /// 1-based inclusive start column.
    pub col_start: u32,
    /// 1-based inclusive end column.
    pub col_end: u32,
}

impl SourcePosition {
    pub fn single_line(file: Option<FileId>, span: SourceSpan, line: u32, col_start: u32, col_end: u32) -> Self {
        Self {
            file,
            span,
            line_start: line,
            line_end: line,
            col_start,
            col_end,
        }
    }

    /// Merges two positions from the same file into their enclosing range.
    pub fn merge(a: SourcePosition, b: SourcePosition) -> SourcePosition {
        SourcePosition {
            file: a.file.or(b.file),
            span: SourceSpan::merge(a.span, b.span),
            line_start: a.line_start.min(b.line_start),
            line_end: a.line_end.max(b.line_end),
            col_start: if a.line_start <= b.line_start { a.col_start } else { b.col_start },
            col_end: if a.line_end >= b.line_end { a.col_end } else { b.col_end },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_dedupes_paths() {
        let mut reg = FileRegistry::new();
        let a = reg.intern("main.ymr");
        let b = reg.intern("main.ymr");
        let c = reg.intern("sub.ymr");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(reg.path(a), Path::new("main.ymr"));
    }

    #[test]
    fn span_end_is_derived() {
        let s = SourceSpan::new(10, 5);
        assert_eq!(s.end(), 15);
    }

    #[test]
    fn span_merge_covers_both() {
        let a = SourceSpan::new(10, 5);
        let b = SourceSpan::new(20, 3);
        let m = SourceSpan::merge(a, b);
        assert_eq!(m.start, 10);
        assert_eq!(m.end(), 23);
    }
}
