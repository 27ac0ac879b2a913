//! Human-readable rendering of diagnostics: file:line:column plus an
//! underlined source span with surrounding context.
//!
//! Kept free of `std::fs`: callers supply a [`SourceReader`] so the sink
//! crate itself never assumes a particular filesystem (mirrors the
//! `file-provider` decoupling used by the parser's include resolver).

use crate::Diagnostic;
use ymir_span::{FileId, FileRegistry};

/// Reloads the text of a previously-registered file, for diagnostic
/// rendering only. Implemented by the CLI with `std::fs::read_to_string`.
pub trait SourceReader {
    fn read(&self, file: FileId) -> std::io::Result<String>;
}

/// How many lines of context to print before/after the offending span.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub lines_before: usize,
    pub lines_after: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            lines_before: 5,
            lines_after: 1,
        }
    }
}

/// Renders one diagnostic as a multi-line human-readable report.
///
/// Format:
/// ```text
/// error: message
///   --> path/to/file.ymr:3:7
///    1 | router /api {
///    2 |   GET /hello;
///    3 |   GET /bad-route?;
///      |       ^^^
/// hint: ...
/// ```
pub fn render_diagnostic(
    diagnostic: &Diagnostic,
    files: &FileRegistry,
    reader: &dyn SourceReader,
    opts: RenderOptions,
) -> String {
    let severity = match diagnostic.severity {
        crate::Severity::Error => "error",
        crate::Severity::Warning => "warning",
    };

    let mut out = format!("{severity}: {}\n", diagnostic.message);

    let Some(file) = diagnostic.position.file else {
        if let Some(hint) = &diagnostic.hint {
            out.push_str(&format!("hint: {hint}\n"));
        }
        return out;
    };

    let path = files.path(file).display();
    out.push_str(&format!(
        "  --> {path}:{}:{}\n",
        diagnostic.position.line_start, diagnostic.position.col_start
    ));

    if let Ok(text) = reader.read(file) {
        let lines: Vec<&str> = text.lines().collect();
        let target_line = diagnostic.position.line_start as usize;
        let start = target_line.saturating_sub(opts.lines_before).max(1);
        let end = (target_line + opts.lines_after).min(lines.len());

        let gutter_width = end.to_string().len();
        for line_no in start..=end {
            if let Some(line_text) = lines.get(line_no - 1) {
                out.push_str(&format!(
                    "{:>width$} | {}\n",
                    line_no,
                    line_text,
                    width = gutter_width
                ));
                if line_no == target_line {
                    let col = diagnostic.position.col_start as usize;
                    let underline_len = diagnostic
                        .position
                        .col_end
                        .saturating_sub(diagnostic.position.col_start)
                        .max(1) as usize;
                    out.push_str(&format!(
                        "{:>width$} | {}{}\n",
                        "",
                        " ".repeat(col.saturating_sub(1)),
                        "^".repeat(underline_len),
                        width = gutter_width
                    ));
                }
            }
        }
    }

    if let Some(hint) = &diagnostic.hint {
        out.push_str(&format!("hint: {hint}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Diagnostic;
    use std::collections::HashMap;
    use ymir_span::{SourcePosition, SourceSpan};

    struct MapReader(HashMap<FileId, String>);

    impl SourceReader for MapReader {
        fn read(&self, file: FileId) -> std::io::Result<String> {
            self.0
                .get(&file)
                .cloned()
                .ok_or_else(|| std::io::Error::other("missing"))
        }
    }

    #[test]
    fn renders_file_position_and_caret() {
        let mut files = FileRegistry::new();
        let fid = files.intern("main.ymr");
        let mut map = HashMap::new();
        map.insert(fid, "target T;\nrouter /api {\n  GET /bad?;\n}\n".to_string());
        let reader = MapReader(map);

        let pos = SourcePosition::single_line(Some(fid), SourceSpan::new(0, 1), 3, 7, 8);
        let diag = Diagnostic::error(pos, "unexpected token").with_hint("did you mean `/`?");

        let rendered = render_diagnostic(&diag, &files, &reader, RenderOptions::default());
        assert!(rendered.contains("error: unexpected token"));
        assert!(rendered.contains("main.ymr:3:7"));
        assert!(rendered.contains("^"));
        assert!(rendered.contains("hint: did you mean"));
    }
}
