//! Diagnostic accumulation and (optional) human-readable rendering.
//!
//! [`DiagnosticSink`] is the core, I/O-free record/query surface every other
//! crate depends on: lexer, parser, and emitters all push [`Diagnostic`]s
//! into a sink they're handed, never owning one themselves. Pretty-printing
//! with underlined source spans is a separate concern (see [`render`]) kept
//! out of the hot path.

pub mod render;

use serde::{Deserialize, Serialize};
use ymir_span::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub position: SourcePosition,
    pub message: String,
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(position: SourcePosition, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            position,
            message: message.into(),
            hint: None,
        }
    }

    pub fn warning(position: SourcePosition, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            position,
            message: message.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Accumulates diagnostics in insertion order and reports counts.
///
/// The sink never panics and never drops a diagnostic; callers decide what
/// to do with an error count (abort under `CancelOnFirstError`, or keep
/// going under `IgnoreErrors` — see `ymir-parser`).
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.push(Diagnostic::error(position, message));
    }

    pub fn warning(&mut self, position: SourcePosition, message: impl Into<String>) {
        self.push(Diagnostic::warning(position, message));
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_span::SourceSpan;

    fn pos() -> SourcePosition {
        SourcePosition::single_line(None, SourceSpan::new(0, 1), 1, 1, 2)
    }

    #[test]
    fn counts_split_by_severity() {
        let mut sink = DiagnosticSink::new();
        sink.error(pos(), "bad token");
        sink.warning(pos(), "unused import");
        sink.error(pos(), "unexpected eof");

        assert_eq!(sink.error_count(), 2);
        assert_eq!(sink.warning_count(), 1);
        assert!(sink.has_errors());
    }

    #[test]
    fn insertion_order_preserved() {
        let mut sink = DiagnosticSink::new();
        sink.error(pos(), "first");
        sink.error(pos(), "second");
        let messages: Vec<_> = sink.diagnostics().iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }
}
