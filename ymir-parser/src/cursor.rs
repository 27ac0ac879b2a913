//! A one-token-lookahead cursor over an already-lexed token stream.
//!
//! Mirrors the shape of `ymir_lexer::cursor::Cursor` one level up: instead
//! of characters, it walks `Token`s, and instead of silently recovering it
//! pushes a diagnostic through `match_kind` when the grammar's expectation
//! isn't met, then synthesizes a token so the caller can keep parsing.

use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::{Token, TokenKind, TokenPayload};
use ymir_span::{SourcePosition, SourceSpan};

pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn peek_at(&self, offset: usize) -> &Token {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    pub fn is_eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Unconditionally consumes and returns the current token.
    pub fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// Consumes the current token if its kind is `kind`. In non-optional
    /// mode, a mismatch is recorded on `sink` with `hint` (if given) and a
    /// synthetic token of the expected kind is returned so the grammar can
    /// keep descending. In optional mode a mismatch returns `None` and
    /// consumes nothing.
    pub fn match_kind(
        &mut self,
        kind: TokenKind,
        optional: bool,
        hint: Option<&str>,
        sink: &mut DiagnosticSink,
    ) -> Option<Token> {
        if self.peek_kind() == kind {
            return Some(self.advance());
        }
        if optional {
            return None;
        }
        let found = self.peek().clone();
        let mut diag = ymir_diagnostics::Diagnostic::error(
            found.position,
            format!("expected {kind:?}, found {:?} ('{}')", found.kind, found.text),
        );
        if let Some(hint) = hint {
            diag = diag.with_hint(hint);
        }
        sink.push(diag);
        Some(synthetic(kind, found.position))
    }
}

/// A zero-width token of the requested `kind`, used to let the parser keep
/// descending after a `match_kind` failure.
pub fn synthetic(kind: TokenKind, position: SourcePosition) -> Token {
    let zero_width = SourcePosition::single_line(
        position.file,
        SourceSpan::new(position.span.start, 0),
        position.line_start,
        position.col_start,
        position.col_start,
    );
    Token::new(kind, zero_width, "").with_payload(TokenPayload::None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_lexer::tokenize;

    #[test]
    fn advance_walks_tokens_in_order() {
        let result = tokenize("target T;", None);
        let mut cursor = TokenCursor::new(&result.tokens);
        assert_eq!(cursor.advance().kind, TokenKind::Target);
        assert_eq!(cursor.advance().kind, TokenKind::Ident);
        assert_eq!(cursor.advance().kind, TokenKind::Semicolon);
        assert_eq!(cursor.peek_kind(), TokenKind::Eof);
    }

    #[test]
    fn match_kind_recovers_with_synthetic_token() {
        let result = tokenize("target ;", None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        cursor.advance();
        let ident = cursor.match_kind(TokenKind::Ident, false, Some("name the target"), &mut sink);
        assert_eq!(ident.unwrap().kind, TokenKind::Ident);
        assert_eq!(sink.error_count(), 1);
        assert_eq!(cursor.peek_kind(), TokenKind::Semicolon);
    }
}
