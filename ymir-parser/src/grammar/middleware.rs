//! `middleware := "use" IDENT [ "(" option_args ")" ] ";"`.

use crate::cursor::TokenCursor;
use crate::grammar::options::parse_paren_option_args;
use ymir_ast::middleware::Middleware;
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;

pub fn parse_middleware(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> Middleware {
    let kw = cursor.match_kind(TokenKind::Use, false, None, sink);
    let mut position = kw.map(|t| t.position);
    let name_tok = cursor.match_kind(TokenKind::Ident, false, Some("name this middleware"), sink);
    let name = name_tok.as_ref().map(|t| t.text.clone()).unwrap_or_default();
    if let (Some(p), Some(n)) = (position, &name_tok) {
        position = Some(ymir_span::SourcePosition::merge(p, n.position));
    }
    let options = if cursor.peek_kind() == TokenKind::LParen {
        parse_paren_option_args(cursor, sink)
    } else {
        indexmap::IndexMap::new()
    };
    let semi = cursor.match_kind(TokenKind::Semicolon, false, Some("terminate with ';'"), sink);
    let position = match (position, semi) {
        (Some(p), Some(s)) => ymir_span::SourcePosition::merge(p, s.position),
        (Some(p), None) => p,
        (None, Some(s)) => s.position,
        (None, None) => ymir_span::SourcePosition::single_line(None, ymir_span::SourceSpan::new(0, 0), 1, 1, 1),
    };
    Middleware { name, options, position }
}
