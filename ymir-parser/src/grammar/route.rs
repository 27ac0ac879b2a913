//! `route := METHOD path { header | body | authenticate | response | render } ";"`.

use std::collections::HashMap;

use crate::cursor::TokenCursor;
use crate::grammar::auth::parse_authenticate;
use crate::grammar::options::parse_paren_option_args;
use crate::grammar::path::parse_path;
use crate::grammar::render::parse_render;
use ymir_ast::method::Method;
use ymir_ast::route::Route;
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;
use ymir_span::SourcePosition;

fn method_from_kind(kind: TokenKind) -> Option<Method> {
    match kind {
        TokenKind::Get => Some(Method::Get),
        TokenKind::Post => Some(Method::Post),
        TokenKind::Put => Some(Method::Put),
        TokenKind::Delete => Some(Method::Delete),
        TokenKind::Patch => Some(Method::Patch),
        TokenKind::Head => Some(Method::Head),
        TokenKind::Options => Some(Method::Options),
        _ => None,
    }
}

pub fn parse_route(
    cursor: &mut TokenCursor,
    sink: &mut DiagnosticSink,
    comments: &HashMap<u32, String>,
) -> Route {
    let method_tok = cursor.advance();
    let method = method_from_kind(method_tok.kind).unwrap_or(Method::Get);
    let mut position = method_tok.position;

    let path = parse_path(cursor, sink);

    let mut header = None;
    let mut body = None;
    let mut authenticate = None;
    let mut response = None;
    let mut is_response_plural = None;
    let mut render = None;

    loop {
        match cursor.peek_kind() {
            TokenKind::Header => {
                cursor.advance();
                header = Some(parse_paren_option_args(cursor, sink));
            }
            TokenKind::Body => {
                cursor.advance();
                body = Some(parse_paren_option_args(cursor, sink));
            }
            TokenKind::Authenticate => {
                authenticate = Some(parse_authenticate(cursor, sink));
            }
            TokenKind::Response | TokenKind::Responses => {
                is_response_plural = Some(cursor.peek_kind() == TokenKind::Responses);
                cursor.advance();
                response = Some(parse_paren_option_args(cursor, sink));
            }
            TokenKind::Render => {
                render = Some(parse_render(cursor, sink));
            }
            _ => break,
        }
    }

    if let Some(semi) = cursor.match_kind(TokenKind::Semicolon, false, Some("terminate the route with ';'"), sink) {
        position = SourcePosition::merge(position, semi.position);
    }

    let description = if position.line_start > 0 {
        comments.get(&(position.line_start - 1)).cloned()
    } else {
        None
    };

    Route {
        method,
        path,
        header,
        body,
        response,
        authenticate,
        description,
        is_response_plural,
        render,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_lexer::tokenize;

    #[test]
    fn parses_get_with_query_and_response() {
        let src = "GET /hello?name=string as Hello response(name: string);";
        let result = tokenize(src, None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let route = parse_route(&mut cursor, &mut sink, &result.comments);
        assert_eq!(sink.error_count(), 0);
        assert_eq!(route.method, Method::Get);
        assert_eq!(route.path.alias.as_deref(), Some("Hello"));
        assert_eq!(route.is_response_plural, Some(false));
        assert!(route.response.is_some());
    }

    #[test]
    fn picks_up_preceding_comment_as_description() {
        let src = "// creates a widget\nPOST /widgets;";
        let result = tokenize(src, None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let route = parse_route(&mut cursor, &mut sink, &result.comments);
        assert_eq!(route.description.as_deref(), Some("creates a widget"));
    }
}
