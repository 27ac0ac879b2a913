//! `path := "/" {...} ["?" query_param {"&" query_param}] ["as" IDENT]`.
//!
//! The `/...` portion is already a single `Path` token by the time it
//! reaches the parser (`ymir_lexer::rules::PathRule`); only the trailing
//! `?query&query` and `as alias` suffix is grammar-level.

use std::collections::HashSet;

use crate::cursor::TokenCursor;
use ymir_ast::path::{Path, QueryParamType, QueryParameter};
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;
use ymir_span::SourcePosition;

pub fn parse_path(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> Path {
    let raw = cursor
        .match_kind(TokenKind::Path, false, Some("expected a path starting with '/'"), sink)
        .map(|t| match t.string_value() {
            Some(unescaped) => unescaped.to_string(),
            None => t.text.clone(),
        })
        .unwrap_or_else(|| "/".to_string());
    let mut path = Path::new(raw);

    if cursor.peek_kind() == TokenKind::Question {
        cursor.advance();
        let mut seen_names = HashSet::new();
        push_query_param(cursor, sink, &mut path, &mut seen_names);
        while cursor.peek_kind() == TokenKind::Amp {
            cursor.advance();
            push_query_param(cursor, sink, &mut path, &mut seen_names);
        }
    }

    if cursor.peek_kind() == TokenKind::As {
        cursor.advance();
        if let Some(tok) = cursor.match_kind(TokenKind::Ident, false, Some("name this alias"), sink) {
            path.alias = Some(tok.text);
        }
    }

    path
}

/// Parses one query parameter and appends it to `path`, reporting a
/// diagnostic instead when its name repeats one already seen on this path.
fn push_query_param(cursor: &mut TokenCursor, sink: &mut DiagnosticSink, path: &mut Path, seen_names: &mut HashSet<String>) {
    let (param, position) = parse_query_param(cursor, sink);
    if !seen_names.insert(param.name.clone()) {
        sink.error(position, format!("duplicate query parameter name '{}'", param.name));
        return;
    }
    path.query_params.push(param);
}

/// `query_param := IDENT "=" type_kw`.
fn parse_query_param(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> (QueryParameter, SourcePosition) {
    let position = cursor.peek().position;
    let name = cursor
        .match_kind(TokenKind::Ident, false, Some("name this query parameter"), sink)
        .map(|t| t.text)
        .unwrap_or_default();
    cursor.match_kind(TokenKind::Equals, false, None, sink);
    let param_type = parse_query_param_type(cursor, sink);
    (QueryParameter { name, param_type }, position)
}

fn parse_query_param_type(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> QueryParamType {
    let kind = cursor.peek_kind();
    let param_type = match kind {
        TokenKind::Any => Some(QueryParamType::Any),
        TokenKind::StringType => Some(QueryParamType::String),
        TokenKind::Int => Some(QueryParamType::Int),
        TokenKind::Float => Some(QueryParamType::Float),
        TokenKind::BooleanType => Some(QueryParamType::Bool),
        TokenKind::Date => Some(QueryParamType::Date),
        TokenKind::Datetime => Some(QueryParamType::DateTime),
        TokenKind::Time => Some(QueryParamType::Time),
        _ => None,
    };
    match param_type {
        Some(t) => {
            cursor.advance();
            t
        }
        None => {
            let found = cursor.peek().clone();
            sink.error(
                found.position,
                format!("unknown query parameter type: {:?} ('{}')", found.kind, found.text),
            );
            QueryParamType::Any
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_lexer::tokenize;

    fn parse_src(src: &str) -> (Path, usize) {
        let result = tokenize(src, None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let path = parse_path(&mut cursor, &mut sink);
        (path, sink.error_count())
    }

    #[test]
    fn parses_query_params_and_alias() {
        let (path, errs) = parse_src("/hello?name=string&age=int as Hello");
        assert_eq!(errs, 0);
        assert_eq!(path.raw, "/hello");
        assert_eq!(path.alias.as_deref(), Some("Hello"));
        assert_eq!(path.query_params.len(), 2);
        assert_eq!(path.query_params[0].name, "name");
        assert_eq!(path.query_params[1].param_type, QueryParamType::Int);
    }

    #[test]
    fn rejects_duplicate_query_parameter_names() {
        let (path, errs) = parse_src("/search?q=string&q=int");
        assert_eq!(errs, 1);
        assert_eq!(path.query_params.len(), 1);
        assert_eq!(path.query_params[0].name, "q");
        assert_eq!(path.query_params[0].param_type, QueryParamType::String);
    }

    #[test]
    fn parses_bare_path() {
        let (path, errs) = parse_src("/api/:id");
        assert_eq!(errs, 0);
        assert_eq!(path.raw, "/api/:id");
        assert!(path.query_params.is_empty());
        assert!(path.alias.is_none());
    }
}
