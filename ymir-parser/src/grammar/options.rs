//! `option_args`, `option_pair`, `option_value`.

use crate::cursor::TokenCursor;
use indexmap::IndexMap;
use ymir_ast::{OptionMap, OptionValue};
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;

/// Bare keyword used directly as an option value, e.g. `defaultAccess:
/// authenticated` or `type: string` — the grammar's loosely-named
/// `type_kw` terminal, generalized to every value-shaped keyword.
fn bare_keyword_value(kind: TokenKind) -> Option<&'static str> {
    match kind {
        TokenKind::Public => Some("public"),
        TokenKind::Authenticated => Some("authenticated"),
        TokenKind::Any => Some("any"),
        TokenKind::StringType => Some("string"),
        TokenKind::Float => Some("float"),
        TokenKind::Int => Some("int"),
        TokenKind::BooleanType => Some("boolean"),
        TokenKind::Datetime => Some("datetime"),
        TokenKind::Date => Some("date"),
        TokenKind::Time => Some("time"),
        TokenKind::Header => Some("header"),
        TokenKind::Body => Some("body"),
        TokenKind::Query => Some("query"),
        _ => None,
    }
}

/// Parses a parenthesized `option_args` list: `"(" option_args ")"`.
pub fn parse_paren_option_args(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> OptionMap {
    cursor.match_kind(TokenKind::LParen, false, None, sink);
    let args = parse_option_args(cursor, sink, TokenKind::RParen);
    cursor.match_kind(TokenKind::RParen, false, Some("close the option list"), sink);
    args
}

/// `option_args := option_pair { "," option_pair }`, stopping at `stop`
/// (the caller's closing delimiter) without consuming it.
pub fn parse_option_args(
    cursor: &mut TokenCursor,
    sink: &mut DiagnosticSink,
    stop: TokenKind,
) -> OptionMap {
    let mut map: OptionMap = IndexMap::new();
    if cursor.peek_kind() == stop || cursor.is_eof() {
        return map;
    }
    loop {
        let (key, value) = parse_option_pair(cursor, sink);
        map.insert(key, value);
        if cursor.peek_kind() == TokenKind::Comma {
            cursor.advance();
            continue;
        }
        break;
    }
    map
}

/// `option_pair := IDENT ":" option_value`.
fn parse_option_pair(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> (String, OptionValue) {
    let name = cursor
        .match_kind(TokenKind::Ident, false, Some("name this option"), sink)
        .map(|t| t.text)
        .unwrap_or_default();
    cursor.match_kind(TokenKind::Colon, false, None, sink);
    let value = parse_option_value(cursor, sink);
    (name, value)
}

/// `option_value := STRING | NUMBER | BOOL | type_kw | "@" IDENT {"." IDENT}
/// | "{" option_args "}" | "[" option_value {"," option_value} "]"`.
pub fn parse_option_value(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> OptionValue {
    match cursor.peek_kind() {
        TokenKind::Str => {
            let tok = cursor.advance();
            OptionValue::String(tok.string_value().unwrap_or_default().to_string())
        }
        TokenKind::Number => {
            let tok = cursor.advance();
            OptionValue::Number(tok.number_value().unwrap_or_default())
        }
        TokenKind::Bool => {
            let tok = cursor.advance();
            OptionValue::Bool(tok.bool_value().unwrap_or_default())
        }
        TokenKind::At => {
            cursor.advance();
            let name = cursor
                .match_kind(TokenKind::Ident, false, None, sink)
                .map(|t| t.text)
                .unwrap_or_default();
            let mut path = Vec::new();
            while cursor.peek_kind() == TokenKind::Dot {
                cursor.advance();
                if let Some(tok) = cursor.match_kind(TokenKind::Ident, false, None, sink) {
                    path.push(tok.text);
                }
            }
            OptionValue::GlobalVariable { name, path }
        }
        TokenKind::LBrace => {
            cursor.advance();
            let map = parse_option_args(cursor, sink, TokenKind::RBrace);
            cursor.match_kind(TokenKind::RBrace, false, None, sink);
            OptionValue::Map(map)
        }
        TokenKind::LBracket => {
            cursor.advance();
            let mut items = Vec::new();
            if cursor.peek_kind() != TokenKind::RBracket {
                loop {
                    items.push(parse_option_value(cursor, sink));
                    if cursor.peek_kind() == TokenKind::Comma {
                        cursor.advance();
                        continue;
                    }
                    break;
                }
            }
            cursor.match_kind(TokenKind::RBracket, false, None, sink);
            OptionValue::List(items)
        }
        kind => {
            if let Some(word) = bare_keyword_value(kind) {
                cursor.advance();
                OptionValue::String(word.to_string())
            } else {
                let found = cursor.peek().clone();
                sink.error(
                    found.position,
                    format!("expected an option value, found {:?} ('{}')", found.kind, found.text),
                );
                cursor.advance();
                OptionValue::String(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ymir_lexer::tokenize;

    fn parse(src: &str) -> (OptionValue, usize) {
        let result = tokenize(src, None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let value = parse_option_value(&mut cursor, &mut sink);
        (value, sink.error_count())
    }

    #[test]
    fn parses_global_variable_path() {
        let (value, errs) = parse("@env.PORT");
        assert_eq!(errs, 0);
        match value {
            OptionValue::GlobalVariable { name, path } => {
                assert_eq!(name, "env");
                assert_eq!(path, vec!["PORT".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_nested_map_and_list() {
        let result = tokenize("{ a: 1, b: [1, 2, 3] }", None);
        let mut cursor = TokenCursor::new(&result.tokens);
        let mut sink = DiagnosticSink::new();
        let value = parse_option_value(&mut cursor, &mut sink);
        assert_eq!(sink.error_count(), 0);
        let map = value.as_map().unwrap();
        assert_eq!(map.get("a").unwrap().as_number(), Some(1.0));
        assert_eq!(map.get("b").unwrap().as_list().unwrap().len(), 3);
    }

    #[test]
    fn bare_keyword_becomes_string_value() {
        let (value, errs) = parse("authenticated");
        assert_eq!(errs, 0);
        assert_eq!(value.as_str(), Some("authenticated"));
    }
}
