//! `auth_block` and `authenticate`.
//!
//! ```text
//! auth_block   := "auth" IDENT [ "(" option_args ")" ] [ "as" IDENT ]
//!               | "auth" IDENT "as" IDENT [ "(" option_args ")" ] ";"
//! authenticate := "authenticate" [ IDENT ] [ "with" ( STRING | "[" STRING { "," STRING } "]" ) ]
//! ```

use crate::grammar::options::parse_paren_option_args;
use crate::cursor::TokenCursor;
use ymir_ast::auth::{AuthBlock, AuthSource, AuthType, AuthenticateClause};
use ymir_diagnostics::DiagnosticSink;
use ymir_lexer::token::TokenKind;

fn parse_auth_type(text: &str, sink: &mut DiagnosticSink, position: ymir_span::SourcePosition) -> AuthType {
    let normalized: String = text.chars().filter(|c| *c != '-').collect::<String>().to_ascii_lowercase();
    match normalized.as_str() {
        "apikey" => AuthType::ApiKey,
        "bearer" => AuthType::Bearer,
        _ => {
            sink.error(position, format!("unknown auth type '{text}', expected ApiKey or Bearer"));
            AuthType::ApiKey
        }
    }
}

fn parse_auth_source(text: &str) -> Option<AuthSource> {
    match text {
        "header" => Some(AuthSource::Header),
        "body" => Some(AuthSource::Body),
        "query" => Some(AuthSource::Query),
        _ => None,
    }
}

pub fn parse_auth_block(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> AuthBlock {
    let start = cursor.match_kind(TokenKind::Auth, false, None, sink);
    let start_pos = start.map(|t| t.position);

    let type_tok = cursor.match_kind(TokenKind::Ident, false, Some("name the auth type: ApiKey or Bearer"), sink);
    let (auth_type, mut position) = match type_tok {
        Some(tok) => (parse_auth_type(&tok.text, sink, tok.position), tok.position),
        None => (AuthType::ApiKey, start_pos.unwrap_or(ymir_span::SourcePosition::single_line(None, ymir_span::SourceSpan::new(0, 0), 1, 1, 1))),
    };
    if let Some(p) = start_pos {
        position = ymir_span::SourcePosition::merge(p, position);
    }

    let mut options = indexmap::IndexMap::new();
    let mut alias = None;

    // Either order is legal: `(options) [as alias]` or `as alias [(options)]`.
    if cursor.peek_kind() == TokenKind::LParen {
        options = parse_paren_option_args(cursor, sink);
    }
    if cursor.peek_kind() == TokenKind::As {
        cursor.advance();
        if let Some(tok) = cursor.match_kind(TokenKind::Ident, false, Some("name this auth block"), sink) {
            alias = Some(tok.text);
        }
        if cursor.peek_kind() == TokenKind::LParen {
            options = parse_paren_option_args(cursor, sink);
        }
    }
    cursor.match_kind(TokenKind::Semicolon, false, Some("terminate the auth block with ';'"), sink);

    let source = match options.get("source").and_then(|v| v.as_str()).and_then(parse_auth_source) {
        Some(s) => s,
        None => {
            sink.error(position, "auth block is missing a 'source' option (header|body|query)");
            AuthSource::Header
        }
    };
    let field = match options.get("field").and_then(|v| v.as_str()) {
        Some(f) => f.to_string(),
        None => {
            sink.error(position, "auth block is missing a 'field' option");
            String::new()
        }
    };
    if auth_type == AuthType::Bearer && source == AuthSource::Body {
        sink.error(position, "Bearer auth cannot source its token from the request body");
    }

    let is_default_access = match options.get("defaultAccess").and_then(|v| v.as_str()) {
        Some("authenticated") => true,
        Some("public") | None => false,
        Some(other) => {
            sink.error(position, format!("invalid defaultAccess value '{other}', expected public or authenticated"));
            false
        }
    };

    AuthBlock {
        auth_type,
        source,
        field,
        alias,
        is_default_access,
        options,
        authorization_in_use: false,
        position,
    }
}

pub fn parse_authenticate(cursor: &mut TokenCursor, sink: &mut DiagnosticSink) -> AuthenticateClause {
    let kw = cursor.match_kind(TokenKind::Authenticate, false, None, sink);
    let mut position = kw.map(|t| t.position).unwrap_or(ymir_span::SourcePosition::single_line(None, ymir_span::SourceSpan::new(0, 0), 1, 1, 1));

    let auth_block_identity = if cursor.peek_kind() == TokenKind::Ident {
        Some(cursor.advance().text)
    } else {
        None
    };

    let authorize_roles = if cursor.peek_kind() == TokenKind::With {
        cursor.advance();
        if cursor.peek_kind() == TokenKind::LBracket {
            cursor.advance();
            let mut roles = Vec::new();
            if cursor.peek_kind() != TokenKind::RBracket {
                loop {
                    if let Some(tok) = cursor.match_kind(TokenKind::Str, false, Some("name a role"), sink) {
                        roles.push(tok.string_value().unwrap_or_default().to_string());
                    }
                    if cursor.peek_kind() == TokenKind::Comma {
                        cursor.advance();
                        continue;
                    }
                    break;
                }
            }
            if let Some(tok) = cursor.match_kind(TokenKind::RBracket, false, None, sink) {
                position = ymir_span::SourcePosition::merge(position, tok.position);
            }
            Some(roles)
        } else if let Some(tok) = cursor.match_kind(TokenKind::Str, false, Some("name a role"), sink) {
            position = ymir_span::SourcePosition::merge(position, tok.position);
            Some(vec![tok.string_value().unwrap_or_default().to_string()])
        } else {
            Some(Vec::new())
        }
    } else {
        None
    };

    AuthenticateClause {
        auth_block_identity,
        authorize_roles,
        position,
    }
}
