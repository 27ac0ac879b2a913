//! Rule-driven tokenizer for the Ymir DSL.
//!
//! [`tokenize`] drives a [`cursor::Cursor`] through the priority-ordered
//! rule catalogue in [`rules`], producing a token stream terminated by an
//! `Eof` token plus a side-channel map of `line -> comment text` used later
//! by the parser to attach descriptions to routes.
//!
//! Lexer failures never abort the pass: an unmatched character becomes a
//! `Bad` token and the cursor advances one char (error recovery), exactly
//! as spec'd. The parser decides whether a `Bad` token becomes a reported
//! diagnostic.

pub mod cursor;
pub mod rules;
pub mod token;

use cursor::Cursor;
use rules::{
    BoolRule, CommentRule, IdentifierRule, KeywordRule, NumberRule, PathRule, PunctuationRule,
    Rule, StringRule,
};
use std::collections::HashMap;
use token::{Token, TokenKind};
use ymir_span::{FileId, SourcePosition, SourceSpan};

/// Output of a lexing pass: the token stream (terminated by `Eof`) and the
/// out-of-band `line -> comment text` map.
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub comments: HashMap<u32, String>,
}

/// Tokenizes `source`, attributing every position to `file` (if given).
pub fn tokenize(source: &str, file: Option<FileId>) -> LexResult {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();
    let mut comments = HashMap::new();

    let number = NumberRule;
    let string = StringRule;
    let boolean = BoolRule;
    let comment = CommentRule;
    let path = PathRule;
    let keywords = rules::keyword_rules();
    let punctuation = PunctuationRule;
    let identifier = IdentifierRule;

    while !cursor.is_eof() {
        if number.matches(&cursor) {
            tokens.push(number.consume(&mut cursor, file));
            continue;
        }
        if string.matches(&cursor) {
            tokens.push(string.consume(&mut cursor, file));
            continue;
        }
        if boolean.matches(&cursor) {
            tokens.push(boolean.consume(&mut cursor, file));
            continue;
        }
        if comment.matches(&cursor) {
            let tok = comment.consume(&mut cursor, file);
            comments.insert(tok.line, tok.text.trim_start_matches('/').trim().to_string());
            continue;
        }
        if path.matches(&cursor) {
            tokens.push(path.consume(&mut cursor, file));
            continue;
        }
        if let Some(kw) = keywords.iter().find(|k| Rule::matches(*k, &cursor)) {
            tokens.push(kw.consume(&mut cursor, file));
            continue;
        }
        if punctuation.matches(&cursor) {
            tokens.push(punctuation.consume(&mut cursor, file));
            continue;
        }
        if identifier.matches(&cursor) {
            tokens.push(identifier.consume(&mut cursor, file));
            continue;
        }

        if cursor.current_char().is_whitespace() {
            cursor.advance(1, false);
            continue;
        }

        // No rule matched and it isn't whitespace: bad-token recovery.
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let bad_char = cursor.read();
        let span = SourceSpan::new(start_byte, cursor.byte_offset() - start_byte);
        let pos = SourcePosition::single_line(file, span, start_line, start_col, cursor.column);
        tokens.push(Token::new(TokenKind::Bad, pos, bad_char.to_string()));
    }

    let eof_pos = SourcePosition::single_line(
        file,
        SourceSpan::new(cursor.byte_offset(), 0),
        cursor.line,
        cursor.column,
        cursor.column,
    );
    tokens.push(Token::new(TokenKind::Eof, eof_pos, ""));

    LexResult { tokens, comments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_minimal_project() {
        let src = "target JavaScript_ExpressJS;\nrouter /api { GET /hello?name=string as Hello; }\n";
        let result = tokenize(src, None);
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds.first(), Some(&TokenKind::Target));
        assert!(kinds.contains(&TokenKind::Router));
        assert!(kinds.contains(&TokenKind::Get));
        assert!(kinds.contains(&TokenKind::Path));
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn comments_go_to_side_channel_not_main_stream() {
        let src = "// creates a widget\nGET /widgets;\n";
        let result = tokenize(src, None);
        assert!(!result.tokens.iter().any(|t| t.kind == TokenKind::Comment));
        assert_eq!(result.comments.get(&1).map(String::as_str), Some("creates a widget"));
    }

    #[test]
    fn bad_character_recovers_and_continues() {
        let src = "target T; ` router /api {}";
        let result = tokenize(src, None);
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Bad));
        assert!(result.tokens.iter().any(|t| t.kind == TokenKind::Router));
        assert_eq!(result.tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn keyword_vs_identifier_boundary() {
        let src = "authenticated authenticate auth authenticateSomething";
        let result = tokenize(src, None);
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Authenticated,
                TokenKind::Authenticate,
                TokenKind::Auth,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn token_text_matches_source_substring() {
        let src = "router /api/:id { }";
        let result = tokenize(src, None);
        for tok in &result.tokens {
            if matches!(tok.kind, TokenKind::Eof) {
                continue;
            }
            let start = tok.position.span.start as usize;
            let end = tok.position.span.end() as usize;
            assert_eq!(&src[start..end], tok.text);
        }
    }
}
