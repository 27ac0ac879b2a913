//! The priority-ordered rule catalogue.
//!
//! Each [`Rule`] answers `matches` (cheap lookahead) and `consume` (advances
//! the cursor and builds a [`Token`]). `tokenize` in `lib.rs` tries rules in
//! order and takes the first match, exactly as spec'd: numeric, string,
//! boolean, comment, path, one rule per keyword, single-char punctuation,
//! then the identifier fallback.

use crate::cursor::{CachedRegex, Cursor};
use crate::token::{Token, TokenKind, TokenPayload};
use ymir_span::{FileId, SourcePosition, SourceSpan};

pub trait Rule {
    fn matches(&self, cursor: &Cursor) -> bool;
    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token;
}

/// Builds a [`SourcePosition`] from a `(line, column, byte offset)` snapshot
/// taken *before* a rule consumed any input, plus the cursor's state after.
fn position_for(
    start: (u32, u32, u32),
    cursor_after: &Cursor,
    file: Option<FileId>,
) -> SourcePosition {
    let (start_line, start_col, start_byte) = start;
    let span = SourceSpan::new(start_byte, cursor_after.byte_offset() - start_byte);
    SourcePosition::single_line(file, span, start_line, start_col, cursor_after.column)
}

// ---------------------------------------------------------------------
// Numeric literal
// ---------------------------------------------------------------------

static NUMBER_RE: CachedRegex = CachedRegex::new(r"^-?(?:\d+\.\d+|\.\d+|\d+)");

pub struct NumberRule;

impl Rule for NumberRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        // Per the documented resolution of the "checkForDot" open question,
        // we never skip whitespace when deciding whether `-`/`.` begins a
        // number: `- .5` is a `-` punctuation token followed by `.5`, not a
        // single literal.
        cursor.peek_regex(&NUMBER_RE).is_some()
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let text = cursor.read_regex(&NUMBER_RE).expect("matches() checked");
        for _ in 0..text.chars().count() {
            cursor.advance(1, false);
        }
        let value: f64 = text.parse().unwrap_or(f64::NAN);
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(TokenKind::Number, pos, text).with_payload(TokenPayload::Number(value))
    }
}

// ---------------------------------------------------------------------
// String literal
// ---------------------------------------------------------------------

pub struct StringRule;

impl Rule for StringRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        matches!(cursor.current_char(), '\'' | '"')
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let quote = cursor.read();

        let mut raw = String::new();
        raw.push(quote);
        let mut decoded = String::new();
        let mut terminated = false;

        while !cursor.is_eof() {
            let c = cursor.current_char();
            if c == '\\' {
                raw.push(c);
                cursor.advance(1, false);
                let escaped = cursor.current_char();
                raw.push(escaped);
                decoded.push(decode_escape(escaped));
                cursor.advance(1, false);
                continue;
            }
            if c == quote {
                raw.push(c);
                cursor.advance(1, false);
                terminated = true;
                break;
            }
            raw.push(c);
            decoded.push(c);
            cursor.advance(1, false);
        }

        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        if !terminated {
            return Token::new(TokenKind::Bad, pos, raw);
        }
        Token::new(TokenKind::Str, pos, raw).with_payload(TokenPayload::Str(decoded))
    }
}

fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

// ---------------------------------------------------------------------
// Boolean literal
// ---------------------------------------------------------------------

pub struct BoolRule;

impl Rule for BoolRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        keyword_matches(cursor, "true") || keyword_matches(cursor, "false")
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let word = if keyword_matches(cursor, "true") { "true" } else { "false" };
        for _ in 0..word.len() {
            cursor.advance(1, false);
        }
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(TokenKind::Bool, pos, word).with_payload(TokenPayload::Bool(word == "true"))
    }
}

// ---------------------------------------------------------------------
// Single-line comment
// ---------------------------------------------------------------------

pub struct CommentRule;

impl Rule for CommentRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        cursor.current_char() == '/' && cursor.peek(1, false) == '/'
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let mut text = String::new();
        while !cursor.is_eof() && cursor.current_char() != '\n' {
            text.push(cursor.current_char());
            cursor.advance(1, false);
        }
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(TokenKind::Comment, pos, text)
    }
}

// ---------------------------------------------------------------------
// Path literal
// ---------------------------------------------------------------------

static PATH_RE: CachedRegex = CachedRegex::new(
    r"^/(?:[A-Za-z0-9_.#-]|:[A-Za-z_][A-Za-z0-9_]*|\{[A-Za-z_][A-Za-z0-9_]*<[A-Za-z]+>\}|\\[?; ]|/)*",
);

pub struct PathRule;

impl Rule for PathRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        cursor.current_char() == '/' && cursor.peek_regex(&PATH_RE).is_some()
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let raw = cursor.read_regex(&PATH_RE).expect("matches() checked");
        for _ in 0..raw.chars().count() {
            cursor.advance(1, false);
        }
        let unescaped = unescape_path(&raw);
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(TokenKind::Path, pos, raw).with_payload(TokenPayload::Str(unescaped))
    }
}

/// Unescapes `\?`, `\;`, `\ ` in a raw path literal.
fn unescape_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '?' | ';' | ' ') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

// ---------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------

/// `true` when `cursor`'s remaining text starts with `word` immediately
/// followed by a non-identifier character (whitespace, EOF, or
/// punctuation) — this is how a keyword is told apart from an identifier
/// that merely starts with the same letters.
fn keyword_matches(cursor: &Cursor, word: &str) -> bool {
    let rest = cursor.remaining();
    if !rest.starts_with(word) {
        return false;
    }
    match rest[word.len()..].chars().next() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_' || c == '-'),
    }
}

pub struct KeywordRule {
    word: &'static str,
    kind: TokenKind,
}

impl KeywordRule {
    pub const fn new(word: &'static str, kind: TokenKind) -> Self {
        Self { word, kind }
    }
}

impl Rule for KeywordRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        keyword_matches(cursor, self.word)
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        for _ in 0..self.word.len() {
            cursor.advance(1, false);
        }
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(self.kind, pos, self.word)
    }
}

/// The full keyword catalogue.
pub fn keyword_rules() -> Vec<KeywordRule> {
    use TokenKind::*;
    vec![
        KeywordRule::new("target", Target),
        KeywordRule::new("use", Use),
        KeywordRule::new("router", Router),
        KeywordRule::new("include", Include),
        KeywordRule::new("with", With),
        KeywordRule::new("body", Body),
        KeywordRule::new("header", Header),
        KeywordRule::new("query", Query),
        KeywordRule::new("GET", Get),
        KeywordRule::new("POST", Post),
        KeywordRule::new("PUT", Put),
        KeywordRule::new("DELETE", Delete),
        KeywordRule::new("PATCH", Patch),
        KeywordRule::new("HEAD", Head),
        KeywordRule::new("OPTIONS", Options),
        KeywordRule::new("as", As),
        KeywordRule::new("any", Any),
        KeywordRule::new("string", StringType),
        KeywordRule::new("float", Float),
        KeywordRule::new("int", Int),
        KeywordRule::new("boolean", BooleanType),
        KeywordRule::new("datetime", Datetime),
        KeywordRule::new("date", Date),
        KeywordRule::new("time", Time),
        KeywordRule::new("public", Public),
        KeywordRule::new("authenticated", Authenticated),
        KeywordRule::new("authenticate", Authenticate),
        KeywordRule::new("auth", Auth),
        KeywordRule::new("responses", Responses),
        KeywordRule::new("response", Response),
        KeywordRule::new("render", Render),
        KeywordRule::new("table", Table),
        KeywordRule::new("list", List),
        KeywordRule::new("detail", Detail),
        KeywordRule::new("form", Form),
    ]
}

// ---------------------------------------------------------------------
// Punctuation
// ---------------------------------------------------------------------

pub struct PunctuationRule;

fn punctuation_kind(c: char) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match c {
        '(' => LParen,
        ')' => RParen,
        '{' => LBrace,
        '}' => RBrace,
        '[' => LBracket,
        ']' => RBracket,
        '.' => Dot,
        ',' => Comma,
        ':' => Colon,
        ';' => Semicolon,
        '?' => Question,
        '=' => Equals,
        '!' => Bang,
        '<' => Lt,
        '>' => Gt,
        '+' => Plus,
        '-' => Minus,
        '*' => Star,
        '/' => Slash,
        '%' => Percent,
        '&' => Amp,
        '|' => Pipe,
        '^' => Caret,
        '~' => Tilde,
        '@' => At,
        '#' => Hash,
        _ => return None,
    })
}

impl Rule for PunctuationRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        punctuation_kind(cursor.current_char()).is_some()
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let c = cursor.read();
        let kind = punctuation_kind(c).expect("matches() checked");
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(kind, pos, c.to_string())
    }
}

// ---------------------------------------------------------------------
// Identifier fallback
// ---------------------------------------------------------------------

static IDENT_RE: CachedRegex = CachedRegex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*");

pub struct IdentifierRule;

impl Rule for IdentifierRule {
    fn matches(&self, cursor: &Cursor) -> bool {
        cursor.peek_regex(&IDENT_RE).is_some()
    }

    fn consume(&self, cursor: &mut Cursor, file: Option<FileId>) -> Token {
        let start_line = cursor.line;
        let start_col = cursor.column;
        let start_byte = cursor.byte_offset();
        let text = cursor.read_regex(&IDENT_RE).expect("matches() checked");
        for _ in 0..text.chars().count() {
            cursor.advance(1, false);
        }
        let pos = position_for((start_line, start_col, start_byte), cursor, file);
        Token::new(TokenKind::Ident, pos, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cur(s: &str) -> Cursor {
        Cursor::new(s)
    }

    #[test]
    fn number_rule_matches_plain_digits_and_decimals() {
        let rule = NumberRule;
        assert!(rule.matches(&cur("42")));
        assert!(rule.matches(&cur("3.14")));
        assert!(rule.matches(&cur(".5")));
        assert!(rule.matches(&cur("-5")));
    }

    #[test]
    fn number_rule_rejects_space_before_dot() {
        // Documented resolution of the checkForDot open question: no
        // whitespace-skipping for numeric literals.
        let rule = NumberRule;
        assert!(!rule.matches(&cur(" .5")));
    }

    #[test]
    fn keyword_boundary_disambiguation() {
        assert!(keyword_matches(&cur("auth "), "auth"));
        assert!(!keyword_matches(&cur("authenticate"), "auth"));
        assert!(keyword_matches(&cur("auth("), "auth"));
    }

    #[test]
    fn path_rule_consumes_variables_and_escapes() {
        let rule = PathRule;
        let mut c = cur(r"/api/:id/sub-thing\?as");
        assert!(rule.matches(&c));
        let tok = rule.consume(&mut c, None);
        assert_eq!(tok.string_value(), Some("/api/:id/sub-thing?"));
    }

    #[test]
    fn string_rule_decodes_escapes() {
        let mut c = cur(r#""hello\nworld""#);
        let tok = StringRule.consume(&mut c, None);
        assert_eq!(tok.kind, TokenKind::Str);
        assert_eq!(tok.string_value(), Some("hello\nworld"));
    }

    #[test]
    fn string_rule_flags_unterminated() {
        let mut c = cur("\"unterminated");
        let tok = StringRule.consume(&mut c, None);
        assert_eq!(tok.kind, TokenKind::Bad);
    }
}
