//! Token kinds and the `Token` value produced by the lexer.

use ymir_span::SourcePosition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    Number,
    Str,
    Bool,
    Path,
    Ident,

    // Keywords
    Target,
    Use,
    Router,
    Include,
    With,
    Body,
    Header,
    Query,
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    As,
    Any,
    StringType,
    Float,
    Int,
    BooleanType,
    Datetime,
    Date,
    Time,
    Public,
    Authenticated,
    Authenticate,
    Auth,
    Response,
    Responses,
    Render,
    Table,
    List,
    Detail,
    Form,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Dot,
    Comma,
    Colon,
    Semicolon,
    Question,
    Equals,
    Bang,
    Lt,
    Gt,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    At,
    Hash,

    // Side-channel / control
    Comment,
    Eof,
    Bad,
}

impl TokenKind {
    /// True for the seven HTTP method keywords.
    pub fn is_method(self) -> bool {
        matches!(
            self,
            TokenKind::Get
                | TokenKind::Post
                | TokenKind::Put
                | TokenKind::Delete
                | TokenKind::Patch
                | TokenKind::Head
                | TokenKind::Options
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    None,
    Number(f64),
    Str(String),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
    /// Line number the token starts on (1-based). Kept alongside `position`
    /// for quick lookups against the comment side-channel map.
    pub line: u32,
    pub text: String,
    pub payload: TokenPayload,
}

impl Token {
    pub fn new(kind: TokenKind, position: SourcePosition, text: impl Into<String>) -> Self {
        let line = position.line_start;
        Self {
            kind,
            position,
            line,
            text: text.into(),
            payload: TokenPayload::None,
        }
    }

    pub fn with_payload(mut self, payload: TokenPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn number_value(&self) -> Option<f64> {
        match self.payload {
            TokenPayload::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn string_value(&self) -> Option<&str> {
        match &self.payload {
            TokenPayload::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn bool_value(&self) -> Option<bool> {
        match self.payload {
            TokenPayload::Bool(v) => Some(v),
            _ => None,
        }
    }
}
