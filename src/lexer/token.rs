use serde::Serialize;
use std::fmt;

/// The kind of a lexed token. Valued kinds carry their decoded text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum TokenKind {
    Sof,
    Eof,
    BraceL,
    BraceR,
    ParenL,
    ParenR,
    Colon,
    Semicolon,
    Equals,
    Dollar,
    Name(String),
    String(String),
    Comment(String),
    Int(String),
    Float(String),
}

impl TokenKind {
    /// The display label of the kind, without its value.
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Sof => "<SOF>",
            TokenKind::Eof => "<EOF>",
            TokenKind::BraceL => "{",
            TokenKind::BraceR => "}",
            TokenKind::ParenL => "(",
            TokenKind::ParenR => ")",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Equals => "=",
            TokenKind::Dollar => "$",
            TokenKind::Name(_) => "Name",
            TokenKind::String(_) => "String",
            TokenKind::Comment(_) => "Comment",
            TokenKind::Int(_) => "Integer",
            TokenKind::Float(_) => "Float",
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            TokenKind::Name(v)
            | TokenKind::String(v)
            | TokenKind::Comment(v)
            | TokenKind::Int(v)
            | TokenKind::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_name(&self, expected: &str) -> bool {
        matches!(self, TokenKind::Name(v) if v == expected)
    }

    /// Fixed-width punctuation for a single byte, if any.
    pub(crate) fn punctuation(byte: u8) -> Option<TokenKind> {
        let kind = match byte {
            b'{' => TokenKind::BraceL,
            b'}' => TokenKind::BraceR,
            b'(' => TokenKind::ParenL,
            b')' => TokenKind::ParenR,
            b':' => TokenKind::Colon,
            b';' => TokenKind::Semicolon,
            b'=' => TokenKind::Equals,
            b'$' => TokenKind::Dollar,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Some(value) if !value.is_empty() => write!(f, "{} \"{}\"", self.label(), value),
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// A token with its byte span and the line it was read on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(flatten)]
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize, line: usize) -> Self {
        Self {
            kind,
            start,
            end,
            line,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}
