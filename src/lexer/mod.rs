//! Tokenizer for workflow source text.
//!
//! A [`Lexer`] is an immutable snapshot of the scan: advancing returns a new state
//! and leaves the previous one untouched, so any earlier token stays available for
//! diagnostics without re-lexing.

use crate::error::SyntaxError;
use crate::source::{Loc, Source};
use std::sync::Arc;
use tracing::trace;

pub mod token;

pub use token::*;

#[derive(Debug, Clone)]
pub struct Lexer {
    source: Arc<Source>,
    position: usize,
    line: usize,
    last_token: Token,
    token: Token,
}

impl Lexer {
    /// Creates a lexer positioned on the start-of-file token.
    pub fn new(source: impl Into<Source>) -> Self {
        Self::from_shared(Arc::new(source.into()))
    }

    pub fn from_shared(source: Arc<Source>) -> Self {
        let sof = Token::new(TokenKind::Sof, 0, 0, 1);
        Self {
            source,
            position: 0,
            line: 1,
            last_token: sof.clone(),
            token: sof,
        }
    }

    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The line of the current token.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn last_token(&self) -> &Token {
        &self.last_token
    }

    /// Advances past comments to the next significant token.
    pub fn next(&self) -> Result<Lexer, SyntaxError> {
        self.advance(false)
    }

    /// Returns the state after the next token. Once the end of input is reached the
    /// same state is returned on every call.
    pub fn advance(&self, include_comments: bool) -> Result<Lexer, SyntaxError> {
        if self.token.is_eof() {
            return Ok(self.clone());
        }

        let mut next = self.clone();
        loop {
            let token = next.read_token()?;
            next.position = token.end;
            next.line = token.line;
            let is_comment = matches!(token.kind, TokenKind::Comment(_));
            next.token = token;
            if !is_comment || include_comments {
                break;
            }
        }
        next.last_token = self.token.clone();

        trace!(token = %next.token.kind, line = next.line, start = next.token.start, "lexed token");
        Ok(next)
    }

    /// Iterates over the tokens following the current one, ending with `<EOF>`.
    pub fn tokens(&self, include_comments: bool) -> Tokens {
        Tokens {
            lexer: Some(self.clone()),
            include_comments,
        }
    }

    /// Skips spaces, tabs, commas and line breaks, counting lines as it goes.
    fn skip_insignificant(&self) -> (usize, usize) {
        let bytes = self.source.input.as_bytes();
        let mut position = self.position;
        let mut line = self.line;

        while let Some(&byte) = bytes.get(position) {
            match byte {
                b'\n' => line += 1,
                // A CR LF pair is counted on its LF.
                b'\r' => {
                    if bytes.get(position + 1) != Some(&b'\n') {
                        line += 1;
                    }
                }
                b' ' | b'\t' | b',' => {}
                _ => break,
            }
            position += 1;
        }

        (position, line)
    }

    fn read_token(&self) -> Result<Token, SyntaxError> {
        let (position, line) = self.skip_insignificant();
        let input = &self.source.input;

        let Some(&byte) = input.as_bytes().get(position) else {
            return Ok(Token::new(TokenKind::Eof, position, position, line));
        };

        if let Some(kind) = TokenKind::punctuation(byte) {
            return Ok(Token::new(kind, position, position + 1, line));
        }

        match byte {
            b'"' | b'\'' => self.read_string(position, line),
            b'#' => Ok(self.read_comment(position, line)),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => Ok(self.read_name(position, line)),
            b'0'..=b'9' | b'-' | b'.' => self.read_number(position, line),
            _ => {
                let ch = input
                    .get(position..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                Err(SyntaxError::UnexpectedCharacter {
                    ch,
                    loc: Loc::new(&self.source, position, position),
                })
            }
        }
    }

    fn read_string(&self, start: usize, line: usize) -> Result<Token, SyntaxError> {
        let input = &self.source.input;
        let quote = char::from(input.as_bytes()[start]);
        let mut value = String::new();
        let mut escaped = false;

        for (offset, ch) in input[start + 1..].char_indices() {
            let position = start + 1 + offset;
            if ch == '\n' || ch == '\r' {
                return Err(SyntaxError::UnterminatedString {
                    loc: Loc::new(&self.source, start, position),
                });
            }

            if escaped {
                value.push(ch);
                escaped = false;
                continue;
            }

            match ch {
                '\\' => escaped = true,
                c if c == quote => {
                    return Ok(Token::new(
                        TokenKind::String(value),
                        start,
                        position + 1,
                        line,
                    ));
                }
                c => value.push(c),
            }
        }

        Err(SyntaxError::UnterminatedString {
            loc: Loc::new(&self.source, start, input.len()),
        })
    }

    fn read_comment(&self, start: usize, line: usize) -> Token {
        let input = &self.source.input;
        let end = input.as_bytes()[start + 1..]
            .iter()
            .position(|b| *b == b'\n' || *b == b'\r')
            .map_or(input.len(), |offset| start + 1 + offset);

        Token::new(
            TokenKind::Comment(input[start + 1..end].to_string()),
            start,
            end,
            line,
        )
    }

    fn read_name(&self, start: usize, line: usize) -> Token {
        let input = &self.source.input;
        let end = start
            + 1
            + input.as_bytes()[start + 1..]
                .iter()
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count();

        Token::new(
            TokenKind::Name(input[start..end].to_string()),
            start,
            end,
            line,
        )
    }

    /// Reads a run of digits, `-` and `.`. The run is not validated beyond the
    /// leading-dot rule; turning the text into a number is the parser's job.
    fn read_number(&self, start: usize, line: usize) -> Result<Token, SyntaxError> {
        let input = &self.source.input;
        let bytes = input.as_bytes();
        let mut is_float = bytes[start] == b'.';

        if is_float && !bytes.get(start + 1).is_some_and(u8::is_ascii_digit) {
            return Err(SyntaxError::InvalidNumber {
                text: ".".to_string(),
                loc: Loc::new(&self.source, start, start + 1),
            });
        }

        let mut end = start + 1;
        while let Some(&byte) = bytes.get(end) {
            match byte {
                b'.' => is_float = true,
                b'0'..=b'9' | b'-' => {}
                _ => break,
            }
            end += 1;
        }

        let text = input[start..end].to_string();
        let kind = if is_float {
            TokenKind::Float(text)
        } else {
            TokenKind::Int(text)
        };
        Ok(Token::new(kind, start, end, line))
    }
}

/// Iterator over a lexer's remaining tokens. Yields `<EOF>` once, or the first
/// syntax error, and then stops.
pub struct Tokens {
    lexer: Option<Lexer>,
    include_comments: bool,
}

impl Iterator for Tokens {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        let lexer = self.lexer.take()?;
        match lexer.advance(self.include_comments) {
            Ok(next) => {
                let token = next.token().clone();
                if !token.is_eof() {
                    self.lexer = Some(next);
                }
                Some(Ok(token))
            }
            Err(e) => Some(Err(e)),
        }
    }
}
