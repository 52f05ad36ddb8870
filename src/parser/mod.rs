//! Recursive-descent parser from source text to [`Ast`].
//!
//! The grammar has no statement terminator. Line structure takes its place: a
//! definition's name sits on its keyword's line, `name = value` stays on one line,
//! and each property of an object starts on a new line.

use crate::ast::{Ast, AstNode, Definition, DefinitionKind, Name, ObjectValue, Property, Value};
use crate::error::SyntaxError;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::source::{Loc, Source};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, trace};

/// Parses an unnamed source.
pub fn parse(input: &str) -> Result<Ast, SyntaxError> {
    parse_source(Source::new(input))
}

/// Parses a source, keeping its name for diagnostics.
pub fn parse_source(source: Source) -> Result<Ast, SyntaxError> {
    Parser::new(Arc::new(source))?.parse_document()
}

struct Parser {
    lexer: Lexer,
}

impl Parser {
    fn new(source: Arc<Source>) -> Result<Self, SyntaxError> {
        // Step past <SOF>.
        let lexer = Lexer::from_shared(source).next()?;
        Ok(Self { lexer })
    }

    fn token(&self) -> &Token {
        self.lexer.token()
    }

    fn bump(&mut self) -> Result<(), SyntaxError> {
        self.lexer = self.lexer.next()?;
        Ok(())
    }

    fn loc(&self, start: usize, end: usize) -> Loc {
        Loc::new(self.lexer.source(), start, end)
    }

    fn token_loc(&self) -> Loc {
        self.loc(self.token().start, self.token().end)
    }

    fn unexpected(&self, expected: Option<&str>) -> SyntaxError {
        SyntaxError::UnexpectedToken {
            found: self.token().kind.to_string(),
            expected: expected.map(str::to_string),
            loc: self.token_loc(),
        }
    }

    fn parse_document(mut self) -> Result<Ast, SyntaxError> {
        let mut definitions = Vec::new();

        while !self.token().is_eof() {
            let kind = match &self.token().kind {
                TokenKind::Name(keyword) => DefinitionKind::from_keyword(keyword),
                _ => None,
            };
            let Some(kind) = kind else {
                return Err(self.unexpected(Some("action or workflow")));
            };
            definitions.push(self.parse_definition(kind)?);
        }

        debug!(definitions = definitions.len(), "parsed workflow source");
        Ok(Ast {
            definitions,
            source: Arc::clone(self.lexer.source()),
        })
    }

    fn parse_definition(&mut self, kind: DefinitionKind) -> Result<Definition, SyntaxError> {
        let keyword = self.token().clone();
        let keyword_loc = self.token_loc();
        self.bump()?;

        let token = self.token();
        let value = match &token.kind {
            TokenKind::Name(value) | TokenKind::String(value) => value.clone(),
            _ => return Err(self.unexpected(Some("Name or String"))),
        };
        // The identifier must follow on the same line, separated by whitespace.
        if token.line != keyword.line || token.start == keyword.end {
            return Err(self.unexpected(None));
        }

        let name = Name {
            value,
            loc: self.token_loc(),
        };
        self.bump()?;

        let body = self.parse_object()?;
        trace!(kind = kind.keyword(), name = %name.value, properties = body.properties.len(), "parsed definition");

        Ok(Definition {
            kind,
            name,
            loc: keyword_loc.join(&body.loc),
            properties: body.properties,
        })
    }

    fn parse_object(&mut self) -> Result<ObjectValue, SyntaxError> {
        if self.token().kind != TokenKind::BraceL {
            return Err(self.unexpected(Some("{")));
        }
        let open_loc = self.token_loc();
        self.bump()?;

        let mut properties = Vec::new();
        loop {
            match &self.token().kind {
                TokenKind::BraceR => break,
                TokenKind::Name(_) => {
                    let property = self.parse_property()?;
                    let next = self.token();
                    if next.kind != TokenKind::BraceR && next.line == self.lexer.last_token().line {
                        return Err(self.unexpected(None));
                    }
                    properties.push(property);
                }
                _ => return Err(self.unexpected(Some("Name"))),
            }
        }

        let close_loc = self.token_loc();
        self.bump()?;

        Ok(ObjectValue {
            properties,
            loc: open_loc.join(&close_loc),
        })
    }

    fn parse_property(&mut self) -> Result<Property, SyntaxError> {
        let line = self.lexer.line();
        let name = match &self.token().kind {
            TokenKind::Name(value) => Name {
                value: value.clone(),
                loc: self.token_loc(),
            },
            _ => return Err(self.unexpected(Some("Name"))),
        };
        self.bump()?;

        if self.token().kind != TokenKind::Equals || self.lexer.line() != line {
            return Err(self.unexpected(Some("=")));
        }
        self.bump()?;

        if self.lexer.line() != line {
            return Err(self.unexpected(None));
        }

        let value = self.parse_value()?;
        Ok(Property {
            loc: name.loc.join(value.loc()),
            name,
            value,
        })
    }

    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        let loc = self.token_loc();
        let value = match &self.token().kind {
            TokenKind::BraceL => return Ok(Value::Object(self.parse_object()?)),
            TokenKind::Name(name) if name == "true" || name == "false" => Value::Boolean {
                value: name == "true",
                loc,
            },
            TokenKind::Name(name) => Value::Reference {
                value: name.clone(),
                loc,
            },
            TokenKind::String(text) => Value::String {
                value: text.clone(),
                loc,
            },
            TokenKind::Float(text) => Value::Float {
                value: parse_number(text, &loc)?,
                loc,
            },
            // Integers past the i64 range are kept as the nearest float.
            TokenKind::Int(text) => match text.parse() {
                Ok(value) => Value::Int { value, loc },
                Err(_) => Value::Float {
                    value: parse_number(text, &loc)?,
                    loc,
                },
            },
            _ => return Err(self.unexpected(Some("String, Float, Integer or Name"))),
        };
        self.bump()?;
        Ok(value)
    }
}

/// Converts the text of a numeric token. The lexer accepts any run of digits,
/// dots and hyphens, so `1.5.2` or `1-2` are rejected here.
fn parse_number<T: FromStr>(text: &str, loc: &Loc) -> Result<T, SyntaxError> {
    text.parse().map_err(|_| SyntaxError::InvalidNumber {
        text: text.to_string(),
        loc: loc.clone(),
    })
}
