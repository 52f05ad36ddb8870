use crate::source::Loc;
use thiserror::Error;

/// Errors raised by the lexer and the parser.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Syntax error at {loc}: unterminated string")]
    UnterminatedString { loc: Loc },

    #[error("Syntax error at {loc}: unexpected character {ch:?}, char code: {}", char_code(.ch))]
    UnexpectedCharacter { ch: char, loc: Loc },

    #[error("Syntax error at {loc}: invalid number '{text}'")]
    InvalidNumber { text: String, loc: Loc },

    #[error("{} at {loc}", describe_unexpected(.found, .expected))]
    UnexpectedToken {
        found: String,
        expected: Option<String>,
        loc: Loc,
    },
}

fn char_code(ch: &char) -> u32 {
    *ch as u32
}

fn describe_unexpected(found: &str, expected: &Option<String>) -> String {
    match expected {
        Some(expected) => format!("Expected {}, found {}", expected, found),
        None => format!("Unexpected {}", found),
    }
}

impl SyntaxError {
    pub fn loc(&self) -> &Loc {
        match self {
            SyntaxError::UnterminatedString { loc }
            | SyntaxError::UnexpectedCharacter { loc, .. }
            | SyntaxError::InvalidNumber { loc, .. }
            | SyntaxError::UnexpectedToken { loc, .. } => loc,
        }
    }
}

/// Errors raised while resolving an AST into a document, or while editing one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("{uses} is not a valid action (at {loc})")]
    InvalidAction { uses: String, loc: Loc },

    #[error("Action or Workflow '{id}' is not defined (at {loc})")]
    UndefinedReference { id: String, loc: Loc },

    #[error("Invalid value for '{property}' at {loc}: expected a number")]
    InvalidCoordinate { property: String, loc: Loc },

    #[error("Invalid value for '{property}' at {loc}: expected {expected}")]
    InvalidValue {
        property: String,
        expected: &'static str,
        loc: Loc,
    },

    #[error("'{id}' is defined more than once (at {loc})")]
    DuplicateDefinition { id: String, loc: Loc },

    #[error("'{id}' depends on itself through 'needs' (at {loc})")]
    CyclicDependency { id: String, loc: Loc },

    #[error("Node '{0}' does not exist in the document")]
    UnknownNode(String),

    #[error("Node '{0}' already exists in the document")]
    NodeExists(String),

    #[error("Node id {0:?} cannot contain a line break")]
    InvalidId(String),
}

impl SemanticError {
    /// The source span of the error, when it comes from source text.
    pub fn loc(&self) -> Option<&Loc> {
        match self {
            SemanticError::InvalidAction { loc, .. }
            | SemanticError::UndefinedReference { loc, .. }
            | SemanticError::InvalidCoordinate { loc, .. }
            | SemanticError::InvalidValue { loc, .. }
            | SemanticError::DuplicateDefinition { loc, .. }
            | SemanticError::CyclicDependency { loc, .. } => Some(loc),
            SemanticError::UnknownNode(_)
            | SemanticError::NodeExists(_)
            | SemanticError::InvalidId(_) => None,
        }
    }
}

/// Any failure of the text-to-document pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

impl WorkflowError {
    pub fn loc(&self) -> Option<&Loc> {
        match self {
            WorkflowError::Syntax(e) => Some(e.loc()),
            WorkflowError::Semantic(e) => e.loc(),
        }
    }
}

/// Errors that can occur while loading an action catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read action catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse action catalog JSON: {0}")]
    JsonParseError(#[from] serde_json::Error),

    #[error("Catalog key '{key}' does not match the id '{id}' of its action")]
    MismatchedId { key: String, id: String },
}
