pub mod definition;
pub mod value;

pub use definition::*;
pub use value::*;

use crate::source::Loc;
use serde::Serialize;
use std::fmt;

/// The kind tag shared by every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    Name,
    IntValue,
    FloatValue,
    StringValue,
    BooleanValue,
    Reference,
    Object,
    Property,
    ActionDefinition,
    WorkflowDefinition,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Implemented by every located AST node.
pub trait AstNode {
    fn kind(&self) -> NodeKind;
    fn loc(&self) -> &Loc;
}
