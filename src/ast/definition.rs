use super::{AstNode, NodeKind, Value};
use crate::source::{Loc, Source};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Name {
    pub value: String,
    pub loc: Loc,
}

impl AstNode for Name {
    fn kind(&self) -> NodeKind {
        NodeKind::Name
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

/// A single `name = value` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: Name,
    pub value: Value,
    pub loc: Loc,
}

impl AstNode for Property {
    fn kind(&self) -> NodeKind {
        NodeKind::Property
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DefinitionKind {
    Action,
    Workflow,
}

impl DefinitionKind {
    /// The keyword introducing a definition of this kind.
    pub fn keyword(self) -> &'static str {
        match self {
            DefinitionKind::Action => "action",
            DefinitionKind::Workflow => "workflow",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "action" => Some(DefinitionKind::Action),
            "workflow" => Some(DefinitionKind::Workflow),
            _ => None,
        }
    }
}

/// A top-level `action` or `workflow` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub name: Name,
    pub properties: Vec<Property>,
    pub loc: Loc,
}

impl Definition {
    /// Finds the last property with the given name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().rev().find(|p| p.name.value == name)
    }
}

impl AstNode for Definition {
    fn kind(&self) -> NodeKind {
        match self.kind {
            DefinitionKind::Action => NodeKind::ActionDefinition,
            DefinitionKind::Workflow => NodeKind::WorkflowDefinition,
        }
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}

/// The parsed form of a whole source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ast {
    pub definitions: Vec<Definition>,
    pub source: Arc<Source>,
}
