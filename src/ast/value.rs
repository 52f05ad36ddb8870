use super::{AstNode, NodeKind, Property};
use crate::source::Loc;
use serde::Serialize;
use std::fmt;

/// A property value as written in source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Value {
    #[serde(rename = "IntValue")]
    Int { value: i64, loc: Loc },
    #[serde(rename = "FloatValue")]
    Float { value: f64, loc: Loc },
    #[serde(rename = "StringValue")]
    String { value: String, loc: Loc },
    #[serde(rename = "BooleanValue")]
    Boolean { value: bool, loc: Loc },
    /// A bare identifier pointing at another definition, resolved later.
    Reference { value: String, loc: Loc },
    Object(ObjectValue),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int { value, .. } => Some(*value as f64),
            Value::Float { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The text of a string or reference value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String { value, .. } | Value::Reference { value, .. } => Some(value),
            _ => None,
        }
    }
}

impl AstNode for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Int { .. } => NodeKind::IntValue,
            Value::Float { .. } => NodeKind::FloatValue,
            Value::String { .. } => NodeKind::StringValue,
            Value::Boolean { .. } => NodeKind::BooleanValue,
            Value::Reference { .. } => NodeKind::Reference,
            Value::Object(_) => NodeKind::Object,
        }
    }

    fn loc(&self) -> &Loc {
        match self {
            Value::Int { loc, .. }
            | Value::Float { loc, .. }
            | Value::String { loc, .. }
            | Value::Boolean { loc, .. }
            | Value::Reference { loc, .. } => loc,
            Value::Object(object) => &object.loc,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int { value, .. } => write!(f, "{}", value),
            Value::Float { value, .. } => write!(f, "{}", value),
            Value::String { value, .. } => write!(f, "{:?}", value),
            Value::Boolean { value, .. } => write!(f, "{}", value),
            Value::Reference { value, .. } => write!(f, "{}", value),
            Value::Object(object) => write!(f, "{{ {} properties }}", object.properties.len()),
        }
    }
}

/// A brace-delimited list of properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectValue {
    pub properties: Vec<Property>,
    pub loc: Loc,
}

impl AstNode for ObjectValue {
    fn kind(&self) -> NodeKind {
        NodeKind::Object
    }

    fn loc(&self) -> &Loc {
        &self.loc
    }
}
