//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the nagare
//! crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use nagare::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let catalog = ActionCatalog::from_file("path/to/actions.json")?;
//! let text = std::fs::read_to_string("path/to/main.workflow")?;
//!
//! let document = compile(&text, &catalog)?;
//! println!("{}", serialize(&document));
//! # Ok(())
//! # }
//! ```

// Pipeline entry points
pub use crate::{compile, locate, parse, serialize, transform};
pub use crate::transform::{LayoutConfig, Transformer};

// Data model
pub use crate::ast::{Ast, AstNode, Definition, DefinitionKind, Property, Value};
pub use crate::catalog::{Action, ActionCatalog};
pub use crate::document::{Document, DocumentNode, NodeType, PropValue, Properties};
pub use crate::source::{Loc, Location, Source};

// Error types
pub use crate::error::{CatalogError, SemanticError, SyntaxError, WorkflowError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
