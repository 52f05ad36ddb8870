//! # Nagare - Workflow Definition Compiler
//!
//! **Nagare** compiles the textual workflow language used by visual pipeline editors
//! into a positioned dependency graph, and renders such a graph back into text. A
//! workflow file is a sequence of `workflow` and `action` blocks; actions hang off
//! each other (and off the workflow trigger) through their `needs` property.
//!
//! ```text
//! workflow "Build" {
//!     on = "push"
//! }
//!
//! action "Test" {
//!     needs = "Build"
//!     uses = "docker://node"
//!     args = { script = "npm test" }
//! }
//! ```
//!
//! ## Core Workflow
//!
//! 1.  **Parse**: [`parse`] turns source text into an [`ast::Ast`] where every node
//!     knows its span in the source.
//! 2.  **Transform**: [`transform`] checks each action against an
//!     [`catalog::ActionCatalog`], links `needs` into parent/child edges and lays
//!     the cards out, producing a [`document::Document`].
//! 3.  **Edit**: the document can be moved, extended and re-laid out in place.
//! 4.  **Serialize**: [`serialize`] writes the document back as canonical source.
//!
//! All stages are pure and synchronous. Errors carry the span they refer to so an
//! editor can underline it; [`source::locate`] maps any byte offset to a line and
//! column.
//!
//! ## Quick Start
//!
//! ```rust
//! use nagare::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let catalog: ActionCatalog = [Action::new("docker://node", "Node")].into_iter().collect();
//!
//! let source = r#"
//! workflow "Build" {
//!     on = "push"
//! }
//!
//! action "Test" {
//!     needs = "Build"
//!     uses = "docker://node"
//! }
//! "#;
//!
//! let ast = parse(source)?;
//! let document = transform(&ast, &catalog)?;
//!
//! let test = document.get("Test").ok_or("missing node")?;
//! assert_eq!(test.index, 1);
//! assert_eq!(test.position(), (0.0, 150.0));
//!
//! println!("{}", serialize(&document));
//! # Ok(())
//! # }
//! ```

pub mod ast;
pub mod catalog;
pub mod document;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod prelude;
pub mod serializer;
pub mod source;
pub mod transform;

pub use parser::parse;
pub use serializer::serialize;
pub use source::locate;
pub use transform::transform;

use catalog::ActionCatalog;
use document::Document;
use error::WorkflowError;

/// Parses and transforms `text` in one step.
pub fn compile<'c>(text: &str, catalog: &'c ActionCatalog) -> Result<Document<'c>, WorkflowError> {
    let ast = parse(text)?;
    Ok(transform(&ast, catalog)?)
}
