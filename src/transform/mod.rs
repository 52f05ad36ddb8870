//! Resolution of a parsed workflow into a positioned [`Document`].
//!
//! Runs in three passes over an index-addressed arena: build one node per
//! definition, link every `needs` to its parent, then lay the graph out from the
//! root workflow.

use crate::ast::{Ast, AstNode, Definition, DefinitionKind};
use crate::catalog::ActionCatalog;
use crate::document::{ActionNode, Document, DocumentNode, NodeIndex, NodeType, WorkflowNode};
use crate::error::SemanticError;
use crate::source::Loc;
use itertools::Itertools;
use tracing::{debug, trace, warn};

pub mod layout;
mod properties;

pub use layout::LayoutConfig;
use properties::{ReservedProperties, coordinate, identifier, scalar_text, to_properties};

/// A `needs` link waiting for the second pass.
struct PendingLink {
    child: NodeIndex,
    parent_id: String,
    loc: Loc,
}

pub struct Transformer<'c> {
    catalog: &'c ActionCatalog,
    layout: LayoutConfig,
}

pub struct TransformerBuilder<'c> {
    catalog: &'c ActionCatalog,
    layout: LayoutConfig,
}

impl<'c> TransformerBuilder<'c> {
    pub fn new(catalog: &'c ActionCatalog) -> Self {
        Self {
            catalog,
            layout: LayoutConfig::default(),
        }
    }

    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.layout = layout;
        self
    }

    pub fn build(self) -> Transformer<'c> {
        Transformer {
            catalog: self.catalog,
            layout: self.layout,
        }
    }
}

impl<'c> Transformer<'c> {
    pub fn builder(catalog: &'c ActionCatalog) -> TransformerBuilder<'c> {
        TransformerBuilder::new(catalog)
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Resolves `ast` against the catalog. The first invalid definition or
    /// reference aborts the whole transform.
    pub fn transform(&self, ast: &Ast) -> Result<Document<'c>, SemanticError> {
        debug!(definitions = ast.definitions.len(), "Transforming workflow");

        let mut document = Document::new();
        let mut pending = Vec::new();

        for definition in &ast.definitions {
            let (node, needs) = self.build_node(definition)?;
            let child = document
                .push(node)
                .map_err(|node| SemanticError::DuplicateDefinition {
                    id: node.id,
                    loc: definition.name.loc.clone(),
                })?;
            if let Some((parent_id, loc)) = needs {
                pending.push(PendingLink {
                    child,
                    parent_id,
                    loc,
                });
            }
        }

        for link in &pending {
            let parent = document.index_of(&link.parent_id).ok_or_else(|| {
                SemanticError::UndefinedReference {
                    id: link.parent_id.clone(),
                    loc: link.loc.clone(),
                }
            })?;
            let child_id = document.nodes()[link.child].id.clone();
            trace!(child = %child_id, parent = %link.parent_id, "resolved needs");
            document.nodes_mut()[parent].children.push(child_id);
        }

        if let Some(unreached) = layout::apply(&mut document, &self.layout) {
            return Err(cycle_error(&document, &pending, unreached));
        }

        debug!(
            nodes = document.len(),
            root = document.root().map(|n| n.id.as_str()).unwrap_or("<none>"),
            "Transformed workflow"
        );
        Ok(document)
    }

    /// Builds the node for one definition, returning the unresolved `needs` link
    /// alongside it.
    fn build_node(
        &self,
        definition: &Definition,
    ) -> Result<(DocumentNode<'c>, Option<(String, Loc)>), SemanticError> {
        let id = definition.name.value.clone();
        let reserved = ReservedProperties::split(definition);

        let label = reserved.label.map(scalar_text).transpose()?;
        let explicit_x = coordinate(reserved.x)?;
        let explicit_y = coordinate(reserved.y)?;

        let (node_type, needs) = match definition.kind {
            DefinitionKind::Action => {
                let uses = reserved.uses.map(identifier).transpose()?.unwrap_or_default();
                let action = self.catalog.get(&uses).ok_or_else(|| {
                    SemanticError::InvalidAction {
                        uses: uses.clone(),
                        loc: reserved
                            .uses
                            .map(|p| p.value.loc().clone())
                            .unwrap_or_else(|| definition.name.loc.clone()),
                    }
                })?;
                let needs = match reserved.needs {
                    Some(property) => Some((identifier(property)?, property.value.loc().clone())),
                    None => None,
                };
                let node = NodeType::Action(ActionNode {
                    uses,
                    action,
                    props: to_properties(reserved.rest),
                    parent: needs.as_ref().map(|(id, _)| id.clone()),
                });
                (node, needs)
            }
            DefinitionKind::Workflow => {
                if reserved.needs.is_some() {
                    warn!(workflow = %id, "Ignoring 'needs' on a workflow");
                }
                if !reserved.rest.is_empty() {
                    warn!(
                        workflow = %id,
                        properties = %reserved.rest.iter().map(|p| &p.name.value).join(", "),
                        "Dropping properties a workflow does not carry"
                    );
                }
                let on = reserved.on.map(scalar_text).transpose()?.unwrap_or_default();
                (NodeType::Workflow(WorkflowNode { on }), None)
            }
        };

        let node = DocumentNode {
            id,
            label,
            x: explicit_x.unwrap_or(0.0),
            y: explicit_y.unwrap_or(0.0),
            explicit_x,
            explicit_y,
            children: Vec::new(),
            index: 0,
            node_type,
        };
        Ok((node, needs))
    }
}

/// Follows parents from a node no root reaches until the walk repeats, which
/// lands on a node inside the loop.
fn cycle_error(document: &Document<'_>, pending: &[PendingLink], start: NodeIndex) -> SemanticError {
    let mut seen = vec![false; document.len()];
    let mut current = start;
    while !seen[current] {
        seen[current] = true;
        match document.nodes()[current]
            .parent_id()
            .and_then(|id| document.index_of(id))
        {
            Some(parent) => current = parent,
            None => break,
        }
    }

    let node = &document.nodes()[current];
    let loc = pending
        .iter()
        .find(|link| link.child == current)
        .map(|link| link.loc.clone());
    match loc {
        Some(loc) => SemanticError::CyclicDependency {
            id: node.id.clone(),
            loc,
        },
        None => SemanticError::UnknownNode(node.id.clone()),
    }
}

/// Resolves `ast` with the default card geometry.
pub fn transform<'c>(ast: &Ast, catalog: &'c ActionCatalog) -> Result<Document<'c>, SemanticError> {
    Transformer::builder(catalog).build().transform(ast)
}
