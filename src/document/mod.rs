//! The resolved workflow graph.
//!
//! Nodes live in an ordered arena and are addressed by position; the id index maps
//! each definition name to its slot. Parent and child links are stored as ids and
//! resolved through the index, so no node owns another.

use crate::catalog::Action;
use crate::error::SemanticError;
use crate::transform::layout::{self, LayoutConfig};
use ahash::AHashMap;
use serde::Serialize;

mod props;

pub use props::*;

/// Position of a node in the document arena.
pub type NodeIndex = usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionNode<'c> {
    pub uses: String,
    /// The catalog entry `uses` resolved to.
    pub action: &'c Action,
    pub props: Properties,
    /// Id of the node this action `needs`.
    #[serde(rename = "resolvedById", skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowNode {
    pub on: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum NodeType<'c> {
    Action(ActionNode<'c>),
    Workflow(WorkflowNode),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode<'c> {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: f64,
    pub y: f64,
    /// Coordinates written explicitly; layout never overrides these.
    #[serde(rename = "_x", skip_serializing_if = "Option::is_none")]
    pub explicit_x: Option<f64>,
    #[serde(rename = "_y", skip_serializing_if = "Option::is_none")]
    pub explicit_y: Option<f64>,
    #[serde(rename = "resolves")]
    pub children: Vec<String>,
    /// Depth below the root workflow.
    pub index: usize,
    #[serde(flatten)]
    pub node_type: NodeType<'c>,
}

impl<'c> DocumentNode<'c> {
    pub fn is_workflow(&self) -> bool {
        matches!(self.node_type, NodeType::Workflow(_))
    }

    pub fn as_action(&self) -> Option<&ActionNode<'c>> {
        match &self.node_type {
            NodeType::Action(action) => Some(action),
            NodeType::Workflow(_) => None,
        }
    }

    pub fn as_workflow(&self) -> Option<&WorkflowNode> {
        match &self.node_type {
            NodeType::Workflow(workflow) => Some(workflow),
            NodeType::Action(_) => None,
        }
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.as_action().and_then(|a| a.parent.as_deref())
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document<'c> {
    nodes: Vec<DocumentNode<'c>>,
    #[serde(skip)]
    by_id: AHashMap<String, NodeIndex>,
}

impl<'c> Document<'c> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            by_id: AHashMap::new(),
        }
    }

    /// Appends a node, rejecting ids already present.
    pub(crate) fn push(&mut self, node: DocumentNode<'c>) -> Result<NodeIndex, DocumentNode<'c>> {
        if self.by_id.contains_key(&node.id) {
            return Err(node);
        }
        let index = self.nodes.len();
        self.by_id.insert(node.id.clone(), index);
        self.nodes.push(node);
        Ok(index)
    }

    pub fn nodes(&self) -> &[DocumentNode<'c>] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [DocumentNode<'c>] {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.by_id.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&DocumentNode<'c>> {
        self.index_of(id).map(|i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// The first workflow node, which anchors the layout.
    pub fn root(&self) -> Option<&DocumentNode<'c>> {
        self.nodes.iter().find(|n| n.is_workflow())
    }

    pub fn parent(&self, node: &DocumentNode<'c>) -> Option<&DocumentNode<'c>> {
        node.parent_id().and_then(|id| self.get(id))
    }

    pub fn children<'a>(
        &'a self,
        node: &'a DocumentNode<'c>,
    ) -> impl Iterator<Item = &'a DocumentNode<'c>> + 'a {
        node.children.iter().filter_map(move |id| self.get(id))
    }

    /// Pins a node at an explicit position.
    pub fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<(), SemanticError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| SemanticError::UnknownNode(id.to_string()))?;
        let node = &mut self.nodes[index];
        node.x = x;
        node.y = y;
        node.explicit_x = Some(x);
        node.explicit_y = Some(y);
        Ok(())
    }

    /// Adds a new action as the last child of `parent_id`. The position is the
    /// effective one; it is not pinned and a later [`Document::relayout`] may move
    /// it.
    pub fn attach_action(
        &mut self,
        parent_id: &str,
        id: impl Into<String>,
        action: &'c Action,
        position: (f64, f64),
    ) -> Result<NodeIndex, SemanticError> {
        let id = id.into();
        let parent = self
            .index_of(parent_id)
            .ok_or_else(|| SemanticError::UnknownNode(parent_id.to_string()))?;
        if id.contains(['\r', '\n']) {
            return Err(SemanticError::InvalidId(id));
        }
        if self.contains(&id) {
            return Err(SemanticError::NodeExists(id));
        }

        let node = DocumentNode {
            id: id.clone(),
            label: None,
            x: position.0,
            y: position.1,
            explicit_x: None,
            explicit_y: None,
            children: Vec::new(),
            index: self.nodes[parent].index + 1,
            node_type: NodeType::Action(ActionNode {
                uses: action.id.clone(),
                action,
                props: Properties::new(),
                parent: Some(parent_id.to_string()),
            }),
        };

        let index = self.push(node).map_err(|n| SemanticError::NodeExists(n.id))?;
        self.nodes[parent].children.push(id);
        Ok(index)
    }

    /// Suggests where a new child card of `parent_id` can be placed without
    /// overlapping an existing card: below the parent, or right of its last child,
    /// moving right and wrapping to the next row when the row gets too wide.
    pub fn suggest_child_position(
        &self,
        parent_id: &str,
        config: &LayoutConfig,
    ) -> Result<(f64, f64), SemanticError> {
        let parent = self
            .get(parent_id)
            .ok_or_else(|| SemanticError::UnknownNode(parent_id.to_string()))?;
        let (width, height, gap) = (config.card_width, config.card_height, config.gap);

        let (mut x, mut y) = match parent.children.last().and_then(|id| self.get(id)) {
            Some(last) => (last.x + width + gap, last.y),
            None => (parent.x, parent.y + height + gap),
        };
        let row_limit = parent.x + (width + gap) * 2.0;

        // Each move pushes the card right within a row or down to a new row, and
        // both only ever land next to an existing card.
        let bound = (self.nodes.len() + 1) * (self.nodes.len() + 1);
        for _ in 0..=bound {
            let mut moved = false;
            for card in &self.nodes {
                let overlaps_x = x + width > card.x && x <= card.x + width;
                let overlaps_y = y + height > card.y && y <= card.y + height;
                if overlaps_x && overlaps_y {
                    moved = true;
                    x = card.x + width + gap;
                    if x > row_limit {
                        x = parent.x;
                        y = card.y + height + gap;
                    }
                }
            }
            if !moved {
                break;
            }
        }

        Ok((x, y))
    }

    /// Re-runs the layout pass after edits. Explicit positions are kept.
    pub fn relayout(&mut self, config: &LayoutConfig) {
        layout::apply(self, config);
    }
}
