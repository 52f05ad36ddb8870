//! Default placement of cards on the canvas.
//!
//! The root workflow sits where it was written (or at the origin). Its children
//! form a row one trigger-height below it, and every action's children form a row
//! one card-height below that action, spaced one card width plus gap apart.
//! Coordinates written in the source are never overridden.

use crate::document::{Document, DocumentNode, NodeIndex};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Card geometry used by the layout pass, matching what the renderer draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub card_width: f64,
    pub card_height: f64,
    /// Height of a workflow (trigger) card.
    pub trigger_height: f64,
    pub gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            card_width: 250.0,
            card_height: 200.0,
            trigger_height: 100.0,
            gap: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Reads geometry from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Horizontal distance between neighbouring cards in a row.
    pub fn column_step(&self) -> f64 {
        self.card_width + self.gap
    }

    /// Vertical distance from a parent card to the row of its children.
    pub fn row_step(&self, parent: &DocumentNode<'_>) -> f64 {
        let height = if parent.is_workflow() {
            self.trigger_height
        } else {
            self.card_height
        };
        height + self.gap
    }
}

/// Assigns default positions below the root workflow and depth indices across the
/// whole document.
///
/// Parentless nodes other than the root only have their subtree indices fixed up.
/// Returns the first node no parentless node reaches, which can only happen when
/// `needs` links form a loop.
pub(crate) fn apply(document: &mut Document<'_>, config: &LayoutConfig) -> Option<NodeIndex> {
    let root = document.nodes().iter().position(DocumentNode::is_workflow);
    let starts: Vec<NodeIndex> = root
        .into_iter()
        .chain(
            document
                .nodes()
                .iter()
                .enumerate()
                .filter(|(i, node)| Some(*i) != root && node.parent_id().is_none())
                .map(|(i, _)| i),
        )
        .collect();

    let mut visited = vec![false; document.len()];
    for start in starts {
        let place = Some(start) == root;
        visited[start] = true;
        document.nodes_mut()[start].index = 0;

        let mut stack = vec![start];
        while let Some(parent) = stack.pop() {
            let children: Vec<NodeIndex> = document.nodes()[parent]
                .children
                .iter()
                .filter_map(|id| document.index_of(id))
                .collect();
            let (parent_x, parent_y, parent_index) = {
                let node = &document.nodes()[parent];
                (node.x, node.y, node.index)
            };
            let row_step = config.row_step(&document.nodes()[parent]);

            for (ordinal, child) in children.into_iter().enumerate() {
                if visited[child] {
                    continue;
                }
                visited[child] = true;

                let node = &mut document.nodes_mut()[child];
                node.index = parent_index + 1;
                if place {
                    if node.explicit_x.is_none() {
                        node.x = parent_x + ordinal as f64 * config.column_step();
                    }
                    if node.explicit_y.is_none() {
                        node.y = parent_y + row_step;
                    }
                }
                trace!(id = %node.id, x = node.x, y = node.y, index = node.index, "placed node");
                stack.push(child);
            }
        }
    }

    visited.iter().position(|seen| !seen)
}
