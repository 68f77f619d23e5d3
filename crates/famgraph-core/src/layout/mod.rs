//! Layout engine
//!
//! Turns a snapshot and its generation map into positioned nodes and display
//! edges for an external renderer, and derives depth-bounded views of the
//! result. Nothing here mutates its input.

pub mod filter;
pub mod graph;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::errors::FamilyError;
use crate::model::Person;

pub use filter::{filter_by_depth, UNBOUNDED_DEPTH};
pub use graph::{apply_positions, build_graph, layout_tree};

/// Axis along which generations are stacked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Generations run top to bottom
    #[default]
    #[serde(alias = "TB", alias = "tb")]
    Vertical,
    /// Generations run left to right
    #[serde(alias = "LR", alias = "lr")]
    Horizontal,
}

impl FromStr for LayoutDirection {
    type Err = FamilyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "vertical" | "tb" => Ok(LayoutDirection::Vertical),
            "horizontal" | "lr" => Ok(LayoutDirection::Horizontal),
            other => Err(FamilyError::InvalidInput {
                reason: format!("unknown layout direction '{}'", other),
            }),
        }
    }
}

/// Spacing used when positioning nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes of one generation
    pub node_spacing: f64,
    /// Gap between consecutive generations
    pub generation_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 250.0,
            generation_spacing: 200.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A person placed in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub person: Person,
    pub generation: i32,
    pub position: Position,
    pub parent_ids: Vec<String>,
    /// In birth order
    pub child_ids: Vec<String>,
    pub spouse_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Directed, source is the parent
    ParentChild,
    /// Undirected
    Spouse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// Positioned nodes and display edges
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TreeLayout {
    pub nodes: Vec<TreeNode>,
    pub edges: Vec<DisplayEdge>,
}

/// Summary counts shown alongside a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    pub people: usize,
    pub generations: usize,
    pub connections: usize,
}

impl TreeLayout {
    pub fn node(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn stats(&self) -> LayoutStats {
        let generations: BTreeSet<i32> = self.nodes.iter().map(|n| n.generation).collect();
        LayoutStats {
            people: self.nodes.len(),
            generations: generations.len(),
            connections: self.edges.len(),
        }
    }
}
