use serde::Serialize;

use crate::error::PathreachError;

/// Index of a node within its owning [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index of an edge within its owning [`Graph`](super::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A labeled element of a query result: either a node or an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GraphObject {
    Node(NodeId),
    Edge(EdgeId),
}

impl GraphObject {
    pub fn as_node(self) -> Option<NodeId> {
        match self {
            GraphObject::Node(id) => Some(id),
            GraphObject::Edge(_) => None,
        }
    }

    pub fn as_edge(self) -> Option<EdgeId> {
        match self {
            GraphObject::Edge(id) => Some(id),
            GraphObject::Node(_) => None,
        }
    }
}

/// Direction for traversal and stream queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the inputs of the pathway (backlinks)
    Upstream,
    /// Towards the outputs of the pathway
    Downstream,
    /// Both directions. Valid for composite queries only; the BFS
    /// primitive rejects it at construction.
    Bothstream,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::Upstream => "upstream",
            Direction::Downstream => "downstream",
            Direction::Bothstream => "bothstream",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Direction {
    type Err = PathreachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upstream" | "up" => Ok(Direction::Upstream),
            "downstream" | "down" => Ok(Direction::Downstream),
            "bothstream" | "both" => Ok(Direction::Bothstream),
            other => Err(PathreachError::UnknownDirection(other.to_string())),
        }
    }
}

/// Kind of a wrapped pathway element, decided once when the node is built.
///
/// Only entity nodes are "breadth" nodes: crossing them increments the
/// hop distance. Events (reactions) and controls are distance-transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A physical entity or state
    Entity,
    /// A reaction or other event
    Event,
    /// A control relationship over an event
    Control,
}

impl NodeKind {
    /// Whether crossing a node of this kind increments hop distance
    pub fn is_breadth(self) -> bool {
        matches!(self, NodeKind::Entity)
    }
}

/// Effect sign carried on nodes for callers; the engine itself never
/// consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sign {
    #[default]
    Positive,
    Negative,
}
