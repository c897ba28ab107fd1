//! The graph data model consumed by every graph-family engine.
//!
//! A [`Graph`] is a plain node list plus edge list; engines never mutate
//! structure, only per-run bookkeeping (distances, predecessors, accepted
//! edges). Undirected edges are traversable in both directions during
//! neighbor enumeration.

use super::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// A graph node with an optional display label and optional 2D coordinates.
///
/// Coordinates feed the A* heuristic (and visual placement); they are not
/// required by any other engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique, stable node id.
    pub id: NodeId,
    /// Optional display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional x coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Optional y coordinate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl GraphNode {
    /// Creates a node with the given id and no label or coordinates.
    #[must_use]
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            label: None,
            x: None,
            y: None,
        }
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the 2D coordinates.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Returns the display label, falling back to the id.
    #[must_use]
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(self.id.as_str())
    }
}

/// A weighted, optionally directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Unique, stable edge id.
    pub id: EdgeId,
    /// Source node id.
    pub source: NodeId,
    /// Target node id.
    pub target: NodeId,
    /// Edge weight. Engines substitute an algorithm-specific default
    /// (1 or 0) when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Whether the edge is one-way. `false` means traversable both ways.
    #[serde(default)]
    pub directed: bool,
}

impl GraphEdge {
    /// Creates an undirected, unweighted edge.
    #[must_use]
    pub fn new(id: impl Into<EdgeId>, source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            weight: None,
            directed: false,
        }
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Marks the edge as one-way (source to target only).
    #[must_use]
    pub fn directed(mut self) -> Self {
        self.directed = true;
        self
    }

    /// Returns the weight, or `default` when the edge carries none.
    #[must_use]
    pub fn weight_or(&self, default: f64) -> f64 {
        self.weight.unwrap_or(default)
    }

    /// Returns the endpoint reached by traversing this edge from `from`,
    /// or `None` when the edge cannot be traversed from there.
    ///
    /// Directed edges are traversable only source-to-target; undirected
    /// edges are traversable from either endpoint.
    #[must_use]
    pub fn endpoint_from(&self, from: &NodeId) -> Option<&NodeId> {
        if self.source == *from {
            Some(&self.target)
        } else if self.target == *from && !self.directed {
            Some(&self.source)
        } else {
            None
        }
    }

    /// Returns true when this edge joins `a` and `b`, respecting direction.
    #[must_use]
    pub fn connects(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.source == *a && self.target == *b)
            || (!self.directed && self.source == *b && self.target == *a)
    }
}

/// A node list plus edge list, the input shape of every graph engine.
///
/// Edges must reference declared nodes; engines index their bookkeeping
/// by the declared node set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// Nodes, in declaration order. Declaration order is load-bearing:
    /// engines iterate it for deterministic step sequences.
    pub nodes: Vec<GraphNode>,
    /// Edges, in declaration order.
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    /// Creates a graph from node and edge lists.
    #[must_use]
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Self { nodes, edges }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns true when the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    /// Returns true when a node with the given id exists.
    #[must_use]
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Looks up an edge by id.
    #[must_use]
    pub fn edge(&self, id: &EdgeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    /// Finds an edge joining `a` and `b` that is traversable from `a`.
    #[must_use]
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&GraphEdge> {
        self.edges.iter().find(|e| e.connects(a, b))
    }

    /// Returns node ids in declaration order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }
}
