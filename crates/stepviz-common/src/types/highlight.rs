//! Highlight vocabulary shared by every step family.
//!
//! A highlight assigns a semantic color tag (and optional short label) to
//! an array index or a graph element. The tags are semantic roles, not
//! concrete colors; the renderer owns the mapping to pixels.

use super::id::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Semantic color tag for a highlighted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HighlightColor {
    /// Element currently being compared or in the active working set.
    Primary,
    /// Auxiliary role (bounds markers, the node being processed).
    Secondary,
    /// Found, sorted, or otherwise settled.
    Accent,
    /// Being swapped, discarded, or implicated in a failure.
    Destructive,
    /// Checked and out of play.
    Muted,
    /// Inactive.
    Neutral,
    /// Informational role (active range, examined neighbor).
    Info,
    /// Finalized by the algorithm (closed set).
    Visited,
    /// On the reconstructed result path / in the spanning tree.
    Path,
}

/// A highlight on one array index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayHighlight {
    /// The highlighted index.
    pub index: usize,
    /// Semantic color tag.
    pub color: HighlightColor,
    /// Optional short label ("Mid", "Pivot", "Sorted", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ArrayHighlight {
    /// Creates an unlabeled highlight.
    #[must_use]
    pub fn new(index: usize, color: HighlightColor) -> Self {
        Self {
            index,
            color,
            label: None,
        }
    }

    /// Attaches a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Reference to a highlighted graph element, tagged by element type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphElement {
    /// A node, by id.
    Node(NodeId),
    /// An edge, by id.
    Edge(EdgeId),
}

/// A highlight on one graph element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphHighlight {
    /// The highlighted element.
    pub element: GraphElement,
    /// Semantic color tag.
    pub color: HighlightColor,
    /// Optional short label (typically the best known distance).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GraphHighlight {
    /// Creates an unlabeled node highlight.
    #[must_use]
    pub fn node(id: NodeId, color: HighlightColor) -> Self {
        Self {
            element: GraphElement::Node(id),
            color,
            label: None,
        }
    }

    /// Creates an unlabeled edge highlight.
    #[must_use]
    pub fn edge(id: EdgeId, color: HighlightColor) -> Self {
        Self {
            element: GraphElement::Edge(id),
            color,
            label: None,
        }
    }

    /// Attaches a label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns true when this highlight targets the given node.
    #[must_use]
    pub fn is_node(&self, id: &NodeId) -> bool {
        matches!(&self.element, GraphElement::Node(n) if n == id)
    }

    /// Returns true when this highlight targets the given edge.
    #[must_use]
    pub fn is_edge(&self, id: &EdgeId) -> bool {
        matches!(&self.element, GraphElement::Edge(e) if e == id)
    }
}
