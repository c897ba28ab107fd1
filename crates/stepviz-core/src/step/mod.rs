//! Step types, one shape per algorithm family.
//!
//! A step is an immutable snapshot emitted at each semantically meaningful
//! point of an algorithm's execution. Snapshots are owned copies made at
//! the moment of emission; later mutation by producer or consumer cannot
//! corrupt earlier steps.
//!
//! Distances use `f64` with `f64::INFINITY` as the unreached sentinel.
//! Serialization caveat: infinity is not native JSON (serde_json emits
//! `null`), so serializing callers must special-case it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stepviz_common::{ArrayHighlight, EdgeId, GraphEdge, GraphHighlight, GraphNode, NodeId};

/// Formats a distance for narration, rendering infinity as `∞`.
#[must_use]
pub fn fmt_dist(d: f64) -> String {
    if d.is_infinite() {
        "∞".to_string()
    } else {
        d.to_string()
    }
}

/// Where a search engine's attention currently sits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchCursor {
    /// No position yet (initial and terminal steps).
    None,
    /// Linear scan at `index`.
    Scan {
        /// Index being examined.
        index: usize,
    },
    /// Binary-search bisection bounds. `low`/`high` are signed because the
    /// window legitimately crosses (`low > high`) on exhaustion.
    Bisect {
        /// Lower bound of the active window.
        low: i64,
        /// Upper bound of the active window.
        high: i64,
        /// Midpoint being examined, when one has been computed.
        mid: Option<usize>,
    },
}

/// One snapshot of a search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    /// Full copy of the sequence under search.
    pub array: Vec<i64>,
    /// The value being searched for.
    pub target: i64,
    /// Human-readable narration.
    pub message: String,
    /// True exactly once, on the last emission of the run.
    pub is_final_step: bool,
    /// Per-index semantic highlights.
    pub highlights: Vec<ArrayHighlight>,
    /// Current scan/bisection position.
    pub cursor: SearchCursor,
    /// Present only when the target was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_found_at_index: Option<usize>,
}

/// One snapshot of a sort run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortStep {
    /// Full copy of the sequence at this point of the run.
    pub array: Vec<i64>,
    /// Human-readable narration.
    pub message: String,
    /// True exactly once, on the last emission of the run.
    pub is_final_step: bool,
    /// Per-index semantic highlights.
    pub highlights: Vec<ArrayHighlight>,
    /// Index pair being compared, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparing: Option<(usize, usize)>,
    /// Index pair being swapped, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swapping: Option<(usize, usize)>,
    /// Indices known to be in final position. Covers every index on the
    /// final step.
    pub sorted_indices: Vec<usize>,
    /// Active pivot index (quick sort).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot_index: Option<usize>,
    /// Inclusive bounds of the sub-range being worked on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_array_bounds: Option<(usize, usize)>,
}

/// Single-source shortest-path bookkeeping (Dijkstra, Bellman-Ford).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleSourceSnapshot {
    /// Best known distance per node, `f64::INFINITY` when unreached.
    pub distances: IndexMap<NodeId, f64>,
    /// Predecessor per node on the best known path, `None` when unset.
    pub predecessors: IndexMap<NodeId, Option<NodeId>>,
    /// Ordered start-to-target node path, present only on a successful
    /// final step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_found_path: Option<Vec<NodeId>>,
    /// Set on the final step when a negative cycle was detected.
    #[serde(default)]
    pub negative_cycle_detected: bool,
}

impl SingleSourceSnapshot {
    /// Initializes distances (start = 0, rest = infinity) and empty
    /// predecessors over the given nodes.
    #[must_use]
    pub fn init(nodes: &[GraphNode], start: &NodeId) -> Self {
        let mut distances = IndexMap::new();
        let mut predecessors = IndexMap::new();
        for node in nodes {
            distances.insert(node.id.clone(), f64::INFINITY);
            predecessors.insert(node.id.clone(), None);
        }
        distances.insert(start.clone(), 0.0);
        Self {
            distances,
            predecessors,
            target_found_path: None,
            negative_cycle_detected: false,
        }
    }
}

/// A* bookkeeping: single-source state plus per-node f-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicSnapshot {
    /// Cost-so-far (g-scores) and predecessors.
    pub sssp: SingleSourceSnapshot,
    /// Estimated total cost per node (`g + h`).
    pub f_scores: IndexMap<NodeId, f64>,
}

/// All-pairs bookkeeping (Floyd-Warshall).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllPairsSnapshot {
    /// Best known distance per (source, destination) pair.
    pub distance_matrix: IndexMap<NodeId, IndexMap<NodeId, f64>>,
    /// Immediate next node on the best known path per pair.
    pub next_hop_matrix: IndexMap<NodeId, IndexMap<NodeId, Option<NodeId>>>,
    /// Intermediate node of the current iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_k: Option<NodeId>,
    /// Source node of the current iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_source: Option<NodeId>,
    /// Destination node of the current iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_dest: Option<NodeId>,
    /// Set on the final step when the diagonal scan found a negative cycle.
    #[serde(default)]
    pub negative_cycle_detected: bool,
}

/// Minimum-spanning-tree bookkeeping (Kruskal, Prim), reported in every
/// step of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanningTreeSnapshot {
    /// Sum of accepted edge weights so far.
    pub mst_weight: f64,
    /// Accepted edges, in acceptance order.
    pub mst_edges: Vec<EdgeId>,
}

/// Algorithm-family extension of a graph step.
///
/// Consumers pattern-match on the variant instead of probing optional
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraphStepKind {
    /// Input validation failed (or the graph was empty); the step carries
    /// only the message.
    Invalid,
    /// Dijkstra / Bellman-Ford state.
    SingleSource(SingleSourceSnapshot),
    /// A* state.
    Heuristic(HeuristicSnapshot),
    /// Floyd-Warshall state.
    AllPairs(AllPairsSnapshot),
    /// Kruskal / Prim state.
    SpanningTree(SpanningTreeSnapshot),
}

/// One snapshot of a graph-algorithm run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphStep {
    /// Full copy of the node set.
    pub nodes: Vec<GraphNode>,
    /// Full copy of the edge set.
    pub edges: Vec<GraphEdge>,
    /// Human-readable narration.
    pub message: String,
    /// True exactly once, on the last emission of the run.
    pub is_final_step: bool,
    /// Per-element semantic highlights.
    pub highlights: Vec<GraphHighlight>,
    /// The node the algorithm is currently processing, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_node_id: Option<NodeId>,
    /// Algorithm-family extension.
    pub kind: GraphStepKind,
}

impl GraphStep {
    /// Returns the single-source snapshot, if this step carries one
    /// (directly or inside the A* extension).
    #[must_use]
    pub fn single_source(&self) -> Option<&SingleSourceSnapshot> {
        match &self.kind {
            GraphStepKind::SingleSource(s) => Some(s),
            GraphStepKind::Heuristic(h) => Some(&h.sssp),
            _ => None,
        }
    }

    /// Returns the spanning-tree snapshot, if this step carries one.
    #[must_use]
    pub fn spanning_tree(&self) -> Option<&SpanningTreeSnapshot> {
        match &self.kind {
            GraphStepKind::SpanningTree(s) => Some(s),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_common::HighlightColor;

    #[test]
    fn test_fmt_dist() {
        assert_eq!(fmt_dist(5.0), "5");
        assert_eq!(fmt_dist(2.5), "2.5");
        assert_eq!(fmt_dist(f64::INFINITY), "∞");
    }

    #[test]
    fn test_single_source_init() {
        let nodes = vec![GraphNode::new("a"), GraphNode::new("b")];
        let snap = SingleSourceSnapshot::init(&nodes, &"a".into());
        assert_eq!(snap.distances[&NodeId::new("a")], 0.0);
        assert!(snap.distances[&NodeId::new("b")].is_infinite());
        assert_eq!(snap.predecessors[&NodeId::new("b")], None);
    }

    #[test]
    fn test_sort_step_round_trips_finite_values() {
        let step = SortStep {
            array: vec![3, 1, 2],
            message: "Comparing 3 and 1.".into(),
            is_final_step: false,
            highlights: vec![ArrayHighlight::new(0, HighlightColor::Primary)],
            comparing: Some((0, 1)),
            swapping: None,
            sorted_indices: vec![],
            pivot_index: None,
            sub_array_bounds: None,
        };
        let json = serde_json::to_string(&step).unwrap();
        let back: SortStep = serde_json::from_str(&json).unwrap();
        assert_eq!(back, step);
    }

    #[test]
    fn test_graph_step_kind_accessors() {
        let nodes = vec![GraphNode::new("a")];
        let step = GraphStep {
            nodes: nodes.clone(),
            edges: vec![],
            message: "init".into(),
            is_final_step: false,
            highlights: vec![],
            current_node_id: None,
            kind: GraphStepKind::Heuristic(HeuristicSnapshot {
                sssp: SingleSourceSnapshot::init(&nodes, &"a".into()),
                f_scores: IndexMap::new(),
            }),
        };
        assert!(step.single_source().is_some());
        assert!(step.spanning_tree().is_none());
    }
}
