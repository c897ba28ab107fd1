//! Prim's minimum-spanning-tree engine.

use crate::step::{GraphStep, GraphStepKind, SpanningTreeSnapshot};
use stepviz_common::utils::hash::FxHashSet;
use stepviz_common::{EdgeId, Graph, GraphHighlight, HighlightColor, NodeId};

/// A frontier edge from a visited node (`near`) toward an unvisited one
/// (`far`) at the time it was enqueued.
#[derive(Debug, Clone)]
struct Candidate {
    weight: f64,
    near: NodeId,
    far: NodeId,
    id: EdgeId,
}

enum Phase {
    Empty,
    Start,
    SeedCandidates,
    Pop,
    Commit(Candidate),
    Extend(NodeId),
    Final,
    Finished,
}

/// Grows the tree from a start node, keeping frontier candidates sorted
/// ascending by weight (stable among ties) and lazily discarding
/// candidates whose far endpoint was reached through another edge.
/// Absent edge weights default to 0.
pub struct Prim {
    graph: Graph,
    start: NodeId,
    visited: FxHashSet<NodeId>,
    candidates: Vec<Candidate>,
    mst_edges: Vec<EdgeId>,
    mst_weight: f64,
    phase: Phase,
}

impl Prim {
    /// Creates a run from `start_node` (or the first declared node when
    /// absent or unknown).
    #[must_use]
    pub fn new(graph: Graph, start_node: Option<NodeId>) -> Self {
        let start = start_node
            .filter(|id| graph.contains_node(id))
            .or_else(|| graph.nodes.first().map(|n| n.id.clone()));
        let (phase, start) = match start {
            Some(start) => (Phase::Start, start),
            None => (Phase::Empty, NodeId::new("")),
        };
        let mut visited = FxHashSet::default();
        if matches!(phase, Phase::Start) {
            visited.insert(start.clone());
        }
        Self {
            graph,
            start,
            visited,
            candidates: Vec::new(),
            mst_edges: Vec::new(),
            mst_weight: 0.0,
            phase,
        }
    }

    fn snapshot(&self) -> GraphStepKind {
        GraphStepKind::SpanningTree(SpanningTreeSnapshot {
            mst_weight: self.mst_weight,
            mst_edges: self.mst_edges.clone(),
        })
    }

    /// Visited nodes and accepted edges path-colored, the selected edge
    /// accent, remaining candidates secondary.
    fn highlights(&self, selected: Option<&EdgeId>) -> Vec<GraphHighlight> {
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let color = if self.visited.contains(&n.id) {
                    HighlightColor::Path
                } else {
                    HighlightColor::Neutral
                };
                GraphHighlight::node(n.id.clone(), color).with_label(n.display().to_string())
            })
            .collect();
        highlights.extend(self.graph.edges.iter().map(|e| {
            let color = if self.mst_edges.contains(&e.id) {
                HighlightColor::Path
            } else if selected == Some(&e.id) {
                HighlightColor::Accent
            } else if self.candidates.iter().any(|c| c.id == e.id) {
                HighlightColor::Secondary
            } else {
                HighlightColor::Neutral
            };
            GraphHighlight::edge(e.id.clone(), color)
        }));
        highlights
    }

    fn step(
        &self,
        message: String,
        is_final_step: bool,
        highlights: Vec<GraphHighlight>,
        kind: GraphStepKind,
    ) -> GraphStep {
        GraphStep {
            nodes: self.graph.nodes.clone(),
            edges: self.graph.edges.clone(),
            message,
            is_final_step,
            highlights,
            current_node_id: None,
            kind,
        }
    }

    fn display(&self, id: &NodeId) -> String {
        self.graph
            .node(id)
            .map_or_else(|| id.to_string(), |n| n.display().to_string())
    }

    fn done(&self) -> bool {
        self.mst_edges.len() == self.graph.node_count().saturating_sub(1)
    }

    /// Enqueues every edge leaving `from` toward an unvisited node, then
    /// re-sorts the candidate list (stable, so equal weights keep their
    /// enqueue order).
    fn push_candidates_from(&mut self, from: &NodeId) {
        for edge in &self.graph.edges {
            if let Some(far) = edge.endpoint_from(from) {
                if !self.visited.contains(far) {
                    self.candidates.push(Candidate {
                        weight: edge.weight_or(0.0),
                        near: from.clone(),
                        far: far.clone(),
                        id: edge.id.clone(),
                    });
                }
            }
        }
        self.candidates
            .sort_by(|a, b| a.weight.total_cmp(&b.weight));
    }
}

impl Iterator for Prim {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Empty => {
                let kind = self.snapshot();
                Some(self.step("Graph is empty.".to_string(), true, Vec::new(), kind))
            }
            Phase::Start => {
                self.phase = Phase::SeedCandidates;
                Some(self.step(
                    format!(
                        "Starting Prim's algorithm from node {}.",
                        self.display(&self.start)
                    ),
                    false,
                    self.highlights(None),
                    self.snapshot(),
                ))
            }
            Phase::SeedCandidates => {
                let start = self.start.clone();
                self.push_candidates_from(&start);
                self.phase = Phase::Pop;
                Some(self.step(
                    format!(
                        "Added initial candidate edges from {}. Candidates count: {}",
                        self.display(&start),
                        self.candidates.len()
                    ),
                    false,
                    self.highlights(None),
                    self.snapshot(),
                ))
            }
            Phase::Pop => {
                if self.candidates.is_empty() || self.done() {
                    self.phase = Phase::Final;
                    return self.next();
                }
                let best = self.candidates.remove(0);
                if self.visited.contains(&best.far) {
                    // Stale candidate: its far endpoint joined the tree
                    // through another edge. Discard lazily.
                    let message = format!(
                        "Considering edge {} ({}-{}). Node {} already in MST. Discarding.",
                        best.id, best.near, best.far, best.far
                    );
                    let highlights = self.highlights(Some(&best.id));
                    self.phase = Phase::Pop;
                    return Some(self.step(message, false, highlights, self.snapshot()));
                }
                let message = format!(
                    "Selected edge {} ({}-{}) with weight {}. Adding {} to MST.",
                    best.id, best.near, best.far, best.weight, best.far
                );
                let highlights = self.highlights(Some(&best.id));
                self.phase = Phase::Commit(best);
                Some(self.step(message, false, highlights, self.snapshot()))
            }
            Phase::Commit(best) => {
                self.mst_edges.push(best.id.clone());
                self.mst_weight += best.weight;
                self.visited.insert(best.far.clone());
                tracing::trace!(weight = self.mst_weight, "edge accepted into mst");
                self.phase = if self.done() {
                    Phase::Pop
                } else {
                    Phase::Extend(best.far.clone())
                };
                Some(self.step(
                    format!(
                        "Added edge {} and node {} to MST. Current MST weight: {:.2}.",
                        best.id, best.far, self.mst_weight
                    ),
                    false,
                    self.highlights(None),
                    self.snapshot(),
                ))
            }
            Phase::Extend(node) => {
                self.push_candidates_from(&node);
                self.phase = Phase::Pop;
                Some(self.step(
                    format!(
                        "Updated candidate edges from new MST node {}. Candidates count: {}",
                        node,
                        self.candidates.len()
                    ),
                    false,
                    self.highlights(None),
                    self.snapshot(),
                ))
            }
            Phase::Final => {
                let message = if self.done() {
                    format!(
                        "Prim's algorithm complete. MST weight: {:.2}.",
                        self.mst_weight
                    )
                } else {
                    format!(
                        "Prim's algorithm complete. Graph may be disconnected. \
                         MST weight: {:.2}.",
                        self.mst_weight
                    )
                };
                let kind = self.snapshot();
                let highlights = self.highlights(None);
                Some(self.step(message, true, highlights, kind))
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_common::{GraphEdge, GraphNode};

    fn weighted_square() -> Graph {
        Graph::new(
            vec![
                GraphNode::new("a"),
                GraphNode::new("b"),
                GraphNode::new("c"),
                GraphNode::new("d"),
            ],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(4.0),
                GraphEdge::new("e1", "b", "c").with_weight(1.0),
                GraphEdge::new("e2", "c", "d").with_weight(2.0),
                GraphEdge::new("e3", "d", "a").with_weight(3.0),
            ],
        )
    }

    fn last_tree(steps: &[GraphStep]) -> &SpanningTreeSnapshot {
        steps.last().unwrap().spanning_tree().unwrap()
    }

    #[test]
    fn test_grows_minimum_tree_from_default_start() {
        let steps: Vec<_> = Prim::new(weighted_square(), None).collect();
        let tree = last_tree(&steps);
        assert_eq!(tree.mst_weight, 6.0);
        assert_eq!(tree.mst_edges.len(), 3);
        assert!(!steps.last().unwrap().message.contains("disconnected"));
    }

    #[test]
    fn test_explicit_start_node() {
        let steps: Vec<_> = Prim::new(weighted_square(), Some("c".into())).collect();
        assert!(steps[0].message.contains("from node c"));
        assert_eq!(last_tree(&steps).mst_weight, 6.0);
    }

    #[test]
    fn test_unknown_start_falls_back_to_first() {
        let steps: Vec<_> = Prim::new(weighted_square(), Some("zz".into())).collect();
        assert!(steps[0].message.contains("from node a"));
    }

    #[test]
    fn test_stale_candidates_discarded_lazily() {
        // c joins the tree through b, so the queued a-c candidate pops as
        // stale while d is still missing.
        let g = Graph::new(
            vec![
                GraphNode::new("a"),
                GraphNode::new("b"),
                GraphNode::new("c"),
                GraphNode::new("d"),
            ],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0),
                GraphEdge::new("e1", "a", "c").with_weight(2.0),
                GraphEdge::new("e2", "b", "c").with_weight(1.0),
                GraphEdge::new("e3", "c", "d").with_weight(5.0),
            ],
        );
        let steps: Vec<_> = Prim::new(g, Some("a".into())).collect();
        assert!(steps
            .iter()
            .any(|s| s.message.contains("already in MST. Discarding")));
        assert_eq!(last_tree(&steps).mst_weight, 7.0); // e0 + e2 + e3
    }

    #[test]
    fn test_disconnected_graph_reports_forest() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
            vec![GraphEdge::new("e0", "a", "b").with_weight(1.0)],
        );
        let steps: Vec<_> = Prim::new(g, None).collect();
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert!(last.message.contains("may be disconnected"));
        assert_eq!(last_tree(&steps).mst_weight, 1.0);
    }

    #[test]
    fn test_empty_graph() {
        let steps: Vec<_> = Prim::new(Graph::default(), None).collect();
        assert_eq!(steps.len(), 1);
        assert!(steps[0].is_final_step);
        assert_eq!(steps[0].spanning_tree().unwrap().mst_weight, 0.0);
    }

    #[test]
    fn test_directed_edges_respected_in_candidates() {
        // b->a directed cannot be traversed from a; the graph is
        // effectively disconnected from a's side.
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("e0", "b", "a").with_weight(1.0).directed()],
        );
        let steps: Vec<_> = Prim::new(g, Some("a".into())).collect();
        assert!(steps.last().unwrap().message.contains("may be disconnected"));
    }

    #[test]
    fn test_undirected_candidates_from_either_endpoint() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("e0", "b", "a").with_weight(1.0)],
        );
        let steps: Vec<_> = Prim::new(g, Some("a".into())).collect();
        assert_eq!(last_tree(&steps).mst_weight, 1.0);
    }
}
