//! Floyd-Warshall all-pairs shortest-path engine.
//!
//! Triple-nested iteration over intermediate `k`, source `i`, destination
//! `j`, one step per combination plus an extra step on each improving
//! update. This is inherently O(V^3) steps; callers cap node counts
//! accordingly. After the loops a diagonal scan reports any negative
//! cycle.

use crate::step::{fmt_dist, AllPairsSnapshot, GraphStep, GraphStepKind};
use indexmap::IndexMap;
use stepviz_common::{Graph, GraphHighlight, HighlightColor, NodeId};

enum Phase {
    Empty,
    Init,
    Check,
    Updated,
    Final,
    Finished,
}

/// Step-by-step all-pairs shortest paths. Absent edge weights default to
/// 1; parallel edges keep the minimum weight at initialization.
pub struct FloydWarshall {
    graph: Graph,
    node_ids: Vec<NodeId>,
    dist: IndexMap<NodeId, IndexMap<NodeId, f64>>,
    next_hop: IndexMap<NodeId, IndexMap<NodeId, Option<NodeId>>>,
    k: usize,
    i: usize,
    j: usize,
    phase: Phase,
}

impl FloydWarshall {
    /// Creates an all-pairs run over the graph.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let node_ids = graph.node_ids();
        let mut dist: IndexMap<NodeId, IndexMap<NodeId, f64>> = IndexMap::new();
        let mut next_hop: IndexMap<NodeId, IndexMap<NodeId, Option<NodeId>>> = IndexMap::new();

        for a in &node_ids {
            let mut dist_row = IndexMap::new();
            let mut hop_row = IndexMap::new();
            for b in &node_ids {
                if a == b {
                    dist_row.insert(b.clone(), 0.0);
                    hop_row.insert(b.clone(), Some(b.clone()));
                } else {
                    dist_row.insert(b.clone(), f64::INFINITY);
                    hop_row.insert(b.clone(), None);
                }
            }
            dist.insert(a.clone(), dist_row);
            next_hop.insert(a.clone(), hop_row);
        }

        for edge in &graph.edges {
            let weight = edge.weight_or(1.0);
            // Parallel edges keep the minimum.
            if dist[&edge.source][&edge.target] > weight {
                dist[&edge.source].insert(edge.target.clone(), weight);
                next_hop[&edge.source].insert(edge.target.clone(), Some(edge.target.clone()));
            }
            if !edge.directed && dist[&edge.target][&edge.source] > weight {
                dist[&edge.target].insert(edge.source.clone(), weight);
                next_hop[&edge.target].insert(edge.source.clone(), Some(edge.source.clone()));
            }
        }

        let phase = if node_ids.is_empty() {
            Phase::Empty
        } else {
            Phase::Init
        };
        Self {
            graph,
            node_ids,
            dist,
            next_hop,
            k: 0,
            i: 0,
            j: 0,
            phase,
        }
    }

    fn snapshot(&self, negative_cycle: bool, with_cursor: bool) -> AllPairsSnapshot {
        AllPairsSnapshot {
            distance_matrix: self.dist.clone(),
            next_hop_matrix: self.next_hop.clone(),
            current_k: with_cursor.then(|| self.node_ids[self.k].clone()),
            current_source: with_cursor.then(|| self.node_ids[self.i].clone()),
            current_dest: with_cursor.then(|| self.node_ids[self.j].clone()),
            negative_cycle_detected: negative_cycle,
        }
    }

    fn neutral_highlights(&self) -> Vec<GraphHighlight> {
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| GraphHighlight::node(n.id.clone(), HighlightColor::Neutral))
            .collect();
        highlights.extend(
            self.graph
                .edges
                .iter()
                .map(|e| GraphHighlight::edge(e.id.clone(), HighlightColor::Neutral)),
        );
        highlights
    }

    /// Iteration highlights: k secondary, i primary, j info, plus the
    /// direct i->k and k->j edges when they exist (and i->j on an update).
    fn cursor_highlights(&self, updated: bool) -> Vec<GraphHighlight> {
        let (k_id, i_id, j_id) = (
            &self.node_ids[self.k],
            &self.node_ids[self.i],
            &self.node_ids[self.j],
        );
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let color = if n.id == *k_id {
                    HighlightColor::Secondary
                } else if n.id == *i_id {
                    HighlightColor::Primary
                } else if n.id == *j_id && i_id != j_id {
                    HighlightColor::Info
                } else {
                    HighlightColor::Neutral
                };
                GraphHighlight::node(n.id.clone(), color).with_label(n.display().to_string())
            })
            .collect();

        let ik = self.graph.edge_between(i_id, k_id).map(|e| e.id.clone());
        let kj = self.graph.edge_between(k_id, j_id).map(|e| e.id.clone());
        let ij = updated
            .then(|| self.graph.edge_between(i_id, j_id).map(|e| e.id.clone()))
            .flatten();
        highlights.extend(self.graph.edges.iter().map(|e| {
            let color = if ij.as_ref() == Some(&e.id) {
                HighlightColor::Accent
            } else if ik.as_ref() == Some(&e.id) {
                HighlightColor::Primary
            } else if kj.as_ref() == Some(&e.id) {
                HighlightColor::Info
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

    /// Moves the (k, i, j) cursor forward; returns false when the loops
    /// are exhausted.
    fn advance_cursor(&mut self) -> bool {
        let n = self.node_ids.len();
        self.j += 1;
        if self.j == n {
            self.j = 0;
            self.i += 1;
            if self.i == n {
                self.i = 0;
                self.k += 1;
            }
        }
        self.k < n
    }

    fn after_check(&mut self) {
        self.phase = if self.advance_cursor() {
            Phase::Check
        } else {
            Phase::Final
        };
    }
}

impl Iterator for FloydWarshall {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Empty => Some(self.step(
                "Graph is empty.".to_string(),
                true,
                Vec::new(),
                GraphStepKind::Invalid,
            )),
            Phase::Init => {
                self.phase = Phase::Check;
                Some(self.step(
                    "Initialized distance and next hop matrices.".to_string(),
                    false,
                    self.neutral_highlights(),
                    GraphStepKind::AllPairs(self.snapshot(false, false)),
                ))
            }
            Phase::Check => {
                let (k_id, i_id, j_id) = (
                    self.node_ids[self.k].clone(),
                    self.node_ids[self.i].clone(),
                    self.node_ids[self.j].clone(),
                );
                let d_ij = self.dist[&i_id][&j_id];
                let d_ik = self.dist[&i_id][&k_id];
                let d_kj = self.dist[&k_id][&j_id];
                let via = if d_ik.is_infinite() || d_kj.is_infinite() {
                    f64::INFINITY
                } else {
                    d_ik + d_kj
                };
                let message = format!(
                    "Iteration k={}, i={}, j={}. Checking path {} -> {} -> {}. \
                     dist({},{}) = {}, dist({},{}) + dist({},{}) = {}",
                    k_id,
                    i_id,
                    j_id,
                    i_id,
                    k_id,
                    j_id,
                    i_id,
                    j_id,
                    fmt_dist(d_ij),
                    i_id,
                    k_id,
                    k_id,
                    j_id,
                    fmt_dist(via)
                );
                let step = self.step(
                    message,
                    false,
                    self.cursor_highlights(false),
                    GraphStepKind::AllPairs(self.snapshot(false, true)),
                );
                if via < d_ij {
                    let hop = self.next_hop[&i_id][&k_id].clone();
                    self.dist[&i_id].insert(j_id.clone(), via);
                    self.next_hop[&i_id].insert(j_id, hop);
                    self.phase = Phase::Updated;
                } else {
                    self.after_check();
                }
                Some(step)
            }
            Phase::Updated => {
                let (k_id, i_id, j_id) = (
                    self.node_ids[self.k].clone(),
                    self.node_ids[self.i].clone(),
                    self.node_ids[self.j].clone(),
                );
                let hop = self.next_hop[&i_id][&j_id]
                    .as_ref()
                    .map_or_else(|| "-".to_string(), ToString::to_string);
                let message = format!(
                    "Updated dist({},{}) to {} via {}. Next hop from {} to {} is {}.",
                    i_id,
                    j_id,
                    fmt_dist(self.dist[&i_id][&j_id]),
                    k_id,
                    i_id,
                    j_id,
                    hop
                );
                let step = self.step(
                    message,
                    false,
                    self.cursor_highlights(true),
                    GraphStepKind::AllPairs(self.snapshot(false, true)),
                );
                self.after_check();
                Some(step)
            }
            Phase::Final => {
                let negative = self
                    .node_ids
                    .iter()
                    .find(|id| self.dist[*id][*id] < 0.0)
                    .cloned();
                match negative {
                    Some(node) => {
                        let highlights: Vec<GraphHighlight> = self
                            .graph
                            .nodes
                            .iter()
                            .map(|n| {
                                let color = if self.dist[&n.id][&n.id] < 0.0 {
                                    HighlightColor::Destructive
                                } else {
                                    HighlightColor::Neutral
                                };
                                GraphHighlight::node(n.id.clone(), color)
                            })
                            .chain(self.graph.edges.iter().map(|e| {
                                GraphHighlight::edge(e.id.clone(), HighlightColor::Neutral)
                            }))
                            .collect();
                        Some(self.step(
                            format!(
                                "Negative-weight cycle detected (e.g., involving node {}). \
                                 Shortest paths are not well-defined.",
                                node
                            ),
                            true,
                            highlights,
                            GraphStepKind::AllPairs(self.snapshot(true, false)),
                        ))
                    }
                    None => Some(self.step(
                        "Floyd-Warshall algorithm complete. All-pairs shortest paths computed."
                            .to_string(),
                        true,
                        self.neutral_highlights(),
                        GraphStepKind::AllPairs(self.snapshot(false, false)),
                    )),
                }
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_common::{GraphEdge, GraphNode};

    fn triangle() -> Graph {
        Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0),
                GraphEdge::new("e1", "b", "c").with_weight(2.0),
                GraphEdge::new("e2", "a", "c").with_weight(9.0),
            ],
        )
    }

    fn last_matrix(steps: &[GraphStep]) -> &AllPairsSnapshot {
        match &steps.last().unwrap().kind {
            GraphStepKind::AllPairs(s) => s,
            _ => panic!("expected all-pairs snapshot"),
        }
    }

    #[test]
    fn test_all_pairs_distances() {
        let steps: Vec<_> = FloydWarshall::new(triangle()).collect();
        let snap = last_matrix(&steps);
        let d = |a: &str, b: &str| snap.distance_matrix[&NodeId::new(a)][&NodeId::new(b)];
        assert_eq!(d("a", "a"), 0.0);
        assert_eq!(d("a", "b"), 1.0);
        assert_eq!(d("a", "c"), 3.0); // via b, not the direct 9
        assert_eq!(d("c", "a"), 3.0); // undirected symmetry
        assert!(!snap.negative_cycle_detected);
    }

    #[test]
    fn test_next_hop_routes_through_intermediate() {
        let steps: Vec<_> = FloydWarshall::new(triangle()).collect();
        let snap = last_matrix(&steps);
        assert_eq!(
            snap.next_hop_matrix[&NodeId::new("a")][&NodeId::new("c")],
            Some(NodeId::new("b"))
        );
    }

    #[test]
    fn test_core_iteration_count_is_cubed() {
        let steps: Vec<_> = FloydWarshall::new(triangle()).collect();
        let checks = steps
            .iter()
            .filter(|s| s.message.starts_with("Iteration k="))
            .count();
        assert_eq!(checks, 27);
    }

    #[test]
    fn test_negative_cycle_flag() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0).directed(),
                GraphEdge::new("e1", "b", "a").with_weight(-2.0).directed(),
            ],
        );
        let steps: Vec<_> = FloydWarshall::new(g).collect();
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert!(last_matrix(&steps).negative_cycle_detected);
        assert!(last.message.contains("Negative-weight cycle detected"));
    }

    #[test]
    fn test_empty_graph_short_circuits() {
        let steps: Vec<_> = FloydWarshall::new(Graph::default()).collect();
        assert_eq!(steps.len(), 1);
        assert!(steps[0].is_final_step);
        assert!(matches!(steps[0].kind, GraphStepKind::Invalid));
        assert_eq!(steps[0].message, "Graph is empty.");
    }

    #[test]
    fn test_parallel_edges_keep_minimum() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(5.0),
                GraphEdge::new("e1", "a", "b").with_weight(2.0),
            ],
        );
        let steps: Vec<_> = FloydWarshall::new(g).collect();
        let snap = last_matrix(&steps);
        assert_eq!(
            snap.distance_matrix[&NodeId::new("a")][&NodeId::new("b")],
            2.0
        );
    }
}
