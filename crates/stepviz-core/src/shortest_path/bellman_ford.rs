//! Bellman-Ford single-source shortest-path engine.
//!
//! Runs |V|-1 relaxation passes over the arc list (undirected edges
//! contribute one arc per direction), breaking out early after a pass with
//! zero relaxations, then one extra scan to detect a negative cycle. Cycle
//! identification is heuristic (a bounded predecessor walk); only the
//! detection itself is guaranteed.

use crate::step::{fmt_dist, GraphStep, GraphStepKind, SingleSourceSnapshot};
use indexmap::IndexMap;
use stepviz_common::utils::hash::FxHashSet;
use stepviz_common::{EdgeId, Graph, GraphHighlight, HighlightColor, NodeId};

/// One traversable direction of an edge.
struct Arc {
    edge_idx: usize,
    from: NodeId,
    to: NodeId,
}

enum Phase {
    Invalid(String),
    Init,
    PassStart,
    Consider,
    Relaxed,
    EarlyExit,
    NegAnnounce,
    NegCycleFinal(usize),
    Final,
    Finished,
}

enum Reconstruction {
    Path(Vec<NodeId>, Vec<EdgeId>),
    Cyclic,
    Broken,
}

/// Step-by-step Bellman-Ford; tolerates negative weights and reports
/// negative cycles through the step channel. Absent edge weights default
/// to 0.
pub struct BellmanFord {
    graph: Graph,
    start: NodeId,
    target: Option<NodeId>,
    arcs: Vec<Arc>,
    distances: IndexMap<NodeId, f64>,
    predecessors: IndexMap<NodeId, Option<NodeId>>,
    pass: usize,
    arc_idx: usize,
    relaxed_this_pass: bool,
    phase: Phase,
}

impl BellmanFord {
    /// Creates a run from `start`, optionally reporting a path to `target`.
    #[must_use]
    pub fn new(graph: Graph, start: NodeId, target: Option<NodeId>) -> Self {
        let phase = if !graph.contains_node(&start) {
            Phase::Invalid(format!("Error: Start node \"{}\" not found.", start))
        } else if let Some(t) = target.as_ref().filter(|t| !graph.contains_node(t)) {
            Phase::Invalid(format!("Error: Target node \"{}\" not found.", t))
        } else {
            Phase::Init
        };

        let mut arcs = Vec::with_capacity(graph.edge_count() * 2);
        for (edge_idx, edge) in graph.edges.iter().enumerate() {
            arcs.push(Arc {
                edge_idx,
                from: edge.source.clone(),
                to: edge.target.clone(),
            });
            if !edge.directed {
                arcs.push(Arc {
                    edge_idx,
                    from: edge.target.clone(),
                    to: edge.source.clone(),
                });
            }
        }

        let snapshot = SingleSourceSnapshot::init(&graph.nodes, &start);
        Self {
            graph,
            start,
            target,
            arcs,
            distances: snapshot.distances,
            predecessors: snapshot.predecessors,
            pass: 0,
            arc_idx: 0,
            relaxed_this_pass: false,
            phase,
        }
    }

    fn weight(&self, arc: &Arc) -> f64 {
        self.graph.edges[arc.edge_idx].weight_or(0.0)
    }

    fn edge_id(&self, arc: &Arc) -> EdgeId {
        self.graph.edges[arc.edge_idx].id.clone()
    }

    fn snapshot(&self, path: Option<Vec<NodeId>>, negative_cycle: bool) -> SingleSourceSnapshot {
        SingleSourceSnapshot {
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            target_found_path: path,
            negative_cycle_detected: negative_cycle,
        }
    }

    /// Node coloring: a just-updated node primary, reached nodes visited,
    /// the rest neutral, all labeled with their best known distance. The
    /// active edge is secondary (destructive during the cycle check).
    fn highlights(
        &self,
        current_edge: Option<&EdgeId>,
        updated_node: Option<&NodeId>,
        cycle_check: bool,
    ) -> Vec<GraphHighlight> {
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let color = if updated_node == Some(&n.id) {
                    HighlightColor::Primary
                } else if self.predecessors[&n.id].is_some() || n.id == self.start {
                    HighlightColor::Visited
                } else {
                    HighlightColor::Neutral
                };
                GraphHighlight::node(n.id.clone(), color)
                    .with_label(fmt_dist(self.distances[&n.id]))
            })
            .collect();
        highlights.extend(self.graph.edges.iter().map(|e| {
            let color = if current_edge == Some(&e.id) {
                if cycle_check {
                    HighlightColor::Destructive
                } else {
                    HighlightColor::Secondary
                }
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

    fn relaxable(&self, arc: &Arc) -> bool {
        let du = self.distances[&arc.from];
        du.is_finite() && du + self.weight(arc) < self.distances[&arc.to]
    }

    fn advance_arc(&mut self) {
        self.arc_idx += 1;
        if self.arc_idx < self.arcs.len() {
            self.phase = Phase::Consider;
        } else {
            self.end_of_pass();
        }
    }

    fn end_of_pass(&mut self) {
        let n = self.graph.node_count();
        if !self.relaxed_this_pass && self.pass + 2 < n {
            self.phase = Phase::EarlyExit;
        } else {
            self.pass += 1;
            self.phase = if self.pass + 1 < n {
                Phase::PassStart
            } else {
                Phase::NegAnnounce
            };
        }
    }

    /// Bounded predecessor walk from the endpoint of a still-relaxable
    /// arc. Best-effort cycle membership for highlighting; not exact.
    fn cycle_walk(&self, from: &NodeId) -> FxHashSet<NodeId> {
        let mut walked = FxHashSet::default();
        let mut curr = from.clone();
        for _ in 0..self.graph.node_count() {
            walked.insert(curr.clone());
            match self.predecessors[&curr].clone() {
                Some(pred) => {
                    if walked.contains(&pred) {
                        walked.insert(pred);
                        break;
                    }
                    curr = pred;
                }
                None => break,
            }
        }
        walked
    }

    fn reconstruct(&self, target: &NodeId) -> Reconstruction {
        let mut path = Vec::new();
        let mut path_edges = Vec::new();
        let mut seen = FxHashSet::default();
        let mut curr = target.clone();
        while curr != self.start {
            if !seen.insert(curr.clone()) {
                return Reconstruction::Cyclic;
            }
            path.push(curr.clone());
            match self.predecessors[&curr].clone() {
                Some(pred) => {
                    if let Some(edge) = self.graph.edge_between(&pred, &curr) {
                        path_edges.push(edge.id.clone());
                    }
                    curr = pred;
                }
                None => return Reconstruction::Broken,
            }
        }
        path.push(self.start.clone());
        path.reverse();
        path_edges.reverse();
        Reconstruction::Path(path, path_edges)
    }

    fn final_step(&self) -> GraphStep {
        let mut message = "Bellman-Ford complete. No negative-weight cycles detected.".to_string();
        let mut path_nodes = None;
        let mut path_edges = None;

        if let Some(target) = self.target.clone() {
            if self.distances[&target].is_infinite() {
                message = format!(
                    "Target node {} is not reachable from {}.",
                    target, self.start
                );
            } else {
                match self.reconstruct(&target) {
                    Reconstruction::Path(nodes, edges) => {
                        message = format!(
                            "Shortest path to {} found. Distance: {}.",
                            target,
                            fmt_dist(self.distances[&target])
                        );
                        path_nodes = Some(nodes);
                        path_edges = Some(edges);
                    }
                    Reconstruction::Cyclic => {
                        message = format!(
                            "Path to target {} involves a cycle. Distance {} shown, but path \
                             reconstruction is unreliable.",
                            target,
                            fmt_dist(self.distances[&target])
                        );
                    }
                    Reconstruction::Broken => {
                        message = format!(
                            "Could not reconstruct path to {}, though distance is {}.",
                            target,
                            fmt_dist(self.distances[&target])
                        );
                    }
                }
            }
        }

        let mut highlights = self.highlights(None, None, false);
        if let (Some(nodes), Some(edges)) = (&path_nodes, &path_edges) {
            for h in &mut highlights {
                let on_path = nodes.iter().any(|n| h.is_node(n))
                    || edges.iter().any(|e| h.is_edge(e));
                if on_path {
                    h.color = HighlightColor::Path;
                }
            }
        }
        self.step(
            message,
            true,
            highlights,
            GraphStepKind::SingleSource(self.snapshot(path_nodes, false)),
        )
    }
}

impl Iterator for BellmanFord {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Invalid(message) => {
                Some(self.step(message, true, Vec::new(), GraphStepKind::Invalid))
            }
            Phase::Init => {
                self.phase = if self.graph.node_count() > 1 {
                    Phase::PassStart
                } else {
                    Phase::NegAnnounce
                };
                Some(self.step(
                    format!(
                        "Starting Bellman-Ford from node {}. Initializing distances.",
                        self.start
                    ),
                    false,
                    self.highlights(None, None, false),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                ))
            }
            Phase::PassStart => {
                self.relaxed_this_pass = false;
                self.arc_idx = 0;
                if self.arcs.is_empty() {
                    self.end_of_pass();
                } else {
                    self.phase = Phase::Consider;
                }
                Some(self.step(
                    format!(
                        "Pass {} of {}. Relaxing edges.",
                        self.pass + 1,
                        self.graph.node_count() - 1
                    ),
                    false,
                    self.highlights(None, None, false),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                ))
            }
            Phase::Consider => {
                let arc = &self.arcs[self.arc_idx];
                let message = format!(
                    "Pass {}: Considering edge {} ({} -> {}, weight {}).",
                    self.pass + 1,
                    self.edge_id(arc),
                    arc.from,
                    arc.to,
                    fmt_dist(self.weight(arc))
                );
                let edge_id = self.edge_id(arc);
                let step = self.step(
                    message,
                    false,
                    self.highlights(Some(&edge_id), None, false),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                );
                if self.relaxable(&self.arcs[self.arc_idx]) {
                    let arc = &self.arcs[self.arc_idx];
                    let new_dist = self.distances[&arc.from] + self.weight(arc);
                    let (from, to) = (arc.from.clone(), arc.to.clone());
                    self.distances.insert(to.clone(), new_dist);
                    self.predecessors.insert(to, Some(from));
                    self.relaxed_this_pass = true;
                    self.phase = Phase::Relaxed;
                } else {
                    self.advance_arc();
                }
                Some(step)
            }
            Phase::Relaxed => {
                let arc = &self.arcs[self.arc_idx];
                let edge_id = self.edge_id(arc);
                let to = arc.to.clone();
                let message = format!(
                    "Pass {}: Relaxed edge {}. Distance to {} updated to {}.",
                    self.pass + 1,
                    edge_id,
                    to,
                    fmt_dist(self.distances[&to])
                );
                let step = self.step(
                    message,
                    false,
                    self.highlights(Some(&edge_id), Some(&to), false),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                );
                self.advance_arc();
                Some(step)
            }
            Phase::EarlyExit => {
                self.phase = Phase::NegAnnounce;
                Some(self.step(
                    format!(
                        "Pass {}: No distances updated in this pass. Shortest paths found. \
                         Checking for negative cycles next.",
                        self.pass + 1
                    ),
                    false,
                    self.highlights(None, None, false),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                ))
            }
            Phase::NegAnnounce => {
                // The scan itself emits nothing; only its outcome does.
                self.phase = match self.arcs.iter().position(|arc| self.relaxable(arc)) {
                    Some(idx) => Phase::NegCycleFinal(idx),
                    None => Phase::Final,
                };
                Some(self.step(
                    "Checking for negative-weight cycles...".to_string(),
                    false,
                    self.highlights(None, None, true),
                    GraphStepKind::SingleSource(self.snapshot(None, false)),
                ))
            }
            Phase::NegCycleFinal(idx) => {
                let arc = &self.arcs[idx];
                let edge_id = self.edge_id(arc);
                let (from, to) = (arc.from.clone(), arc.to.clone());
                let walked = self.cycle_walk(&to);
                let mut highlights = self.highlights(Some(&edge_id), Some(&to), true);
                for h in &mut highlights {
                    if walked.iter().any(|n| h.is_node(n)) {
                        h.color = HighlightColor::Destructive;
                    }
                }
                tracing::debug!(edge = %edge_id, "negative cycle detected");
                Some(self.step(
                    format!(
                        "Negative-weight cycle detected involving edge {} ({} -> {}). Further \
                         relaxation possible for node {}. Shortest paths are undefined or \
                         infinitely negative for nodes reachable from this cycle.",
                        edge_id, from, to, to
                    ),
                    true,
                    highlights,
                    GraphStepKind::SingleSource(self.snapshot(None, true)),
                ))
            }
            Phase::Final => Some(self.final_step()),
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_common::{GraphEdge, GraphNode};

    fn last_snapshot(steps: &[GraphStep]) -> &SingleSourceSnapshot {
        steps.last().unwrap().single_source().unwrap()
    }

    #[test]
    fn test_negative_edge_shortens_path() {
        // a ->1 b ->(-2) c directed; distance a..c = -1
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0).directed(),
                GraphEdge::new("e1", "b", "c").with_weight(-2.0).directed(),
            ],
        );
        let steps: Vec<_> = BellmanFord::new(g, "a".into(), Some("c".into())).collect();
        let snap = last_snapshot(&steps);
        assert_eq!(snap.distances[&NodeId::new("c")], -1.0);
        assert!(!snap.negative_cycle_detected);
        assert_eq!(
            snap.target_found_path.as_deref().unwrap(),
            &["a".into(), "b".into(), "c".into()] as &[NodeId]
        );
    }

    #[test]
    fn test_negative_cycle_detected() {
        // n0 ->1 n1, n1 ->-2 n0: every loop lowers the distance.
        let g = Graph::new(
            vec![GraphNode::new("n0"), GraphNode::new("n1")],
            vec![
                GraphEdge::new("e0", "n0", "n1").with_weight(1.0).directed(),
                GraphEdge::new("e1", "n1", "n0").with_weight(-2.0).directed(),
            ],
        );
        let steps: Vec<_> = BellmanFord::new(g, "n0".into(), None).collect();
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert!(last.message.contains("Negative-weight cycle detected"));
        assert!(last_snapshot(&steps).negative_cycle_detected);
    }

    #[test]
    fn test_early_exit_pass() {
        // Line graph settles in one pass; the second pass relaxes nothing.
        let g = Graph::new(
            vec![
                GraphNode::new("a"),
                GraphNode::new("b"),
                GraphNode::new("c"),
                GraphNode::new("d"),
            ],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0).directed(),
                GraphEdge::new("e1", "b", "c").with_weight(1.0).directed(),
                GraphEdge::new("e2", "c", "d").with_weight(1.0).directed(),
            ],
        );
        let steps: Vec<_> = BellmanFord::new(g, "a".into(), None).collect();
        assert!(steps
            .iter()
            .any(|s| s.message.contains("No distances updated in this pass")));
        let passes = steps
            .iter()
            .filter(|s| s.message.starts_with("Pass") && s.message.contains("Relaxing edges"))
            .count();
        assert_eq!(passes, 2);
    }

    #[test]
    fn test_undirected_edges_relax_both_ways() {
        // Undirected b-a edge must still reach a-side neighbors of b.
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("e0", "b", "a").with_weight(3.0)],
        );
        let steps: Vec<_> = BellmanFord::new(g, "a".into(), Some("b".into())).collect();
        let snap = last_snapshot(&steps);
        assert_eq!(snap.distances[&NodeId::new("b")], 3.0);
    }

    #[test]
    fn test_unreachable_target() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![],
        );
        let steps: Vec<_> = BellmanFord::new(g, "a".into(), Some("b".into())).collect();
        let last = steps.last().unwrap();
        assert!(last.message.contains("not reachable"));
        assert!(last_snapshot(&steps).target_found_path.is_none());
    }

    #[test]
    fn test_triangle_inequality_holds_without_negative_cycle() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b"), GraphNode::new("c")],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(4.0).directed(),
                GraphEdge::new("e1", "a", "c").with_weight(2.0).directed(),
                GraphEdge::new("e2", "c", "b").with_weight(-1.0).directed(),
            ],
        );
        let steps: Vec<_> = BellmanFord::new(g.clone(), "a".into(), None).collect();
        let snap = last_snapshot(&steps);
        for edge in &g.edges {
            let du = snap.distances[&edge.source];
            let dv = snap.distances[&edge.target];
            if du.is_finite() {
                assert!(dv <= du + edge.weight_or(0.0) + 1e-9);
            }
        }
        assert_eq!(snap.distances[&NodeId::new("b")], 1.0);
    }
}
