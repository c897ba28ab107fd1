//! A* shortest-path engine.
//!
//! Requires a target. The heuristic is Euclidean distance over node
//! coordinates; when either endpoint lacks coordinates it falls back to 0
//! (degrading to Dijkstra-equivalent behavior), and the degradation is
//! flagged in the run's messages.

use crate::step::{fmt_dist, GraphStep, GraphStepKind, HeuristicSnapshot, SingleSourceSnapshot};
use indexmap::IndexMap;
use smallvec::SmallVec;
use stepviz_common::{Graph, GraphHighlight, GraphNode, HighlightColor, NodeId};

enum Phase {
    Invalid(String),
    Init,
    Select,
    Examine,
    Resolve,
    Success,
    Failure,
    Finished,
}

/// Step-by-step A* from `start` to a mandatory `target`.
///
/// The open set is an insertion-ordered list; selection scans for the
/// strictly smallest f-score, so ties go to the earliest-inserted node.
/// Absent edge weights default to 1.
pub struct AStar {
    graph: Graph,
    start: NodeId,
    target: NodeId,
    g_scores: IndexMap<NodeId, f64>,
    f_scores: IndexMap<NodeId, f64>,
    came_from: IndexMap<NodeId, Option<NodeId>>,
    open: Vec<NodeId>,
    current: Option<NodeId>,
    neighbors: SmallVec<[usize; 8]>,
    neighbor_idx: usize,
    /// Cleared the first time the heuristic has to fall back to 0.
    heuristic_used_coordinates: bool,
    phase: Phase,
}

impl AStar {
    /// Creates a run from `start` to `target`.
    #[must_use]
    pub fn new(graph: Graph, start: NodeId, target: NodeId) -> Self {
        let phase = if !graph.contains_node(&start) {
            Phase::Invalid(format!("Error: Start node \"{}\" not found.", start))
        } else if !graph.contains_node(&target) {
            Phase::Invalid(format!("Error: Target node \"{}\" not found.", target))
        } else {
            Phase::Init
        };

        let sssp = SingleSourceSnapshot::init(&graph.nodes, &start);
        let mut f_scores: IndexMap<NodeId, f64> = graph
            .nodes
            .iter()
            .map(|n| (n.id.clone(), f64::INFINITY))
            .collect();
        f_scores.insert(start.clone(), 0.0);

        let mut engine = Self {
            graph,
            start: start.clone(),
            target,
            g_scores: sssp.distances,
            f_scores,
            came_from: sssp.predecessors,
            open: vec![start.clone()],
            current: None,
            neighbors: SmallVec::new(),
            neighbor_idx: 0,
            heuristic_used_coordinates: true,
            phase,
        };
        if matches!(engine.phase, Phase::Init) {
            let h = engine.heuristic_to_target(&start);
            engine.f_scores.insert(start, h);
        }
        engine
    }

    /// Euclidean distance to the target, or 0 when coordinates are missing
    /// on either endpoint (flagging the degradation).
    fn heuristic(&mut self, a: &GraphNode, b: &GraphNode) -> f64 {
        match (a.x, a.y, b.x, b.y) {
            (Some(ax), Some(ay), Some(bx), Some(by)) => {
                ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
            }
            _ => {
                self.heuristic_used_coordinates = false;
                0.0
            }
        }
    }

    fn heuristic_to_target(&mut self, node: &NodeId) -> f64 {
        let a = self.graph.node(node).cloned();
        let b = self.graph.node(&self.target).cloned();
        match (a, b) {
            (Some(a), Some(b)) => self.heuristic(&a, &b),
            _ => 0.0,
        }
    }

    fn display(&self, id: &NodeId) -> String {
        self.graph
            .node(id)
            .map_or_else(|| id.to_string(), |n| n.display().to_string())
    }

    fn snapshot(&self, path: Option<Vec<NodeId>>) -> GraphStepKind {
        GraphStepKind::Heuristic(HeuristicSnapshot {
            sssp: SingleSourceSnapshot {
                distances: self.g_scores.clone(),
                predecessors: self.came_from.clone(),
                target_found_path: path,
                negative_cycle_detected: false,
            },
            f_scores: self.f_scores.clone(),
        })
    }

    /// Node coloring: path > current > open set > closed (finite g, not
    /// open) > neutral; the examined neighbor info. Labels carry g/f
    /// scores. Path edges are the came-from edges between path nodes.
    fn highlights(
        &self,
        examined: Option<&NodeId>,
        path_nodes: Option<&[NodeId]>,
    ) -> Vec<GraphHighlight> {
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let g = self.g_scores[&n.id];
                let f = self.f_scores[&n.id];
                let mut color = if path_nodes.is_some_and(|p| p.contains(&n.id)) {
                    HighlightColor::Path
                } else if self.current.as_ref() == Some(&n.id) {
                    HighlightColor::Secondary
                } else if self.open.contains(&n.id) {
                    HighlightColor::Primary
                } else if g.is_finite() {
                    HighlightColor::Visited
                } else {
                    HighlightColor::Neutral
                };
                if examined == Some(&n.id) && color != HighlightColor::Path {
                    color = HighlightColor::Info;
                }
                GraphHighlight::node(n.id.clone(), color)
                    .with_label(format!("g:{} f:{}", fmt_dist(g), fmt_dist(f)))
            })
            .collect();
        highlights.extend(self.graph.edges.iter().map(|e| {
            let on_path = path_nodes.is_some_and(|p| {
                p.contains(&e.source)
                    && p.contains(&e.target)
                    && (self.came_from[&e.target].as_ref() == Some(&e.source)
                        || (!e.directed
                            && self.came_from[&e.source].as_ref() == Some(&e.target)))
            });
            let color = if on_path {
                HighlightColor::Path
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
            current_node_id: self.current.clone(),
            kind,
        }
    }

    fn reconstruct_path(&self) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut curr = self.target.clone();
        while let Some(pred) = self.came_from[&curr].clone() {
            path.push(curr);
            curr = pred;
        }
        path.push(self.start.clone());
        path.reverse();
        path
    }

    fn advance_neighbor(&mut self) {
        self.neighbor_idx += 1;
        self.phase = if self.neighbor_idx < self.neighbors.len() {
            Phase::Examine
        } else {
            Phase::Select
        };
    }
}

impl Iterator for AStar {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Invalid(message) => {
                Some(self.step(message, true, Vec::new(), GraphStepKind::Invalid))
            }
            Phase::Init => {
                self.phase = Phase::Select;
                let mut message = format!(
                    "Starting A* Search from {} to {}.",
                    self.display(&self.start),
                    self.display(&self.target)
                );
                let missing_coords = [&self.start, &self.target].into_iter().any(|id| {
                    self.graph
                        .node(id)
                        .is_none_or(|n| n.x.is_none() || n.y.is_none())
                });
                if missing_coords {
                    self.heuristic_used_coordinates = false;
                    message.push_str(
                        " (Warning: Node coordinates missing, heuristic may be 0, A* might \
                         behave like Dijkstra).",
                    );
                }
                Some(self.step(
                    message,
                    false,
                    self.highlights(None, None),
                    self.snapshot(None),
                ))
            }
            Phase::Select => {
                if self.open.is_empty() {
                    self.phase = Phase::Failure;
                    return self.next();
                }
                // Strict < keeps ties on the earliest-inserted entry.
                let mut current = self.open[0].clone();
                for candidate in &self.open[1..] {
                    if self.f_scores[candidate] < self.f_scores[&current] {
                        current = candidate.clone();
                    }
                }
                if current == self.target {
                    self.current = Some(current);
                    self.phase = Phase::Success;
                    return self.next();
                }
                self.open.retain(|n| *n != current);
                self.current = Some(current.clone());
                self.neighbors = self
                    .graph
                    .edges
                    .iter()
                    .enumerate()
                    .filter(|(_, e)| e.endpoint_from(&current).is_some())
                    .map(|(i, _)| i)
                    .collect();
                self.neighbor_idx = 0;
                self.phase = if self.neighbors.is_empty() {
                    Phase::Select
                } else {
                    Phase::Examine
                };
                Some(self.step(
                    format!(
                        "Visiting node {}. Removed from OpenSet. Adding to ClosedSet. \
                         F-Score: {}",
                        self.display(&current),
                        fmt_dist(self.f_scores[&current])
                    ),
                    false,
                    self.highlights(None, None),
                    self.snapshot(None),
                ))
            }
            Phase::Examine => {
                let edge = &self.graph.edges[self.neighbors[self.neighbor_idx]];
                let u = self.current.clone().expect("examining without a current node");
                let v = edge
                    .endpoint_from(&u)
                    .expect("neighbor edge must touch current")
                    .clone();
                let weight = edge.weight_or(1.0);
                let tentative = self.g_scores[&u] + weight;
                let message = format!(
                    "Evaluating neighbor {} of {}. Tentative gScore: {}. Current gScore: {}",
                    self.display(&v),
                    self.display(&u),
                    fmt_dist(tentative),
                    fmt_dist(self.g_scores[&v])
                );
                self.phase = Phase::Resolve;
                Some(self.step(
                    message,
                    false,
                    self.highlights(Some(&v), None),
                    self.snapshot(None),
                ))
            }
            Phase::Resolve => {
                let edge = &self.graph.edges[self.neighbors[self.neighbor_idx]];
                let u = self.current.clone().expect("resolving without a current node");
                let v = edge
                    .endpoint_from(&u)
                    .expect("neighbor edge must touch current")
                    .clone();
                let weight = edge.weight_or(1.0);
                let tentative = self.g_scores[&u] + weight;

                if tentative < self.g_scores[&v] {
                    self.came_from.insert(v.clone(), Some(u));
                    self.g_scores.insert(v.clone(), tentative);
                    let h = self.heuristic_to_target(&v);
                    self.f_scores.insert(v.clone(), tentative + h);

                    let mut message = format!(
                        "Path to {} improved. New gScore: {}, hScore: {}, fScore: {}.",
                        self.display(&v),
                        fmt_dist(tentative),
                        fmt_dist(h),
                        fmt_dist(self.f_scores[&v])
                    );
                    if self.open.contains(&v) {
                        message.push_str(&format!(" Updated {} in OpenSet.", self.display(&v)));
                    } else {
                        self.open.push(v.clone());
                        message.push_str(&format!(" Added {} to OpenSet.", self.display(&v)));
                    }
                    let step = self.step(
                        message,
                        false,
                        self.highlights(Some(&v), None),
                        self.snapshot(None),
                    );
                    self.advance_neighbor();
                    Some(step)
                } else {
                    let step = self.step(
                        format!(
                            "Path to {} via {} (gScore: {}) is not better. No update.",
                            self.display(&v),
                            self.display(&u),
                            fmt_dist(tentative)
                        ),
                        false,
                        self.highlights(Some(&v), None),
                        self.snapshot(None),
                    );
                    self.advance_neighbor();
                    Some(step)
                }
            }
            Phase::Success => {
                let path = self.reconstruct_path();
                let names: Vec<String> = path.iter().map(|id| self.display(id)).collect();
                let message = format!(
                    "Path found to {}! Cost: {}. Path: {}",
                    self.display(&self.target),
                    fmt_dist(self.g_scores[&self.target]),
                    names.join(" -> ")
                );
                let highlights = self.highlights(None, Some(&path));
                Some(self.step(message, true, highlights, self.snapshot(Some(path))))
            }
            Phase::Failure => {
                self.current = None;
                let mut message = format!(
                    "Failed to find a path to {}. OpenSet is empty.",
                    self.display(&self.target)
                );
                if !self.heuristic_used_coordinates {
                    message.push_str(
                        " (Warning: Node coordinates missing, A* may have behaved like \
                         Dijkstra).",
                    );
                }
                Some(self.step(
                    message,
                    true,
                    self.highlights(None, None),
                    self.snapshot(None),
                ))
            }
            Phase::Finished => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stepviz_common::GraphEdge;

    /// Unit-square graph with coordinates: corners a(0,0), b(1,0), c(1,1)
    /// and a detour d(0,1); direct route a-b-c.
    fn square() -> Graph {
        Graph::new(
            vec![
                GraphNode::new("a").at(0.0, 0.0),
                GraphNode::new("b").at(1.0, 0.0),
                GraphNode::new("c").at(1.0, 1.0),
                GraphNode::new("d").at(0.0, 1.0),
            ],
            vec![
                GraphEdge::new("e0", "a", "b").with_weight(1.0),
                GraphEdge::new("e1", "b", "c").with_weight(1.0),
                GraphEdge::new("e2", "a", "d").with_weight(1.0),
                GraphEdge::new("e3", "d", "c").with_weight(3.0),
            ],
        )
    }

    fn final_path(steps: &[GraphStep]) -> Option<Vec<NodeId>> {
        steps
            .last()
            .unwrap()
            .single_source()
            .unwrap()
            .target_found_path
            .clone()
    }

    #[test]
    fn test_finds_shortest_path_with_heuristic() {
        let steps: Vec<_> = AStar::new(square(), "a".into(), "c".into()).collect();
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert!(last.message.starts_with("Path found"));
        assert_eq!(
            final_path(&steps).unwrap(),
            vec![NodeId::new("a"), NodeId::new("b"), NodeId::new("c")]
        );
    }

    #[test]
    fn test_success_requires_target_pop_not_discovery() {
        // The target is discovered while b is expanded, but success is only
        // announced once it is selected as current.
        let steps: Vec<_> = AStar::new(square(), "a".into(), "c".into()).collect();
        let discovered = steps
            .iter()
            .position(|s| s.message.contains("Added c to OpenSet"))
            .unwrap();
        assert!(!steps[discovered].is_final_step);
        assert!(steps[discovered + 1..].iter().any(|s| s.is_final_step));
    }

    #[test]
    fn test_missing_coordinates_flags_degradation() {
        let g = Graph::new(
            vec![GraphNode::new("a"), GraphNode::new("b")],
            vec![GraphEdge::new("e0", "a", "b").with_weight(1.0)],
        );
        let steps: Vec<_> = AStar::new(g, "a".into(), "b".into()).collect();
        assert!(steps[0].message.contains("Warning: Node coordinates missing"));
        assert!(steps.last().unwrap().message.starts_with("Path found"));
    }

    #[test]
    fn test_no_path_reports_failure() {
        let g = Graph::new(
            vec![
                GraphNode::new("a").at(0.0, 0.0),
                GraphNode::new("b").at(5.0, 0.0),
            ],
            vec![],
        );
        let steps: Vec<_> = AStar::new(g, "a".into(), "b".into()).collect();
        let last = steps.last().unwrap();
        assert!(last.is_final_step);
        assert!(last.message.starts_with("Failed to find a path"));
        assert!(final_path(&steps).is_none());
    }

    #[test]
    fn test_f_scores_are_g_plus_h() {
        let steps: Vec<_> = AStar::new(square(), "a".into(), "c".into()).collect();
        let last = steps.last().unwrap();
        let GraphStepKind::Heuristic(snap) = &last.kind else {
            panic!("expected heuristic snapshot");
        };
        // b: g=1, h = distance (1,0)..(1,1) = 1 => f=2
        assert_eq!(snap.sssp.distances[&NodeId::new("b")], 1.0);
        assert_eq!(snap.f_scores[&NodeId::new("b")], 2.0);
    }

    #[test]
    fn test_start_equals_target() {
        let steps: Vec<_> = AStar::new(square(), "a".into(), "a".into()).collect();
        assert_eq!(
            final_path(&steps).unwrap(),
            vec![NodeId::new("a")]
        );
    }
}
