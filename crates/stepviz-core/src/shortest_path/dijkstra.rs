//! Dijkstra's single-source shortest-path engine.
//!
//! Maintains a binary-heap frontier keyed by (distance, insertion
//! sequence), so extraction is strictly ascending by distance with ties
//! broken in insertion order, and each node is finalized exactly once.
//! Behavior on negative weights is undefined; callers must not supply
//! them.

use super::MinScored;
use crate::step::{fmt_dist, GraphStep, GraphStepKind, SingleSourceSnapshot};
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::collections::BinaryHeap;
use stepviz_common::utils::hash::FxHashSet;
use stepviz_common::{Graph, GraphHighlight, HighlightColor, NodeId};

enum Phase {
    Invalid(String),
    Init,
    Extract,
    Examine,
    Resolve,
    Final,
    Finished,
}

/// Step-by-step Dijkstra over a non-negatively weighted graph.
///
/// Stops early once the target (when given) is extracted from the
/// frontier. Absent edge weights default to 1.
pub struct Dijkstra {
    graph: Graph,
    start: NodeId,
    target: Option<NodeId>,
    distances: IndexMap<NodeId, f64>,
    predecessors: IndexMap<NodeId, Option<NodeId>>,
    visited: FxHashSet<NodeId>,
    heap: BinaryHeap<MinScored<(f64, u64), NodeId>>,
    seq: u64,
    current: Option<NodeId>,
    /// Edge indices incident to `current`, in edge-declaration order.
    neighbors: SmallVec<[usize; 8]>,
    neighbor_idx: usize,
    phase: Phase,
}

impl Dijkstra {
    /// Creates a run from `start`, optionally stopping early at `target`.
    #[must_use]
    pub fn new(graph: Graph, start: NodeId, target: Option<NodeId>) -> Self {
        let phase = if !graph.contains_node(&start) {
            Phase::Invalid(format!(
                "Error: Start node \"{}\" not found in the graph. Please ensure the ID is correct.",
                start
            ))
        } else if let Some(t) = target.as_ref().filter(|t| !graph.contains_node(t)) {
            Phase::Invalid(format!(
                "Error: Target node \"{}\" not found in the graph. Please ensure the ID is \
                 correct or leave it empty if not searching for a specific target.",
                t
            ))
        } else {
            Phase::Init
        };

        let snapshot = SingleSourceSnapshot::init(&graph.nodes, &start);
        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            %start,
            "starting dijkstra run"
        );
        Self {
            graph,
            start,
            target,
            distances: snapshot.distances,
            predecessors: snapshot.predecessors,
            visited: FxHashSet::default(),
            heap: BinaryHeap::new(),
            seq: 0,
            current: None,
            neighbors: SmallVec::new(),
            neighbor_idx: 0,
            phase: Phase::Init,
        }
        .with_phase(phase)
    }

    fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    fn push_frontier(&mut self, node: NodeId, distance: f64) {
        self.heap.push(MinScored((distance, self.seq), node));
        self.seq += 1;
    }

    fn snapshot(&self, path: Option<Vec<NodeId>>) -> SingleSourceSnapshot {
        SingleSourceSnapshot {
            distances: self.distances.clone(),
            predecessors: self.predecessors.clone(),
            target_found_path: path,
            negative_cycle_detected: false,
        }
    }

    /// Node coloring: path > current > visited > discovered frontier >
    /// neutral, each node labeled with its best known distance.
    fn highlights(
        &self,
        path_nodes: Option<&[NodeId]>,
        path_edges: Option<&[stepviz_common::EdgeId]>,
    ) -> Vec<GraphHighlight> {
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let dist = self.distances[&n.id];
                let color = if path_nodes.is_some_and(|p| p.contains(&n.id)) {
                    HighlightColor::Path
                } else if self.current.as_ref() == Some(&n.id) {
                    HighlightColor::Secondary
                } else if self.visited.contains(&n.id) {
                    HighlightColor::Visited
                } else if dist.is_finite() {
                    HighlightColor::Primary
                } else {
                    HighlightColor::Neutral
                };
                GraphHighlight::node(n.id.clone(), color).with_label(fmt_dist(dist))
            })
            .collect();
        highlights.extend(self.graph.edges.iter().map(|e| {
            let color = if path_edges.is_some_and(|p| p.contains(&e.id)) {
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

    /// Walks predecessors from the target back to the start. Returns the
    /// ordered node path and the edges joining consecutive path nodes, or
    /// `None` when reconstruction fails to reach the start.
    fn reconstruct_path(&self, target: &NodeId) -> Option<(Vec<NodeId>, Vec<stepviz_common::EdgeId>)> {
        let mut path = Vec::new();
        let mut path_edges = Vec::new();
        let mut curr = target.clone();
        while curr != self.start {
            path.push(curr.clone());
            let pred = self.predecessors[&curr].clone()?;
            if let Some(edge) = self.graph.edge_between(&pred, &curr) {
                path_edges.push(edge.id.clone());
            }
            curr = pred;
        }
        path.push(self.start.clone());
        path.reverse();
        path_edges.reverse();
        Some((path, path_edges))
    }

    fn final_step(&mut self) -> GraphStep {
        let mut message = "Dijkstra's complete. All reachable nodes visited.".to_string();
        let mut path_nodes = None;
        let mut path_edges = None;

        if let Some(target) = self.target.clone() {
            if self.distances[&target].is_infinite() || !self.visited.contains(&target) {
                message = format!(
                    "Target node {} is not reachable from {}.",
                    target, self.start
                );
            } else {
                match self.reconstruct_path(&target) {
                    Some((nodes, edges)) => {
                        message = format!(
                            "Shortest path to {} found. Distance: {}.",
                            target,
                            fmt_dist(self.distances[&target])
                        );
                        path_nodes = Some(nodes);
                        path_edges = Some(edges);
                    }
                    None => {
                        message = format!(
                            "Could not reconstruct path to {}, though it's marked reachable. \
                             Predecessor data might be incomplete.",
                            target
                        );
                    }
                }
            }
        }

        self.current = None;
        let highlights = self.highlights(path_nodes.as_deref(), path_edges.as_deref());
        self.step(
            message,
            true,
            highlights,
            GraphStepKind::SingleSource(self.snapshot(path_nodes)),
        )
    }

    fn advance_neighbor(&mut self) {
        self.neighbor_idx += 1;
        self.phase = if self.neighbor_idx < self.neighbors.len() {
            Phase::Examine
        } else {
            Phase::Extract
        };
    }
}

impl Iterator for Dijkstra {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Invalid(message) => {
                Some(self.step(message, true, Vec::new(), GraphStepKind::Invalid))
            }
            Phase::Init => {
                self.push_frontier(self.start.clone(), 0.0);
                self.phase = Phase::Extract;
                Some(self.step(
                    format!(
                        "Starting Dijkstra's from node {}. Initializing distances.",
                        self.start
                    ),
                    false,
                    self.highlights(None, None),
                    GraphStepKind::SingleSource(self.snapshot(None)),
                ))
            }
            Phase::Extract => {
                // Lazy deletion: stale heap entries for already-finalized
                // nodes are skipped without emitting.
                let u = loop {
                    match self.heap.pop() {
                        Some(MinScored(_, node)) if self.visited.contains(&node) => {}
                        Some(MinScored(_, node)) => break node,
                        None => return Some(self.final_step()),
                    }
                };
                self.visited.insert(u.clone());
                self.current = Some(u.clone());

                if self.target.as_ref() == Some(&u) {
                    self.phase = Phase::Final;
                } else {
                    self.neighbors = self
                        .graph
                        .edges
                        .iter()
                        .enumerate()
                        .filter(|(_, e)| e.endpoint_from(&u).is_some())
                        .map(|(i, _)| i)
                        .collect();
                    self.neighbor_idx = 0;
                    self.phase = if self.neighbors.is_empty() {
                        Phase::Extract
                    } else {
                        Phase::Examine
                    };
                }
                Some(self.step(
                    format!(
                        "Visiting node {}. Distance: {}. Marked as visited.",
                        u,
                        fmt_dist(self.distances[&u])
                    ),
                    false,
                    self.highlights(None, None),
                    GraphStepKind::SingleSource(self.snapshot(None)),
                ))
            }
            Phase::Examine => {
                let edge = &self.graph.edges[self.neighbors[self.neighbor_idx]];
                let u = self.current.clone().expect("examining without a current node");
                let v = edge.endpoint_from(&u).expect("neighbor edge must touch current").clone();
                let mut highlights = self.highlights(None, None);
                for h in &mut highlights {
                    if h.is_edge(&edge.id) {
                        h.color = HighlightColor::Info;
                    } else if h.is_node(&v)
                        && h.color != HighlightColor::Secondary
                        && h.color != HighlightColor::Visited
                    {
                        h.color = HighlightColor::Info;
                    }
                }
                let message = format!(
                    "Examining neighbor {} of {} via edge {} (weight {}).",
                    v,
                    u,
                    edge.id,
                    fmt_dist(edge.weight_or(1.0))
                );
                self.phase = Phase::Resolve;
                Some(self.step(
                    message,
                    false,
                    highlights,
                    GraphStepKind::SingleSource(self.snapshot(None)),
                ))
            }
            Phase::Resolve => {
                let edge = &self.graph.edges[self.neighbors[self.neighbor_idx]];
                let edge_id = edge.id.clone();
                let u = self.current.clone().expect("resolving without a current node");
                let v = edge.endpoint_from(&u).expect("neighbor edge must touch current").clone();
                let weight = edge.weight_or(1.0);

                if self.visited.contains(&v) {
                    let step = self.step(
                        format!("Neighbor {} already visited. Skipping relaxation.", v),
                        false,
                        self.highlights(None, None),
                        GraphStepKind::SingleSource(self.snapshot(None)),
                    );
                    self.advance_neighbor();
                    return Some(step);
                }

                let alt = self.distances[&u] + weight;
                if alt < self.distances[&v] {
                    self.distances.insert(v.clone(), alt);
                    self.predecessors.insert(v.clone(), Some(u));
                    self.push_frontier(v.clone(), alt);

                    let mut highlights = self.highlights(None, None);
                    for h in &mut highlights {
                        if h.is_edge(&edge_id) || h.is_node(&v) {
                            h.color = HighlightColor::Primary;
                        }
                        if h.is_node(&v) {
                            h.label = Some(fmt_dist(alt));
                        }
                    }
                    let step = self.step(
                        format!(
                            "Relaxed edge {} to {}. New shortest distance to {} is {}.",
                            edge_id,
                            v,
                            v,
                            fmt_dist(alt)
                        ),
                        false,
                        highlights,
                        GraphStepKind::SingleSource(self.snapshot(None)),
                    );
                    self.advance_neighbor();
                    Some(step)
                } else {
                    let step = self.step(
                        format!(
                            "Path to {} via {} (cost {}) is not shorter than current distance \
                             {}. No relaxation.",
                            v,
                            u,
                            fmt_dist(alt),
                            fmt_dist(self.distances[&v])
                        ),
                        false,
                        self.highlights(None, None),
                        GraphStepKind::SingleSource(self.snapshot(None)),
                    );
                    self.advance_neighbor();
                    Some(step)
                }
            }
            Phase::Final => Some(self.final_step()),
            Phase::Finished => None,
        }
    }
}
