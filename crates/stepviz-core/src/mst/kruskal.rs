//! Kruskal's minimum-spanning-tree engine.

use crate::step::{GraphStep, GraphStepKind, SpanningTreeSnapshot};
use crate::union_find::UnionFind;
use stepviz_common::utils::hash::{FxHashMap, FxHashSet};
use stepviz_common::{EdgeId, Graph, GraphHighlight, HighlightColor, NodeId};

enum Phase {
    Empty,
    Start,
    Consider(usize),
    Resolve(usize),
    Final,
    Finished,
}

/// Walks the edges in ascending weight order (stable among ties), using
/// Union-Find to accept tree edges and discard cycle-closing ones. Stops
/// early once |V|-1 edges are accepted. Absent edge weights default to 0.
pub struct Kruskal {
    graph: Graph,
    /// Edge indices sorted ascending by weight, stable on ties.
    order: Vec<usize>,
    node_index: FxHashMap<NodeId, usize>,
    dsu: UnionFind,
    mst_edges: Vec<EdgeId>,
    mst_weight: f64,
    phase: Phase,
}

impl Kruskal {
    /// Creates a run over the graph.
    #[must_use]
    pub fn new(graph: Graph) -> Self {
        let mut order: Vec<usize> = (0..graph.edge_count()).collect();
        order.sort_by(|&a, &b| {
            graph.edges[a]
                .weight_or(0.0)
                .total_cmp(&graph.edges[b].weight_or(0.0))
        });
        let node_index: FxHashMap<NodeId, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let dsu = UnionFind::new(graph.node_count());
        let phase = if graph.is_empty() {
            Phase::Empty
        } else {
            Phase::Start
        };
        Self {
            graph,
            order,
            node_index,
            dsu,
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

    /// Nodes touched by accepted edges are path-colored, as are the
    /// accepted edges themselves; the edge under consideration is
    /// secondary, a just-discarded edge muted.
    fn highlights(
        &self,
        considering: Option<&EdgeId>,
        discarded: Option<&EdgeId>,
    ) -> Vec<GraphHighlight> {
        let mut in_mst: FxHashSet<&NodeId> = FxHashSet::default();
        for id in &self.mst_edges {
            if let Some(edge) = self.graph.edge(id) {
                in_mst.insert(&edge.source);
                in_mst.insert(&edge.target);
            }
        }
        let mut highlights: Vec<GraphHighlight> = self
            .graph
            .nodes
            .iter()
            .map(|n| {
                let color = if in_mst.contains(&n.id) {
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
            } else if considering == Some(&e.id) {
                HighlightColor::Secondary
            } else if discarded == Some(&e.id) {
                HighlightColor::Muted
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

    fn done(&self) -> bool {
        self.mst_edges.len() == self.graph.node_count().saturating_sub(1)
    }

    fn after_edge(&mut self, position: usize) {
        self.phase = if self.done() || position + 1 >= self.order.len() {
            Phase::Final
        } else {
            Phase::Consider(position + 1)
        };
    }
}

impl Iterator for Kruskal {
    type Item = GraphStep;

    fn next(&mut self) -> Option<GraphStep> {
        match std::mem::replace(&mut self.phase, Phase::Finished) {
            Phase::Empty => {
                let kind = self.snapshot();
                Some(self.step("Graph is empty.".to_string(), true, Vec::new(), kind))
            }
            Phase::Start => {
                self.phase = if self.order.is_empty() || self.done() {
                    Phase::Final
                } else {
                    Phase::Consider(0)
                };
                Some(self.step(
                    "Starting Kruskal's algorithm. Edges sorted by weight.".to_string(),
                    false,
                    self.highlights(None, None),
                    self.snapshot(),
                ))
            }
            Phase::Consider(pos) => {
                let edge = &self.graph.edges[self.order[pos]];
                let message = format!(
                    "Considering edge {} ({}-{}) with weight {}.",
                    edge.id,
                    edge.source,
                    edge.target,
                    edge.weight_or(0.0)
                );
                let edge_id = edge.id.clone();
                self.phase = Phase::Resolve(pos);
                Some(self.step(
                    message,
                    false,
                    self.highlights(Some(&edge_id), None),
                    self.snapshot(),
                ))
            }
            Phase::Resolve(pos) => {
                let edge = &self.graph.edges[self.order[pos]];
                let (edge_id, weight) = (edge.id.clone(), edge.weight_or(0.0));
                let source = self.node_index[&edge.source];
                let target = self.node_index[&edge.target];

                if self.dsu.union(source, target) {
                    self.mst_edges.push(edge_id.clone());
                    self.mst_weight += weight;
                    tracing::trace!(weight = self.mst_weight, "edge accepted into mst");
                    let step = self.step(
                        format!(
                            "Added edge {} to MST. Current MST weight: {:.2}.",
                            edge_id, self.mst_weight
                        ),
                        false,
                        self.highlights(None, None),
                        self.snapshot(),
                    );
                    self.after_edge(pos);
                    Some(step)
                } else {
                    let step = self.step(
                        format!("Discarded edge {} (forms a cycle).", edge_id),
                        false,
                        self.highlights(None, Some(&edge_id)),
                        self.snapshot(),
                    );
                    self.after_edge(pos);
                    Some(step)
                }
            }
            Phase::Final => {
                let message = if self.done() {
                    format!(
                        "Kruskal's algorithm complete. MST weight: {:.2}.",
                        self.mst_weight
                    )
                } else {
                    format!(
                        "Kruskal's algorithm complete. Graph may be disconnected. \
                         MST weight: {:.2}.",
                        self.mst_weight
                    )
                };
                let kind = self.snapshot();
                let highlights = self.highlights(None, None);
                Some(self.step(message, true, highlights, kind))
            }
            Phase::Finished => None,
        }
    }
}
