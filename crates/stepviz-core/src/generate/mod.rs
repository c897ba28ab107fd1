//! Seeded random input generation for algorithm runs.
//!
//! The caller owns the `Rng`; seeding it (`StdRng::seed_from_u64`) makes
//! generated inputs, and therefore entire step sequences, reproducible.

use rand::Rng;
use stepviz_common::utils::hash::FxHashSet;
use stepviz_common::{Error, Graph, GraphEdge, GraphNode, Result};

/// Generates `len` integers uniformly drawn from `0..=max_value`.
pub fn random_array(rng: &mut impl Rng, len: usize, max_value: i64) -> Vec<i64> {
    (0..len).map(|_| rng.gen_range(0..=max_value.max(0))).collect()
}

/// Configuration for random graph generation.
///
/// Produces simple graphs: no self-loops, no duplicate edges (in either
/// direction when undirected). Edge placement gives up after a bounded
/// number of retries, so dense requests may come up short of
/// `edge_count`.
#[derive(Debug, Clone)]
pub struct RandomGraphConfig {
    /// Number of nodes.
    pub node_count: usize,
    /// Requested number of edges (best effort).
    pub edge_count: usize,
    /// Maximum edge weight.
    pub max_weight: f64,
    /// Whether generated edges are directed.
    pub directed: bool,
    /// Whether negative weights are allowed.
    pub allow_negative_weights: bool,
    /// Minimum edge weight. Defaults to 1, or to `-max_weight` when
    /// negative weights are allowed.
    pub min_weight: Option<f64>,
    /// When set, nodes get uniform coordinates in `[0, w] x [0, h]`
    /// (feeding the A* heuristic).
    pub coordinate_bounds: Option<(f64, f64)>,
}

impl Default for RandomGraphConfig {
    fn default() -> Self {
        Self {
            node_count: 6,
            edge_count: 8,
            max_weight: 10.0,
            directed: false,
            allow_negative_weights: false,
            min_weight: None,
            coordinate_bounds: None,
        }
    }
}

impl RandomGraphConfig {
    /// Creates a config for `node_count` nodes and `edge_count` edges.
    #[must_use]
    pub fn new(node_count: usize, edge_count: usize) -> Self {
        Self {
            node_count,
            edge_count,
            ..Self::default()
        }
    }

    /// Sets the maximum edge weight.
    #[must_use]
    pub fn with_max_weight(mut self, max_weight: f64) -> Self {
        self.max_weight = max_weight;
        self
    }

    /// Makes generated edges directed.
    #[must_use]
    pub fn directed(mut self) -> Self {
        self.directed = true;
        self
    }

    /// Allows negative edge weights.
    #[must_use]
    pub fn with_negative_weights(mut self) -> Self {
        self.allow_negative_weights = true;
        self
    }

    /// Sets an explicit minimum edge weight.
    #[must_use]
    pub fn with_min_weight(mut self, min_weight: f64) -> Self {
        self.min_weight = Some(min_weight);
        self
    }

    /// Scatters nodes over a `width x height` area.
    #[must_use]
    pub fn with_coordinates(mut self, width: f64, height: f64) -> Self {
        self.coordinate_bounds = Some((width, height));
        self
    }

    fn effective_min_weight(&self) -> f64 {
        self.min_weight.unwrap_or(if self.allow_negative_weights {
            -self.max_weight
        } else {
            1.0
        })
    }

    /// Generates a graph. Node ids are `n0..`, edge ids `e0..`, weights
    /// integer-valued in `[min, max]`.
    pub fn generate(&self, rng: &mut impl Rng) -> Result<Graph> {
        let min_weight = self.effective_min_weight();
        if min_weight > self.max_weight {
            return Err(Error::InvalidWeightRange {
                min: min_weight,
                max: self.max_weight,
            });
        }

        let mut nodes = Vec::with_capacity(self.node_count);
        for i in 0..self.node_count {
            let mut node = GraphNode::new(format!("n{i}")).with_label(format!("N{i}"));
            if let Some((width, height)) = self.coordinate_bounds {
                node = node.at(rng.gen_range(0.0..=width), rng.gen_range(0.0..=height));
            }
            nodes.push(node);
        }

        let mut edges = Vec::new();
        // A single node admits no simple edges at all.
        let edge_count = if self.node_count <= 1 {
            0
        } else {
            self.edge_count
        };
        let mut used: FxHashSet<(usize, usize)> = FxHashSet::default();
        let max_tries = self.node_count * self.node_count;

        for i in 0..edge_count {
            let mut source = rng.gen_range(0..self.node_count);
            let mut target = rng.gen_range(0..self.node_count);
            let mut tries = 0;
            while (source == target
                || used.contains(&(source, target))
                || (!self.directed && used.contains(&(target, source))))
                && tries < max_tries
            {
                source = rng.gen_range(0..self.node_count);
                target = rng.gen_range(0..self.node_count);
                tries += 1;
            }
            if source == target
                || used.contains(&(source, target))
                || (!self.directed && used.contains(&(target, source)))
            {
                continue;
            }

            let weight = rng.gen_range(min_weight as i64..=self.max_weight as i64) as f64;
            let mut edge = GraphEdge::new(
                format!("e{i}"),
                nodes[source].id.clone(),
                nodes[target].id.clone(),
            )
            .with_weight(weight);
            if self.directed {
                edge = edge.directed();
            }
            edges.push(edge);
            used.insert((source, target));
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            directed = self.directed,
            "generated random graph"
        );
        Ok(Graph::new(nodes, edges))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_array_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let array = random_array(&mut rng, 50, 10);
        assert_eq!(array.len(), 50);
        assert!(array.iter().all(|&v| (0..=10).contains(&v)));
    }

    #[test]
    fn test_same_seed_same_output() {
        let a = random_array(&mut StdRng::seed_from_u64(3), 20, 99);
        let b = random_array(&mut StdRng::seed_from_u64(3), 20, 99);
        assert_eq!(a, b);

        let cfg = RandomGraphConfig::new(8, 12);
        let ga = cfg.generate(&mut StdRng::seed_from_u64(3)).unwrap();
        let gb = cfg.generate(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(ga, gb);
    }

    #[test]
    fn test_simple_graph_invariants() {
        let mut rng = StdRng::seed_from_u64(11);
        let g = RandomGraphConfig::new(10, 20)
            .generate(&mut rng)
            .unwrap();
        assert_eq!(g.node_count(), 10);
        assert!(g.edge_count() <= 20);
        for edge in &g.edges {
            assert_ne!(edge.source, edge.target, "self-loop generated");
            let dupes = g
                .edges
                .iter()
                .filter(|e| {
                    (e.source == edge.source && e.target == edge.target)
                        || (e.source == edge.target && e.target == edge.source)
                })
                .count();
            assert_eq!(dupes, 1, "duplicate edge generated");
        }
    }

    #[test]
    fn test_weight_ranges() {
        let mut rng = StdRng::seed_from_u64(5);
        let g = RandomGraphConfig::new(8, 15)
            .with_max_weight(6.0)
            .generate(&mut rng)
            .unwrap();
        for edge in &g.edges {
            let w = edge.weight.unwrap();
            assert!((1.0..=6.0).contains(&w));
            assert_eq!(w.fract(), 0.0);
        }

        let g = RandomGraphConfig::new(8, 15)
            .with_max_weight(4.0)
            .with_negative_weights()
            .generate(&mut rng)
            .unwrap();
        assert!(g.edges.iter().all(|e| {
            let w = e.weight.unwrap();
            (-4.0..=4.0).contains(&w)
        }));
    }

    #[test]
    fn test_invalid_weight_range_errors() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = RandomGraphConfig::new(4, 4)
            .with_max_weight(2.0)
            .with_min_weight(5.0)
            .generate(&mut rng)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidWeightRange { .. }));
    }

    #[test]
    fn test_degenerate_node_counts() {
        let mut rng = StdRng::seed_from_u64(2);
        let empty = RandomGraphConfig::new(0, 5).generate(&mut rng).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.edge_count(), 0);

        let single = RandomGraphConfig::new(1, 5).generate(&mut rng).unwrap();
        assert_eq!(single.node_count(), 1);
        assert_eq!(single.edge_count(), 0);
    }

    #[test]
    fn test_coordinates_cover_requested_area() {
        let mut rng = StdRng::seed_from_u64(9);
        let g = RandomGraphConfig::new(12, 0)
            .with_coordinates(100.0, 50.0)
            .generate(&mut rng)
            .unwrap();
        for node in &g.nodes {
            let x = node.x.unwrap();
            let y = node.y.unwrap();
            assert!((0.0..=100.0).contains(&x));
            assert!((0.0..=50.0).contains(&y));
        }
    }

    #[test]
    fn test_directed_flag_propagates() {
        let mut rng = StdRng::seed_from_u64(4);
        let g = RandomGraphConfig::new(6, 8)
            .directed()
            .generate(&mut rng)
            .unwrap();
        assert!(!g.edges.is_empty());
        assert!(g.edges.iter().all(|e| e.directed));
    }
}
