//! Algorithm key catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stepviz_common::Error;

/// The three algorithm families, each with its own step shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmFamily {
    /// Array search (yields [`crate::step::SearchStep`]).
    Search,
    /// Array sort (yields [`crate::step::SortStep`]).
    Sort,
    /// Graph algorithms (yield [`crate::step::GraphStep`]).
    Graph,
}

/// Stable kebab-case key for each supported algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmKey {
    /// Linear search.
    LinearSearch,
    /// Binary search.
    BinarySearch,
    /// Bubble sort.
    BubbleSort,
    /// Merge sort.
    MergeSort,
    /// Quick sort.
    QuickSort,
    /// Dijkstra's shortest path.
    Dijkstra,
    /// Bellman-Ford shortest path.
    BellmanFord,
    /// A* shortest path.
    AStar,
    /// Floyd-Warshall all-pairs shortest paths.
    FloydWarshall,
    /// Kruskal's minimum spanning tree.
    Kruskal,
    /// Prim's minimum spanning tree.
    Prim,
}

impl AlgorithmKey {
    /// All keys, in catalog order.
    pub const ALL: [AlgorithmKey; 11] = [
        AlgorithmKey::LinearSearch,
        AlgorithmKey::BinarySearch,
        AlgorithmKey::BubbleSort,
        AlgorithmKey::MergeSort,
        AlgorithmKey::QuickSort,
        AlgorithmKey::Dijkstra,
        AlgorithmKey::BellmanFord,
        AlgorithmKey::AStar,
        AlgorithmKey::FloydWarshall,
        AlgorithmKey::Kruskal,
        AlgorithmKey::Prim,
    ];

    /// Returns the stable kebab-case key string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlgorithmKey::LinearSearch => "linear-search",
            AlgorithmKey::BinarySearch => "binary-search",
            AlgorithmKey::BubbleSort => "bubble-sort",
            AlgorithmKey::MergeSort => "merge-sort",
            AlgorithmKey::QuickSort => "quick-sort",
            AlgorithmKey::Dijkstra => "dijkstra",
            AlgorithmKey::BellmanFord => "bellman-ford",
            AlgorithmKey::AStar => "a-star",
            AlgorithmKey::FloydWarshall => "floyd-warshall",
            AlgorithmKey::Kruskal => "kruskal",
            AlgorithmKey::Prim => "prim",
        }
    }

    /// Returns the family this algorithm belongs to.
    #[must_use]
    pub fn family(self) -> AlgorithmFamily {
        match self {
            AlgorithmKey::LinearSearch | AlgorithmKey::BinarySearch => AlgorithmFamily::Search,
            AlgorithmKey::BubbleSort | AlgorithmKey::MergeSort | AlgorithmKey::QuickSort => {
                AlgorithmFamily::Sort
            }
            _ => AlgorithmFamily::Graph,
        }
    }
}

impl fmt::Display for AlgorithmKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlgorithmKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlgorithmKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}
