//! # stepviz-core
//!
//! Step-generation engines for classic search, sort, and graph algorithms.
//!
//! Every engine is a resumable state machine implementing
//! `Iterator<Item = ...Step>`: each `next()` call runs the algorithm
//! synchronously to its next visualization-meaningful point and returns an
//! immutable snapshot of the run. Exactly one step per run carries
//! `is_final_step == true`; after it, the iterator is exhausted.
//!
//! ## Modules
//!
//! - [`step`] - Step types, one shape per algorithm family
//! - [`search`] - Linear and binary search
//! - [`sort`] - Bubble, merge, and quick sort
//! - [`shortest_path`] - Dijkstra, Bellman-Ford, A*, Floyd-Warshall
//! - [`mst`] - Kruskal and Prim
//! - [`union_find`] - Disjoint-set structure backing Kruskal
//! - [`generate`] - Seeded random arrays and graphs

pub mod algorithm;
pub mod generate;
pub mod mst;
pub mod search;
pub mod shortest_path;
pub mod sort;
pub mod step;
pub mod union_find;

// Re-export commonly used types
pub use algorithm::{AlgorithmFamily, AlgorithmKey};
pub use mst::{Kruskal, Prim};
pub use search::{BinarySearch, LinearSearch};
pub use shortest_path::{AStar, BellmanFord, Dijkstra, FloydWarshall, MinScored};
pub use sort::{BubbleSort, MergeSort, QuickSort};
pub use step::{
    AllPairsSnapshot, GraphStep, GraphStepKind, HeuristicSnapshot, SearchCursor, SearchStep,
    SingleSourceSnapshot, SortStep, SpanningTreeSnapshot,
};
pub use union_find::UnionFind;
