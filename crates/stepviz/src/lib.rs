//! # Stepviz
//!
//! A step-generation engine for classic search, sort, and graph
//! algorithms. Every engine executes its algorithm one
//! visualization-meaningful step at a time; each step is an immutable
//! snapshot (array or graph state, semantic highlights, narration, final
//! flag) that a renderer or test harness can consume uniformly.
//!
//! ## Quick Start
//!
//! ```rust
//! use stepviz::{BubbleSort, LinearSearch};
//!
//! // Engines are plain iterators; each `next()` resumes the run.
//! let steps: Vec<_> = LinearSearch::new(vec![5, 3, 8, 1], 8).collect();
//! assert_eq!(steps.last().unwrap().target_found_at_index, Some(2));
//!
//! let sorted = BubbleSort::new(vec![5, 3, 8, 1]).last().unwrap();
//! assert_eq!(sorted.array, vec![1, 3, 5, 8]);
//! ```
//!
//! Graph engines consume a [`Graph`] and report their progress through
//! family-tagged snapshots:
//!
//! ```rust
//! use stepviz::{Dijkstra, Graph, GraphEdge, GraphNode};
//!
//! let graph = Graph::new(
//!     vec![GraphNode::new("a"), GraphNode::new("b")],
//!     vec![GraphEdge::new("e0", "a", "b").with_weight(2.0)],
//! );
//! let last = Dijkstra::new(graph, "a".into(), Some("b".into()))
//!     .last()
//!     .unwrap();
//! assert!(last.is_final_step);
//! ```

// Re-export the engines and step types
pub use stepviz_core::{
    AStar, AlgorithmFamily, AlgorithmKey, AllPairsSnapshot, BellmanFord, BinarySearch, BubbleSort,
    Dijkstra, FloydWarshall, GraphStep, GraphStepKind, HeuristicSnapshot, Kruskal, LinearSearch,
    MergeSort, MinScored, Prim, QuickSort, SearchCursor, SearchStep, SingleSourceSnapshot,
    SortStep, SpanningTreeSnapshot, UnionFind,
};

// Re-export input generation
pub use stepviz_core::generate::{random_array, RandomGraphConfig};

// Re-export core data-model types - you'll need these for building graphs
pub use stepviz_common::{
    ArrayHighlight, EdgeId, Error, Graph, GraphEdge, GraphElement, GraphHighlight, GraphNode,
    HighlightColor, NodeId, Result,
};
